//! Vector synchronizer: atomic transfer of multi-bit values.

use crossflow::sim::*;
use crossflow::*;
use crossflow_std::*;
use itertools::iproduct;

const SRC_PERIOD: Time = 1_000;

/// Consecutive values differ in every bit, so a torn capture cannot go unnoticed.
fn value(i: u32) -> u32 {
    if i % 2 == 0 {
        0x5555_5555 ^ (i << 16)
    } else {
        0xAAAA_AAAA ^ (i << 16)
    }
}

type SyncBench = DualClockBench<u32, VectorSync<u32>, Monitor<u32>>;

fn bench(config: SyncConfig, ratio: u64, beats: u32, src_stall: u32, seed: u64) -> Result<SyncBench, SimError> {
    let scheduler = Scheduler::with_ratio(SRC_PERIOD, ratio)?;
    let source = Source::new((0..beats).map(value), src_stall, seed)?;
    Ok(DualClockBench::new(source, VectorSync::new(config)?, Monitor::new(), scheduler))
}

#[test]
fn values_cross_whole() -> Result<(), SimError> {
    const BEATS: u32 = 60;
    for (ratio, stages, src_stall) in iproduct!([100, 50, 200, 150, 12, 432, 95], [2, 3], [0, 50]) {
        let metastability = Metastability::Random { aperture: 80, seed: ratio + stages as u64 };
        let config = SyncConfig::default().with_stages(stages).with_metastability(metastability);
        let mut bench = bench(config, ratio, BEATS, src_stall, ratio)?;

        let _ = bench.run(BEATS as usize, 100_000, |probe, _| {
            ensure(probe.received <= probe.sent, probe.time, || "value seen before it was sent".to_string())
        })?;
        check_in_order(&(0..BEATS).map(value).collect::<Vec<_>>(), bench.drain().received())?;
    }
    Ok(())
}

#[test]
fn values_cross_whole_under_jitter() -> Result<(), SimError> {
    const BEATS: u32 = 60;
    for (src_jitter, dst_period) in iproduct!([150, 400, 900], [300, 700, 2_500]) {
        let seed = src_jitter + dst_period;
        let config = SyncConfig::default().with_metastability(Metastability::Random { aperture: 80, seed });
        let scheduler = Scheduler::new(
            Clock::new(SRC_PERIOD, 0)?.with_jitter(src_jitter, seed),
            Clock::new(dst_period, SRC_PERIOD / 3)?.with_jitter(dst_period / 2, seed + 1),
        );
        let source = Source::new((0..BEATS).map(value), 30, seed)?;
        let mut bench = DualClockBench::new(source, VectorSync::new(config)?, Monitor::new(), scheduler);

        let _ = bench.run(BEATS as usize, 100_000, no_probe)?;
        check_in_order(&(0..BEATS).map(value).collect::<Vec<_>>(), bench.drain().received())?;
        // Every value is a pulse of its own destination cycle.
        assert!(bench.scheduler().clock(Domain::Dst).cycles() >= u64::from(BEATS));
    }
    Ok(())
}

#[test]
fn throughput_is_bounded_by_round_trip() -> Result<(), SimError> {
    for stages in [2, 4] {
        let config = SyncConfig::default().with_stages(stages);
        let mut bench = bench(config, 100, 20, 0, 0)?;
        let _ = bench.run(20, 10_000, no_probe)?;

        let cycles = bench.drain().received_cycles();
        assert!(cycles.windows(2).all(|w| w[1] - w[0] >= 2 * stages as u64), "stages {stages}: {cycles:?}");
    }
    Ok(())
}

#[test]
fn reset_drops_nothing_spurious() -> Result<(), SimError> {
    for (domain, kind) in iproduct!([Domain::Src, Domain::Dst], [ResetKind::Sync, ResetKind::Async]) {
        let mut bench = bench(SyncConfig::default(), 150, 100, 0, 9)?;
        bench.run_until(30_000, no_probe)?;

        let at = bench.now() + 1;
        bench.dut_mut().assert_reset(domain, kind, at);
        bench.source_mut().flush();
        bench.run_until(at + 10 * SRC_PERIOD, no_probe)?;
        bench.dut_mut().release_reset(domain);
        bench.run_until(at + 40 * SRC_PERIOD, no_probe)?;
        assert!(bench.dut().bridge().is_idle(), "{domain:?} {kind:?}");
        assert!(!bench.dut().busy());

        // At most the value in flight at the reset is lost.
        let received = bench.drain().received().len();
        let sent = bench.source().sent().len();
        assert!(received + 1 >= sent, "{domain:?} {kind:?}: {received} of {sent} received");
        check_in_order(&bench.source().sent()[..received], bench.drain().received())?;

        bench.source_mut().push([7, 8, 9]);
        let _ = bench.run(received + 3, 100_000, no_probe)?;
        assert_eq!(&bench.drain().received()[received..], &[7, 8, 9]);
    }
    Ok(())
}
