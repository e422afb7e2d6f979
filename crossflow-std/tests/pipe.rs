//! Handshake pipeline stages: transparency, declared latency and registered ready paths.

use crossflow::sim::*;
use crossflow::*;
use crossflow_std::*;
use itertools::iproduct;

const BEATS: u32 = 300;

type PayloadBeat = Beat<Bits<32>, Bits<4>, bool>;

fn beat(i: u32) -> PayloadBeat {
    let payload = Bits::from(u128::from(i.wrapping_mul(0x9E37_79B9)));
    Beat::new(payload, Bits::from(u128::from(i % 16)), i % 7 == 0)
}

fn bench(
    config: PipeConfig, src_stall: u32, dst_stall: u32, seed: u64,
) -> Bench<PayloadBeat, Pipe<PayloadBeat>, Sink<PayloadBeat>> {
    let source = Source::new((0..BEATS).map(beat), src_stall, seed).unwrap();
    let sink = Sink::new(dst_stall, seed + 1).unwrap();
    Bench::new(source, Pipe::new(config).unwrap(), sink)
}

fn check_transparent(data_pipe: bool, ready_pipe: bool) -> Result<(), SimError> {
    for (stages, src_stall, dst_stall) in iproduct!([1, 3], [0, 50], [0, 50]) {
        let config = PipeConfig::default().with_stages(stages).with_data_pipe(data_pipe).with_ready_pipe(ready_pipe);
        let mut bench = bench(config, src_stall, dst_stall, stages as u64 * 100 + u64::from(src_stall + dst_stall));

        let _ = bench.run(BEATS as usize, 10_000, |probe, dut| {
            ensure(dut.occupancy() == probe.sent - probe.received, probe.time, || {
                format!("{config:?}: {} beats inside, {} sent, {} received", dut.occupancy(), probe.sent, probe.received)
            })
        })?;
        let expected = (0..BEATS).map(beat).collect::<Vec<_>>();
        check_in_order(&expected, bench.drain().received())?;

        // Nothing trails behind the last beat.
        bench.idle(3 * stages as u64, no_probe)?;
        assert_eq!(bench.drain().received().len(), BEATS as usize);
    }
    Ok(())
}

fn check_latency(data_pipe: bool, ready_pipe: bool) {
    for stages in [1, 3] {
        let config = PipeConfig::default().with_stages(stages).with_data_pipe(data_pipe).with_ready_pipe(ready_pipe);
        let mut bench = bench(config, 0, 0, 7);
        let _ = bench.run(BEATS as usize, 10_000, no_probe).unwrap();

        let sent = bench.source().sent_cycles();
        let received = bench.drain().received_cycles();
        for (i, (sent, received)) in sent.iter().zip(received).enumerate() {
            assert_eq!(received - sent, config.latency() as u64, "{config:?}, beat {i}");
        }

        // Full throughput once the pipe is primed.
        let span = received[received.len() - 1] - received[0];
        assert_eq!(span, u64::from(BEATS) - 1, "{config:?}");
    }
}

fn check_ready_registered(data_pipe: bool, ready_pipe: bool) -> Result<(), SimError> {
    let config = PipeConfig::default().with_stages(3).with_data_pipe(data_pipe).with_ready_pipe(ready_pipe);
    let mut bench = bench(config, 30, 50, 3);
    let _ = bench.run(BEATS as usize, 10_000, |probe, dut| {
        let beat = Valid::valid(beat(0));
        let stalled = dut.comb(beat.clone(), Ready::new(false)).1;
        let draining = dut.comb(beat, Ready::new(true)).1;
        ensure(stalled == draining, probe.time, || format!("{config:?}: input ready follows output ready"))
    })?;
    Ok(())
}

macro_rules! pipe_profile_tests {
    ($($name:ident: $data_pipe:expr, $ready_pipe:expr;)*) => {
        $(
            paste::paste! {
                #[test]
                fn [<$name _is_transparent>]() -> Result<(), SimError> { check_transparent($data_pipe, $ready_pipe) }

                #[test]
                fn [<$name _has_declared_latency>]() { check_latency($data_pipe, $ready_pipe) }
            }
        )*
    };
}

pipe_profile_tests! {
    wire: false, false;
    register_slice_fwd: true, false;
    register_slice_bwd: false, true;
    buffer_skid: true, true;
}

#[test]
fn registered_ready_ignores_output_ready() -> Result<(), SimError> {
    check_ready_registered(false, true)?;
    check_ready_registered(true, true)
}

#[test]
fn unregistered_ready_follows_output_ready() {
    assert!(check_ready_registered(true, false).is_err());
    assert!(check_ready_registered(false, false).is_err());
}
