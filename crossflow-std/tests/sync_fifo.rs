//! Synchronous FIFO: ordering under backpressure and exact flags.

use crossflow::sim::*;
use crossflow::*;
use crossflow_std::*;
use itertools::iproduct;

fn run(config: FifoConfig, beats: u32, src_stall: u32, dst_stall: u32, seed: u64) -> Result<bool, SimError> {
    let source = Source::new(0..beats, src_stall, seed)?;
    let sink = Sink::new(dst_stall, seed ^ 0xFF)?;
    let mut bench = Bench::new(source, Fifo::new(config)?, sink);

    let mut seen_full = false;
    let _ = bench.run(beats as usize, 100_000, |probe, fifo| {
        let status = fifo.status();
        seen_full |= status.full;
        ensure(fifo.occupancy() == probe.sent - probe.received, probe.time, || {
            format!("occupancy {} with {} sent and {} received", fifo.occupancy(), probe.sent, probe.received)
        })?;
        ensure(status.full == (status.count == config.depth), probe.time, || format!("full flag wrong: {status:?}"))?;
        ensure(status.empty == (status.count == 0), probe.time, || format!("empty flag wrong: {status:?}"))?;

        // Ready is exactly not-full, whatever the consumer does.
        let (_, ready) = fifo.comb(Valid::valid(0), Ready::new(false));
        ensure(ready.ready == !status.full, probe.time, || format!("ready {ready:?} with {status:?}"))
    })?;

    check_in_order(&(0..beats).collect::<Vec<_>>(), bench.drain().received())?;
    Ok(seen_full)
}

#[test]
fn order_is_preserved_below_depth() -> Result<(), SimError> {
    for (depth, out_reg, src_stall, dst_stall) in iproduct!([1, 4, 5, 16], [false, true], [0, 50], [0, 50]) {
        let config = FifoConfig::default().with_depth(depth).with_out_reg(out_reg);
        let _ = run(config, depth as u32, src_stall, dst_stall, depth as u64)?;
    }
    Ok(())
}

#[test]
fn order_is_preserved_far_beyond_depth() -> Result<(), SimError> {
    for (depth, out_reg, src_stall, dst_stall) in iproduct!([1, 3, 4, 8], [false, true], [0, 50], [0, 50]) {
        let config = FifoConfig::default().with_depth(depth).with_out_reg(out_reg);
        let seen_full = run(config, 500, src_stall, dst_stall, 17 * depth as u64)?;
        if dst_stall > src_stall {
            assert!(seen_full, "{config:?} never filled up under a slow consumer");
        }
    }
    Ok(())
}

#[test]
fn stuck_consumer_is_tolerated() -> Result<(), SimError> {
    let config = FifoConfig::default().with_depth(4).with_out_reg(true);
    let source = Source::new(0..10u32, 0, 0)?;
    let sink = Sink::new(100, 0)?;
    let mut bench = Bench::new(source, Fifo::new(config)?, sink);

    assert!(matches!(bench.run(10, 1_000, no_probe), Err(SimError::Timeout { received: 0, .. })));
    assert!(bench.dut().status().full);
    assert_eq!(bench.dut().occupancy(), 5);
    assert_eq!(bench.source().sent().len(), 5);

    // Releasing the consumer drains everything in order.
    bench.drain_mut().set_stall(0);
    let _ = bench.run(10, 1_000, no_probe)?;
    check_in_order(&(0..10).collect::<Vec<_>>(), bench.drain().received())
}

#[test]
fn output_register_adds_one_cycle() -> Result<(), SimError> {
    for out_reg in [false, true] {
        let config = FifoConfig::default().with_depth(4).with_out_reg(out_reg);
        let mut bench = Bench::new(Source::new(0..8u32, 0, 0)?, Fifo::new(config)?, Sink::new(0, 0)?);
        let _ = bench.run(8, 100, no_probe)?;

        let sent = bench.source().sent_cycles();
        let received = bench.drain().received_cycles();
        let latency = u64::from(out_reg) + 1;
        assert!(sent.iter().zip(received).all(|(s, r)| r - s == latency), "out_reg {out_reg}");
    }
    Ok(())
}
