//! Randomized properties of the primitives.

use crossflow::sim::*;
use crossflow::*;
use crossflow_std::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn gray_neighbours_differ_in_one_bit(bin in 0usize..(1 << 24)) {
        prop_assert_eq!((bin_to_gray(bin) ^ bin_to_gray(bin + 1)).count_ones(), 1);
        prop_assert_eq!(gray_to_bin(bin_to_gray(bin)), bin);
    }

    #[test]
    fn pipe_is_transparent(
        stages in 1usize..5,
        data_pipe: bool,
        ready_pipe: bool,
        values in prop::collection::vec(any::<u16>(), 0..100),
        src_stall in 0u32..90,
        dst_stall in 0u32..90,
        seed: u64,
    ) {
        let config = PipeConfig::default().with_stages(stages).with_data_pipe(data_pipe).with_ready_pipe(ready_pipe);
        let source = Source::new(values.clone(), src_stall, seed).unwrap();
        let mut bench = Bench::new(source, Pipe::new(config).unwrap(), Sink::new(dst_stall, !seed).unwrap());
        let _ = bench.run(values.len(), 100_000, no_probe).unwrap();
        prop_assert_eq!(bench.drain().received(), &values[..]);
    }

    #[test]
    fn sync_fifo_flags_match_occupancy(
        depth in 1usize..9,
        values in prop::collection::vec(any::<u8>(), 0..200),
        src_stall in 0u32..90,
        dst_stall in 0u32..90,
        seed: u64,
    ) {
        let source = Source::new(values.clone(), src_stall, seed).unwrap();
        let fifo = Fifo::new(FifoConfig::default().with_depth(depth)).unwrap();
        let mut bench = Bench::new(source, fifo, Sink::new(dst_stall, !seed).unwrap());
        let _ = bench.run(values.len(), 100_000, |probe, fifo| {
            let status = fifo.status();
            ensure(status.count == probe.sent - probe.received, probe.time, || format!("{status:?}"))?;
            ensure(status.full == (status.count == depth), probe.time, || format!("{status:?}"))?;
            ensure(status.empty == (status.count == 0), probe.time, || format!("{status:?}"))
        }).unwrap();
        prop_assert_eq!(bench.drain().received(), &values[..]);
    }

    #[test]
    fn async_fifo_preserves_order(
        depth in 1usize..17,
        ratio in 10u64..500,
        out_reg: bool,
        values in prop::collection::vec(any::<u32>(), 0..100),
        src_stall in 0u32..90,
        dst_stall in 0u32..90,
        seed: u64,
    ) {
        let config = AsyncFifoConfig::default()
            .with_depth(depth)
            .with_out_reg(out_reg)
            .with_metastability(Metastability::Random { aperture: 50, seed });
        let source = Source::new(values.clone(), src_stall, seed).unwrap();
        let scheduler = Scheduler::with_ratio(1_000, ratio).unwrap();
        let sink = Sink::new(dst_stall, !seed).unwrap();
        let mut bench = DualClockBench::new(source, AsyncFifo::new(config).unwrap(), sink, scheduler);
        let _ = bench.run(values.len(), 1_000_000, |probe, fifo| {
            ensure(fifo.write_status().count >= fifo.occupancy(), probe.time, || "writer underestimates".to_string())?;
            ensure(fifo.read_status().count <= fifo.occupancy(), probe.time, || "reader overestimates".to_string())
        }).unwrap();
        prop_assert_eq!(bench.drain().received(), &values[..]);
    }
}
