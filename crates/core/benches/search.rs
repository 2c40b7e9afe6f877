use criterion::{black_box, criterion_group, criterion_main, Criterion};
use linearize_core::models::register::{Register, RegisterCall};
use linearize_core::op::{History, Op};
use linearize_core::{analysis, AnalyzerOptions};

fn single_writer_single_reader_chain(length: usize) -> History<RegisterCall> {
    let mut events = Vec::with_capacity(length * 4);
    for i in 0..length {
        let value = i as i64;
        events.push(Op::invoke(1, RegisterCall::Write(value)));
        events.push(Op::ok(1, RegisterCall::Write(value)));
        events.push(Op::invoke(2, RegisterCall::Read(None)));
        events.push(Op::ok(2, RegisterCall::Read(Some(value))));
    }
    History::new(events)
}

fn bench_sequential_chain(c: &mut Criterion) {
    let options = AnalyzerOptions { thread_count: 4, reporter_period: None, seen_capacity_bits: 16 };
    let history = single_writer_single_reader_chain(64);
    c.bench_function("sequential_chain_64", |b| {
        b.iter(|| {
            let report = analysis(black_box(Register(0)), &history, &options);
            assert!(report.is_valid());
        });
    });
}

criterion_group!(benches, bench_sequential_chain);
criterion_main!(benches);
