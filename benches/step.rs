//! Step-throughput benchmarks.
//!
//! Measures the per-step cost of the two dispatch strategies over the same
//! body, plus machine construction. The interesting number is the delta
//! between `match` and `jump` on the hot resume path.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use restep::{Body, Entry, Handler, JumpDispatch, Machine, Point, StepEvent};

const EMIT: Point = Point::new(0);

/// Minimal hot-loop body: one suspension point, one field increment.
struct Counter {
    i: u64,
}

impl Counter {
    fn enter(&mut self) -> StepEvent {
        StepEvent::Suspend(EMIT)
    }

    fn bump(&mut self) -> StepEvent {
        self.i += 1;
        StepEvent::Suspend(EMIT)
    }
}

impl Body for Counter {
    fn points() -> &'static [Point] {
        &[EMIT]
    }

    fn advance(&mut self, entry: Entry) -> StepEvent {
        match entry {
            Entry::Start => self.enter(),
            Entry::Resume(_) => self.bump(),
        }
    }
}

const STEPS: u64 = 10_000;

fn bench_step_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");
    group.throughput(Throughput::Elements(STEPS));

    group.bench_function("match_dispatch", |b| {
        b.iter(|| {
            let mut machine = Machine::new(Counter { i: 0 }).unwrap();
            for _ in 0..STEPS {
                black_box(machine.step());
            }
            black_box(machine.body().i)
        })
    });

    group.bench_function("jump_dispatch", |b| {
        b.iter(|| {
            let jump = JumpDispatch::new(
                Counter::enter as Handler<Counter>,
                &[(EMIT, Counter::bump as Handler<Counter>)],
            )
            .unwrap();
            let mut machine = Machine::with_dispatch(Counter { i: 0 }, jump).unwrap();
            for _ in 0..STEPS {
                black_box(machine.step());
            }
            black_box(machine.body().i)
        })
    });

    group.finish();
}

fn bench_construction(c: &mut Criterion) {
    c.bench_function("machine/new", |b| {
        b.iter(|| Machine::new(Counter { i: black_box(0) }).unwrap())
    });
}

criterion_group!(benches, bench_step_throughput, bench_construction);
criterion_main!(benches);
