//! Memory store benchmarks
//!
//! | Benchmark | Path |
//! |-----------|------|
//! | add/* | id generation + insert under the write lock |
//! | get_all/N | full collection materialization |
//! | duplicate_check/N | `filter(email == x).limit(1)`, the registration hot path |
//! | decode/N | `get_records::<Attendee>` over N documents |
//!
//! ## Running
//!
//! ```bash
//! cargo bench --bench memory_store
//! ```

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use eventdesk::core::{Attendee, Value, ATTENDEES};
use eventdesk::store::{DocumentStore, FilterOp, MemoryStore};

const SIZES: [usize; 3] = [100, 1_000, 10_000];

fn attendee(i: usize) -> Attendee {
    Attendee {
        full_name: format!("Attendee {i}"),
        email: format!("attendee{i}@example.com"),
        designation: ["Developer", "Manager", "Designer"][i % 3].to_string(),
        registered_at: Utc::now(),
        ..Attendee::default()
    }
}

fn populated(n: usize) -> MemoryStore {
    let store = MemoryStore::new("bench");
    let attendees = store.collection(ATTENDEES);
    for i in 0..n {
        attendees
            .add_record(&attendee(i))
            .expect("tenant collection accepts writes");
    }
    store
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    group.throughput(Throughput::Elements(1));

    let store = MemoryStore::new("bench");
    let attendees = store.collection(ATTENDEES);
    let record = attendee(0);
    group.bench_function("attendee", |b| {
        b.iter(|| black_box(attendees.add_record(&record).unwrap()))
    });
    group.finish();
}

fn bench_get_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_all");
    for n in SIZES {
        let store = populated(n);
        let attendees = store.collection(ATTENDEES);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(attendees.documents().get_all().unwrap()))
        });
    }
    group.finish();
}

fn bench_duplicate_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("duplicate_check");
    for n in SIZES {
        let store = populated(n);
        let attendees = store.collection(ATTENDEES);
        let needle = Value::from(format!("attendee{}@example.com", n / 2));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let hits = attendees
                    .filter("email", FilterOp::Eq, needle.clone())
                    .limit(1)
                    .documents()
                    .get_all()
                    .unwrap();
                black_box(hits.len())
            })
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for n in SIZES {
        let store = populated(n);
        let attendees = store.collection(ATTENDEES);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(attendees.get_records::<Attendee>().unwrap()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_add,
    bench_get_all,
    bench_duplicate_check,
    bench_decode
);
criterion_main!(benches);
