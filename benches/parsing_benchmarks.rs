use addresser::{Addresser, normalizer};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const ADDRESSES: [&str; 6] = [
    "705 Monterey Pass Rd, Monterey Park, CA 91754",
    "PO Box 1234, Austin, TX 78701",
    "Suite 200, 100 Congress Ave, Austin, TX 78701-4042",
    "123 Main St, Springfield, IL 62701",
    "1600 Pennsylvania Ave NW, Washington, District Of Columbia 20500, USA",
    "100 Queen St W, Toronto, ON M5H 2N2",
];

fn bench_address_parsing(c: &mut Criterion) {
    let addresser = Addresser::new().expect("bundled reference data");

    c.bench_function("parse_simple_address", |b| {
        b.iter(|| addresser.parse_address(black_box(ADDRESSES[0])))
    });

    c.bench_function("parse_complex_address", |b| {
        b.iter(|| addresser.parse_address(black_box(ADDRESSES[2])))
    });

    c.bench_function("normalize_address", |b| {
        b.iter(|| normalizer::normalize(black_box(ADDRESSES[4])))
    });
}

fn bench_batch_parsing(c: &mut Criterion) {
    let addresser = Addresser::new().expect("bundled reference data");
    let parser = addresser.parser();
    let batch: Vec<&str> = ADDRESSES.iter().copied().cycle().take(600).collect();

    c.bench_function("parse_batch_600", |b| {
        b.iter(|| parser.parse_batch(black_box(&batch)))
    });

    #[cfg(feature = "parallel")]
    c.bench_function("parse_batch_parallel_600", |b| {
        b.iter(|| parser.parse_batch_parallel(black_box(&batch)))
    });
}

fn bench_random_city(c: &mut Criterion) {
    let addresser = Addresser::new().expect("bundled reference data");

    c.bench_function("random_city", |b| b.iter(|| addresser.random_city()));
}

criterion_group!(
    benches,
    bench_address_parsing,
    bench_batch_parsing,
    bench_random_city
);
criterion_main!(benches);
