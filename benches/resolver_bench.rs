use criterion::{black_box, criterion_group, criterion_main, Criterion};
use slideframe::resolver;

const INPUTS: [&str; 4] = [
    "https://docs.google.com/presentation/d/1AbC_23-xyz/edit",
    "https://docs.google.com/presentation/d/e/2PACX-1vAbc-De_F2/pub?start=true",
    "https://example.com/not-a-slide",
    "see https://docs.google.com/presentation/d/1AbC_23-xyz/edit#slide=id.p4 for the deck",
];

fn bench_resolve(c: &mut Criterion) {
    c.bench_function("resolve_mixed_urls", |b| {
        b.iter(|| {
            for input in INPUTS {
                black_box(resolver::resolve(black_box(input)));
            }
        })
    });
}

fn bench_embed_url(c: &mut Criterion) {
    let long = format!("https://docs.google.com/presentation/d/{}/edit", "a".repeat(4096));
    c.bench_function("embed_url_long_id", |b| {
        b.iter(|| black_box(resolver::embed_url_for(black_box(&long))))
    });
}

criterion_group!(benches, bench_resolve, bench_embed_url);
criterion_main!(benches);
