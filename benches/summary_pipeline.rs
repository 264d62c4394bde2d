use std::fmt::Write as _;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use eda_insight::cache::LoadCache;
use eda_insight::insight::{self, InsightView};
use eda_insight::loader::{self, LoadOptions};
use eda_insight::normalize::normalize;
use eda_insight::source::{RawSource, SourceKind};

fn generate_orders(rows: usize) -> RawSource {
    let mut body = String::from("order_id,customer_name,status,amount,is_rush\n");
    for i in 0..rows {
        let status = match i % 3 {
            0 => "shipped",
            1 => "pending",
            _ => "processing",
        };
        let amount = if i % 17 == 0 {
            String::new()
        } else {
            format!("{}.{:02}", (i * 37) % 1000, i % 100)
        };
        let _ = writeln!(
            body,
            "{i},customer_{},{status},{amount},{}",
            i % 250,
            i % 5 == 0
        );
    }
    RawSource::new("orders.csv", body.into_bytes(), SourceKind::Csv)
}

fn bench_summary_pipeline(c: &mut Criterion) {
    let source = generate_orders(50_000);
    let options = LoadOptions::default();
    let table = normalize(loader::load(&source, &options).expect("load orders"));

    let mut group = c.benchmark_group("summary_pipeline");

    group.bench_function("load_and_normalize", |b| {
        b.iter(|| normalize(loader::load(&source, &options).expect("load orders")));
    });

    for view in [
        InsightView::Types,
        InsightView::Summary,
        InsightView::Distribution,
    ] {
        group.bench_function(format!("derive_{view:?}").to_lowercase(), |b| {
            b.iter(|| insight::derive(&table, view, None).expect("derive view"));
        });
    }

    group.bench_function("cached_reload", |b| {
        b.iter_batched(
            || {
                let mut cache = LoadCache::new(2);
                cache.load(&source, &options).expect("prime cache");
                cache
            },
            |mut cache| cache.load(&source, &options).expect("cache hit"),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_summary_pipeline);
criterion_main!(benches);
