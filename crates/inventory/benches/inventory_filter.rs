use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::NaiveDate;
use uks_inventory::{MedicineFilter, MedicineId, MedicineItem, StockFilter, render_table};

const CATEGORIES: [&str; 4] = ["Tablet", "Cairan", "Salep", "Plester"];

fn inventory(size: usize) -> Vec<MedicineItem> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..size)
        .map(|i| MedicineItem {
            id: MedicineId::new(i as i64 + 1),
            name: format!("Obat {i}"),
            category: CATEGORIES[i % CATEGORIES.len()].to_string(),
            quantity: (i % 40) as u32,
            expiry_date: base + chrono::Days::new((i % 900) as u64),
            description: (i % 3 == 0).then(|| format!("Keterangan obat {i}")),
            created_at: None,
            updated_at: None,
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("inventory_filter");
    let filter = MedicineFilter::search("obat 1")
        .with_category("Tablet")
        .with_stock(StockFilter::Normal);

    for size in [100usize, 1_000, 10_000] {
        let items = inventory(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("apply", size), &items, |b, items| {
            b.iter(|| black_box(filter.apply(black_box(items))));
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("inventory_render");
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    for size in [100usize, 1_000, 10_000] {
        let items = inventory(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("render_table", size), &items, |b, items| {
            b.iter(|| black_box(render_table(black_box(items), today)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_filter, bench_render);
criterion_main!(benches);
