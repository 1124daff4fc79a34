// Criterion benchmarks for Listing Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use listing_match::core::{edit_distance, title_similarity, Matcher, Tokenizer};
use listing_match::models::{Listing, ListingType};
use rust_decimal::Decimal;

const TITLES: [&str; 6] = [
    "ноутбук Lenovo ThinkPad T14",
    "ноутбук игровой",
    "принтер HP LaserJet Pro",
    "кресло офисное с подлокотниками",
    "монитор Samsung 27 дюймов",
    "стол письменный",
];

fn create_listing(id: usize) -> Listing {
    let listing_type = if id % 2 == 0 { ListingType::Demand } else { ListingType::Sale };
    Listing::new(id as i64, listing_type, TITLES[id % TITLES.len()])
        .with_location(if id % 3 == 0 { "Москва" } else { "Казань" })
        .with_price(Decimal::from(10_000 + (id as i64 % 17) * 500))
        .with_characteristic("состояние", if id % 4 == 0 { "новое" } else { "хорошее" })
}

fn bench_edit_distance(c: &mut Criterion) {
    c.bench_function("edit_distance", |b| {
        b.iter(|| edit_distance(black_box("ноутбуки"), black_box("ноутбук")));
    });
}

fn bench_title_similarity(c: &mut Criterion) {
    let tokenizer = Tokenizer::default();

    c.bench_function("title_similarity", |b| {
        b.iter(|| {
            title_similarity(
                &tokenizer,
                black_box("Ноутбук Lenovo ThinkPad T14 срочно"),
                black_box("ноутбук lenovo thinkpad"),
                black_box(0.6),
            )
        });
    });
}

fn bench_matching(c: &mut Criterion) {
    let matcher = Matcher::with_default_options();

    let mut group = c.benchmark_group("matching");

    for listing_count in [10, 50, 100, 500].iter() {
        let snapshot: Vec<Listing> = (0..*listing_count).map(create_listing).collect();

        group.bench_with_input(
            BenchmarkId::new("find_matches", listing_count),
            listing_count,
            |b, _| {
                b.iter(|| matcher.find_matches(black_box(&snapshot)));
            },
        );
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let matcher = Matcher::with_default_options();
    let snapshot: Vec<Listing> = (0..1000).map(create_listing).collect();

    c.bench_function("search_by_title_1000_listings", |b| {
        b.iter(|| matcher.search_by_title(black_box("ноутбук lenovo"), &snapshot, 0.6));
    });
}

criterion_group!(
    benches,
    bench_edit_distance,
    bench_title_similarity,
    bench_matching,
    bench_search
);

criterion_main!(benches);
