/*!
# Filter Benchmarks

Benchmarks for building predicates from filter specifications and evaluating
them against in-memory records.

## Usage

```bash
# Run all benchmarks
cargo bench --bench filter_benchmarks

# Run specific benchmark group
cargo bench --bench filter_benchmarks -- "Specification Building"

# Quick benchmark with fewer samples
cargo bench --bench filter_benchmarks -- --quick
```

HTML reports are generated in `target/criterion/report/index.html`.
*/

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use crudfilter::backend::memory::{MemoryExecutor, Record, evaluate};
use crudfilter::filtering::{Value, build_specification};
use crudfilter::{
    EntityMeta, FilterConfig, FilterCriterion, FilterSpecification, ListingService, Metamodel,
    Operator, ValueType,
};
use std::hint::black_box;
use std::time::Duration;
use tokio::runtime::Runtime;

#[derive(Debug, Clone)]
struct BenchmarkPost {
    id: i64,
    title: String,
    author: String,
    category: String,
    view_count: i32,
    published: bool,
}

impl Record for BenchmarkPost {
    fn value(&self, attribute: &str) -> Option<Value> {
        Some(match attribute {
            "id" => self.id.into(),
            "title" => self.title.clone().into(),
            "author" => self.author.clone().into(),
            "category" => self.category.clone().into(),
            "viewCount" => self.view_count.into(),
            "published" => self.published.into(),
            _ => return None,
        })
    }
}

fn benchmark_metamodel() -> Metamodel {
    Metamodel::new().with_entity(
        EntityMeta::new("post", "posts")
            .scalar("id", ValueType::Long)
            .scalar("title", ValueType::String)
            .scalar("author", ValueType::String)
            .scalar("category", ValueType::String)
            .scalar("viewCount", ValueType::Integer)
            .scalar("published", ValueType::Boolean),
    )
}

fn benchmark_posts(count: i64) -> Vec<BenchmarkPost> {
    let categories = ["Technology", "Science", "Business", "Entertainment"];
    (1..=count)
        .map(|i| BenchmarkPost {
            id: i,
            title: format!("Benchmark Post {i}"),
            author: format!("Author{}", i % 10),
            category: categories[usize::try_from(i).unwrap_or(0) % categories.len()].to_string(),
            view_count: i32::try_from(i * 7 % 1000).unwrap_or(0),
            published: i % 3 != 0,
        })
        .collect()
}

/// Mix of operators spread over the benchmark attributes, `count` criteria long.
fn benchmark_spec(count: usize) -> FilterSpecification {
    let pool = [
        FilterCriterion::new("title", Operator::Contains, "post"),
        FilterCriterion::between("viewCount", "100", "900"),
        FilterCriterion::unary("published", Operator::IsTrue),
        FilterCriterion::new("category", Operator::In, "Technology,Science"),
        FilterCriterion::new("author", Operator::StartsWith, "author"),
        FilterCriterion::new("id", Operator::GreaterThanOrEqual, "10"),
        FilterCriterion::new("unknownField", Operator::Equals, "ignored"),
        FilterCriterion::new("viewCount", Operator::NotIn, "1,2,3"),
    ];
    pool.iter()
        .cycle()
        .take(count)
        .cloned()
        .fold(FilterSpecification::new(), FilterSpecification::with_filter)
}

fn bench_specification_building(c: &mut Criterion) {
    let metamodel = benchmark_metamodel();
    let config = FilterConfig::default();

    let mut group = c.benchmark_group("Specification Building");

    for criteria in [1, 4, 8, 32] {
        let spec = benchmark_spec(criteria);
        group.bench_with_input(
            BenchmarkId::new("build_specification", criteria),
            &spec,
            |b, spec| {
                b.iter(|| build_specification(&metamodel, "post", black_box(spec), &config));
            },
        );
    }

    let search = FilterSpecification::new().with_global_search("benchmark author");
    group.bench_function("global_search", |b| {
        b.iter(|| build_specification(&metamodel, "post", black_box(&search), &config));
    });

    group.finish();
}

fn bench_memory_listing(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let metamodel = benchmark_metamodel();
    let service = ListingService::new(&metamodel, "post");

    let mut group = c.benchmark_group("Memory Listing");
    group.measurement_time(Duration::from_secs(8));

    for size in [100, 1_000, 10_000] {
        let posts = benchmark_posts(size);
        let executor: MemoryExecutor<BenchmarkPost> = posts.iter().cloned().collect();
        let spec = benchmark_spec(4).with_size(50);
        let predicate = service.prepare(&spec).predicate;

        group.bench_with_input(BenchmarkId::new("evaluate", size), &posts, |b, posts| {
            b.iter(|| {
                posts
                    .iter()
                    .filter(|post| evaluate(black_box(&predicate), *post))
                    .count()
            });
        });

        group.bench_with_input(BenchmarkId::new("find_page", size), &spec, |b, spec| {
            b.iter(|| rt.block_on(service.find_page(black_box(spec), &executor)));
        });
    }

    group.finish();
}

fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(30) // Reduced for faster benchmarks
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
        .with_plots()
        .with_output_color(true)
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets = bench_specification_building, bench_memory_listing
}
criterion_main!(benches);
