// benches/codec_bench.rs
//! Benchmarks for decoding page responses and encoding write payloads.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use notiondb::model::{PropertyType, PropertyTypeRegistry, Row, Schema, Value};
use serde_json::{json, Value as Json};
use std::sync::Arc;

fn schema() -> Arc<Schema> {
    Arc::new(
        Schema::from_columns([
            ("Name", PropertyType::Title),
            ("Notes", PropertyType::RichText),
            ("Age", PropertyType::Number),
            ("Tags", PropertyType::MultiSelect),
            ("Done", PropertyType::Checkbox),
            ("Due", PropertyType::Date),
        ])
        .expect("valid schema"),
    )
}

fn page(index: usize) -> Json {
    json!({
        "object": "page",
        "id": format!("59833787-2cf9-4fdf-8782-{:012x}", index),
        "properties": {
            "Name": { "id": "title", "type": "title", "title": [{ "type": "text", "text": { "content": format!("Row {}", index), "link": null }, "plain_text": format!("Row {}", index) }] },
            "Notes": { "id": "n", "type": "rich_text", "rich_text": [] },
            "Age": { "id": "a", "type": "number", "number": index },
            "Tags": { "id": "t", "type": "multi_select", "multi_select": [{ "id": "1", "name": "alpha", "color": "red" }] },
            "Done": { "id": "d", "type": "checkbox", "checkbox": index % 2 == 0 },
            "Due": { "id": "u", "type": "date", "date": { "start": "2024-05-01", "end": null, "time_zone": null } }
        }
    })
}

fn bench_row_decoding(c: &mut Criterion) {
    let schema = schema();
    let mut group = c.benchmark_group("row_decoding");
    for count in [10, 100, 1000] {
        let pages: Vec<Json> = (0..count).map(page).collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &pages, |b, pages| {
            b.iter(|| {
                for page in pages {
                    black_box(Row::from_api_response(page, Arc::clone(&schema)).expect("valid page"));
                }
            })
        });
    }
    group.finish();
}

fn bench_row_payload(c: &mut Criterion) {
    let schema = schema();
    let rows: Vec<Row> = (0..100)
        .map(|i| Row::from_api_response(&page(i), Arc::clone(&schema)).expect("valid page"))
        .collect();
    c.bench_function("row_payload_100", |b| {
        b.iter(|| {
            for row in &rows {
                black_box(row.to_api_payload());
            }
        })
    });
}

fn bench_registry(c: &mut Criterion) {
    let registry = PropertyTypeRegistry::new();
    let tags = Value::from(vec!["alpha", "beta", "gamma"]);
    c.bench_function("registry_multi_select", |b| {
        b.iter(|| {
            let payload = registry
                .encode(PropertyType::MultiSelect, black_box(&tags))
                .expect("encodes");
            black_box(registry.decode(PropertyType::MultiSelect, &payload).expect("decodes"))
        })
    });
}

criterion_group!(benches, bench_row_decoding, bench_row_payload, bench_registry);
criterion_main!(benches);
