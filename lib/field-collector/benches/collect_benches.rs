use criterion::{criterion_group, criterion_main, Criterion};
use field_collector::ast::Document;
use field_collector::collect::{CollectFieldsOptions, FieldCollector};
use field_collector::operation::ExecutableOperation;
use field_collector::plan::build_field_plan;
use field_collector::state::schema_state::SchemaState;
use field_collector::utils::parsing::{parse_operation, parse_schema};
use std::hint::black_box;

fn get_operation(operation_path: &str) -> Document {
    let document_text = std::fs::read_to_string(operation_path).expect("Unable to read input file");
    parse_operation(&document_text).expect("failed to parse operation")
}

fn get_schema_state(schema_path: &str) -> SchemaState {
    let schema_sdl = std::fs::read_to_string(schema_path).expect("Unable to read input file");
    SchemaState::new(&parse_schema(&schema_sdl).expect("failed to parse schema"))
}

fn collect_fields_root(c: &mut Criterion) {
    let schema = get_schema_state("fixture/bench/schema.graphql");
    let document = get_operation("fixture/bench/operation.graphql");
    let operation = ExecutableOperation::from_document(&document, Some("TestQuery"))
        .expect("failed to select operation");
    let variables = operation
        .coerce_variables(None)
        .expect("failed to coerce variables");
    let collector = FieldCollector::new(&schema, operation.fragments(), &variables, &operation);

    c.bench_function("collect_fields", |b| {
        b.iter(|| {
            let result = black_box(&collector).collect_fields(black_box("Query"));
            black_box(result);
        })
    });
}

fn field_plan_pipeline(c: &mut Criterion) {
    let schema = get_schema_state("fixture/bench/schema.graphql");
    let document = get_operation("fixture/bench/operation.graphql");
    let operation = ExecutableOperation::from_document(&document, Some("TestQuery"))
        .expect("failed to select operation");
    let variables = operation
        .coerce_variables(None)
        .expect("failed to coerce variables");

    c.bench_function("field_plan", |b| {
        b.iter(|| {
            let plan = build_field_plan(
                black_box(&schema),
                black_box(&operation),
                black_box(&variables),
                CollectFieldsOptions::default(),
            )
            .expect("build_field_plan failed during benchmark");
            black_box(plan);
        })
    });
}

criterion_group!(benches, collect_fields_root, field_plan_pipeline);
criterion_main!(benches);
