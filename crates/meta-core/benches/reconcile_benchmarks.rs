use criterion::{Criterion, black_box, criterion_group, criterion_main};
use meta_core::{ReconciliationPlan, SchemaDiff};
use meta_model::{Column, Database, Schema, Table};

fn database(schemas: usize, tables: usize, offset: usize) -> Database {
    let mut database = Database::new("bench_db");
    for s in 0..schemas {
        let mut schema = Schema::new(format!("schema_{}", s));
        for t in offset..offset + tables {
            schema.put_table(
                Table::new(format!("t_{}", t))
                    .with_column(Column::new("id", "BIGINT").primary_key())
                    .with_column(Column::new("payload", "TEXT")),
            );
        }
        database.put_schema(schema);
    }
    database
}

fn schema_diff_benchmark(c: &mut Criterion) {
    let current = database(4, 500, 0);
    let reload = database(4, 500, 50);

    c.bench_function("reconcile::SchemaDiff::compute", |b| {
        b.iter(|| SchemaDiff::compute(black_box(&reload), black_box(&current)))
    });

    let diff = SchemaDiff::compute(&reload, &current);
    c.bench_function("reconcile::ReconciliationPlan::by_alter", |b| {
        b.iter(|| ReconciliationPlan::by_alter(black_box(&diff)))
    });
}

criterion_group!(benches, schema_diff_benchmark);
criterion_main!(benches);
