mod common;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pasparse::{lexer, parser, semantic};

fn bench_frontend(c: &mut Criterion) {
    for (label, source) in common::workloads() {
        let program = common::load_program(&source);

        c.bench_function(&format!("frontend_tokenize_{label}"), |b| {
            b.iter(|| {
                let out = lexer::tokenize(black_box(&source)).expect("tokenize");
                black_box(out);
            })
        });

        c.bench_function(&format!("frontend_parse_{label}"), |b| {
            b.iter(|| {
                let out = parser::parse(black_box(&source)).expect("parse");
                black_box(out);
            })
        });

        c.bench_function(&format!("frontend_analyze_{label}"), |b| {
            b.iter(|| {
                let out = semantic::analyze(black_box(&program)).expect("analyze");
                black_box(out);
            })
        });
    }
}

criterion_group!(benches, bench_frontend);
criterion_main!(benches);
