mod common;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pasparse::interpreter::{Interpreter, InterpreterConfig};
use pasparse::run_source;

fn bench_interpreter(c: &mut Criterion) {
    for (label, source) in common::workloads() {
        let program = common::load_program(&source);

        c.bench_function(&format!("interpreter_evaluate_{label}"), |b| {
            let interpreter = Interpreter::new();
            b.iter(|| {
                let bindings = interpreter.evaluate(black_box(&program)).expect("evaluate");
                black_box(bindings);
            })
        });

        c.bench_function(&format!("interpreter_pipeline_{label}"), |b| {
            b.iter(|| {
                let run = run_source(black_box(&source), InterpreterConfig::default())
                    .expect("run");
                black_box(run);
            })
        });
    }
}

criterion_group!(benches, bench_interpreter);
criterion_main!(benches);
