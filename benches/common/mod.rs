#![allow(dead_code)]
use std::fmt::Write;
use std::path::Path;

use pasparse::ast::Program;
use pasparse::parser;
use test_support::load_cases;

/// Fixture programs flagged with `bench: true`, plus a generated long program.
pub fn workloads() -> Vec<(String, String)> {
    let cases = load_cases(Path::new("tests/programs")).expect("load fixture cases");
    let mut workloads = cases
        .into_iter()
        .filter(|case| case.spec.bench)
        .map(|case| {
            let source = case.read_program().expect("read fixture program");
            (case.name, source)
        })
        .collect::<Vec<_>>();
    workloads.push(("long".to_string(), long_program(2_000)));
    workloads
}

/// Straight-line program with `statements` assignments and one call per hundred.
pub fn long_program(statements: usize) -> String {
    let mut source = String::from(
        "program Long;\nvar a, b, c : integer;\n\
         procedure Bump(x, y : integer);\nvar t : integer;\nbegin\n   t := x * y div (y + 1)\nend;\n\
         begin\n   a := 1;\n   b := 2;\n",
    );
    for index in 0..statements {
        if index % 100 == 0 {
            let _ = writeln!(source, "   Bump(a, {index});");
        }
        let _ = writeln!(source, "   c := (a + b * {index}) div 3 - -b;");
    }
    source.push_str("end.\n");
    source
}

pub fn load_program(source: &str) -> Program {
    parser::parse(source).unwrap_or_else(|err| panic!("parse: {err}"))
}
