use criterion::{Criterion, black_box, criterion_group, criterion_main};
use slisp::{Environment, evaluate, parse_str, tokenize};

// A reasonably deep program exercising every special form and most built-ins
const BENCH_INPUT: &str = r#"
(begin
  ; Area of a circle
  (define r 10)
  (define area (* pi (* r r)))
  (define big (> area 300))
  (if (and big (not False) (or False True))
      (+ (pow 2 10) (log10 1000) (- area) (/ 1 3) (* 1 2 3 4))
      (- 1))
  (+ (+ 10 1) (+ 30 (+ 1 1)) (+ (+ 10 1) (+ 30 (+ 1 1))) (+ (+ 10 1) (+ 30 (+ 1 1))))
  (if (<= r 10) (>= r 10) (= r 10)))
"#;

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize", |b| b.iter(|| tokenize(black_box(BENCH_INPUT))));
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse", |b| b.iter(|| parse_str(black_box(BENCH_INPUT))));
}

fn bench_evaluate(c: &mut Criterion) {
    let program = parse_str(BENCH_INPUT).expect("benchmark program should parse");
    c.bench_function("evaluate", |b| {
        b.iter(|| {
            // Fresh environment each run, since redefining would fail
            let mut env = Environment::new();
            evaluate(black_box(&program), &mut env)
        })
    });
}

criterion_group!(benches, bench_tokenize, bench_parse, bench_evaluate);
criterion_main!(benches);
