use criterion::{Criterion, black_box, criterion_group, criterion_main};
use regex::Regex;
use ssed::interpreter::{Context, Transform};
use ssed::operators::Substitute;
use ssed::pattern::Pattern;

fn make_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("line {} with some foo and more foo text", i))
        .collect()
}

fn bench_substitute(c: &mut Criterion) {
    let ctx = Context::default();
    let small = make_lines(100);
    let large = make_lines(100_000);

    let first = Substitute::new(
        Pattern::from_regex(Regex::new("foo").unwrap()),
        "bar".to_string(),
        false,
    );
    let global = Substitute::new(
        Pattern::from_regex(Regex::new("foo").unwrap()),
        "bar".to_string(),
        true,
    );
    let no_match = Substitute::new(
        Pattern::from_regex(Regex::new("zzz").unwrap()),
        "bar".to_string(),
        true,
    );

    c.bench_function("substitute_first_100", |b| {
        b.iter(|| black_box(first.apply(small.clone(), &ctx)))
    });

    c.bench_function("substitute_first_100k", |b| {
        b.iter(|| black_box(first.apply(large.clone(), &ctx)))
    });

    c.bench_function("substitute_global_100k", |b| {
        b.iter(|| black_box(global.apply(large.clone(), &ctx)))
    });

    c.bench_function("substitute_no_match_100k", |b| {
        b.iter(|| black_box(no_match.apply(large.clone(), &ctx)))
    });

    c.bench_function("substitute_captures_100k", |b| {
        let swap = Substitute::new(
            Pattern::from_regex(Regex::new(r"(\w+) (\d+)").unwrap()),
            "$2 $1".to_string(),
            false,
        );
        b.iter(|| black_box(swap.apply(large.clone(), &ctx)))
    });
}

criterion_group!(benches, bench_substitute);
criterion_main!(benches);
