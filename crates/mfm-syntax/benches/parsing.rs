use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mfm_syntax::{ParseOptions, parse, parse_with};

fn generate_post(size: usize) -> String {
    let base = "Hello @ai@misskey.io! **bold** and <i>italic</i> with :blobcat: 🍮\n\
                > quoted $[spin.speed=2s text] #tag\n\
                see https://misskey.io/notes/abc, or [docs](https://misskey-hub.net)\n\
                ```js\nconst a = 1;\n```\n";
    base.repeat(size)
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(20);

    for size in [1, 10, 100] {
        let content = generate_post(size);
        group.bench_with_input(BenchmarkId::new("parse", size), &content, |b, content| {
            b.iter(|| parse(std::hint::black_box(content)));
        });
    }

    group.finish();
}

fn bench_unclosed_nesting(c: &mut Criterion) {
    let mut group = c.benchmark_group("unclosed_nesting");
    group.sample_size(10);

    // Openers that never close force every rule to backtrack.
    let content = "<b>".repeat(8) + &"~~".repeat(4) + "text";
    let options = ParseOptions::default();
    group.bench_function("tags", |b| {
        b.iter(|| parse_with(std::hint::black_box(&content), &options));
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_unclosed_nesting);
criterion_main!(benches);
