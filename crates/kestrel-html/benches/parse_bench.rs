//! Throughput benchmarks for the tokenizer, parser and tree builder.
#![allow(missing_docs)]

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kestrel_html::{
    EventCollector, Parser, ParserOptions, TreeBuilder, TreeBuilderOptions, decode_html,
    parse_document,
};

const SMALL_BLOCKS: usize = 64;
const LARGE_BLOCKS: usize = 20_000;
const CHUNK_SIZE: usize = 256;

fn make_blocks(blocks: usize) -> String {
    let block = "<div class=box><span title=\"a &amp; b\">hello &copy; world</span>\
<img src=x><p>one<p>two</div><!-- c -->";
    let mut out = String::with_capacity(block.len() * blocks);
    for _ in 0..blocks {
        out.push_str(block);
    }
    out
}

fn make_rawtext_adversarial(bytes: usize) -> String {
    let mut body = String::with_capacity(bytes + 32);
    body.push_str("<script>");
    while body.len() < bytes {
        body.push_str("</scri<pt");
    }
    body.push_str("</script>");
    body
}

fn make_entity_heavy(bytes: usize) -> String {
    let mut body = String::with_capacity(bytes + 16);
    while body.len() < bytes {
        body.push_str("&amp;&lt;&#x41;&notin;&copy &NotEqualTilde; ");
    }
    body
}

fn bench_parse_small(c: &mut Criterion) {
    let input = make_blocks(SMALL_BLOCKS);
    c.bench_function("bench_parse_small", |b| {
        b.iter(|| {
            let mut parser = Parser::new(EventCollector::new(), ParserOptions::html());
            let _ = parser.end(Some(black_box(&input)));
            black_box(parser.handler().events().len());
        });
    });
}

fn bench_parse_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    c.bench_function("bench_parse_large", |b| {
        b.iter(|| {
            let mut parser = Parser::new(EventCollector::new(), ParserOptions::html());
            let _ = parser.end(Some(black_box(&input)));
            black_box(parser.handler().events().len());
        });
    });
}

fn bench_parse_chunked_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    // The blocks are ASCII, so every byte chunk is valid UTF-8.
    let chunks: Vec<&str> = input
        .as_bytes()
        .chunks(CHUNK_SIZE)
        .filter_map(|c| std::str::from_utf8(c).ok())
        .collect();
    c.bench_function("bench_parse_chunked_large", |b| {
        b.iter_batched(
            || Parser::new(EventCollector::new(), ParserOptions::html()),
            |mut parser| {
                for chunk in &chunks {
                    let _ = parser.write(black_box(chunk));
                }
                let _ = parser.end(None);
                black_box(parser.handler().events().len());
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_tree_build_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    c.bench_function("bench_tree_build_large", |b| {
        b.iter(|| {
            let tree = parse_document(black_box(&input), ParserOptions::html());
            black_box(tree.len());
        });
    });
}

fn bench_tree_build_with_indices(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    c.bench_function("bench_tree_build_with_indices", |b| {
        b.iter(|| {
            let builder = TreeBuilder::new(
                TreeBuilderOptions::default()
                    .with_start_indices(true)
                    .with_end_indices(true),
            );
            let mut parser = Parser::new(builder, ParserOptions::html());
            let _ = parser.end(Some(black_box(&input)));
            black_box(parser.into_handler().into_tree().len());
        });
    });
}

fn bench_rawtext_adversarial(c: &mut Criterion) {
    let input = make_rawtext_adversarial(1 << 20);
    c.bench_function("bench_rawtext_adversarial", |b| {
        b.iter(|| {
            let mut parser = Parser::new(EventCollector::new(), ParserOptions::html());
            let _ = parser.end(Some(black_box(&input)));
            black_box(parser.handler().events().len());
        });
    });
}

fn bench_decode_entities(c: &mut Criterion) {
    let input = make_entity_heavy(1 << 18);
    c.bench_function("bench_decode_entities", |b| {
        b.iter(|| black_box(decode_html(black_box(&input))).len());
    });
}

criterion_group!(
    benches,
    bench_parse_small,
    bench_parse_large,
    bench_parse_chunked_large,
    bench_tree_build_large,
    bench_tree_build_with_indices,
    bench_rawtext_adversarial,
    bench_decode_entities
);
criterion_main!(benches);
