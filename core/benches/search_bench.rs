use criterion::{criterion_group, criterion_main, Criterion};
use lookup_core::{SearchConfig, SearchServer};

fn synthetic_lines(count: usize, words_per_line: usize, vocabulary: usize, seed: usize) -> String {
    let mut out = String::new();
    for line in 0..count {
        for word in 0..words_per_line {
            let id = (line * 31 + word * 17 + seed) % vocabulary;
            out.push_str(&format!("w{id} "));
        }
        out.push('\n');
    }
    out
}

fn bench_round(c: &mut Criterion) {
    let docs = synthetic_lines(2_000, 50, 5_000, 0);
    let queries = synthetic_lines(6_000, 5, 5_000, 7);
    let server = SearchServer::from_documents(docs.as_bytes(), SearchConfig::default()).unwrap();
    c.bench_function("query_round_6000", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            server.add_queries_stream(queries.as_bytes(), &mut out).unwrap();
            out
        })
    });
}

criterion_group!(benches, bench_round);
criterion_main!(benches);
