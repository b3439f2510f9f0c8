use criterion::{Criterion, criterion_group, criterion_main};
use orcalog::{LogDocument, Postmortem, classify};

pub fn classify_opt(c: &mut Criterion) {
    let doc = LogDocument::load("testfiles/h2o_opt.out").unwrap();
    c.bench_function("classify", |b| b.iter(|| classify(&doc)));
    c.bench_function("postmortem", |b| b.iter(|| Postmortem::track(&doc)));
}

criterion_group!(benches, classify_opt);
criterion_main!(benches);
