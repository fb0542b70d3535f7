use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dail_corpus::annotate::{annotate, GroupedAnnotator, LexiconTagger, RawInput, TokenFilter};

pub fn grouped(c: &mut Criterion) {
    let inputs: Vec<RawInput> = [
        "The bill passed.",
        "Order, order!",
        "The Deputy for Cork asked the Minister whether he would stop quickly.",
        "It is so.",
        "The motion was carried without a division, and the House adjourned.",
    ]
    .iter()
    .cycle()
    .take(1000)
    .enumerate()
    .map(|(position, text)| RawInput {
        position,
        text: text.to_string(),
    })
    .collect();

    let annotator = GroupedAnnotator::new(Arc::new(LexiconTagger::default()), TokenFilter::default());
    c.bench_function("grouped_annotate", |b| {
        b.iter(|| {
            let inputs = inputs.clone();
            annotate(&annotator, black_box(inputs), 100).count()
        })
    });
}

criterion_group!(benches, grouped);
criterion_main!(benches);
