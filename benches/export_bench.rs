use criterion::{criterion_group, criterion_main, Criterion};

use agreekit::{render_agreement, AgreementDraft, TemplateOptions};

fn bench_render_agreement(c: &mut Criterion) {
    let mut draft = AgreementDraft::default();
    draft.name = "Jane Doe".to_string();
    draft.email = "jane@example.com".to_string();
    let options = TemplateOptions::default();

    c.bench_function("render_agreement", |b| {
        b.iter(|| render_agreement(&draft, &options))
    });
}

fn bench_export_filename(c: &mut Criterion) {
    c.bench_function("export_filename", |b| {
        b.iter(|| agreekit::export_filename("Jane van Doe"))
    });
}

criterion_group!(benches, bench_render_agreement, bench_export_filename);
criterion_main!(benches);
