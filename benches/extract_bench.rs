//! Benchmarks for maildir-extract
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use maildir_extract::counter::Counter;
use maildir_extract::extract::{is_candidate, Extractor};
use maildir_extract::mime::ParsedMessage;
use regex::Regex;
use std::sync::Arc;

const MESSAGE: &[u8] = b"Message-Id: <bench@example.com>\r\n\
Content-Type: multipart/mixed; boundary=\"B\"\r\n\
\r\n\
--B\r\n\
Content-Type: text/plain\r\n\
\r\n\
hello\r\n\
--B\r\n\
Content-Type: application/pdf\r\n\
Content-Disposition: attachment; filename=\"report.pdf\"\r\n\
Content-Transfer-Encoding: base64\r\n\
\r\n\
JVBERi0xLjQK\r\n\
--B\r\n\
Content-Type: image/png\r\n\
Content-Disposition: inline; filename=\"logo.png\"\r\n\
\r\n\
png\r\n\
--B--\r\n";

fn benchmark_classify(c: &mut Criterion) {
    let parsed = ParsedMessage::new(mailparse::parse_mail(MESSAGE).unwrap());

    c.bench_function("classify_parts", |b| {
        b.iter(|| {
            let mut candidates = 0;
            parsed.for_each_part(|p| {
                if is_candidate(p) {
                    candidates += 1;
                }
            });
            black_box(candidates);
        })
    });
}

fn benchmark_dry_run_extract(c: &mut Criterion) {
    let parsed = ParsedMessage::new(mailparse::parse_mail(MESSAGE).unwrap());
    let extractor = Extractor::new(
        "unused".into(),
        Regex::new(r"\.pdf$").unwrap(),
        true,
        Arc::new(Counter::new()),
    );

    c.bench_function("extract_dry_run", |b| {
        b.iter(|| black_box(extractor.extract("bench", &parsed)))
    });
}

criterion_group!(benches, benchmark_classify, benchmark_dry_run_extract);
criterion_main!(benches);
