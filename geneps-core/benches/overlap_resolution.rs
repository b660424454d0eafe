use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use geneps_core::overlap::resolve_overlaps;
use geneps_core::prediction::PredictionCandidate;
use geneps_core::types::{AlignmentResult, LengthConfidence, Region};

use criterion_config::configure_criterion;

// Tandem loci: every fourth candidate starts a new locus, the rest overlap it.
fn tandem_candidates(count: usize) -> Vec<PredictionCandidate> {
    (0..count)
        .map(|i| {
            let locus = (i / 4) as i64 * 5_000;
            let start = locus + (i % 4) as i64 * 20;
            let region = Region {
                contig: "chrI".to_string(),
                cluster: format!("cluster_{}", i % 4),
                strand: if i % 9 == 0 { "-" } else { "+" }.to_string(),
                start,
                end: start + 2_000,
                chunk_coverage: 85.0,
                query_coverage: 90.0,
                query_length: 400,
            };
            let alignment = AlignmentResult {
                protein: "M".repeat(400),
                local_coordinates: (100, 1_300),
                ..Default::default()
            };
            PredictionCandidate::new(
                "kinases",
                &region.cluster.clone(),
                region,
                alignment,
                100.0 + (i % 13) as f64,
                50.0,
                LengthConfidence::new(300.0, 500.0),
            )
            .unwrap()
        })
        .collect()
}

fn bench_resolve_overlaps(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_overlaps");
    for count in [16, 128, 512] {
        let candidates = tandem_candidates(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &candidates, |b, candidates| {
            b.iter(|| resolve_overlaps(black_box(candidates.clone())));
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets = bench_resolve_overlaps
}
criterion_main!(benches);
