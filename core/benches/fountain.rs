use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use airgap_qr_core::config::{CodecConfig, Density};
use airgap_qr_core::fountain::{FountainDecoder, FountainEncoder};
use airgap_qr_core::orchestrator::{encode_frames, PayloadKind, TargetConvention};
use airgap_qr_core::session::PayloadScanSession;

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8).collect()
}

fn bench_fountain_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("fountain_decode");
    for &len in &[2_000usize, 20_000, 100_000] {
        let msg = payload(len);
        let encoder = FountainEncoder::new(&msg, 200, 10).unwrap();
        let seq_len = encoder.seq_len();
        // mixed parts only, so elimination does real work
        let parts: Vec<_> = (seq_len + 1..=seq_len * 4).map(|n| encoder.part_at(n)).collect();

        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &parts, |b, parts| {
            b.iter(|| {
                let mut decoder = FountainDecoder::new();
                for part in parts {
                    if decoder.receive(part).unwrap() == airgap_qr_core::fountain::PartOutcome::Complete {
                        break;
                    }
                }
                black_box(decoder.is_complete())
            })
        });
    }
    group.finish();
}

fn bench_scan_session(c: &mut Criterion) {
    let data = payload(20_000);
    let config = CodecConfig::with_density(Density::High);
    let mut group = c.benchmark_group("scan_session");

    for (name, target) in [
        ("fountain", TargetConvention::FountainModern),
        ("segmented", TargetConvention::Segmented),
        ("simple", TargetConvention::Simple),
    ] {
        let encoded = encode_frames(&data, &target, PayloadKind::Psbt, &config).unwrap();
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut session = PayloadScanSession::new();
                for frame in &encoded.frames {
                    session.receive_text(frame).unwrap();
                    if session.is_complete() {
                        break;
                    }
                }
                black_box(session.into_payload())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fountain_decode, bench_scan_session);
criterion_main!(benches);
