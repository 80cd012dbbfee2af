//! # Signature Engine Benchmarks
//!
//! | Operation | Scheme | Payload |
//! |-----------|--------|---------|
//! | recover | REGULAR | canonical request |
//! | verify | DER, TON | canonical request |
//! | address derivation | secp256k1, ed25519 | - |

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kc_01_signature_engine::{ClientKey, SignatureEngine, SignatureEngineApi};
use serde_json::json;
use shared_types::{canonical_payload, SigningScheme};
use std::time::Duration;

fn request() -> Vec<u8> {
    canonical_payload(&json!({
        "method": "Transfer",
        "to": "client|bob",
        "amount": "1000000",
        "uniqueKey": "bench-0001",
        "transactionExpiresAt": 1_750_000_000_000i64
    }))
}

fn bench_recover(c: &mut Criterion) {
    let mut group = c.benchmark_group("kc-01-recover");
    group.measurement_time(Duration::from_secs(5));

    let engine = SignatureEngine::default();
    let key = ClientKey::generate_secp256k1();
    let payload = request();
    let signature = key.sign_bytes(SigningScheme::Regular, &payload).unwrap();

    group.bench_function("regular", |b| {
        b.iter(|| {
            engine
                .recover(SigningScheme::Regular, black_box(&payload), black_box(&signature))
                .unwrap()
        })
    });
    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("kc-01-verify");
    group.measurement_time(Duration::from_secs(5));

    let engine = SignatureEngine::default();
    let payload = request();
    for scheme in [SigningScheme::Der, SigningScheme::Ton] {
        let key = ClientKey::generate_for(scheme);
        let public_key = key.public_key();
        let signature = key.sign_bytes(scheme, &payload).unwrap();

        group.bench_function(scheme.to_string(), |b| {
            b.iter(|| {
                engine
                    .verify(scheme, black_box(&payload), black_box(&signature), &public_key)
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_address(c: &mut Criterion) {
    let mut group = c.benchmark_group("kc-01-address");
    let engine = SignatureEngine::default();

    let secp = ClientKey::generate_secp256k1().public_key();
    group.bench_function("secp256k1", |b| b.iter(|| engine.address_of(black_box(&secp))));

    let ed = ClientKey::generate_ed25519().public_key();
    group.bench_function("ed25519", |b| b.iter(|| engine.address_of(black_box(&ed))));
    group.finish();
}

criterion_group!(benches, bench_recover, bench_verify, bench_address);
criterion_main!(benches);
