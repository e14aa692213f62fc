//! Benchmarks for commitment hashing and order signing.
//!
//! Run with: `cargo bench --bench commitment`

use alloy_primitives::{Address, B256, U256};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lending_core::signing::{solidity_keccak256, LocalCustodian, PackedValue};
use lending_core::{CommitmentHasher, DebtOrder, Role, SignerService};
use std::sync::Arc;

const DEBTOR_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn bench_order(debtor: Address) -> DebtOrder {
    DebtOrder {
        kernel_version: Some(Address::repeat_byte(0x10)),
        issuance_version: Some(Address::repeat_byte(0x11)),
        principal_amount: Some(U256::from(1000u64)),
        principal_token: Some(Address::repeat_byte(0x12)),
        debtor: Some(debtor),
        debtor_fee: Some(U256::ZERO),
        creditor: Some(Address::repeat_byte(0xb2)),
        creditor_fee: Some(U256::ZERO),
        relayer: Some(Address::ZERO),
        relayer_fee: Some(U256::ZERO),
        underwriter: Some(Address::repeat_byte(0xc3)),
        underwriter_fee: Some(U256::from(11u64)),
        underwriter_risk_rating: Some(U256::from(250u64)),
        terms_contract: Some(Address::repeat_byte(0x14)),
        terms_contract_parameters: Some(B256::repeat_byte(0x42)),
        expiration_timestamp_in_sec: Some(U256::from(1_700_000_000u64)),
        salt: Some(U256::from(1u64)),
    }
}

/// Benchmark the packed keccak routine over increasing tuple lengths.
fn bench_packed_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("solidity_keccak256");

    for len in [1usize, 7, 10].iter() {
        let values: Vec<PackedValue> = (0..*len)
            .map(|i| {
                if i % 2 == 0 {
                    PackedValue::Address(Address::repeat_byte(i as u8))
                } else {
                    PackedValue::Uint256(U256::from(i as u64))
                }
            })
            .collect();

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("values", len), &values, |b, values| {
            b.iter(|| black_box(solidity_keccak256(black_box(values))))
        });
    }

    group.finish();
}

/// Benchmark each commitment derivation from a complete order.
fn bench_commitment_hashes(c: &mut Criterion) {
    let mut group = c.benchmark_group("commitment_hashes");
    let order = bench_order(Address::repeat_byte(0xa1));
    let hasher = match CommitmentHasher::from_order(&order) {
        Ok(hasher) => hasher,
        Err(e) => panic!("benchmark order is incomplete: {e}"),
    };

    group.throughput(Throughput::Elements(1));
    group.bench_function("from_order", |b| {
        b.iter(|| black_box(CommitmentHasher::from_order(black_box(&order))))
    });
    group.bench_function("issuance_commitment_hash", |b| {
        b.iter(|| black_box(hasher.issuance_commitment_hash()))
    });
    group.bench_function("order_hash", |b| b.iter(|| black_box(hasher.order_hash())));
    group.bench_function("underwriter_commitment_hash", |b| {
        b.iter(|| black_box(hasher.underwriter_commitment_hash()))
    });
    group.bench_function("agreement_id", |b| b.iter(|| black_box(hasher.agreement_id())));

    group.finish();
}

/// Benchmark a full debtor signature with an in-process key.
fn bench_sign_as_debtor(c: &mut Criterion) {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => panic!("failed to start runtime: {e}"),
    };
    let custodian = match LocalCustodian::from_private_keys([DEBTOR_KEY]) {
        Ok(custodian) => custodian,
        Err(e) => panic!("invalid benchmark key: {e}"),
    };
    let debtor = runtime.block_on(custodian.accounts())[0];
    let signer = SignerService::new(Arc::new(custodian));
    let order = bench_order(debtor);

    let mut group = c.benchmark_group("signing");
    group.throughput(Throughput::Elements(1));
    group.bench_function("sign_as_debtor", |b| {
        b.iter(|| black_box(runtime.block_on(signer.sign_as(black_box(&order), Role::Debtor))))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_packed_hash,
    bench_commitment_hashes,
    bench_sign_as_debtor,
);

criterion_main!(benches);
