use bitcoin::hex::FromHex;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use keyio::{decode_destination, extract_destinations, solver, Params};

struct BenchCase {
    name: &'static str,
    script_pubkey: Vec<u8>,
    address: &'static str,
}

fn cases() -> Vec<BenchCase> {
    vec![
        BenchCase {
            name: "p2pkh",
            script_pubkey: Vec::from_hex("76a91462e907b15cbf27d5425399ebf6f0fb50ebb88f1888ac")
                .unwrap(),
            address: "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa",
        },
        BenchCase {
            name: "p2sh",
            script_pubkey: Vec::from_hex("a9148f55563b9a19f321c211e9b9f38cdf686ea0784587")
                .unwrap(),
            address: "3EktnHQD7RiAE6uzMj2ZifT9YgRrkSgzQX",
        },
        BenchCase {
            name: "p2wpkh",
            script_pubkey: Vec::from_hex("0014751e76e8199196d454941c45d1b3a323f1433bd6").unwrap(),
            address: "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4",
        },
        BenchCase {
            name: "p2wsh",
            script_pubkey: Vec::from_hex(
                "00201863143c14c5166804bd19203356da136c985678cd4d27a1b8c6329604903262",
            )
            .unwrap(),
            address: "bc1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3q0sl5k7",
        },
        BenchCase {
            name: "p2tr",
            script_pubkey: Vec::from_hex(
                "5120a60869f0dbcf1dc659c9cecbaf8050135ea9e8cdc487053f1dc6880949dc684c",
            )
            .unwrap(),
            address: "bc1p5cyxnuxmeuwuvkwfem96lqzszd02n6xdcjrs20cac6yqjjwudpxqkedrcr",
        },
    ]
}

pub fn codec_bench(c: &mut Criterion) {
    let cases = cases();

    let mut group = c.benchmark_group("classify");
    for case in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(case.name), case, |b, case| {
            b.iter(|| solver(&case.script_pubkey));
        });
    }
    group.finish();

    let mut group = c.benchmark_group("encode");
    for case in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(case.name), case, |b, case| {
            b.iter(|| {
                let mut addresses = Vec::new();
                extract_destinations(&case.script_pubkey, &Params::MAINNET, &mut addresses);
                addresses
            });
        });
    }
    group.finish();

    let mut group = c.benchmark_group("decode");
    for case in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(case.name), case, |b, case| {
            b.iter(|| decode_destination(case.address, &Params::MAINNET));
        });
    }
    group.finish();
}

criterion_group!(benches, codec_bench);
criterion_main!(benches);
