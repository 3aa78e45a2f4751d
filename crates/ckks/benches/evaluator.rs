use std::rc::Rc;

use ckks::encoder::CkksEncoder;
use ckks::encryptor::Encryptor;
use ckks::keys::{PublicKey, RelinKey, SecretKey};
use ckks::parameters::CkksParametersBuilder;
use ckks::Evaluator;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fhe_math::sampling::ChaChaRandomSource;
use num_bigint::BigUint;
use num_complex::Complex64;

pub fn evaluator_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("ckks_evaluator");
    group.sample_size(20);

    for &degree in [16usize, 32].iter() {
        let par = Rc::new(
            CkksParametersBuilder::default()
                .poly_degree(degree)
                .ciph_modulus(BigUint::from(1u64) << 40)
                .big_modulus(BigUint::from(1u64) << 1200)
                .scaling_factor((1u64 << 30) as f64)
                .hamming_weight(degree / 2)
                .build()
                .unwrap(),
        );
        let mut rng = ChaChaRandomSource::new([42u8; 32]);
        let sk = SecretKey::generate(&par, &mut rng);
        let pk = PublicKey::generate(&sk, &mut rng);
        let relin_key = RelinKey::generate(&sk, &mut rng);
        let encryptor = Encryptor::new(pk);
        let evaluator = Evaluator::new(par.clone());
        let encoder = CkksEncoder::new(par.clone());

        let values = vec![Complex64::new(3.0, 0.0); par.num_slots()];
        let pt = encoder.encode(&values, par.scaling_factor()).unwrap();
        let ct_a = encryptor.encrypt(&pt, &mut rng);
        let ct_b = encryptor.encrypt(&pt, &mut rng);

        group.bench_function(BenchmarkId::new("add", degree), |bench| {
            bench.iter(|| evaluator.add(&ct_a, &ct_b));
        });

        group.bench_function(BenchmarkId::new("multiply", degree), |bench| {
            bench.iter(|| evaluator.multiply(&ct_a, &ct_b, &relin_key));
        });
    }

    group.finish();
}

criterion_group!(evaluator, evaluator_benchmark);
criterion_main!(evaluator);
