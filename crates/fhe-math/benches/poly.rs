use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fhe_math::crt::CrtContext;
use fhe_math::ntt::NttContext;
use fhe_math::poly::Polynomial;
use num_bigint::BigUint;
use rand::{thread_rng, Rng};

fn random_poly(degree: usize, bound: i64) -> Polynomial {
    let mut rng = thread_rng();
    let coeffs: Vec<i64> = (0..degree).map(|_| rng.gen_range(0..bound)).collect();
    Polynomial::from_i64_slice(degree, &coeffs).unwrap()
}

pub fn poly_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("poly_multiply");
    group.sample_size(30);

    for &degree in [256usize, 1024].iter() {
        let q = 12289u64; // NTT-friendly for degree up to 4096
        let a = random_poly(degree, q as i64);
        let b = random_poly(degree, q as i64);
        let qb = BigUint::from(q);
        let ntt = NttContext::new(degree, q, None).unwrap();
        let crt = CrtContext::new(2, 20, degree).unwrap();

        group.bench_function(BenchmarkId::new("multiply_naive", degree), |bench| {
            bench.iter(|| a.multiply_naive(&b, Some(&qb)));
        });

        group.bench_function(BenchmarkId::new("multiply_ntt", degree), |bench| {
            bench.iter(|| a.multiply(&b, &qb, Some(&ntt), None).unwrap());
        });

        group.bench_function(BenchmarkId::new("multiply_fft", degree), |bench| {
            bench.iter(|| a.multiply_fft(&b).unwrap());
        });

        group.bench_function(BenchmarkId::new("multiply_crt", degree), |bench| {
            bench.iter(|| a.multiply_crt(&b, &crt).unwrap());
        });
    }

    group.finish();
}

criterion_group!(poly, poly_benchmark);
criterion_main!(poly);
