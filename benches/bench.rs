// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use criterion::*;
use ndarray::prelude::*;

use acb_clean::{
    clean::{basis_functions, psfs},
    clean_amplitudes, convolve, CleanConfig, NoopObserver, WorkerCount,
};

fn convolution(c: &mut Criterion) {
    let a = Array2::from_shape_fn((64, 64), |(x, y)| ((x * 7 + y * 3) % 11) as f64);
    let b = Array2::from_shape_fn((64, 64), |(x, y)| ((x + 2 * y) % 5) as f64);

    let mut group = c.benchmark_group("convolve 64x64 * 64x64");
    for workers in [1, 4] {
        let w = WorkerCount::new(workers).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(workers), &w, |bencher, &w| {
            bencher.iter(|| convolve(a.view(), b.view(), w))
        });
    }
    group.finish();
}

fn scale_space(c: &mut Criterion) {
    c.bench_function("PSFs, 5 scales, 64x64", |b| b.iter(|| psfs(5, 64)));
    c.bench_function("basis functions, 5 scales, 64x64", |b| {
        b.iter(|| basis_functions(5, 64))
    });
}

fn clean(c: &mut Criterion) {
    let frequencies: Vec<f64> = (0..32).map(|i| 1.4e9 + i as f64 * 1e6).collect();
    let amplitudes: Vec<f64> = (0..32).map(|i| 1.0 / (1.0 + i as f64)).collect();
    let config = CleanConfig {
        max_iterations: 10,
        ..Default::default()
    };

    let mut group = c.benchmark_group("clean");
    group.sample_size(10);
    group.bench_function("32 amplitudes, 3 scales, 32x32", |b| {
        b.iter(|| {
            clean_amplitudes(
                &frequencies,
                &amplitudes,
                3,
                32,
                &config,
                &mut NoopObserver,
            )
        })
    });
    group.finish();
}

criterion_group!(benches, convolution, scale_space, clean);
criterion_main!(benches);
