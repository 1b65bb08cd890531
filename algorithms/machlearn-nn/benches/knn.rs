use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use machlearn::prelude::*;
use machlearn_nn::{CommonDistance, KNearestNeighbors};
use ndarray::{Array1, Array2};
use ndarray_rand::{rand::SeedableRng, rand_distr::Uniform, RandomExt};
use rand::rngs::SmallRng;

fn knn_predict_bench(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(40);
    let mut benchmark = c.benchmark_group("knn_predict");
    let n_features = 3;
    let distr = Uniform::new(-500., 500.);

    let distances = &[
        (CommonDistance::L2Dist, "euclidean"),
        (CommonDistance::L1Dist, "manhattan"),
        (CommonDistance::LpDist(3.0), "minkowski-3"),
    ];

    for &(n_points, k) in &[(1000, 5), (10000, 10), (10000, 100)] {
        let records = Array2::random_using((n_points, n_features), distr, &mut rng);
        let targets = records
            .rows()
            .into_iter()
            .map(|row| row.sum() > 0.)
            .collect::<Array1<_>>();
        let dataset = Dataset::new(records, targets);
        let queries = Array2::random_using((100, n_features), distr, &mut rng);

        for (dist, name) in distances {
            let model = KNearestNeighbors::params_with_distance(*dist)
                .n_neighbors(k)
                .fit(&dataset)
                .unwrap();
            benchmark.bench_with_input(
                BenchmarkId::new(*name, format!("{}-{}", n_points, k)),
                &queries,
                |bencher, queries| bencher.iter(|| model.predict(queries)),
            );
        }
    }

    benchmark.finish();
}

criterion_group!(benches, knn_predict_bench);
criterion_main!(benches);
