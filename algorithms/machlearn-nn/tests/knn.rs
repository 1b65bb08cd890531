use machlearn::prelude::*;
use machlearn_nn::{distance::LpDist, CommonDistance, KNearestNeighbors};
use ndarray::{concatenate, Array, Array1, Axis};
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::SmallRng;

/// Two well separated square blobs
fn blobs(per_blob: usize, seed: u64) -> Dataset<f64, usize> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let low = Array::random_using((per_blob, 2), Uniform::new(0., 4.), &mut rng);
    let high = Array::random_using((per_blob, 2), Uniform::new(6., 10.), &mut rng);

    let records = concatenate(Axis(0), &[low.view(), high.view()]).unwrap();
    let targets = (0..2 * per_blob)
        .map(|idx| idx / per_blob)
        .collect::<Array1<_>>();

    Dataset::new(records, targets)
}

#[test]
fn separated_blobs_are_classified() {
    let mut rng = SmallRng::seed_from_u64(7);
    let (train, valid) = blobs(100, 3).shuffle(&mut rng).split_with_ratio(0.7);

    for dist in &[
        CommonDistance::L1Dist,
        CommonDistance::L2Dist,
        CommonDistance::LInfDist,
        CommonDistance::LpDist(3.0),
    ] {
        let model = KNearestNeighbors::params_with_distance(*dist)
            .fit(&train)
            .expect("Training failed");

        let accuracy = model
            .predict(valid.records())
            .confusion_matrix(&valid)
            .expect("Failed to compute confusion matrix")
            .accuracy();
        assert!(
            (accuracy - 1.0).abs() < f32::EPSILON,
            "{:?} reached only {:.2}",
            dist,
            accuracy
        );
    }
}

#[test]
fn parallel_predictions_keep_row_order() -> machlearn_nn::Result<()> {
    let train = blobs(30, 11);
    let model = KNearestNeighbors::params_with_distance(LpDist(1.5))
        .n_neighbors(7)
        .fit(&train)?;

    let mut rng = SmallRng::seed_from_u64(5);
    let queries = Array::random_using((200, 2), Uniform::new(0., 10.), &mut rng);
    let predictions = model.predict(&queries);

    // recount every vote from the reported neighbourhood
    for (query, prediction) in queries.rows().into_iter().zip(predictions.iter()) {
        let neighbours = model.kneighbors(query)?;
        assert_eq!(neighbours.len(), 7);
        assert!(neighbours.windows(2).all(|pair| pair[0].1 <= pair[1].1));

        let ones = neighbours
            .iter()
            .filter(|(idx, _)| train.targets()[*idx] == 1)
            .count();
        let expected = if ones > 3 { 1 } else { 0 };
        assert_eq!(*prediction, expected);
    }

    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn fitted_model_round_trips_through_serde() -> machlearn_nn::Result<()> {
    let train = blobs(10, 2);
    let model = KNearestNeighbors::params_with_distance(CommonDistance::LpDist(2.5))
        .n_neighbors(3)
        .fit(&train)?;

    let serialized = serde_json::to_string(&model).unwrap();
    let restored: KNearestNeighbors<f64, usize, CommonDistance<f64>> =
        serde_json::from_str(&serialized).unwrap();

    assert_eq!(restored, model);
    assert_eq!(restored.predict(train.records()), model.predict(train.records()));

    Ok(())
}
