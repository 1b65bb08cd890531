use machlearn::prelude::*;
use machlearn_trees::{DecisionTree, SplitQuality, Traversal};
use ndarray::{Array1, Array2};
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::{Normal, Uniform};
use ndarray_rand::RandomExt;
use rand::rngs::SmallRng;

/// Customers described by age and estimated salary, labelled with whether they bought
/// after seeing an ad. Older or wealthier customers buy more often, with some noise.
fn social_network_ads(nsamples: usize, rng: &mut SmallRng) -> Dataset<f64, usize> {
    let age = Array1::random_using(nsamples, Uniform::new(18., 60.), rng);
    let salary = Array1::random_using(nsamples, Uniform::new(15_000., 150_000.), rng);
    let noise = Array1::random_using(nsamples, Normal::new(0., 0.1).unwrap(), rng);

    let purchased = age
        .iter()
        .zip(salary.iter())
        .zip(noise.iter())
        .map(|((age, salary), noise)| {
            let score = (age - 18.) / 42. * 0.7 + (salary - 15_000.) / 135_000. * 0.6;
            (score + noise > 0.65) as usize
        })
        .collect::<Array1<_>>();

    let mut records = Array2::zeros((nsamples, 2));
    records.column_mut(0).assign(&age);
    records.column_mut(1).assign(&salary);

    Dataset::new(records, purchased).with_feature_names(vec!["Age", "EstimatedSalary"])
}

fn main() -> machlearn_trees::Result<()> {
    let mut rng = SmallRng::seed_from_u64(42);
    let (train, test) = social_network_ads(400, &mut rng).split_with_ratio(0.75);

    let model = DecisionTree::params()
        .split_quality(SplitQuality::Entropy)
        .max_depth(2)
        .fit(&train)?;

    println!("Decision tree (preorder):");
    print!("{}", model.order(Traversal::PreOrder));

    let names = train.feature_names();
    for feature in model.features() {
        println!("splits on {}", names[feature]);
    }

    let cm = model.predict(test.records()).confusion_matrix(&test)?;
    println!("{:?}", cm);
    println!("training accuracy: {:.3}", model.score(&train)?);
    println!("test accuracy: {:.3}", model.score(&test)?);

    let proba = model.predict_proba(test.records());
    println!("first test probabilities: {}", proba.row(0));

    let bought = test.targets().iter().map(|&t| t == 1).collect::<Vec<_>>();
    let roc = proba.column(1).roc(&bought)?;
    println!("test ROC AUC: {:.3}", roc.area_under_curve());

    Ok(())
}
