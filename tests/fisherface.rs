use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use facespace::error::Error;
use facespace::image::Image;
use facespace::model::FisherfaceModel;

fn constant_corpus() -> (Vec<Image>, Vec<i32>) {
    let images = [10., 20., 30., 110., 120., 130.]
        .iter()
        .map(|&v| Image::constant(4, 4, v))
        .collect();
    (images, vec![0, 0, 0, 1, 1, 1])
}

/// Images per class cluster around a class-specific base intensity, with
/// per-pixel noise well below the distance between the bases.
fn clustered_corpus(
    bases: &[f64],
    per_class: usize,
    width: usize,
    height: usize,
    seed: u64,
) -> (Vec<Image>, Vec<i32>) {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut images = Vec::new();
    let mut labels = Vec::new();
    for (class, &base) in bases.iter().enumerate() {
        for _ in 0..per_class {
            images.push(Image::from_fn(width, height, |_, _| {
                base + 10. * rng.gen::<f64>()
            }));
            labels.push(class as i32);
        }
    }
    (images, labels)
}

#[test]
fn two_class_scenario() {
    let (images, labels) = constant_corpus();
    let mut model = FisherfaceModel::new(4, 4, 2);
    model.train(&images, &labels).unwrap();

    // Two classes leave exactly one discriminant direction.
    assert_eq!(model.projected_dim(), Some(1));

    assert_eq!(model.predict(&Image::constant(4, 4, 15.)).unwrap(), 0);
    assert_eq!(model.predict(&Image::constant(4, 4, 115.)).unwrap(), 1);
}

#[test]
fn single_class_corpus_fails() {
    let images: Vec<Image> = [10., 20., 30.]
        .iter()
        .map(|&v| Image::constant(4, 4, v))
        .collect();
    let mut model = FisherfaceModel::new(4, 4, 2);

    let res = model.train(&images, &[5, 5, 5]);
    assert!(matches!(res, Err(Error::DegenerateInput(_))));
    assert!(!model.is_trained());
}

#[test]
fn clustered_classes_are_recognized() {
    let (images, labels) = clustered_corpus(&[40., 120., 200.], 4, 6, 6, 13);
    let mut model = FisherfaceModel::new(6, 6, 5);
    model.train(&images, &labels).unwrap();

    // Three classes leave two discriminant directions.
    assert_eq!(model.projected_dim(), Some(2));

    // Every training image lands in its own class.
    for (image, &label) in images.iter().zip(&labels) {
        assert_eq!(model.predict(image).unwrap(), label);
    }

    // Fresh samples from each cluster land in the right class too.
    let (queries, expected) = clustered_corpus(&[40., 120., 200.], 2, 6, 6, 77);
    for (query, &label) in queries.iter().zip(&expected) {
        assert_eq!(model.predict(query).unwrap(), label);
    }
}

#[test]
fn retraining_is_deterministic() {
    let (images, labels) = clustered_corpus(&[30., 90., 150.], 4, 5, 5, 3);

    let mut first = FisherfaceModel::new(5, 5, 6);
    let mut second = FisherfaceModel::new(5, 5, 6);
    first.train(&images, &labels).unwrap();
    second.train(&images, &labels).unwrap();

    let (queries, _) = clustered_corpus(&[30., 90., 150.], 3, 5, 5, 55);
    for query in &queries {
        assert_eq!(
            first.predict(query).unwrap(),
            second.predict(query).unwrap()
        );
    }
}

/// Labels are opaque identifiers: nothing requires them to be contiguous
/// or zero-based.
#[test]
fn non_contiguous_labels_work() {
    let images: Vec<Image> = [10., 20., 30., 110., 120., 130.]
        .iter()
        .map(|&v| Image::constant(4, 4, v))
        .collect();
    let labels = vec![-7, -7, -7, 4242, 4242, 4242];

    let mut model = FisherfaceModel::new(4, 4, 2);
    model.train(&images, &labels).unwrap();

    assert_eq!(model.predict(&Image::constant(4, 4, 25.)).unwrap(), -7);
    assert_eq!(model.predict(&Image::constant(4, 4, 125.)).unwrap(), 4242);
}

#[test]
fn predict_before_train_fails() {
    let model = FisherfaceModel::new(4, 4, 2);
    assert!(matches!(
        model.predict(&Image::constant(4, 4, 0.)),
        Err(Error::NotTrained)
    ));
}
