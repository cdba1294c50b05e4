use cartree::data::Matrix;
use cartree::{CriterionKind, DecisionTree, DecisionTreeConfig, GrowPolicy, MaxFeatures, SplitterKind, TreeIO};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::tempdir;

fn two_moons_like(rows: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let a: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>() * 4.0 - 2.0).collect();
    let b: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>() * 4.0 - 2.0).collect();
    let y: Vec<f64> = a
        .iter()
        .zip(&b)
        .map(|(a, b)| if a * a + b * b < 1.5 { 1.0 } else { 0.0 })
        .collect();
    let mut x = a;
    x.extend(b);
    (x, y)
}

#[test]
fn test_single_split_scenario() {
    let x = vec![0., 1., 2., 3.];
    let y = vec![0., 0., 1., 1.];
    let mut model = DecisionTree::default().set_max_depth(Some(1)).set_min_samples_leaf(1);
    model
        .fit(&Matrix::new(&x, 4, 1), &Matrix::new(&y, 4, 1), None)
        .unwrap();
    let tree = model.tree().unwrap();
    assert_eq!(tree.node_count(), 3);
    assert_eq!(tree.nodes[0].threshold, 1.5);
    assert!(tree.nodes[1..].iter().all(|n| n.is_leaf && n.impurity == 0.0));
    assert_eq!(model.predict(&Matrix::new(&x, 4, 1), false).unwrap(), y);
}

#[test]
fn test_random_trees_reproducible() {
    let (x, y) = two_moons_like(400, 1);
    let fit = |seed| {
        let mut model = DecisionTree::default()
            .set_splitter(SplitterKind::Random)
            .set_max_features(MaxFeatures::Count(1))
            .set_random_state(seed);
        model
            .fit(&Matrix::new(&x, 400, 2), &Matrix::new(&y, 400, 1), None)
            .unwrap();
        model
    };
    assert_eq!(fit(7).tree, fit(7).tree);
    assert_ne!(fit(7).tree, fit(8).tree);
}

#[test]
fn test_best_first_leaf_budget() {
    let (x, y) = two_moons_like(500, 2);
    for max_leaf_nodes in [2, 4, 9, 25] {
        let mut model = DecisionTree::default().set_max_leaf_nodes(Some(max_leaf_nodes));
        assert_eq!(model.cfg.effective_grow_policy(), GrowPolicy::BestFirst);
        model
            .fit(&Matrix::new(&x, 500, 2), &Matrix::new(&y, 500, 1), None)
            .unwrap();
        let tree = model.tree().unwrap();
        assert!(tree.n_leaves <= max_leaf_nodes);
        assert_eq!(tree.nodes.iter().filter(|n| n.is_leaf).count(), tree.n_leaves);
    }
}

#[test]
fn test_splitters_agree_on_training_accuracy() {
    let (x, y) = two_moons_like(300, 3);
    let data = Matrix::new(&x, 300, 2);
    for splitter in [SplitterKind::Best, SplitterKind::Random, SplitterKind::PresortBest] {
        let mut model = DecisionTree::default().set_splitter(splitter);
        model.fit(&data, &Matrix::new(&y, 300, 1), None).unwrap();
        // Distinct continuous rows are fitted exactly by an unbounded tree.
        assert_eq!(model.predict(&data, true).unwrap(), y);
    }
}

#[test]
fn test_regression_depth_reduces_error() {
    let rows = 200;
    let x: Vec<f64> = (0..rows).map(|i| i as f64 / rows as f64 * 6.0).collect();
    let y: Vec<f64> = x.iter().map(|v| v.sin()).collect();
    let data = Matrix::new(&x, rows, 1);
    let mse = |max_depth| {
        let cfg = DecisionTreeConfig {
            criterion: CriterionKind::SquaredError,
            max_depth: Some(max_depth),
            ..Default::default()
        };
        let mut model = DecisionTree::new(cfg).unwrap();
        model.fit(&data, &Matrix::new(&y, rows, 1), None).unwrap();
        let preds = model.predict(&data, false).unwrap();
        preds.iter().zip(&y).map(|(p, t)| (p - t).powi(2)).sum::<f64>() / rows as f64
    };
    let (shallow, deep) = (mse(1), mse(5));
    assert!(deep < shallow);
    assert!(deep < 0.01);
}

#[test]
fn test_save_and_reload_model() {
    let (x, y) = two_moons_like(200, 4);
    let data = Matrix::new(&x, 200, 2);
    let mut model = DecisionTree::default()
        .set_criterion(CriterionKind::Entropy)
        .set_splitter(SplitterKind::PresortBest)
        .set_max_depth(Some(6));
    model.fit(&data, &Matrix::new(&y, 200, 1), None).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("cart.json");
    model.save_tree(&path).unwrap();
    let loaded = DecisionTree::load_tree(&path).unwrap();
    assert_eq!(model.predict(&data, false).unwrap(), loaded.predict(&data, false).unwrap());
    assert_eq!(
        model.predict_proba(&data, true).unwrap(),
        loaded.predict_proba(&data, false).unwrap()
    );
    println!("{}", loaded.tree().unwrap());
}
