//! Cross-estimator properties
//!
//! Every estimator sees the same well-behaved dataset and must land in
//! the same place; the method-specific behaviors (weight limiting,
//! residual adjustment, outlier removal) are exercised against datasets
//! built to trigger them.

use discrepant_average::{
    AutoAccept, BootstrapMedian, ExpectedValue, Lwm, MandelPaule, Measurement, MinimumVariance,
    Nrm, OutlierCriterion, Rajeval, UnweightedAverage, WeightedAverage,
};

fn consistent_dataset() -> Vec<Measurement> {
    vec![
        Measurement::symmetric(10.0, 0.2),
        Measurement::symmetric(10.1, 0.2),
        Measurement::symmetric(9.9, 0.2),
        Measurement::symmetric(10.05, 0.2),
    ]
}

#[test]
fn all_estimators_agree_on_consistent_data() {
    let data = consistent_dataset();
    let reference = UnweightedAverage::new().average(&data).unwrap().value;

    let estimates = vec![
        ("weighted", WeightedAverage::new().average(&data).unwrap()),
        ("lwm", Lwm::new().average(&data).unwrap()),
        ("nrm", Nrm::new().average(&data).unwrap()),
        ("rt", Rajeval::new().average(&data).unwrap()),
        ("evm", ExpectedValue::new().average(&data).unwrap()),
        (
            "bootstrap",
            BootstrapMedian::new()
                .with_resamples(50_000)
                .with_seed(11)
                .average(&data)
                .unwrap(),
        ),
        ("mandel-paule", MandelPaule::new().average(&data).unwrap()),
        (
            "min-variance",
            MinimumVariance::new().average(&data).unwrap(),
        ),
    ];

    for (name, estimate) in estimates {
        assert!(
            (estimate.value - reference).abs() < 0.1,
            "{name} drifted: {} vs {}",
            estimate.value,
            reference
        );
        assert!(!estimate.is_nan(), "{name} produced NaN");
        assert!(estimate.upper >= 0.0 && estimate.lower >= 0.0, "{name}");
    }
}

#[test]
fn weighted_matches_unweighted_for_equal_uncertainties() {
    for values in [
        vec![10.0, 12.0, 11.0],
        vec![-3.0, 1.0, 2.5, 0.0],
        vec![100.0, 100.5],
    ] {
        let data: Vec<Measurement> = values
            .iter()
            .map(|&v| Measurement::symmetric(v, 1.0))
            .collect();
        let unweighted = UnweightedAverage::new().average(&data).unwrap();
        let weighted = WeightedAverage::new().average(&data).unwrap();
        assert!(
            (weighted.value - unweighted.value).abs() < 1e-6,
            "values {:?}: {} vs {}",
            values,
            weighted.value,
            unweighted.value
        );
    }
}

#[test]
fn bootstrap_tracks_unweighted_average() {
    let data = vec![
        Measurement::symmetric(10.0, 0.1),
        Measurement::symmetric(10.05, 0.1),
        Measurement::symmetric(9.95, 0.1),
    ];
    let unweighted = UnweightedAverage::new().average(&data).unwrap();
    let bootstrap = BootstrapMedian::new()
        .with_resamples(100_000)
        .with_seed(17)
        .average(&data)
        .unwrap();
    let relative = (bootstrap.value - unweighted.value).abs() / unweighted.value.abs();
    assert!(relative < 0.02, "bootstrap off by {relative}");
}

#[test]
fn lwm_weight_limit_holds_across_datasets() {
    let datasets = vec![
        vec![
            Measurement::symmetric(10.0, 0.01),
            Measurement::symmetric(10.4, 0.1),
            Measurement::symmetric(11.0, 0.5),
        ],
        vec![
            Measurement::symmetric(5.0, 0.02),
            Measurement::symmetric(5.5, 0.02),
            Measurement::symmetric(6.0, 0.4),
            Measurement::symmetric(4.2, 0.9),
        ],
    ];
    for data in datasets {
        let (_, report) = Lwm::new().average_with_report(&data).unwrap();
        let adjusted = report.adjusted.expect("working dataset");
        let weights: Vec<f64> = adjusted.iter().map(|m| 1.0 / m.variance()).collect();
        let total: f64 = weights.iter().sum();
        for w in &weights {
            assert!(
                w / total <= 0.5 + 1e-5,
                "relative weight {} above the limit",
                w / total
            );
        }
    }
}

#[test]
fn outlier_pipeline_with_closure_policy() {
    let data = vec![
        Measurement::symmetric(10.0, 0.1),
        Measurement::symmetric(10.1, 0.1),
        Measurement::symmetric(9.9, 0.1),
        Measurement::symmetric(50.0, 0.1),
    ];
    // Reject only far-out candidates, whatever the criterion says.
    let policy = |_: &str, candidate: &Measurement| candidate.value > 20.0;
    let (result, report) = Lwm::new()
        .with_policy(policy)
        .with_criterion(OutlierCriterion::Chauvenet)
        .average_with_report(&data)
        .unwrap();
    assert_eq!(report.outliers, vec![3]);
    assert!((result.value - 10.0).abs() < 0.1);
}

#[test]
fn rt_and_nrm_both_tame_a_discrepant_point() {
    let data = vec![
        Measurement::symmetric(10.0, 0.2),
        Measurement::symmetric(10.2, 0.2),
        Measurement::symmetric(9.8, 0.2),
        Measurement::symmetric(12.0, 0.2),
        Measurement::symmetric(10.1, 0.2),
    ];
    let nrm = Nrm::new().average(&data).unwrap();
    let rt = Rajeval::new()
        .with_policy(AutoAccept)
        .average(&data)
        .unwrap();
    // Both methods should keep the estimate near the consistent cluster
    // rather than the naive weighted mean of 10.42.
    assert!(nrm.value < 10.45);
    assert!(rt.value < 10.45);
    assert!(!nrm.is_nan() && !rt.is_nan());
}

#[test]
fn reports_identify_their_methods() {
    let data = consistent_dataset();
    let (_, unweighted) = UnweightedAverage::new().average_with_report(&data).unwrap();
    assert_eq!(unweighted.method, "Unweighted Average");
    let (_, weighted) = WeightedAverage::new().average_with_report(&data).unwrap();
    assert_eq!(weighted.method, "Weighted Average");
    let (_, lwm) = Lwm::new().average_with_report(&data).unwrap();
    assert_eq!(lwm.method, "Limitation of Statistical Weights");
    let (_, nrm) = Nrm::new().average_with_report(&data).unwrap();
    assert_eq!(nrm.method, "Normalized Residuals Method");
    let (_, rt) = Rajeval::new().average_with_report(&data).unwrap();
    assert_eq!(rt.method, "Rajeval Technique");
    let (_, evm) = ExpectedValue::new().average_with_report(&data).unwrap();
    assert_eq!(evm.method, "Expected Value Method");
    for report in [&unweighted, &weighted, &lwm, &nrm, &rt, &evm] {
        assert!(!report.means.is_empty());
        assert_eq!(report.dataset.len(), data.len());
    }
}

#[test]
fn caller_data_is_never_mutated() {
    let data = vec![
        Measurement::symmetric(10.0, 0.05),
        Measurement::symmetric(10.4, 0.1),
        Measurement::symmetric(12.0, 0.1),
        Measurement::symmetric(10.1, 0.8),
    ];
    let before = data.clone();
    let _ = Lwm::new().average(&data).unwrap();
    let _ = Nrm::new().average(&data).unwrap();
    let _ = Rajeval::new().with_policy(AutoAccept).average(&data).unwrap();
    for (a, b) in data.iter().zip(&before) {
        assert_eq!(a, b, "caller-owned measurement was modified");
    }
}
