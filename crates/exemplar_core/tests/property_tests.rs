//! Property-based tests for exemplar_core.
//!
//! Uses proptest to verify invariants that must hold for ALL valid inputs,
//! not just hand-picked examples.

use exemplar_core::model::mapped_delta;
use exemplar_core::{
    activation, aggregate, discriminability, frequency_to_delta, load_dataset, typicality,
    Category, Dataset, ModelError, Observation, MAX_FREQUENCY,
};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Non-zero window width, either sign, down to magnitudes whose square underflows.
fn arb_alpha() -> impl Strategy<Value = f64> {
    let magnitude = prop_oneof![
        4 => 0.05f64..=2.0,
        1 => (-307i32..=-3).prop_map(|e| 10f64.powi(e)),
        1 => Just(f64::MIN_POSITIVE),
    ];
    (magnitude, any::<bool>()).prop_map(|(a, neg)| if neg { -a } else { a })
}

fn arb_observation() -> impl Strategy<Value = Observation> {
    (
        prop_oneof![
            Just(Category::Pusher),
            Just(Category::Pushee),
            Just(Category::parse("Other")),
        ],
        -5.0f64..=5.0,
    )
        .prop_map(|(category, value)| Observation::new(category, value))
}

fn arb_dataset() -> impl Strategy<Value = Dataset> {
    prop::collection::vec(arb_observation(), 0..60).prop_map(Dataset::from_observations)
}

// ============================================================================
// Activation kernel
// ============================================================================

proptest! {
    /// **Symmetry** around the token position.
    #[test]
    fn activation_symmetric_around_point(
        x in -10.0f64..=10.0,
        point in -10.0f64..=10.0,
        alpha in arb_alpha(),
    ) {
        let a = activation(x, point, alpha).unwrap();
        let mirrored = activation(point + (point - x), point, alpha).unwrap();
        prop_assert!((a - mirrored).abs() <= 1e-9, "{} vs {}", a, mirrored);
    }

    /// **Peak**: exactly 1.0 at the token.
    #[test]
    fn activation_is_one_at_point(point in -100.0f64..=100.0, alpha in arb_alpha()) {
        prop_assert_eq!(activation(point, point, alpha).unwrap(), 1.0);
    }

    /// **Bounded and monotone**: in [0, 1], never larger further away.
    #[test]
    fn activation_decreases_with_distance(
        point in -5.0f64..=5.0,
        near in 0.0f64..=3.0,
        extra in 0.001f64..=3.0,
        alpha in arb_alpha(),
    ) {
        let a_near = activation(point + near, point, alpha).unwrap();
        let a_far = activation(point + near + extra, point, alpha).unwrap();
        prop_assert!((0.0..=1.0).contains(&a_near));
        prop_assert!((0.0..=1.0).contains(&a_far));
        prop_assert!(a_far <= a_near, "far {} > near {}", a_far, a_near);
    }
}

// ============================================================================
// Discriminability / typicality mappings
// ============================================================================

proptest! {
    /// **discriminability ∈ [0, 1)** and strictly increasing in ratio.
    #[test]
    fn discriminability_bounded_and_increasing(
        ratio in 0.0f64..=1000.0,
        gap in 0.01f64..=100.0,
        delta in 0.25f64..=1.0,
    ) {
        let p = discriminability(ratio, delta).unwrap();
        let q = discriminability(ratio + gap, delta).unwrap();
        prop_assert!((0.0..1.0).contains(&p), "p out of range: {}", p);
        prop_assert!((0.0..1.0).contains(&q), "q out of range: {}", q);
        prop_assert!(q > p, "not increasing: {} -> {}", p, q);
    }

    /// **discriminability decreases** as δ grows.
    #[test]
    fn discriminability_decreasing_in_delta(
        ratio in 0.01f64..=1000.0,
        delta in 0.25f64..=1.0,
        gap in 0.01f64..=1.0,
    ) {
        let p = discriminability(ratio, delta).unwrap();
        let q = discriminability(ratio, delta + gap).unwrap();
        prop_assert!(q < p, "not decreasing: {} -> {}", p, q);
    }

    /// **typicality ∈ [0, 1)** and strictly increasing in average activation.
    #[test]
    fn typicality_bounded_and_increasing(
        avg in 0.0f64..=0.99,
        gap in 0.001f64..=0.01,
        tau in 0.1f64..=0.5,
    ) {
        let p = typicality(avg, tau).unwrap();
        let q = typicality(avg + gap, tau).unwrap();
        prop_assert!((0.0..1.0).contains(&p), "p out of range: {}", p);
        prop_assert!((0.0..1.0).contains(&q), "q out of range: {}", q);
        prop_assert!(q > p, "not increasing: {} -> {}", p, q);
    }

    /// **typicality decreases** as τ grows.
    #[test]
    fn typicality_decreasing_in_tau(
        avg in 0.01f64..=1.0,
        tau in 0.1f64..=0.5,
        gap in 0.01f64..=0.5,
    ) {
        let p = typicality(avg, tau).unwrap();
        let q = typicality(avg, tau + gap).unwrap();
        prop_assert!(q < p, "not decreasing: {} -> {}", p, q);
    }
}

// ============================================================================
// Frequency mapping
// ============================================================================

proptest! {
    /// **Non-increasing** over 1..=12 and always within [0, 1].
    #[test]
    fn frequency_to_delta_non_increasing(freq in 1u32..MAX_FREQUENCY) {
        let d = frequency_to_delta(freq).unwrap();
        let next = frequency_to_delta(freq + 1).unwrap();
        prop_assert!((0.0..=1.0).contains(&d));
        prop_assert!(next <= d, "delta rose from {} to {}", d, next);
    }

    /// **Out-of-range frequencies are rejected**, never extrapolated.
    #[test]
    fn frequency_out_of_range_rejected(freq in (MAX_FREQUENCY + 1)..10_000u32) {
        let is_rejected = matches!(
            frequency_to_delta(freq),
            Err(ModelError::FrequencyOutOfRange { .. })
        );
        prop_assert!(is_rejected);
        // the unclamped formula would have gone negative here
        prop_assert_eq!(mapped_delta(freq), 0.0);
    }
}

// ============================================================================
// Aggregation
// ============================================================================

proptest! {
    /// **Counts partition the dataset** and every average lies in [0, 1].
    #[test]
    fn aggregate_partitions_dataset(
        ds in arb_dataset(),
        point in -5.0f64..=5.0,
        alpha in arb_alpha(),
    ) {
        let agg = aggregate(&ds, point, alpha).unwrap();
        let total: usize = agg.iter().map(|(_, s)| s.count).sum();
        prop_assert_eq!(total, ds.len());
        for (_, stats) in agg.iter() {
            prop_assert!(stats.count > 0);
            prop_assert!(stats.sum >= 0.0 && stats.sum <= stats.count as f64);
            prop_assert!((0.0..=1.0).contains(&stats.avg), "avg: {}", stats.avg);
        }
    }

    /// **Evaluation is well-formed** whenever both groups are present and reachable.
    #[test]
    fn evaluation_finite_when_groups_present(
        pushers in prop::collection::vec(-1.0f64..=1.0, 1..20),
        pushees in prop::collection::vec(-1.0f64..=1.0, 1..20),
        point in -1.0f64..=1.0,
        alpha in 0.1f64..=0.6,
    ) {
        let ds = Dataset::from_observations(
            pushers.iter().map(|&v| Observation::new(Category::Pusher, v))
                .chain(pushees.iter().map(|&v| Observation::new(Category::Pushee, v))),
        );
        let eval = aggregate(&ds, point, alpha).unwrap().evaluation().unwrap();
        prop_assert!(eval.ratio.is_finite() && eval.ratio >= 0.0);
        prop_assert!((0.0..=1.0).contains(&eval.avg_activation));
        let p = discriminability(eval.ratio, 0.5).unwrap();
        prop_assert!((0.0..=1.0).contains(&p));
    }
}

// ============================================================================
// Dataset parsing
// ============================================================================

proptest! {
    /// **load_dataset never panics** on arbitrary text.
    #[test]
    fn load_dataset_never_panics(text in "\\PC{0,200}") {
        let _ = load_dataset(text.as_bytes());
    }

    /// **Well-formed rows always load** with their values intact.
    #[test]
    fn load_dataset_accepts_valid_rows(values in prop::collection::vec(-100.0f64..=100.0, 0..30)) {
        let mut text = String::from("category,value\n");
        for (i, v) in values.iter().enumerate() {
            let label = if i % 2 == 0 { "Pusher" } else { "Pushee" };
            text.push_str(&format!("{},{}\n", label, v));
        }
        let ds = load_dataset(text.as_bytes()).unwrap();
        prop_assert_eq!(ds.len(), values.len());
        for (obs, v) in ds.observations().iter().zip(&values) {
            prop_assert_eq!(obs.value, *v);
        }
    }
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[test]
fn scenario_a_far_pushers_near_pushees() {
    let ds = Dataset::from_observations([
        Observation::new(Category::Pusher, 0.0),
        Observation::new(Category::Pusher, 1.0),
        Observation::new(Category::Pushee, 2.0),
        Observation::new(Category::Pushee, 3.0),
    ]);
    for obs in ds.observations() {
        let a = activation(obs.value, 2.5, 0.3).unwrap();
        match obs.category {
            Category::Pusher => assert!(a < 1e-5, "Pusher at {} fired {}", obs.value, a),
            _ => assert!(a > 0.2, "Pushee at {} fired only {}", obs.value, a),
        }
    }
    let eval = aggregate(&ds, 2.5, 0.3).unwrap().evaluation().unwrap();
    assert!(eval.ratio > 10.0, "ratio {}", eval.ratio);
}

#[test]
fn scenario_b_zero_ratio() {
    assert_eq!(discriminability(0.0, 0.5).unwrap(), 0.0);
}

#[test]
fn scenario_c_typicality_extremes() {
    assert_eq!(typicality(0.0, 0.1).unwrap(), 0.0);
    let t = typicality(1.0, 0.1).unwrap();
    assert!((t - 0.999).abs() < 1e-3, "typicality {}", t);
}

#[test]
fn scenario_d_frequency_extremes() {
    let low = frequency_to_delta(1).unwrap();
    let high = frequency_to_delta(MAX_FREQUENCY).unwrap();
    assert_eq!(low, 0.75);
    assert_eq!(high, 0.0);
    assert!(low > high);
    assert!(frequency_to_delta(0).is_err());
    assert!(frequency_to_delta(MAX_FREQUENCY + 1).is_err());
}
