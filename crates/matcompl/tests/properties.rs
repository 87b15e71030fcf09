//! Property tests: shape preservation and observation fidelity.

use matcompl::prelude::*;
use proptest::prelude::*;

/// A small grid with a random pattern of nonzero (observed) cells.
fn partial_grid() -> impl Strategy<Value = (usize, usize, Vec<f64>)> {
    (1usize..6, 1usize..6).prop_flat_map(|(m, n)| {
        let cell = prop_oneof![Just(0.0), 0.5f64..5.0, -5.0f64..-0.5];
        (Just(m), Just(n), prop::collection::vec(cell, m * n))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn output_shape_matches_input((m, n, values) in partial_grid()) {
        let config = CompletionConfig::new()
            .with_tolerance(1e-3)
            .with_max_iterations(5_000);

        match complete_flat(m, n, &values, None, &config) {
            Ok(completed) => {
                prop_assert_eq!(completed.len(), m * n);
                for (k, &v) in values.iter().enumerate() {
                    if v != 0.0 {
                        prop_assert_eq!(completed[k], v);
                    }
                }
            }
            Err(CompletionError::EmptyObservations) => {
                prop_assert!(values.iter().all(|&v| v == 0.0));
            }
            Err(CompletionError::NonConvergence { .. }) => {}
            Err(err) => prop_assert!(false, "unexpected error: {}", err),
        }
    }

    #[test]
    fn grid_rows_keep_their_length((m, n, values) in partial_grid()) {
        prop_assume!(values.iter().any(|&v| v != 0.0));
        let rows: Vec<Vec<f64>> = values.chunks(n).map(<[f64]>::to_vec).collect();
        let config = CompletionConfig::new()
            .with_tolerance(1e-3)
            .with_max_iterations(5_000);

        if let Ok(completed) = complete_grid(&rows, None, &config) {
            prop_assert_eq!(completed.len(), m);
            prop_assert!(completed.iter().all(|row| row.len() == n));
        }
    }
}
