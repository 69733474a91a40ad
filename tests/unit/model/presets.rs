//! Tests for the preset models

#[cfg(test)]
mod tests {
    use risq::model::presets::{six_mutations, two_state};
    use risq::{RisqError, TransitionModel};

    // Tests the two-state preset layout
    // Verified by reading both matrices
    #[test]
    fn test_two_state() {
        let Ok(model) = two_state(0.1, 0.05) else {
            unreachable!("preset should be valid");
        };

        assert_eq!(model.num_states(), 2);
        assert_eq!(model.num_neighbors(), 4);
        assert_eq!(model.labels(), vec!["H".to_string(), "C".to_string()]);
        assert_eq!(model.prob_internal(1, 1, 0), 0.1);
        assert_eq!(model.prob_internal(1, 1, 1), 1.0);
        assert_eq!(model.prob_spread(1, 1, 0), 0.05);
        assert_eq!(model.colors().map(|c| c.len()), Some(2));
    }

    // Tests the six-mutation preset stages, death and revival
    // Verified by following H through S1 and D back to H
    #[test]
    fn test_six_mutations() {
        let Ok(model) = six_mutations(0.01, 0.005, 0.02) else {
            unreachable!("preset should be valid");
        };

        assert_eq!(model.num_states(), 9);
        assert_eq!(model.labels().get(7).map(String::as_str), Some("C"));
        assert!((model.prob_internal(1, 0, 0) - 0.985).abs() < 1e-12);
        assert_eq!(model.prob_internal(1, 1, 0), 0.01);
        assert_eq!(model.prob_internal(1, 8, 3), 0.005);
        assert_eq!(model.prob_internal(1, 7, 6), 0.01);
        assert_eq!(model.prob_internal(1, 7, 7), 1.0);
        assert_eq!(model.prob_internal(1, 0, 8), 1.0);
        assert!((model.prob_spread(1, 3, 0) - 0.06).abs() < 1e-12);
        assert_eq!(model.prob_spread(1, 0, 3), 0.0);
        assert_eq!(model.prob_spread(1, 7, 0), 0.0);
    }

    // Tests invalid rates are rejected through model validation
    // Verified by probabilities outside [0, 1]
    #[test]
    fn test_invalid_rates() {
        assert!(matches!(
            two_state(1.5, 0.0),
            Err(RisqError::InvalidModel { .. })
        ));
        assert!(two_state(0.1, -0.1).is_err());
        assert!(six_mutations(0.6, 0.6, 0.0).is_err());
        assert!(six_mutations(0.01, 0.0, 0.2).is_err());
    }
}
