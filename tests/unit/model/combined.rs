//! Tests for time-switched model composition

#[cfg(test)]
mod tests {
    use risq::model::combined::CombinedModel;
    use risq::model::presets::{six_mutations, two_state};
    use risq::{MeanField, Method, PairCorrelation, RisqError, TransitionModel};

    // Tests the special model is used exactly at the selected times
    // Verified by reading the mutation probability at even and odd steps
    #[test]
    fn test_switches_by_time() {
        let (Ok(default), Ok(special)) = (two_state(0.1, 0.05), two_state(0.0, 0.5)) else {
            unreachable!("presets should be valid");
        };
        let Ok(model) = CombinedModel::new(&default, &special, |t: usize| t % 2 == 0) else {
            unreachable!("models share a topology");
        };

        assert_eq!(model.prob_internal(1, 1, 0), 0.1);
        assert_eq!(model.prob_internal(2, 1, 0), 0.0);
        assert_eq!(model.prob_spread(2, 1, 0), 0.5);
        assert_eq!(model.prob_spread(3, 1, 0), 0.05);
        assert_eq!(model.labels(), default.labels());
    }

    // Tests closure engines follow the combined dynamics
    // Verified by reference values of alternating mutation and spread steps
    #[test]
    fn test_engines_on_combined_model() {
        let (Ok(default), Ok(special)) = (two_state(0.1, 0.05), two_state(0.0, 0.5)) else {
            unreachable!("presets should be valid");
        };
        let Ok(model) = CombinedModel::new(&default, &special, |t: usize| t % 2 == 0) else {
            unreachable!("models share a topology");
        };

        let mut mean_field = MeanField::new(&model);
        let mut pair = PairCorrelation::new(&model);
        let expected_mean_field = [0.0, 0.1, 0.266_944_375_000_000_1, 0.374_774_305_243_382_5];
        let expected_pair = [0.0, 0.1, 0.266_944_375_000_000_1, 0.364_676_886_937_844_3];

        for (time, (&m, &p)) in expected_mean_field.iter().zip(&expected_pair).enumerate() {
            let got_m = mean_field.probability(time, 1).unwrap_or(f64::NAN);
            let got_p = pair.probability(time, 1).unwrap_or(f64::NAN);
            assert!((got_m - m).abs() < 1e-12, "mean field t={time}: {got_m}");
            assert!((got_p - p).abs() < 1e-12, "pair t={time}: {got_p}");
        }
    }

    // Tests models with different topologies cannot be combined
    // Verified by pairing a two-state and a nine-state model
    #[test]
    fn test_mismatched_models_are_rejected() {
        let (Ok(two), Ok(nine)) = (two_state(0.1, 0.05), six_mutations(0.01, 0.005, 0.02)) else {
            unreachable!("presets should be valid");
        };

        let result = CombinedModel::new(&two, &nine, |_: usize| false);
        assert!(matches!(result, Err(RisqError::InvalidModel { .. })));
    }
}
