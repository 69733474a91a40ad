//! Tests for closure engine selection and the shared estimator contract

#[cfg(test)]
mod tests {
    use risq::closure::method::check_state;
    use risq::model::presets::two_state;
    use risq::{ClosureEngine, ClosureOrder, MeanField, Method, PairCorrelation, RisqError};

    // Tests engines report the order they were built with
    // Verified by constructing both orders
    #[test]
    fn test_engine_order() {
        let Ok(model) = two_state(0.1, 0.05) else {
            unreachable!("preset should be valid");
        };

        let mean_field = ClosureEngine::new(ClosureOrder::MeanField, &model);
        let pair = ClosureEngine::new(ClosureOrder::Pair, &model);

        assert_eq!(mean_field.order(), ClosureOrder::MeanField);
        assert_eq!(pair.order(), ClosureOrder::Pair);
        assert_eq!(mean_field.name(), "Single cell");
        assert_eq!(pair.name(), "Neighboring cells");
    }

    // Tests the engine delegates to the selected closure
    // Verified by comparing against the concrete engines
    #[test]
    fn test_engine_delegates() {
        let Ok(model) = two_state(0.1, 0.05) else {
            unreachable!("preset should be valid");
        };

        let mut engine = ClosureEngine::new(ClosureOrder::Pair, &model);
        let mut direct = PairCorrelation::new(&model);
        assert_eq!(engine.probability(3, 1).ok(), direct.probability(3, 1).ok());
        assert_eq!(engine.variance(3, 1).ok(), direct.variance(3, 1).ok());

        let mut engine = ClosureEngine::new(ClosureOrder::MeanField, &model);
        let mut direct = MeanField::new(&model);
        assert_eq!(engine.probability(3, 1).ok(), direct.probability(3, 1).ok());
        assert_eq!(engine.variance(3, 1).ok(), direct.variance(3, 1).ok());
    }

    // Tests methods can be driven through trait objects side by side
    // Verified by summing both distributions through `dyn Method`
    #[test]
    fn test_dynamic_dispatch() {
        let Ok(model) = two_state(0.2, 0.1) else {
            unreachable!("preset should be valid");
        };
        let mut mean_field = MeanField::new(&model);
        let mut pair = PairCorrelation::new(&model);
        let methods: [&mut dyn Method; 2] = [&mut mean_field, &mut pair];

        for method in methods {
            let total = method.probability(4, 0).unwrap_or(f64::NAN)
                + method.probability(4, 1).unwrap_or(f64::NAN);
            assert!((total - 1.0).abs() < 1e-12, "{}: {total}", method.name());
        }
    }

    // Tests the state check accepts exactly the model's states
    // Verified by probing the boundary index
    #[test]
    fn test_check_state() {
        let Ok(model) = two_state(0.1, 0.05) else {
            unreachable!("preset should be valid");
        };

        assert!(check_state(&model, 0).is_ok());
        assert!(check_state(&model, 1).is_ok());
        assert!(matches!(
            check_state(&model, 2),
            Err(RisqError::InvalidState {
                state: 2,
                num_states: 2
            })
        ));
    }
}
