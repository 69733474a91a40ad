//! Tests for the single-cell closure engine

#[cfg(test)]
mod tests {
    use risq::closure::MeanField;
    use risq::model::presets::{six_mutations, two_state};
    use risq::{Method, RisqError, State, Time, TransitionModel};

    /// Three states without spread; state 0 hands `excess` too much mass to state 1
    struct Leaky {
        excess: f64,
    }

    impl TransitionModel for Leaky {
        fn num_states(&self) -> usize {
            3
        }

        fn num_neighbors(&self) -> usize {
            4
        }

        fn prob_internal(&self, _time: Time, new: State, old: State) -> f64 {
            match (new, old) {
                (0, 0) => 0.6,
                (1, 0) => 0.4 + self.excess,
                _ if new == old => 1.0,
                _ => 0.0,
            }
        }

        fn prob_spread(&self, _time: Time, _attacker: State, _target: State) -> f64 {
            0.0
        }
    }

    // Tests the time-0 distribution matches the initial pattern probabilities
    // Verified by starting every cell in the last state
    #[test]
    fn test_initial_distribution_is_exact() {
        let Ok(model) = two_state(0.1, 0.05) else {
            unreachable!("preset should be valid");
        };
        let mut engine = MeanField::new(&model);

        assert_eq!(engine.probability(0, 0).ok(), Some(1.0));
        assert_eq!(engine.probability(0, 1).ok(), Some(0.0));
    }

    // Tests the first step is pure mutation because no neighbor can be cancerous yet
    // Verified by adding the overgrowth term unconditionally
    #[test]
    fn test_first_step_is_pure_mutation() {
        let Ok(model) = two_state(0.1, 0.05) else {
            unreachable!("preset should be valid");
        };
        let mut engine = MeanField::new(&model);

        let p = engine.probability(1, 1).unwrap_or(f64::NAN);
        assert!((p - 0.1).abs() < 1e-12, "Expected 0.1, got {p}");
    }

    // Tests later steps against hand-checked reference values of the recurrence
    // Verified by raising the survival term to num_neighbors - 1
    #[test]
    fn test_two_state_reference_values() {
        let Ok(model) = two_state(0.1, 0.05) else {
            unreachable!("preset should be valid");
        };
        let mut engine = MeanField::new(&model);

        let p2 = engine.probability(2, 1).unwrap_or(f64::NAN);
        let p3 = engine.probability(3, 1).unwrap_or(f64::NAN);
        assert!((p2 - 0.206_078_904_493_75).abs() < 1e-12, "got {p2}");
        assert!((p3 - 0.314_468_828_078_476_87).abs() < 1e-12, "got {p3}");

        let var3 = engine.variance(3, 1).unwrap_or(f64::NAN);
        assert!((var3 - 0.215_578_184_245_426_24).abs() < 1e-12, "got {var3}");
    }

    // Tests the distribution sums to one at every time for a nine-state model
    // Verified by computing the last state directly instead of as a complement
    #[test]
    fn test_distribution_is_normalized() {
        let Ok(model) = six_mutations(0.01, 0.005, 0.02) else {
            unreachable!("preset should be valid");
        };
        let mut engine = MeanField::new(&model);

        for time in [0, 1, 5, 30, 38] {
            let total: f64 = (0..9)
                .map(|state| engine.probability(time, state).unwrap_or(f64::NAN))
                .sum();
            assert!((total - 1.0).abs() < 1e-6, "time {time}: sum {total}");
        }
    }

    // Tests a complement drifting beyond the tolerance is reported, not clamped
    // Verified by the six-mutation preset whose last state turns negative at time 39
    #[test]
    fn test_drift_beyond_tolerance_is_reported() {
        let Ok(model) = six_mutations(0.01, 0.005, 0.02) else {
            unreachable!("preset should be valid");
        };
        let mut engine = MeanField::new(&model);

        let dead = engine.probability(38, 8).unwrap_or(f64::NAN);
        assert!(dead > 1e-4, "got {dead}");

        for time in [39, 60] {
            assert!(matches!(
                engine.probability(time, 7),
                Err(RisqError::Inconsistency {
                    operation: "mean-field complement",
                    time: 39,
                    ..
                })
            ));
        }
    }

    // Tests rounding-sized complement drift is clamped to exactly zero
    // Verified by a model whose columns overshoot one by less than the tolerance
    #[test]
    fn test_complement_noise_is_clamped() {
        let mut engine = MeanField::new(Leaky { excess: 5e-7 });

        assert_eq!(engine.probability(1, 2).ok(), Some(0.0));
        let p = engine.probability(1, 1).unwrap_or(f64::NAN);
        assert!((p - 0.400_000_5).abs() < 1e-12, "got {p}");

        let mut inconsistent = MeanField::new(Leaky { excess: 1e-3 });
        assert!(matches!(
            inconsistent.probability(1, 0),
            Err(RisqError::Inconsistency {
                operation: "mean-field complement",
                time: 1,
                ..
            })
        ));
    }

    // Tests repeated queries return bit-identical values, also after further queries
    // Verified by recomputing a layer on every query
    #[test]
    fn test_repeated_queries_are_identical() {
        let Ok(model) = two_state(0.02, 0.3) else {
            unreachable!("preset should be valid");
        };
        let mut engine = MeanField::new(&model);

        let first = engine.probability(25, 1).ok();
        let _ = engine.probability(400, 1);
        let second = engine.probability(25, 1).ok();

        assert!(first.is_some());
        assert_eq!(
            first.map(f64::to_bits),
            second.map(f64::to_bits),
            "cached result must not change"
        );
    }

    // Tests far-future queries finish without deep recursion
    // Verified by querying a horizon that would overflow a recursive evaluation
    #[test]
    fn test_far_future_query() {
        let Ok(model) = two_state(0.001, 0.01) else {
            unreachable!("preset should be valid");
        };
        let mut engine = MeanField::new(&model);

        let p = engine.probability(50_000, 1).unwrap_or(f64::NAN);
        assert!((0.0..=1.0).contains(&p));
        assert!(p > 0.99, "Absorbing state should dominate, got {p}");
    }

    // Tests unknown states are rejected
    // Verified by querying one past the last state
    #[test]
    fn test_unknown_state_is_rejected() {
        let Ok(model) = two_state(0.1, 0.05) else {
            unreachable!("preset should be valid");
        };
        let mut engine = MeanField::new(&model);

        assert!(matches!(
            engine.probability(1, 2),
            Err(RisqError::InvalidState {
                state: 2,
                num_states: 2
            })
        ));
    }

    // Tests the full distribution accessor agrees with single queries
    // Verified by comparing each entry with probability()
    #[test]
    fn test_distribution_matches_single_queries() {
        let Ok(model) = two_state(0.1, 0.05) else {
            unreachable!("preset should be valid");
        };
        let mut engine = MeanField::new(&model);

        let Ok(distribution) = engine.distribution(4) else {
            unreachable!("distribution should be computable");
        };
        for (state, &p) in distribution.iter().enumerate() {
            assert_eq!(engine.probability(4, state).ok(), Some(p));
        }
        assert_eq!(engine.name(), "Single cell");
    }
}
