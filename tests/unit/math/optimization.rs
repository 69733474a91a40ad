//! Tests for parameter fitting

#[cfg(test)]
mod tests {
    use risq::RisqError;
    use risq::math::optimization::{
        GradientConfig, Parameters, SteepestConfig, gradient_descent, steepest_descent,
    };

    fn start() -> Parameters {
        Parameters::from([("a".to_string(), 0.0), ("b".to_string(), 4.0)])
    }

    fn quadratic(values: &Parameters) -> risq::Result<f64> {
        let a = values.get("a").copied().unwrap_or(f64::NAN);
        let b = values.get("b").copied().unwrap_or(f64::NAN);
        Ok((a - 1.0).powi(2) + (b - 2.0).powi(2))
    }

    // Tests gradient descent moves towards the minimum of a quadratic
    // Verified by starting away from the minimum in both parameters
    #[test]
    fn test_gradient_descent_decreases_loss() {
        let initial = quadratic(&start()).unwrap_or(f64::NAN);
        let config = GradientConfig {
            learning_rate: 0.1,
            iterations: 200,
            ..GradientConfig::default()
        };

        let Ok(outcome) = gradient_descent(quadratic, &start(), config) else {
            unreachable!("loss never fails");
        };

        assert!(outcome.loss < initial);
        assert!(outcome.loss < 1e-4, "loss {}", outcome.loss);
        let a = outcome.values.get("a").copied().unwrap_or(f64::NAN);
        assert!((a - 1.0).abs() < 0.01, "a = {a}");
    }

    // Tests steepest descent finds the minimum without gradients
    // Verified by a start point several deltas away
    #[test]
    fn test_steepest_descent_decreases_loss() {
        let initial = quadratic(&start()).unwrap_or(f64::NAN);

        let Ok(outcome) = steepest_descent(quadratic, &start(), SteepestConfig::default()) else {
            unreachable!("loss never fails");
        };

        assert!(outcome.loss < initial);
        assert!(outcome.loss < 1e-4, "loss {}", outcome.loss);
        let b = outcome.values.get("b").copied().unwrap_or(f64::NAN);
        assert!((b - 2.0).abs() < 0.01, "b = {b}");
    }

    // Tests zero iterations leave the parameters unchanged
    // Verified by comparing input and output values
    #[test]
    fn test_zero_iterations() {
        let config = SteepestConfig {
            iterations: 0,
            ..SteepestConfig::default()
        };
        let Ok(outcome) = steepest_descent(quadratic, &start(), config) else {
            unreachable!("loss never fails");
        };
        assert_eq!(outcome.values, start());
    }

    // Tests loss errors abort the fit
    // Verified by a loss that always fails
    #[test]
    fn test_loss_errors_propagate() {
        let failing = |_: &Parameters| -> risq::Result<f64> {
            Err(RisqError::Computation {
                operation: "loss",
                reason: "diverged".to_string(),
            })
        };

        assert!(gradient_descent(failing, &start(), GradientConfig::default()).is_err());
        assert!(steepest_descent(failing, &start(), SteepestConfig::default()).is_err());
    }
}
