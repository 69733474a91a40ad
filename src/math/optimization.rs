//! Derivative-free and finite-difference parameter fitting

use std::collections::BTreeMap;

use crate::io::error::Result;
use crate::io::progress::ProgressReporter;

/// Named model parameters being fitted
pub type Parameters = BTreeMap<String, f64>;

/// Final parameters and their loss
#[derive(Clone, Debug)]
pub struct FitOutcome {
    /// Fitted parameter values
    pub values: Parameters,
    /// Loss at the fitted values
    pub loss: f64,
}

/// Settings for [`gradient_descent`]
#[derive(Clone, Copy, Debug)]
pub struct GradientConfig {
    /// Step size along the negative gradient
    pub learning_rate: f64,
    /// Number of gradient steps
    pub iterations: usize,
    /// Relative finite-difference step
    pub dx: f64,
    /// Draw a progress bar
    pub show_progress: bool,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            iterations: 100,
            dx: 0.001,
            show_progress: false,
        }
    }
}

/// Settings for [`steepest_descent`]
#[derive(Clone, Copy, Debug)]
pub struct SteepestConfig {
    /// Number of sweeps over all parameters
    pub iterations: usize,
    /// Initial probe distance
    pub delta: f64,
    /// Draw a progress bar
    pub show_progress: bool,
}

impl Default for SteepestConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            delta: 0.1,
            show_progress: false,
        }
    }
}

fn describe(values: &Parameters, loss: f64) -> String {
    let parameters = values
        .iter()
        .map(|(name, value)| format!("{name}={value:.6}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("loss={loss:.6} {parameters}")
}

/// Minimize `loss` with forward-difference gradients
///
/// Each parameter `x` is perturbed by `|x| * dx` (or `dx` when `x` is zero).
///
/// # Errors
///
/// Propagates the first error returned by `loss`.
pub fn gradient_descent<F>(
    mut loss: F,
    values: &Parameters,
    config: GradientConfig,
) -> Result<FitOutcome>
where
    F: FnMut(&Parameters) -> Result<f64>,
{
    let mut values = values.clone();
    let progress = ProgressReporter::new("Gradient descent", config.iterations, config.show_progress);

    for _ in 0..config.iterations {
        let current = loss(&values)?;
        progress.set_status(describe(&values, current));

        let mut gradients = Vec::with_capacity(values.len());
        for (name, &x) in &values {
            let eps = if x == 0.0 { config.dx } else { (x * config.dx).abs() };
            let mut probe = values.clone();
            probe.insert(name.clone(), x + eps);
            gradients.push((name.clone(), (loss(&probe)? - current) / eps));
        }

        for (name, gradient) in gradients {
            if let Some(x) = values.get_mut(&name) {
                *x -= config.learning_rate * gradient;
            }
        }

        tracing::debug!(loss = current, "gradient descent step");
        progress.tick();
    }
    progress.finish();

    let loss = loss(&values)?;
    tracing::info!(loss, "gradient descent complete");
    Ok(FitOutcome { values, loss })
}

/// Minimize `loss` by probing each parameter at `x - delta` and `x + delta`
///
/// The first improving probe per parameter is accepted. `delta` grows by 10%
/// after a sweep with an improvement and halves after a sweep without one.
///
/// # Errors
///
/// Propagates the first error returned by `loss`.
pub fn steepest_descent<F>(
    mut loss: F,
    values: &Parameters,
    config: SteepestConfig,
) -> Result<FitOutcome>
where
    F: FnMut(&Parameters) -> Result<f64>,
{
    let mut values = values.clone();
    let mut delta = config.delta;
    let mut current = loss(&values)?;
    let progress = ProgressReporter::new("Steepest descent", config.iterations, config.show_progress);

    let names: Vec<String> = values.keys().cloned().collect();
    for _ in 0..config.iterations {
        progress.set_status(describe(&values, current));

        let mut improved = false;
        for name in &names {
            let Some(&x) = values.get(name) else {
                continue;
            };
            for candidate in [x - delta, x + delta] {
                let mut probe = values.clone();
                probe.insert(name.clone(), candidate);
                let probe_loss = loss(&probe)?;
                if probe_loss < current {
                    values = probe;
                    current = probe_loss;
                    improved = true;
                    break;
                }
            }
        }

        delta *= if improved { 1.1 } else { 0.5 };
        tracing::debug!(loss = current, delta, "steepest descent sweep");
        progress.tick();
    }
    progress.finish();

    tracing::info!(loss = current, "steepest descent complete");
    Ok(FitOutcome {
        values,
        loss: current,
    })
}
