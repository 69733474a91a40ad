//! Plain-text and LaTeX reports of estimated cell distributions

use std::io::Write;

use crate::closure::method::Method;
use crate::io::configuration::{DETECTION_THRESHOLD, INCIDENCE_SCALE, STEPS_PER_YEAR};
use crate::io::error::{Result, invalid_parameter};
use crate::math::probability::{exceedance_probability, normal_density};
use crate::model::{State, Time};

/// Width of the frequency bar in histogram rows
const HISTOGRAM_BAR_WIDTH: usize = 40;

/// Probability that at least [`DETECTION_THRESHOLD`] of `num_cells` cells are in `state`
///
/// Scales the per-cell mean and variance to the whole tissue and treats the
/// count as normally distributed.
///
/// # Errors
///
/// Propagates errors from the method.
pub fn cancer_probability(
    method: &mut dyn Method,
    num_cells: usize,
    time: Time,
    state: State,
) -> Result<f64> {
    let mean = method.probability(time, state)? * num_cells as f64;
    let variance = method.variance(time, state)? * num_cells as f64;
    Ok(exceedance_probability(mean, variance, DETECTION_THRESHOLD))
}

/// Probability and variance of `state` per time step, one column pair per method
///
/// # Errors
///
/// Propagates errors from the methods and from writing.
pub fn write_evolution_table<W: Write>(
    out: &mut W,
    methods: &mut [&mut dyn Method],
    times: &[Time],
    state: State,
    label: &str,
) -> Result<()> {
    writeln!(out, "# state {label}")?;
    write!(out, "{:>6}", "time")?;
    for method in methods.iter() {
        let name = method.name();
        write!(out, " {:>24} {:>24}", format!("P[{name}]"), format!("Var[{name}]"))?;
    }
    writeln!(out)?;

    for &time in times {
        write!(out, "{time:>6}")?;
        for method in methods.iter_mut() {
            let p = method.probability(time, state)?;
            let var = method.variance(time, state)?;
            write!(out, " {p:>24.12} {var:>24.12}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Analytic estimates next to a reference estimate, with absolute deviations
///
/// # Errors
///
/// Propagates errors from the methods and from writing.
pub fn write_comparison<W: Write>(
    out: &mut W,
    reference: &mut dyn Method,
    methods: &mut [&mut dyn Method],
    times: &[Time],
    state: State,
) -> Result<()> {
    write!(out, "{:>6} {:>16}", "time", reference.name())?;
    for method in methods.iter() {
        write!(out, " {:>20} {:>10}", method.name(), "|diff|")?;
    }
    writeln!(out)?;

    for &time in times {
        let expected = reference.probability(time, state)?;
        write!(out, "{time:>6} {expected:>16.8}")?;
        for method in methods.iter_mut() {
            let p = method.probability(time, state)?;
            write!(out, " {p:>20.8} {:>10.2e}", (p - expected).abs())?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Number of histogram bins for `trials` simulated counts: `2 ceil(log2(trials) + 1)`
pub const fn histogram_bins(trials: usize) -> usize {
    let count = if trials == 0 { 1 } else { trials };
    2 * (count.next_power_of_two().ilog2() as usize + 1)
}

/// Histogram of simulated final counts against the analytic normal approximations
///
/// Each row shows a count range, the number of trials that ended in it and,
/// per method, the number of trials its normal approximation predicts there.
///
/// # Errors
///
/// Returns an error if `counts` is empty or `bins` is zero, and propagates
/// errors from the methods and from writing.
pub fn write_histogram<W: Write>(
    out: &mut W,
    counts: &[usize],
    num_cells: usize,
    bins: usize,
    methods: &mut [&mut dyn Method],
    time: Time,
    state: State,
) -> Result<()> {
    if bins == 0 {
        return Err(invalid_parameter("bins", &bins, &"must be positive"));
    }
    let (Some(&min), Some(&max)) = (counts.iter().min(), counts.iter().max()) else {
        return Err(invalid_parameter("counts", &"[]", &"no simulated counts"));
    };

    // Window around the simulated counts (+/- 10%)
    let spread = (max - min) as f64;
    let low = (min as f64 - spread * 0.1).max(0.0);
    let high = (max as f64 + spread * 0.1).min(num_cells as f64).max(low + 1.0);
    let width = (high - low) / bins as f64;

    let mut frequencies = vec![0_usize; bins];
    for &count in counts {
        let bin = (((count as f64 - low) / width) as usize).min(bins - 1);
        if let Some(frequency) = frequencies.get_mut(bin) {
            *frequency += 1;
        }
    }
    let peak = frequencies.iter().copied().max().unwrap_or(1).max(1);

    let mut moments = Vec::with_capacity(methods.len());
    for method in methods.iter_mut() {
        let mean = method.probability(time, state)? * num_cells as f64;
        let variance = method.variance(time, state)? * num_cells as f64;
        moments.push((method.name(), mean, variance));
    }

    write!(
        out,
        "{:>21} {:>8} {:<w$}",
        "cells",
        "trials",
        "",
        w = HISTOGRAM_BAR_WIDTH
    )?;
    for (name, ..) in &moments {
        write!(out, " {name:>18}")?;
    }
    writeln!(out)?;

    for (bin, &frequency) in frequencies.iter().enumerate() {
        let start = (bin as f64).mul_add(width, low);
        let end = start + width;
        let center = start + width / 2.0;
        let bar = "#".repeat(frequency * HISTOGRAM_BAR_WIDTH / peak);
        write!(
            out,
            "{start:>10.1}-{end:<10.1} {frequency:>8} {bar:<w$}",
            w = HISTOGRAM_BAR_WIDTH
        )?;
        for &(_, mean, variance) in &moments {
            let expected = normal_density(center, mean, variance) * width * counts.len() as f64;
            write!(out, " {expected:>18.2}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// LaTeX table of observed against predicted incidence per age
///
/// `incidence` holds `(age in years, observed probability of onset at that
/// age)`. Predictions are differences of successive cumulative risks from
/// [`cancer_probability`], with one time step per month. Both columns are
/// reported per [`INCIDENCE_SCALE`] individuals.
///
/// # Errors
///
/// Propagates errors from the method and from writing.
pub fn write_latex_table<W: Write>(
    out: &mut W,
    method: &mut dyn Method,
    num_cells: usize,
    state: State,
    incidence: &[(usize, f64)],
) -> Result<()> {
    writeln!(out, "\\begin{{tabular}}{{c|c|c}}")?;
    writeln!(out, "    Age & Data & Prediction \\\\ \\hline")?;

    let mut previous_risk = 0.0;
    for &(age, observed) in incidence {
        let risk = cancer_probability(method, num_cells, age * STEPS_PER_YEAR, state)?;
        let predicted = risk - previous_risk;
        previous_risk = risk;

        let data = (observed * INCIDENCE_SCALE).round() as i64;
        let prediction = (predicted * INCIDENCE_SCALE).round() as i64;
        writeln!(out, "    ${age}$ & ${data}$ & ${prediction}$ \\\\")?;
    }

    writeln!(out, "\\end{{tabular}}")?;
    Ok(())
}
