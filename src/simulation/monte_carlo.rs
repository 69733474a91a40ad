//! Brute-force simulation of a periodic square grid
//!
//! Serves as an empirical baseline for the closure engines: it shares their
//! output contract but never consults them.

use ndarray::Array2;

use crate::closure::method::{Method, check_state};
use crate::io::configuration::{
    DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_HORIZON, DEFAULT_SEED, DEFAULT_TRIALS,
};
use crate::io::error::{Result, computation_error, invalid_parameter};
use crate::io::progress::ProgressReporter;
use crate::model::{State, Time, TransitionModel};
use crate::simulation::sampler::RandomSelector;

/// Von Neumann neighborhood size of the simulated grid
const GRID_NEIGHBORS: usize = 4;

/// Simulation size and reproducibility settings
#[derive(Clone, Copy, Debug)]
pub struct MonteCarloConfig {
    /// Number of independent trials
    pub trials: usize,
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Number of simulated steps per trial
    pub time_steps: usize,
    /// Random seed
    pub seed: u64,
    /// Draw a progress bar over trials
    pub show_progress: bool,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            time_steps: DEFAULT_HORIZON,
            seed: DEFAULT_SEED,
            show_progress: false,
        }
    }
}

/// Aggregated counts over all trials
struct SimulationResults {
    /// Sum over trials of the cell count, indexed by (`time - 1`, state)
    sum_cells: Array2<f64>,
    /// Sum over trials of the squared cell count
    sum_square_cells: Array2<f64>,
    /// Cell counts per state at the horizon, one row per trial
    final_counts: Array2<usize>,
    /// Grid of the last trial at the horizon
    last_grid: Array2<State>,
}

/// Monte Carlo estimator on a `height x width` torus
pub struct MonteCarlo2D<M> {
    model: M,
    config: MonteCarloConfig,
    selector: RandomSelector,
    results: Option<SimulationResults>,
}

impl<M: TransitionModel> MonteCarlo2D<M> {
    /// Create a simulator; nothing runs until the first query
    ///
    /// # Errors
    ///
    /// Returns an error if any size in `config` is zero or the model is not a
    /// 4-neighbor model.
    pub fn new(model: M, config: MonteCarloConfig) -> Result<Self> {
        for (parameter, value) in [
            ("trials", config.trials),
            ("width", config.width),
            ("height", config.height),
            ("time_steps", config.time_steps),
        ] {
            if value == 0 {
                return Err(invalid_parameter(parameter, &value, &"must be positive"));
            }
        }
        if model.num_neighbors() != GRID_NEIGHBORS {
            return Err(invalid_parameter(
                "num_neighbors",
                &model.num_neighbors(),
                &"the simulated grid is a square lattice with 4 neighbors",
            ));
        }

        Ok(Self {
            model,
            selector: RandomSelector::new(config.seed),
            config,
            results: None,
        })
    }

    /// Number of cells in one grid
    pub const fn num_cells(&self) -> usize {
        self.config.width * self.config.height
    }

    /// Simulation settings
    pub const fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Number of cells in `state` at the horizon, one entry per trial
    ///
    /// # Errors
    ///
    /// Returns an error for unknown states.
    pub fn final_counts(&mut self, state: State) -> Result<Vec<usize>> {
        check_state(&self.model, state)?;
        let results = self.results()?;
        Ok(results.final_counts.column(state).to_vec())
    }

    /// Grid of the last trial at the horizon
    ///
    /// # Errors
    ///
    /// Returns an error if the simulation produced no results.
    pub fn last_grid(&mut self) -> Result<&Array2<State>> {
        Ok(&self.results()?.last_grid)
    }

    fn results(&mut self) -> Result<&SimulationResults> {
        if self.results.is_none() {
            self.results = Some(self.simulate());
        }
        self.results
            .as_ref()
            .ok_or_else(|| computation_error("Monte Carlo simulation", &"no results"))
    }

    fn check_time(&self, time: Time) -> Result<()> {
        if time > self.config.time_steps {
            return Err(invalid_parameter(
                "time",
                &time,
                &format!("simulation only covers {} steps", self.config.time_steps),
            ));
        }
        Ok(())
    }

    fn simulate(&mut self) -> SimulationResults {
        let MonteCarloConfig {
            trials,
            width,
            height,
            time_steps,
            ..
        } = self.config;
        let num_states = self.model.num_states();

        let mut sum_cells = Array2::zeros((time_steps, num_states));
        let mut sum_square_cells = Array2::zeros((time_steps, num_states));
        let mut final_counts = Array2::zeros((trials, num_states));
        let mut cells = Array2::from_elem((height, width), self.model.initial_state());

        let progress = ProgressReporter::new("Monte Carlo", trials, self.config.show_progress);

        for trial in 0..trials {
            cells.fill(self.model.initial_state());

            for t in 0..time_steps {
                cells = self.step(t + 1, &cells);

                let counts = self.count_states(&cells);
                for (state, &count) in counts.iter().enumerate() {
                    let count = count as f64;
                    if let Some(sum) = sum_cells.get_mut((t, state)) {
                        *sum += count;
                    }
                    if let Some(sum) = sum_square_cells.get_mut((t, state)) {
                        *sum += count * count;
                    }
                }
            }

            for (state, count) in self.count_states(&cells).into_iter().enumerate() {
                if let Some(entry) = final_counts.get_mut((trial, state)) {
                    *entry = count;
                }
            }
            progress.tick();
        }
        progress.finish();

        tracing::info!(
            trials,
            width,
            height,
            time_steps,
            "Monte Carlo simulation complete"
        );

        SimulationResults {
            sum_cells,
            sum_square_cells,
            final_counts,
            last_grid: cells,
        }
    }

    fn count_states(&self, cells: &Array2<State>) -> Vec<usize> {
        let mut counts = vec![0; self.model.num_states()];
        for &state in cells {
            if let Some(count) = counts.get_mut(state) {
                *count += 1;
            }
        }
        counts
    }

    /// Advance every cell by one step; new states depend on the old grid only
    fn step(&mut self, time: Time, cells: &Array2<State>) -> Array2<State> {
        Array2::from_shape_fn(cells.dim(), |(row, col)| {
            self.simulate_cell(time, cells, row, col)
        })
    }

    fn simulate_cell(&mut self, time: Time, cells: &Array2<State>, row: usize, col: usize) -> State {
        let (height, width) = cells.dim();
        let at = |r: usize, c: usize| cells.get((r, c)).copied().unwrap_or(0);
        let old = at(row, col);

        // Overgrown by the first neighbor, in random order, whose spread succeeds
        let mut neighbors = [
            at(row, (col + 1) % width),
            at(row, (col + width - 1) % width),
            at((row + 1) % height, col),
            at((row + height - 1) % height, col),
        ];
        self.selector.shuffle(&mut neighbors);
        for attacker in neighbors {
            if self.selector.chance(self.model.prob_spread(time, attacker, old)) {
                return attacker;
            }
        }

        // Otherwise the cell follows its internal transition
        let weights: Vec<f64> = self
            .model
            .states()
            .map(|new| self.model.prob_internal(time, new, old))
            .collect();
        self.selector.weighted_choice(&weights)
    }
}

impl<M: TransitionModel> Method for MonteCarlo2D<M> {
    fn probability(&mut self, time: Time, state: State) -> Result<f64> {
        check_state(&self.model, state)?;
        self.check_time(time)?;
        if time == 0 {
            return Ok(self.model.prob_initial(&[state]));
        }

        let normalization = (self.config.trials * self.num_cells()) as f64;
        let results = self.results()?;
        let sum = results
            .sum_cells
            .get((time - 1, state))
            .copied()
            .unwrap_or(0.0);
        Ok(sum / normalization)
    }

    fn variance(&mut self, time: Time, state: State) -> Result<f64> {
        check_state(&self.model, state)?;
        self.check_time(time)?;
        if time == 0 {
            return Ok(0.0);
        }

        let trials = self.config.trials as f64;
        let num_cells = self.num_cells() as f64;
        let results = self.results()?;
        let count_per_trial = results
            .sum_cells
            .get((time - 1, state))
            .copied()
            .unwrap_or(0.0)
            / trials;
        let square_count_per_trial = results
            .sum_square_cells
            .get((time - 1, state))
            .copied()
            .unwrap_or(0.0)
            / trials;

        Ok((square_count_per_trial - count_per_trial * count_per_trial) / num_cells)
    }

    fn name(&self) -> &'static str {
        "Monte Carlo"
    }
}
