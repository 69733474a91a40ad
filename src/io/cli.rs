//! Command-line interface for evaluating preset models

use crate::closure::method::{ClosureEngine, ClosureOrder, Method};
use crate::io::configuration::{
    DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_HORIZON,
    DEFAULT_PROB_DYING, DEFAULT_PROB_MUTATE, DEFAULT_PROB_SPREAD, DEFAULT_SEED, DEFAULT_TRIALS,
    INCIDENCE_SCALE,
};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::export_grid_as_png;
use crate::io::report::{
    cancer_probability, histogram_bins, write_comparison, write_evolution_table, write_histogram,
    write_latex_table,
};
use crate::model::presets::{six_mutations, two_state};
use crate::model::{MarkovModel, State, Time, TransitionModel};
use crate::simulation::{MonteCarlo2D, MonteCarloConfig};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter
const LOG_ENV: &str = "RISQ_LOG";

#[derive(Parser, Debug)]
#[command(name = "risq")]
#[command(
    author,
    version,
    about = "Estimate cell state distributions of mutating and overgrowing cell grids"
)]
/// Command-line arguments for the estimation tool
pub struct Cli {
    /// What to compute
    #[command(subcommand)]
    pub command: Command,

    /// Preset model to evaluate
    #[arg(long, value_enum, default_value_t = Preset::TwoState, global = true)]
    pub preset: Preset,

    /// Per-step mutation probability
    #[arg(long, default_value_t = DEFAULT_PROB_MUTATE, global = true)]
    pub mutate: f64,

    /// Per-step overgrowth probability
    #[arg(long, default_value_t = DEFAULT_PROB_SPREAD, global = true)]
    pub spread: f64,

    /// Per-step dying probability (six-mutations preset only)
    #[arg(long, default_value_t = DEFAULT_PROB_DYING, global = true)]
    pub dying: f64,

    /// State to report, by label or index (defaults to `C`, else the last state)
    #[arg(short, long, global = true)]
    pub state: Option<String>,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Subcommands of the estimation tool
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Probability and variance per time step
    Evolve {
        /// Last time step to report
        #[arg(short, long, default_value_t = DEFAULT_HORIZON)]
        time: Time,
        /// Distance between reported time steps
        #[arg(long, default_value_t = 1)]
        step: usize,
        /// Closure engine(s) to use
        #[arg(short, long, value_enum, default_value_t = MethodChoice::Both)]
        method: MethodChoice,
    },

    /// Closure engines against a Monte Carlo simulation
    Compare {
        /// Number of simulated time steps
        #[arg(short, long, default_value_t = DEFAULT_HORIZON)]
        time: Time,
        /// Number of simulation trials
        #[arg(long, default_value_t = DEFAULT_TRIALS)]
        trials: usize,
        /// Simulated grid width
        #[arg(long, default_value_t = DEFAULT_GRID_WIDTH)]
        width: usize,
        /// Simulated grid height
        #[arg(long, default_value_t = DEFAULT_GRID_HEIGHT)]
        height: usize,
        /// Random seed for reproducible simulation
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
        /// Number of histogram bins for final counts (derived from the trial count if omitted)
        #[arg(long)]
        bins: Option<usize>,
        /// Write the final grid of the last trial as PNG
        #[arg(long, value_name = "PNG")]
        snapshot: Option<PathBuf>,
    },

    /// Probability that at least one of `cells` cells is in the state
    Risk {
        /// Time step to evaluate
        #[arg(short, long)]
        time: Time,
        /// Number of cells in the tissue
        #[arg(short, long)]
        cells: usize,
        /// Closure engine(s) to use
        #[arg(short, long, value_enum, default_value_t = MethodChoice::Both)]
        method: MethodChoice,
    },

    /// LaTeX table of observed against predicted incidence
    Latex {
        /// Number of cells in the tissue
        #[arg(short, long)]
        cells: usize,
        /// Observed incidence as `age:cases_per_100000`
        #[arg(long = "incidence", value_parser = parse_incidence, required = true)]
        incidence: Vec<(usize, f64)>,
        /// Closure engine(s) to use
        #[arg(short, long, value_enum, default_value_t = MethodChoice::Pair)]
        method: MethodChoice,
    },
}

/// Preset models selectable on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Healthy and cancerous cells
    TwoState,
    /// Healthy, six mutation stages, cancerous and dead cells
    SixMutations,
}

/// Closure engines selectable on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MethodChoice {
    /// Single-cell closure
    MeanField,
    /// Pair-correlation closure
    Pair,
    /// Both closures side by side
    Both,
}

impl MethodChoice {
    /// Closure orders selected by this choice
    pub fn orders(self) -> Vec<ClosureOrder> {
        match self {
            Self::MeanField => vec![ClosureOrder::MeanField],
            Self::Pair => vec![ClosureOrder::Pair],
            Self::Both => vec![ClosureOrder::MeanField, ClosureOrder::Pair],
        }
    }
}

/// Parse `age:cases_per_100000` into `(age, probability)`
///
/// # Errors
///
/// Returns a message if either part is missing or not a number.
pub fn parse_incidence(text: &str) -> std::result::Result<(usize, f64), String> {
    let (age, cases) = text
        .split_once(':')
        .ok_or_else(|| format!("expected `age:cases`, got `{text}`"))?;
    let age: usize = age
        .trim()
        .parse()
        .map_err(|e| format!("invalid age `{age}`: {e}"))?;
    let cases: f64 = cases
        .trim()
        .parse()
        .map_err(|e| format!("invalid case count `{cases}`: {e}"))?;
    Ok((age, cases / INCIDENCE_SCALE))
}

/// Install the global log subscriber writing to stderr
///
/// `RISQ_LOG` takes precedence over the verbosity flag.
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_err()
    {
        tracing::debug!("log subscriber already installed");
    }
}

/// Executes a parsed command line, writing reports to a sink
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner for the given arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.cli.quiet
    }

    /// Build the selected preset model
    ///
    /// # Errors
    ///
    /// Returns an error if the preset parameters do not form a valid model.
    pub fn build_model(&self) -> Result<MarkovModel> {
        match self.cli.preset {
            Preset::TwoState => two_state(self.cli.mutate, self.cli.spread),
            Preset::SixMutations => six_mutations(self.cli.mutate, self.cli.dying, self.cli.spread),
        }
    }

    /// Resolve the reported state from its label or index
    ///
    /// # Errors
    ///
    /// Returns an error if the state names neither a label nor a valid index.
    pub fn resolve_state<M: TransitionModel>(&self, model: &M) -> Result<State> {
        let labels = model.labels();
        match &self.cli.state {
            None => Ok(labels
                .iter()
                .position(|label| label == "C")
                .unwrap_or_else(|| model.last_state())),
            Some(text) => labels
                .iter()
                .position(|label| label == text)
                .or_else(|| text.parse().ok().filter(|&i: &State| i < model.num_states()))
                .ok_or_else(|| {
                    invalid_parameter("state", text, &format!("expected one of {labels:?}"))
                }),
        }
    }

    /// Run the selected command
    ///
    /// # Errors
    ///
    /// Returns an error if the model is invalid, a computation fails or the
    /// output cannot be written.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<()> {
        let model = self.build_model()?;
        let state = self.resolve_state(&model)?;
        let label = model
            .labels()
            .get(state)
            .cloned()
            .unwrap_or_else(|| state.to_string());
        tracing::debug!(preset = ?self.cli.preset, state = %label, "model ready");

        match &self.cli.command {
            Command::Evolve { time, step, method } => {
                if *step == 0 {
                    return Err(invalid_parameter("step", step, &"must be positive"));
                }
                let times: Vec<Time> = (0..=*time).step_by(*step).collect();
                let mut engines = engines(&model, *method);
                let mut methods = as_methods(&mut engines);
                write_evolution_table(out, &mut methods, &times, state, &label)
            }
            Command::Compare {
                time,
                trials,
                width,
                height,
                seed,
                bins,
                snapshot,
            } => {
                let config = MonteCarloConfig {
                    trials: *trials,
                    width: *width,
                    height: *height,
                    time_steps: *time,
                    seed: *seed,
                    show_progress: self.should_show_progress(),
                };
                let mut simulation = MonteCarlo2D::new(&model, config)?;
                let mut engines = engines(&model, MethodChoice::Both);
                let mut methods = as_methods(&mut engines);
                let times: Vec<Time> = (0..=*time).collect();

                writeln!(out, "# state {label}")?;
                write_comparison(out, &mut simulation, &mut methods, &times, state)?;
                writeln!(out)?;

                let counts = simulation.final_counts(state)?;
                write_histogram(
                    out,
                    &counts,
                    simulation.num_cells(),
                    bins.unwrap_or_else(|| histogram_bins(*trials)),
                    &mut methods,
                    *time,
                    state,
                )?;

                if let Some(path) = snapshot {
                    let colors = model.colors().ok_or_else(|| {
                        invalid_parameter("snapshot", &path.display(), &"model has no state colors")
                    })?;
                    export_grid_as_png(simulation.last_grid()?, &colors, path)?;
                }
                Ok(())
            }
            Command::Risk {
                time,
                cells,
                method,
            } => {
                for mut engine in engines(&model, *method) {
                    let risk = cancer_probability(&mut engine, *cells, *time, state)?;
                    writeln!(out, "{}: {risk:.8}", engine.name())?;
                }
                Ok(())
            }
            Command::Latex {
                cells,
                incidence,
                method,
            } => {
                for mut engine in engines(&model, *method) {
                    writeln!(out, "% {}", engine.name())?;
                    write_latex_table(out, &mut engine, *cells, state, incidence)?;
                }
                Ok(())
            }
        }
    }
}

fn engines<M: TransitionModel>(model: M, choice: MethodChoice) -> Vec<ClosureEngine<M>>
where
    M: Copy,
{
    choice
        .orders()
        .into_iter()
        .map(|order| ClosureEngine::new(order, model))
        .collect()
}

fn as_methods<M: TransitionModel>(engines: &mut [ClosureEngine<M>]) -> Vec<&mut dyn Method> {
    engines
        .iter_mut()
        .map(|engine| engine as &mut dyn Method)
        .collect()
}
