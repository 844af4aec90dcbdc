//! SignWeight CLI
//!
//! Assigns a numeric weight to every sign of a corpus by linear programming
//! and writes the weight map as JSON.
//!
//! ```text
//! signweight --corpus data/corpus.tsv --compounds data/compounds.tsv \
//!     --config weights.toml --output output/weights.json
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use owo_colors::OwoColorize;
use signweight::prelude::*;
use signweight::{ConstraintKind, SignWeightError};
use tracing::level_filters::LevelFilter;

mod exit;

use exit::CliExitCode;

/// Sign weight assignment by linear programming
#[derive(Parser, Debug)]
#[command(name = "signweight")]
#[command(version)]
#[command(about = "Assign positive weights to signs under curvature, hierarchy and compound constraints")]
struct Cli {
    /// Corpus table: inscription id and space-separated sign ids
    #[arg(long, value_name = "PATH")]
    corpus: PathBuf,

    /// Compound table: compound id and space-separated constituents
    #[arg(long, value_name = "PATH")]
    compounds: Option<PathBuf>,

    /// Modifier table: one modifier sign id per row
    #[arg(long, value_name = "PATH")]
    modifiers: Option<PathBuf>,

    /// Class configuration (TOML, or YAML by extension)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Bound mode, overriding the configuration
    #[arg(long, value_enum)]
    bounds: Option<BoundsArg>,

    /// Where to write the weight map
    #[arg(long, value_name = "PATH", default_value = "output/weights.json")]
    output: PathBuf,

    /// Solve time limit in seconds, overriding the configuration
    #[arg(long, value_name = "SECS")]
    time_limit: Option<u64>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BoundsArg {
    /// Per-class bounds
    Free,
    /// One narrow range for every sign
    Fixed,
}

impl From<BoundsArg> for BoundMode {
    fn from(arg: BoundsArg) -> Self {
        match arg {
            BoundsArg::Free => BoundMode::Free,
            BoundsArg::Fixed => BoundMode::Fixed,
        }
    }
}

impl Cli {
    fn level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    fn inputs(&self) -> Inputs {
        Inputs {
            corpus: self.corpus.clone(),
            compounds: self.compounds.clone(),
            modifiers: self.modifiers.clone(),
        }
    }

    // The file configuration with command-line overrides applied.
    fn weight_config(&self) -> Result<WeightConfig, SignWeightError> {
        let mut config = match &self.config {
            Some(path) => WeightConfig::load(path)?,
            None => WeightConfig::new(),
        };
        if let Some(bounds) = self.bounds {
            config = config.with_bound_mode(bounds.into());
        }
        if let Some(secs) = self.time_limit {
            config = config.with_termination_seconds(secs);
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    signweight::init_console_with_level(cli.level());
    run(&cli).into()
}

fn run(cli: &Cli) -> CliExitCode {
    match execute(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {}", "error:".bright_red().bold(), err);
            CliExitCode::from(&err)
        }
    }
}

fn execute(cli: &Cli) -> Result<CliExitCode, SignWeightError> {
    let pipeline = Pipeline::new(cli.weight_config()?)?;
    let outcome = pipeline.run(&cli.inputs())?;
    print_summary(&outcome);

    let code = CliExitCode::from(outcome.solution.status());
    if outcome.write_weights(&cli.output)? {
        println!("Weights written to {}", display(&cli.output).bright_white());
    } else {
        eprintln!(
            "{} no weight map written: solve ended {}",
            "error:".bright_red().bold(),
            outcome.solution.status()
        );
    }
    Ok(code)
}

fn print_summary(outcome: &RunOutcome) {
    let report = outcome.report();

    println!();
    println!("{}", "Summary".bright_cyan().bold());
    println!("  inscriptions   {}", outcome.inscription_count);
    println!("  vocabulary     {}", outcome.vocabulary_size());
    for kind in ConstraintKind::ALL {
        println!("  {:<14} {}", kind.as_str(), report.count(kind));
    }
    let status = report.status.as_str().to_uppercase();
    if report.status.has_solution() {
        println!("  status         {}", status.bright_green().bold());
    } else {
        println!("  status         {}", status.bright_red().bold());
    }
    if let Some(objective) = report.objective {
        println!("  objective      {:.4}", objective);
    }
    if report.status.has_solution() {
        if report.violations == 0 {
            println!("  violations     {}", "0".bright_green());
        } else {
            println!("  violations     {}", report.violations.to_string().yellow().bold());
        }
    }
    for warning in &report.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }
    println!();
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
