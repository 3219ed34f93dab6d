use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "typoscan",
    version,
    about = "Typosquatting detection for dependency manifests"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Update(UpdateArgs),
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    #[arg(long, default_value = "typosquat-scorer")]
    pub scorer_command: String,

    #[arg(long, default_value = "typosquatting_results.json")]
    pub result_path: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    pub package: Option<String>,

    #[arg(long, conflicts_with = "package")]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value = "typosquat-scorer")]
    pub scorer_command: String,

    #[arg(long, default_value = "typosquatting_results.json")]
    pub result_path: PathBuf,

    #[arg(long, default_value_t = 0.85)]
    pub threshold: f64,

    #[arg(long, value_enum, default_value_t = ScoreDirection::AtOrAbove)]
    pub direction: ScoreDirection,

    #[arg(long, default_value_t = f64::EPSILON)]
    pub self_match_epsilon: f64,

    #[arg(long, default_value_t = false)]
    pub skip_refresh: bool,

    #[arg(long)]
    pub report_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ScoreDirection {
    AtOrAbove,
    AtOrBelow,
}

impl ScoreDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AtOrAbove => "at-or-above",
            Self::AtOrBelow => "at-or-below",
        }
    }
}
