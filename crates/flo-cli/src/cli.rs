use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Seasonal field allocation optimizer", long_about = None)]
pub struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Allocation optimisation sub-commands.
    Optimize {
        #[command(subcommand)]
        command: OptimizeCommands,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConfigProfile {
    Fast,
    #[default]
    Balanced,
    Quality,
}

impl ConfigProfile {
    pub fn to_config(self) -> flo_core::config::OptimizationConfig {
        match self {
            ConfigProfile::Fast => flo_core::config::OptimizationConfig::fast(),
            ConfigProfile::Balanced => flo_core::config::OptimizationConfig::balanced(),
            ConfigProfile::Quality => flo_core::config::OptimizationConfig::quality(),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlgorithmArg {
    #[default]
    Dp,
    Greedy,
}

impl AlgorithmArg {
    pub fn to_algorithm(self) -> flo_algo::Algorithm {
        match self {
            AlgorithmArg::Dp => flo_algo::Algorithm::Dp,
            AlgorithmArg::Greedy => flo_algo::Algorithm::Greedy,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum OptimizeCommands {
    /// Solve a full multi-field allocation.
    Allocate {
        #[arg(long)]
        fields: PathBuf,
        #[arg(long)]
        crops: PathBuf,
        #[arg(long)]
        weather: PathBuf,
        #[arg(long)]
        rules: Option<PathBuf>,
        #[arg(long)]
        horizon_start: chrono::NaiveDate,
        #[arg(long)]
        horizon_end: chrono::NaiveDate,
        #[arg(long, value_enum, default_value_t = ConfigProfile::default())]
        profile: ConfigProfile,
        #[arg(long, value_enum, default_value_t = AlgorithmArg::default())]
        algorithm: AlgorithmArg,
        #[arg(long)]
        enable_local_search: bool,
        #[arg(long)]
        enable_alns: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::default())]
        format: OutputFormat,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Rank admissible starts for one (field, crop) pair in a window.
    Period {
        #[arg(long)]
        field: String,
        #[arg(long)]
        crop: String,
        #[arg(long)]
        fields: PathBuf,
        #[arg(long)]
        crops: PathBuf,
        #[arg(long)]
        weather: PathBuf,
        #[arg(long)]
        window_start: chrono::NaiveDate,
        #[arg(long)]
        window_end: chrono::NaiveDate,
        #[arg(long, value_enum, default_value_t = OutputFormat::default())]
        format: OutputFormat,
    },
    /// Generate the raw candidate pool without solving.
    Candidates {
        #[arg(long)]
        fields: PathBuf,
        #[arg(long)]
        crops: PathBuf,
        #[arg(long)]
        weather: PathBuf,
        #[arg(long)]
        horizon_start: chrono::NaiveDate,
        #[arg(long)]
        horizon_end: chrono::NaiveDate,
        #[arg(long, value_enum, default_value_t = ConfigProfile::default())]
        profile: ConfigProfile,
        #[arg(long, value_enum, default_value_t = OutputFormat::default())]
        format: OutputFormat,
    },
    /// Apply move/insert/remove instructions to an existing result.
    Adjust {
        #[arg(long)]
        result: PathBuf,
        #[arg(long)]
        moves: PathBuf,
        #[arg(long)]
        fields: PathBuf,
        #[arg(long)]
        crops: PathBuf,
        #[arg(long)]
        weather: PathBuf,
        #[arg(long)]
        rules: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::default())]
        format: OutputFormat,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Report a single allocation's growth progress as of a date.
    Progress {
        #[arg(long)]
        field: String,
        #[arg(long)]
        crop: String,
        #[arg(long)]
        crops: PathBuf,
        #[arg(long)]
        weather: PathBuf,
        #[arg(long)]
        start_date: chrono::NaiveDate,
        #[arg(long)]
        as_of: chrono::NaiveDate,
    },
}
