use clap::Parser;

use crate::vm::{
    config::{GC_THRESHOLD, STACK_MAX},
    VmConfig,
};

// gcvm runner
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to an instruction script; runs the built-in demo when omitted
    #[arg(value_name = "FILE")]
    pub file_name: Option<String>,

    /// Start an interactive session
    #[arg(long, conflicts_with = "file_name")]
    pub repl: bool,

    /// Report parse and execution timings
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the parsed program before running it
    #[arg(short, long)]
    pub debug: bool,

    /// Do not print a line per collection cycle
    #[arg(short, long)]
    pub quiet: bool,

    /// Capacity of the root stack
    #[arg(long, value_name = "N", default_value_t = STACK_MAX)]
    pub stack_max: usize,

    /// Live object count that triggers the first collection
    #[arg(long, value_name = "N", default_value_t = GC_THRESHOLD)]
    pub threshold: usize,

    /// Lower bound for the threshold recomputed after each collection
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub min_threshold: usize,
}

impl Cli {
    pub fn config(&self) -> VmConfig {
        VmConfig {
            stack_max: self.stack_max,
            initial_threshold: self.threshold,
            min_threshold: self.min_threshold,
            report_collections: !self.quiet,
        }
    }
}
