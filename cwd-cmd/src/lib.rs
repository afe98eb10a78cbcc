//! Command implementations for the CWD CLI.
//!
//! Provides subcommands for preprocessing model exports, building the
//! waterdrop layout, and inspecting rankings and scenario codes.

use clap::Subcommand;
use std::path::PathBuf;

pub mod layout;
pub mod load;
pub mod preprocess;
pub mod rankings;
pub mod scenario;

#[derive(Subcommand)]
pub enum Command {
    /// Build the waterdrop layout and write it as JSON
    Layout {
        /// Objectives JSON (`[{obj, scens: [{name, delivs}]}]`)
        #[arg(short = 'i', long)]
        objectives: PathBuf,

        /// Descriptions JSON used for group display names
        #[arg(short = 'd', long)]
        descriptions: Option<PathBuf>,

        /// Primary grouping: objective or scenario
        #[arg(short = 'g', long, default_value = "objective")]
        grouping: String,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Settings JSON overriding the defaults
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Output path (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Convert per-objective CSV exports into the objectives JSON
    Preprocess {
        /// Directory of per-objective CSV files
        #[arg(short = 'i', long)]
        input_dir: PathBuf,

        /// Output path for the objectives JSON
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Header rows to skip after the scenario name row
        #[arg(long, default_value_t = 6)]
        skip_rows: usize,

        /// Months before the first water year starts
        #[arg(long, default_value_t = 3)]
        month_offset: usize,

        /// Reduce each series to N + 1 percentiles
        #[arg(long)]
        percentiles: Option<usize>,

        /// Only keep these objectives (repeatable)
        #[arg(long = "objective")]
        objectives: Vec<String>,

        /// Only keep these scenarios (repeatable)
        #[arg(long = "scenario")]
        scenarios: Vec<String>,
    },

    /// Print group and member rankings as CSV
    Rankings {
        /// Objectives JSON
        #[arg(short = 'i', long)]
        objectives: PathBuf,

        /// Grouping: objective or scenario
        #[arg(short = 'g', long, default_value = "objective")]
        grouping: String,

        /// Include one row per member
        #[arg(long)]
        members: bool,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
    },

    /// Decode a scenario code or key into setting indices
    Decode {
        /// Scenario number (`20`) or key (`expl0020`)
        code: String,
    },

    /// Encode setting indices (demand carryover priority regs minflow) into a key
    Encode {
        #[arg(num_args = 5, required = true)]
        indices: Vec<usize>,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Layout {
            objectives,
            descriptions,
            grouping,
            seed,
            config,
            output,
            pretty,
        } => layout::run_layout(&layout::LayoutArgs {
            objectives,
            descriptions,
            grouping,
            seed,
            config,
            output,
            pretty,
        }),
        Command::Preprocess {
            input_dir,
            output,
            skip_rows,
            month_offset,
            percentiles,
            objectives,
            scenarios,
        } => {
            let options = cwd_data::preprocess::PreprocessOptions {
                skip_rows,
                month_offset,
                percentiles,
                objective_filter: (!objectives.is_empty()).then_some(objectives),
                scenario_filter: (!scenarios.is_empty()).then_some(scenarios),
            };
            preprocess::run_preprocess(&input_dir, &output, &options)
        }
        Command::Rankings {
            objectives,
            grouping,
            members,
            seed,
            config,
        } => rankings::run_rankings(
            &objectives,
            &grouping,
            members,
            seed,
            config.as_deref(),
            std::io::stdout().lock(),
        ),
        Command::Decode { code } => scenario::run_decode(&code, std::io::stdout().lock()),
        Command::Encode { indices } => scenario::run_encode(&indices, std::io::stdout().lock()),
    }
}
