use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "MELTING CLI - Enthalpy, entropy and melting temperature of nucleic acid duplexes from nearest-neighbor models or approximative formulas.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the enthalpy, entropy and melting temperature of a duplex.
    Compute(ComputeArgs),
    /// Compute the sodium-equivalent concentration of a solution.
    SodiumEquivalent(SodiumEquivalentArgs),
}

/// Arguments for the `compute` subcommand.
#[derive(Args, Debug, Default)]
pub struct ComputeArgs {
    // --- Duplex ---
    /// Sequence of the first strand, 5' to 3'.
    #[arg(short = 'S', long, required = true, value_name = "SEQUENCE")]
    pub sequence: String,

    /// Complementary strand, 3' to 5'. Required for inosine or 8-hydroxyadenine.
    #[arg(short = 'C', long = "complement", value_name = "SEQUENCE")]
    pub complement: Option<String>,

    /// Hybridization type (dnadna, rnarna, mrnarna, rnamrna, dnarna, rnadna).
    #[arg(short = 'H', long, value_name = "TYPE")]
    pub hybridization: Option<String>,

    /// Treat the duplex as self-complementary.
    #[arg(long)]
    pub self_complementary: bool,

    // --- Solution ---
    /// Solution composition, e.g. 'Na=0.05:Mg=0.0015:DMSO=5'. Concentrations in mol/L, DMSO in %.
    #[arg(short = 'E', long, value_name = "COMPOSITION")]
    pub solution: Option<String>,

    /// Concentration of the strand in excess, in mol/L.
    #[arg(short = 'P', long, value_name = "FLOAT")]
    pub concentration: Option<f64>,

    /// Correction factor of the strand concentration for non self-complementary duplexes.
    #[arg(short = 'F', long, value_name = "INT")]
    pub factor: Option<u32>,

    // --- Method Selection ---
    /// Duplex length from which the default mode switches to the approximative formulas.
    #[arg(short = 'T', long, value_name = "INT")]
    pub threshold: Option<usize>,

    /// Computation mode: 'def', 'A' (approximative) or 'NN' (nearest-neighbor).
    #[arg(long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Model override for one category, e.g. 'nn=san04' or 'sinMM=:custom.toml'. Repeatable.
    #[arg(long = "method", value_name = "CATEGORY=NAME[:FILE]")]
    pub methods: Vec<String>,

    // --- Files ---
    /// Directory holding the parameter files. Defaults to the bundled data directory.
    #[arg(long, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for the `sodium-equivalent` subcommand.
#[derive(Args, Debug)]
pub struct SodiumEquivalentArgs {
    /// Solution composition, e.g. 'Na=0.05:Mg=0.0015:dNTP=0.0005'.
    #[arg(short = 'E', long, required = true, value_name = "COMPOSITION")]
    pub solution: String,

    /// Sodium-equivalence model, written 'naeq=NAME'.
    #[arg(long, value_name = "naeq=NAME")]
    pub method: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn compute_accepts_short_flags_and_repeated_methods() {
        let cli = Cli::try_parse_from([
            "melting", "-vv", "compute", "-S", "AACG", "-C", "TTGC", "-H", "dnadna", "-E", "Na=1",
            "-P", "0.0001", "--method", "nn=san96", "--method", "ion=san96",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Compute(args) = cli.command else {
            panic!("expected the compute command");
        };
        assert_eq!(args.sequence, "AACG");
        assert_eq!(args.complement.as_deref(), Some("TTGC"));
        assert_eq!(args.concentration, Some(0.0001));
        assert_eq!(args.methods, vec!["nn=san96", "ion=san96"]);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["melting", "-q", "-v", "sodium-equivalent", "-E", "Na=1"]);
        assert!(result.is_err());
    }
}
