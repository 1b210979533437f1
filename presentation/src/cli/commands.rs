//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for simulation reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every step, the itinerary, tallies and decks
    Full,
    /// Only the final itinerary
    Itinerary,
    /// JSON output
    Json,
}

impl From<OutputFormat> for tripvote_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => tripvote_domain::OutputFormat::Full,
            OutputFormat::Itinerary => tripvote_domain::OutputFormat::Itinerary,
            OutputFormat::Json => tripvote_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for tripvote
#[derive(Parser, Debug)]
#[command(name = "tripvote")]
#[command(author, version, about = "Group-trip consensus engine - swipe, vote, promote")]
#[command(long_about = r#"
tripvote promotes a candidate (hotel, restaurant, activity) into a trip's
shared itinerary once a quorum of the trip's members liked it.

The trip owner and every collaborator vote. With the default majority rule a
candidate needs floor(members / 2) + 1 likes. Promotion happens exactly once,
even when several members cross the threshold at the same moment.

Configuration files are loaded from (in priority order):
1. TRIPVOTE_* environment variables (e.g. TRIPVOTE_QUORUM__RULE=unanimous)
2. --config <path>     Explicit config file
3. ./tripvote.toml     Project-level config
4. ~/.config/tripvote/config.toml   Global config

Example:
  tripvote simulate demos/lisbon.toml
  tripvote simulate demos/lisbon.toml --output json
  tripvote threshold 1 2 3 4 5 --rule unanimous
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a scripted voting scenario against in-memory stores
    Simulate {
        /// Scenario file (.toml or .json)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format (defaults to [output] format, then full)
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,

        /// Suppress progress indicators
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the promotion threshold for the given trip sizes
    Threshold {
        /// Total members, owner included
        #[arg(value_name = "MEMBERS", required = true)]
        members: Vec<usize>,

        /// Quorum rule (defaults to [quorum] rule): majority, unanimous, atleast:N, N%
        #[arg(short, long, value_name = "RULE")]
        rule: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simulate() {
        let cli = Cli::parse_from(["tripvote", "-vv", "simulate", "lisbon.toml", "-o", "json"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Command::Simulate {
                file,
                output,
                quiet,
            }) => {
                assert_eq!(file, PathBuf::from("lisbon.toml"));
                assert_eq!(output, Some(OutputFormat::Json));
                assert!(!quiet);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_threshold() {
        let cli = Cli::parse_from(["tripvote", "threshold", "1", "2", "3", "--rule", "75%"]);
        match cli.command {
            Some(Command::Threshold { members, rule }) => {
                assert_eq!(members, vec![1, 2, 3]);
                assert_eq!(rule.as_deref(), Some("75%"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_threshold_requires_members() {
        assert!(Cli::try_parse_from(["tripvote", "threshold"]).is_err());
    }

    #[test]
    fn test_show_config_without_command() {
        let cli = Cli::parse_from(["tripvote", "--show-config", "--no-config"]);
        assert!(cli.show_config);
        assert!(cli.no_config);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
