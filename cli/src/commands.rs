//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for enzymeml-tools
#[derive(Parser, Debug)]
#[command(name = "enzymeml-tools")]
#[command(author, version, about = "Tool-chain utilities for EnzymeML extraction")]
#[command(long_about = r#"
Inspect configuration, list the declared tools and run the database search
tool against the public biochemical databases.

Configuration is loaded from (in priority order):
1. ENZYMEML_* environment variables   e.g. ENZYMEML_RETRY__RETRIES=0
2. --config <path>                    Explicit config file
3. ./enzymeml.toml                    Project-level config
4. ~/.config/enzymeml-llm/config.toml Global config

Example:
  enzymeml-tools fetch uniprot P00722 P00723
  enzymeml-tools -vv fetch --split pdb 1A0O 4HHB
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show configuration sources and the effective configuration
    Config,

    /// Print the declared tool specifications as JSON
    Tools,

    /// Look up records through the database search tool
    Fetch {
        /// Database to query (chebi, pdb, uniprot, rhea, pubchem)
        database: String,

        /// Record identifiers
        #[arg(required = true, value_name = "ID")]
        ids: Vec<String>,

        /// Issue one tool call per identifier instead of a single batch call
        #[arg(long)]
        split: bool,

        /// Override the JSONL chain event log path
        #[arg(long, value_name = "PATH")]
        events: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fetch() {
        let cli = Cli::parse_from(["enzymeml-tools", "-vv", "fetch", "--split", "pdb", "1A0O", "4HHB"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Fetch {
                database,
                ids,
                split,
                events,
            } => {
                assert_eq!(database, "pdb");
                assert_eq!(ids, vec!["1A0O", "4HHB"]);
                assert!(split);
                assert!(events.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_fetch_requires_an_id() {
        assert!(Cli::try_parse_from(["enzymeml-tools", "fetch", "uniprot"]).is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["enzymeml-tools", "tools", "--config", "lab.toml"]);
        assert!(matches!(cli.command, Command::Tools));
        assert_eq!(cli.config, Some(PathBuf::from("lab.toml")));
    }
}
