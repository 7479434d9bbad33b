//! CLI command definitions using clap.
//!
//! - reconcile: drive a manifest to convergence
//! - validate: load and check a manifest without running it

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vibeos::domain::is_valid_stagnation_threshold;

/// VibeOS - reconcile software against a declarative manifest
#[derive(Parser, Debug)]
#[command(name = "vibeos")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the reconciliation loop
    Reconcile {
        /// Path to the manifest file (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Maximum reconciliation iterations
        #[arg(long)]
        max_loops: Option<u32>,

        /// Number of recent loops inspected for stagnation
        #[arg(long)]
        max_stagnation: Option<usize>,

        /// Minimum fractional improvement between loops (0-1)
        #[arg(long, value_parser = parse_threshold)]
        threshold: Option<f64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load and validate a manifest
    Validate {
        /// Path to the manifest file (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,
    },
}

fn parse_threshold(value: &str) -> Result<f64, String> {
    let threshold: f64 = value.parse().map_err(|e| format!("{}", e))?;
    if is_valid_stagnation_threshold(threshold) {
        Ok(threshold)
    } else {
        Err(format!("threshold must be between 0.0 and 1.0, got {}", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["vibeos"]).is_err());
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from(["vibeos", "-v", "-c", "/tmp/vibeos.yml", "validate", "-m", "m.yml"]).unwrap();
        assert!(cli.is_verbose());
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/vibeos.yml")));
    }

    #[test]
    fn test_reconcile_defaults() {
        let cli = Cli::try_parse_from(["vibeos", "reconcile", "--manifest", "login.yml"]).unwrap();
        match cli.command {
            Commands::Reconcile {
                manifest,
                max_loops,
                max_stagnation,
                threshold,
                json,
            } => {
                assert_eq!(manifest, PathBuf::from("login.yml"));
                assert!(max_loops.is_none());
                assert!(max_stagnation.is_none());
                assert!(threshold.is_none());
                assert!(!json);
            }
            _ => panic!("Expected reconcile command"),
        }
    }

    #[test]
    fn test_reconcile_overrides() {
        let cli = Cli::try_parse_from([
            "vibeos",
            "reconcile",
            "-m",
            "login.yml",
            "--max-loops",
            "3",
            "--max-stagnation",
            "2",
            "--threshold",
            "0.5",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Reconcile {
                max_loops,
                max_stagnation,
                threshold,
                json,
                ..
            } => {
                assert_eq!(max_loops, Some(3));
                assert_eq!(max_stagnation, Some(2));
                assert_eq!(threshold, Some(0.5));
                assert!(json);
            }
            _ => panic!("Expected reconcile command"),
        }
    }

    #[test]
    fn test_reconcile_rejects_out_of_range_threshold() {
        for bad in ["--threshold=1.5", "--threshold=-0.1", "--threshold=NaN", "--threshold=abc"] {
            let parsed = Cli::try_parse_from(["vibeos", "reconcile", "-m", "login.yml", bad]);
            assert!(parsed.is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_reconcile_accepts_threshold_bounds() {
        for ok in ["--threshold=0", "--threshold=1"] {
            assert!(Cli::try_parse_from(["vibeos", "reconcile", "-m", "login.yml", ok]).is_ok());
        }
    }

    #[test]
    fn test_reconcile_requires_manifest() {
        assert!(Cli::try_parse_from(["vibeos", "reconcile"]).is_err());
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
