//! Command-line arguments.

use clap::{Parser, Subcommand};
use trowel_core::model::Algorithm;

/// Trowel: wall-finishing robot control system
#[derive(Parser, Debug)]
#[command(name = "trowel", version)]
#[command(about = "Wall-finishing robot control system", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "TROWEL_CONFIG")]
    pub config: Option<String>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API until interrupted
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Create tables and indexes, then run column migrations
    Migrate,
    /// Store a 5 m x 5 m wall with a centred 0.25 m window
    Sample,
    /// Plan and store a trajectory without starting the server
    Plan {
        /// Wall to plan
        #[arg(long)]
        wall_id: i64,
        /// Coverage pattern
        #[arg(long, default_value = "boustrophedon")]
        algorithm: Algorithm,
        /// Tool width in metres
        #[arg(long)]
        robot_width: Option<f64>,
        /// Overlap between passes in percent
        #[arg(long)]
        overlap: Option<f64>,
        /// Sampling step in metres
        #[arg(long)]
        resolution: Option<f64>,
    },
    /// Inspect or edit the configuration file
    Config {
        /// Config action
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `trowel config` subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved config file path
    Path,
    /// Print one value by dotted key (e.g. `server.port`)
    Get {
        /// Dotted key
        key: String,
    },
    /// Set one value by dotted key in the config file
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },
    /// Write a default config file
    Init {
        /// Target path (defaults to the platform config dir)
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration as environment variables
    Export {
        /// Format as `--env KEY=VALUE` for `docker run`
        #[arg(long)]
        docker_env: bool,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_plan() {
        let cli = Cli::try_parse_from([
            "trowel", "plan", "--wall-id", "3", "--algorithm", "spiral", "--resolution", "0.05",
        ])
        .unwrap();
        match cli.command {
            Command::Plan {
                wall_id,
                algorithm,
                resolution,
                robot_width,
                ..
            } => {
                assert_eq!(wall_id, 3);
                assert_eq!(algorithm, Algorithm::Spiral);
                assert_eq!(resolution, Some(0.05));
                assert_eq!(robot_width, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_algorithm() {
        let parsed = Cli::try_parse_from(["trowel", "plan", "--wall-id", "1", "--algorithm", "random"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_parse_config_set_with_global_flag() {
        let cli = Cli::try_parse_from([
            "trowel", "config", "set", "server.port", "9000", "-c", "/tmp/trowel.toml",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some("/tmp/trowel.toml"));
        assert!(matches!(
            cli.command,
            Command::Config {
                action: ConfigAction::Set { .. }
            }
        ));
    }
}
