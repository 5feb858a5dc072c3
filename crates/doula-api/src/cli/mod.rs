//! CLI command definitions for the `doula` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod bp;
pub mod chat;
pub mod history;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Pregnancy-assistant chat backend.
#[derive(Parser)]
#[command(name = "doula", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to `[server] port`).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `[server] host`).
        #[arg(long)]
        host: Option<String>,

        /// Export spans to stdout via OpenTelemetry.
        #[arg(long)]
        otel: bool,
    },

    /// Send one message to a session and print the reply.
    Chat {
        /// Session id.
        session: String,

        /// Message text.
        message: String,

        /// Author id recorded for the user.
        #[arg(long, default_value = "cli")]
        user: String,
    },

    /// Show a session's stored turns, oldest first.
    History {
        /// Session id.
        session: String,

        /// Maximum number of turns to show.
        #[arg(short = 'n', long)]
        limit: Option<i64>,

        /// Number of turns to skip.
        #[arg(long)]
        offset: Option<i64>,
    },

    /// Show a patient's blood-pressure history.
    Bp {
        /// Patient id.
        patient_id: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Shorten `text` to at most `max` characters for table display.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_serve_overrides() {
        let cli = Cli::try_parse_from(["doula", "serve", "--port", "9000", "--otel"]).unwrap();
        match cli.command {
            Commands::Serve { port, host, otel } => {
                assert_eq!(port, Some(9000));
                assert!(host.is_none());
                assert!(otel);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn parses_history_with_global_json() {
        let cli = Cli::try_parse_from(["doula", "history", "s1", "-n", "5", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::History { limit: Some(5), .. }
        ));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééééé", 6), "ééé...");
    }
}
