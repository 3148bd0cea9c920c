// ABOUTME: CLI argument parsing and command routing for fieldvisit
//
// Provides command-line interface for:
// - Launching the TUI (tui, default), optionally straight into a form with the guided tour
// - Printing the guided tour steps for a screen and role (steps)
// - Printing the effective configuration (config)

pub mod config;
pub mod steps;

use crate::models::Role;
use clap::{Parser, Subcommand, ValueEnum};

/// Field visit reports and purchase orders for pharmaceutical representatives
#[derive(Parser)]
#[command(name = "fieldvisit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Form screens reachable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Screen {
    Order,
    Report,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Launch the TUI (default if no command given)
    Tui(TuiArgs),

    /// Print the guided tour steps for a screen
    Steps(StepsArgs),

    /// Print the effective configuration
    Config,
}

/// Arguments for the tui command
#[derive(clap::Args, Default)]
pub struct TuiArgs {
    /// Open this form instead of the home screen
    #[arg(long)]
    pub screen: Option<Screen>,

    /// Override the configured role
    #[arg(long)]
    pub role: Option<Role>,

    /// Start the guided tour on the opened form
    #[arg(long, requires = "screen")]
    pub tour: bool,
}

/// Arguments for the steps command
#[derive(clap::Args)]
pub struct StepsArgs {
    /// Which form's tour to print
    #[arg(long, default_value = "report")]
    pub screen: Screen,

    /// Role to compute the steps for (defaults to the configured role)
    #[arg(long)]
    pub role: Option<Role>,

    /// Include the commercial visit steps of a hybrid report
    #[arg(long)]
    pub commercial_added: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_means_tui() {
        let cli = Cli::try_parse_from(["fieldvisit"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_tui_with_tour() {
        let cli =
            Cli::try_parse_from(["fieldvisit", "tui", "--screen", "order", "--role", "commercial", "--tour"])
                .unwrap();
        match cli.command {
            Some(Commands::Tui(args)) => {
                assert_eq!(args.screen, Some(Screen::Order));
                assert_eq!(args.role, Some(Role::Commercial));
                assert!(args.tour);
            }
            _ => panic!("expected tui command"),
        }
    }

    #[test]
    fn test_tour_requires_screen() {
        assert!(Cli::try_parse_from(["fieldvisit", "tui", "--tour"]).is_err());
    }

    #[test]
    fn test_steps_json() {
        let cli = Cli::try_parse_from([
            "fieldvisit",
            "steps",
            "--role",
            "hybrid",
            "--commercial-added",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Some(Commands::Steps(args)) => {
                assert_eq!(args.screen, Screen::Report);
                assert!(args.commercial_added);
            }
            _ => panic!("expected steps command"),
        }
    }
}
