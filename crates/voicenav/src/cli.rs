use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "voicenav")]
#[command(author, version, about)]
#[command(long_about = "Voice-driven campus navigation.\n\n\
    Say where you are and where you want to go, hear the directions, and get\n\
    the route as a QR code or a text message.\n\n\
    Examples:\n  \
    voicenav                              Start a voice session\n  \
    voicenav route Entrance Hostel        Print directions\n  \
    voicenav route Entrance Hostel --json Directions as JSON\n  \
    voicenav locations                    List known locations")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print directions between two locations without voice
    Route {
        /// Starting location (case-insensitive)
        start: String,

        /// Destination (case-insensitive)
        end: String,

        /// Also render the route image to this file (.svg or .png)
        #[arg(long)]
        image: Option<PathBuf>,

        /// Print the route as JSON
        #[arg(long)]
        json: bool,
    },

    /// List locations and the paths between them
    Locations,

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. session.max_attempts, render.format, sms.country_code).
        /// render.format is svg (labelled) or png (markers only, no labels).
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    /// Log level implied by the global flags.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Route {
                start,
                end,
                image,
                json,
            }) => crate::commands::route::run(&start, &end, image.as_deref(), json),
            Some(Commands::Locations) => crate::commands::locations::run(),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                println!("voicenav {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => crate::commands::navigate::run(self.quiet),
        }
    }
}
