//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to the command handlers.

use crate::commands::{self, RenderOptions};
use crate::logging;
use crate::wave::FadeVariant;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

/// A terminal waveform viewer for mono PCM WAVE files
#[derive(Parser)]
#[command(name = "wavetrace")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[command(about = "Terminal waveform viewer for mono PCM WAVE files")]
#[command(long_about = "Terminal waveform viewer for mono PCM WAVE files.\n\nLoads an uncompressed mono WAVE file and draws its waveform, cycling through\nfive symmetric fade envelopes: none, linear, quadratic, exponential and\nlogarithmic.\n\nDEFAULT COMMAND:\n    If no command is specified, 'view' is used by default.\n\nEXAMPLES:\n    # Open a file in the viewer\n    $ wavetrace voice.wav\n\n    # Pick the file interactively\n    $ wavetrace\n\n    # Start on the quadratic fade\n    $ wavetrace view voice.wav --fade quadratic\n\n    # Show header fields and value ranges\n    $ wavetrace info voice.wav\n\n    # Rasterize to x/y pairs for another plotting tool\n    $ wavetrace render voice.wav --width 800 --height 200 -o trace.txt")]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/wavetrace/wavetrace.toml\n    Logs:               ~/.local/state/wavetrace/wavetrace.log.*"
)]
struct Cli {
    /// WAVE file to open in the viewer (view default command)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Fade type shown first (view default command)
    #[arg(short, long, value_name = "FADE")]
    fade: Option<FadeVariant>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a WAVE file in the waveform viewer (default)
    ///
    /// Press n, Space or Enter for the next fade type, q or Escape to quit.
    /// Without FILE, the path is asked for interactively.
    #[command(visible_alias = "v")]
    View {
        /// WAVE file to open
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Fade type shown first
        #[arg(short, long, value_name = "FADE")]
        fade: Option<FadeVariant>,
    },

    /// Print header metadata and the value range of every fade type
    #[command(visible_alias = "i")]
    Info {
        /// WAVE file to inspect
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Rasterize a WAVE file and print the polyline as `x y` pairs
    ///
    /// Width and height default to the [render] section of the config file.
    Render {
        /// WAVE file to rasterize
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Canvas width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Canvas height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Fade type to rasterize
        #[arg(short, long, value_name = "FADE", default_value = "none")]
        fade: FadeVariant,

        /// Write to file instead of stdout
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Open configuration file in your preferred editor
    ///
    /// Uses $EDITOR or falls back to nano/vi.
    #[command(visible_alias = "c")]
    Config,

    /// Show recent log entries
    Logs,

    /// Generate shell completion script
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If command execution fails (e.g., the file cannot be decoded)
pub fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Commands that don't need logging
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "wavetrace", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::Logs) => return commands::handle_logs(),
        _ => {}
    }

    logging::init_logging()?;

    match cli.command {
        None => commands::handle_view(cli.file, cli.fade)?,
        Some(Commands::View { file, fade }) => commands::handle_view(file, fade)?,
        Some(Commands::Info { file }) => commands::handle_info(&file)?,
        Some(Commands::Render {
            file,
            width,
            height,
            fade,
            output,
        }) => {
            commands::handle_render(
                &file,
                RenderOptions {
                    width,
                    height,
                    fade,
                    output,
                },
            )?;
        }
        Some(Commands::Config) => commands::handle_config()?,
        Some(Commands::Completions { .. }) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_takes_file_and_fade() {
        let cli = Cli::try_parse_from(["wavetrace", "voice.wav", "--fade", "linear"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.file, Some(PathBuf::from("voice.wav")));
        assert_eq!(cli.fade, Some(FadeVariant::Linear));
    }

    #[test]
    fn test_render_defaults() {
        let cli = Cli::try_parse_from(["wavetrace", "render", "a.wav"]).unwrap();
        match cli.command {
            Some(Commands::Render {
                file,
                width,
                height,
                fade,
                output,
            }) => {
                assert_eq!(file, PathBuf::from("a.wav"));
                assert_eq!((width, height), (None, None));
                assert_eq!(fade, FadeVariant::None);
                assert!(output.is_none());
            }
            _ => panic!("expected render command"),
        }
    }

    #[test]
    fn test_unknown_fade_is_usage_error() {
        assert!(Cli::try_parse_from(["wavetrace", "info", "a.wav", "--fade", "x"]).is_err());
        assert!(Cli::try_parse_from(["wavetrace", "view", "a.wav", "--fade", "cosine"]).is_err());
    }
}
