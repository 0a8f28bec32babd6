//! CLI argument parsing for couchdeck.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "couchdeck")]
#[command(about = "Couch-friendly app launcher overlay", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging (logs to ~/.cache/couchdeck/couchdeck.log)
    #[arg(short, long)]
    pub debug: bool,

    /// Config file (defaults to ~/.config/couchdeck/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// App catalog (defaults to ~/.config/couchdeck/apps.json)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive launcher (default)
    Run,

    /// Print the grid geometry for a viewport as JSON
    Layout {
        #[arg(long)]
        width: f64,

        #[arg(long)]
        height: f64,

        /// Number of items to place
        #[arg(long, default_value_t = 0)]
        count: usize,
    },

    /// Print the catalog in grid order
    Order,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_no_command() {
        let cli = Cli::try_parse_from(["couchdeck"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn test_layout_args() {
        let cli = Cli::try_parse_from([
            "couchdeck", "layout", "--width", "100", "--height", "30", "--count", "5",
        ])
        .unwrap();
        let Some(Commands::Layout {
            width,
            height,
            count,
        }) = cli.command
        else {
            panic!("expected layout");
        };
        assert!((width - 100.0).abs() < f64::EPSILON);
        assert!((height - 30.0).abs() < f64::EPSILON);
        assert_eq!(count, 5);
    }

    #[test]
    fn test_global_paths_after_subcommand() {
        let cli = Cli::try_parse_from(["couchdeck", "order", "--catalog", "/tmp/apps.json"]).unwrap();
        assert_eq!(cli.catalog, Some(PathBuf::from("/tmp/apps.json")));
    }
}
