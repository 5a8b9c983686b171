//! geocam CLI - Command-line interface
//!
//! Coordinate conversion, bearing and distance helpers, and replay of
//! recorded map sessions through the camera controller.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use geocam::GeocamConfig;

use commands::common::FormatArg;
use commands::measure::Leg;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "geocam")]
#[command(version, about = "Coordinate conversion and map camera replay", long_about = None)]
struct Cli {
    /// Configuration file (INI)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Detect the format of a coordinate and print it in every format
    Convert {
        /// Coordinate text, e.g. "40° 26' 46.302\" N, 79° 56' 55.903\" W"
        #[arg(allow_hyphen_values = true)]
        text: String,

        /// Print only this format
        #[arg(long, value_enum)]
        to: Option<FormatArg>,
    },

    /// Show the entry form fields for a decimal coordinate
    Format {
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        #[arg(allow_negative_numbers = true)]
        lon: f64,

        /// Entry form format
        #[arg(long, value_enum, default_value = "dms")]
        format: FormatArg,
    },

    /// Initial great-circle bearing from the first point to the second
    Bearing {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
    },

    /// Great-circle distance between two points
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
    },

    /// Run a recorded session script through the camera controller
    Replay {
        /// JSON event script
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<GeocamConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => GeocamConfig::load(path)?,
        None => GeocamConfig::default(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if let Some(path) = &cli.log_file {
        config.logging.file = Some(path.clone());
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli)?;
    let _guard = geocam::logging::init_logging(&config.logging)?;

    match cli.command {
        Commands::Convert { text, to } => commands::convert::run_convert(&text, to),
        Commands::Format { lat, lon, format } => commands::convert::run_format(lat, lon, format),
        Commands::Bearing {
            lat1,
            lon1,
            lat2,
            lon2,
        } => commands::measure::run_bearing(Leg::new(lat1, lon1, lat2, lon2)?),
        Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => commands::measure::run_distance(Leg::new(lat1, lon1, lat2, lon2)?),
        Commands::Replay { file } => commands::replay::run(&file, &config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_negative_coordinates() {
        let cli = Cli::try_parse_from(["geocam", "bearing", "-12.5", "130.25", "-12.0", "-130.0"])
            .unwrap();
        match cli.command {
            Commands::Bearing { lat1, lon2, .. } => {
                assert_eq!(lat1, -12.5);
                assert_eq!(lon2, -130.0);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_convert_with_hyphen_text() {
        let cli = Cli::try_parse_from(["geocam", "convert", "-12.5, 130.25", "--to", "ddm"]).unwrap();
        match cli.command {
            Commands::Convert { text, to } => {
                assert_eq!(text, "-12.5, 130.25");
                assert_eq!(to, Some(FormatArg::Ddm));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["geocam", "replay", "session.json", "--verbose"]).unwrap();
        assert!(cli.verbose);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_format_defaults_to_dms() {
        let cli = Cli::try_parse_from(["geocam", "format", "40.5", "-79.9"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Format {
                format: FormatArg::Dms,
                ..
            }
        ));
    }

    #[test]
    fn test_config_file_and_log_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[camera]\nmin_distance_m = 20\n\n[logging]\nlevel = warn").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::try_parse_from([
            "geocam",
            "--config",
            path.as_str(),
            "--log-file",
            "/tmp/geocam-test.log",
            "distance",
            "0",
            "0",
            "1",
            "1",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.camera.min_distance_m, 20.0);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(
            config.logging.file,
            Some(PathBuf::from("/tmp/geocam-test.log"))
        );
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::try_parse_from(["geocam", "--config", "/nonexistent.ini", "replay", "x.json"])
            .unwrap();
        assert!(matches!(load_config(&cli), Err(CliError::Config(_))));
    }
}
