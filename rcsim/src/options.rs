use anyhow::{anyhow, Error as AnyError};
use clap::{Parser, Subcommand};
use rcs::{geo::geometry::Coord, morse::DEFAULT_PORT};
use std::{path::PathBuf, str::FromStr};

/// Poll radio links between robots in a running MORSE simulation.
#[derive(Parser, Debug, Clone)]
pub struct Cli {
    /// Simulator host.
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Simulator service port.
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory holding `plm_<robot>.tif` path loss maps.
    #[arg(long, default_value = ".")]
    pub plm_dir: PathBuf,

    /// Log file, truncated on every run.
    #[arg(long, default_value = "robots_communications.log")]
    pub log_file: PathBuf,

    /// Simulator socket timeout, in seconds. Blocks indefinitely when
    /// omitted.
    #[arg(long)]
    pub timeout: Option<f64>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Evaluate every pair's link at a fixed interval.
    Run {
        /// JSON file describing the robot pairs and their models.
        pairs: PathBuf,

        /// Seconds between polls; overrides the pair file.
        #[arg(short, long)]
        interval: Option<f64>,

        /// Stop after this many polls.
        #[arg(short = 'n', long)]
        iterations: Option<usize>,
    },

    /// Print every pair's model without connecting to the simulator.
    Show {
        /// JSON file describing the robot pairs and their models.
        pairs: PathBuf,
    },

    /// Print the path loss a robot's map holds at a local position.
    #[cfg(feature = "gdal")]
    Lookup {
        robot: String,

        /// Local "x,y" position, in meters.
        #[arg(long)]
        at: Xy,
    },
}

/// A local "x,y" position.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct Xy(pub Coord<f64>);

impl FromStr for Xy {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let (x_str, y_str) = s.split_once(',').ok_or_else(|| anyhow!("not a valid x,y"))?;
        let x = f64::from_str(x_str.trim())?;
        let y = f64::from_str(y_str.trim())?;
        Ok(Self(Coord { x, y }))
    }
}
