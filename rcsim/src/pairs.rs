use anyhow::{Context, Error as AnyError};
use rcs::LinkUpdate;
use serde::Deserialize;
use std::{fs::File, io::BufReader, path::Path};

const DEFAULT_INTERVAL_SECS: f64 = 7.0;

/// The robot pairs to poll.
///
/// ```json
/// {
///   "interval_secs": 7,
///   "pairs": [
///     { "robots": ["robo1", "robo2"], "model": "distance", "distance_threshold": 15 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PairFile {
    #[serde(default = "default_interval")]
    pub interval_secs: f64,
    pub pairs: Vec<PairSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairSpec {
    pub robots: [String; 2],
    #[serde(flatten)]
    pub specs: LinkUpdate,
}

fn default_interval() -> f64 {
    DEFAULT_INTERVAL_SECS
}

impl PairFile {
    pub fn load(path: &Path) -> Result<Self, AnyError> {
        let file = File::open(path).with_context(|| format!("opening pair file {path:?}"))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing pair file {path:?}"))
    }
}
