use crate::{error::ParseModelError, params::PlmParams};
use std::{fmt, str::FromStr};

/// The communication models available between two robots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModelKind {
    /// Robots can communicate when closer than a distance threshold.
    #[default]
    Distance,

    /// Robots can communicate when in line of sight of each other.
    LineOfSight,

    /// Robots can communicate when the free space path loss between
    /// them is below a threshold.
    FreeSpaceLoss,

    /// Data rate is read off precomputed path loss maps.
    Plm,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::Distance,
        ModelKind::LineOfSight,
        ModelKind::FreeSpaceLoss,
        ModelKind::Plm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Distance => "distance",
            ModelKind::LineOfSight => "line_of_sight",
            ModelKind::FreeSpaceLoss => "free_space_loss",
            ModelKind::Plm => "plm",
        }
    }
}

impl FromStr for ModelKind {
    type Err = ParseModelError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseModelError(s.to_owned()))
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully specified communication model, carrying only the
/// parameters it uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinkModel {
    Distance { threshold_m: f64 },
    LineOfSight,
    FreeSpaceLoss {
        frequency_mhz: f64,
        threshold_db: f64,
    },
    PathLossMap { params: PlmParams },
}

impl fmt::Display for LinkModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkModel::Distance { threshold_m } => {
                write!(f, "Model: Distance;   Threshold: {threshold_m}")
            }
            LinkModel::LineOfSight => write!(f, "Model: Line of Sight"),
            LinkModel::FreeSpaceLoss {
                frequency_mhz,
                threshold_db,
            } => write!(
                f,
                "Model: Free Space Loss;   Threshold: {threshold_db}(dB)   Frequency: {frequency_mhz}(MHz)"
            ),
            LinkModel::PathLossMap { params } => {
                write!(f, "Model: Path Loss Map;   Parameters: {params}")
            }
        }
    }
}

/// Outcome of evaluating a link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// Whether the robots can communicate.
    Link(bool),

    /// Achievable data rate (Mb/s).
    DataRate(f64),

    /// The simulator could not be queried.
    Unavailable,
}

impl Verdict {
    /// Returns `1`/`0` for links, the data rate, or `0` when the
    /// simulator was unavailable.
    pub fn as_number(&self) -> f64 {
        match *self {
            Verdict::Link(true) => 1.0,
            Verdict::Link(false) | Verdict::Unavailable => 0.0,
            Verdict::DataRate(rate) => rate,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Link(link) => write!(f, "{}", u8::from(*link)),
            Verdict::DataRate(rate) => write!(f, "{rate:.2} Mb/s"),
            Verdict::Unavailable => write!(f, "unavailable"),
        }
    }
}
