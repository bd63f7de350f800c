use crate::{
    model::{LinkModel, ModelKind},
    params::PlmParams,
};
use log::warn;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Distance threshold (m) used until one is configured.
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 10.0;

/// Frequency (MHz) used until one is configured.
pub const DEFAULT_FREQUENCY: f64 = 800.0;

/// Free space loss threshold (dB) used until one is configured.
pub const DEFAULT_FREE_SPACE_THRESHOLD: f64 = 45.0;

/// The complete link configuration of one robot pair.
///
/// Values are never edited in place: [`LinkConfig::apply`] returns a
/// new configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkConfig {
    pub model: ModelKind,

    /// Meters.
    pub distance_threshold: f64,

    /// MHz.
    pub frequency: f64,

    /// dB.
    pub free_space_threshold: f64,

    pub plm: PlmParams,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            model: ModelKind::default(),
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            frequency: DEFAULT_FREQUENCY,
            free_space_threshold: DEFAULT_FREE_SPACE_THRESHOLD,
            plm: PlmParams::default(),
        }
    }
}

impl LinkConfig {
    /// Returns a copy of `self` with `update`'s overrides applied.
    ///
    /// Numeric overrides are taken verbatim. An unknown model name or
    /// a malformed set of path loss map parameters is logged and the
    /// current value kept.
    #[must_use]
    pub fn apply(&self, update: &LinkUpdate) -> Self {
        let model = match update.model.as_deref().map(str::parse::<ModelKind>) {
            None => self.model,
            Some(Ok(model)) => model,
            Some(Err(e)) => {
                warn!("{e}, keeping model {}", self.model);
                self.model
            }
        };

        let plm = match update.plm.as_ref().map(PlmParams::try_from) {
            None => self.plm,
            Some(Ok(plm)) => plm,
            Some(Err(e)) => {
                warn!(
                    "rejected path loss map parameters: {e}, keeping {}",
                    self.plm
                );
                self.plm
            }
        };

        Self {
            model,
            distance_threshold: update.distance_threshold.unwrap_or(self.distance_threshold),
            frequency: update.freq.unwrap_or(self.frequency),
            free_space_threshold: update
                .free_space_threshold
                .unwrap_or(self.free_space_threshold),
            plm,
        }
    }

    /// Returns the active model along with only the parameters it
    /// uses.
    pub fn model(&self) -> LinkModel {
        match self.model {
            ModelKind::Distance => LinkModel::Distance {
                threshold_m: self.distance_threshold,
            },
            ModelKind::LineOfSight => LinkModel::LineOfSight,
            ModelKind::FreeSpaceLoss => LinkModel::FreeSpaceLoss {
                frequency_mhz: self.frequency,
                threshold_db: self.free_space_threshold,
            },
            ModelKind::Plm => LinkModel::PathLossMap { params: self.plm },
        }
    }
}

/// A set of optional overrides for a [`LinkConfig`].
///
/// Deserializes from JSON objects such as
/// `{"model": "free_space_loss", "freq": 750, "free_space_threshold": 55}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LinkUpdate {
    pub model: Option<String>,

    /// Meters.
    pub distance_threshold: Option<f64>,

    /// MHz.
    #[serde(alias = "frequency")]
    pub freq: Option<f64>,

    /// dB.
    pub free_space_threshold: Option<f64>,

    /// Must hold exactly the keys `t1`, `t2`, `t3`, `dr0`, `dr1`,
    /// `dr2` and `dr3`.
    pub plm: Option<BTreeMap<String, f64>>,
}

impl LinkUpdate {
    #[must_use]
    pub fn model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn distance_threshold(mut self, meters: f64) -> Self {
        self.distance_threshold = Some(meters);
        self
    }

    #[must_use]
    pub fn freq(mut self, mhz: f64) -> Self {
        self.freq = Some(mhz);
        self
    }

    #[must_use]
    pub fn free_space_threshold(mut self, db: f64) -> Self {
        self.free_space_threshold = Some(db);
        self
    }

    #[must_use]
    pub fn plm<I, K>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        self.plm = Some(params.into_iter().map(|(k, v)| (k.into(), v)).collect());
        self
    }
}
