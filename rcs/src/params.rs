//! Path loss map model parameters and data rate classification.

use crate::error::PlmParamsError;
use std::{collections::BTreeMap, fmt};

const KEYS: [&str; 7] = ["t1", "t2", "t3", "dr0", "dr1", "dr2", "dr3"];

/// Path loss thresholds (dB) and the data rate (Mb/s) of the band
/// below, between and above them.
///
/// Always satisfies `0 < t1 < t2 < t3` and `dr0 > dr1 > dr2 > dr3`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlmParams {
    thresholds: [f64; 3],
    rates: [f64; 4],
}

/// One of the four data rate bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Band {
    /// `0 <= pl < t1`
    Dr0,
    /// `t1 <= pl < t2`
    Dr1,
    /// `t2 <= pl < t3`
    Dr2,
    /// `pl >= t3`
    Dr3,
}

impl Default for PlmParams {
    fn default() -> Self {
        Self {
            thresholds: [20.0, 40.0, 60.0],
            rates: [54.0, 42.0, 27.0, 0.0],
        }
    }
}

impl PlmParams {
    /// Returns new parameters, if they are properly ordered.
    pub fn new(
        [t1, t2, t3]: [f64; 3],
        [dr0, dr1, dr2, dr3]: [f64; 4],
    ) -> Result<Self, PlmParamsError> {
        if !(0.0 < t1 && t1 < t2 && t2 < t3) {
            return Err(PlmParamsError::Thresholds);
        }
        if !(dr0 > dr1 && dr1 > dr2 && dr2 > dr3) {
            return Err(PlmParamsError::DataRates);
        }
        Ok(Self {
            thresholds: [t1, t2, t3],
            rates: [dr0, dr1, dr2, dr3],
        })
    }

    /// Returns `[t1, t2, t3]`.
    pub fn thresholds(&self) -> [f64; 3] {
        self.thresholds
    }

    /// Returns `[dr0, dr1, dr2, dr3]`.
    pub fn rates(&self) -> [f64; 4] {
        self.rates
    }

    /// Returns the band path loss `pl` (dB) falls into.
    ///
    /// Bands are right-open: a loss equal to a threshold belongs to
    /// the band above it. Negative (and NaN) losses have no band.
    pub fn band(&self, pl: f64) -> Option<Band> {
        let [t1, t2, t3] = self.thresholds;
        if (0.0..t1).contains(&pl) {
            Some(Band::Dr0)
        } else if (t1..t2).contains(&pl) {
            Some(Band::Dr1)
        } else if (t2..t3).contains(&pl) {
            Some(Band::Dr2)
        } else if pl >= t3 {
            Some(Band::Dr3)
        } else {
            None
        }
    }

    /// Returns the data rate (Mb/s) of `band`.
    pub fn rate(&self, band: Band) -> f64 {
        self.rates[band as usize]
    }

    /// Returns the data rate (Mb/s) for path loss `pl` (dB), if any.
    pub fn data_rate(&self, pl: f64) -> Option<f64> {
        self.band(pl).map(|band| self.rate(band))
    }
}

impl TryFrom<&BTreeMap<String, f64>> for PlmParams {
    type Error = PlmParamsError;

    /// The map must hold exactly the keys `t1`, `t2`, `t3`, `dr0`,
    /// `dr1`, `dr2` and `dr3`.
    fn try_from(map: &BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        if map.len() != KEYS.len() {
            return Err(PlmParamsError::KeySet);
        }
        let mut values = [0.0; 7];
        for (value, key) in values.iter_mut().zip(KEYS) {
            *value = *map.get(key).ok_or(PlmParamsError::KeySet)?;
        }
        let [t1, t2, t3, dr0, dr1, dr2, dr3] = values;
        Self::new([t1, t2, t3], [dr0, dr1, dr2, dr3])
    }
}

impl From<PlmParams> for BTreeMap<String, f64> {
    fn from(params: PlmParams) -> Self {
        KEYS.iter()
            .map(|key| (*key).to_owned())
            .zip(params.thresholds.into_iter().chain(params.rates))
            .collect()
    }
}

impl fmt::Display for PlmParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [t1, t2, t3] = self.thresholds;
        let [dr0, dr1, dr2, dr3] = self.rates;
        write!(
            f,
            "{{t1: {t1}, t2: {t2}, t3: {t3}, dr0: {dr0}, dr1: {dr1}, dr2: {dr2}, dr3: {dr3}}}"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Band, PlmParams, PlmParamsError};
    use std::collections::BTreeMap;

    fn map(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect()
    }

    fn params() -> PlmParams {
        PlmParams::new([10.0, 20.0, 30.0], [4.0, 3.0, 2.0, 1.0]).unwrap()
    }

    #[test]
    fn test_bands() {
        let params = params();
        assert_eq!(params.data_rate(25.0), Some(2.0));
        assert_eq!(params.data_rate(5.0), Some(4.0));
        assert_eq!(params.data_rate(15.0), Some(3.0));
        assert_eq!(params.data_rate(300.0), Some(1.0));
        assert_eq!(params.data_rate(-1.0), None);
        assert_eq!(params.data_rate(f64::NAN), None);
    }

    #[test]
    fn test_band_edges_are_right_open() {
        let params = params();
        assert_eq!(params.band(0.0), Some(Band::Dr0));
        assert_eq!(params.band(10.0), Some(Band::Dr1));
        assert_eq!(params.band(20.0), Some(Band::Dr2));
        assert_eq!(params.band(30.0), Some(Band::Dr3));
        assert_eq!(params.band(10.0 - 1e-9), Some(Band::Dr0));
        assert_eq!(params.band(-f64::EPSILON), None);
    }

    #[test]
    fn test_data_rate_is_non_increasing() {
        for params in [params(), PlmParams::default()] {
            let mut prev = f64::INFINITY;
            for step in 0..=1000 {
                let pl = f64::from(step) * 0.1;
                let rate = params.data_rate(pl).unwrap();
                assert!(rate <= prev, "{rate} > {prev} at {pl} dB");
                prev = rate;
            }
        }
    }

    #[test]
    fn test_default() {
        let params = PlmParams::default();
        assert_eq!(params.thresholds(), [20.0, 40.0, 60.0]);
        assert_eq!(params.rates(), [54.0, 42.0, 27.0, 0.0]);
    }

    #[test]
    fn test_try_from_map() {
        let params = PlmParams::try_from(&map(&[
            ("t1", 10.0),
            ("t2", 20.0),
            ("t3", 30.0),
            ("dr0", 4.0),
            ("dr1", 3.0),
            ("dr2", 2.0),
            ("dr3", 1.0),
        ]))
        .unwrap();
        assert_eq!(params, self::params());
    }

    #[test]
    fn test_try_from_rejects_key_set() {
        let mut missing = BTreeMap::from(params());
        missing.remove("dr3");
        assert_eq!(PlmParams::try_from(&missing), Err(PlmParamsError::KeySet));

        let mut extra = BTreeMap::from(params());
        extra.insert("dr4".to_owned(), 0.5);
        assert_eq!(PlmParams::try_from(&extra), Err(PlmParamsError::KeySet));

        let mut renamed = BTreeMap::from(params());
        renamed.remove("t3");
        renamed.insert("T3".to_owned(), 30.0);
        assert_eq!(PlmParams::try_from(&renamed), Err(PlmParamsError::KeySet));
    }

    #[test]
    fn test_try_from_rejects_order() {
        let mut thresholds = BTreeMap::from(params());
        thresholds.insert("t2".to_owned(), 5.0);
        assert_eq!(
            PlmParams::try_from(&thresholds),
            Err(PlmParamsError::Thresholds)
        );

        let mut non_positive = BTreeMap::from(params());
        non_positive.insert("t1".to_owned(), 0.0);
        assert_eq!(
            PlmParams::try_from(&non_positive),
            Err(PlmParamsError::Thresholds)
        );

        let mut rates = BTreeMap::from(params());
        rates.insert("dr2".to_owned(), 3.0);
        assert_eq!(PlmParams::try_from(&rates), Err(PlmParamsError::DataRates));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            params().to_string(),
            "{t1: 10, t2: 20, t3: 30, dr0: 4, dr1: 3, dr2: 2, dr3: 1}"
        );
    }
}
