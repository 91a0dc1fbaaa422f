//! Feature engineering: rainfall cleaning, antecedent wetness index,
//! label filtering and location encoding.

use std::collections::BTreeSet;

use serde::Serialize;
use shared::{rolling_awi, Observation, RawFeatureRow, NUM_FEATURES};

/// Code used for locations the encoder was not fit on
pub const DEFAULT_LOCATION_CODE: usize = 0;

/// Maps location names to stable integer codes.
///
/// Codes follow the lexicographic order of the names seen at fit time, so
/// the same set of names always produces the same mapping.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LocationEncoder {
    classes: Vec<String>,
}

impl LocationEncoder {
    pub fn fit<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let distinct: BTreeSet<&str> = names.into_iter().collect();
        Self {
            classes: distinct.into_iter().map(String::from).collect(),
        }
    }

    /// Code for a known location
    pub fn transform(&self, name: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(name))
            .ok()
    }

    /// Code for a location, falling back to [`DEFAULT_LOCATION_CODE`].
    /// The flag is false when the fallback was used.
    pub fn encode_or_default(&self, name: &str) -> (usize, bool) {
        match self.transform(name) {
            Some(code) => (code, true),
            None => (DEFAULT_LOCATION_CODE, false),
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Labelled feature rows ready for imputation and training
#[derive(Debug, Clone)]
pub struct EngineeredDataset {
    /// One row per labelled observation, in model column order
    pub rows: Vec<RawFeatureRow>,
    /// Class per row: 0 = no rain tomorrow, 1 = rain tomorrow
    pub labels: Vec<usize>,
    pub encoder: LocationEncoder,
}

impl EngineeredDataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows per class
    pub fn class_counts(&self) -> [usize; 2] {
        let mut counts = [0usize; 2];
        for &label in &self.labels {
            counts[label.min(1)] += 1;
        }
        counts
    }
}

/// Turn raw observations into labelled feature rows.
///
/// Observations are sorted by location then date, the AWI is computed per
/// location over every observation (labelled or not), and only then are
/// unlabelled observations dropped.
pub fn engineer_features(mut observations: Vec<Observation>) -> EngineeredDataset {
    observations.sort_by(|a, b| a.location.cmp(&b.location).then(a.date.cmp(&b.date)));

    let mut awi = Vec::with_capacity(observations.len());
    for group in observations.chunk_by(|a, b| a.location == b.location) {
        let rainfall: Vec<f64> = group.iter().map(Observation::clean_rainfall).collect();
        awi.extend(rolling_awi(&rainfall));
    }

    let labelled: Vec<(&Observation, f64)> = observations
        .iter()
        .zip(awi)
        .filter(|(obs, _)| obs.rain_tomorrow.is_some())
        .collect();

    let encoder = LocationEncoder::fit(labelled.iter().map(|(obs, _)| obs.location.as_str()));

    let mut rows = Vec::with_capacity(labelled.len());
    let mut labels = Vec::with_capacity(labelled.len());
    for (obs, awi) in labelled {
        let (code, _) = encoder.encode_or_default(&obs.location);
        let row: RawFeatureRow = [
            Some(obs.clean_rainfall()),
            obs.humidity_am,
            obs.humidity_pm,
            obs.pressure_am,
            obs.pressure_pm,
            obs.cloud_am,
            obs.cloud_pm,
            Some(awi),
            Some(code as f64),
        ];
        debug_assert_eq!(row.len(), NUM_FEATURES);
        rows.push(row);
        labels.push(obs.rain_tomorrow.map(|l| l.class()).unwrap_or_default());
    }

    EngineeredDataset {
        rows,
        labels,
        encoder,
    }
}
