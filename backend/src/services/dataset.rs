//! Historical observation loading
//!
//! Reads the daily weather CSV (one row per location and date) into
//! [`Observation`]s. Any structural problem is fatal: a model is never
//! trained on a partially read dataset.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use shared::{Observation, RainLabel};

use crate::error::PipelineError;

pub const COL_DATE: &str = "Date";
pub const COL_LOCATION: &str = "Location";
pub const COL_RAINFALL: &str = "Rainfall";
pub const COL_HUMIDITY_AM: &str = "Humidity9am";
pub const COL_HUMIDITY_PM: &str = "Humidity3pm";
pub const COL_PRESSURE_AM: &str = "Pressure9am";
pub const COL_PRESSURE_PM: &str = "Pressure3pm";
pub const COL_CLOUD_AM: &str = "Cloud9am";
pub const COL_CLOUD_PM: &str = "Cloud3pm";
pub const COL_RAIN_TOMORROW: &str = "RainTomorrow";

/// Columns that must be present in the dataset header
pub const REQUIRED_COLUMNS: [&str; 10] = [
    COL_DATE,
    COL_LOCATION,
    COL_RAINFALL,
    COL_HUMIDITY_AM,
    COL_HUMIDITY_PM,
    COL_PRESSURE_AM,
    COL_PRESSURE_PM,
    COL_CLOUD_AM,
    COL_CLOUD_PM,
    COL_RAIN_TOMORROW,
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Cell values treated as missing
const MISSING_TOKENS: [&str; 3] = ["", "NA", "NaN"];

/// Load observations from a CSV file on disk
pub fn load_observations(path: impl AsRef<Path>) -> Result<Vec<Observation>, PipelineError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| PipelineError::DatasetUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let observations = read_observations(file)?;
    tracing::info!(
        "Loaded {} observations from {}",
        observations.len(),
        path.display()
    );
    Ok(observations)
}

/// Read observations from any CSV source
pub fn read_observations<R: Read>(reader: R) -> Result<Vec<Observation>, PipelineError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = csv_reader.headers()?.clone();
    let mut positions = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in positions.iter_mut().zip(REQUIRED_COLUMNS.iter()) {
        *slot = header
            .iter()
            .position(|h| h == *name)
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))?;
    }
    let [date, location, rainfall, humidity_am, humidity_pm, pressure_am, pressure_pm, cloud_am, cloud_pm, rain_tomorrow] =
        positions;

    let mut observations = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let date_text = cell(date);
        let parsed_date = NaiveDate::parse_from_str(date_text, DATE_FORMAT).map_err(|e| {
            PipelineError::MalformedRecord {
                line,
                column: COL_DATE.to_string(),
                reason: format!("'{}' is not a YYYY-MM-DD date ({})", date_text, e),
            }
        })?;

        let location_name = cell(location);
        if is_missing(location_name) {
            return Err(PipelineError::MalformedRecord {
                line,
                column: COL_LOCATION.to_string(),
                reason: "location is empty".to_string(),
            });
        }

        observations.push(Observation {
            date: parsed_date,
            location: location_name.to_string(),
            rainfall: parse_measurement(cell(rainfall), line, COL_RAINFALL)?,
            humidity_am: parse_measurement(cell(humidity_am), line, COL_HUMIDITY_AM)?,
            humidity_pm: parse_measurement(cell(humidity_pm), line, COL_HUMIDITY_PM)?,
            pressure_am: parse_measurement(cell(pressure_am), line, COL_PRESSURE_AM)?,
            pressure_pm: parse_measurement(cell(pressure_pm), line, COL_PRESSURE_PM)?,
            cloud_am: parse_measurement(cell(cloud_am), line, COL_CLOUD_AM)?,
            cloud_pm: parse_measurement(cell(cloud_pm), line, COL_CLOUD_PM)?,
            rain_tomorrow: parse_label(cell(rain_tomorrow), line)?,
        });
    }

    Ok(observations)
}

fn is_missing(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw)
}

fn parse_measurement(raw: &str, line: u64, column: &str) -> Result<Option<f64>, PipelineError> {
    if is_missing(raw) {
        return Ok(None);
    }
    let value = raw
        .parse::<f64>()
        .map_err(|_| PipelineError::MalformedRecord {
            line,
            column: column.to_string(),
            reason: format!("'{}' is not a number", raw),
        })?;
    if value.is_nan() {
        return Ok(None);
    }
    if value.is_infinite() {
        return Err(PipelineError::MalformedRecord {
            line,
            column: column.to_string(),
            reason: format!("'{}' is not a finite number", raw),
        });
    }
    Ok(Some(value))
}

fn parse_label(raw: &str, line: u64) -> Result<Option<RainLabel>, PipelineError> {
    if is_missing(raw) {
        return Ok(None);
    }
    RainLabel::parse(raw)
        .map(Some)
        .ok_or_else(|| PipelineError::MalformedRecord {
            line,
            column: COL_RAIN_TOMORROW.to_string(),
            reason: format!("expected Yes or No, got '{}'", raw),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Date,Location,MinTemp,Rainfall,Humidity9am,Humidity3pm,Pressure9am,Pressure3pm,Cloud9am,Cloud3pm,RainToday,RainTomorrow";

    #[test]
    fn test_reads_rows_with_missing_tokens() {
        let csv = format!(
            "{}\n2008-12-01,Albury,13.4,0.6,71,22,1007.7,1007.1,8,NA,No,No\n2008-12-02,Albury,7.4,NA,44,25,1010.6,1007.8,,,No,NA\n",
            HEADER
        );
        let obs = read_observations(csv.as_bytes()).unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].rainfall, Some(0.6));
        assert_eq!(obs[0].cloud_pm, None);
        assert_eq!(obs[0].rain_tomorrow, Some(RainLabel::No));
        assert_eq!(obs[1].rainfall, None);
        assert_eq!(obs[1].cloud_am, None);
        assert_eq!(obs[1].rain_tomorrow, None);
        assert_eq!(obs[1].date, NaiveDate::from_ymd_opt(2008, 12, 2).unwrap());
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let csv = "Date,Location,Rainfall\n2008-12-01,Albury,0.6\n";
        match read_observations(csv.as_bytes()) {
            Err(PipelineError::MissingColumn(column)) => assert_eq!(column, COL_HUMIDITY_AM),
            other => panic!("expected missing column, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_label_reports_line() {
        let csv = format!(
            "{}\n2008-12-01,Albury,13.4,0.6,71,22,1007.7,1007.1,8,8,No,Maybe\n",
            HEADER
        );
        match read_observations(csv.as_bytes()) {
            Err(PipelineError::MalformedRecord { line, column, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(column, COL_RAIN_TOMORROW);
            }
            other => panic!("expected malformed record, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_measurement_is_fatal() {
        let csv = format!(
            "{}\n2008-12-01,Albury,13.4,lots,71,22,1007.7,1007.1,8,8,No,No\n",
            HEADER
        );
        assert!(matches!(
            read_observations(csv.as_bytes()),
            Err(PipelineError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_infinite_measurement_is_fatal() {
        for raw in ["inf", "-inf", "infinity"] {
            let csv = format!(
                "{}\n2008-12-01,Albury,13.4,0.6,71,22,{},1007.1,8,8,No,No\n",
                HEADER, raw
            );
            match read_observations(csv.as_bytes()) {
                Err(PipelineError::MalformedRecord { line, column, .. }) => {
                    assert_eq!(line, 2);
                    assert_eq!(column, COL_PRESSURE_AM);
                }
                other => panic!("expected malformed record for '{}', got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = load_observations("/nonexistent/weather.csv").unwrap_err();
        assert!(matches!(err, PipelineError::DatasetUnavailable { .. }));
    }
}
