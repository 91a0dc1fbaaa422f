//! Interactive manual-input session
//!
//! Prompts for one set of readings, validates all of them, and renders either
//! the full report or a single validation message.

use std::io::{self, BufRead, Write};

use shared::{
    classify_wetness, InputError, ManualEntry, RainPrediction, WetnessState,
    NUMERIC_INPUT_REQUIRED,
};

use crate::services::RainRiskModel;

pub const BANNER: &str = "--- RAIN RISK: MANUAL INPUT ---";
pub const LOCATION_NOT_RECOGNIZED: &str = "Location not recognized. Using default encoding.";
pub const LOCATION_REQUIRED: &str = "Invalid input! Please enter a location name.";

const PROMPTS: [&str; 9] = [
    "Enter Location (e.g., Albury, Darwin, Sydney): ",
    "Enter Rainfall today (mm): ",
    "Enter Humidity at 9am (%): ",
    "Enter Humidity at 3pm (%): ",
    "Enter Pressure at 9am (hPa): ",
    "Enter Pressure at 3pm (hPa): ",
    "Enter Cloud cover at 9am (0-8): ",
    "Enter Cloud cover at 3pm (0-8): ",
    "Enter AWI (Total rain in last 7 days in mm): ",
];

/// Prompt for every field and collect the raw answers.
///
/// End of input leaves the remaining fields empty, which validation rejects.
pub fn read_entry<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<ManualEntry> {
    let mut answers: Vec<String> = Vec::with_capacity(PROMPTS.len());
    for prompt in PROMPTS {
        write!(output, "{}", prompt)?;
        output.flush()?;
        let mut line = String::new();
        input.read_line(&mut line)?;
        answers.push(line.trim_end_matches(['\r', '\n']).to_string());
    }

    let mut answers = answers.into_iter();
    let mut next = || answers.next().unwrap_or_default();
    Ok(ManualEntry {
        location: next(),
        rainfall: next(),
        humidity_am: next(),
        humidity_pm: next(),
        pressure_am: next(),
        pressure_pm: next(),
        cloud_am: next(),
        cloud_pm: next(),
        awi: next(),
    })
}

/// Validate an entry and score it; returns the text to show the user
pub fn evaluate(model: &RainRiskModel, entry: &ManualEntry) -> String {
    match entry.validate() {
        Ok(input) => {
            let prediction = model.predict(&input);
            let wetness = classify_wetness(input.awi.unwrap_or_default());
            format_report(&prediction, wetness)
        }
        Err(err) => {
            tracing::debug!("Rejected manual entry: {}", err);
            rejection_message(&err).to_string()
        }
    }
}

/// Message shown for an entry that failed validation
pub fn rejection_message(err: &InputError) -> &'static str {
    match err {
        InputError::Missing { field } if field == "location" => LOCATION_REQUIRED,
        _ => NUMERIC_INPUT_REQUIRED,
    }
}

pub fn format_report(prediction: &RainPrediction, wetness: WetnessState) -> String {
    let mut lines = Vec::with_capacity(5);
    if !prediction.location_recognized {
        lines.push(LOCATION_NOT_RECOGNIZED.to_string());
    }
    lines.push("\n--- SYSTEM OUTPUT ---".to_string());
    lines.push(format!(
        "Rain Probability Tomorrow: {:.2} ({:.1}%)",
        prediction.rain_probability,
        prediction.rain_probability * 100.0
    ));
    lines.push(format!("Wetness State: {}", wetness));
    lines.push(format!("Confidence Score: {:.2}", prediction.confidence));
    lines.join("\n")
}
