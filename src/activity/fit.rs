//! Decoding of FIT activity files into [`Activity`] records.

use super::{Activity, GpsPoint, Summary};
use crate::error::StoreError;
use fitparser::from_reader;
use fitparser::profile::MesgNum;
use fitparser::{FitDataRecord, Value};
use log::trace;
use std::io::Read;

/// Conversion factor from FIT semicircle units to degrees.
const SEMICIRCLES_TO_DEGREES: f64 = 180.0 / 2147483648.0;

/// Decodes an activity from FIT data.
///
/// The file must contain exactly one session. Records without a GPS fix
/// (i.e. without position fields) are skipped.
pub fn decode<R: Read>(reader: &mut R) -> Result<Activity, StoreError> {
    let messages = from_reader(reader).map_err(|e| StoreError::Fit(e.to_string()))?;
    trace!("Decoded {} FIT messages", messages.len());

    let mut timestamp = None;
    let mut sessions = Vec::new();
    let mut coords = Vec::new();

    for message in &messages {
        match message.kind() {
            MesgNum::FileId => {
                if let Some(Value::Timestamp(time_created)) = field_value(message, "time_created")
                {
                    timestamp = Some(time_created.timestamp());
                }
            }
            MesgNum::Session => sessions.push(message),
            MesgNum::Record => {
                let lat = position_degrees(message, "position_lat");
                let lng = position_degrees(message, "position_long");
                if let (Some(lat), Some(lng)) = (lat, lng) {
                    coords.push(GpsPoint { lat, lng });
                }
            }
            _ => {}
        }
    }

    if sessions.len() != 1 {
        return Err(StoreError::UnsupportedFit(format!(
            "expected exactly one session, got {}",
            sessions.len()
        )));
    }
    let session = sessions[0];

    let timestamp = timestamp
        .ok_or_else(|| StoreError::UnsupportedFit("missing file creation time".to_owned()))?;

    let sport = match field_value(session, "sport") {
        Some(Value::String(name)) => name.clone(),
        _ => "unknown".to_owned(),
    };
    let timer_seconds = field_f64(session, "total_timer_time").unwrap_or(0.0);
    let distance_meters = field_f64(session, "total_distance").unwrap_or(0.0);

    Ok(Activity {
        summary: Summary {
            sport,
            timestamp,
            duration: format_duration(timer_seconds),
            distance: distance_meters / 1000.0,
        },
        coords,
    })
}

/// Looks up a field of the given message by name.
fn field_value<'a>(message: &'a FitDataRecord, name: &str) -> Option<&'a Value> {
    message
        .fields()
        .iter()
        .find(|field| field.name() == name)
        .map(|field| field.value())
}

/// Reads a numeric field as an `f64`.
fn field_f64(message: &FitDataRecord, name: &str) -> Option<f64> {
    match field_value(message, name)? {
        Value::Float32(v) => Some(*v as f64),
        Value::Float64(v) => Some(*v),
        Value::SInt32(v) => Some(*v as f64),
        Value::UInt32(v) => Some(*v as f64),
        Value::SInt16(v) => Some(*v as f64),
        Value::UInt16(v) => Some(*v as f64),
        _ => None,
    }
}

/// Reads a position field, converting semicircle units to degrees.
fn position_degrees(message: &FitDataRecord, name: &str) -> Option<f64> {
    match field_value(message, name)? {
        Value::SInt32(semicircles) => Some(*semicircles as f64 * SEMICIRCLES_TO_DEGREES),
        _ => None,
    }
}

/// Formats a timer time in seconds as `HH:MM:SS`.
fn format_duration(seconds: f64) -> String {
    let total = seconds.round() as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
