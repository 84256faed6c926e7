//! JSON encoding for the single-column spectrum payloads.
//!
//! The channel-count array and the optional calibration object each live in
//! one TEXT column, encoded as JSON. An absent calibration is stored as the
//! empty string so the read path can tell "no calibration" apart from a
//! stored value; it is never conflated with the literal text `null`.

use crate::error_handling::StoreError;
use crate::models::EnergyCalibration;

/// Serializes the per-channel counts to their stored JSON form.
pub fn encode_channels(channels: &[i64]) -> Result<String, StoreError> {
    serde_json::to_string(channels).map_err(|e| StoreError::Encode("channels", e))
}

/// Parses the stored channel array. Malformed text fails the whole read.
pub fn decode_channels(stored: &str) -> Result<Vec<i64>, StoreError> {
    serde_json::from_str(stored).map_err(|e| StoreError::Decode("channels", e))
}

/// Serializes an optional calibration; `None` encodes as the empty string.
pub fn encode_calibration(calibration: Option<&EnergyCalibration>) -> Result<String, StoreError> {
    match calibration {
        Some(cal) => serde_json::to_string(cal).map_err(|e| StoreError::Encode("calibration", e)),
        None => Ok(String::new()),
    }
}

/// Parses a stored calibration value; the empty string means absent.
pub fn decode_calibration(stored: &str) -> Result<Option<EnergyCalibration>, StoreError> {
    if stored.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(stored)
        .map(Some)
        .map_err(|e| StoreError::Decode("calibration", e))
}
