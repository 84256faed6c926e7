// models.rs
// Domain structs shared by the codec, dialect, and storage layers.

use serde::{Deserialize, Serialize};

/// Polynomial coefficients mapping a channel index to an energy in keV.
///
/// Uncalibrated spectra carry no calibration at all; an absent calibration is
/// represented as `Option::None`, never as an empty coefficient list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyCalibration {
    /// Polynomial coefficients, lowest order first: `energy = c0 + c1*ch + c2*ch^2 ...`
    pub coefficients: Vec<f64>,
}

/// A gamma-ray spectrum captured by a detector, attached to exactly one marker.
///
/// # Database Schema
///
/// Maps to the `spectra` table. `channels` and `calibration` are stored as JSON
/// text in single columns; `raw_data` holds the original vendor file bytes
/// verbatim; `created_at` is Unix epoch seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Backend-assigned or backend-generated row ID (zero before insert).
    pub id: i64,
    /// The marker this spectrum belongs to. At most one live spectrum per
    /// marker by convention; replacement is delete-then-insert by the caller.
    pub marker_id: i64,
    /// Per-channel counts, one entry per detector channel.
    pub channels: Vec<i64>,
    /// Declared channel count. Not validated against `channels.len()` here.
    pub channel_count: i32,
    /// Lower bound of the calibrated energy range, keV.
    pub energy_min_kev: f64,
    /// Upper bound of the calibrated energy range, keV.
    pub energy_max_kev: f64,
    /// Live acquisition time in seconds.
    pub live_time_sec: f64,
    /// Real (elapsed) acquisition time in seconds.
    pub real_time_sec: f64,
    /// Detector model string as reported by the source file.
    pub device_model: String,
    /// Channel-to-energy calibration, absent for uncalibrated spectra.
    pub calibration: Option<EnergyCalibration>,
    /// Source file format identifier (provenance).
    pub source_format: String,
    /// Original vendor file bytes, stored verbatim.
    pub raw_data: Vec<u8>,
    /// Unix epoch seconds; zero means "let the store stamp the current time".
    pub created_at: i64,
}

/// A geolocated measurement event that a spectrum attaches to.
///
/// The markers table is owned by external migration tooling; this crate only
/// reads marker rows and mutates the denormalized `has_spectrum` flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Marker row ID.
    pub id: i64,
    /// Ambient dose rate at the measurement point.
    pub dose_rate: f64,
    /// Measurement timestamp (epoch-based, as stored by the owning service).
    pub date: i64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
    /// Count rate reported by the detector.
    pub count_rate: f64,
    /// Map zoom level the marker was recorded at.
    pub zoom: i32,
    /// Speed of the recording device, if moving.
    pub speed: f64,
    /// Identifier of the track this marker belongs to.
    pub track_id: String,
    /// Altitude in meters.
    pub altitude: f64,
    /// Detector model string.
    pub detector: String,
    /// Radiation kind annotation.
    pub radiation: String,
    /// Ambient temperature.
    pub temperature: f64,
    /// Ambient humidity.
    pub humidity: f64,
    /// Denormalized "a spectrum row currently exists for this marker" flag,
    /// maintained best-effort by the spectrum store.
    pub has_spectrum: bool,
}

/// Inclusive geographic bounding box for marker queries.
///
/// No `min <= max` validation is performed; an inverted range simply matches
/// zero rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Southern edge, inclusive.
    pub min_lat: f64,
    /// Northern edge, inclusive.
    pub max_lat: f64,
    /// Western edge, inclusive.
    pub min_lon: f64,
    /// Eastern edge, inclusive.
    pub max_lon: f64,
}
