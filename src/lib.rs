//! spectra-store: persistence for gamma spectra linked to geolocated markers.
//!
//! This library stores radiation-spectrum measurements one-to-one with marker
//! records across SQL backends with differing dialects: placeholder styles,
//! ID-generation strategies, and timestamp representations all vary per
//! backend, while insert/fetch/delete/flag-sync behave identically. The
//! dialect is resolved once from a backend identifier string and held for the
//! store's lifetime.
//!
//! # Example
//!
//! ```no_run
//! use spectra_store::{Bounds, SpectrumStore};
//!
//! # async fn example(spectrum: spectra_store::Spectrum) -> Result<(), spectra_store::StoreError> {
//! let store = SpectrumStore::connect("sqlite://radiation.db", "sqlite").await?;
//!
//! let id = store.insert_spectrum(&spectrum).await?;
//! let stored = store.spectrum_for_marker(spectrum.marker_id).await?;
//! assert_eq!(stored.map(|s| s.id), Some(id));
//!
//! let nearby = store
//!     .markers_with_spectra(&Bounds {
//!         min_lat: 50.0,
//!         max_lat: 51.0,
//!         min_lon: 30.0,
//!         max_lon: 31.0,
//!     })
//!     .await?;
//! println!("{} markers carry spectra", nearby.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Consistency
//!
//! The spectrum write and the marker's `has_spectrum` flag update are two
//! separate statements with no transaction around them. After an insert the
//! flag update is best-effort (a failure is logged, the insert still
//! succeeds); after a delete it is strict. Concurrent callers can observe
//! the flag and the row existence diverge momentarily.

#![warn(missing_docs)]

mod codec;
mod dialect;
mod error_handling;
mod models;
mod storage;

// Re-export public API
pub use dialect::{Backend, Dialect, IdStrategy};
pub use error_handling::StoreError;
pub use models::{Bounds, EnergyCalibration, Marker, Spectrum};
pub use storage::{init_store_pool, SpectrumStore};
