//! Marker flag synchronization and bounded marker listing.
//!
//! The `has_spectrum` boolean on the markers table is a denormalized mirror
//! of "a spectrum row exists for this marker", maintained manually by the
//! spectrum write paths. The listing query trusts that flag rather than
//! joining against the spectra table.

use log::{debug, warn};
use sqlx::any::AnyRow;
use sqlx::Row;

use crate::error_handling::StoreError;
use crate::models::{Bounds, Marker};

use super::SpectrumStore;

impl SpectrumStore {
    /// Sets the `has_spectrum` flag for a marker.
    ///
    /// Single-statement update with no existence check: updating a marker ID
    /// that does not exist affects zero rows and still succeeds. Setting the
    /// same value twice is a no-op.
    pub async fn set_spectrum_flag(
        &self,
        marker_id: i64,
        has_spectrum: bool,
    ) -> Result<(), StoreError> {
        sqlx::query(self.dialect().update_flag_sql())
            .bind(has_spectrum)
            .bind(marker_id)
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Sql("update marker spectrum flag", e))
    }

    /// Lists flagged markers inside an inclusive bounding box.
    ///
    /// Results are ordered by measurement date descending and hard-capped at
    /// 1000 rows; callers needing more must narrow the box. Individual rows
    /// that fail to decode are skipped so a partial result set is returned
    /// rather than none; only a failure of the query itself is an error.
    pub async fn markers_with_spectra(&self, bounds: &Bounds) -> Result<Vec<Marker>, StoreError> {
        let rows = sqlx::query(self.dialect().markers_in_bounds_sql())
            .bind(true)
            .bind(bounds.min_lat)
            .bind(bounds.max_lat)
            .bind(bounds.min_lon)
            .bind(bounds.max_lon)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Sql("query markers with spectra", e))?;

        let mut markers = Vec::with_capacity(rows.len());
        let mut skipped = 0usize;
        for row in &rows {
            match decode_marker_row(row) {
                Ok(marker) => markers.push(marker),
                Err(e) => {
                    skipped += 1;
                    debug!("skipping marker row that failed to decode: {e}");
                }
            }
        }
        if skipped > 0 {
            warn!("skipped {skipped} marker rows during bounding-box listing");
        }

        Ok(markers)
    }
}

fn decode_marker_row(row: &AnyRow) -> Result<Marker, sqlx::Error> {
    // Boolean columns come back as native booleans on some backends and as
    // integers on others.
    let has_spectrum = row
        .try_get::<bool, _>(14)
        .or_else(|_| row.try_get::<i64, _>(14).map(|v| v != 0))?;

    Ok(Marker {
        id: row.try_get(0)?,
        dose_rate: row.try_get(1)?,
        date: row.try_get(2)?,
        lon: row.try_get(3)?,
        lat: row.try_get(4)?,
        count_rate: row.try_get(5)?,
        zoom: row.try_get(6)?,
        speed: row.try_get(7)?,
        track_id: row.try_get(8)?,
        altitude: row.try_get(9)?,
        detector: row.try_get(10)?,
        radiation: row.try_get(11)?,
        temperature: row.try_get(12)?,
        humidity: row.try_get(13)?,
        has_spectrum,
    })
}
