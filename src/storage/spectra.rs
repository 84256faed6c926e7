//! Spectrum repository: insert, marker-ID lookup, and delete.
//!
//! Each operation resolves its SQL from the configured dialect, encodes or
//! decodes the JSON payload columns through the codec, and issues one or two
//! sequential statements over the shared pool. The flag update that follows
//! a write is a separate statement, not a transaction: after an insert its
//! failure is logged and swallowed, after a delete it propagates.

use chrono::{DateTime, Utc};
use log::warn;
use sqlx::any::{AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::{Any, Row};

use crate::codec;
use crate::dialect::{IdStrategy, TimestampBind};
use crate::error_handling::StoreError;
use crate::models::Spectrum;

use super::SpectrumStore;

impl SpectrumStore {
    /// Stores a spectrum row and returns its new ID.
    ///
    /// A zero `created_at` is replaced with the current wall-clock epoch
    /// seconds. `channel_count` is stored as given; the caller is
    /// responsible for keeping it equal to `channels.len()`.
    ///
    /// On success the marker's `has_spectrum` flag is set best-effort: a
    /// failure of that second statement is logged as a warning and never
    /// fails the insert, so callers must not assume flag and row are always
    /// consistent.
    pub async fn insert_spectrum(&self, spectrum: &Spectrum) -> Result<i64, StoreError> {
        let channels_json = codec::encode_channels(&spectrum.channels)?;
        let calibration_json = codec::encode_calibration(spectrum.calibration.as_ref())?;

        let created_at = if spectrum.created_at == 0 {
            Utc::now().timestamp()
        } else {
            spectrum.created_at
        };

        let sql = self.dialect().insert_spectrum_sql();
        let spectrum_id = match self.dialect().id_strategy() {
            IdStrategy::InsertReturning => {
                let query = bind_spectrum_fields(
                    sqlx::query(sql),
                    spectrum,
                    &channels_json,
                    &calibration_json,
                );
                // to_timestamp() takes double precision where it applies.
                let query = match self.dialect().insert_timestamp_bind() {
                    TimestampBind::EpochAsDouble => query.bind(created_at as f64),
                    TimestampBind::EpochSeconds => query.bind(created_at),
                };

                query
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| StoreError::Sql("insert spectrum", e))?
                    .try_get::<i64, _>(0)
                    .map_err(|e| StoreError::Sql("read returned spectrum id", e))?
            }
            IdStrategy::LastInsertId => {
                let query = bind_spectrum_fields(
                    sqlx::query(sql),
                    spectrum,
                    &channels_json,
                    &calibration_json,
                )
                .bind(created_at);

                query
                    .execute(&self.pool)
                    .await
                    .map_err(|e| StoreError::Sql("insert spectrum", e))?
                    .last_insert_id()
                    .ok_or(StoreError::MissingInsertId)?
            }
            IdStrategy::ClientGenerated => {
                let id = client_generated_id(Utc::now())?;
                bind_spectrum_fields(
                    sqlx::query(sql).bind(id),
                    spectrum,
                    &channels_json,
                    &calibration_json,
                )
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Sql("insert spectrum", e))?;
                id
            }
        };

        if let Err(e) = self.set_spectrum_flag(spectrum.marker_id, true).await {
            warn!(
                "failed to update spectrum flag for marker {} after insert: {e}",
                spectrum.marker_id
            );
        }

        Ok(spectrum_id)
    }

    /// Fetches the spectrum stored for a marker, if any.
    ///
    /// Consumes at most one row even if duplicates exist. A missing row is
    /// `Ok(None)`; a malformed stored payload is an error, never a partial
    /// spectrum or a false absent.
    pub async fn spectrum_for_marker(&self, marker_id: i64) -> Result<Option<Spectrum>, StoreError> {
        let row = sqlx::query(self.dialect().select_spectrum_sql())
            .bind(marker_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Sql("query spectrum", e))?;

        match row {
            Some(row) => Ok(Some(decode_spectrum_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Deletes every spectrum row for a marker and clears its flag.
    ///
    /// The flag is cleared whether or not any row existed. Unlike insert,
    /// a failure of the flag update propagates to the caller.
    pub async fn delete_spectrum(&self, marker_id: i64) -> Result<(), StoreError> {
        sqlx::query(self.dialect().delete_spectrum_sql())
            .bind(marker_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Sql("delete spectrum", e))?;

        self.set_spectrum_flag(marker_id, false).await
    }
}

/// Client-side ID for the columnar class: the nanosecond epoch taken before
/// the statement runs. `timestamp_nanos_opt` only fails outside the
/// 1677–2262 representable range; that failure surfaces as an error rather
/// than ever handing the caller a zero ID.
fn client_generated_id(now: DateTime<Utc>) -> Result<i64, StoreError> {
    now.timestamp_nanos_opt().ok_or(StoreError::MissingInsertId)
}

/// Binds the eleven spectrum columns shared by every insert dialect, in
/// column-list order. The ID (columnar class) and `created_at` (returning
/// and autoincrement classes) are bound by the caller around this.
fn bind_spectrum_fields<'q>(
    query: Query<'q, Any, AnyArguments<'q>>,
    spectrum: &'q Spectrum,
    channels_json: &'q str,
    calibration_json: &'q str,
) -> Query<'q, Any, AnyArguments<'q>> {
    query
        .bind(spectrum.marker_id)
        .bind(channels_json)
        .bind(spectrum.channel_count)
        .bind(spectrum.energy_min_kev)
        .bind(spectrum.energy_max_kev)
        .bind(spectrum.live_time_sec)
        .bind(spectrum.real_time_sec)
        .bind(spectrum.device_model.as_str())
        .bind(calibration_json)
        .bind(spectrum.source_format.as_str())
        .bind(spectrum.raw_data.as_slice())
}

fn decode_spectrum_row(row: &AnyRow) -> Result<Spectrum, StoreError> {
    let scan = |e| StoreError::Sql("scan spectrum row", e);

    let channels_json: String = row.try_get(2).map_err(scan)?;
    let calibration_json: String = row.try_get(9).map_err(scan)?;
    let created_at: Option<i64> = row.try_get(12).map_err(scan)?;

    Ok(Spectrum {
        id: row.try_get(0).map_err(scan)?,
        marker_id: row.try_get(1).map_err(scan)?,
        channels: codec::decode_channels(&channels_json)?,
        channel_count: row.try_get(3).map_err(scan)?,
        energy_min_kev: row.try_get(4).map_err(scan)?,
        energy_max_kev: row.try_get(5).map_err(scan)?,
        live_time_sec: row.try_get(6).map_err(scan)?,
        real_time_sec: row.try_get(7).map_err(scan)?,
        device_model: row.try_get(8).map_err(scan)?,
        calibration: codec::decode_calibration(&calibration_json)?,
        source_format: row.try_get(10).map_err(scan)?,
        raw_data: row.try_get(11).map_err(scan)?,
        created_at: created_at.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn client_generated_id_is_the_nanosecond_epoch() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(client_generated_id(t).unwrap(), 1_704_067_200_000_000_000);
    }

    #[test]
    fn client_generated_id_rejects_unrepresentable_times() {
        // Beyond 2262 the nanosecond epoch overflows i64; the insert must
        // fail instead of producing ID zero.
        let far_future = Utc.with_ymd_and_hms(2300, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            client_generated_id(far_future),
            Err(StoreError::MissingInsertId)
        ));
    }
}
