//! SQL dialect routing.
//!
//! Each supported backend identifier maps to a dialect: the SQL text and
//! placeholder style for every operation the store performs, plus the
//! strategy for obtaining the ID of a freshly inserted spectrum row. The
//! dialect is resolved once when the store is configured and held as a
//! single strategy object; per-call code never re-branches on raw
//! identifier strings.
//!
//! Backend classes:
//! - `postgres` — numbered `$n` placeholders, `RETURNING id`, epoch seconds
//!   converted to a timestamp type on insert and extracted back on select.
//! - `sqlite` — positional `?` placeholders, epoch seconds stored as-is; the
//!   generated ID is read back through a `RETURNING id` single-row scan
//!   (the Any driver adapter does not surface SQLite's last-insert rowid on
//!   execution results).
//! - `mysql` — positional `?` placeholders, last-inserted-ID read from the
//!   execution result, epoch seconds stored as-is.
//! - `clickhouse` — positional `?` placeholders, no autoincrement: the ID is
//!   generated client-side as a nanosecond epoch before the statement runs,
//!   and the insert stamps `created_at` with the server's `now()`.

use std::fmt;
use std::str::FromStr;

use strum_macros::EnumIter as EnumIterMacro;

use crate::error_handling::StoreError;

/// The closed set of supported backend identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum Backend {
    /// Postgres-compatible server ("returning" class).
    Postgres,
    /// Embedded SQLite ("autoincrement" class).
    Sqlite,
    /// MySQL-compatible server ("autoincrement" class).
    Mysql,
    /// ClickHouse-compatible analytics engine ("columnar" class).
    ClickHouse,
}

impl Backend {
    /// The configuration token for this backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Postgres => "postgres",
            Backend::Sqlite => "sqlite",
            Backend::Mysql => "mysql",
            Backend::ClickHouse => "clickhouse",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "postgres" => Ok(Backend::Postgres),
            "sqlite" => Ok(Backend::Sqlite),
            "mysql" => Ok(Backend::Mysql),
            "clickhouse" => Ok(Backend::ClickHouse),
            other => Err(StoreError::UnsupportedBackend(other.to_string())),
        }
    }
}

/// How the ID of a newly inserted spectrum row is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    /// The insert statement returns the generated ID as a single-row result.
    InsertReturning,
    /// The driver reports the last-inserted ID on the execution result.
    LastInsertId,
    /// The ID is generated client-side (nanosecond epoch) before executing.
    ClientGenerated,
}

/// How `created_at` is bound on the insert statement, for the classes that
/// bind it at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimestampBind {
    /// Epoch seconds bound as an integer and stored as-is.
    EpochSeconds,
    /// Epoch seconds bound as double precision for `to_timestamp()`.
    EpochAsDouble,
}

/// Resolved SQL dialect for one backend, held by the store for its lifetime.
#[derive(Debug, Clone, Copy)]
pub struct Dialect {
    backend: Backend,
}

impl Dialect {
    /// Wraps a parsed backend identifier into its dialect.
    pub fn new(backend: Backend) -> Self {
        Dialect { backend }
    }

    /// The backend this dialect was resolved for.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// ID-acquisition strategy for spectrum inserts.
    pub fn id_strategy(&self) -> IdStrategy {
        match self.backend {
            Backend::Postgres | Backend::Sqlite => IdStrategy::InsertReturning,
            Backend::Mysql => IdStrategy::LastInsertId,
            Backend::ClickHouse => IdStrategy::ClientGenerated,
        }
    }

    /// How the returning and autoincrement classes bind `created_at`.
    pub(crate) fn insert_timestamp_bind(&self) -> TimestampBind {
        match self.backend {
            Backend::Postgres => TimestampBind::EpochAsDouble,
            _ => TimestampBind::EpochSeconds,
        }
    }

    /// Insert statement for a spectrum row.
    ///
    /// Bind order matches the column list; for the columnar class the
    /// client-generated ID is bound first and `created_at` is not bound at
    /// all (the server stamps `now()`).
    pub fn insert_spectrum_sql(&self) -> &'static str {
        match self.backend {
            Backend::Postgres => {
                "INSERT INTO spectra (marker_id, channels, channel_count, energy_min_kev, energy_max_kev, \
                 live_time_sec, real_time_sec, device_model, calibration, \
                 source_format, raw_data, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, to_timestamp($12)) \
                 RETURNING id"
            }
            Backend::Sqlite => {
                "INSERT INTO spectra (marker_id, channels, channel_count, energy_min_kev, energy_max_kev, \
                 live_time_sec, real_time_sec, device_model, calibration, \
                 source_format, raw_data, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
                 RETURNING id"
            }
            Backend::Mysql => {
                "INSERT INTO spectra (marker_id, channels, channel_count, energy_min_kev, energy_max_kev, \
                 live_time_sec, real_time_sec, device_model, calibration, \
                 source_format, raw_data, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
            }
            Backend::ClickHouse => {
                "INSERT INTO spectra (id, marker_id, channels, channel_count, energy_min_kev, energy_max_kev, \
                 live_time_sec, real_time_sec, device_model, calibration, \
                 source_format, raw_data, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, now())"
            }
        }
    }

    /// Single-row lookup of a spectrum by marker ID.
    pub fn select_spectrum_sql(&self) -> &'static str {
        match self.backend {
            Backend::Postgres => {
                "SELECT id, marker_id, channels, channel_count, energy_min_kev, energy_max_kev, \
                 live_time_sec, real_time_sec, device_model, calibration, \
                 source_format, raw_data, EXTRACT(EPOCH FROM created_at)::BIGINT \
                 FROM spectra WHERE marker_id = $1 LIMIT 1"
            }
            _ => {
                "SELECT id, marker_id, channels, channel_count, energy_min_kev, energy_max_kev, \
                 live_time_sec, real_time_sec, device_model, calibration, \
                 source_format, raw_data, created_at \
                 FROM spectra WHERE marker_id = ? LIMIT 1"
            }
        }
    }

    /// Deletes every spectrum row attached to a marker.
    pub fn delete_spectrum_sql(&self) -> &'static str {
        match self.backend {
            Backend::Postgres => "DELETE FROM spectra WHERE marker_id = $1",
            _ => "DELETE FROM spectra WHERE marker_id = ?",
        }
    }

    /// Updates the denormalized `has_spectrum` flag on a marker.
    pub fn update_flag_sql(&self) -> &'static str {
        match self.backend {
            Backend::Postgres => "UPDATE markers SET has_spectrum = $1 WHERE id = $2",
            _ => "UPDATE markers SET has_spectrum = ? WHERE id = ?",
        }
    }

    /// Lists flagged markers inside an inclusive bounding box, most recent
    /// first, hard-capped at 1000 rows.
    pub fn markers_in_bounds_sql(&self) -> &'static str {
        match self.backend {
            Backend::Postgres => {
                "SELECT id, doseRate, date, lon, lat, countRate, zoom, speed, trackID, \
                 altitude, detector, radiation, temperature, humidity, has_spectrum \
                 FROM markers \
                 WHERE has_spectrum = $1 AND lat BETWEEN $2 AND $3 AND lon BETWEEN $4 AND $5 \
                 ORDER BY date DESC LIMIT 1000"
            }
            _ => {
                "SELECT id, doseRate, date, lon, lat, countRate, zoom, speed, trackID, \
                 altitude, detector, radiation, temperature, humidity, has_spectrum \
                 FROM markers \
                 WHERE has_spectrum = ? AND lat BETWEEN ? AND ? AND lon BETWEEN ? AND ? \
                 ORDER BY date DESC LIMIT 1000"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_backend_identifier_round_trips() {
        for backend in Backend::iter() {
            assert_eq!(backend.as_str().parse::<Backend>().unwrap(), backend);
        }
    }

    #[test]
    fn unknown_identifier_is_a_configuration_error() {
        let err = "duckdb".parse::<Backend>().unwrap_err();
        match err {
            StoreError::UnsupportedBackend(name) => assert_eq!(name, "duckdb"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn postgres_uses_numbered_placeholders_and_returning() {
        let dialect = Dialect::new(Backend::Postgres);
        assert_eq!(dialect.id_strategy(), IdStrategy::InsertReturning);
        let sql = dialect.insert_spectrum_sql();
        assert!(sql.contains("$12"));
        assert!(sql.ends_with("RETURNING id"));
        assert!(!sql.contains('?'));
    }

    #[test]
    fn postgres_converts_timestamps_both_ways() {
        let dialect = Dialect::new(Backend::Postgres);
        assert!(dialect.insert_spectrum_sql().contains("to_timestamp($12)"));
        assert!(dialect
            .select_spectrum_sql()
            .contains("EXTRACT(EPOCH FROM created_at)::BIGINT"));
    }

    #[test]
    fn sqlite_combines_positional_placeholders_with_returning() {
        // The Any adapter for SQLite never reports a last-insert ID, so the
        // generated ID has to come back as a result row instead.
        let dialect = Dialect::new(Backend::Sqlite);
        assert_eq!(dialect.id_strategy(), IdStrategy::InsertReturning);
        let sql = dialect.insert_spectrum_sql();
        assert!(sql.contains("(?, ?"));
        assert!(sql.ends_with("RETURNING id"));
        assert!(!sql.contains('$'));
        // Epoch seconds stored as-is: no timestamp conversion functions.
        assert!(!sql.contains("to_timestamp"));
        assert!(!dialect.select_spectrum_sql().contains("EXTRACT"));
    }

    #[test]
    fn mysql_reads_the_id_from_the_execution_result() {
        let dialect = Dialect::new(Backend::Mysql);
        assert_eq!(dialect.id_strategy(), IdStrategy::LastInsertId);
        let sql = dialect.insert_spectrum_sql();
        assert!(sql.contains("(?, ?"));
        assert!(!sql.contains('$'));
        assert!(!sql.contains("RETURNING"));
        assert!(!sql.contains("to_timestamp"));
        assert!(!dialect.select_spectrum_sql().contains("EXTRACT"));
    }

    #[test]
    fn only_postgres_binds_epoch_as_double() {
        assert_eq!(
            Dialect::new(Backend::Postgres).insert_timestamp_bind(),
            TimestampBind::EpochAsDouble
        );
        for backend in [Backend::Sqlite, Backend::Mysql, Backend::ClickHouse] {
            assert_eq!(
                Dialect::new(backend).insert_timestamp_bind(),
                TimestampBind::EpochSeconds
            );
        }
    }

    #[test]
    fn columnar_backend_supplies_its_own_id_and_server_time() {
        let dialect = Dialect::new(Backend::ClickHouse);
        assert_eq!(dialect.id_strategy(), IdStrategy::ClientGenerated);
        let sql = dialect.insert_spectrum_sql();
        assert!(sql.starts_with("INSERT INTO spectra (id, marker_id"));
        assert!(sql.contains("now())"));
        assert!(!sql.contains("RETURNING"));
    }

    #[test]
    fn marker_listing_orders_by_date_and_caps_results() {
        for backend in Backend::iter() {
            let sql = Dialect::new(backend).markers_in_bounds_sql();
            assert!(sql.contains("ORDER BY date DESC"));
            assert!(sql.ends_with("LIMIT 1000"));
        }
    }
}
