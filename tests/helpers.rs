// Shared test helpers for database setup and test data creation.
//
// Tests run against a file-backed SQLite database (one per test, in a temp
// dir) reached through the same Any-driver pool the library uses, so the
// whole dialect/codec/repository stack is exercised end to end.

use std::path::Path;

use sqlx::AnyPool;

use spectra_store::{init_store_pool, EnergyCalibration, Spectrum, SpectrumStore};

/// Creates a store over a fresh SQLite database inside `dir`, with the
/// spectra and markers tables created.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_store(dir: &Path) -> SpectrumStore {
    let _ = env_logger::builder().is_test(true).try_init();

    let db_path = dir.join("spectra.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = init_store_pool(&url)
        .await
        .expect("Failed to create test database pool");
    create_schema(&pool).await;

    SpectrumStore::with_pool(pool, "sqlite").expect("Failed to configure store")
}

/// Creates the spectra and markers tables.
///
/// In production this is owned by migration tooling; tests create the
/// minimal equivalent schema directly.
#[allow(dead_code)] // Used by other test files
pub async fn create_schema(pool: &AnyPool) {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS spectra (
            id INTEGER PRIMARY KEY,
            marker_id INTEGER NOT NULL,
            channels TEXT NOT NULL,
            channel_count INTEGER NOT NULL,
            energy_min_kev REAL,
            energy_max_kev REAL,
            live_time_sec REAL,
            real_time_sec REAL,
            device_model TEXT,
            calibration TEXT,
            source_format TEXT,
            raw_data BLOB,
            created_at INTEGER
        )",
    )
    .execute(pool)
    .await
    .expect("Failed to create spectra table");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS markers (
            id INTEGER PRIMARY KEY,
            doseRate REAL,
            date INTEGER,
            lon REAL,
            lat REAL,
            countRate REAL,
            zoom INTEGER,
            speed REAL,
            trackID TEXT,
            altitude REAL,
            detector TEXT,
            radiation TEXT,
            temperature REAL,
            humidity REAL,
            has_spectrum INTEGER NOT NULL DEFAULT 0
        )",
    )
    .execute(pool)
    .await
    .expect("Failed to create markers table");
}

/// Inserts a marker row and returns its ID.
#[allow(dead_code)] // Used by other test files
pub async fn insert_marker(
    pool: &AnyPool,
    id: i64,
    lat: f64,
    lon: f64,
    date: i64,
    has_spectrum: bool,
) -> i64 {
    sqlx::query(
        "INSERT INTO markers (
            id, doseRate, date, lon, lat, countRate, zoom, speed, trackID,
            altitude, detector, radiation, temperature, humidity, has_spectrum
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(0.12f64)
    .bind(date)
    .bind(lon)
    .bind(lat)
    .bind(3.5f64)
    .bind(12i32)
    .bind(0.0f64)
    .bind("track-1")
    .bind(110.0f64)
    .bind("RadiaCode-102")
    .bind("gamma")
    .bind(21.5f64)
    .bind(44.0f64)
    .bind(has_spectrum)
    .execute(pool)
    .await
    .expect("Failed to insert test marker");
    id
}

/// Reads a marker's has_spectrum flag directly.
///
/// SQLite reports the stored flag as an integer; read it as one rather than
/// assuming a native boolean.
#[allow(dead_code)] // Used by other test files
pub async fn marker_flag(pool: &AnyPool, marker_id: i64) -> bool {
    sqlx::query_scalar::<_, i64>("SELECT has_spectrum FROM markers WHERE id = ?")
        .bind(marker_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read marker flag")
        != 0
}

/// A realistic calibrated spectrum for a given marker.
#[allow(dead_code)] // Used by other test files
pub fn sample_spectrum(marker_id: i64) -> Spectrum {
    Spectrum {
        id: 0,
        marker_id,
        channels: vec![0, 3, 17, 240, 96, 4, 0, 1],
        channel_count: 8,
        energy_min_kev: 20.0,
        energy_max_kev: 3000.0,
        live_time_sec: 120.5,
        real_time_sec: 121.0,
        device_model: "RadiaCode-102".to_string(),
        calibration: Some(EnergyCalibration {
            coefficients: vec![-5.6, 2.4, 0.0004],
        }),
        source_format: "xml".to_string(),
        raw_data: b"<ResultDataFile>raw vendor bytes</ResultDataFile>".to_vec(),
        created_at: 1_700_000_000,
    }
}
