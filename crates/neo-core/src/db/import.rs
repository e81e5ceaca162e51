//! CSV import for seeding a development database.
//!
//! The dashboard itself never writes. This path exists so a fresh SQLite file
//! (or an empty MySQL schema) can be loaded from the exported dataset. Header
//! names must match the column names; extra columns are ignored.

use super::{DbError, DbPool};
use crate::asteroid::{Asteroid, CloseApproach};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Counts of records written by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub asteroids: u64,
    pub approaches: u64,
}

/// Reads asteroid records from CSV.
pub fn read_asteroids<R: Read>(reader: R) -> Result<Vec<Asteroid>, DbError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();
    for result in csv_reader.deserialize::<Asteroid>() {
        let asteroid = result?;
        if asteroid.estimated_diameter_min_km > asteroid.estimated_diameter_max_km {
            warn!(
                asteroid_id = asteroid.asteroid_id,
                "Estimated minimum diameter exceeds maximum"
            );
        }
        records.push(asteroid);
    }
    Ok(records)
}

/// Reads close-approach records from CSV.
pub fn read_approaches<R: Read>(reader: R) -> Result<Vec<CloseApproach>, DbError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    csv_reader
        .deserialize::<CloseApproach>()
        .map(|result| result.map_err(DbError::from))
        .collect()
}

/// Reads both CSV files and writes their records in one transaction.
pub async fn import_csv(
    pool: &DbPool,
    asteroids_path: &Path,
    approaches_path: &Path,
) -> Result<ImportSummary, DbError> {
    let asteroids = read_asteroids(open(asteroids_path)?)?;
    let approaches = read_approaches(open(approaches_path)?)?;
    info!(
        asteroids = asteroids.len(),
        approaches = approaches.len(),
        "Parsed import files"
    );
    insert_records(pool, &asteroids, &approaches).await
}

fn open(path: &Path) -> Result<std::fs::File, DbError> {
    std::fs::File::open(path)
        .map_err(|e| DbError::Import(format!("{}: {}", path.display(), e)))
}

const SQLITE_UPSERT_ASTEROID: &str = r#"
    INSERT INTO asteroids (
        asteroid_id, name, absolute_magnitude_h,
        estimated_diameter_min_km, estimated_diameter_max_km,
        is_potentially_hazardous_asteroid
    ) VALUES (?, ?, ?, ?, ?, ?)
    ON CONFLICT(asteroid_id) DO UPDATE SET
        name = excluded.name,
        absolute_magnitude_h = excluded.absolute_magnitude_h,
        estimated_diameter_min_km = excluded.estimated_diameter_min_km,
        estimated_diameter_max_km = excluded.estimated_diameter_max_km,
        is_potentially_hazardous_asteroid = excluded.is_potentially_hazardous_asteroid
"#;

const MYSQL_UPSERT_ASTEROID: &str = r#"
    INSERT INTO asteroids (
        asteroid_id, name, absolute_magnitude_h,
        estimated_diameter_min_km, estimated_diameter_max_km,
        is_potentially_hazardous_asteroid
    ) VALUES (?, ?, ?, ?, ?, ?)
    ON DUPLICATE KEY UPDATE
        name = VALUES(name),
        absolute_magnitude_h = VALUES(absolute_magnitude_h),
        estimated_diameter_min_km = VALUES(estimated_diameter_min_km),
        estimated_diameter_max_km = VALUES(estimated_diameter_max_km),
        is_potentially_hazardous_asteroid = VALUES(is_potentially_hazardous_asteroid)
"#;

const INSERT_APPROACH: &str = r#"
    INSERT INTO close_approach (
        asteroid_id, close_approach_date, relative_velocity_kmph,
        astronomical, miss_distance_km, miss_distance_lunar
    ) VALUES (?, ?, ?, ?, ?, ?)
"#;

/// Writes records in a single transaction. Asteroids are upserted by id;
/// approaches are appended.
pub async fn insert_records(
    pool: &DbPool,
    asteroids: &[Asteroid],
    approaches: &[CloseApproach],
) -> Result<ImportSummary, DbError> {
    match pool {
        DbPool::Sqlite(pool) => {
            let mut tx = pool.begin().await?;
            for a in asteroids {
                sqlx::query(SQLITE_UPSERT_ASTEROID)
                    .bind(a.asteroid_id)
                    .bind(&a.name)
                    .bind(a.absolute_magnitude_h)
                    .bind(a.estimated_diameter_min_km)
                    .bind(a.estimated_diameter_max_km)
                    .bind(a.is_potentially_hazardous_asteroid)
                    .execute(&mut *tx)
                    .await?;
            }
            for c in approaches {
                sqlx::query(INSERT_APPROACH)
                    .bind(c.asteroid_id)
                    .bind(c.close_approach_date)
                    .bind(c.relative_velocity_kmph)
                    .bind(c.astronomical)
                    .bind(c.miss_distance_km)
                    .bind(c.miss_distance_lunar)
                    .execute(&mut *tx)
                    .await?;
            }
            tx.commit().await?;
        }
        DbPool::MySql(pool) => {
            let mut tx = pool.begin().await?;
            for a in asteroids {
                sqlx::query(MYSQL_UPSERT_ASTEROID)
                    .bind(a.asteroid_id)
                    .bind(&a.name)
                    .bind(a.absolute_magnitude_h)
                    .bind(a.estimated_diameter_min_km)
                    .bind(a.estimated_diameter_max_km)
                    .bind(a.is_potentially_hazardous_asteroid)
                    .execute(&mut *tx)
                    .await?;
            }
            for c in approaches {
                sqlx::query(INSERT_APPROACH)
                    .bind(c.asteroid_id)
                    .bind(c.close_approach_date)
                    .bind(c.relative_velocity_kmph)
                    .bind(c.astronomical)
                    .bind(c.miss_distance_km)
                    .bind(c.miss_distance_lunar)
                    .execute(&mut *tx)
                    .await?;
            }
            tx.commit().await?;
        }
    }

    let summary = ImportSummary {
        asteroids: asteroids.len() as u64,
        approaches: approaches.len() as u64,
    };
    info!(
        asteroids = summary.asteroids,
        approaches = summary.approaches,
        "Import committed"
    );
    Ok(summary)
}
