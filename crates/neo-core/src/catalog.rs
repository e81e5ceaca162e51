//! The fixed catalog of analytical reports.
//!
//! Each report is a declarative descriptor: an identifier, a display title, the
//! columns it projects and its SQL. Selection is always by identifier, so the
//! titles can be reworded freely.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

use crate::db::{DbError, QueryExecutor, SqlDialect, Statement};
use crate::table::ResultTable;

/// Identifier of a catalog report, 1 through 15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ReportId(u8);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown report: {0}")]
pub struct UnknownReport(pub String);

impl ReportId {
    pub const FIRST: u8 = 1;
    pub const LAST: u8 = 15;

    pub fn new(id: u32) -> Option<Self> {
        u8::try_from(id)
            .ok()
            .filter(|id| (Self::FIRST..=Self::LAST).contains(id))
            .map(ReportId)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn descriptor(self) -> &'static ReportDescriptor {
        &CATALOG[usize::from(self.0 - Self::FIRST)]
    }

    pub fn all() -> impl Iterator<Item = ReportId> {
        (Self::FIRST..=Self::LAST).map(ReportId)
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReportId {
    type Err = UnknownReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(ReportId::new)
            .ok_or_else(|| UnknownReport(s.to_string()))
    }
}

/// SQL for a report. Most reports are portable; month bucketing is not.
#[derive(Debug, Clone, Copy)]
pub enum ReportQuery {
    Portable(&'static str),
    PerDialect {
        sqlite: &'static str,
        mysql: &'static str,
    },
}

impl ReportQuery {
    pub fn sql_for(&self, dialect: SqlDialect) -> &'static str {
        match (self, dialect) {
            (ReportQuery::Portable(sql), _) => sql,
            (ReportQuery::PerDialect { sqlite, .. }, SqlDialect::Sqlite) => sqlite,
            (ReportQuery::PerDialect { mysql, .. }, SqlDialect::MySql) => mysql,
        }
    }
}

/// A named, parameterless report.
#[derive(Debug, Clone, Copy)]
pub struct ReportDescriptor {
    pub id: ReportId,
    pub title: &'static str,
    /// Projected column names, in order.
    pub columns: &'static [&'static str],
    pub query: ReportQuery,
}

impl ReportDescriptor {
    /// Title prefixed with the report number, as shown in the selector.
    pub fn label(&self) -> String {
        format!("{}. {}", self.id, self.title)
    }
}

/// All reports, ordered by identifier.
pub static CATALOG: [ReportDescriptor; 15] = [
    ReportDescriptor {
        id: ReportId(1),
        title: "Count how many times each asteroid has approached Earth",
        columns: &["asteroid_id", "approach_count"],
        query: ReportQuery::Portable(
            r#"
            SELECT asteroid_id,
                   COUNT(*) AS approach_count
            FROM close_approach
            GROUP BY asteroid_id
            ORDER BY approach_count DESC
            "#,
        ),
    },
    ReportDescriptor {
        id: ReportId(2),
        title: "Average velocity of each asteroid over multiple approaches",
        columns: &["asteroid_id", "avg_velocity_kmph"],
        query: ReportQuery::Portable(
            r#"
            SELECT asteroid_id,
                   AVG(relative_velocity_kmph) AS avg_velocity_kmph
            FROM close_approach
            GROUP BY asteroid_id
            ORDER BY avg_velocity_kmph DESC
            "#,
        ),
    },
    ReportDescriptor {
        id: ReportId(3),
        title: "List top 10 fastest asteroids",
        columns: &["name", "max_velocity_kmph"],
        query: ReportQuery::Portable(
            r#"
            SELECT a.name,
                   MAX(c.relative_velocity_kmph) AS max_velocity_kmph
            FROM close_approach c
            JOIN asteroids a ON a.asteroid_id = c.asteroid_id
            GROUP BY a.asteroid_id, a.name
            ORDER BY max_velocity_kmph DESC
            LIMIT 10
            "#,
        ),
    },
    ReportDescriptor {
        id: ReportId(4),
        title: "Potentially hazardous asteroids with more than 3 approaches",
        columns: &["name", "approach_count"],
        query: ReportQuery::Portable(
            r#"
            SELECT a.name,
                   COUNT(*) AS approach_count
            FROM close_approach c
            JOIN asteroids a ON a.asteroid_id = c.asteroid_id
            WHERE a.is_potentially_hazardous_asteroid = 1
            GROUP BY a.asteroid_id, a.name
            HAVING COUNT(*) > 3
            ORDER BY approach_count DESC
            "#,
        ),
    },
    ReportDescriptor {
        id: ReportId(5),
        title: "Month with the most asteroid approaches",
        columns: &["year_month", "total_approaches"],
        query: ReportQuery::PerDialect {
            sqlite: r#"
            SELECT strftime('%Y-%m', close_approach_date) AS year_month,
                   COUNT(*) AS total_approaches
            FROM close_approach
            GROUP BY year_month
            ORDER BY total_approaches DESC
            LIMIT 1
            "#,
            mysql: r#"
            SELECT DATE_FORMAT(close_approach_date, '%Y-%m') AS `year_month`,
                   COUNT(*) AS total_approaches
            FROM close_approach
            GROUP BY `year_month`
            ORDER BY total_approaches DESC
            LIMIT 1
            "#,
        },
    },
    ReportDescriptor {
        id: ReportId(6),
        title: "Asteroid with the fastest ever approach speed",
        columns: &["name", "relative_velocity_kmph", "close_approach_date"],
        query: ReportQuery::Portable(
            r#"
            SELECT a.name,
                   c.relative_velocity_kmph,
                   c.close_approach_date
            FROM close_approach c
            JOIN asteroids a ON a.asteroid_id = c.asteroid_id
            ORDER BY c.relative_velocity_kmph DESC
            LIMIT 1
            "#,
        ),
    },
    ReportDescriptor {
        id: ReportId(7),
        title: "Sort asteroids by maximum estimated diameter (descending)",
        columns: &["name", "estimated_diameter_max_km"],
        query: ReportQuery::Portable(
            r#"
            SELECT name,
                   estimated_diameter_max_km
            FROM asteroids
            ORDER BY estimated_diameter_max_km DESC
            "#,
        ),
    },
    ReportDescriptor {
        id: ReportId(8),
        title: "Approaches ordered by asteroid and date (see getting closer over time)",
        columns: &["asteroid_id", "close_approach_date", "miss_distance_km"],
        query: ReportQuery::Portable(
            r#"
            SELECT asteroid_id,
                   close_approach_date,
                   miss_distance_km
            FROM close_approach
            ORDER BY asteroid_id, close_approach_date
            "#,
        ),
    },
    ReportDescriptor {
        id: ReportId(9),
        title: "Closest approach (date & miss distance) for each asteroid",
        columns: &["name", "close_approach_date", "miss_distance_km"],
        query: ReportQuery::Portable(
            r#"
            SELECT a.name,
                   c.close_approach_date,
                   c.miss_distance_km
            FROM close_approach c
            JOIN asteroids a ON a.asteroid_id = c.asteroid_id
            JOIN (
                SELECT asteroid_id,
                       MIN(miss_distance_km) AS min_dist
                FROM close_approach
                GROUP BY asteroid_id
            ) m
              ON c.asteroid_id = m.asteroid_id
             AND c.miss_distance_km = m.min_dist
            ORDER BY c.miss_distance_km ASC
            "#,
        ),
    },
    ReportDescriptor {
        id: ReportId(10),
        title: "Asteroids with velocity > 50,000 km/h",
        columns: &["name", "relative_velocity_kmph", "close_approach_date"],
        query: ReportQuery::Portable(
            r#"
            SELECT DISTINCT a.name,
                            c.relative_velocity_kmph,
                            c.close_approach_date
            FROM close_approach c
            JOIN asteroids a ON a.asteroid_id = c.asteroid_id
            WHERE c.relative_velocity_kmph > 50000
            ORDER BY c.relative_velocity_kmph DESC
            "#,
        ),
    },
    ReportDescriptor {
        id: ReportId(11),
        title: "Count how many approaches happened per month",
        columns: &["year_month", "total_approaches"],
        query: ReportQuery::PerDialect {
            sqlite: r#"
            SELECT strftime('%Y-%m', close_approach_date) AS year_month,
                   COUNT(*) AS total_approaches
            FROM close_approach
            GROUP BY year_month
            ORDER BY year_month
            "#,
            mysql: r#"
            SELECT DATE_FORMAT(close_approach_date, '%Y-%m') AS `year_month`,
                   COUNT(*) AS total_approaches
            FROM close_approach
            GROUP BY `year_month`
            ORDER BY `year_month`
            "#,
        },
    },
    ReportDescriptor {
        id: ReportId(12),
        title: "Asteroids with highest brightness (lowest magnitude)",
        columns: &["name", "absolute_magnitude_h"],
        query: ReportQuery::Portable(
            r#"
            SELECT name,
                   absolute_magnitude_h
            FROM asteroids
            ORDER BY absolute_magnitude_h ASC
            LIMIT 10
            "#,
        ),
    },
    ReportDescriptor {
        id: ReportId(13),
        title: "Number of hazardous vs non-hazardous asteroids",
        columns: &["hazardous_flag", "total"],
        query: ReportQuery::Portable(
            r#"
            SELECT is_potentially_hazardous_asteroid AS hazardous_flag,
                   COUNT(*) AS total
            FROM asteroids
            GROUP BY is_potentially_hazardous_asteroid
            ORDER BY hazardous_flag
            "#,
        ),
    },
    ReportDescriptor {
        id: ReportId(14),
        title: "Asteroids that passed closer than the Moon (< 1 LD)",
        columns: &["name", "close_approach_date", "miss_distance_lunar"],
        query: ReportQuery::Portable(
            r#"
            SELECT a.name,
                   c.close_approach_date,
                   c.miss_distance_lunar
            FROM close_approach c
            JOIN asteroids a ON a.asteroid_id = c.asteroid_id
            WHERE c.miss_distance_lunar < 1
            ORDER BY c.miss_distance_lunar ASC
            "#,
        ),
    },
    ReportDescriptor {
        id: ReportId(15),
        title: "Asteroids that came within 0.05 AU",
        columns: &["name", "close_approach_date", "astronomical"],
        query: ReportQuery::Portable(
            r#"
            SELECT a.name,
                   c.close_approach_date,
                   c.astronomical
            FROM close_approach c
            JOIN asteroids a ON a.asteroid_id = c.asteroid_id
            WHERE c.astronomical < 0.05
            ORDER BY c.astronomical ASC
            "#,
        ),
    },
];

/// Runs one catalog report and returns its table verbatim.
///
/// An empty result still carries the report's documented column names.
pub async fn run_report(
    executor: &dyn QueryExecutor,
    id: ReportId,
) -> Result<ResultTable, DbError> {
    let descriptor = id.descriptor();
    let statement = Statement::new(descriptor.query.sql_for(executor.dialect()));

    let mut table = executor.fetch_table(&statement).await?;
    if table.columns.is_empty() {
        table.columns = descriptor.columns.iter().map(|c| c.to_string()).collect();
    }

    info!(report = id.get(), rows = table.len(), "Report executed");
    Ok(table)
}
