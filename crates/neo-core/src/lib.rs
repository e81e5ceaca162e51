//! # neo-core
//!
//! Data model, report catalog and approach filter for the NEO Tracker.
//!
//! This crate owns everything the dashboard asks of the database: the fixed
//! catalog of analytical reports, the parameterized close-approach filter and
//! the data access layer that executes both against SQLite or MySQL.

pub mod asteroid;
pub mod catalog;
pub mod db;
pub mod filter;
pub mod table;

pub use asteroid::{Asteroid, CloseApproach};
pub use catalog::{
    run_report, ReportDescriptor, ReportId, ReportQuery, UnknownReport, CATALOG,
};
pub use filter::{
    build_filter_statement, search_approaches, ApproachFilter, FilterError, FilterOutcome,
    HazardOption, SearchError, FILTER_COLUMNS,
};
pub use table::{CellValue, ResultTable};
