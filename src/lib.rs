//! # Freight Zone Dashboard
//!
//! Turns a circuit-level freight spreadsheet export into origin-zone aggregates and
//! announces routes that were not present in earlier imports.
//!
//! ## Pipeline
//!
//! - **Column detection**: finds the `ORIGEM`/`DESTINO` header row and the positions of
//!   circuit, programmer, volume and money columns, tolerating naming variations
//! - **Numeric parsing**: coerces `R$ 1.234,56`-style cells into numbers, never failing
//! - **Location normalization**: expands state abbreviations and maps city/state pairs to
//!   region codes
//! - **Zone aggregation**: deduplicates circuits, unifies origin names and sums money per zone
//! - **Change detection**: diffs route ids against the caller's known set
//!
//! ## Example
//!
//! ```rust,ignore
//! use freight_zone_dashboard::*;
//!
//! let csv = "CIRCUITO,ORIGEM,DESTINO,PROGRAMADOR,,META,,REALIZADO\n\
//!            C1,GOIÁS,SAO PAULO,LUCAS,,100,,80\n";
//! let grid = read_csv_grid(csv.as_bytes()).unwrap();
//!
//! let outcome = process_import(&grid, &KnownRouteIds::new(), true).unwrap();
//! assert_eq!(outcome.zones[0].name, "GOIÁS");
//! assert!(outcome.changes.notifications.is_empty());
//! ```

pub mod changes;
pub mod columns;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod ingestion;
pub mod locations;
pub mod notifications;
pub mod numeric;
pub mod schema;
pub mod utils;

pub use changes::{detect_new_routes, ChangeSet, KnownRouteIds};
pub use columns::{detect_columns, detect_columns_within, ColumnLayout};
pub use config::{DashboardConfig, DEFAULT_SHEET_URL};
pub use dashboard::{Dashboard, SyncGuard};
pub use error::{DashboardError, Result};
pub use ingestion::*;
pub use locations::{expand_location_name, map_city_to_zone, zone_region_code, ZONE_RULES};
pub use notifications::NotificationFeed;
pub use numeric::{parse_brazilian_decimal, parse_number};
pub use schema::*;

use log::debug;

/// Zones from one import together with the route-id diff against earlier imports.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub zones: Vec<OriginZone>,
    pub changes: ChangeSet,
}

/// Parses `grid` and diffs its routes against `known`.
///
/// `known` is only read; the updated set is returned in the outcome. On error the caller
/// keeps whatever it had before.
pub fn process_import(
    grid: &Grid,
    known: &KnownRouteIds,
    is_initial_load: bool,
) -> Result<ImportOutcome> {
    let zones = parse_grid(grid)?;
    let changes = detect_new_routes(&zones, known, is_initial_load);

    debug!(
        "Import produced {} zones and {} notifications",
        zones.len(),
        changes.notifications.len()
    );

    Ok(ImportOutcome { zones, changes })
}
