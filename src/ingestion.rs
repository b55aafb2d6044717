use crate::columns::{detect_columns_within, ColumnLayout, DEFAULT_HEADER_SCAN_ROWS};
use crate::error::{DashboardError, Result};
use crate::locations::expand_location_name;
use crate::numeric::parse_number;
use crate::schema::{cell_at, Cell, Grid, OriginZone, RouteContract, UNASSIGNED_PROGRAMMER};
use crate::utils::{compare_names, stable_hash_str, to_base36};
use log::{debug, info};
use std::collections::{BTreeMap, HashSet};
use std::io::Read;

const OFF_CIRCUIT_SUFFIX: &str = "FORA DO CIRCUITO";

/// Decodes CSV text into a grid. No header handling; every record becomes a row.
pub fn read_csv_grid<R: Read>(reader: R) -> Result<Grid> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut grid = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        grid.push(record.iter().map(Cell::from).collect());
    }

    Ok(grid)
}

/// Decodes CSV text and aggregates it into zones.
pub fn parse_csv_text(text: &str) -> Result<Vec<OriginZone>> {
    let grid = read_csv_grid(text.as_bytes())?;
    parse_grid(&grid)
}

/// Aggregates a decoded sheet into origin zones sorted by name.
pub fn parse_grid(grid: &Grid) -> Result<Vec<OriginZone>> {
    parse_grid_with(grid, DEFAULT_HEADER_SCAN_ROWS)
}

pub fn parse_grid_with(grid: &Grid, header_scan_rows: usize) -> Result<Vec<OriginZone>> {
    let layout = detect_columns_within(grid, header_scan_rows)?;
    aggregate_rows(grid, &layout)
}

/// Canonical zone name for an upper-cased origin.
///
/// Drops a trailing "FORA DO CIRCUITO" marker (and its dash), then folds known aliases
/// onto their unified zone.
pub fn canonical_zone_name(origin: &str) -> String {
    let mut zone = origin.trim().to_string();

    if zone.contains(OFF_CIRCUIT_SUFFIX) {
        let without_marker = zone.replacen(OFF_CIRCUIT_SUFFIX, "", 1);
        let trimmed = without_marker.trim();
        let cleaned = trimmed.strip_suffix('-').unwrap_or(trimmed).trim();
        if !cleaned.is_empty() {
            zone = cleaned.to_string();
        }
    }

    match zone.as_str() {
        "PERNAMBUCO" | "PERNAMBUCO / PARAIBA / ALAGOAS" => "NORDESTE".to_string(),
        "SANTA CATARINA" | "EXTREMO OESTE SC" => "EXTREMO SANTA CATARINA".to_string(),
        "SÃO PAULO" => "SAO PAULO".to_string(),
        _ => zone,
    }
}

/// Display code for a zone: first three letters of the name plus a suffix derived from
/// the whole name, so the same zone gets the same id on every import.
pub fn zone_code(name: &str) -> String {
    let prefix: String = name.chars().take(3).collect::<String>().to_uppercase();
    format!("{}-{}", prefix, to_base36(stable_hash_str(name), 4))
}

/// Per-parse accumulators. Built fresh for every call to [`aggregate_rows`].
#[derive(Default)]
struct ZoneAccumulator {
    zones: BTreeMap<String, OriginZone>,
    seen_circuits: HashSet<String>,
    valid_rows: usize,
}

impl ZoneAccumulator {
    fn accept(&mut self, row_idx: usize, row: &[Cell], layout: &ColumnLayout) {
        let circuit_id = cell_at(row, Some(layout.circuit)).as_text();
        if circuit_id.is_empty() {
            return;
        }

        if !self.seen_circuits.insert(circuit_id.clone()) {
            debug!("Row {}: duplicate circuit {} skipped", row_idx, circuit_id);
            return;
        }

        let origin = cell_at(row, Some(layout.origin)).as_text().to_uppercase();
        let destination = cell_at(row, Some(layout.destination))
            .as_text()
            .to_uppercase();

        if origin.is_empty() || destination.is_empty() || origin.contains("TOTAL") {
            debug!("Row {}: circuit {} has no usable origin/destination", row_idx, circuit_id);
            return;
        }

        let programmer = match cell_at(row, layout.programmer).as_text() {
            name if name.is_empty() => UNASSIGNED_PROGRAMMER.to_string(),
            name => name,
        };

        let route = RouteContract {
            id: circuit_id,
            origin: expand_location_name(&origin),
            destination: expand_location_name(&destination),
            contracted_volume: parse_number(cell_at(row, layout.contracted_volume)),
            realized_volume: parse_number(cell_at(row, layout.realized_volume)),
            revenue: parse_number(cell_at(row, layout.revenue)),
            bonus: parse_number(cell_at(row, layout.bonus)),
        };

        let zone_name = canonical_zone_name(&origin);
        let zone = self
            .zones
            .entry(zone_name.clone())
            .or_insert_with(|| {
                OriginZone::new(zone_code(&zone_name), zone_name.clone(), programmer.clone())
            });

        if !zone.has_programmer() && programmer != UNASSIGNED_PROGRAMMER {
            zone.programmer = programmer;
        }

        zone.push_route(route);
        self.valid_rows += 1;
    }

    fn finish(self, rows_scanned: usize) -> Result<Vec<OriginZone>> {
        if self.valid_rows == 0 {
            return Err(DashboardError::NoValidData { rows: rows_scanned });
        }

        let mut zones: Vec<OriginZone> = self.zones.into_values().collect();
        zones.sort_by(|a, b| compare_names(&a.name, &b.name));

        info!(
            "Aggregated {} routes into {} origin zones",
            self.valid_rows,
            zones.len()
        );
        Ok(zones)
    }
}

/// Walks the data rows under `layout` and groups them into zones.
pub fn aggregate_rows(grid: &Grid, layout: &ColumnLayout) -> Result<Vec<OriginZone>> {
    if grid.is_empty() {
        return Err(DashboardError::EmptyInput);
    }

    let mut acc = ZoneAccumulator::default();
    for (row_idx, row) in grid.iter().enumerate().skip(layout.start_row) {
        acc.accept(row_idx, row, layout);
    }

    acc.finish(grid.len().saturating_sub(layout.start_row))
}
