use crate::error::{DashboardError, Result};
use crate::schema::{Cell, Grid};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// How many leading rows are searched for the header by default.
pub const DEFAULT_HEADER_SCAN_ROWS: usize = 20;

/// Column positions resolved from a sheet. `None` marks a column that is absent and
/// reads as zero/blank for every row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub circuit: usize,
    pub origin: usize,
    pub destination: usize,
    pub programmer: Option<usize>,
    pub contracted_volume: Option<usize>,
    pub realized_volume: Option<usize>,
    pub revenue: Option<usize>,
    pub bonus: Option<usize>,
    /// First data row (the row after the header).
    pub start_row: usize,
    /// Header row index, when one was found.
    pub header_row: Option<usize>,
}

impl Default for ColumnLayout {
    /// Fixed positions used when no header row can be located.
    fn default() -> Self {
        Self {
            circuit: 0,
            origin: 1,
            destination: 2,
            programmer: Some(3),
            contracted_volume: Some(5),
            realized_volume: Some(7),
            revenue: None,
            bonus: None,
            start_row: 1,
            header_row: None,
        }
    }
}

/// Locates the header row within the first [`DEFAULT_HEADER_SCAN_ROWS`] rows.
pub fn detect_columns(grid: &Grid) -> Result<ColumnLayout> {
    detect_columns_within(grid, DEFAULT_HEADER_SCAN_ROWS)
}

/// Locates the header row within the first `scan_rows` rows and resolves column indices.
///
/// The header is the first row holding both an exact `ORIGEM` and an exact `DESTINO`
/// cell. Without one, [`ColumnLayout::default`] is returned.
pub fn detect_columns_within(grid: &Grid, scan_rows: usize) -> Result<ColumnLayout> {
    if grid.is_empty() {
        return Err(DashboardError::EmptyInput);
    }

    for (row_idx, row) in grid.iter().take(scan_rows).enumerate() {
        let tokens = header_tokens(row);

        let origin = find(&tokens, |c| c == "ORIGEM");
        let destination = find(&tokens, |c| c == "DESTINO");

        let (Some(origin), Some(destination)) = (origin, destination) else {
            continue;
        };

        let defaults = ColumnLayout::default();
        let layout = ColumnLayout {
            circuit: find(&tokens, |c| {
                c.contains("CIRCUITO") || c == "#" || c.contains("Nº")
            })
            .unwrap_or(defaults.circuit),
            origin,
            destination,
            programmer: find(&tokens, |c| c == "PROGRAMADOR").or(defaults.programmer),
            contracted_volume: find(&tokens, |c| c == "CONTRATO" || c == "META")
                .or(defaults.contracted_volume),
            realized_volume: find(&tokens, |c| {
                c == "REALIZADO" || c == "REAL" || c.contains("EXECUTADO")
            })
            .or(defaults.realized_volume),
            revenue: find(&tokens, |c| {
                c.contains("FATURAMENTO") || c == "VLR FRETE" || c == "RECEITA"
            }),
            bonus: find(&tokens, |c| c.contains("BONIFIC") || c == "BONUS"),
            start_row: row_idx + 1,
            header_row: Some(row_idx),
        };

        info!("Header row detected at index {}", row_idx);
        debug!("Resolved column layout: {:?}", layout);
        return Ok(layout);
    }

    warn!(
        "No ORIGEM/DESTINO header in the first {} rows; using default column positions",
        scan_rows
    );
    Ok(ColumnLayout::default())
}

fn header_tokens(row: &[Cell]) -> Vec<String> {
    row.iter().map(|cell| cell.as_text().to_uppercase()).collect()
}

fn find(tokens: &[String], predicate: impl Fn(&str) -> bool) -> Option<usize> {
    tokens.iter().position(|token| predicate(token.as_str()))
}
