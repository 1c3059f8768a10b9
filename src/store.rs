use rayon::prelude::*;
use tracing::{trace, warn};

use crate::cells::GridCell;
use crate::records::{COLUMN_FIELDS, Table, field_at};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    IgnoredKind,
    OutOfBounds,
}

/// Owns the generated table and answers the per-cell read/write protocol of
/// the grid.
#[derive(Debug, Default)]
pub struct ContactStore {
    table: Table,
}

impl ContactStore {
    pub fn new(table: Table) -> Self {
        Self { table }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Content of a single cell. The grid probes rows past the end of the
    /// table, these read as empty text.
    pub fn cell_content_at(&self, column: usize, row: usize) -> GridCell {
        let value = field_at(column)
            .zip(self.table.get(row))
            .map(|(field, record)| record.get(field))
            .unwrap_or_default();
        GridCell::text(value)
    }

    /// Write an edited cell back into the table. Only plain text edits are
    /// applied.
    pub fn apply_edit(&mut self, column: usize, row: usize, value: &GridCell) -> EditOutcome {
        let GridCell::Text(cell) = value else {
            trace!("Ignoring {:?} edit at {column}:{row}", value.kind());
            return EditOutcome::IgnoredKind;
        };
        match (field_at(column), self.table.get_mut(row)) {
            (Some(field), Some(record)) => {
                trace!("Edit {column}:{row} {:?} => \"{}\"", field, cell.data);
                record.set(field, cell.data.clone());
                EditOutcome::Applied
            }
            _ => {
                warn!("Rejecting edit outside of the table at {column}:{row}");
                EditOutcome::OutOfBounds
            }
        }
    }

    /// All values of a row in column order.
    pub fn row_values(&self, row: usize) -> Option<Vec<String>> {
        let record = self.table.get(row)?;
        Some(COLUMN_FIELDS.iter().map(|&f| record.get(f).to_string()).collect())
    }

    /// Substring search over every column, returning sorted `(row, column)`
    /// hits. Columns are scanned in parallel.
    pub fn search(&self, term: &str) -> Vec<(usize, usize)> {
        if term.is_empty() {
            return Vec::new();
        }
        let mut hits: Vec<(usize, usize)> = COLUMN_FIELDS
            .par_iter()
            .enumerate()
            .flat_map(|(column, &field)| {
                self.table
                    .iter()
                    .enumerate()
                    .filter(|(_, record)| record.get(field).contains(term))
                    .map(|(row, _)| (row, column))
                    .collect::<Vec<_>>()
            })
            .collect();
        hits.sort_unstable();
        hits
    }
}
