use crate::process::NormalizedRow;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Retain rows whose condition is in the selected subset. An empty selection
/// yields an empty result, not an error.
pub fn filter_rows(rows: &[NormalizedRow], selected: &HashSet<String>) -> Vec<NormalizedRow> {
    rows.iter()
        .filter(|row| selected.contains(&row.condition))
        .cloned()
        .collect()
}

/// Dense (name × condition) matrix of summed amounts. Row and column keys are
/// sorted; (name, condition) combinations absent from the input are
/// zero-filled.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub names: Vec<String>,
    pub conditions: Vec<String>,
    pub cells: Vec<Vec<f64>>,
}

impl PivotTable {
    /// Group by name, then condition, summing amounts. Deterministic for a
    /// fixed input regardless of row order.
    pub fn from_rows(rows: &[NormalizedRow]) -> Self {
        let names: Vec<String> = rows
            .iter()
            .map(|r| r.name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let conditions: Vec<String> = rows
            .iter()
            .map(|r| r.condition.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut sums: BTreeMap<(&str, &str), f64> = BTreeMap::new();
        for row in rows {
            *sums
                .entry((row.name.as_str(), row.condition.as_str()))
                .or_insert(0.0) += row.amount;
        }

        let cells = names
            .iter()
            .map(|name| {
                conditions
                    .iter()
                    .map(|cond| {
                        sums.get(&(name.as_str(), cond.as_str()))
                            .copied()
                            .unwrap_or(0.0)
                    })
                    .collect()
            })
            .collect();

        Self {
            names,
            conditions,
            cells,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Cell value for (name, condition), if both keys exist.
    pub fn get(&self, name: &str, condition: &str) -> Option<f64> {
        let row = self.names.iter().position(|n| n == name)?;
        let col = self.conditions.iter().position(|c| c == condition)?;
        Some(self.cells[row][col])
    }

    /// Per row, a mark on every column holding that row's maximum. Ties are
    /// all marked. Presentational only; cell data is untouched.
    pub fn row_max_flags(&self) -> Vec<Vec<bool>> {
        self.cells
            .iter()
            .map(|row| {
                let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                row.iter().map(|&v| v == max).collect()
            })
            .collect()
    }

    /// Sum of every cell.
    pub fn total(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }
}
