//! Career-relative matrices and the report that carries them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{AnalysisRole, Career, Faction, Metric};
use crate::config::AnalysisConfig;

/// Reconstructed absolute values for one ordered career pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativeValue {
    /// Row career's value
    pub own: f64,

    /// Column career's value
    pub other: f64,

    /// own / other, 0 when other is 0
    pub ratio: f64,

    /// Number of matches averaged
    pub sample_count: usize,
}

/// One cell of a career matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatrixCell {
    /// A career compared with itself
    Diagonal,
    NoData,
    Value(RelativeValue),
}

impl MatrixCell {
    pub fn value(&self) -> Option<&RelativeValue> {
        match self {
            MatrixCell::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// Mean over the non-empty cells of a row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowAverage {
    pub own: f64,
    pub other: f64,
    pub ratio: f64,

    /// Number of cells that contributed
    pub pairs: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub career: Career,

    /// Cells in column order
    pub cells: Vec<MatrixCell>,

    pub row_average: Option<RowAverage>,
}

/// Square career × career table for one faction and metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerMatrix {
    pub faction: Faction,
    pub metric: Metric,

    /// Corpus-wide mean of the metric per match for this faction
    pub mean_per_match: f64,

    /// Column order (same as row order)
    pub careers: Vec<Career>,

    pub rows: Vec<MatrixRow>,
}

impl CareerMatrix {
    pub fn row(&self, career: &Career) -> Option<&MatrixRow> {
        self.rows.iter().find(|row| &row.career == career)
    }

    pub fn cell(&self, row: &Career, column: &Career) -> Option<&MatrixCell> {
        let col = self.careers.iter().position(|c| c == column)?;
        self.row(row)?.cells.get(col)
    }

    /// Cells holding data.
    pub fn filled_cells(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .filter(|cell| cell.value().is_some())
            .count()
    }
}

/// Flat form of one off-diagonal cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeMatrixCell {
    pub faction: Faction,
    pub career_x: Career,
    pub career_y: Career,
    pub metric: Metric,
    pub own: Option<f64>,
    pub other: Option<f64>,
    pub ratio: Option<f64>,
    pub sample_count: usize,
}

/// faction → metric → row career → column career → value (`None` = no data).
pub type NestedMatrices =
    BTreeMap<Faction, BTreeMap<Metric, BTreeMap<Career, BTreeMap<Career, Option<RelativeValue>>>>>;

/// Output of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelativeReport {
    /// When the report was computed
    pub computed_at: DateTime<Utc>,

    pub role: AnalysisRole,

    /// Settings the run used
    pub settings: AnalysisConfig,

    /// Matches in the corpus
    pub matches: usize,

    pub matrices: Vec<CareerMatrix>,
}

impl RelativeReport {
    pub fn new(
        role: AnalysisRole,
        settings: AnalysisConfig,
        matches: usize,
        matrices: Vec<CareerMatrix>,
    ) -> Self {
        Self {
            computed_at: Utc::now(),
            role,
            settings,
            matches,
            matrices,
        }
    }

    pub fn matrix(&self, faction: Faction, metric: Metric) -> Option<&CareerMatrix> {
        self.matrices
            .iter()
            .find(|m| m.faction == faction && m.metric == metric)
    }

    pub fn nested(&self) -> NestedMatrices {
        let mut nested = NestedMatrices::new();
        for matrix in &self.matrices {
            let by_row = nested
                .entry(matrix.faction)
                .or_default()
                .entry(matrix.metric)
                .or_default();
            for row in &matrix.rows {
                let columns = by_row.entry(row.career.clone()).or_default();
                for (column, cell) in matrix.careers.iter().zip(&row.cells) {
                    match cell {
                        MatrixCell::Diagonal => {}
                        MatrixCell::NoData => {
                            columns.insert(column.clone(), None);
                        }
                        MatrixCell::Value(v) => {
                            columns.insert(column.clone(), Some(*v));
                        }
                    }
                }
            }
        }
        nested
    }

    pub fn flat_cells(&self) -> Vec<RelativeMatrixCell> {
        let mut cells = Vec::new();
        for matrix in &self.matrices {
            for row in &matrix.rows {
                for (column, cell) in matrix.careers.iter().zip(&row.cells) {
                    let value = match cell {
                        MatrixCell::Diagonal => continue,
                        MatrixCell::NoData => None,
                        MatrixCell::Value(v) => Some(v),
                    };
                    cells.push(RelativeMatrixCell {
                        faction: matrix.faction,
                        career_x: row.career.clone(),
                        career_y: column.clone(),
                        metric: matrix.metric,
                        own: value.map(|v| v.own),
                        other: value.map(|v| v.other),
                        ratio: value.map(|v| v.ratio),
                        sample_count: value.map(|v| v.sample_count).unwrap_or(0),
                    });
                }
            }
        }
        cells
    }
}
