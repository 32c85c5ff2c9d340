//! Matrix assembly over a faction's roster.

use crate::models::{
    CareerMatrix, Faction, MatrixCell, MatrixRow, Metric, Precision, RelativeValue, Roster,
    RowAverage,
};

use super::accumulate::{Accumulator, PairKey};
use super::reconstruct::{mean_per_match, ratio, reconstruct_pair};
use super::AnalysisError;

/// Build the career × career matrix of one faction and metric.
pub fn assemble_matrix(
    accumulator: &Accumulator,
    roster: &Roster,
    faction: Faction,
    metric: Metric,
    trim_worst_fraction: f64,
) -> Result<CareerMatrix, AnalysisError> {
    let mean_per_match = mean_per_match(accumulator, faction, metric)?;
    let careers = roster.careers(faction).to_vec();

    let rows = careers
        .iter()
        .map(|row_career| {
            let cells: Vec<MatrixCell> = careers
                .iter()
                .map(|column_career| {
                    if column_career == row_career {
                        return MatrixCell::Diagonal;
                    }
                    let key =
                        PairKey::new(faction, row_career.clone(), column_career.clone(), metric);
                    accumulator
                        .samples(&key)
                        .and_then(|samples| {
                            reconstruct_pair(samples, mean_per_match, metric, trim_worst_fraction)
                        })
                        .map(MatrixCell::Value)
                        .unwrap_or(MatrixCell::NoData)
                })
                .collect();

            let row_average = row_average(&cells, metric.precision());
            MatrixRow {
                career: row_career.clone(),
                cells,
                row_average,
            }
        })
        .collect();

    Ok(CareerMatrix {
        faction,
        metric,
        mean_per_match,
        careers,
        rows,
    })
}

/// Average of a row's filled cells, re-rounded with the metric precision.
pub fn row_average(cells: &[MatrixCell], precision: Precision) -> Option<RowAverage> {
    let values: Vec<&RelativeValue> = cells.iter().filter_map(|cell| cell.value()).collect();
    if values.is_empty() {
        return None;
    }

    let count = values.len() as f64;
    let own = precision.round(values.iter().map(|v| v.own).sum::<f64>() / count);
    let other = precision.round(values.iter().map(|v| v.other).sum::<f64>() / count);

    Some(RowAverage {
        own,
        other,
        ratio: ratio(own, other),
        pairs: values.len(),
    })
}
