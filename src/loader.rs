use std::fs::File;
use std::path::Path;

use tracing::info;

use crate::error::PipelineError;
use crate::table::{Column, ColumnData, TransactionTable};

/// Read a delimited file with a header row into a column-typed table.
///
/// `progress` receives the fraction of input bytes consumed so far; it is
/// driven by the parser itself, so it tracks real work rather than a timer.
/// Fails with [`PipelineError::EmptyInput`] when the file parses but holds
/// zero data rows, and with [`PipelineError::Parse`] for unreadable or
/// malformed input.
pub fn load_csv<F>(path: &Path, mut progress: F) -> Result<TransactionTable, PipelineError>
where
    F: FnMut(f64),
{
    let file = File::open(path)?;
    let total_bytes = file.metadata()?.len().max(1);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(file);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

    let mut record = csv::StringRecord::new();
    let mut n_rows = 0usize;
    while reader.read_record(&mut record)? {
        for (i, column) in cells.iter_mut().enumerate() {
            column.push(record.get(i).unwrap_or("").to_string());
        }
        n_rows += 1;
        progress(reader.position().byte() as f64 / total_bytes as f64);
    }
    progress(1.0);

    if n_rows == 0 {
        return Err(PipelineError::EmptyInput);
    }

    let columns: Vec<Column> = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| infer_column(name, values))
        .collect();
    let table = TransactionTable::new(columns);

    let numeric = table.numeric_features().len();
    info!(
        rows = table.n_rows(),
        columns = table.n_columns(),
        numeric,
        path = %path.display(),
        "loaded transaction file"
    );
    Ok(table)
}

/// Infer a column's type from its raw cells.
///
/// A column is numeric when every non-empty cell parses as `f64` and at
/// least one cell is non-empty; empty cells then default to 0.0. Anything
/// else stays text.
fn infer_column(name: String, values: Vec<String>) -> Column {
    let mut any_value = false;
    let all_numeric = values.iter().all(|cell| {
        let cell = cell.trim();
        if cell.is_empty() {
            true
        } else {
            any_value = true;
            cell.parse::<f64>().is_ok()
        }
    });

    let data = if all_numeric && any_value {
        ColumnData::Number(
            values
                .iter()
                .map(|cell| cell.trim().parse::<f64>().unwrap_or(0.0))
                .collect(),
        )
    } else {
        ColumnData::Text(values)
    };
    Column { name, data }
}
