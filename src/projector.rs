use linfa::prelude::Predict;
use linfa::traits::Fit;
use linfa::Dataset;
use linfa_reduction::Pca;
use ndarray::Array;
use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::table::TransactionTable;

/// A 2-D embedding of the table, one `(pc1, pc2)` point per row, in the same
/// row order as the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    pub points: Vec<(f64, f64)>,
}

impl Projection {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// Population mean and standard deviation of one feature column.
fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Standardize the numeric feature columns and project them onto the top two
/// principal components.
///
/// Selection excludes `risk_score` and `fraudulent` plus any zero-variance
/// column (a constant column carries no direction of variance and would
/// divide by zero during standardization; it is skipped with a warning).
/// Fails with [`PipelineError::InsufficientFeatures`] when fewer than two
/// usable columns remain. The sign of each component is not guaranteed
/// stable between equivalent PCA solutions.
pub fn project(table: &TransactionTable) -> Result<Projection, PipelineError> {
    let n_rows = table.n_rows();

    // Standardize each usable column to zero mean / unit variance.
    let mut standardized: Vec<Vec<f64>> = Vec::new();
    for (name, values) in table.numeric_features() {
        let (mean, std_dev) = mean_std(values);
        if std_dev > 0.0 {
            standardized.push(values.iter().map(|x| (x - mean) / std_dev).collect());
        } else {
            warn!(column = name, "skipping zero-variance feature column");
        }
    }

    if standardized.len() < 2 {
        return Err(PipelineError::InsufficientFeatures {
            found: standardized.len(),
        });
    }

    let n_features = standardized.len();
    let mut data = Array::zeros((n_rows, n_features));
    for (j, column) in standardized.iter().enumerate() {
        for (i, &value) in column.iter().enumerate() {
            data[[i, j]] = value;
        }
    }

    let dataset = Dataset::from(data);
    let model = Pca::params(2).fit(&dataset)?;
    let embedded = model.predict(dataset);
    let targets = embedded.targets();

    let points: Vec<(f64, f64)> = targets
        .rows()
        .into_iter()
        .map(|row| (row[0], row[1]))
        .collect();
    debug_assert_eq!(points.len(), n_rows);
    debug!(rows = points.len(), features = n_features, "projection complete");

    Ok(Projection { points })
}
