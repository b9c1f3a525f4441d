use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::table::{ColumnData, TransactionTable, FRAUDULENT, RISK_SCORE};

/// Rows with a risk score strictly above this are flagged fraudulent, so
/// roughly a quarter of rows get flagged in the long run.
pub const FRAUD_THRESHOLD: f64 = 0.75;

/// Build the RNG used for scoring. A fixed seed gives reproducible labels;
/// without one the scores are fresh OS entropy on every run.
pub fn scoring_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Append the synthetic `risk_score` and `fraudulent` columns.
///
/// The score is an independent uniform draw from [0,1) per row and carries no
/// signal from the other columns; the flag is fully determined by the score.
/// Original columns and row order are untouched.
pub fn label_transactions<R: Rng>(table: &mut TransactionTable, rng: &mut R) {
    let scores: Vec<f64> = (0..table.n_rows())
        .map(|_| rng.random_range(0.0..1.0))
        .collect();
    let flags: Vec<bool> = scores.iter().map(|&s| s > FRAUD_THRESHOLD).collect();

    table.push_column(RISK_SCORE, ColumnData::Number(scores));
    table.push_column(FRAUDULENT, ColumnData::Bool(flags));
}
