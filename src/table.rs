use std::collections::HashSet;

/// Column name appended by the labeler for the synthetic risk score.
pub const RISK_SCORE: &str = "risk_score";
/// Column name appended by the labeler for the derived fraud flag.
pub const FRAUDULENT: &str = "fraudulent";

/// Typed storage for a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Number(Vec<f64>),
    Text(Vec<String>),
    Bool(Vec<bool>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Number(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named, typed column of the transaction table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

/// An ordered, column-typed table of transactions.
///
/// The schema is whatever the input CSV carried; the labeler appends the
/// `risk_score` and `fraudulent` columns on top of it. All columns hold the
/// same number of rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionTable {
    columns: Vec<Column>,
}

impl TransactionTable {
    pub fn new(columns: Vec<Column>) -> Self {
        debug_assert!(
            columns.windows(2).all(|w| w[0].data.len() == w[1].data.len()),
            "all columns must share one row count"
        );
        Self { columns }
    }

    /// Number of data rows (not counting the header).
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.data.len())
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Append a column. Panics in debug builds if the row count disagrees.
    pub fn push_column(&mut self, name: &str, data: ColumnData) {
        debug_assert!(self.columns.is_empty() || data.len() == self.n_rows());
        self.columns.push(Column {
            name: name.to_string(),
            data,
        });
    }

    /// Numeric feature columns eligible for projection: `Number`-typed,
    /// excluding the two labeler-appended columns.
    pub fn numeric_features(&self) -> Vec<(&str, &[f64])> {
        let excluded: HashSet<&str> = [RISK_SCORE, FRAUDULENT].into();
        self.columns
            .iter()
            .filter(|c| !excluded.contains(c.name.as_str()))
            .filter_map(|c| match &c.data {
                ColumnData::Number(values) => Some((c.name.as_str(), values.as_slice())),
                _ => None,
            })
            .collect()
    }

    /// The fraud flags, if the table has been labeled.
    pub fn fraud_flags(&self) -> Option<&[bool]> {
        match self.column(FRAUDULENT).map(|c| &c.data) {
            Some(ColumnData::Bool(flags)) => Some(flags.as_slice()),
            _ => None,
        }
    }

    /// Summary statistics over the labeled table.
    pub fn summary(&self) -> SummaryStats {
        let total = self.n_rows();
        let fraud = self
            .fraud_flags()
            .map_or(0, |flags| flags.iter().filter(|&&f| f).count());
        let fraud_pct = if total > 0 {
            fraud as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        SummaryStats {
            total,
            fraud,
            fraud_pct,
        }
    }
}

/// Aggregated metrics over the labeled table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub total: usize,
    pub fraud: usize,
    pub fraud_pct: f64,
}
