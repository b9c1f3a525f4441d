use crate::error::{PipelineError, ReportError};
use crate::labeler::{label_transactions, scoring_rng, FRAUD_THRESHOLD};
use crate::loader::load_csv;
use crate::projector::{project, Projection};
use crate::report::export_pdf;
use crate::session::{Session, ThemeMode};
use crate::table::{ColumnData, TransactionTable, FRAUDULENT, RISK_SCORE};

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};

    fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    fn no_progress(_: f64) {}

    /// A small numeric table built without going through the loader.
    fn numeric_table(rows: usize) -> TransactionTable {
        let amounts: Vec<f64> = (0..rows).map(|i| 10.0 + i as f64 * 3.5).collect();
        let merchants: Vec<f64> = (0..rows).map(|i| (i % 7) as f64).collect();
        let mut table = TransactionTable::default();
        table.push_column("amount", ColumnData::Number(amounts));
        table.push_column("merchant_id", ColumnData::Number(merchants));
        table
    }

    #[test]
    fn labeler_appends_exactly_two_columns_and_preserves_rows() {
        let mut table = numeric_table(100);
        let before = table.clone();

        let mut rng = scoring_rng(Some(42));
        label_transactions(&mut table, &mut rng);

        assert_eq!(table.n_rows(), 100);
        assert_eq!(table.n_columns(), 4);
        // Original columns are byte-for-byte untouched.
        for original in before.columns() {
            let kept = table.column(&original.name).expect("column kept");
            assert_eq!(kept.data, original.data, "column {} changed", original.name);
        }
        assert!(table.column(RISK_SCORE).is_some());
        assert!(table.column(FRAUDULENT).is_some());
    }

    #[test]
    fn fraud_flag_equals_threshold_comparison_for_every_row() {
        let mut table = numeric_table(500);
        let mut rng = scoring_rng(Some(7));
        label_transactions(&mut table, &mut rng);

        let scores = match &table.column(RISK_SCORE).expect("scores").data {
            ColumnData::Number(v) => v.clone(),
            other => panic!("risk_score should be numeric, got {other:?}"),
        };
        let flags = table.fraud_flags().expect("flags");
        assert_eq!(scores.len(), flags.len());
        for (score, &flag) in scores.iter().zip(flags) {
            assert!((0.0..1.0).contains(score), "score {score} out of [0,1)");
            assert_eq!(flag, *score > FRAUD_THRESHOLD);
        }
    }

    #[test]
    fn seeded_labeling_is_reproducible() {
        let mut a = numeric_table(50);
        let mut b = numeric_table(50);
        label_transactions(&mut a, &mut scoring_rng(Some(1234)));
        label_transactions(&mut b, &mut scoring_rng(Some(1234)));
        assert_eq!(a, b);
    }

    #[test]
    fn fraud_fraction_is_roughly_a_quarter() {
        let mut table = numeric_table(10_000);
        label_transactions(&mut table, &mut scoring_rng(Some(99)));
        let stats = table.summary();
        assert!(
            stats.fraud_pct > 20.0 && stats.fraud_pct < 30.0,
            "fraud fraction {:.1}% far from 25%",
            stats.fraud_pct
        );
    }

    #[test]
    fn loader_infers_numeric_and_text_columns() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_csv(
            dir.path(),
            "mixed.csv",
            "amount,merchant,notes\n12.5,3,ok\n,4,suspicious\n7.25,5,\n",
        );
        let table = load_csv(&path, no_progress).expect("load");

        assert_eq!(table.n_rows(), 3);
        match &table.column("amount").expect("amount").data {
            // Empty numeric cells default to 0.0.
            ColumnData::Number(v) => assert_eq!(v, &vec![12.5, 0.0, 7.25]),
            other => panic!("amount should be numeric, got {other:?}"),
        }
        match &table.column("notes").expect("notes").data {
            ColumnData::Text(v) => assert_eq!(v.len(), 3),
            other => panic!("notes should be text, got {other:?}"),
        }
        assert_eq!(table.numeric_features().len(), 2);
    }

    #[test]
    fn loader_reports_progress_up_to_completion() {
        let dir = tempfile::tempdir().expect("tempdir");
        let body: String = (0..200).map(|i| format!("{i},{}\n", i * 2)).collect();
        let path = write_csv(dir.path(), "big.csv", &format!("a,b\n{body}"));

        let mut seen = Vec::new();
        load_csv(&path, |fraction| seen.push(fraction)).expect("load");
        assert!(!seen.is_empty());
        assert!(seen.iter().all(|f| (0.0..=1.0).contains(f)));
        assert_eq!(*seen.last().expect("last"), 1.0);
    }

    #[test]
    fn header_only_csv_fails_with_empty_input_and_leaves_session_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_csv(dir.path(), "empty.csv", "amount,merchant_id\n");

        let mut session = Session::new();
        let held = numeric_table(10);
        session.install_table(held.clone());

        let result = load_csv(&path, no_progress);
        assert!(matches!(result, Err(PipelineError::EmptyInput)));
        // The failed load never produced a table, so nothing was installed.
        assert_eq!(session.table(), Some(&held));
    }

    #[test]
    fn unreadable_file_fails_with_parse() {
        let result = load_csv(Path::new("/no/such/fraudguard-input.csv"), no_progress);
        assert!(matches!(result, Err(PipelineError::Parse(_))));
    }

    #[test]
    fn ragged_row_fails_with_parse() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_csv(dir.path(), "ragged.csv", "a,b\n1,2\n3,4,5\n");
        let result = load_csv(&path, no_progress);
        assert!(matches!(result, Err(PipelineError::Parse(_))));
    }

    #[test]
    fn projector_rejects_single_numeric_feature() {
        let mut table = TransactionTable::default();
        table.push_column("amount", ColumnData::Number(vec![1.0, 2.0, 3.0]));
        table.push_column(
            "city",
            ColumnData::Text(vec!["a".into(), "b".into(), "c".into()]),
        );
        let result = project(&table);
        assert!(matches!(
            result,
            Err(PipelineError::InsufficientFeatures { found: 1 })
        ));
    }

    #[test]
    fn projector_excludes_label_columns_from_features() {
        let mut table = numeric_table(30);
        label_transactions(&mut table, &mut scoring_rng(Some(3)));
        // risk_score and fraudulent must not count as features.
        assert_eq!(table.numeric_features().len(), 2);
        let projection = project(&table).expect("project");
        assert_eq!(projection.len(), 30);
    }

    #[test]
    fn projector_skips_zero_variance_columns() {
        let mut table = numeric_table(20);
        table.push_column("constant", ColumnData::Number(vec![5.0; 20]));
        let projection = project(&table).expect("constant column should be skipped");
        assert_eq!(projection.len(), 20);

        let mut starved = TransactionTable::default();
        starved.push_column("constant", ColumnData::Number(vec![5.0; 20]));
        starved.push_column("amount", ColumnData::Number((0..20).map(f64::from).collect()));
        let result = project(&starved);
        assert!(matches!(
            result,
            Err(PipelineError::InsufficientFeatures { found: 1 })
        ));
    }

    #[test]
    fn projection_preserves_row_count_and_order() {
        let mut table = numeric_table(100);
        label_transactions(&mut table, &mut scoring_rng(Some(11)));
        let projection = project(&table).expect("project");

        assert_eq!(projection.len(), 100);
        assert!(projection
            .points
            .iter()
            .all(|(x, y)| x.is_finite() && y.is_finite()));

        // Identical feature rows must land on identical points, in place.
        let mut doubled = TransactionTable::default();
        doubled.push_column(
            "amount",
            ColumnData::Number(vec![1.0, 9.0, 1.0, 9.0, 5.0, 5.0]),
        );
        doubled.push_column(
            "merchant_id",
            ColumnData::Number(vec![2.0, 4.0, 2.0, 4.0, 9.0, 9.0]),
        );
        let p = project(&doubled).expect("project");
        assert_eq!(p.len(), 6);
        let close = |a: (f64, f64), b: (f64, f64)| {
            (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
        };
        assert!(close(p.points[0], p.points[2]));
        assert!(close(p.points[1], p.points[3]));
        assert!(close(p.points[4], p.points[5]));
    }

    #[test]
    fn end_to_end_example_shapes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let body: String = (0..100)
            .map(|i| format!("{:.2},{}\n", 10.0 + i as f64 * 1.5, i % 9))
            .collect();
        let path = write_csv(dir.path(), "txns.csv", &format!("amount,merchant_id\n{body}"));

        let table =
            crate::session::load_labeled(&path, Some(5), no_progress).expect("load+label");
        assert_eq!(table.n_rows(), 100);
        assert_eq!(table.n_columns(), 4);

        let projection = project(&table).expect("project");
        assert_eq!(projection.len(), 100);
    }

    fn leftover_plot_temps() -> usize {
        fs::read_dir(std::env::temp_dir())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| {
                        e.file_name()
                            .to_string_lossy()
                            .starts_with("fraudguard-plot")
                    })
                    .count()
            })
            .unwrap_or(0)
    }

    #[test]
    fn report_export_writes_pdf_and_cleans_up_plot_image() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut table = numeric_table(40);
        label_transactions(&mut table, &mut scoring_rng(Some(21)));
        let projection = project(&table).expect("project");

        let temps_before = leftover_plot_temps();
        let out = dir.path().join("summary.pdf");
        export_pdf(&table, &projection, ThemeMode::Dark, &out).expect("export");

        let size = fs::metadata(&out).expect("report exists").len();
        assert!(size > 0, "report file is empty");
        assert_eq!(leftover_plot_temps(), temps_before, "temp plot image left behind");
    }

    #[test]
    fn report_export_fails_with_io_on_unwritable_destination() {
        let mut table = numeric_table(10);
        label_transactions(&mut table, &mut scoring_rng(Some(2)));
        let projection = project(&table).expect("project");

        let out = Path::new("/no/such/dir/summary.pdf");
        let result = export_pdf(&table, &projection, ThemeMode::Light, out);
        assert!(matches!(result, Err(ReportError::Io(_))));
    }

    #[test]
    fn report_export_handles_empty_projection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut table = numeric_table(5);
        label_transactions(&mut table, &mut scoring_rng(Some(8)));

        let out = dir.path().join("no-analysis.pdf");
        export_pdf(&table, &Projection::default(), ThemeMode::Light, &out).expect("export");
        assert!(fs::metadata(&out).expect("report exists").len() > 0);
    }

    #[test]
    fn session_theme_toggle_round_trips() {
        let mut session = Session::new();
        assert_eq!(session.theme(), ThemeMode::Dark);
        assert_eq!(session.toggle_theme(), ThemeMode::Light);
        assert_eq!(session.toggle_theme(), ThemeMode::Dark);
    }

    #[test]
    fn session_analyze_requires_a_table() {
        let session = Session::with_seed(1);
        assert!(session.analyze().is_none());
    }
}
