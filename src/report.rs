use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::Local;
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument};
use tracing::{info, warn};

use crate::error::ReportError;
use crate::plot::render_scatter;
use crate::projector::Projection;
use crate::session::ThemeMode;
use crate::table::TransactionTable;

/// Static engine label printed in every report.
pub const ENGINE_LABEL: &str = "FraudGuard v1.0";

/// Export a single-page PDF summary: title, timestamp, row and fraud counts,
/// engine label, and the current scatter plot as an embedded raster image.
///
/// The plot is rendered into a temporary PNG which is removed afterwards;
/// cleanup failure is logged and otherwise ignored. An unwritable `out_path`
/// fails with [`ReportError::Io`].
pub fn export_pdf(
    table: &TransactionTable,
    projection: &Projection,
    mode: ThemeMode,
    out_path: &Path,
) -> Result<(), ReportError> {
    let plot_file = tempfile::Builder::new()
        .prefix("fraudguard-plot")
        .suffix(".png")
        .tempfile()?;
    render_scatter(
        projection,
        table.fraud_flags().unwrap_or(&[]),
        mode,
        plot_file.path(),
    )?;

    // Letter page, in millimetres.
    let (doc, page, layer) = PdfDocument::new(
        "Fraud Detection Report",
        Mm(215.9),
        Mm(279.4),
        "Layer 1",
    );
    let current = doc.get_page(page).get_layer(layer);
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;

    current.use_text("Fraud Detection Report", 24.0, Mm(20.0), Mm(258.0), &bold);

    let stats = table.summary();
    let lines = [
        format!("Date: {}", Local::now().format("%Y-%m-%d %H:%M")),
        format!("Total Transactions: {}", stats.total),
        format!("Fraudulent: {} ({:.2}%)", stats.fraud, stats.fraud_pct),
        format!("Analysis Engine: {ENGINE_LABEL}"),
    ];
    let mut y = 244.0;
    for line in &lines {
        current.use_text(line.as_str(), 12.0, Mm(20.0), Mm(y), &regular);
        y -= 8.0;
    }
    // The scores behind these figures are uniform random noise, not a model.
    current.use_text(
        "Note: risk scores are synthetic (uniform random); results vary run to run unless seeded.",
        9.0,
        Mm(20.0),
        Mm(y - 4.0),
        &regular,
    );

    let reader = BufReader::new(File::open(plot_file.path())?);
    let decoder = printpdf::image_crate::codecs::png::PngDecoder::new(reader)
        .map_err(|e| ReportError::Render(e.to_string()))?;
    let image = Image::try_from(decoder).map_err(|e| ReportError::Render(e.to_string()))?;
    image.add_to_layer(
        current.clone(),
        ImageTransform {
            translate_x: Some(Mm(20.0)),
            translate_y: Some(Mm(80.0)),
            dpi: Some(135.0),
            ..Default::default()
        },
    );

    let out = File::create(out_path)?;
    doc.save(&mut BufWriter::new(out))
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    info!(path = %out_path.display(), rows = stats.total, "report written");

    if let Err(err) = plot_file.close() {
        // Non-fatal: a stray temp image is harmless.
        warn!(error = %err, "could not remove temporary plot image");
    }
    Ok(())
}
