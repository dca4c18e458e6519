use super::ExportError;
use crate::comparison::OverlayCollection;
use crate::metric::Locale;
use crate::summary::{headers, SummaryRow};
use std::path::Path;

/// Export summary rows, one line per file
pub fn export_summaries<P: AsRef<Path>>(
    rows: &[SummaryRow],
    locale: Locale,
    output_path: P,
) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record(headers(locale))?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    writer.flush()?;
    Ok(())
}

/// Export an overlay as a rectangular table: the reference label column and
/// one column per file. Cells past a file's end, and missing samples, are
/// left empty.
pub fn export_overlay<P: AsRef<Path>>(
    overlay: &OverlayCollection,
    output_path: P,
) -> Result<(), ExportError> {
    if overlay.series.is_empty() {
        return Err(ExportError::InsufficientData(format!(
            "overlay {} has no series",
            overlay.metric
        )));
    }

    let mut writer = csv::Writer::from_path(output_path)?;

    let mut header = vec!["label".to_string()];
    header.extend(overlay.series.iter().map(|s| s.file_name.clone()));
    writer.write_record(&header)?;

    let len = overlay.labels.len();
    let columns: Vec<Vec<f64>> = overlay.series.iter().map(|s| s.aligned_to(len)).collect();

    for (i, label) in overlay.labels.iter().enumerate() {
        let mut line = Vec::with_capacity(columns.len() + 1);
        line.push(label.clone());
        for column in &columns {
            let value = column[i];
            line.push(if value.is_finite() {
                value.to_string()
            } else {
                String::new()
            });
        }
        writer.write_record(&line)?;
    }

    writer.flush()?;
    Ok(())
}
