use std::fmt::Write;

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::metric::Locale;
use crate::pipeline::{ComparisonRun, FileDiagnostic};
use crate::summary::{headers, SummaryRow};

/// Render summary rows as a table with localized headers
pub fn render_summary_table(rows: &[SummaryRow], locale: Locale) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers(locale).iter().map(|h| h.to_string()));
    for row in rows {
        builder.push_record(row.cells().iter().map(|c| c.to_string()));
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}

/// Render a whole run as plain text: summary table, skipped files and
/// processing time
pub fn render_run(run: &ComparisonRun, locale: Locale) -> String {
    let mut out = String::new();

    // writes into a String cannot fail
    let _ = writeln!(out, "{}", render_summary_table(&run.summaries, locale));

    if !run.diagnostics.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", SKIPPED_HEADING);
        for diagnostic in &run.diagnostics {
            let _ = writeln!(out, "{}", diagnostic_line(diagnostic));
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} {:.3}s",
        processing_time_label(locale),
        run.elapsed.as_secs_f64()
    );
    out
}

pub const SKIPPED_HEADING: &str = "Skipped:";

/// One indented line naming a left-out file and why
pub fn diagnostic_line(diagnostic: &FileDiagnostic) -> String {
    format!("  {}: {}", diagnostic.file_name, diagnostic.issue)
}

pub fn processing_time_label(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Processing time:",
        Locale::Zh => "处理耗时：",
    }
}
