//! SVG rendering with plotters

use anyhow::{Context, Result};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{
    comparison_bounds, comparison_title, file_stem, label_at, per_file_bounds, segments,
    series_caption, y_range, ChartHandle, ChartKind, ChartRegistry,
};
use crate::comparison::OverlayCollection;
use crate::config::ChartSettings;
use crate::metric::{Locale, Metric};
use crate::pipeline::ComparisonRun;
use crate::series::PerFileSeriesSet;

/// Writes the charts of a run into one directory
pub struct SvgRenderer {
    pub width: u32,
    pub height: u32,
    pub output_dir: PathBuf,
    pub locale: Locale,
}

impl SvgRenderer {
    pub fn new(settings: &ChartSettings, locale: Locale) -> Self {
        Self {
            width: settings.width,
            height: settings.height,
            output_dir: settings.output_dir.clone(),
            locale,
        }
    }

    /// One chart per file, then one comparison chart per metric
    pub fn render_run(&self, run: &ComparisonRun) -> Result<ChartRegistry> {
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create chart directory: {}", self.output_dir.display())
        })?;

        let mut registry = ChartRegistry::new();

        for (index, set) in run.files.iter().enumerate() {
            let path = self
                .output_dir
                .join(format!("{:02}_{}.svg", index + 1, file_stem(&set.file_name)));
            self.render_file(set, &path)
                .with_context(|| format!("Failed to render chart for {}", set.file_name))?;
            registry.register(ChartHandle {
                title: set.file_name.clone(),
                path,
                kind: ChartKind::PerFile,
                metric: None,
            });
        }

        for overlay in &run.overlays {
            let path = self
                .output_dir
                .join(format!("comparison_{}.svg", overlay.metric.key()));
            let title = comparison_title(overlay, self.locale);
            self.render_comparison(overlay, &title, &path)
                .with_context(|| format!("Failed to render {}", title))?;
            registry.register(ChartHandle {
                title,
                path,
                kind: ChartKind::Comparison,
                metric: Some(overlay.metric),
            });
        }

        info!(charts = registry.len(), dir = %self.output_dir.display(), "Charts rendered");
        Ok(registry)
    }

    pub fn render_file(&self, set: &PerFileSeriesSet, path: &Path) -> Result<()> {
        let root = SVGBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let (y_min, y_max) = y_range(per_file_bounds(set));
        let x_max = set.len().max(2) as f64 - 1.0;

        let mut chart = ChartBuilder::on(&root)
            .caption(&set.file_name, ("sans-serif", 22))
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(0.0..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_labels(6)
            .x_label_formatter(&|x| label_at(&set.labels, *x))
            .y_label_formatter(&|y| format!("{:.0}", y))
            .draw()?;

        for (i, &metric) in Metric::ALL.iter().enumerate() {
            let color = Palette99::pick(i).to_rgba();
            let caption = series_caption(metric, &set.sport, self.locale);
            self.draw_line(&mut chart, set.series(metric), color, caption)?;
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
        debug!(path = %path.display(), "Per-file chart written");
        Ok(())
    }

    pub fn render_comparison(
        &self,
        overlay: &OverlayCollection,
        title: &str,
        path: &Path,
    ) -> Result<()> {
        let root = SVGBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let (y_min, y_max) = y_range(comparison_bounds(overlay));
        let x_max = overlay.labels.len().max(2) as f64 - 1.0;
        let unit = overlay.metric.unit(&overlay.sport);

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(0.0..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_labels(6)
            .x_label_formatter(&|x| label_at(&overlay.labels, *x))
            .y_desc(unit)
            .draw()?;

        for (i, series) in overlay.series.iter().enumerate() {
            let color = Palette99::pick(i).to_rgba();
            self.draw_line(&mut chart, &series.values, color, series.file_name.clone())?;
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
        debug!(path = %path.display(), metric = %overlay.metric, "Comparison chart written");
        Ok(())
    }

    /// Draw one series as separate line segments; gaps stay empty. Only the
    /// first segment carries the legend entry.
    fn draw_line<'a, DB>(
        &self,
        chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        values: &[f64],
        color: RGBAColor,
        caption: String,
    ) -> Result<()>
    where
        DB: DrawingBackend + 'a,
        DB::ErrorType: 'static,
    {
        for (n, run) in segments(values).into_iter().enumerate() {
            let drawn = chart.draw_series(LineSeries::new(run, color.stroke_width(2)))?;
            if n == 0 {
                drawn
                    .label(caption.clone())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            }
        }
        Ok(())
    }
}
