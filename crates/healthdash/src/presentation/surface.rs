//! Rendering collaborator seam.
//!
//! A [`RenderSurface`] receives layout calls in page order. The dashboard
//! never draws anything itself; it only decides what goes where.

use std::io::Write;

use super::charts::{ChartSeries, ChartSpec};
use super::preview::TablePreview;
use super::{FilterControl, KpiCard};
use crate::error::Result;

/// Page layout hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLayout {
    Centered,
    Wide,
}

/// Anything that can show a dashboard.
///
/// Implement this to plug in a web UI, a notebook widget, or a test
/// recorder. Calls arrive in the order the page is laid out.
pub trait RenderSurface {
    /// Page title and layout. Always the first call.
    fn page(&mut self, title: &str, layout: PageLayout) -> Result<()>;

    fn sidebar_header(&mut self, text: &str) -> Result<()>;

    /// A sidebar multi-select filter.
    fn sidebar_multiselect(&mut self, control: &FilterControl) -> Result<()>;

    fn metric(&mut self, card: &KpiCard) -> Result<()>;

    /// Horizontal rule between sections.
    fn divider(&mut self) -> Result<()> {
        Ok(())
    }

    fn chart(&mut self, chart: &ChartSpec) -> Result<()>;

    /// Markdown text. `**bold**` is the only markup produced.
    fn markdown(&mut self, text: &str) -> Result<()>;

    fn subheader(&mut self, text: &str) -> Result<()>;

    fn table_preview(&mut self, preview: &TablePreview) -> Result<()>;
}

const BAR_WIDTH: usize = 30;

/// Plain-text rendering to any writer.
pub struct TerminalSurface<W: Write> {
    out: W,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn bar(value: f64, max: f64) -> String {
        let filled = if max > 0.0 {
            ((value / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        "#".repeat(filled)
    }
}

impl<W: Write> RenderSurface for TerminalSurface<W> {
    fn page(&mut self, title: &str, _layout: PageLayout) -> Result<()> {
        writeln!(self.out, "{}", "=".repeat(80))?;
        writeln!(self.out, "{}", title.to_uppercase())?;
        writeln!(self.out, "{}", "=".repeat(80))?;
        Ok(())
    }

    fn sidebar_header(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "\n[{}]", text)?;
        Ok(())
    }

    fn sidebar_multiselect(&mut self, control: &FilterControl) -> Result<()> {
        let selected = if control.selected.is_empty() {
            "(none)".to_string()
        } else {
            control.selected.join(", ")
        };
        writeln!(
            self.out,
            "  {}: {} of {} selected: {}",
            control.label,
            control.selected.len(),
            control.options.len(),
            selected
        )?;
        Ok(())
    }

    fn metric(&mut self, card: &KpiCard) -> Result<()> {
        writeln!(self.out, "  {:<16} {}", card.label, card.value)?;
        Ok(())
    }

    fn divider(&mut self) -> Result<()> {
        writeln!(self.out, "{}", "-".repeat(80))?;
        Ok(())
    }

    fn chart(&mut self, chart: &ChartSpec) -> Result<()> {
        writeln!(self.out, "\n{}", chart.title)?;
        if chart.series.is_empty() {
            writeln!(self.out, "  no data")?;
            return Ok(());
        }

        match &chart.series {
            ChartSeries::Categorical(points) => {
                let max = points.iter().map(|p| p.value).fold(0.0, f64::max);
                for point in points {
                    let share = point
                        .percentage
                        .map(|p| format!(" ({:.1}%)", p))
                        .unwrap_or_default();
                    writeln!(
                        self.out,
                        "  {:<20} {:<width$} {}{}",
                        point.label,
                        Self::bar(point.value, max),
                        point.value,
                        share,
                        width = BAR_WIDTH
                    )?;
                }
            }
            ChartSeries::Temporal(points) => {
                let max = points.iter().map(|p| p.value).fold(0.0, f64::max);
                for point in points {
                    writeln!(
                        self.out,
                        "  {:<20} {:<width$} {:.2}",
                        point.x,
                        Self::bar(point.value, max),
                        point.value,
                        width = BAR_WIDTH
                    )?;
                }
            }
            ChartSeries::Hierarchical(nodes) => {
                for node in nodes {
                    let indent = if node.parent.is_empty() { "  " } else { "      " };
                    writeln!(self.out, "{}{} {}", indent, node.label, node.value)?;
                }
            }
        }

        if let Some(ref insight) = chart.insight {
            self.markdown(insight)?;
        }
        Ok(())
    }

    fn markdown(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "  {}", text.replace("**", ""))?;
        Ok(())
    }

    fn subheader(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "\n{}\n{}", text, "-".repeat(text.chars().count()))?;
        Ok(())
    }

    fn table_preview(&mut self, preview: &TablePreview) -> Result<()> {
        if preview.is_empty() {
            writeln!(self.out, "  no data")?;
            return Ok(());
        }

        let mut widths: Vec<usize> = preview.columns.iter().map(|c| c.chars().count()).collect();
        for row in &preview.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(" | ")
        };

        writeln!(self.out, "{}", line(&preview.columns))?;
        for row in &preview.rows {
            writeln!(self.out, "{}", line(row))?;
        }
        writeln!(
            self.out,
            "({} of {} rows shown)",
            preview.rows.len(),
            preview.total_rows
        )?;
        Ok(())
    }
}
