//! Bar charts of relative flux by key product and by gene
use crate::analysis::tabulate::{ResultRecord, ResultTable};
use indexmap::IndexMap;
use plotly::color::NamedColor;
use plotly::common::{Font, Line, Marker, Title};
use plotly::layout::{Axis, AxisType, GridPattern, LayoutGrid, Margin, TicksDirection};
use plotly::{Bar, Layout, Plot};
use thiserror::Error;

const PLOT_WIDTH: usize = 1200;
const PLOT_HEIGHT: usize = 600;
const VALUE_AXIS_TITLE: &str = "Relative GSL Flux (%)";

#[derive(Error, Debug, PartialEq)]
pub enum PlotError {
    #[error("Results table has no rows to plot")]
    EmptyTable,
}

/// Plot the relative flux of a results table, grouped by key product (left) and by
/// genes (right)
///
/// Rows sharing a category are averaged, ignoring rows without a finite relative flux.
/// Categories keep the order in which they first appear in the table. The returned figure
/// can be written with [`Plot::write_html`].
pub fn plot_model_results(table: &ResultTable) -> Result<Plot, PlotError> {
    if table.is_empty() {
        return Err(PlotError::EmptyTable);
    }

    let by_product = mean_relative_flux_by(table, |r| &r.key_product);
    let by_gene = mean_relative_flux_by(table, |r| &r.genes);

    let product_trace = Bar::new(
        by_product.keys().cloned().collect(),
        by_product.values().copied().collect(),
    )
    .name("Key Product")
    .marker(bar_marker())
    .show_legend(false);

    let gene_trace = Bar::new(
        by_gene.keys().cloned().collect(),
        by_gene.values().copied().collect(),
    )
    .name("Genes")
    .marker(bar_marker())
    .x_axis("x2")
    .y_axis("y2")
    .show_legend(false);

    let mut plot = Plot::new();
    plot.add_trace(product_trace);
    plot.add_trace(gene_trace);

    let layout = Layout::new()
        .width(PLOT_WIDTH)
        .height(PLOT_HEIGHT)
        .grid(
            LayoutGrid::new()
                .rows(1)
                .columns(2)
                .pattern(GridPattern::Independent),
        )
        .margin(Margin::new().left(60).right(20).top(30).bottom(30))
        .plot_background_color(NamedColor::White)
        .x_axis(category_axis())
        .y_axis(value_axis())
        .x_axis2(category_axis())
        .y_axis2(value_axis());
    plot.set_layout(layout);

    Ok(plot)
}

/// Mean finite relative flux of the rows in each category, NaN for a category without one
fn mean_relative_flux_by<F>(table: &ResultTable, category: F) -> IndexMap<String, f64>
where
    F: Fn(&ResultRecord) -> &String,
{
    let mut totals: IndexMap<String, (f64, usize)> = IndexMap::new();
    for record in table {
        let entry = totals.entry(category(record).clone()).or_insert((0f64, 0));
        if record.relative_flux.is_finite() {
            entry.0 += record.relative_flux;
            entry.1 += 1;
        }
    }
    totals
        .into_iter()
        .map(|(name, (sum, count))| {
            let mean = if count == 0 {
                f64::NAN
            } else {
                sum / count as f64
            };
            (name, mean)
        })
        .collect()
}

fn bar_marker() -> Marker {
    Marker::new()
        .color(NamedColor::SkyBlue)
        .line(Line::new().color(NamedColor::Black).width(1.0))
}

/// Category axis, labels rotated to vertical and no title
fn category_axis() -> Axis {
    Axis::new()
        .type_(AxisType::Category)
        .tick_angle(90.0)
        .title(Title::with_text(""))
        .show_line(true)
        .line_color(NamedColor::Black)
        .ticks(TicksDirection::Outside)
        .auto_margin(true)
}

fn value_axis() -> Axis {
    Axis::new()
        .title(Title::with_text(VALUE_AXIS_TITLE).font(Font::new().size(14)))
        .show_line(true)
        .line_color(NamedColor::Black)
        .ticks(TicksDirection::Outside)
        .show_grid(false)
        .auto_margin(true)
}
