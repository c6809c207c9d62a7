//! Presentation layer
//!
//! The session controller drives a [`Presenter`]: the bundle of every display
//! sink (status line, progress bar, metric cards, speedometer, chart, start
//! button). [`DashboardState`] is the in-memory model of those sinks and
//! [`TerminalPresenter`] renders it.

mod dashboard;
mod gauge;
mod summary;
mod terminal;

pub use dashboard::{DashboardState, MetricCard, StatusStyle, PLACEHOLDER};
pub use gauge::{ease_out_quad, Speedometer, ARC_LENGTH, MAX_SPEED};
pub use summary::{ColoredSummary, JsonSummary, PlainSummary, SummaryFormatter, SummaryFormatterFactory};
pub use terminal::{render_frame, ColorScheme, TerminalPresenter};

use crate::{chart::ChartBuffer, mapper::PresentationUpdate};

/// Display sinks driven by the session controller
pub trait Presenter: Send + 'static {
    /// Put every display back to its placeholder value
    fn reset(&mut self);

    /// Enable or disable the start affordance
    fn set_start_enabled(&mut self, enabled: bool);

    /// Apply the text, progress, server and metric parts of an update.
    /// Speedometer and chart changes arrive through their own calls.
    fn apply(&mut self, update: &PresentationUpdate);

    /// Move the gauge towards `speed` Mbps
    fn update_speedometer(&mut self, speed: f64);

    /// Redraw the rolling chart
    fn render_chart(&mut self, chart: &ChartBuffer);

    /// Show a failure message (prefixed with `Error: `)
    fn show_error(&mut self, message: &str);

    /// Show the success message
    fn show_success(&mut self);
}
