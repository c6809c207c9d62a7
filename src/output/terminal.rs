//! Terminal rendering of the dashboard
//!
//! On a TTY the whole frame is redrawn in place after every change. Anywhere
//! else only status-line changes are printed, one per line, so logs and pipes
//! stay readable.

use super::{dashboard::DashboardState, gauge::Speedometer, MetricCard, Presenter, StatusStyle};
use crate::{chart::ChartBuffer, mapper::PresentationUpdate};
use colored::*;
use crossterm::{
    cursor::MoveToPreviousLine,
    queue,
    terminal::{Clear, ClearType},
    tty::IsTty,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Sparkline, Widget},
};
use std::io::{self, Write};
use std::time::Instant;

const GAUGE_WIDTH: usize = 30;
const BAR_WIDTH: usize = 20;
// Sparkline bars are scaled on tenths of a Mbps
const SPARK_SCALE: f64 = 10.0;

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub error: Color,
    pub download: Color,
    pub upload: Color,
    pub gauge: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            error: Color::Red,
            download: Color::Green,
            upload: Color::Magenta,
            gauge: Color::Cyan,
            muted: Color::BrightBlack,
        }
    }
}

fn paint(text: &str, color: Color, enable_color: bool) -> String {
    if enable_color {
        text.color(color).to_string()
    } else {
        text.to_string()
    }
}

fn bar(percent: f64, width: usize, color: Color, enable_color: bool) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    if enable_color {
        format!("[{}{}]",
            "█".repeat(filled).color(color),
            "░".repeat(width - filled).color(Color::BrightBlack))
    } else {
        format!("[{}{}]", "=".repeat(filled), " ".repeat(width - filled))
    }
}

fn sparkline(values: impl IntoIterator<Item = f64>, peak: f64) -> String {
    let data: Vec<u64> = values
        .into_iter()
        .map(|v| (v.max(0.0) * SPARK_SCALE).round() as u64)
        .collect();
    if data.is_empty() {
        return String::new();
    }
    let max = ((peak.max(0.0) * SPARK_SCALE).round() as u64).max(1);

    let width = u16::try_from(data.len()).unwrap_or(u16::MAX);
    let area = Rect::new(0, 0, width, 1);
    let mut buf = Buffer::empty(area);
    Sparkline::default().data(&data).max(max).render(area, &mut buf);

    (0..width)
        .filter_map(|x| buf.cell((x, 0)).map(|cell| cell.symbol().to_string()))
        .collect()
}

fn metric_line(name: &str, unit: &str, card: &MetricCard, enable_color: bool) -> String {
    let value = if card.value == super::PLACEHOLDER {
        card.value.clone()
    } else {
        format!("{} {}", card.value, unit)
    };
    let color = card.quality_label.map(|l| l.color()).unwrap_or(Color::BrightBlack);
    format!("  {:<9} {:<14} {:<10} {}",
        name,
        value,
        paint(&card.quality, color, enable_color),
        bar(card.bar_percent as f64, BAR_WIDTH, color, enable_color))
}

/// Build one full frame of the dashboard
pub fn render_frame(state: &DashboardState, scheme: &ColorScheme, enable_color: bool, now: Instant) -> String {
    let mut lines = Vec::new();

    let title = "Speed Test Monitor";
    let title = if enable_color {
        title.bold().color(scheme.header).to_string()
    } else {
        title.to_string()
    };
    if state.server_text.is_empty() {
        lines.push(title);
    } else {
        lines.push(format!("{}  {}", title, paint(&format!("@ {}", state.server_text), scheme.muted, enable_color)));
    }

    let readout = state.speedometer.value_at(now);
    lines.push(format!("  {:<9} {} {:>4} Mbps  {}",
        "Speed",
        bar(Speedometer::fraction(readout) * 100.0, GAUGE_WIDTH, scheme.gauge, enable_color),
        state.speed_display(now),
        state.speed_label));

    lines.push(format!("  {:<9} {} {:>3}%",
        "Progress",
        bar(state.progress as f64, GAUGE_WIDTH, scheme.header, enable_color),
        state.progress));

    lines.push(metric_line("Ping", "ms", &state.ping, enable_color));
    lines.push(metric_line("Download", "Mbps", &state.download, enable_color));
    lines.push(metric_line("Upload", "Mbps", &state.upload, enable_color));
    lines.push(format!("  {:<9} {}", "Server", state.server_panel()));

    let chart = &state.chart;
    let peak = chart.peak();
    lines.push(format!("  {:<9} {} {}",
        "Chart",
        paint("↓", scheme.download, enable_color),
        paint(&sparkline(chart.download().iter().copied(), peak), scheme.download, enable_color)));
    lines.push(format!("  {:<9} {} {}",
        "",
        paint("↑", scheme.upload, enable_color),
        paint(&sparkline(chart.upload().iter().copied(), peak), scheme.upload, enable_color)));

    let status = match state.status_style {
        StatusStyle::Normal => state.status_text.clone(),
        StatusStyle::Success => paint(&state.status_text, scheme.success, enable_color),
        StatusStyle::Error => paint(&state.status_text, scheme.error, enable_color),
    };
    lines.push(format!("  {:<9} {}", "Status", status));

    let button = format!("[ {} ]", state.start_caption);
    lines.push(format!("  {}", if state.start_enabled {
        button
    } else {
        paint(&button, scheme.muted, enable_color)
    }));

    lines.join("\n")
}

/// [`Presenter`] that draws a [`DashboardState`] to a terminal
pub struct TerminalPresenter<W: Write + Send + 'static = io::Stdout> {
    state: DashboardState,
    writer: W,
    scheme: ColorScheme,
    enable_color: bool,
    live: bool,
    drawn_lines: usize,
    last_status: String,
}

impl TerminalPresenter<io::Stdout> {
    /// Render to stdout, redrawing in place when stdout is a terminal
    pub fn stdout(enable_color: bool) -> Self {
        let live = io::stdout().is_tty();
        Self::new(io::stdout(), enable_color, live)
    }
}

impl TerminalPresenter<io::Stderr> {
    /// Render to stderr, leaving stdout free for machine-readable output
    pub fn stderr(enable_color: bool) -> Self {
        let live = io::stderr().is_tty();
        Self::new(io::stderr(), enable_color, live)
    }
}

impl<W: Write + Send + 'static> TerminalPresenter<W> {
    pub fn new(writer: W, enable_color: bool, live: bool) -> Self {
        Self {
            state: DashboardState::new(),
            writer,
            scheme: ColorScheme::default(),
            enable_color,
            live,
            drawn_lines: 0,
            last_status: String::new(),
        }
    }

    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Draw the current state
    pub fn render(&mut self) {
        // Terminal write failures are not actionable mid-test
        let _ = self.try_render();
    }

    fn try_render(&mut self) -> io::Result<()> {
        if self.live {
            let frame = render_frame(&self.state, &self.scheme, self.enable_color, Instant::now());
            if self.drawn_lines > 0 {
                // Back to the first line of the previous frame, then clear below
                let lines = u16::try_from(self.drawn_lines).unwrap_or(u16::MAX);
                queue!(self.writer, MoveToPreviousLine(lines), Clear(ClearType::FromCursorDown))?;
            }
            writeln!(self.writer, "{}", frame)?;
            self.drawn_lines = frame.lines().count();
        } else {
            let line = format!("[{:>3}%] {}", self.state.progress, self.state.status_text);
            if line != self.last_status {
                writeln!(self.writer, "{}", line)?;
                self.last_status = line;
            }
        }
        self.writer.flush()
    }
}

impl<W: Write + Send + 'static> Presenter for TerminalPresenter<W> {
    fn reset(&mut self) {
        self.state.reset();
        self.render();
    }

    fn set_start_enabled(&mut self, enabled: bool) {
        self.state.set_start_enabled(enabled);
        self.render();
    }

    fn apply(&mut self, update: &PresentationUpdate) {
        self.state.apply(update);
        self.render();
    }

    fn update_speedometer(&mut self, speed: f64) {
        self.state.update_speedometer(speed);
        self.render();
    }

    fn render_chart(&mut self, chart: &ChartBuffer) {
        self.state.render_chart(chart);
        self.render();
    }

    // Terminal messages are the last frame of a session, so the gauge is
    // drawn at its target rather than part-way through easing
    fn show_error(&mut self, message: &str) {
        self.state.show_error(message);
        self.state.speedometer.settle();
        self.render();
    }

    fn show_success(&mut self) {
        self.state.show_success();
        self.state.speedometer.settle();
        self.render();
    }
}
