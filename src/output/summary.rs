//! Final result summaries printed after a session ends

use crate::{
    error::Result,
    mapper::format_metric,
    models::{Config, FinalResults},
    quality::{latency_quality, throughput_quality, QualityRating},
};
use colored::*;
use serde::Serialize;

/// Formats the results of a finished test
pub trait SummaryFormatter {
    fn format_results(&self, results: &FinalResults) -> Result<String>;
}

fn metric_text(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| super::PLACEHOLDER.to_string(), |v| format!("{} {}", format_metric(v), unit))
}

fn rows(results: &FinalResults) -> Vec<(&'static str, String, Option<QualityRating>)> {
    vec![
        ("Ping", metric_text(results.ping, "ms"), results.ping.map(latency_quality)),
        ("Download", metric_text(results.download, "Mbps"), results.download.map(throughput_quality)),
        ("Upload", metric_text(results.upload, "Mbps"), results.upload.map(throughput_quality)),
    ]
}

fn server_line(results: &FinalResults) -> Option<String> {
    results.server.as_ref().map(|s| format!("{} ({}, {})", s.sponsor, s.name, s.country))
}

/// Plain text summary for scripts and logs
pub struct PlainSummary;

impl SummaryFormatter for PlainSummary {
    fn format_results(&self, results: &FinalResults) -> Result<String> {
        let mut out = vec!["Speed Test Results".to_string()];
        for (name, value, quality) in rows(results) {
            let quality = quality.map_or("", |q| q.label.description());
            out.push(format!("  {:<9} {:<14} {}", name, value, quality).trim_end().to_string());
        }
        if let Some(server) = server_line(results) {
            out.push(format!("  {:<9} {}", "Server", server));
        }
        Ok(out.join("\n"))
    }
}

/// Colored summary for interactive terminals
pub struct ColoredSummary;

impl SummaryFormatter for ColoredSummary {
    fn format_results(&self, results: &FinalResults) -> Result<String> {
        let mut out = vec!["Speed Test Results".bold().blue().to_string()];
        for (name, value, quality) in rows(results) {
            let quality = quality.map_or_else(String::new, |q| {
                q.label.description().color(q.label.color()).to_string()
            });
            out.push(format!("  {:<9} {:<14} {}", name.bold(), value, quality).trim_end().to_string());
        }
        if let Some(server) = server_line(results) {
            out.push(format!("  {:<9} {}", "Server".bold(), server.dimmed()));
        }
        Ok(out.join("\n"))
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    results: &'a FinalResults,
    ping_quality: Option<QualityRating>,
    download_quality: Option<QualityRating>,
    upload_quality: Option<QualityRating>,
}

/// Machine-readable summary
pub struct JsonSummary;

impl SummaryFormatter for JsonSummary {
    fn format_results(&self, results: &FinalResults) -> Result<String> {
        let report = JsonReport {
            results,
            ping_quality: results.ping.map(latency_quality),
            download_quality: results.download.map(throughput_quality),
            upload_quality: results.upload.map(throughput_quality),
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }
}

/// Picks the summary formatter matching the configuration
pub struct SummaryFormatterFactory;

impl SummaryFormatterFactory {
    pub fn create(config: &Config) -> Box<dyn SummaryFormatter> {
        if config.json_output {
            Box::new(JsonSummary)
        } else if config.enable_color {
            Box::new(ColoredSummary)
        } else {
            Box::new(PlainSummary)
        }
    }
}
