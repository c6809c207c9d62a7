//! Bounded FIFO of throughput samples backing the rolling chart

use serde::Serialize;
use std::collections::VecDeque;

/// Rolling download/upload series with time labels
///
/// The three series are parallel and always share the same length; once
/// `capacity` is reached every push evicts the oldest sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBuffer {
    capacity: usize,
    labels: VecDeque<String>,
    download: VecDeque<f64>,
    upload: VecDeque<f64>,
}

impl Default for ChartBuffer {
    fn default() -> Self {
        Self::with_capacity(crate::defaults::CHART_CAPACITY)
    }
}

impl ChartBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capacity is clamped to at least one sample
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            labels: VecDeque::with_capacity(capacity),
            download: VecDeque::with_capacity(capacity),
            upload: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a sample labelled with the current local time
    pub fn push(&mut self, download: f64, upload: f64) {
        let label = chrono::Local::now().format("%H:%M:%S").to_string();
        self.push_at(label, download, upload);
    }

    /// Append a sample with an explicit label
    pub fn push_at<S: Into<String>>(&mut self, label: S, download: f64, upload: f64) {
        while self.labels.len() >= self.capacity {
            self.labels.pop_front();
            self.download.pop_front();
            self.upload.pop_front();
        }

        self.labels.push_back(label.into());
        self.download.push_back(download);
        self.upload.push_back(upload);
    }

    /// Drop every sample
    pub fn reset(&mut self) {
        self.labels.clear();
        self.download.clear();
        self.upload.clear();
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn labels(&self) -> &VecDeque<String> {
        &self.labels
    }

    pub fn download(&self) -> &VecDeque<f64> {
        &self.download
    }

    pub fn upload(&self) -> &VecDeque<f64> {
        &self.upload
    }

    /// Most recent `(label, download, upload)` sample
    pub fn latest(&self) -> Option<(&str, f64, f64)> {
        let label = self.labels.back()?;
        let download = *self.download.back()?;
        let upload = *self.upload.back()?;
        Some((label.as_str(), download, upload))
    }

    /// Largest value across both series, used to scale the plot
    pub fn peak(&self) -> f64 {
        self.download
            .iter()
            .chain(self.upload.iter())
            .copied()
            .fold(0.0, f64::max)
    }
}
