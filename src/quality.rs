//! Quality ratings derived from raw latency and throughput figures

use colored::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete quality label shown next to a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualityLabel {
    Poor,
    #[serde(rename = "Very Slow")]
    VerySlow,
    Slow,
    Fair,
    Good,
    Excellent,
}

impl QualityLabel {
    /// Get descriptive text
    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Slow => "Slow",
            Self::VerySlow => "Very Slow",
            Self::Poor => "Poor",
        }
    }

    /// Get color for this quality level
    pub fn color(&self) -> Color {
        match self {
            Self::Excellent => Color::Green,
            Self::Good => Color::Cyan,
            Self::Fair => Color::Yellow,
            Self::Slow => Color::Magenta,
            Self::VerySlow | Self::Poor => Color::Red,
        }
    }
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A label plus bar strength in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityRating {
    pub label: QualityLabel,
    pub percent: u8,
}

impl QualityRating {
    const fn new(label: QualityLabel, percent: u8) -> Self {
        Self { label, percent }
    }
}

/// Rate a latency in milliseconds. Lower is better.
pub fn latency_quality(ping_ms: f64) -> QualityRating {
    if ping_ms < 20.0 {
        QualityRating::new(QualityLabel::Excellent, 100)
    } else if ping_ms < 50.0 {
        QualityRating::new(QualityLabel::Good, 75)
    } else if ping_ms < 100.0 {
        QualityRating::new(QualityLabel::Fair, 50)
    } else {
        QualityRating::new(QualityLabel::Poor, 25)
    }
}

/// Rate a throughput in Mbps. Higher is better; all bounds are strict.
pub fn throughput_quality(mbps: f64) -> QualityRating {
    if mbps > 100.0 {
        QualityRating::new(QualityLabel::Excellent, 100)
    } else if mbps > 50.0 {
        QualityRating::new(QualityLabel::Good, 75)
    } else if mbps > 25.0 {
        QualityRating::new(QualityLabel::Fair, 50)
    } else if mbps > 10.0 {
        QualityRating::new(QualityLabel::Slow, 30)
    } else {
        QualityRating::new(QualityLabel::VerySlow, 15)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_latency_boundaries() {
        assert_eq!(latency_quality(19.0).label, QualityLabel::Excellent);
        assert_eq!(latency_quality(20.0).label, QualityLabel::Good);
        assert_eq!(latency_quality(49.99).label, QualityLabel::Good);
        assert_eq!(latency_quality(50.0).label, QualityLabel::Fair);
        assert_eq!(latency_quality(100.0).label, QualityLabel::Poor);
        assert_eq!(latency_quality(0.0), QualityRating::new(QualityLabel::Excellent, 100));
        assert_eq!(latency_quality(250.0).percent, 25);
    }

    #[test]
    fn test_throughput_boundaries() {
        assert_eq!(throughput_quality(101.0).label, QualityLabel::Excellent);
        assert_eq!(throughput_quality(100.0).label, QualityLabel::Good);
        assert_eq!(throughput_quality(50.0).label, QualityLabel::Fair);
        assert_eq!(throughput_quality(42.0), QualityRating::new(QualityLabel::Fair, 50));
        assert_eq!(throughput_quality(25.0).label, QualityLabel::Slow);
        assert_eq!(throughput_quality(10.0), QualityRating::new(QualityLabel::VerySlow, 15));
        assert_eq!(throughput_quality(0.0).label, QualityLabel::VerySlow);
    }

    #[test]
    fn test_label_text() {
        assert_eq!(QualityLabel::VerySlow.to_string(), "Very Slow");
        assert_eq!(QualityLabel::Excellent.description(), "Excellent");
    }

    proptest! {
        #[test]
        fn latency_rating_never_improves_as_ping_grows(a in 0.0f64..1000.0, b in 0.0f64..1000.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(latency_quality(lo).percent >= latency_quality(hi).percent);
            prop_assert!(latency_quality(lo).label >= latency_quality(hi).label);
        }

        #[test]
        fn throughput_rating_never_worsens_as_speed_grows(a in 0.0f64..2000.0, b in 0.0f64..2000.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(throughput_quality(lo).percent <= throughput_quality(hi).percent);
        }

        #[test]
        fn ratings_stay_within_percent_range(v in 0.0f64..1.0e6) {
            prop_assert!(latency_quality(v).percent <= 100);
            prop_assert!(throughput_quality(v).percent <= 100);
        }
    }
}
