//! Scalar reducers collapsing a numeric sequence into one descriptor

use std::fmt;
use std::str::FromStr;

use crate::error::{AnalysisError, Result, NOT_COMPUTABLE};

/// Reducer applied to a frame series (or any sequence of values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarReducer {
    /// Population standard deviation
    Deviation,

    /// (max - min) / max
    DynamicRange,

    /// Fraction of values below half the mean
    LowRatio,

    /// Fraction of values above 1.5 times the mean
    HighRatio,

    /// Shannon entropy in bits of the sum-normalized values
    Entropy,
}

impl ScalarReducer {
    pub const ALL: [ScalarReducer; 5] = [
        ScalarReducer::Deviation,
        ScalarReducer::DynamicRange,
        ScalarReducer::LowRatio,
        ScalarReducer::HighRatio,
        ScalarReducer::Entropy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScalarReducer::Deviation => "deviation",
            ScalarReducer::DynamicRange => "dynamic range",
            ScalarReducer::LowRatio => "low ratio",
            ScalarReducer::HighRatio => "high ratio",
            ScalarReducer::Entropy => "entropy",
        }
    }

    /// Reduce `values` to a single number
    ///
    /// # Errors
    /// `EmptyRange` when `values` is empty. Degenerate denominators report
    /// [`NOT_COMPUTABLE`] instead of failing.
    pub fn reduce(&self, values: &[f64]) -> Result<f64> {
        if values.is_empty() {
            return Err(AnalysisError::EmptyRange);
        }

        Ok(match self {
            ScalarReducer::Deviation => deviation(values),
            ScalarReducer::DynamicRange => dynamic_range(values),
            ScalarReducer::LowRatio => low_ratio(values),
            ScalarReducer::HighRatio => high_ratio(values),
            ScalarReducer::Entropy => entropy(values),
        })
    }
}

impl fmt::Display for ScalarReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScalarReducer {
    type Err = AnalysisError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', " ");
        ScalarReducer::ALL
            .iter()
            .copied()
            .find(|r| r.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| AnalysisError::UnknownReducer(s.to_string()))
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn deviation(values: &[f64]) -> f64 {
    let avg = mean(values);
    let var = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

fn dynamic_range(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);

    if max == 0.0 {
        return NOT_COMPUTABLE;
    }
    (max - min) / max
}

fn low_ratio(values: &[f64]) -> f64 {
    let threshold = mean(values) * 0.5;
    let count = values
        .iter()
        .filter(|&&v| (v - threshold).is_sign_negative())
        .count();
    count as f64 / values.len() as f64
}

fn high_ratio(values: &[f64]) -> f64 {
    let threshold = mean(values) * 1.5;
    let count = values
        .iter()
        .filter(|&&v| (threshold - v).is_sign_negative())
        .count();
    count as f64 / values.len() as f64
}

fn entropy(values: &[f64]) -> f64 {
    if values.iter().any(|&v| v < 0.0) {
        return NOT_COMPUTABLE;
    }
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return NOT_COMPUTABLE;
    }

    -values
        .iter()
        .filter(|&&v| v > 0.0)
        .map(|&v| {
            let p = v / total;
            p * p.log2()
        })
        .sum::<f64>()
}
