//! Edge-removal threshold policies

use serde::{Deserialize, Serialize};

/// How the clusterer decides which MST edges to cut.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ThresholdPolicy {
    /// Cut every MST edge longer than `length`.
    Fixed { length: f64 },
    /// Cut edges longer than `mean + k * stddev` of the MST edge lengths,
    /// never above `max_edge_length` when one is given.
    StdDev { k: f64, max_edge_length: Option<f64> },
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        ThresholdPolicy::StdDev {
            k: 1.0,
            max_edge_length: None,
        }
    }
}

impl ThresholdPolicy {
    pub fn fixed(length: f64) -> Self {
        ThresholdPolicy::Fixed { length }
    }

    pub fn std_dev(k: f64) -> Self {
        ThresholdPolicy::StdDev {
            k,
            max_edge_length: None,
        }
    }

    /// Threshold for a tree with the given edge lengths.
    ///
    /// The statistical policy uses the population standard deviation. A tree
    /// without edges yields `0.0` (or the fixed length).
    pub fn resolve(&self, mst_lengths: &[f64]) -> f64 {
        match *self {
            ThresholdPolicy::Fixed { length } => length,
            ThresholdPolicy::StdDev { k, max_edge_length } => {
                if mst_lengths.is_empty() {
                    return 0.0;
                }
                let n = mst_lengths.len() as f64;
                let mean = mst_lengths.iter().sum::<f64>() / n;
                let var = mst_lengths.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / n;
                let stat = mean + k * var.sqrt();
                match max_edge_length {
                    Some(cap) if cap < stat => cap,
                    _ => stat,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fixed() {
        assert_eq!(ThresholdPolicy::fixed(50.0).resolve(&[1.0, 100.0]), 50.0);
    }

    #[test]
    fn test_std_dev() {
        // mean 5, population stddev 2
        let lengths = [3.0, 7.0, 3.0, 7.0];
        assert_relative_eq!(ThresholdPolicy::std_dev(1.5).resolve(&lengths), 8.0);
        assert_relative_eq!(ThresholdPolicy::std_dev(0.0).resolve(&lengths), 5.0);
    }

    #[test]
    fn test_cap_wins_when_stricter() {
        let lengths = [3.0, 7.0, 3.0, 7.0];
        let capped = ThresholdPolicy::StdDev { k: 1.5, max_edge_length: Some(6.0) };
        assert_relative_eq!(capped.resolve(&lengths), 6.0);
        let loose = ThresholdPolicy::StdDev { k: 1.5, max_edge_length: Some(60.0) };
        assert_relative_eq!(loose.resolve(&lengths), 8.0);
    }

    #[test]
    fn test_empty_tree() {
        assert_eq!(ThresholdPolicy::std_dev(2.0).resolve(&[]), 0.0);
    }

    #[test]
    fn test_deserialize_policy() {
        let p: ThresholdPolicy = serde_json::from_str(r#"{"policy":"fixed","length":12.5}"#).unwrap();
        assert_eq!(p, ThresholdPolicy::fixed(12.5));
    }
}
