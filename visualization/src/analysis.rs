//! Value statistics for parameter traces

use serde::Serialize;

/// Fraction of the data span added on each side of a parameter axis
pub const AXIS_MARGIN: f64 = 0.05;

/// Summary of one parameter's values in the selected hole
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterStats {
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl ParameterStats {
    pub fn from_values(values: &[Option<f64>]) -> Self {
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let count = present.len();
        let mean = if count == 0 {
            None
        } else {
            Some(present.iter().sum::<f64>() / count as f64)
        };

        Self {
            count,
            missing: values.len() - count,
            min: present.iter().copied().reduce(f64::min),
            max: present.iter().copied().reduce(f64::max),
            mean,
        }
    }

    /// X-axis limits: the data span with a 5% margin per side
    ///
    /// No data gives `[0, 1]`; a constant value is widened by 0.5 each way.
    pub fn axis_range(&self) -> (f64, f64) {
        match (self.min, self.max) {
            (Some(min), Some(max)) if max > min => {
                let pad = (max - min) * AXIS_MARGIN;
                (min - pad, max + pad)
            }
            (Some(v), Some(_)) => (v - 0.5, v + 0.5),
            _ => (0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_skip_missing() {
        let stats = ParameterStats::from_values(&[Some(1.0), None, Some(3.0), None]);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.missing, 2);
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(3.0));
        assert_eq!(stats.mean, Some(2.0));
    }

    #[test]
    fn test_axis_range_padding() {
        let stats = ParameterStats::from_values(&[Some(0.0), Some(10.0)]);
        assert_eq!(stats.axis_range(), (-0.5, 10.5));
    }

    #[test]
    fn test_axis_range_degenerate() {
        let constant = ParameterStats::from_values(&[Some(2.0), Some(2.0)]);
        assert_eq!(constant.axis_range(), (1.5, 2.5));

        let empty = ParameterStats::from_values(&[None, None]);
        assert_eq!(empty.axis_range(), (0.0, 1.0));
        assert_eq!(empty.mean, None);
    }
}
