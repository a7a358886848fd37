use crate::error::ReporterError;
use bigdecimal::{BigDecimal, FromPrimitive, ToPrimitive};
use chrono::{DateTime, Utc};
use std::ops::{Add, Div};

const BYTES_PER_GIB: f64 = 1_073_741_824.0;

/// Aggregation applied across all datapoints in a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reducer {
    Sum,
    Average,
}

impl Reducer {
    pub fn statistic(&self) -> &'static str {
        match self {
            Reducer::Sum => "Sum",
            Reducer::Average => "Average",
        }
    }
}

/// Display unit, applied when rendering only; reduction always works on the
/// raw CloudWatch values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Unit {
    Raw,
    Percent,
    Gigabytes,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DimensionValue {
    /// Substituted with the monitored resource's identifier.
    ResourceId,
    /// Substituted with the region currently being walked.
    Region,
    Fixed(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionSpec {
    pub name: &'static str,
    pub value: DimensionValue,
}

/// One metric to fetch and reduce per resource, fixed per report kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSpec {
    pub name: &'static str,
    pub namespace: &'static str,
    pub reducer: Reducer,
    pub unit: Unit,
    pub dimensions: &'static [DimensionSpec],
}

/// A single timestamped value as returned by the metrics backend; `value`
/// carries the statistic field the query asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct Datapoint {
    pub timestamp: Option<DateTime<Utc>>,
    pub value: f64,
}

/// Collapses a window's datapoints to one scalar. An empty list reduces to
/// zero for both reducers. The average is the mean of the per-period
/// averages, not weighted by sample counts.
pub fn reduce(reducer: Reducer, data_points: &[Datapoint]) -> Result<f64, ReporterError> {
    if data_points.is_empty() {
        return Ok(0.0);
    }
    match reducer {
        Reducer::Sum => Ok(data_points.iter().map(|point| point.value).sum()),
        Reducer::Average => {
            let mut total = BigDecimal::from(0);
            let length = u32::try_from(data_points.len())?;
            let count = BigDecimal::from(length);
            for data_point in data_points {
                let value = BigDecimal::from_f64(data_point.value)
                    .map_or(BigDecimal::from(0), |value| value);
                total = total.add(value);
            }
            total.div(count).to_f64().ok_or(ReporterError::ToPrimitive)
        }
    }
}

/// Formats a reduced scalar for display. Bytes are converted to GB here, with
/// two decimal places; counts render without a fractional part when whole.
pub fn render_value(value: f64, unit: Unit) -> String {
    match unit {
        Unit::Raw => {
            if value.fract() == 0.0 {
                format!("{:.0}", value)
            } else {
                format!("{:.2}", value)
            }
        }
        Unit::Percent => format!("{:.2} %", value),
        Unit::Gigabytes => format!("{:.2} GB", value / BYTES_PER_GIB),
    }
}

#[cfg(test)]
mod tests {
    use crate::metric::{reduce, render_value, Datapoint, Reducer, Unit};

    fn points(values: &[f64]) -> Vec<Datapoint> {
        values
            .iter()
            .map(|value| Datapoint {
                timestamp: None,
                value: *value,
            })
            .collect()
    }

    #[test]
    fn test_reduce_empty_is_zero() {
        assert_eq!(reduce(Reducer::Sum, &[]).unwrap(), 0.0);
        assert_eq!(reduce(Reducer::Average, &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_reduce_sum() {
        assert_eq!(reduce(Reducer::Sum, &points(&[12.0, 8.5, 21.5])).unwrap(), 42.0);
    }

    #[test]
    fn test_reduce_sum_is_order_independent() {
        let forward = reduce(Reducer::Sum, &points(&[1.0, 2.0, 3.0])).unwrap();
        let backward = reduce(Reducer::Sum, &points(&[3.0, 2.0, 1.0])).unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_reduce_average_is_mean_of_period_averages() {
        // Each datapoint may cover a different number of underlying samples;
        // the reduction still takes the plain mean of the period averages.
        assert_eq!(
            reduce(Reducer::Average, &points(&[10.0, 20.0, 30.0])).unwrap(),
            20.0
        );
    }

    #[test]
    fn test_reduce_average_fractional() {
        assert_eq!(
            reduce(Reducer::Average, &points(&[55.5, 28.8, 40.2, 51.3])).unwrap(),
            43.95
        );
    }

    #[test]
    fn test_render_gigabytes() {
        assert_eq!(render_value(1_073_741_824.0, Unit::Gigabytes), "1.00 GB");
        assert_eq!(render_value(536_870_912.0, Unit::Gigabytes), "0.50 GB");
    }

    #[test]
    fn test_render_percent() {
        assert_eq!(render_value(43.951, Unit::Percent), "43.95 %");
    }

    #[test]
    fn test_render_raw() {
        assert_eq!(render_value(42.0, Unit::Raw), "42");
        assert_eq!(render_value(42.25, Unit::Raw), "42.25");
    }
}
