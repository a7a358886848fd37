use crate::error::ReporterError;
use crate::metric::Datapoint;
use crate::providers::{FetchStatistics, MetricsQuery};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusoto_cloudwatch::{CloudWatch, CloudWatchClient, Dimension, GetMetricStatisticsInput};
use rusoto_core::Region;
use std::str::FromStr;

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// CloudWatch-backed statistics source. Metrics live in the region of the
/// resource they describe, so a client is built per queried region; tests pin
/// a single mock client instead.
pub struct CloudWatchStatisticsClient {
    pinned: Option<CloudWatchClient>,
}

impl CloudWatchStatisticsClient {
    pub fn new() -> Self {
        CloudWatchStatisticsClient { pinned: None }
    }

    fn new_with_client(client: CloudWatchClient) -> Self {
        CloudWatchStatisticsClient {
            pinned: Some(client),
        }
    }

    fn client_for(&self, region: &str) -> Result<CloudWatchClient, ReporterError> {
        match &self.pinned {
            Some(client) => Ok(client.clone()),
            None => {
                let region = Region::from_str(region)
                    .map_err(|_| ReporterError::InvalidRegion(region.to_string()))?;
                Ok(CloudWatchClient::new(region))
            }
        }
    }
}

#[async_trait]
impl FetchStatistics for CloudWatchStatisticsClient {
    async fn fetch_statistics(
        &self,
        query: &MetricsQuery,
    ) -> Result<Vec<Datapoint>, ReporterError> {
        let client = self.client_for(&query.region)?;
        let output = client
            .get_metric_statistics(GetMetricStatisticsInput {
                start_time: query.window.start.format(TIME_FORMAT).to_string(),
                end_time: query.window.end.format(TIME_FORMAT).to_string(),
                metric_name: query.metric_name.clone(),
                namespace: query.namespace.clone(),
                period: query.window.period_seconds(),
                dimensions: Some(
                    query
                        .dimensions
                        .iter()
                        .map(|(name, value)| Dimension {
                            name: name.clone(),
                            value: value.clone(),
                        })
                        .collect(),
                ),
                statistics: Some(vec![query.statistic.to_string()]),
                ..Default::default()
            })
            .await?;

        let mut data_points = Vec::new();
        for data_point in output.datapoints.unwrap_or_default() {
            let value = match query.statistic {
                "Sum" => data_point.sum,
                "Average" => data_point.average,
                _ => None,
            }
            .ok_or(ReporterError::NoneValue)?;
            let timestamp = data_point
                .timestamp
                .as_deref()
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                .map(|parsed| parsed.with_timezone(&Utc));
            data_points.push(Datapoint { timestamp, value });
        }
        Ok(data_points)
    }
}
