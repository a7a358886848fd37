use crate::error::ReporterError;
use crate::metric::Datapoint;
use crate::time_window::TimeWindow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Account and home-region identity of the running function.
#[derive(Debug, Clone, PartialEq)]
pub struct CallerIdentity {
    pub account_id: String,
    pub region: String,
}

/// A monitored resource as returned by a domain enumerator. `id` is
/// dimension-ready (instance id, bucket name, target group ARN suffix and so
/// on); `name` is the resource's `Name` tag when one exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub id: String,
    pub name: Option<String>,
}

/// One GetMetricStatistics-shaped request with dimensions already resolved
/// for a concrete resource and region.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsQuery {
    pub region: String,
    pub namespace: String,
    pub metric_name: String,
    pub dimensions: Vec<(String, String)>,
    pub window: TimeWindow,
    pub statistic: &'static str,
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[async_trait]
pub trait ResolveIdentity: Send + Sync {
    async fn resolve_identity(&self) -> Result<CallerIdentity, ReporterError>;
}

#[async_trait]
pub trait ListRegions: Send + Sync {
    async fn list_regions(&self) -> Result<Vec<String>, ReporterError>;
}

#[async_trait]
pub trait ListResources: Send + Sync {
    async fn list_resources(&self, region: &str) -> Result<Vec<Resource>, ReporterError>;
}

#[async_trait]
pub trait FetchStatistics: Send + Sync {
    async fn fetch_statistics(
        &self,
        query: &MetricsQuery,
    ) -> Result<Vec<Datapoint>, ReporterError>;
}

#[async_trait]
pub trait Notify: Send + Sync {
    async fn notify(
        &self,
        topic_arn: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), ReporterError>;
}

/// Resolves the `Name` tag from a listed tag set.
pub fn name_tag<I>(tags: I) -> Option<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    tags.into_iter()
        .find(|(key, _)| key == "Name")
        .map(|(_, value)| value)
}
