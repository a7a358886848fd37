use crate::error::ReporterError;
use crate::metric::{reduce, DimensionValue, MetricSpec};
use crate::providers::{
    Clock, FetchStatistics, ListRegions, ListResources, MetricsQuery, Notify, Resource,
    ResolveIdentity,
};
use crate::report::{MetricValue, ResourceReport, RollupMessage, UNNAMED_RESOURCE};
use crate::report_kind::ReportDefinition;
use crate::time_window::{month_windows, TimeWindow};
use tracing::{info, warn};

/// Walks regions and resources, reduces every metric over both reporting
/// windows, and publishes the assembled message once. All collaborators are
/// injected so the whole run can be driven from tests.
pub struct RollupReporter {
    clock: Box<dyn Clock>,
    identity: Box<dyn ResolveIdentity>,
    regions: Box<dyn ListRegions>,
    resources: Box<dyn ListResources>,
    statistics: Box<dyn FetchStatistics>,
    notifier: Box<dyn Notify>,
}

impl RollupReporter {
    pub fn new(
        clock: Box<dyn Clock>,
        identity: Box<dyn ResolveIdentity>,
        regions: Box<dyn ListRegions>,
        resources: Box<dyn ListResources>,
        statistics: Box<dyn FetchStatistics>,
        notifier: Box<dyn Notify>,
    ) -> Self {
        RollupReporter {
            clock,
            identity,
            regions,
            resources,
            statistics,
            notifier,
        }
    }

    /// Single pass with no retries: any metric-fetch or publish failure
    /// aborts the run before anything is sent. Enumeration failures shrink
    /// the scope instead of aborting.
    pub async fn run(
        &self,
        definition: &ReportDefinition,
        topic_arn: &str,
    ) -> Result<String, ReporterError> {
        let identity = self.identity.resolve_identity().await?;
        let windows = month_windows(self.clock.now(), definition.end_mode)?;

        let regions = match self.regions.list_regions().await {
            Ok(regions) => regions,
            Err(error) => {
                warn!(%error, "region listing failed, continuing with no regions");
                Vec::new()
            }
        };

        let mut reports = Vec::new();
        for region in &regions {
            let resources = match self.resources.list_resources(region).await {
                Ok(resources) => resources,
                Err(error) => {
                    warn!(%error, region = region.as_str(), "resource listing failed, skipping region");
                    Vec::new()
                }
            };
            for resource in resources {
                let report = self
                    .build_report(definition, region, resource, &windows.current, &windows.previous)
                    .await?;
                reports.push(report);
            }
        }

        info!(
            report = definition.subject,
            regions = regions.len(),
            resources = reports.len(),
            "report assembled"
        );

        let message = RollupMessage {
            account_id: identity.account_id,
            home_region: identity.region,
            windows,
            reports,
        }
        .render(definition)?;

        self.notifier
            .notify(topic_arn, definition.subject, &message)
            .await?;
        Ok(message)
    }

    async fn build_report(
        &self,
        definition: &ReportDefinition,
        region: &str,
        resource: Resource,
        current: &TimeWindow,
        previous: &TimeWindow,
    ) -> Result<ResourceReport, ReporterError> {
        let mut metrics = Vec::with_capacity(definition.metrics.len());
        for spec in definition.metrics {
            let current_value = self
                .fetch_and_reduce(spec, &resource.id, region, current)
                .await?;
            let previous_value = self
                .fetch_and_reduce(spec, &resource.id, region, previous)
                .await?;
            metrics.push(MetricValue {
                name: spec.name,
                unit: spec.unit,
                current: current_value,
                previous: previous_value,
            });
        }
        Ok(ResourceReport {
            resource_name: resource
                .name
                .unwrap_or_else(|| UNNAMED_RESOURCE.to_string()),
            resource_id: resource.id,
            region: region.to_string(),
            metrics,
        })
    }

    async fn fetch_and_reduce(
        &self,
        spec: &MetricSpec,
        resource_id: &str,
        region: &str,
        window: &TimeWindow,
    ) -> Result<f64, ReporterError> {
        let dimensions = spec
            .dimensions
            .iter()
            .map(|dimension| {
                let value = match dimension.value {
                    DimensionValue::ResourceId => resource_id.to_string(),
                    DimensionValue::Region => region.to_string(),
                    DimensionValue::Fixed(value) => value.to_string(),
                };
                (dimension.name.to_string(), value)
            })
            .collect();
        let query = MetricsQuery {
            region: region.to_string(),
            namespace: spec.namespace.to_string(),
            metric_name: spec.name.to_string(),
            dimensions,
            window: *window,
            statistic: spec.reducer.statistic(),
        };
        let data_points = self.statistics.fetch_statistics(&query).await?;
        reduce(spec.reducer, &data_points)
    }
}
