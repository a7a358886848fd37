use crate::error::ReporterError;
use crate::metric::{render_value, Unit};
use crate::report_kind::{OutputFormat, ReportDefinition};
use crate::time_window::ReportWindows;
use serde_json::{json, Map, Value};
use std::fmt::Write;

pub const UNNAMED_RESOURCE: &str = "Null";

#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    pub name: &'static str,
    pub unit: Unit,
    pub current: f64,
    pub previous: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceReport {
    pub resource_id: String,
    pub resource_name: String,
    pub region: String,
    pub metrics: Vec<MetricValue>,
}

/// The assembled report for one invocation; rendered once and published once,
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RollupMessage {
    pub account_id: String,
    pub home_region: String,
    pub windows: ReportWindows,
    pub reports: Vec<ResourceReport>,
}

impl RollupMessage {
    pub fn render(&self, definition: &ReportDefinition) -> Result<String, ReporterError> {
        match definition.format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => self.render_json(definition.collection_key),
        }
    }

    /// Free-text shape: one `Region:` header per region that produced at
    /// least one report, resources indented beneath it. Regions without
    /// resources are omitted.
    fn render_text(&self) -> String {
        let mut message = String::new();
        for (region, reports) in self.group_by_region() {
            writeln!(message, "Region: {}", region).ok();
            for report in reports {
                writeln!(
                    message,
                    "  - {} (Name: {})",
                    report.resource_id, report.resource_name
                )
                .ok();
                writeln!(
                    message,
                    "    Current Month (End: {}): {}",
                    self.windows.current.end_label(),
                    metric_line(&report.metrics, |metric| (metric.current, metric.unit))
                )
                .ok();
                writeln!(
                    message,
                    "    Previous Month (End: {}): {}",
                    self.windows.previous.end_label(),
                    metric_line(&report.metrics, |metric| (metric.previous, metric.unit))
                )
                .ok();
            }
        }
        message
    }

    fn render_json(&self, collection_key: &str) -> Result<String, ReporterError> {
        let resources: Vec<Value> = self
            .reports
            .iter()
            .map(|report| {
                json!({
                    "Region": report.region,
                    "Id": report.resource_id,
                    "Name": report.resource_name,
                    "Current Month": metric_object(&report.metrics, |metric| {
                        (metric.current, metric.unit)
                    }),
                    "Previous Month": metric_object(&report.metrics, |metric| {
                        (metric.previous, metric.unit)
                    }),
                })
            })
            .collect();

        let mut document = Map::new();
        document.insert("AWS Account ID".to_string(), json!(self.account_id));
        document.insert(
            "Lambda Function Region".to_string(),
            json!(self.home_region),
        );
        document.insert(collection_key.to_string(), Value::Array(resources));

        serde_json::to_string_pretty(&Value::Object(document))
            .map_err(|error| ReporterError::Render(error.to_string()))
    }

    /// Regions in first-seen order, as handed back by the enumerators.
    fn group_by_region(&self) -> Vec<(&str, Vec<&ResourceReport>)> {
        let mut grouped: Vec<(&str, Vec<&ResourceReport>)> = Vec::new();
        for report in &self.reports {
            match grouped
                .iter_mut()
                .find(|(region, _)| *region == report.region)
            {
                Some((_, reports)) => reports.push(report),
                None => grouped.push((&report.region, vec![report])),
            }
        }
        grouped
    }
}

fn metric_line<F>(metrics: &[MetricValue], pick: F) -> String
where
    F: Fn(&MetricValue) -> (f64, Unit),
{
    metrics
        .iter()
        .map(|metric| {
            let (value, unit) = pick(metric);
            format!("{}: {}", metric.name, render_value(value, unit))
        })
        .collect::<Vec<String>>()
        .join(", ")
}

fn metric_object<F>(metrics: &[MetricValue], pick: F) -> Value
where
    F: Fn(&MetricValue) -> (f64, Unit),
{
    let mut object = Map::new();
    for metric in metrics {
        let (value, unit) = pick(metric);
        object.insert(metric.name.to_string(), json!(render_value(value, unit)));
    }
    Value::Object(object)
}
