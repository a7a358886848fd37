use crate::error::ReporterError;
use crate::metric::{DimensionSpec, DimensionValue, MetricSpec, Reducer, Unit};
use crate::time_window::CurrentWindowEnd;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    S3,
    Rds,
    Ec2,
    Ses,
    Waf,
    Alb,
}

impl ReportKind {
    pub fn definition(&self) -> &'static ReportDefinition {
        &CATALOG[self]
    }
}

impl FromStr for ReportKind {
    type Err = ReporterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "s3" => Ok(ReportKind::S3),
            "rds" => Ok(ReportKind::Rds),
            "ec2" => Ok(ReportKind::Ec2),
            "ses" => Ok(ReportKind::Ses),
            "waf" => Ok(ReportKind::Waf),
            "alb" => Ok(ReportKind::Alb),
            other => Err(ReporterError::UnknownReportKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    /// Structured document; `collection_key` names the per-resource array.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportDefinition {
    pub kind: ReportKind,
    pub subject: &'static str,
    pub collection_key: &'static str,
    pub format: OutputFormat,
    pub end_mode: CurrentWindowEnd,
    pub metrics: &'static [MetricSpec],
}

const S3_METRICS: [MetricSpec; 2] = [
    MetricSpec {
        name: "BucketSizeBytes",
        namespace: "AWS/S3",
        reducer: Reducer::Average,
        unit: Unit::Gigabytes,
        dimensions: &[
            DimensionSpec {
                name: "BucketName",
                value: DimensionValue::ResourceId,
            },
            DimensionSpec {
                name: "StorageType",
                value: DimensionValue::Fixed("StandardStorage"),
            },
        ],
    },
    MetricSpec {
        name: "NumberOfObjects",
        namespace: "AWS/S3",
        reducer: Reducer::Average,
        unit: Unit::Raw,
        dimensions: &[
            DimensionSpec {
                name: "BucketName",
                value: DimensionValue::ResourceId,
            },
            DimensionSpec {
                name: "StorageType",
                value: DimensionValue::Fixed("AllStorageTypes"),
            },
        ],
    },
];

const RDS_METRICS: [MetricSpec; 3] = [
    MetricSpec {
        name: "CPUUtilization",
        namespace: "AWS/RDS",
        reducer: Reducer::Average,
        unit: Unit::Percent,
        dimensions: &[DimensionSpec {
            name: "DBInstanceIdentifier",
            value: DimensionValue::ResourceId,
        }],
    },
    MetricSpec {
        name: "FreeStorageSpace",
        namespace: "AWS/RDS",
        reducer: Reducer::Average,
        unit: Unit::Gigabytes,
        dimensions: &[DimensionSpec {
            name: "DBInstanceIdentifier",
            value: DimensionValue::ResourceId,
        }],
    },
    MetricSpec {
        name: "DatabaseConnections",
        namespace: "AWS/RDS",
        reducer: Reducer::Average,
        unit: Unit::Raw,
        dimensions: &[DimensionSpec {
            name: "DBInstanceIdentifier",
            value: DimensionValue::ResourceId,
        }],
    },
];

const EC2_METRICS: [MetricSpec; 3] = [
    MetricSpec {
        name: "CPUUtilization",
        namespace: "AWS/EC2",
        reducer: Reducer::Average,
        unit: Unit::Percent,
        dimensions: &[DimensionSpec {
            name: "InstanceId",
            value: DimensionValue::ResourceId,
        }],
    },
    MetricSpec {
        name: "NetworkIn",
        namespace: "AWS/EC2",
        reducer: Reducer::Sum,
        unit: Unit::Gigabytes,
        dimensions: &[DimensionSpec {
            name: "InstanceId",
            value: DimensionValue::ResourceId,
        }],
    },
    MetricSpec {
        name: "NetworkOut",
        namespace: "AWS/EC2",
        reducer: Reducer::Sum,
        unit: Unit::Gigabytes,
        dimensions: &[DimensionSpec {
            name: "InstanceId",
            value: DimensionValue::ResourceId,
        }],
    },
];

const SES_METRICS: [MetricSpec; 4] = [
    MetricSpec {
        name: "Send",
        namespace: "AWS/SES",
        reducer: Reducer::Sum,
        unit: Unit::Raw,
        dimensions: &[],
    },
    MetricSpec {
        name: "Delivery",
        namespace: "AWS/SES",
        reducer: Reducer::Sum,
        unit: Unit::Raw,
        dimensions: &[],
    },
    MetricSpec {
        name: "Bounce",
        namespace: "AWS/SES",
        reducer: Reducer::Sum,
        unit: Unit::Raw,
        dimensions: &[],
    },
    MetricSpec {
        name: "Complaint",
        namespace: "AWS/SES",
        reducer: Reducer::Sum,
        unit: Unit::Raw,
        dimensions: &[],
    },
];

const WAF_METRICS: [MetricSpec; 2] = [
    MetricSpec {
        name: "AllowedRequests",
        namespace: "AWS/WAFV2",
        reducer: Reducer::Sum,
        unit: Unit::Raw,
        dimensions: &[
            DimensionSpec {
                name: "WebACL",
                value: DimensionValue::ResourceId,
            },
            DimensionSpec {
                name: "Region",
                value: DimensionValue::Region,
            },
            DimensionSpec {
                name: "Rule",
                value: DimensionValue::Fixed("ALL"),
            },
        ],
    },
    MetricSpec {
        name: "BlockedRequests",
        namespace: "AWS/WAFV2",
        reducer: Reducer::Sum,
        unit: Unit::Raw,
        dimensions: &[
            DimensionSpec {
                name: "WebACL",
                value: DimensionValue::ResourceId,
            },
            DimensionSpec {
                name: "Region",
                value: DimensionValue::Region,
            },
            DimensionSpec {
                name: "Rule",
                value: DimensionValue::Fixed("ALL"),
            },
        ],
    },
];

const ALB_METRICS: [MetricSpec; 3] = [
    MetricSpec {
        name: "RequestCount",
        namespace: "AWS/ApplicationELB",
        reducer: Reducer::Sum,
        unit: Unit::Raw,
        dimensions: &[DimensionSpec {
            name: "TargetGroup",
            value: DimensionValue::ResourceId,
        }],
    },
    MetricSpec {
        name: "TargetResponseTime",
        namespace: "AWS/ApplicationELB",
        reducer: Reducer::Average,
        unit: Unit::Raw,
        dimensions: &[DimensionSpec {
            name: "TargetGroup",
            value: DimensionValue::ResourceId,
        }],
    },
    MetricSpec {
        name: "HTTPCode_Target_5XX_Count",
        namespace: "AWS/ApplicationELB",
        reducer: Reducer::Sum,
        unit: Unit::Raw,
        dimensions: &[DimensionSpec {
            name: "TargetGroup",
            value: DimensionValue::ResourceId,
        }],
    },
];

static CATALOG: Lazy<HashMap<ReportKind, ReportDefinition>> = Lazy::new(|| {
    let mut catalog = HashMap::new();
    catalog.insert(
        ReportKind::S3,
        ReportDefinition {
            kind: ReportKind::S3,
            subject: "S3 Monthly Usage Report",
            collection_key: "S3 Buckets",
            format: OutputFormat::Text,
            end_mode: CurrentWindowEnd::EndOfToday,
            metrics: &S3_METRICS,
        },
    );
    catalog.insert(
        ReportKind::Rds,
        ReportDefinition {
            kind: ReportKind::Rds,
            subject: "RDS Monthly Usage Report",
            collection_key: "RDS Instances",
            format: OutputFormat::Json,
            end_mode: CurrentWindowEnd::Now,
            metrics: &RDS_METRICS,
        },
    );
    catalog.insert(
        ReportKind::Ec2,
        ReportDefinition {
            kind: ReportKind::Ec2,
            subject: "EC2 Monthly Usage Report",
            collection_key: "EC2 Instances",
            format: OutputFormat::Json,
            end_mode: CurrentWindowEnd::Now,
            metrics: &EC2_METRICS,
        },
    );
    catalog.insert(
        ReportKind::Ses,
        ReportDefinition {
            kind: ReportKind::Ses,
            subject: "SES Monthly Sending Report",
            collection_key: "SES Sending",
            format: OutputFormat::Text,
            end_mode: CurrentWindowEnd::Now,
            metrics: &SES_METRICS,
        },
    );
    catalog.insert(
        ReportKind::Waf,
        ReportDefinition {
            kind: ReportKind::Waf,
            subject: "WAF Monthly Request Report",
            collection_key: "Details",
            format: OutputFormat::Json,
            end_mode: CurrentWindowEnd::Now,
            metrics: &WAF_METRICS,
        },
    );
    catalog.insert(
        ReportKind::Alb,
        ReportDefinition {
            kind: ReportKind::Alb,
            subject: "ALB Monthly Traffic Report",
            collection_key: "Target Groups",
            format: OutputFormat::Text,
            end_mode: CurrentWindowEnd::Now,
            metrics: &ALB_METRICS,
        },
    );
    catalog
});

#[cfg(test)]
mod tests {
    use crate::report_kind::{OutputFormat, ReportKind};
    use std::str::FromStr;

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!(ReportKind::from_str("s3").unwrap(), ReportKind::S3);
        assert_eq!(ReportKind::from_str("waf").unwrap(), ReportKind::Waf);
    }

    #[test]
    fn test_parse_unknown_kind() {
        assert!(ReportKind::from_str("dynamodb").is_err());
    }

    #[test]
    fn test_every_kind_has_metrics() {
        for kind in [
            ReportKind::S3,
            ReportKind::Rds,
            ReportKind::Ec2,
            ReportKind::Ses,
            ReportKind::Waf,
            ReportKind::Alb,
        ] {
            assert!(!kind.definition().metrics.is_empty());
        }
    }

    #[test]
    fn test_ec2_renders_as_json() {
        let definition = ReportKind::Ec2.definition();
        assert_eq!(definition.format, OutputFormat::Json);
        assert_eq!(definition.collection_key, "EC2 Instances");
    }
}
