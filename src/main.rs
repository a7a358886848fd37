mod alb_target_group_client;
mod cloud_watch_statistics_client;
mod config;
mod ec2_instance_client;
mod ec2_region_client;
mod error;
mod metric;
mod providers;
mod rds_instance_client;
mod report;
mod report_kind;
mod reporter;
mod s3_bucket_client;
mod ses_account_client;
mod sns_notification_client;
mod sts_identity_client;
mod time_window;
mod waf_acl_client;

use crate::alb_target_group_client::AlbTargetGroupClient;
use crate::cloud_watch_statistics_client::CloudWatchStatisticsClient;
use crate::config::Config;
use crate::ec2_instance_client::Ec2InstanceClient;
use crate::ec2_region_client::Ec2RegionClient;
use crate::providers::{ListResources, SystemClock};
use crate::rds_instance_client::RdsInstanceClient;
use crate::report_kind::ReportKind;
use crate::reporter::RollupReporter;
use crate::s3_bucket_client::S3BucketClient;
use crate::ses_account_client::SesAccountClient;
use crate::sns_notification_client::SnsNotificationClient;
use crate::sts_identity_client::StsIdentityClient;
use crate::waf_acl_client::WafAclClient;

use anyhow::Context;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use rusoto_core::Region;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Deserialize)]
pub struct ReportEvent {}

#[derive(Serialize)]
pub struct ReportHandlerOutput {
    message: String,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        // CloudWatch Logs stamps every line already.
        .without_time()
        .with_target(false)
        .init();

    lambda_runtime::run(service_fn(report_handler)).await?;
    Ok(())
}

async fn report_handler(_event: LambdaEvent<Value>) -> Result<ReportHandlerOutput, Error> {
    let config = Config::from_env().context("loading reporter configuration")?;
    let definition = config.report_kind.definition();

    let reporter = RollupReporter::new(
        Box::new(SystemClock),
        Box::new(StsIdentityClient::new()),
        Box::new(Ec2RegionClient::new()),
        resource_client_for(config.report_kind),
        Box::new(CloudWatchStatisticsClient::new()),
        Box::new(SnsNotificationClient::new()),
    );

    let message = reporter.run(definition, &config.topic_arn).await?;
    Ok(ReportHandlerOutput { message })
}

fn resource_client_for(kind: ReportKind) -> Box<dyn ListResources> {
    match kind {
        ReportKind::S3 => Box::new(S3BucketClient::new()),
        ReportKind::Rds => Box::new(RdsInstanceClient::new()),
        ReportKind::Ec2 => Box::new(Ec2InstanceClient::new()),
        ReportKind::Ses => Box::new(SesAccountClient::new(
            Region::default().name().to_string(),
        )),
        ReportKind::Waf => Box::new(WafAclClient::new()),
        ReportKind::Alb => Box::new(AlbTargetGroupClient::new()),
    }
}
