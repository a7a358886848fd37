use crate::error::ReporterError;
use crate::providers::{name_tag, ListResources, Resource};
use async_trait::async_trait;
use rusoto_core::Region;
use rusoto_elbv2::{DescribeTagsInput, DescribeTargetGroupsInput, Elb, ElbClient};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::warn;

// DescribeTags accepts at most 20 ARNs per call.
const TAG_BATCH: usize = 20;

pub struct AlbTargetGroupClient {
    pinned: Option<ElbClient>,
}

impl AlbTargetGroupClient {
    pub fn new() -> Self {
        AlbTargetGroupClient { pinned: None }
    }

    fn new_with_client(client: ElbClient) -> Self {
        AlbTargetGroupClient {
            pinned: Some(client),
        }
    }

    fn client_for(&self, region: &str) -> Result<ElbClient, ReporterError> {
        match &self.pinned {
            Some(client) => Ok(client.clone()),
            None => {
                let region = Region::from_str(region)
                    .map_err(|_| ReporterError::InvalidRegion(region.to_string()))?;
                Ok(ElbClient::new(region))
            }
        }
    }

    async fn name_tags(&self, client: &ElbClient, arns: &[String]) -> HashMap<String, String> {
        let mut names = HashMap::new();
        for batch in arns.chunks(TAG_BATCH) {
            let described = match client
                .describe_tags(DescribeTagsInput {
                    resource_arns: batch.to_vec(),
                })
                .await
            {
                Ok(output) => output,
                Err(error) => {
                    warn!(%error, "target group tags unavailable");
                    continue;
                }
            };
            for description in described.tag_descriptions.unwrap_or_default() {
                let arn = match description.resource_arn {
                    Some(arn) => arn,
                    None => continue,
                };
                let tags = description
                    .tags
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|tag| tag.value.map(|value| (tag.key, value)));
                if let Some(name) = name_tag(tags) {
                    names.insert(arn, name);
                }
            }
        }
        names
    }
}

/// The ARN suffix starting at `targetgroup/` is what the
/// AWS/ApplicationELB TargetGroup dimension expects.
fn dimension_id(arn: &str) -> Option<String> {
    arn.find("targetgroup/").map(|index| arn[index..].to_string())
}

#[async_trait]
impl ListResources for AlbTargetGroupClient {
    async fn list_resources(&self, region: &str) -> Result<Vec<Resource>, ReporterError> {
        let client = self.client_for(region)?;
        let mut target_groups = Vec::new();
        let mut marker = None;
        loop {
            let result = client
                .describe_target_groups(DescribeTargetGroupsInput {
                    marker,
                    ..Default::default()
                })
                .await
                .map_err(|error| ReporterError::Listing(error.to_string()))?;
            target_groups.extend(result.target_groups.unwrap_or_default());
            marker = result.next_marker;
            if marker.is_none() {
                break;
            }
        }

        let arns: Vec<String> = target_groups
            .iter()
            .filter_map(|group| group.target_group_arn.clone())
            .collect();
        let mut names = self.name_tags(&client, &arns).await;

        let mut resources = Vec::new();
        for group in target_groups {
            let arn = group.target_group_arn.ok_or(ReporterError::NoneValue)?;
            let id = dimension_id(&arn).ok_or(ReporterError::NoneValue)?;
            resources.push(Resource {
                id,
                name: names.remove(&arn),
            });
        }
        Ok(resources)
    }
}
