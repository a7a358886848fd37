use crate::error::ReporterError;
use crate::providers::{name_tag, ListResources, Resource};
use async_trait::async_trait;
use rusoto_core::Region;
use rusoto_rds::{DescribeDBInstancesMessage, ListTagsForResourceMessage, Rds, RdsClient};
use std::str::FromStr;
use tracing::warn;

pub struct RdsInstanceClient {
    pinned: Option<RdsClient>,
}

impl RdsInstanceClient {
    pub fn new() -> Self {
        RdsInstanceClient { pinned: None }
    }

    fn new_with_client(client: RdsClient) -> Self {
        RdsInstanceClient {
            pinned: Some(client),
        }
    }

    fn client_for(&self, region: &str) -> Result<RdsClient, ReporterError> {
        match &self.pinned {
            Some(client) => Ok(client.clone()),
            None => {
                let region = Region::from_str(region)
                    .map_err(|_| ReporterError::InvalidRegion(region.to_string()))?;
                Ok(RdsClient::new(region))
            }
        }
    }

    async fn instance_name_tag(&self, client: &RdsClient, arn: &str) -> Option<String> {
        match client
            .list_tags_for_resource(ListTagsForResourceMessage {
                resource_name: arn.to_string(),
                ..Default::default()
            })
            .await
        {
            Ok(tags) => name_tag(tags.tag_list.unwrap_or_default().into_iter().filter_map(
                |tag| match (tag.key, tag.value) {
                    (Some(key), Some(value)) => Some((key, value)),
                    _ => None,
                },
            )),
            Err(error) => {
                warn!(arn, %error, "db instance tags unavailable");
                None
            }
        }
    }
}

#[async_trait]
impl ListResources for RdsInstanceClient {
    async fn list_resources(&self, region: &str) -> Result<Vec<Resource>, ReporterError> {
        let client = self.client_for(region)?;
        let mut resources = Vec::new();
        let mut marker = None;
        loop {
            let result = client
                .describe_db_instances(DescribeDBInstancesMessage {
                    marker,
                    ..Default::default()
                })
                .await
                .map_err(|error| ReporterError::Listing(error.to_string()))?;

            for instance in result.db_instances.unwrap_or_default() {
                let id = instance
                    .db_instance_identifier
                    .ok_or(ReporterError::NoneValue)?;
                let name = match instance.db_instance_arn {
                    Some(arn) => self.instance_name_tag(&client, &arn).await,
                    None => None,
                };
                resources.push(Resource { id, name });
            }

            marker = result.marker;
            if marker.is_none() {
                break;
            }
        }
        Ok(resources)
    }
}

#[cfg(test)]
mod tests {
    use crate::providers::ListResources;
    use crate::rds_instance_client::RdsInstanceClient;
    use rusoto_mock::{
        MockCredentialsProvider, MockRequestDispatcher, MockResponseReader, ReadMockResponse,
    };
    use rusoto_rds::RdsClient;

    #[tokio::test]
    async fn test_empty_listing() {
        let mock = RdsClient::new_with(
            MockRequestDispatcher::default().with_body(&*MockResponseReader::read_response(
                "test_resources/valid",
                "describe_db_instances_empty.xml",
            )),
            MockCredentialsProvider,
            Default::default(),
        );

        let client = RdsInstanceClient::new_with_client(mock);
        let result = client.list_resources("us-east-1").await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_listing_error_is_soft_failable() {
        let mock = RdsClient::new_with(
            MockRequestDispatcher::with_status(403),
            MockCredentialsProvider,
            Default::default(),
        );

        let client = RdsInstanceClient::new_with_client(mock);
        let result = client.list_resources("us-east-1").await;

        assert!(matches!(
            result,
            Err(crate::error::ReporterError::Listing(_))
        ));
    }
}
