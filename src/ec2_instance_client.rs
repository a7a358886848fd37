use crate::error::ReporterError;
use crate::providers::{name_tag, ListResources, Resource};
use async_trait::async_trait;
use rusoto_core::Region;
use rusoto_ec2::{DescribeInstancesRequest, Ec2, Ec2Client};
use std::str::FromStr;

pub struct Ec2InstanceClient {
    pinned: Option<Ec2Client>,
}

impl Ec2InstanceClient {
    pub fn new() -> Self {
        Ec2InstanceClient { pinned: None }
    }

    fn new_with_client(client: Ec2Client) -> Self {
        Ec2InstanceClient {
            pinned: Some(client),
        }
    }

    fn client_for(&self, region: &str) -> Result<Ec2Client, ReporterError> {
        match &self.pinned {
            Some(client) => Ok(client.clone()),
            None => {
                let region = Region::from_str(region)
                    .map_err(|_| ReporterError::InvalidRegion(region.to_string()))?;
                Ok(Ec2Client::new(region))
            }
        }
    }
}

#[async_trait]
impl ListResources for Ec2InstanceClient {
    async fn list_resources(&self, region: &str) -> Result<Vec<Resource>, ReporterError> {
        let client = self.client_for(region)?;
        let mut resources = Vec::new();
        let mut next_token = None;
        loop {
            let request = DescribeInstancesRequest {
                next_token,
                ..DescribeInstancesRequest::default()
            };
            let result = client
                .describe_instances(request)
                .await
                .map_err(|error| ReporterError::Listing(error.to_string()))?;

            for reservation in result.reservations.unwrap_or_default() {
                for instance in reservation.instances.unwrap_or_default() {
                    let tags = instance.tags.unwrap_or_default().into_iter().filter_map(
                        |tag| match (tag.key, tag.value) {
                            (Some(key), Some(value)) => Some((key, value)),
                            _ => None,
                        },
                    );
                    resources.push(Resource {
                        id: instance.instance_id.ok_or(ReporterError::NoneValue)?,
                        name: name_tag(tags),
                    });
                }
            }

            next_token = result.next_token;
            if next_token.is_none() {
                break;
            }
        }
        Ok(resources)
    }
}

#[cfg(test)]
mod tests {
    use crate::ec2_instance_client::Ec2InstanceClient;
    use crate::providers::{ListResources, Resource};
    use rusoto_ec2::Ec2Client;
    use rusoto_mock::{
        MockCredentialsProvider, MockRequestDispatcher, MockResponseReader, ReadMockResponse,
    };

    #[tokio::test]
    async fn test_list_instances() {
        let mock = Ec2Client::new_with(
            MockRequestDispatcher::default().with_body(&*MockResponseReader::read_response(
                "test_resources/valid",
                "describe_instances.xml",
            )),
            MockCredentialsProvider,
            Default::default(),
        );

        let client = Ec2InstanceClient::new_with_client(mock);
        let result = client.list_resources("us-east-1").await;

        assert_eq!(
            result.unwrap(),
            [Resource {
                id: "i-1234567890abcdef0".to_string(),
                name: Some("web-01".to_string()),
            }]
        );
    }
}
