use crate::error::ReporterError;
use crate::providers::ListRegions;
use async_trait::async_trait;
use rusoto_ec2::{DescribeRegionsRequest, Ec2, Ec2Client};

/// Enumerates the regions enabled for the account via EC2 DescribeRegions.
/// The order is whatever the API hands back; nothing downstream depends on it.
pub struct Ec2RegionClient {
    client: Ec2Client,
}

impl Ec2RegionClient {
    pub fn new() -> Self {
        Ec2RegionClient {
            client: Ec2Client::new(Default::default()),
        }
    }

    fn new_with_client(client: Ec2Client) -> Self {
        Ec2RegionClient { client }
    }
}

#[async_trait]
impl ListRegions for Ec2RegionClient {
    async fn list_regions(&self) -> Result<Vec<String>, ReporterError> {
        let result = self
            .client
            .describe_regions(DescribeRegionsRequest::default())
            .await
            .map_err(|error| ReporterError::Listing(error.to_string()))?;

        let mut regions = Vec::new();
        for region in result.regions.unwrap_or_default() {
            regions.push(region.region_name.ok_or(ReporterError::NoneValue)?);
        }
        Ok(regions)
    }
}

#[cfg(test)]
mod tests {
    use crate::ec2_region_client::Ec2RegionClient;
    use crate::providers::ListRegions;
    use rusoto_ec2::Ec2Client;
    use rusoto_mock::{
        MockCredentialsProvider, MockRequestDispatcher, MockResponseReader, ReadMockResponse,
    };

    #[tokio::test]
    async fn test_list_regions() {
        let mock = Ec2Client::new_with(
            MockRequestDispatcher::default().with_body(&*MockResponseReader::read_response(
                "test_resources/valid",
                "describe_regions.xml",
            )),
            MockCredentialsProvider,
            Default::default(),
        );

        let client = Ec2RegionClient::new_with_client(mock);
        let regions = client.list_regions().await.unwrap();

        assert_eq!(regions, vec!["us-east-1", "eu-west-1"]);
    }

    #[tokio::test]
    async fn test_list_regions_error_is_soft_failable() {
        let mock = Ec2Client::new_with(
            MockRequestDispatcher::with_status(403),
            MockCredentialsProvider,
            Default::default(),
        );

        let client = Ec2RegionClient::new_with_client(mock);
        let result = client.list_regions().await;

        assert!(matches!(
            result,
            Err(crate::error::ReporterError::Listing(_))
        ));
    }
}
