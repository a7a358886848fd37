use crate::error::ReporterError;
use crate::providers::{name_tag, ListResources, Resource};
use async_trait::async_trait;
use rusoto_s3::{GetBucketLocationRequest, GetBucketTaggingRequest, S3Client, S3};
use tracing::warn;

/// Buckets are listed account-wide, then narrowed to the requested region via
/// GetBucketLocation. An empty location constraint means us-east-1.
pub struct S3BucketClient {
    client: S3Client,
}

impl S3BucketClient {
    pub fn new() -> Self {
        S3BucketClient {
            client: S3Client::new(Default::default()),
        }
    }

    fn new_with_client(client: S3Client) -> Self {
        S3BucketClient { client }
    }

    async fn bucket_region(&self, bucket: &str) -> Result<String, ReporterError> {
        let location = self
            .client
            .get_bucket_location(GetBucketLocationRequest {
                bucket: bucket.to_string(),
                ..Default::default()
            })
            .await
            .map_err(|error| ReporterError::Listing(error.to_string()))?;
        Ok(match location.location_constraint.as_deref() {
            None | Some("") => "us-east-1".to_string(),
            Some(region) => region.to_string(),
        })
    }

    /// GetBucketTagging returns NoSuchTagSet for untagged buckets; that is an
    /// unnamed bucket, not a failure.
    async fn bucket_name_tag(&self, bucket: &str) -> Option<String> {
        match self
            .client
            .get_bucket_tagging(GetBucketTaggingRequest {
                bucket: bucket.to_string(),
                ..Default::default()
            })
            .await
        {
            Ok(tagging) => name_tag(tagging.tag_set.into_iter().map(|tag| (tag.key, tag.value))),
            Err(error) => {
                warn!(bucket, %error, "bucket tagging unavailable");
                None
            }
        }
    }
}

#[async_trait]
impl ListResources for S3BucketClient {
    async fn list_resources(&self, region: &str) -> Result<Vec<Resource>, ReporterError> {
        let listing = self
            .client
            .list_buckets()
            .await
            .map_err(|error| ReporterError::Listing(error.to_string()))?;

        let mut resources = Vec::new();
        for bucket in listing.buckets.unwrap_or_default() {
            let bucket_name = bucket.name.ok_or(ReporterError::NoneValue)?;
            if self.bucket_region(&bucket_name).await? != region {
                continue;
            }
            let name = self.bucket_name_tag(&bucket_name).await;
            resources.push(Resource {
                id: bucket_name,
                name,
            });
        }
        Ok(resources)
    }
}

#[cfg(test)]
mod tests {
    use crate::providers::ListResources;
    use crate::s3_bucket_client::S3BucketClient;
    use rusoto_mock::{
        MockCredentialsProvider, MockRequestDispatcher, MockResponseReader, ReadMockResponse,
    };
    use rusoto_s3::S3Client;

    #[tokio::test]
    async fn test_list_buckets_error_is_soft_failable() {
        let mock = S3Client::new_with(
            MockRequestDispatcher::with_status(403),
            MockCredentialsProvider,
            Default::default(),
        );

        let client = S3BucketClient::new_with_client(mock);
        let result = client.list_resources("us-east-1").await;

        assert!(matches!(
            result,
            Err(crate::error::ReporterError::Listing(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let mock = S3Client::new_with(
            MockRequestDispatcher::default().with_body(&*MockResponseReader::read_response(
                "test_resources/valid",
                "list_buckets_empty.xml",
            )),
            MockCredentialsProvider,
            Default::default(),
        );

        let client = S3BucketClient::new_with_client(mock);
        let result = client.list_resources("us-east-1").await.unwrap();

        assert!(result.is_empty());
    }
}
