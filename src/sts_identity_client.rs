use crate::error::ReporterError;
use crate::providers::{CallerIdentity, ResolveIdentity};
use async_trait::async_trait;
use rusoto_core::Region;
use rusoto_sts::{GetCallerIdentityRequest, Sts, StsClient};

pub struct StsIdentityClient {
    client: StsClient,
    region: Region,
}

impl StsIdentityClient {
    pub fn new() -> Self {
        let region = Region::default();
        StsIdentityClient {
            client: StsClient::new(region.clone()),
            region,
        }
    }

    fn new_with_client(client: StsClient, region: Region) -> Self {
        StsIdentityClient { client, region }
    }
}

#[async_trait]
impl ResolveIdentity for StsIdentityClient {
    async fn resolve_identity(&self) -> Result<CallerIdentity, ReporterError> {
        let response = self
            .client
            .get_caller_identity(GetCallerIdentityRequest {})
            .await?;
        Ok(CallerIdentity {
            account_id: response.account.ok_or(ReporterError::NoneValue)?,
            region: self.region.name().to_string(),
        })
    }
}
