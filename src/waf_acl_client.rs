use crate::error::ReporterError;
use crate::providers::{name_tag, ListResources, Resource};
use async_trait::async_trait;
use rusoto_core::Region;
use rusoto_wafv2::{ListTagsForResourceRequest, ListWebACLsRequest, Wafv2, Wafv2Client};
use std::str::FromStr;
use tracing::warn;

const REGIONAL_SCOPE: &str = "REGIONAL";

/// Regional Web ACLs only; CLOUDFRONT-scoped ACLs live outside the per-region
/// walk and are not reported.
pub struct WafAclClient {
    pinned: Option<Wafv2Client>,
}

impl WafAclClient {
    pub fn new() -> Self {
        WafAclClient { pinned: None }
    }

    fn new_with_client(client: Wafv2Client) -> Self {
        WafAclClient {
            pinned: Some(client),
        }
    }

    fn client_for(&self, region: &str) -> Result<Wafv2Client, ReporterError> {
        match &self.pinned {
            Some(client) => Ok(client.clone()),
            None => {
                let region = Region::from_str(region)
                    .map_err(|_| ReporterError::InvalidRegion(region.to_string()))?;
                Ok(Wafv2Client::new(region))
            }
        }
    }

    async fn acl_name_tag(&self, client: &Wafv2Client, arn: &str) -> Option<String> {
        match client
            .list_tags_for_resource(ListTagsForResourceRequest {
                resource_arn: arn.to_string(),
                ..Default::default()
            })
            .await
        {
            Ok(response) => {
                let tags = response
                    .tag_info_for_resource
                    .and_then(|info| info.tag_list)
                    .unwrap_or_default();
                name_tag(tags.into_iter().map(|tag| (tag.key, tag.value)))
            }
            Err(error) => {
                warn!(arn, %error, "web acl tags unavailable");
                None
            }
        }
    }
}

#[async_trait]
impl ListResources for WafAclClient {
    async fn list_resources(&self, region: &str) -> Result<Vec<Resource>, ReporterError> {
        let client = self.client_for(region)?;
        let result = client
            .list_web_ac_ls(ListWebACLsRequest {
                scope: REGIONAL_SCOPE.to_string(),
                limit: Some(100),
                ..Default::default()
            })
            .await
            .map_err(|error| ReporterError::Listing(error.to_string()))?;

        let mut resources = Vec::new();
        for acl in result.web_ac_ls.unwrap_or_default() {
            // The WebACL metric dimension takes the ACL name.
            let id = acl.name.ok_or(ReporterError::NoneValue)?;
            let name = match acl.arn {
                Some(arn) => self.acl_name_tag(&client, &arn).await,
                None => None,
            };
            resources.push(Resource { id, name });
        }
        Ok(resources)
    }
}
