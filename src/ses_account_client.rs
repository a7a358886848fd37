use crate::error::ReporterError;
use crate::providers::{ListResources, Resource};
use async_trait::async_trait;

/// SES sending statistics are account-level, with no per-resource dimension
/// to enumerate. The report carries a single pseudo-resource, emitted only
/// for the function's home region so the region walk yields exactly one
/// block.
pub struct SesAccountClient {
    home_region: String,
}

impl SesAccountClient {
    pub fn new(home_region: String) -> Self {
        SesAccountClient { home_region }
    }
}

#[async_trait]
impl ListResources for SesAccountClient {
    async fn list_resources(&self, region: &str) -> Result<Vec<Resource>, ReporterError> {
        if region == self.home_region {
            Ok(vec![Resource {
                id: "account".to_string(),
                name: None,
            }])
        } else {
            Ok(Vec::new())
        }
    }
}
