use crate::error::ReporterError;
use crate::providers::Notify;
use async_trait::async_trait;
use rusoto_sns::{PublishInput, Sns, SnsClient};
use tracing::info;

/// Fire-and-forget delivery to an SNS topic; no delivery confirmation is
/// consumed beyond the publish call succeeding.
pub struct SnsNotificationClient {
    client: SnsClient,
}

impl SnsNotificationClient {
    pub fn new() -> Self {
        SnsNotificationClient {
            client: SnsClient::new(Default::default()),
        }
    }

    fn new_with_client(client: SnsClient) -> Self {
        SnsNotificationClient { client }
    }
}

#[async_trait]
impl Notify for SnsNotificationClient {
    async fn notify(
        &self,
        topic_arn: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), ReporterError> {
        let response = self
            .client
            .publish(PublishInput {
                topic_arn: Some(topic_arn.to_string()),
                subject: Some(subject.to_string()),
                message: message.to_string(),
                ..Default::default()
            })
            .await?;
        info!(message_id = ?response.message_id, "report published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::providers::Notify;
    use crate::sns_notification_client::SnsNotificationClient;
    use rusoto_mock::{
        MockCredentialsProvider, MockRequestDispatcher, MockResponseReader, ReadMockResponse,
    };
    use rusoto_sns::SnsClient;

    #[tokio::test]
    async fn test_notify() {
        let mock = SnsClient::new_with(
            MockRequestDispatcher::default().with_body(&*MockResponseReader::read_response(
                "test_resources/valid",
                "publish.xml",
            )),
            MockCredentialsProvider,
            Default::default(),
        );

        let client = SnsNotificationClient::new_with_client(mock);
        let result = client
            .notify(
                "arn:aws:sns:us-east-1:123456789012:reports",
                "EC2 Monthly Usage Report",
                "Region: us-east-1\n",
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_notify_error_propagates() {
        let mock = SnsClient::new_with(
            MockRequestDispatcher::with_status(403),
            MockCredentialsProvider,
            Default::default(),
        );

        let client = SnsNotificationClient::new_with_client(mock);
        let result = client
            .notify(
                "arn:aws:sns:us-east-1:123456789012:reports",
                "EC2 Monthly Usage Report",
                "Region: us-east-1\n",
            )
            .await;

        assert!(result.is_err());
    }
}
