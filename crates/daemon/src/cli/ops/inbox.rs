use clap::Args;

use common::prelude::UserId;
use sealpost_daemon::http_server::api::client::ApiError;
use sealpost_daemon::http_server::api::v0::messages::InboxRequest;

#[derive(Args, Debug, Clone)]
pub struct Inbox {
    /// Read the inbox of this user
    #[arg(long = "as")]
    pub caller: UserId,
}

#[derive(Debug, thiserror::Error)]
pub enum InboxError {
    #[error("reading inbox failed: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Inbox {
    type Error = InboxError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response = ctx
            .client
            .call(InboxRequest {
                caller: Some(self.caller),
            })
            .await?;

        if response.messages.is_empty() && response.failed.is_empty() {
            return Ok("Inbox is empty".to_string());
        }

        let mut lines = Vec::with_capacity(response.messages.len() + 1);
        for message in &response.messages {
            let sender = message
                .sender_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "anonymous".to_string());
            lines.push(format!(
                "[{}] {} from {}: {}",
                message.created_at, message.message_id, sender, message.content
            ));
        }
        for failure in &response.failed {
            lines.push(format!(
                "{} could not be opened ({:?})",
                failure.message_id, failure.kind
            ));
        }

        Ok(lines.join("\n"))
    }
}
