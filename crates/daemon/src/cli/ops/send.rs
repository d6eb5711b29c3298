use clap::Args;

use common::prelude::UserId;
use sealpost_daemon::http_server::api::client::ApiError;
use sealpost_daemon::http_server::api::v0::messages::SendRequest;

#[derive(Args, Debug, Clone)]
pub struct SendMessage {
    /// Recipient user id
    #[arg(long)]
    pub to: UserId,

    /// Send as this user (anonymous if not set)
    #[arg(long = "as")]
    pub sender: Option<UserId>,

    /// Message content
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SendMessageError {
    #[error("send failed: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for SendMessage {
    type Error = SendMessageError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let request = SendRequest {
            recipient_id: self.to.to_string(),
            content: self.content.clone(),
            sender: self.sender,
        };

        let response = ctx.client.call(request).await?;
        Ok(format!("Sent message: {}", response.message_id))
    }
}
