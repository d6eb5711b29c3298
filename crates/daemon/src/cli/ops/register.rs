use clap::Args;

use sealpost_daemon::http_server::api::client::ApiError;
use sealpost_daemon::http_server::api::v0::users::register::RegisterRequest;

#[derive(Args, Debug, Clone)]
pub struct Register;

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("registration failed: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Register {
    type Error = RegisterError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response = ctx.client.call(RegisterRequest::default()).await?;
        Ok(format!("Registered user: {}", response.user_id))
    }
}
