use clap::Args;

use common::build_info;

#[derive(Args, Debug, Clone)]
pub struct Version {
    /// Also ask the running daemon which version it was built from
    #[arg(long)]
    pub daemon: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    #[error("failed to query daemon version: {0}")]
    Daemon(#[from] reqwest::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Version {
    type Error = VersionError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let local = build_info!().to_string();
        if !self.daemon {
            return Ok(local);
        }

        let url = format!(
            "{}/_status/version",
            ctx.client.base_url().as_str().trim_end_matches('/')
        );
        let remote: serde_json::Value = ctx
            .client
            .http_client()
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let remote_version = remote
            .get("version")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");

        Ok(format!("{}\ndaemon:    {}", local, remote_version))
    }
}
