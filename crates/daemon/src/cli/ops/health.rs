use clap::Args;

use sealpost_daemon::state::AppState;

#[derive(Args, Debug, Clone)]
pub struct Health;

#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("daemon is not healthy\n{0}")]
    Unhealthy(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Health {
    type Error = HealthError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut lines = Vec::new();
        let mut healthy = true;

        lines.push("Config:".to_string());
        match AppState::load(ctx.config_path.clone()) {
            Ok(state) => {
                lines.push(format!("  directory:   {}", state.app_dir.display()));
                lines.push("  config.toml: OK".to_string());
                lines.push("  db.sqlite:   OK".to_string());
                lines.push(format!("  api_port:    {}", state.config.api_port));
            }
            Err(e) => {
                lines.push(format!("  error: {}", e));
            }
        }

        let base = ctx.client.base_url();
        let client = ctx.client.http_client();

        lines.push(String::new());
        lines.push(format!("Daemon ({}):", base));

        for probe in ["livez", "readyz"] {
            let url = format!("{}/_status/{}", base.as_str().trim_end_matches('/'), probe);
            let line = match client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => format!("  {}: OK", probe),
                Ok(resp) => {
                    healthy = false;
                    format!("  {}: UNHEALTHY ({})", probe, resp.status())
                }
                Err(_) => {
                    healthy = false;
                    format!("  {}: NOT REACHABLE", probe)
                }
            };
            lines.push(line);
        }

        let report = lines.join("\n");
        if !healthy {
            return Err(HealthError::Unhealthy(report));
        }
        Ok(report)
    }
}
