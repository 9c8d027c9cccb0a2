use axum::async_trait;
use tracing::info;

/// Delivery channel for one-time codes. The flow only needs `send`;
/// whatever relay sits behind it (SMTP, SMS gateway) is wired at startup.
#[async_trait]
pub trait OtpNotifier: Send + Sync {
    async fn send(&self, email: &str, code: &str) -> anyhow::Result<()>;
}

/// Logs the code instead of delivering it. Stands in until a mail relay
/// is configured for the deployment.
#[derive(Clone)]
pub struct LogNotifier;

#[async_trait]
impl OtpNotifier for LogNotifier {
    async fn send(&self, email: &str, code: &str) -> anyhow::Result<()> {
        info!(email = %email, code = %code, "otp issued (log delivery)");
        Ok(())
    }
}
