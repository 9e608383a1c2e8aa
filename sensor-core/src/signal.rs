use tracing::warn;

/// Resolves on Ctrl-C. If the handler cannot be installed the future never
/// resolves, leaving the client to run until killed.
pub async fn ctrl_c() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(?error, "failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
}
