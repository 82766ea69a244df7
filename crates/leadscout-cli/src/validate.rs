use leadscout_core::AppConfig;
use leadscout_sources::ReachabilityProbe;

/// Probes `url` and prints whether it answered.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built. An unreachable site is
/// a normal outcome, not an error.
pub(crate) async fn run_validate(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let probe = ReachabilityProbe::new(config.validate_timeout_secs, &config.user_agent)
        .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;

    let reachable = probe.validate_reachable(url).await;
    println!(
        "{url}: {}",
        if reachable { "reachable" } else { "unreachable" }
    );
    Ok(())
}
