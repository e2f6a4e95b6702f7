use anyhow::Result;
use promscope_client::{EnvSession, PrometheusClient, QueryManager, Rbac};
use std::sync::Arc;

/// Lists the metrics visible to the current project and evaluates one
/// query against them. Export OS_PROJECT_ID to scope the results.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let prom = Arc::new(
        PrometheusClient::builder()
            .root_url("http://127.0.0.1:9090")
            .build()?,
    );

    let rbac = Rbac::new(&EnvSession::new());
    if !rbac.is_ready() {
        eprintln!("warning: no project id resolved, results are not scoped");
    }

    let manager = QueryManager::new(prom, rbac);

    println!("metrics:");
    for name in manager.list(false).await? {
        println!("  {name}");
    }

    for sample in manager.query("up", false).await? {
        println!(
            "{} @ {} = {}",
            sample.name().unwrap_or("<unnamed>"),
            sample.timestamp(),
            sample.sample()
        );
    }

    Ok(())
}
