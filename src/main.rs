#![warn(rust_2018_idioms)]

use std::collections::BTreeMap;

use clap::Parser;
use tokio::sync::oneshot;

mod cli;
mod logging;

use cli::Cli;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init_logger()?;

    let client = cli.builder().build().await?;

    let vars: BTreeMap<String, String> = client.fetch(&cli.prefixes).await.into_iter().collect();
    tracing::info!("fetched {} keys", vars.len());
    println!("{}", serde_json::to_string_pretty(&vars)?);

    if cli.watch {
        let (stop_tx, stop_rx) = oneshot::channel();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = stop_tx.send(true);
            }
        });
        // changes are never reported, so one watch covers the whole run
        if let Some(prefix) = cli.prefixes.first() {
            let index = client.watch_prefix(prefix, &[], 0, stop_rx).await?;
            tracing::debug!(prefix = %prefix, index, "watch stopped");
        }
    }

    Ok(())
}
