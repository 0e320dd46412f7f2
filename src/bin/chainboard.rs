//! Terminal front end for the option-chain dashboard.
//!
//! Loads the watch-list, renders one comparison table, and keeps re-rendering
//! while auto-refresh is on. Stop with Ctrl-C.
//!
//! # Usage
//!
//! ```sh
//! export CHAINBOARD_API_URL="http://localhost:8000/api"
//! export CHAINBOARD_SYMBOLS="RELIANCE,TCS,INFY"   # optional
//! export CHAINBOARD_EXPIRY="25-Nov-2025"          # optional
//! export CHAINBOARD_REFRESH_SECS=60               # optional
//! cargo run --bin chainboard --features cli
//! ```

use chainboard::Dashboard;
use chainboard::config::DashboardConfig;
use chainboard::pipeline::DashboardView;

fn print_view(view: &DashboardView) {
    if let Some(table) = &view.table {
        println!("{table}");
    }
    match view.updated_at {
        Some(at) => println!("{} (as of {})", view.status, at.format("%H:%M:%S UTC")),
        None => println!("{}", view.status),
    }
}

#[tokio::main]
async fn main() -> chainboard::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = DashboardConfig::from_env()?;
    let mut dashboard = Dashboard::from_config(&config).await;

    let watch_list = dashboard.load_stocks().await?;
    println!("Watch-list: {}", watch_list.join(", "));
    if let Some(meta) = dashboard.meta() {
        println!("{meta}");
    }
    if !dashboard.expiries().is_empty() {
        println!("Expiries: {}", dashboard.expiries().join(", "));
    }
    // Loading the list resets the filter; re-apply the configured one.
    dashboard.set_expiry(config.expiry.as_deref()).await;

    dashboard.fetch().await;
    print_view(&dashboard.view());

    let Some(secs) = config.refresh_secs else {
        return Ok(());
    };
    if let Some(period) = dashboard.set_auto_refresh(true, secs) {
        println!("Auto-refresh every {}s; Ctrl-C to stop.", period.as_secs());
    }

    let mut views = dashboard.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                if view.status != chainboard::pipeline::Status::Fetching {
                    print_view(&view);
                }
            }
        }
    }

    dashboard.shutdown();
    println!("Done.");
    Ok(())
}
