//! split_ledger - group expense balance report
//!
//! Loads a ledger snapshot, recomputes every group's balances and settlement
//! and prints the result as JSON on stdout. Logs go to stderr.

use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use split_ledger::config::{Config, LogFormat};
use split_ledger::handlers::{
    GroupBalanceReport, GroupBalancesHandler, UserBalanceReport, UserBalancesHandler,
};
use split_ledger::store::{InMemoryStore, LedgerSnapshot, LedgerStore};

/// Everything the binary prints
#[derive(Debug, Serialize)]
struct LedgerReport {
    groups: Vec<GroupBalanceReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    users: Vec<UserBalanceReport>,
}

/// Initialize tracing/logging
fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "split_ledger=info".into());

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn build_report(store: &InMemoryStore, config: &Config) -> anyhow::Result<LedgerReport> {
    let group_ids: Vec<_> = match config.report_group_id {
        Some(group_id) => vec![group_id],
        None => store.groups().into_iter().map(|group| group.id).collect(),
    };

    let group_handler = GroupBalancesHandler::new(store);
    let mut groups = Vec::with_capacity(group_ids.len());
    for group_id in group_ids {
        let report = group_handler.execute(group_id)?;
        if !report.unsettled.is_zero() || !report.rounding_residual.is_zero() {
            tracing::warn!(
                %group_id,
                unsettled = %report.unsettled,
                residual = %report.rounding_residual,
                "Group ledger does not close"
            );
        }
        groups.push(report);
    }

    // Cross-group summaries only make sense for the full report.
    let mut users = Vec::new();
    if config.report_group_id.is_none() {
        let user_handler = UserBalancesHandler::new(store);
        for user in store.users() {
            users.push(user_handler.execute(user.id)?);
        }
    }

    Ok(LedgerReport { groups, users })
}

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.log_format);

    tracing::info!(
        environment = %config.environment,
        snapshot = %config.snapshot_path.display(),
        "Starting split_ledger report"
    );

    let snapshot = LedgerSnapshot::from_path(&config.snapshot_path)?;
    let store = InMemoryStore::from_snapshot(snapshot)?;

    let report = build_report(&store, &config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &report)?;
    std::io::Write::write_all(&mut out, b"\n")?;

    tracing::info!(
        groups = report.groups.len(),
        users = report.users.len(),
        "Report written"
    );

    Ok(())
}
