//! Subcommand handlers

use std::fs::{self, File};
use std::io;

use anyhow::Context;
use chrono::Local;
use tracing::{error, info};

use crate::config::{AppContext, DEFAULT_MAX_ATTEMPTS, report_path};
use crate::fleet::fetch::DeviceFilter;
use crate::fleet::score::score_fleet;
use crate::fleet::sink::{MultiSink, WriterSink};
use crate::session::{login_with_token, spawn_token_refresh};

/// Score the fleet and print the report to stdout and the report file
pub async fn get(ctx: &AppContext) -> anyhow::Result<()> {
    let started_at = Local::now();

    let api = login_with_token(ctx)?;
    let refresh = spawn_token_refresh(api.clone(), ctx.config_path.clone());

    fs::create_dir_all(&ctx.log_dir)
        .with_context(|| format!("Failed to create log directory {:?}", ctx.log_dir))?;
    let report_path = report_path(&ctx.log_dir, ctx.environment, &started_at);
    let report_file = File::options()
        .create(true)
        .append(true)
        .open(&report_path)
        .with_context(|| format!("Failed to open report file {:?}", report_path))?;
    info!("Writing report to {:?}", report_path);

    let mut sink = MultiSink::new()
        .with_sink(Box::new(WriterSink::new("report file", report_file)))
        .with_sink(Box::new(WriterSink::new("stdout", io::stdout())));

    let filter = DeviceFilter::recently_connected(&started_at);
    let result = score_fleet(api.as_ref(), DEFAULT_MAX_ATTEMPTS, &filter, &mut sink).await;

    // Let the config write finish before the process exits
    if let Err(e) = refresh.await {
        error!("Token refresh task failed: {}", e);
    }

    result?;
    Ok(())
}
