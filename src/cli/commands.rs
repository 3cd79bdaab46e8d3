use std::sync::Arc;

use tracing::{error, info, warn};

use crate::app::{AppContext, Result};
use crate::bot::{run_polling, CommandHandler};
use crate::config::Config;
use crate::notifier::{Dispatcher, TelegramClient};
use crate::scheduler::{Scheduler, SchedulerConfig};
use crate::server;

/// Run the full service until Ctrl-C or SIGTERM.
pub async fn run(config: Config, interval: Option<&str>, no_initial_check: bool) -> Result<()> {
    config.validate_for_bot()?;

    let mut scheduler_config = SchedulerConfig::from_config(&config)?;
    if let Some(interval) = interval {
        scheduler_config.interval_secs = SchedulerConfig::parse_interval(interval)?;
    }
    scheduler_config.check_on_start = !no_initial_check;

    let ctx = Arc::new(AppContext::new(&config)?);
    let telegram = Arc::new(TelegramClient::new(&config.bot_token)?);

    match telegram.get_me().await {
        Ok(me) => info!(
            "Authorized as @{}",
            me.username.as_deref().unwrap_or("unknown")
        ),
        Err(e) => warn!("Could not verify bot token: {}", e),
    }

    info!(
        "Watching {} (first check time {}, timeout {}s)",
        ctx.source_url, config.first_check_time, config.http_timeout
    );

    let server_ctx = ctx.clone();
    let port = config.web_server_port;
    let server_task = tokio::spawn(async move {
        if let Err(e) = server::serve(server_ctx, port).await {
            error!("Keepalive server stopped: {}", e);
        }
    });

    let dispatcher = Dispatcher::new(telegram.clone(), ctx.registry.clone());
    let (scheduler, scheduler_task) =
        Scheduler::new(ctx.clone(), dispatcher, scheduler_config).spawn();

    let handler = CommandHandler::new(ctx.clone(), port);
    let polling_task = tokio::spawn(run_polling(telegram, handler));

    shutdown_signal().await;
    info!("Shutting down...");

    scheduler.shutdown().await;
    if let Err(e) = scheduler_task.await {
        error!("Scheduler task failed: {}", e);
    }
    polling_task.abort();
    server_task.abort();

    Ok(())
}

/// One fetch → extract → filter pass, printed to stdout.
pub async fn check(config: &Config, all: bool) -> Result<()> {
    let ctx = AppContext::new(config)?;

    let events = if all {
        ctx.fetch_events().await?
    } else {
        ctx.check_today().await
    };

    if events.is_empty() {
        println!("No events found");
        return Ok(());
    }

    for event in events {
        println!("{}  {}  {}", event.date, event.time, event.title);
    }
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = tokio::signal::ctrl_c() => {},
                }
            }
            Err(e) => {
                warn!("Failed to set up SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
