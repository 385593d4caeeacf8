//! clinicd - clinic management REST backend
//!
//! Startup order: environment, tracing, config, database pool,
//! migrations, mailer task, fetch scheduler, HTTP server. The server
//! owns the foreground; everything else runs detached.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use clinicd_core::{Config, Mailer};
use clinicd_server::http::server::{run_server, ServerConfig};
use clinicd_server::{db, mailer, scheduler};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url)
        .await
        .context("failed to connect to database")?;
    db::migrations::run(&pool)
        .await
        .context("failed to run migrations")?;

    let smtp = Mailer::new(&config.mail).context("failed to build SMTP transport")?;
    let (mail_queue, _mailer_task) = mailer::spawn(smtp);

    // Keep the scheduler handle alive for the lifetime of the process.
    let _scheduler = scheduler::start(&config.fetch_cron, config.fetch_url.clone())
        .await
        .map_err(|e| anyhow::anyhow!("failed to start scheduler: {}", e))?;

    let server_config = ServerConfig {
        bind_addr: config.bind_addr,
        cors_permissive: config.cors_permissive,
    };
    run_server(pool, mail_queue, server_config)
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}
