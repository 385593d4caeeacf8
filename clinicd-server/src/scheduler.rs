//! Daily fetch scheduler
//!
//! One recurring cron job performs an HTTP GET against the user listing
//! and logs the outcome. No retry, no backoff, no run history; the job
//! runs detached from any request context.

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Build and start the scheduler with the single daily fetch job.
///
/// The returned scheduler must be kept alive for the jobs to keep
/// firing.
pub async fn start(cron: &str, fetch_url: String) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(cron, move |_id, _scheduler| {
        let url = fetch_url.clone();
        Box::pin(async move {
            fetch_users(&url).await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!(%cron, "daily fetch scheduled");
    Ok(scheduler)
}

async fn fetch_users(url: &str) {
    tracing::info!(%url, "running daily user fetch");

    match reqwest::get(url).await {
        Ok(response) => {
            let status = response.status();
            match response.text().await {
                Ok(body) => {
                    tracing::info!(%status, bytes = body.len(), "daily fetch completed");
                }
                Err(e) => {
                    tracing::error!(error = %e, "daily fetch: failed to read body");
                }
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "daily fetch failed");
        }
    }
}
