//! Background mailer task
//!
//! A single task owns the SMTP transport and drains the queue. A failed
//! send is logged and never takes the task down; the task exits only
//! when every queue sender is dropped.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use clinicd_core::{Mailer, PrescriptionEmail};

/// Bounded queue depth. Senders back off (await) when the mailer falls
/// this far behind.
pub const QUEUE_DEPTH: usize = 32;

/// Create the queue and spawn the mailer task.
pub fn spawn(mailer: Mailer) -> (mpsc::Sender<PrescriptionEmail>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
    let handle = tokio::spawn(run(mailer, rx));
    (tx, handle)
}

async fn run(mailer: Mailer, mut rx: mpsc::Receiver<PrescriptionEmail>) {
    while let Some(email) = rx.recv().await {
        match mailer.send(&email).await {
            Ok(()) => {
                tracing::info!(to = %email.to, "prescription email sent");
            }
            Err(e) => {
                tracing::error!(to = %email.to, error = %e, "prescription email failed");
            }
        }
    }
    tracing::info!("mail queue closed, mailer task exiting");
}
