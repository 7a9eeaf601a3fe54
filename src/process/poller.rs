use crate::process::{ProcessRecord, SnapshotSource};
use log::{debug, error};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// Background acquisition task producing one snapshot per tick.
///
/// Snapshots arrive in the order they were taken. Stopping the poller ends
/// production; whatever the consumer already applied stays valid.
pub struct Poller {
    receiver: mpsc::Receiver<Vec<ProcessRecord>>,
    task: JoinHandle<()>,
}

impl Poller {
    pub fn spawn<S>(source: S, interval: Duration) -> Self
    where
        S: SnapshotSource + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel(1);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut source = source;

            loop {
                ticker.tick().await;

                // The source may block on OS calls
                let taken = tokio::task::spawn_blocking(move || {
                    let snapshot = source.snapshot();
                    (source, snapshot)
                })
                .await;
                let snapshot = match taken {
                    Ok((returned, snapshot)) => {
                        source = returned;
                        snapshot
                    }
                    Err(e) => {
                        error!("snapshot task failed: {e}");
                        break;
                    }
                };

                if sender.send(snapshot).await.is_err() {
                    debug!("snapshot receiver dropped, stopping poller");
                    break;
                }
            }
        });

        Self { receiver, task }
    }

    /// Next snapshot, or `None` once the poller has stopped.
    pub async fn recv(&mut self) -> Option<Vec<ProcessRecord>> {
        self.receiver.recv().await
    }

    pub fn stop(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.task.abort();
    }
}
