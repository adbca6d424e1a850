use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[async_trait]
pub trait Job: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    async fn run(&self);
}

/// A background loop running a [`Job`] once per period until stopped.
///
/// The first run happens right after [`PeriodicTask::start`]. Runs never
/// overlap: the next period is only awaited once the current run returns, and
/// periods missed while a run overran collapse into a single run.
pub struct PeriodicTask {
    name: &'static str,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    pub fn start<J>(job: Arc<J>, period: Duration) -> Self
    where
        J: Job + ?Sized,
    {
        let name = job.name();
        let period = period.max(Duration::from_millis(1));
        let (stop, mut stopped) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            tracing::info!(
                job = name,
                period_seconds = period.as_secs(),
                "Periodic task started."
            );
            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = interval.tick() => job.run().await,
                }
            }
            tracing::info!(job = name, "Periodic task stopped.");
        });

        Self { name, stop, handle }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub async fn stop(self) {
        // The receiver is gone only if the loop already exited.
        let _ = self.stop.send(());
        if let Err(e) = self.handle.await {
            tracing::error!(job = self.name, error = %e, "Periodic task ended abnormally.");
        }
    }
}
