use crate::scheduler::{Job, PeriodicTask};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Orbit, Rocket};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub struct SchedulerFairing {
    job: Arc<dyn Job>,
    period: Duration,
    task: Mutex<Option<PeriodicTask>>,
}

impl SchedulerFairing {
    pub fn new(job: Arc<dyn Job>, period: Duration) -> Self {
        Self {
            job,
            period,
            task: Mutex::new(None),
        }
    }
}

#[rocket::async_trait]
impl Fairing for SchedulerFairing {
    fn info(&self) -> Info {
        Info {
            name: "Notification Scheduler",
            kind: Kind::Liftoff | Kind::Shutdown,
        }
    }

    async fn on_liftoff(&self, _rocket: &Rocket<Orbit>) {
        let task = PeriodicTask::start(self.job.clone(), self.period);
        match self.task.lock() {
            Ok(mut slot) => *slot = Some(task),
            Err(_) => tracing::error!(job = task.name(), "Scheduler state lock was poisoned."),
        }
    }

    async fn on_shutdown(&self, _rocket: &Rocket<Orbit>) {
        let task = match self.task.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };
        if let Some(task) = task {
            task.stop().await;
        }
    }
}
