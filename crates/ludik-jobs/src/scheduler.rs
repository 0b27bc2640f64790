//! Daily schedule for the batch jobs.
//!
//! One tick per day at a configured UTC time: the directory sync runs to
//! completion first, then the expiry sweep. A failed job is logged and the
//! scheduler waits for the next tick; it never crashes the process.

use crate::directory_sync::DirectorySyncJob;
use crate::launcher::JobLauncher;
use crate::status::JobKind;
use crate::subscription_expiry::{SubscriptionExpiryJob, SubscriptionStore};
use chrono::{DateTime, Duration as ChronoDuration, Timelike, Utc};
use ludik_sync::AssociationStore;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info};

/// A time of day, UTC, parsed from `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleTime {
    pub hour: u32,
    pub minute: u32,
}

impl ScheduleTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// The next instant at this time of day, strictly after `now`.
    pub fn next_occurrence(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now
            .with_hour(self.hour)
            .and_then(|t| t.with_minute(self.minute))
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(now);

        if today > now {
            today
        } else {
            today + ChronoDuration::days(1)
        }
    }
}

impl FromStr for ScheduleTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| format!("Invalid schedule time: {s}"))?;
        let hour: u32 = h.parse().map_err(|_| format!("Invalid hour in: {s}"))?;
        let minute: u32 = m.parse().map_err(|_| format!("Invalid minute in: {s}"))?;
        Self::new(hour, minute).ok_or_else(|| format!("Schedule time out of range: {s}"))
    }
}

pub struct JobScheduler<A, S> {
    launcher: JobLauncher,
    sync_job: Arc<DirectorySyncJob<A>>,
    expiry_job: Arc<SubscriptionExpiryJob<S>>,
    at: ScheduleTime,
}

impl<A, S> JobScheduler<A, S>
where
    A: AssociationStore + 'static,
    S: SubscriptionStore + 'static,
{
    pub fn new(
        launcher: JobLauncher,
        sync_job: Arc<DirectorySyncJob<A>>,
        expiry_job: Arc<SubscriptionExpiryJob<S>>,
        at: ScheduleTime,
    ) -> Self {
        Self {
            launcher,
            sync_job,
            expiry_job,
            at,
        }
    }

    /// Run forever, ticking once a day at the configured time.
    pub async fn run(&self) {
        loop {
            let now = Utc::now();
            let next = self.at.next_occurrence(now);
            let wait = (next - now).to_std().unwrap_or_default();
            info!(next = %next, "Waiting for next scheduled run");
            tokio::time::sleep(wait).await;

            self.run_once().await;
        }
    }

    /// One tick: directory sync to completion, then the expiry sweep.
    pub async fn run_once(&self) {
        let sync_job = self.sync_job.clone();
        match self
            .launcher
            .try_launch(JobKind::DirectorySync, async move { sync_job.run().await })
            .await
        {
            Ok(handle) => {
                if let Err(e) = handle.wait().await {
                    error!(error = %e, "Scheduled directory sync failed");
                }
            }
            Err(e) => error!(error = %e, "Could not launch directory sync"),
        }

        let expiry_job = self.expiry_job.clone();
        match self
            .launcher
            .try_launch(JobKind::SubscriptionExpiry, async move {
                expiry_job.run().await
            })
            .await
        {
            Ok(handle) => {
                if let Err(e) = handle.wait().await {
                    error!(error = %e, "Scheduled expiry sweep failed");
                }
            }
            Err(e) => error!(error = %e, "Could not launch expiry sweep"),
        }
    }
}
