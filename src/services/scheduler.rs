use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, interval};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::SchedulerConfig;
use crate::services::ReminderService;

pub struct Scheduler {
    reminders: Arc<ReminderService>,
    config: SchedulerConfig,
    running: Arc<RwLock<bool>>,
}

impl Scheduler {
    pub fn new(reminders: Arc<ReminderService>, config: SchedulerConfig) -> Self {
        Self {
            reminders,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn start(&self) -> Result<()> {
        if !self.config.enabled {
            info!("Scheduler is disabled in config");
            return Ok(());
        }

        *self.running.write().await = true;
        info!("Starting background scheduler");

        if self.config.log_reminder_cron.is_some() || self.config.deadline_reminder_cron.is_some() {
            self.run_with_cron().await
        } else {
            self.run_with_interval().await
        }
    }

    async fn run_with_cron(&self) -> Result<()> {
        let mut sched = JobScheduler::new().await?;

        let log_cron = self
            .config
            .log_reminder_cron
            .clone()
            .unwrap_or_else(|| "0 0 17 * * Mon-Fri".to_string());
        let deadline_cron = self
            .config
            .deadline_reminder_cron
            .clone()
            .unwrap_or_else(|| "0 0 9 * * *".to_string());
        let window_days = self.config.deadline_window_days.max(1);

        let reminders_for_logs = Arc::clone(&self.reminders);
        let running_for_logs = Arc::clone(&self.running);
        let log_job = Job::new_async(log_cron.as_str(), move |_uuid, _lock| {
            let reminders = Arc::clone(&reminders_for_logs);
            let running = Arc::clone(&running_for_logs);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                let start = std::time::Instant::now();
                info!(event = "job_started", job_name = "log_reminders", "Starting scheduled log reminder sweep");

                if let Err(e) = reminders.send_log_reminders().await {
                    error!(event = "job_failed", job_name = "log_reminders", error = %e, "Scheduled log reminder sweep failed");
                }

                info!(
                    event = "job_finished",
                    job_name = "log_reminders",
                    duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "Scheduled log reminder sweep finished"
                );
            })
        })?;

        let reminders_for_deadlines = Arc::clone(&self.reminders);
        let running_for_deadlines = Arc::clone(&self.running);
        let deadline_job = Job::new_async(deadline_cron.as_str(), move |_uuid, _lock| {
            let reminders = Arc::clone(&reminders_for_deadlines);
            let running = Arc::clone(&running_for_deadlines);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                let start = std::time::Instant::now();
                info!(event = "job_started", job_name = "deadline_reminders", "Starting scheduled deadline sweep");

                if let Err(e) = reminders.send_deadline_reminders(window_days).await {
                    error!(event = "job_failed", job_name = "deadline_reminders", error = %e, "Scheduled deadline sweep failed");
                }

                info!(
                    event = "job_finished",
                    job_name = "deadline_reminders",
                    duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "Scheduled deadline sweep finished"
                );
            })
        })?;

        sched.add(log_job).await?;
        sched.add(deadline_job).await?;
        sched.start().await?;

        info!("Log reminders scheduled: {}", log_cron);
        info!("Deadline reminders scheduled: {}", deadline_cron);

        loop {
            if !*self.running.read().await {
                break;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        sched.shutdown().await?;
        Ok(())
    }

    async fn run_with_interval(&self) -> Result<()> {
        let interval_hours = self.config.check_interval_hours.max(1);
        let window_days = self.config.deadline_window_days.max(1);

        info!("Scheduler running: reminder sweep every {}h", interval_hours);

        let mut sweep_interval = interval(Duration::from_secs(u64::from(interval_hours) * 60 * 60));

        loop {
            sweep_interval.tick().await;
            if !*self.running.read().await {
                break;
            }

            let start = std::time::Instant::now();
            info!(event = "job_started", job_name = "reminder_sweep", "Starting scheduled reminder sweep");

            if let Err(e) = self.reminders.send_log_reminders().await {
                error!(event = "job_failed", job_name = "log_reminders", error = %e, "Scheduled log reminder sweep failed");
            }
            if let Err(e) = self.reminders.send_deadline_reminders(window_days).await {
                error!(event = "job_failed", job_name = "deadline_reminders", error = %e, "Scheduled deadline sweep failed");
            }

            info!(
                event = "job_finished",
                job_name = "reminder_sweep",
                duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                "Scheduled reminder sweep finished"
            );
        }

        Ok(())
    }

    pub async fn stop(&self) {
        info!("Stopping scheduler...");
        *self.running.write().await = false;
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    pub async fn run_once(&self) -> Result<()> {
        info!("Running manual reminder sweep...");

        self.reminders.send_log_reminders().await?;
        self.reminders
            .send_deadline_reminders(self.config.deadline_window_days.max(1))
            .await?;

        Ok(())
    }
}
