//! `SeaORM` implementation of the `TimeLogService` trait.

use async_trait::async_trait;
use sea_orm::Set;

use crate::db::{NewTimeLog, Store};
use crate::entities::time_logs;
use crate::services::CurrentUser;
use crate::services::time_log_service::{
    LogTimeRequest, TeamMemberLogs, TimeLogError, TimeLogService, total_hours,
};

pub struct SeaOrmTimeLogService {
    store: Store,
}

impl SeaOrmTimeLogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn load(&self, id: i32) -> Result<time_logs::Model, TimeLogError> {
        self.store
            .get_time_log(id)
            .await?
            .ok_or(TimeLogError::NotFound)
    }
}

fn require_owner(caller: &CurrentUser, log: &time_logs::Model) -> Result<(), TimeLogError> {
    if log.user_id == caller.id {
        Ok(())
    } else {
        Err(TimeLogError::Forbidden(
            "Only the owner may modify this log".to_string(),
        ))
    }
}

fn require_unapproved(log: &time_logs::Model) -> Result<(), TimeLogError> {
    if log.is_approved {
        Err(TimeLogError::Immutable)
    } else {
        Ok(())
    }
}

#[async_trait]
impl TimeLogService for SeaOrmTimeLogService {
    async fn log_time(
        &self,
        caller: &CurrentUser,
        req: LogTimeRequest,
    ) -> Result<time_logs::Model, TimeLogError> {
        let hours = total_hours(req.start_time, req.end_time, req.break_minutes)?;

        if self
            .store
            .get_time_log_for_user_on(caller.id, req.date)
            .await?
            .is_some()
        {
            return Err(TimeLogError::Conflict);
        }

        let log = self
            .store
            .create_time_log(NewTimeLog {
                user_id: caller.id,
                date: req.date,
                start_time: req.start_time,
                end_time: req.end_time,
                break_minutes: req.break_minutes,
                total_hours: hours,
                notes: req.notes,
            })
            .await?;

        Ok(log)
    }

    async fn get_log(
        &self,
        caller: &CurrentUser,
        id: i32,
    ) -> Result<time_logs::Model, TimeLogError> {
        let log = self.load(id).await?;
        if log.user_id != caller.id && !caller.role.is_manager_or_admin() {
            return Err(TimeLogError::Forbidden(
                "Not allowed to view this log".to_string(),
            ));
        }
        Ok(log)
    }

    async fn list_my_logs(
        &self,
        caller: &CurrentUser,
    ) -> Result<Vec<time_logs::Model>, TimeLogError> {
        Ok(self.store.list_time_logs_for_user(caller.id).await?)
    }

    async fn list_logs_for_user(
        &self,
        caller: &CurrentUser,
        user_id: i32,
    ) -> Result<Vec<time_logs::Model>, TimeLogError> {
        if user_id != caller.id && !caller.role.is_manager_or_admin() {
            return Err(TimeLogError::Forbidden(
                "Manager or admin role required".to_string(),
            ));
        }
        Ok(self.store.list_time_logs_for_user(user_id).await?)
    }

    async fn update_log(
        &self,
        caller: &CurrentUser,
        id: i32,
        req: LogTimeRequest,
    ) -> Result<time_logs::Model, TimeLogError> {
        let log = self.load(id).await?;
        require_owner(caller, &log)?;
        require_unapproved(&log)?;

        let hours = total_hours(req.start_time, req.end_time, req.break_minutes)?;

        // Moving the log to another day must not collide with an existing one
        if req.date != log.date
            && self
                .store
                .get_time_log_for_user_on(caller.id, req.date)
                .await?
                .is_some()
        {
            return Err(TimeLogError::Conflict);
        }

        let mut active: time_logs::ActiveModel = log.into();
        active.date = Set(req.date);
        active.start_time = Set(req.start_time);
        active.end_time = Set(req.end_time);
        active.break_minutes = Set(req.break_minutes);
        active.total_hours = Set(hours);
        active.notes = Set(req.notes);
        active.updated_at = Set(Some(chrono::Utc::now()));

        Ok(self.store.update_time_log(active).await?)
    }

    async fn delete_log(&self, caller: &CurrentUser, id: i32) -> Result<(), TimeLogError> {
        let log = self.load(id).await?;
        require_owner(caller, &log)?;
        require_unapproved(&log)?;

        self.store.delete_time_log(id).await?;
        Ok(())
    }

    async fn approve_log(
        &self,
        caller: &CurrentUser,
        id: i32,
    ) -> Result<time_logs::Model, TimeLogError> {
        if !caller.role.is_manager_or_admin() {
            return Err(TimeLogError::Forbidden(
                "Manager or admin role required".to_string(),
            ));
        }

        let log = self.load(id).await?;
        if log.is_approved {
            return Ok(log);
        }

        let mut active: time_logs::ActiveModel = log.into();
        active.is_approved = Set(true);
        active.updated_at = Set(Some(chrono::Utc::now()));

        Ok(self.store.update_time_log(active).await?)
    }

    async fn total_hours_in_range(
        &self,
        caller: &CurrentUser,
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    ) -> Result<f64, TimeLogError> {
        if from > to {
            return Err(TimeLogError::Validation(
                "Start date must not be after end date".to_string(),
            ));
        }

        let logs = self.store.list_time_logs_in_range(caller.id, from, to).await?;
        Ok(logs.iter().map(|l| l.total_hours).sum())
    }

    async fn total_hours_for_users_on(
        &self,
        caller: &CurrentUser,
        date: chrono::NaiveDate,
        user_ids: Vec<i32>,
    ) -> Result<f64, TimeLogError> {
        if !caller.role.is_manager_or_admin() {
            return Err(TimeLogError::Forbidden(
                "Manager or admin role required".to_string(),
            ));
        }
        if user_ids.is_empty() {
            return Ok(0.0);
        }

        Ok(self
            .store
            .total_time_logged_by_users_on(&user_ids, date)
            .await?)
    }

    async fn team_logs(
        &self,
        caller: &CurrentUser,
        manager_id: i32,
    ) -> Result<Vec<TeamMemberLogs>, TimeLogError> {
        if !caller.role.is_manager_or_admin() {
            return Err(TimeLogError::Forbidden(
                "Manager or admin role required".to_string(),
            ));
        }

        let members = self.store.list_direct_reports(manager_id).await?;
        let mut team = Vec::with_capacity(members.len());
        for member in members {
            let logs = self.store.list_time_logs_for_user(member.id).await?;
            team.push(TeamMemberLogs {
                user_id: member.id,
                name: member.name,
                logs,
            });
        }

        Ok(team)
    }
}
