use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, DirectoryService, NotificationService, ProductivityService, RegistrationService,
    ReminderService, SeaOrmAuthService, SeaOrmDirectoryService, SeaOrmNotificationService,
    SeaOrmProductivityService, SeaOrmRegistrationService, SeaOrmTaskService, SeaOrmTimeLogService,
    TaskService, TimeLogService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub task_service: Arc<dyn TaskService>,

    pub time_log_service: Arc<dyn TimeLogService>,

    pub registration_service: Arc<dyn RegistrationService>,

    pub productivity_service: Arc<dyn ProductivityService>,

    pub notification_service: Arc<dyn NotificationService>,

    pub directory_service: Arc<dyn DirectoryService>,

    pub reminder_service: Arc<ReminderService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    /// Wires every service against an already-open store. Used by `new` and
    /// by tests that want an in-memory database.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let config_arc = Arc::new(RwLock::new(config));

        let notification_service = Arc::new(SeaOrmNotificationService::new(store.clone()))
            as Arc<dyn NotificationService + Send + Sync + 'static>;

        // Task and registration workflows emit notifications on their own
        let task_service = Arc::new(SeaOrmTaskService::new(
            store.clone(),
            notification_service.clone(),
        )) as Arc<dyn TaskService + Send + Sync + 'static>;

        let registration_service = Arc::new(SeaOrmRegistrationService::new(
            store.clone(),
            notification_service.clone(),
        )) as Arc<dyn RegistrationService + Send + Sync + 'static>;

        let time_log_service = Arc::new(SeaOrmTimeLogService::new(store.clone()))
            as Arc<dyn TimeLogService + Send + Sync + 'static>;

        let productivity_service = Arc::new(SeaOrmProductivityService::new(store.clone()))
            as Arc<dyn ProductivityService + Send + Sync + 'static>;

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone()))
            as Arc<dyn AuthService + Send + Sync + 'static>;

        let directory_service = Arc::new(SeaOrmDirectoryService::new(store.clone()))
            as Arc<dyn DirectoryService + Send + Sync + 'static>;

        let reminder_service = Arc::new(ReminderService::new(
            store.clone(),
            notification_service.clone(),
        ));

        Self {
            config: config_arc,
            store,
            auth_service,
            task_service,
            time_log_service,
            registration_service,
            productivity_service,
            notification_service,
            directory_service,
            reminder_service,
        }
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
