//! Lifecycle controller for a single deployed application.
//!
//! The controller owns the remote application id. The id is empty until a
//! create succeeds and is the only key used for rename, expunge and status
//! queries. State transitions are observed by polling; there are no push
//! notifications.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::client::BrooklynApi;
use crate::definition::ApplicationDescriptor;
use crate::error::{ApplicationError, Result};
use crate::state::ApplicationState;
use crate::wait::wait_for_condition;

/// Polls allowed for an application to report `STARTING`.
pub const STARTING_MAX_ATTEMPTS: u32 = 20;
pub const STARTING_INTERVAL: Duration = Duration::from_secs(3);

/// Polls allowed for an application to report `RUNNING`.
pub const RUNNING_MAX_ATTEMPTS: u32 = 120;
pub const RUNNING_INTERVAL: Duration = Duration::from_secs(5);

pub struct Application<C: BrooklynApi + ?Sized> {
    client: Arc<C>,
    id: String,
    descriptor: ApplicationDescriptor,
}

impl<C: BrooklynApi + ?Sized> Application<C> {
    /// Application that has not been deployed yet.
    pub fn new(client: Arc<C>, descriptor: ApplicationDescriptor) -> Self {
        Self {
            client,
            id: String::new(),
            descriptor,
        }
    }

    /// Handle to an application previously deployed under `id`.
    pub fn with_id(
        client: Arc<C>,
        id: impl Into<String>,
        descriptor: ApplicationDescriptor,
    ) -> Self {
        Self {
            client,
            id: id.into(),
            descriptor,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_created(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn descriptor(&self) -> &ApplicationDescriptor {
        &self.descriptor
    }

    /// Forget the remote id after a confirmed delete.
    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    /// Render the descriptor and deploy it. On success the returned entity id
    /// becomes this application's id; on failure the id stays empty.
    pub async fn create(&mut self) -> Result<&str> {
        let definition = self.descriptor.render()?;
        info!(
            name = %self.descriptor.name,
            location = %self.descriptor.location,
            service_type = %self.descriptor.service_type,
            "Deploying application"
        );

        let task = self.client.create_from_definition(&definition).await?;
        self.id = task.entity_id;

        info!(application_id = %self.id, task_id = %task.id, "Application deployed");
        Ok(&self.id)
    }

    /// Rename the deployed application. No-op when nothing is deployed or
    /// `new_name` is empty.
    pub async fn rename(&mut self, new_name: &str) -> Result<()> {
        if self.id.is_empty() || new_name.is_empty() {
            return Ok(());
        }

        let response = self.client.rename(&self.id, &self.id, new_name).await?;
        info!(application_id = %self.id, new_name, response = %response, "Application renamed");
        self.descriptor.name = new_name.to_string();
        Ok(())
    }

    /// Expunge the application and release its resources. No-op when nothing
    /// is deployed. The caller clears the id once this returns `Ok`.
    pub async fn delete(&self) -> Result<()> {
        self.expunge(true).await
    }

    pub async fn expunge(&self, release: bool) -> Result<()> {
        if self.id.is_empty() {
            return Ok(());
        }

        let task = self.client.expunge(&self.id, &self.id, release).await?;
        match task {
            Some(task) => info!(
                application_id = %self.id,
                release,
                task_id = %task.id,
                "Application expunged"
            ),
            None => info!(application_id = %self.id, release, "Application expunged"),
        }
        Ok(())
    }

    /// Current state as reported by the remote service.
    ///
    /// An application without an id, or one the remote service cannot find,
    /// is [`ApplicationState::Stopped`].
    pub async fn query_state(&self) -> Result<ApplicationState> {
        if self.id.is_empty() {
            return Ok(ApplicationState::Stopped);
        }

        match self.client.application_summary(&self.id).await {
            Ok(summary) => {
                let state = ApplicationState::from_status(&summary.status);
                info!(
                    application_id = %self.id,
                    status = %summary.status,
                    %state,
                    "Application status"
                );
                Ok(state)
            }
            Err(e) => {
                warn!(
                    application_id = %self.id,
                    error = %e,
                    "Application lookup failed, treating as stopped"
                );
                Ok(ApplicationState::Stopped)
            }
        }
    }

    /// Wait until the application reports `STARTING`.
    ///
    /// Running out of attempts yields [`ApplicationError::NotStarting`].
    pub async fn wait_for_starting(&self) -> Result<()> {
        info!(application_id = %self.id, "Waiting for application to start");
        self.wait_for_state(
            ApplicationState::Starting,
            STARTING_MAX_ATTEMPTS,
            STARTING_INTERVAL,
        )
        .await
        .map_err(|e| match e {
            ApplicationError::RetriesExceeded { .. } => ApplicationError::NotStarting,
            other => other,
        })
    }

    /// Wait until the application reports `RUNNING`.
    pub async fn wait_for_running(&self) -> Result<()> {
        info!(application_id = %self.id, "Waiting for application to run");
        self.wait_for_state(
            ApplicationState::Running,
            RUNNING_MAX_ATTEMPTS,
            RUNNING_INTERVAL,
        )
        .await
    }

    async fn wait_for_state(
        &self,
        target: ApplicationState,
        max_attempts: u32,
        interval: Duration,
    ) -> Result<()> {
        wait_for_condition(
            || async move { Ok::<_, ApplicationError>(self.query_state().await? == target) },
            max_attempts,
            interval,
        )
        .await
    }
}
