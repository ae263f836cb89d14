//! `brooklyn_application` resource: maps declared fields onto the lifecycle
//! controller for each Create/Read/Update/Delete issued by the host.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::application::Application;
use crate::client::BrooklynApi;
use crate::definition::{ApplicationDescriptor, Configuration};
use crate::error::Result;

/// Declared fields of an application resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSpec {
    pub application_name: String,
    pub location_name: String,
    pub catalog_id: String,
    pub catalog_version: String,
    #[serde(default = "default_wait_for_running")]
    pub wait_for_running: bool,
    /// Emitted in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub application_configuration: IndexMap<String, String>,
}

fn default_wait_for_running() -> bool {
    true
}

impl ApplicationSpec {
    /// Catalog reference used as the service type, `id:version`.
    pub fn service_type(&self) -> String {
        format!("{}:{}", self.catalog_id, self.catalog_version)
    }

    pub fn descriptor(&self) -> ApplicationDescriptor {
        ApplicationDescriptor {
            name: self.application_name.clone(),
            location: self.location_name.clone(),
            service_type: self.service_type(),
            configurations: self
                .application_configuration
                .iter()
                .map(|(key, value)| Configuration::new(key, value))
                .collect(),
        }
    }
}

/// State persisted by the host between operations. An empty id means the
/// application does not exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default)]
    pub id: String,
}

impl ResourceData {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn exists(&self) -> bool {
        !self.id.is_empty()
    }
}

pub struct ApplicationResource<C: BrooklynApi + ?Sized> {
    client: Arc<C>,
}

impl<C: BrooklynApi + ?Sized> ApplicationResource<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Deploy the application and optionally wait for it to start and run.
    ///
    /// The id is recorded in `data` as soon as the deploy succeeds, so a
    /// failed wait still leaves a handle for a later delete.
    pub async fn create(&self, spec: &ApplicationSpec, data: &mut ResourceData) -> Result<()> {
        info!(application_name = %spec.application_name, "Creating application resource");
        let mut application = Application::new(self.client.clone(), spec.descriptor());

        let id = application.create().await?;
        data.id = id.to_string();

        if spec.wait_for_running {
            application.wait_for_starting().await?;
            application.wait_for_running().await?;
        }
        Ok(())
    }

    /// Refresh. Performs no remote call and detects no drift.
    pub async fn read(&self, _spec: &ApplicationSpec, _data: &mut ResourceData) -> Result<()> {
        Ok(())
    }

    /// Apply a declared change. Only a new `application_name` reaches the
    /// remote service, as a rename.
    pub async fn update(
        &self,
        prior: &ApplicationSpec,
        desired: &ApplicationSpec,
        data: &mut ResourceData,
    ) -> Result<()> {
        if prior.application_name == desired.application_name {
            return Ok(());
        }

        info!(
            application_id = %data.id,
            from = %prior.application_name,
            to = %desired.application_name,
            "Updating application resource"
        );
        let mut application =
            Application::with_id(self.client.clone(), data.id.as_str(), prior.descriptor());
        application.rename(&desired.application_name).await
    }

    /// Expunge the application and clear the stored id on success.
    pub async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let application = Application::with_id(
            self.client.clone(),
            data.id.as_str(),
            ApplicationDescriptor::default(),
        );
        application.delete().await?;

        info!(application_id = %data.id, "Deleted application resource");
        data.id.clear();
        Ok(())
    }
}
