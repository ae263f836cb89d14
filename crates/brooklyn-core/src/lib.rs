pub mod application;
pub mod client;
pub mod config;
pub mod definition;
pub mod error;
pub mod resource;
pub mod state;
pub mod wait;

#[cfg(test)]
pub(crate) mod testing;

pub use application::{
    Application, RUNNING_INTERVAL, RUNNING_MAX_ATTEMPTS, STARTING_INTERVAL, STARTING_MAX_ATTEMPTS,
};
pub use client::{ApplicationSummary, BrooklynApi, BrooklynClient, ClientError, TaskSummary};
pub use crate::config::{ProviderConfig, load_config};
pub use definition::{ApplicationDescriptor, Configuration, render};
pub use error::{ApplicationError, Result};
pub use resource::{ApplicationResource, ApplicationSpec, ResourceData};
pub use state::ApplicationState;
pub use wait::{wait_for, wait_for_condition, wait_for_specific};
