use std::sync::Arc;

use anyhow::{Context, Result};
use brooklyn_core::{Application, ApplicationResource, ApplicationSpec, BrooklynApi};
use colored::Colorize;

use crate::cli::OutputFormat;
use crate::output::{print_status, print_success};
use crate::state_file::{self, StateFile};

/// What `apply` did to reach the declared state.
#[derive(Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Created,
    Renamed,
    /// Declaration changed without anything the remote service can apply.
    Recorded,
    Unchanged,
}

pub async fn apply<C: BrooklynApi + ?Sized>(
    client: Arc<C>,
    file: &str,
    state_path: &str,
) -> Result<()> {
    let desired = state_file::read_spec(file)?;
    let mut state = state_file::load(state_path)?;
    let resource = ApplicationResource::new(client);

    let outcome = reconcile(&resource, &desired, &mut state, state_path).await?;
    let id = state.data.id.cyan();
    match outcome {
        ApplyOutcome::Created => print_success(&format!(
            "Created application {} ({id})",
            desired.application_name.cyan()
        )),
        ApplyOutcome::Renamed => print_success(&format!(
            "Renamed application {id} to {}",
            desired.application_name.cyan()
        )),
        ApplyOutcome::Recorded => {
            println!("No remote changes. Recorded new declaration for application {id}.")
        }
        ApplyOutcome::Unchanged => println!("No changes. Application {id} is up to date."),
    }
    Ok(())
}

async fn reconcile<C: BrooklynApi + ?Sized>(
    resource: &ApplicationResource<C>,
    desired: &ApplicationSpec,
    state: &mut StateFile,
    state_path: &str,
) -> Result<ApplyOutcome> {
    if !state.data.exists() {
        let result = resource.create(desired, &mut state.data).await;
        // the id is kept even when waiting fails so destroy can clean up
        if state.data.exists() {
            state.spec = Some(desired.clone());
            state_file::save(state_path, state)?;
        }
        result.context("Failed to create application")?;
        return Ok(ApplyOutcome::Created);
    }

    match state.spec.clone() {
        Some(prior) if prior != *desired => {
            resource
                .update(&prior, desired, &mut state.data)
                .await
                .context("Failed to update application")?;
            state.spec = Some(desired.clone());
            state_file::save(state_path, state)?;
            if prior.application_name == desired.application_name {
                Ok(ApplyOutcome::Recorded)
            } else {
                Ok(ApplyOutcome::Renamed)
            }
        }
        prior => {
            resource.read(prior.as_ref().unwrap_or(desired), &mut state.data).await?;
            if prior.is_none() {
                state.spec = Some(desired.clone());
                state_file::save(state_path, state)?;
            }
            Ok(ApplyOutcome::Unchanged)
        }
    }
}

pub async fn destroy<C: BrooklynApi + ?Sized>(client: Arc<C>, state_path: &str) -> Result<()> {
    let mut state = state_file::load(state_path)?;
    if !state.data.exists() {
        println!("Nothing to destroy.");
        return Ok(());
    }

    let id = state.data.id.clone();
    ApplicationResource::new(client)
        .delete(&mut state.data)
        .await
        .context("Failed to delete application")?;
    state_file::save(state_path, &StateFile::default())?;
    print_success(&format!("Deleted application {}", id.cyan()));
    Ok(())
}

pub async fn status<C: BrooklynApi + ?Sized>(
    client: Arc<C>,
    state_path: &str,
    format: OutputFormat,
) -> Result<()> {
    let state = state_file::load(state_path)?;
    let descriptor = state.spec.as_ref().map(|s| s.descriptor()).unwrap_or_default();
    let application = Application::with_id(client, state.data.id.as_str(), descriptor);

    let current = application.query_state().await?;
    let name = state.spec.as_ref().map(|s| s.application_name.as_str());
    print_status(application.id(), name, current, format);
    Ok(())
}

pub fn render(file: &str) -> Result<()> {
    let spec = state_file::read_spec(file)?;
    let definition = spec.descriptor().render()?;
    print!("{}", String::from_utf8_lossy(&definition));
    Ok(())
}
