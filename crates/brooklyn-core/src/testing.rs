//! In-memory [`BrooklynApi`] used by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::{ApplicationSummary, BrooklynApi, ClientError, TaskSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Create(String),
    Summary(String),
    Rename {
        application_id: String,
        entity_id: String,
        new_name: String,
    },
    Expunge {
        application_id: String,
        entity_id: String,
        release: bool,
    },
}

/// Scripted remote service. Status lookups consume `statuses` front to back
/// and keep answering with the last entry; `None` answers with a 404.
pub(crate) struct FakeBrooklyn {
    entity_id: String,
    statuses: Mutex<VecDeque<Option<String>>>,
    calls: Mutex<Vec<Call>>,
    pub(crate) fail_create: bool,
    pub(crate) fail_rename: bool,
    pub(crate) fail_expunge: bool,
}

impl FakeBrooklyn {
    pub(crate) fn new(entity_id: &str) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            statuses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            fail_create: false,
            fail_rename: false,
            fail_expunge: false,
        }
    }

    pub(crate) fn with_statuses(self, statuses: &[Option<&str>]) -> Self {
        *self.statuses.lock().unwrap() = statuses
            .iter()
            .map(|s| s.map(str::to_string))
            .collect();
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn summary_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Summary(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn server_error() -> ClientError {
        ClientError::Status {
            status: 500,
            body: "internal error".into(),
        }
    }
}

#[async_trait]
impl BrooklynApi for FakeBrooklyn {
    async fn create_from_definition(&self, definition: &[u8]) -> Result<TaskSummary, ClientError> {
        self.record(Call::Create(String::from_utf8_lossy(definition).into_owned()));
        if self.fail_create {
            return Err(Self::server_error());
        }
        Ok(TaskSummary {
            id: "task-1".into(),
            entity_id: self.entity_id.clone(),
            ..Default::default()
        })
    }

    async fn application_summary(
        &self,
        application_id: &str,
    ) -> Result<ApplicationSummary, ClientError> {
        self.record(Call::Summary(application_id.to_string()));
        let status = {
            let mut statuses = self.statuses.lock().unwrap();
            if statuses.len() > 1 {
                statuses.pop_front().flatten()
            } else {
                statuses.front().cloned().flatten()
            }
        };
        match status {
            Some(status) => Ok(ApplicationSummary {
                id: application_id.to_string(),
                status,
            }),
            None => Err(ClientError::Status {
                status: 404,
                body: format!("Application '{application_id}' not found"),
            }),
        }
    }

    async fn rename(
        &self,
        application_id: &str,
        entity_id: &str,
        new_name: &str,
    ) -> Result<String, ClientError> {
        self.record(Call::Rename {
            application_id: application_id.to_string(),
            entity_id: entity_id.to_string(),
            new_name: new_name.to_string(),
        });
        if self.fail_rename {
            return Err(Self::server_error());
        }
        Ok(String::new())
    }

    async fn expunge(
        &self,
        application_id: &str,
        entity_id: &str,
        release: bool,
    ) -> Result<Option<TaskSummary>, ClientError> {
        self.record(Call::Expunge {
            application_id: application_id.to_string(),
            entity_id: entity_id.to_string(),
            release,
        });
        if self.fail_expunge {
            return Err(Self::server_error());
        }
        Ok(Some(TaskSummary {
            id: "task-2".into(),
            entity_id: entity_id.to_string(),
            ..Default::default()
        }))
    }
}
