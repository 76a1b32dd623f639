//! Task result backend on top of the store client

use std::time::Duration;
use tracing::debug;

use crate::config::BackendConfig;
use crate::connection::{Connector, RedisConnector};
use crate::error::BackendResult;
use crate::store::StoreClient;
use crate::task::{TaskId, TaskMeta, TaskStatus};

/// Result backend that keeps one JSON document per task
pub struct ResultBackend<C: Connector = RedisConnector> {
    store: StoreClient<C>,
    key_prefix: String,
}

impl ResultBackend<RedisConnector> {
    /// Create a backend from configuration. The store is contacted lazily.
    pub fn from_config(config: &BackendConfig) -> BackendResult<Self> {
        let store = StoreClient::from_config(config)?;
        Ok(Self::new(store, config.key_prefix.clone()))
    }
}

impl<C: Connector> ResultBackend<C> {
    /// URL scheme this backend is registered under
    pub const SCHEME: &'static str = "valkey";

    /// Results expire natively in the store
    pub const SUPPORTS_AUTOEXPIRE: bool = true;

    /// Wrap an existing store client
    pub fn new(store: StoreClient<C>, key_prefix: impl Into<String>) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
        }
    }

    /// Store key holding the result of `task_id`
    pub fn key_for(&self, task_id: TaskId) -> String {
        format!("{}{}", self.key_prefix, task_id)
    }

    /// Record a task state change
    pub async fn store_result(
        &mut self,
        task_id: TaskId,
        status: TaskStatus,
        result: serde_json::Value,
        traceback: Option<String>,
    ) -> BackendResult<TaskMeta> {
        self.store_result_with_expiry(task_id, status, result, traceback, None)
            .await
    }

    /// Record a task state change with an expiry overriding the configured one
    pub async fn store_result_with_expiry(
        &mut self,
        task_id: TaskId,
        status: TaskStatus,
        result: serde_json::Value,
        traceback: Option<String>,
        expiry: Option<Duration>,
    ) -> BackendResult<TaskMeta> {
        let meta = TaskMeta::new(task_id, status, result, traceback);
        let payload = serde_json::to_vec(&meta)?;
        let key = self.key_for(task_id);

        self.store.set(&key, &payload, expiry).await?;
        debug!("Stored {:?} result for task {}", status, task_id);
        Ok(meta)
    }

    /// Metadata of a task; unknown tasks are reported as pending
    pub async fn get_task_meta(&mut self, task_id: TaskId) -> BackendResult<TaskMeta> {
        let key = self.key_for(task_id);
        match self.store.get(&key).await? {
            Some(payload) => Ok(serde_json::from_slice(&payload)?),
            None => Ok(TaskMeta::pending(task_id)),
        }
    }

    /// Metadata of several tasks, in the order given
    pub async fn get_many(&mut self, task_ids: &[TaskId]) -> BackendResult<Vec<TaskMeta>> {
        let keys: Vec<String> = task_ids.iter().map(|id| self.key_for(*id)).collect();
        let values = self.store.mget(&keys).await?;

        task_ids
            .iter()
            .zip(values)
            .map(|(task_id, value)| -> BackendResult<TaskMeta> {
                match value {
                    Some(payload) => Ok(serde_json::from_slice(&payload)?),
                    None => Ok(TaskMeta::pending(*task_id)),
                }
            })
            .collect()
    }

    /// Drop the stored result of a task
    pub async fn forget(&mut self, task_id: TaskId) -> BackendResult<()> {
        let key = self.key_for(task_id);
        self.store.delete(&key).await
    }

    /// Close the store connection
    pub async fn cleanup(&mut self) -> BackendResult<()> {
        self.store.cleanup().await
    }

    /// Backend address; the password is masked unless `include_password`
    pub fn as_uri(&self, include_password: bool) -> String {
        self.store.display_address(include_password)
    }

    /// Underlying store client
    pub fn store(&mut self) -> &mut StoreClient<C> {
        &mut self.store
    }
}
