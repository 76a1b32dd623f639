//! # Valkey Result Backend
//!
//! A task result backend that keeps task outcomes in Valkey (or Redis).
//!
//! ## Features
//!
//! - Lazily opened, self-healing store connection
//! - Linear-backoff retries with forced reconnection
//! - Native result expiry
//! - Password masking for logged store addresses
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use valkey_result_backend::{BackendConfig, ResultBackend, TaskId, TaskStatus};
//!
//! # tokio_test::block_on(async {
//! let config = BackendConfig::new("valkey://localhost:6379/0").with_expires(Some(3600));
//! let mut backend = ResultBackend::from_config(&config)?;
//!
//! let task_id = TaskId::new_v4();
//! backend
//!     .store_result(task_id, TaskStatus::Success, serde_json::json!(101), None)
//!     .await?;
//!
//! let meta = backend.get_task_meta(task_id).await?;
//! assert_eq!(meta.result, serde_json::json!(101));
//!
//! backend.cleanup().await?;
//! # Ok::<(), valkey_result_backend::BackendError>(())
//! # });
//! ```

pub mod backend;
pub mod config;
pub mod connection;
pub mod error;
pub mod redact;
pub mod retry;
pub mod store;
pub mod task;

// Re-export commonly used types
pub use backend::ResultBackend;
pub use config::BackendConfig;
pub use connection::{Connector, RedisConnector, StoreConnection};
pub use error::{BackendError, BackendResult};
pub use redact::{mask_url_password, redact};
pub use retry::RetryPolicy;
pub use store::StoreClient;
pub use task::{TaskId, TaskMeta, TaskStatus};

/// Version of the result backend library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
