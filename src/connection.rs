//! Connection handles to the key-value store

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::Client;
use std::time::Duration;
use tracing::info;
use url::Url;

use crate::error::{BackendError, BackendResult};
use crate::redact::redact;

/// Schemes accepted for the store address, with the scheme the redis client expects
const SCHEME_MAP: &[(&str, &str)] = &[
    ("valkey", "redis"),
    ("redis", "redis"),
    ("valkeys", "rediss"),
    ("rediss", "rediss"),
];

/// A live handle to the store.
///
/// Handles are cheap to clone; clones share the same underlying socket.
#[async_trait]
pub trait StoreConnection: Clone + Send + Sync + 'static {
    /// Fetch a value, `None` if the key is absent
    async fn get(&mut self, key: &str) -> BackendResult<Option<Vec<u8>>>;

    /// Store a value, with the expiry applied in the same command
    async fn set(&mut self, key: &str, value: &[u8], expiry: Option<Duration>) -> BackendResult<()>;

    /// Remove a key
    async fn delete(&mut self, key: &str) -> BackendResult<()>;

    /// Fetch several values, aligned with `keys`
    async fn mget(&mut self, keys: &[String]) -> BackendResult<Vec<Option<Vec<u8>>>>;

    /// Release the handle
    async fn close(self) -> BackendResult<()>;
}

/// Creates fresh connection handles
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: StoreConnection;

    /// Open a new connection
    async fn connect(&self) -> BackendResult<Self::Connection>;

    /// The raw store address this connector talks to
    fn address(&self) -> &str;
}

/// Rewrite a `valkey://` style address into one the redis client understands
pub fn client_url(address: &str) -> BackendResult<String> {
    if address.is_empty() {
        return Err(BackendError::config("store address is empty"));
    }

    let mut url = Url::parse(address).map_err(|e| {
        BackendError::config(format!("invalid store address {}: {}", redact(address), e))
    })?;

    let target = SCHEME_MAP
        .iter()
        .find(|(scheme, _)| *scheme == url.scheme())
        .map(|(_, target)| *target)
        .ok_or_else(|| {
            BackendError::config(format!("unsupported store scheme: {}", url.scheme()))
        })?;

    url.set_scheme(target)
        .map_err(|_| BackendError::config(format!("cannot use scheme {} for store", target)))?;

    Ok(url.into())
}

/// `SET` option for an expiry: whole seconds use `EX`, anything finer `PX`
fn expiry_args(expiry: Duration) -> BackendResult<(&'static str, u64)> {
    if expiry.subsec_nanos() == 0 {
        return Ok(("EX", expiry.as_secs()));
    }
    let millis = u64::try_from(expiry.as_millis())
        .map_err(|_| BackendError::config(format!("expiry {:?} is out of range", expiry)))?;
    Ok(("PX", millis))
}

/// Connector backed by the `redis` crate
#[derive(Debug, Clone)]
pub struct RedisConnector {
    client: Client,
    address: String,
}

impl RedisConnector {
    /// Build a connector for the given address. No network I/O happens here.
    pub fn new(address: &str) -> BackendResult<Self> {
        let client = Client::open(client_url(address)?)
            .map_err(|e| BackendError::config(format!("invalid store address: {}", e)))?;

        Ok(Self {
            client,
            address: address.to_string(),
        })
    }
}

#[async_trait]
impl Connector for RedisConnector {
    type Connection = RedisConnection;

    async fn connect(&self) -> BackendResult<RedisConnection> {
        let inner = self.client.get_multiplexed_tokio_connection().await?;
        info!("Connected to store at {}", redact(&self.address));
        Ok(RedisConnection { inner })
    }

    fn address(&self) -> &str {
        &self.address
    }
}

/// Multiplexed redis connection
#[derive(Clone)]
pub struct RedisConnection {
    inner: MultiplexedConnection,
}

#[async_trait]
impl StoreConnection for RedisConnection {
    async fn get(&mut self, key: &str) -> BackendResult<Option<Vec<u8>>> {
        let value = redis::cmd("GET")
            .arg(key)
            .query_async::<_, Option<Vec<u8>>>(&mut self.inner)
            .await?;
        Ok(value)
    }

    async fn set(&mut self, key: &str, value: &[u8], expiry: Option<Duration>) -> BackendResult<()> {
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);

        if let Some(expiry) = expiry {
            let (unit, amount) = expiry_args(expiry)?;
            cmd.arg(unit).arg(amount);
        }

        cmd.query_async::<_, ()>(&mut self.inner).await?;
        Ok(())
    }

    async fn delete(&mut self, key: &str) -> BackendResult<()> {
        redis::cmd("DEL")
            .arg(key)
            .query_async::<_, u64>(&mut self.inner)
            .await?;
        Ok(())
    }

    async fn mget(&mut self, keys: &[String]) -> BackendResult<Vec<Option<Vec<u8>>>> {
        let mut cmd = redis::cmd("MGET");
        for key in keys {
            cmd.arg(key);
        }

        let values = cmd
            .query_async::<_, Vec<Option<Vec<u8>>>>(&mut self.inner)
            .await?;
        Ok(values)
    }

    async fn close(self) -> BackendResult<()> {
        // Dropping the last clone shuts the multiplexed socket down
        drop(self.inner);
        Ok(())
    }
}
