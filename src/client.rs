use async_trait::async_trait;
use std::sync::Arc;

use crate::error::ClientError;
use crate::record::Record;

/// Fetch/mutate access to one remote collection.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    async fn list(&self) -> Result<Vec<Record>, ClientError>;

    async fn get(&self, id: &str) -> Result<Record, ClientError>;

    async fn create(&self, record: &Record) -> Result<Record, ClientError>;

    async fn update(&self, id: &str, record: &Record) -> Result<Record, ClientError>;

    async fn delete(&self, id: &str) -> Result<(), ClientError>;
}

#[async_trait]
impl<T: ResourceClient + ?Sized> ResourceClient for Arc<T> {
    async fn list(&self) -> Result<Vec<Record>, ClientError> {
        (**self).list().await
    }

    async fn get(&self, id: &str) -> Result<Record, ClientError> {
        (**self).get(id).await
    }

    async fn create(&self, record: &Record) -> Result<Record, ClientError> {
        (**self).create(record).await
    }

    async fn update(&self, id: &str, record: &Record) -> Result<Record, ClientError> {
        (**self).update(id, record).await
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        (**self).delete(id).await
    }
}
