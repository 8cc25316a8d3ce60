use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use opendal::{EntryMode, Operator};
use tracing::debug;
use uuid::Uuid;

use crate::client::ResourceClient;
use crate::error::ClientError;
use crate::record::{FieldValue, Record};

const CREATED_AT: &str = "createdAt";
const UPDATED_AT: &str = "updatedAt";

/// Resource client over an OpenDAL operator. Every record of a collection is
/// one JSON file at `<collection>/<id>.json`.
#[derive(Clone)]
pub struct StoreClient {
    op: Operator,
    collection: String,
    identity_field: String,
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn validate_id(id: &str) -> Result<(), ClientError> {
    if id.is_empty() || id.contains('/') || id.contains("..") {
        return Err(ClientError::server(400, format!("Invalid record id: {id:?}")));
    }
    Ok(())
}

impl StoreClient {
    pub fn new(op: Operator, collection: &str, identity_field: &str) -> Self {
        Self {
            op,
            collection: collection.trim_matches('/').to_string(),
            identity_field: identity_field.to_string(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn collection_dir(&self) -> String {
        format!("{}/", self.collection)
    }

    fn record_path(&self, id: &str) -> String {
        format!("{}/{}.json", self.collection, id)
    }

    async fn ensure_collection_dir(&self) -> Result<(), ClientError> {
        let dir = self.collection_dir();
        if !self.op.exists(&dir).await? {
            self.op.create_dir(&dir).await?;
        }
        Ok(())
    }

    async fn read_record(&self, path: &str) -> Result<Record, ClientError> {
        let bytes = self.op.read(path).await?;
        Ok(serde_json::from_slice(&bytes.to_vec())?)
    }

    async fn write_record(&self, id: &str, record: &Record) -> Result<(), ClientError> {
        self.ensure_collection_dir().await?;
        self.op
            .write(&self.record_path(id), serde_json::to_vec_pretty(record)?)
            .await?;
        Ok(())
    }

    async fn require_existing(&self, id: &str) -> Result<Record, ClientError> {
        validate_id(id)?;
        let path = self.record_path(id);
        if !self.op.exists(&path).await? {
            return Err(ClientError::not_found(format!(
                "{} record not found: {}",
                self.collection, id
            )));
        }
        self.read_record(&path).await
    }
}

#[async_trait]
impl ResourceClient for StoreClient {
    async fn list(&self) -> Result<Vec<Record>, ClientError> {
        let dir = self.collection_dir();
        if !self.op.exists(&dir).await? {
            return Ok(Vec::new());
        }

        let mut paths: Vec<String> = self
            .op
            .list(&dir)
            .await?
            .into_iter()
            .filter(|entry| entry.metadata().mode() == EntryMode::FILE)
            .filter(|entry| entry.name().ends_with(".json"))
            .map(|entry| entry.path().to_string())
            .collect();
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            records.push(self.read_record(&path).await?);
        }
        debug!(collection = %self.collection, count = records.len(), "listed records");
        Ok(records)
    }

    async fn get(&self, id: &str) -> Result<Record, ClientError> {
        self.require_existing(id).await
    }

    async fn create(&self, record: &Record) -> Result<Record, ClientError> {
        let mut stored = record.clone();
        let id = match record.get(&self.identity_field) {
            value if value.is_empty() => Uuid::new_v4().to_string(),
            value => value.display(),
        };
        validate_id(&id)?;
        if self.op.exists(&self.record_path(&id)).await? {
            return Err(ClientError::server(
                409,
                format!("{} record already exists: {}", self.collection, id),
            ));
        }

        if stored.get(&self.identity_field).is_empty() {
            stored.set(self.identity_field.clone(), id.clone());
        }
        let now = now_rfc3339();
        stored.set(CREATED_AT, now.clone());
        stored.set(UPDATED_AT, now);

        self.write_record(&id, &stored).await?;
        debug!(collection = %self.collection, id = %id, "created record");
        Ok(stored)
    }

    async fn update(&self, id: &str, record: &Record) -> Result<Record, ClientError> {
        let existing = self.require_existing(id).await?;

        let mut stored = record.clone();
        stored.set(
            self.identity_field.clone(),
            existing.get(&self.identity_field).clone(),
        );
        let created_at = existing.get(CREATED_AT);
        if !created_at.is_empty() {
            stored.set(CREATED_AT, created_at.clone());
        }
        stored.set(UPDATED_AT, FieldValue::Text(now_rfc3339()));

        self.write_record(id, &stored).await?;
        debug!(collection = %self.collection, id = %id, "updated record");
        Ok(stored)
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.require_existing(id).await?;
        self.op.delete(&self.record_path(id)).await?;
        debug!(collection = %self.collection, id = %id, "deleted record");
        Ok(())
    }
}
