use anyhow::Result;
use async_trait::async_trait;
use dealer_console_core::{ClientError, Record, ResourceClient};
use opendal::services::Memory;
use opendal::Operator;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[allow(dead_code)]
pub fn setup_operator() -> Result<Operator> {
    let builder = Memory::default();
    let op = Operator::new(builder)?.finish();
    Ok(op)
}

#[allow(dead_code)]
pub fn record(value: Value) -> Record {
    Record::from_json(value).expect("test record must be a JSON object")
}

#[allow(dead_code)]
pub fn records(values: Vec<Value>) -> Vec<Record> {
    values.into_iter().map(record).collect()
}

#[allow(dead_code)]
pub fn texts(records: &[Record], field: &str) -> Vec<String> {
    records.iter().map(|r| r.get(field).display()).collect()
}

/// In-memory client whose failures are switched on by the test.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockClient {
    records: Mutex<Vec<Record>>,
    payloads: Mutex<Vec<Record>>,
    calls: Mutex<Vec<String>>,
    fail_list: AtomicBool,
    fail_writes: AtomicBool,
}

#[allow(dead_code)]
impl MockClient {
    pub fn with_records(records: Vec<Record>) -> Arc<Self> {
        let client = MockClient::default();
        *client.records.lock().unwrap() = records;
        Arc::new(client)
    }

    pub fn set_records(&self, records: Vec<Record>) {
        *self.records.lock().unwrap() = records;
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Body of the most recent create or update request.
    pub fn last_payload(&self) -> Option<Record> {
        self.payloads.lock().unwrap().last().cloned()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_writes(&self) -> Result<(), ClientError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ClientError::server(500, "write rejected"));
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceClient for MockClient {
    async fn list(&self) -> Result<Vec<Record>, ClientError> {
        self.log("list".to_string());
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(ClientError::Network("connection refused".to_string()));
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn get(&self, id: &str) -> Result<Record, ClientError> {
        self.log(format!("get:{id}"));
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.get("id").display() == id)
            .cloned()
            .ok_or_else(|| ClientError::not_found(id.to_string()))
    }

    async fn create(&self, record: &Record) -> Result<Record, ClientError> {
        self.log("create".to_string());
        self.payloads.lock().unwrap().push(record.clone());
        self.check_writes()?;
        let mut records = self.records.lock().unwrap();
        let mut stored = record.clone();
        stored.set("id", (records.len() as i64) + 100);
        records.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &str, record: &Record) -> Result<Record, ClientError> {
        self.log(format!("update:{id}"));
        self.payloads.lock().unwrap().push(record.clone());
        self.check_writes()?;
        let mut records = self.records.lock().unwrap();
        let slot = records
            .iter_mut()
            .find(|r| r.get("id").display() == id)
            .ok_or_else(|| ClientError::not_found(id.to_string()))?;
        *slot = record.clone();
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.log(format!("delete:{id}"));
        self.check_writes()?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.get("id").display() != id);
        if records.len() == before {
            return Err(ClientError::not_found(id.to_string()));
        }
        Ok(())
    }
}
