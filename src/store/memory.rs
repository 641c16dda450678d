//! In-memory store
//!
//! Process-local tables with the same contract as the PostgreSQL store. Ids
//! start at 1 per table and are never reused.

use crate::error::{ApiResult, AppError};
use crate::models::Resource;
use crate::store::Store;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

#[derive(Default)]
struct Table {
    last_id: i32,
    rows: BTreeMap<i32, serde_json::Value>,
}

/// Thread-safe in-memory store
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<&'static str, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn encode<R: Resource>(record: &R) -> ApiResult<serde_json::Value> {
    serde_json::to_value(record)
        .map_err(|e| AppError::Internal(format!("Failed to encode {}: {}", R::LABEL, e)))
}

fn decode<R: Resource>(value: &serde_json::Value) -> ApiResult<R> {
    serde_json::from_value(value.clone())
        .map_err(|e| AppError::Internal(format!("Failed to decode {}: {}", R::LABEL, e)))
}

#[async_trait]
impl Store for MemoryStore {
    async fn list<R: Resource>(&self) -> ApiResult<Vec<R>> {
        let tables = self.tables.read().await;
        match tables.get(R::TABLE) {
            Some(table) => table.rows.values().map(decode::<R>).collect(),
            None => Ok(Vec::new()),
        }
    }

    async fn find<R: Resource>(&self, id: i32) -> ApiResult<Option<R>> {
        let tables = self.tables.read().await;
        tables
            .get(R::TABLE)
            .and_then(|table| table.rows.get(&id))
            .map(decode::<R>)
            .transpose()
    }

    async fn insert<R: Resource>(&self, payload: &R::Payload) -> ApiResult<R> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(R::TABLE).or_default();
        let id = table.last_id + 1;
        let record = R::from_payload(id, payload);
        table.rows.insert(id, encode(&record)?);
        table.last_id = id;
        Ok(record)
    }

    async fn update<R: Resource>(&self, id: i32, payload: &R::Payload) -> ApiResult<u64> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.get_mut(R::TABLE).and_then(|t| t.rows.get_mut(&id)) else {
            return Ok(0);
        };
        *row = encode(&R::from_payload(id, payload))?;
        Ok(1)
    }

    async fn delete<R: Resource>(&self, id: i32) -> ApiResult<u64> {
        let mut tables = self.tables.write().await;
        let removed = tables
            .get_mut(R::TABLE)
            .and_then(|table| table.rows.remove(&id));
        Ok(removed.map_or(0, |_| 1))
    }

    async fn ping(&self) -> ApiResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Advisor, AdvisorPayload, Project, ProjectPayload};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn advisor(nome: &str) -> AdvisorPayload {
        serde_json::from_value(json!({
            "nome": nome, "email": "a@x.com", "instituicao": "Tech"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn ids_are_per_table_and_never_reused() {
        let store = MemoryStore::new();

        let first: Advisor = store.insert::<Advisor>(&advisor("Ana")).await.unwrap();
        let second: Advisor = store.insert::<Advisor>(&advisor("Beto")).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        assert_eq!(store.delete::<Advisor>(2).await.unwrap(), 1);
        let third: Advisor = store.insert::<Advisor>(&advisor("Caio")).await.unwrap();
        assert_eq!(third.id, 3);

        let project: ProjectPayload =
            serde_json::from_value(json!({"titulo": "t", "descricao": "d"})).unwrap();
        let project: Project = store.insert::<Project>(&project).await.unwrap();
        assert_eq!(project.id, 1);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let store = MemoryStore::new();
        for name in ["Ana", "Beto", "Caio"] {
            store.insert::<Advisor>(&advisor(name)).await.unwrap();
        }

        let names: Vec<String> = store
            .list::<Advisor>()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.nome)
            .collect();
        assert_eq!(names, vec!["Ana", "Beto", "Caio"]);
    }

    #[tokio::test]
    async fn update_and_delete_report_affected_rows() {
        let store = MemoryStore::new();
        assert_eq!(store.update::<Advisor>(1, &advisor("Ana")).await.unwrap(), 0);
        assert_eq!(store.delete::<Advisor>(1).await.unwrap(), 0);

        store.insert::<Advisor>(&advisor("Ana")).await.unwrap();
        assert_eq!(store.update::<Advisor>(1, &advisor("Ana Paula")).await.unwrap(), 1);

        let found = store.find::<Advisor>(1).await.unwrap().unwrap();
        assert_eq!(found.nome, "Ana Paula");

        assert_eq!(store.delete::<Advisor>(1).await.unwrap(), 1);
        assert!(store.find::<Advisor>(1).await.unwrap().is_none());
    }
}
