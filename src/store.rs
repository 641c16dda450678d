//! Store access
//!
//! One statement per operation. Implementations are built once at startup and
//! shared by every controller through the application state.

pub mod memory;

pub use memory::MemoryStore;

use crate::error::ApiResult;
use crate::models::Resource;
use async_trait::async_trait;

#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Every record of `R`, ordered by id
    async fn list<R: Resource>(&self) -> ApiResult<Vec<R>>;

    /// The record with `id`, if any
    async fn find<R: Resource>(&self, id: i32) -> ApiResult<Option<R>>;

    /// Insert `payload` and return the stored record with its generated id
    async fn insert<R: Resource>(&self, payload: &R::Payload) -> ApiResult<R>;

    /// Replace every writable column of `id`; returns the affected row count
    async fn update<R: Resource>(&self, id: i32, payload: &R::Payload) -> ApiResult<u64>;

    /// Remove `id`; returns the affected row count
    async fn delete<R: Resource>(&self, id: i32) -> ApiResult<u64>;

    /// Cheap connectivity check used by the health endpoint
    async fn ping(&self) -> ApiResult<()>;
}
