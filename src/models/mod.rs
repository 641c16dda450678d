//! Data models and DTOs (Data Transfer Objects)
//!
//! Each managed entity is described once, as a [`Resource`] with a writable
//! [`Payload`]. The generic controller and both stores are driven entirely by
//! these two traits.

pub mod advisor;
pub mod participant;
pub mod project;

// Re-export commonly used types
pub use advisor::*;
pub use participant::*;
pub use project::*;

use postgres_types::ToSql;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio_postgres::Row;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// A stored entity exposed under `/<TABLE>`.
pub trait Resource: Serialize + DeserializeOwned + ToSchema + Clone + Send + Sync + 'static {
    type Payload: Payload;

    /// Singular label used in response messages
    const LABEL: &'static str;

    /// Table name, also used as the route segment
    const TABLE: &'static str;

    /// OpenAPI tag grouping the resource's operations
    const TAG: &'static str;

    /// Generated identifier
    fn id(&self) -> i32;

    /// Build a record from a row selected with `id` plus `Payload::FIELDS`.
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error>;

    /// Build the record a successful insert or update of `payload` produces.
    fn from_payload(id: i32, payload: &Self::Payload) -> Self;
}

/// Body accepted by create and update. Replaces every writable column.
pub trait Payload: DeserializeOwned + Validate + ToSchema + Send + Sync + 'static {
    /// Writable columns, in declaration order.
    const FIELDS: &'static [&'static str];

    /// Statement parameters aligned with [`Payload::FIELDS`].
    fn params(&self) -> Vec<&(dyn ToSql + Sync)>;
}

/// Message-only response (no data)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Rejects empty and whitespace-only strings.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}
