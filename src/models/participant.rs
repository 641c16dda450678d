//! Participant ("participante") model

use super::{not_blank, Payload, Resource};
use postgres_types::ToSql;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use utoipa::ToSchema;
use validator::Validate;

/// Participant as stored in `participantes`
///
/// `projeto_id` is passed through as given; the referenced project is not
/// checked for existence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(as = Participante)]
pub struct Participant {
    pub id: i32,
    pub nome: String,
    #[schema(format = "email")]
    pub email: String,
    pub colegio: String,
    pub cidade: String,
    pub projeto_id: Option<i32>,
}

/// Request body for creating or replacing a participant
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(as = ParticipanteInput)]
pub struct ParticipantPayload {
    #[serde(default, alias = "name")]
    #[validate(custom(function = "not_blank"))]
    pub nome: String,

    #[serde(default)]
    #[schema(format = "email")]
    #[validate(
        custom(function = "not_blank"),
        email(message = "\"email\" must be a valid email address")
    )]
    pub email: String,

    #[serde(default, alias = "school")]
    #[validate(custom(function = "not_blank"))]
    pub colegio: String,

    #[serde(default, alias = "city")]
    #[validate(custom(function = "not_blank"))]
    pub cidade: String,

    #[serde(default, alias = "project_id")]
    #[validate(range(min = 1, message = "\"projeto_id\" must be a positive integer"))]
    pub projeto_id: Option<i32>,
}

impl Payload for ParticipantPayload {
    const FIELDS: &'static [&'static str] = &["nome", "email", "colegio", "cidade", "projeto_id"];

    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        vec![
            &self.nome as &(dyn ToSql + Sync),
            &self.email as &(dyn ToSql + Sync),
            &self.colegio as &(dyn ToSql + Sync),
            &self.cidade as &(dyn ToSql + Sync),
            &self.projeto_id as &(dyn ToSql + Sync),
        ]
    }
}

impl Resource for Participant {
    type Payload = ParticipantPayload;

    const LABEL: &'static str = "Participante";
    const TABLE: &'static str = "participantes";
    const TAG: &'static str = "Participantes";

    fn id(&self) -> i32 {
        self.id
    }

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            nome: row.try_get("nome")?,
            email: row.try_get("email")?,
            colegio: row.try_get("colegio")?,
            cidade: row.try_get("cidade")?,
            projeto_id: row.try_get("projeto_id")?,
        })
    }

    fn from_payload(id: i32, payload: &ParticipantPayload) -> Self {
        Self {
            id,
            nome: payload.nome.clone(),
            email: payload.email.clone(),
            colegio: payload.colegio.clone(),
            cidade: payload.cidade.clone(),
            projeto_id: payload.projeto_id,
        }
    }
}
