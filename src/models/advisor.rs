//! Advisor ("orientador") model

use super::{not_blank, Payload, Resource};
use postgres_types::ToSql;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use utoipa::ToSchema;
use validator::Validate;

/// Advisor as stored in `orientadores`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(as = Orientador)]
pub struct Advisor {
    pub id: i32,
    pub nome: String,
    #[schema(format = "email")]
    pub email: String,
    pub instituicao: String,
}

/// Request body for creating or replacing an advisor
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(as = OrientadorInput)]
pub struct AdvisorPayload {
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

    #[serde(default, alias = "institution")]
    #[validate(custom(function = "not_blank"))]
    pub instituicao: String,
}

impl Payload for AdvisorPayload {
    const FIELDS: &'static [&'static str] = &["nome", "email", "instituicao"];

    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        vec![
            &self.nome as &(dyn ToSql + Sync),
            &self.email as &(dyn ToSql + Sync),
            &self.instituicao as &(dyn ToSql + Sync),
        ]
    }
}

impl Resource for Advisor {
    type Payload = AdvisorPayload;

    const LABEL: &'static str = "Orientador";
    const TABLE: &'static str = "orientadores";
    const TAG: &'static str = "Orientadores";

    fn id(&self) -> i32 {
        self.id
    }

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            nome: row.try_get("nome")?,
            email: row.try_get("email")?,
            instituicao: row.try_get("instituicao")?,
        })
    }

    fn from_payload(id: i32, payload: &AdvisorPayload) -> Self {
        Self {
            id,
            nome: payload.nome.clone(),
            email: payload.email.clone(),
            instituicao: payload.instituicao.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> AdvisorPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn accepts_english_field_names() {
        let p = payload(json!({"name": "Ana", "email": "ana@x.com", "institution": "Tech"}));
        assert!(p.validate().is_ok());
        assert_eq!(
            Advisor::from_payload(1, &p),
            Advisor {
                id: 1,
                nome: "Ana".into(),
                email: "ana@x.com".into(),
                instituicao: "Tech".into(),
            }
        );
    }

    #[test]
    fn rejects_blank_email() {
        let p = payload(json!({"nome": "Ana", "email": "  ", "instituicao": "Tech"}));
        let errors = p.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn rejects_malformed_email() {
        let p = payload(json!({"nome": "Ana", "email": "ana.at.x", "instituicao": "Tech"}));
        assert!(p.validate().is_err());
    }

    #[test]
    fn missing_fields_are_required() {
        let errors = payload(json!({})).validate().unwrap_err();
        let fields = errors.field_errors();
        for field in AdvisorPayload::FIELDS {
            assert!(fields.contains_key(*field), "{} should be reported", field);
        }
    }

    #[test]
    fn params_follow_field_order() {
        let p = payload(json!({"nome": "Ana", "email": "ana@x.com", "instituicao": "Tech"}));
        assert_eq!(p.params().len(), AdvisorPayload::FIELDS.len());
    }
}
