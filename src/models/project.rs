//! Project ("projeto") model

use super::{not_blank, Payload, Resource};
use chrono::NaiveDate;
use postgres_types::ToSql;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Project as stored in `projetos`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(as = Projeto)]
pub struct Project {
    pub id: i32,
    pub titulo: String,
    pub descricao: String,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
}

/// Request body for creating or replacing a project
///
/// Only the four columns below are written; unknown keys are ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_date_range"))]
#[schema(as = ProjetoInput)]
pub struct ProjectPayload {
    #[serde(default, alias = "title")]
    #[validate(custom(function = "not_blank"))]
    pub titulo: String,

    #[serde(default, alias = "description")]
    #[validate(custom(function = "not_blank"))]
    pub descricao: String,

    #[serde(default, alias = "start_date")]
    pub data_inicio: Option<NaiveDate>,

    #[serde(default, alias = "end_date")]
    pub data_fim: Option<NaiveDate>,
}

fn validate_date_range(payload: &ProjectPayload) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (payload.data_inicio, payload.data_fim) {
        if end < start {
            let mut err = ValidationError::new("date_range");
            err.message = Some("\"data_fim\" must not be earlier than \"data_inicio\"".into());
            return Err(err);
        }
    }
    Ok(())
}

impl Payload for ProjectPayload {
    const FIELDS: &'static [&'static str] = &["titulo", "descricao", "data_inicio", "data_fim"];

    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        vec![
            &self.titulo as &(dyn ToSql + Sync),
            &self.descricao as &(dyn ToSql + Sync),
            &self.data_inicio as &(dyn ToSql + Sync),
            &self.data_fim as &(dyn ToSql + Sync),
        ]
    }
}

impl Resource for Project {
    type Payload = ProjectPayload;

    const LABEL: &'static str = "Projeto";
    const TABLE: &'static str = "projetos";
    const TAG: &'static str = "Projetos";

    fn id(&self) -> i32 {
        self.id
    }

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            titulo: row.try_get("titulo")?,
            descricao: row.try_get("descricao")?,
            data_inicio: row.try_get("data_inicio")?,
            data_fim: row.try_get("data_fim")?,
        })
    }

    fn from_payload(id: i32, payload: &ProjectPayload) -> Self {
        Self {
            id,
            titulo: payload.titulo.clone(),
            descricao: payload.descricao.clone(),
            data_inicio: payload.data_inicio,
            data_fim: payload.data_fim,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> ProjectPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn dates_are_optional() {
        let p = payload(json!({"titulo": "Horta", "descricao": "Horta escolar"}));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn missing_title_is_reported() {
        let errors = payload(json!({"descricao": "desc"})).validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("titulo"));
        assert!(!fields.contains_key("descricao"));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let p = payload(json!({
            "titulo": "Horta", "descricao": "Horta escolar",
            "data_inicio": "2024-05-10", "data_fim": "2024-05-01"
        }));
        assert!(p.validate().is_err());
    }

    #[test]
    fn same_day_range_is_accepted() {
        let p = payload(json!({
            "title": "Horta", "description": "Horta escolar",
            "start_date": "2024-05-10", "end_date": "2024-05-10"
        }));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn invalid_calendar_date_does_not_decode() {
        let result = serde_json::from_value::<ProjectPayload>(json!({
            "titulo": "Horta", "descricao": "Horta escolar", "data_inicio": "2024-02-30"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let p = payload(json!({"titulo": "Horta", "descricao": "d", "orcamento": 1200}));
        let project = Project::from_payload(7, &p);
        let value = serde_json::to_value(&project).unwrap();
        assert!(value.get("orcamento").is_none());
        assert_eq!(value["data_fim"], serde_json::Value::Null);
    }
}
