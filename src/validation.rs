//! Request validation gate
//!
//! Extractors that reject malformed input before any handler code runs.
//! Failures surface as [`AppError::Validation`] carrying a single message.

use crate::error::{validation_error, AppError};
use crate::models::Payload;
use axum::{
    extract::{FromRequest, FromRequestParts, Json, Path, Request},
    http::request::Parts,
};
use validator::{ValidationError, ValidationErrors};

/// JSON body decoded into a [`Payload`] and checked against its schema.
///
/// Decoding errors (wrong content type, malformed JSON, a value of the wrong
/// type) and schema errors are both reported as 400.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: Payload,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| validation_error(rejection.body_text()))?;

        data.validate()
            .map_err(|errors| validation_error(first_error_message(T::FIELDS, &errors)))?;

        Ok(ValidatedJson(data))
    }
}

/// `{id}` path parameter.
///
/// A segment that is not an `i32` matches no row; handlers answer 404 for it
/// without a store call.
pub struct IdPath {
    raw: String,
    id: Option<i32>,
}

impl IdPath {
    /// Parsed id, if the segment is a valid `i32`
    pub fn id(&self) -> Option<i32> {
        self.id
    }

    /// Segment as it appeared in the URL
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| validation_error(rejection.body_text()))?;

        let id = raw.trim().parse::<i32>().ok();
        Ok(IdPath { raw, id })
    }
}

/// Message of the first failing field, in `fields` order.
///
/// Within a field a `required` failure outranks format rules. Record-level
/// errors (not tied to a listed field) are reported last.
pub fn first_error_message(fields: &[&str], errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut entries: Vec<_> = field_errors.iter().collect();
    entries.sort_by_key(|(field, _)| {
        let name: &str = field.as_ref();
        fields.iter().position(|f| *f == name).unwrap_or(usize::MAX)
    });

    entries
        .into_iter()
        .find_map(|(field, errs)| {
            errs.iter()
                .find(|err| err.code == "required")
                .or_else(|| errs.first())
                .map(|err| describe(field.as_ref(), err))
        })
        .unwrap_or_else(|| "Request validation failed".to_string())
}

fn describe(field: &str, err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }
    match &*err.code {
        "required" => format!("\"{}\" is required", field),
        "email" => format!("\"{}\" must be a valid email address", field),
        _ => format!("\"{}\" is invalid", field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdvisorPayload, ParticipantPayload, ProjectPayload};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn message_for<T: Payload>(value: serde_json::Value) -> String {
        let payload: T = serde_json::from_value(value).unwrap();
        let errors = payload.validate().unwrap_err();
        first_error_message(T::FIELDS, &errors)
    }

    #[test]
    fn reports_missing_title() {
        let message = message_for::<ProjectPayload>(json!({"descricao": "desc"}));
        assert_eq!(message, "\"titulo\" is required");
    }

    #[test]
    fn follows_declared_field_order() {
        let message = message_for::<AdvisorPayload>(json!({}));
        assert_eq!(message, "\"nome\" is required");

        let message = message_for::<AdvisorPayload>(json!({"nome": "Ana", "email": "ana@x.com"}));
        assert_eq!(message, "\"instituicao\" is required");
    }

    #[test]
    fn field_errors_come_before_record_errors() {
        let message = message_for::<ProjectPayload>(json!({
            "titulo": "Horta",
            "descricao": "",
            "data_inicio": "2024-05-10",
            "data_fim": "2024-01-01"
        }));
        assert_eq!(message, "\"descricao\" is required");

        let message = message_for::<ProjectPayload>(json!({
            "titulo": "Horta",
            "descricao": "Horta escolar",
            "data_inicio": "2024-05-10",
            "data_fim": "2024-01-01"
        }));
        assert_eq!(message, "\"data_fim\" must not be earlier than \"data_inicio\"");
    }

    #[test]
    fn blank_email_is_required_not_malformed() {
        let message = message_for::<AdvisorPayload>(json!({"nome": "Ana", "instituicao": "Tech"}));
        assert_eq!(message, "\"email\" is required");

        let message = message_for::<ParticipantPayload>(json!({
            "nome": "Bia", "email": "", "colegio": "EE Central", "cidade": "Recife"
        }));
        assert_eq!(message, "\"email\" is required");
    }

    #[test]
    fn explicit_messages_win() {
        let message = message_for::<AdvisorPayload>(json!({
            "nome": "Ana", "email": "not-an-email", "instituicao": "Tech"
        }));
        assert_eq!(message, "\"email\" must be a valid email address");
    }
}
