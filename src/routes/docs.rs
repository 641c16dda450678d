//! OpenAPI document and Swagger UI, served under `/api-docs`
//!
//! The resource handlers are generic, so their operations are described with
//! the `utoipa` builders once per [`Resource`] instead of per-function macros.

use crate::error::ErrorResponse;
use crate::models::{
    Advisor, AdvisorPayload, MessageResponse, Participant, ParticipantPayload, Project,
    ProjectPayload, Resource,
};
use utoipa::openapi::{
    content::Content,
    path::{
        HttpMethod, OperationBuilder, Parameter, ParameterBuilder, ParameterIn, PathItemBuilder,
        PathsBuilder,
    },
    request_body::{RequestBody, RequestBodyBuilder},
    response::{Response, ResponseBuilder},
    schema::{ArrayBuilder, ObjectBuilder, Schema, Type},
    Ref, RefOr, Required,
};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub const DOCS_PATH: &str = "/api-docs";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Solve for Tomorrow API",
        description = "Manages advisors, participants and projects"
    ),
    components(schemas(
        Advisor,
        AdvisorPayload,
        Participant,
        ParticipantPayload,
        Project,
        ProjectPayload,
        MessageResponse,
        ErrorResponse
    )),
    tags(
        (name = Advisor::TAG, description = "Advisor management endpoints"),
        (name = Participant::TAG, description = "Participant management endpoints"),
        (name = Project::TAG, description = "Project management endpoints")
    )
)]
pub struct ApiDoc;

/// Full document: the derived components plus one path set per resource
pub fn api_doc() -> utoipa::openapi::OpenApi {
    let paths = PathsBuilder::new();
    let paths = resource_paths::<Advisor>(paths);
    let paths = resource_paths::<Participant>(paths);
    let paths = resource_paths::<Project>(paths);

    let mut doc = ApiDoc::openapi();
    doc.paths = paths.build();
    doc
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new(DOCS_PATH).url(OPENAPI_JSON, api_doc())
}

fn resource_paths<R: Resource>(paths: PathsBuilder) -> PathsBuilder {
    let record = schema_ref(R::name().into_owned());
    let input = schema_ref(<R::Payload as ToSchema>::name().into_owned());
    let records = RefOr::T(Schema::Array(ArrayBuilder::new().items(record.clone()).build()));

    let list = operation::<R>("list", format!("List every {}", R::LABEL))
        .response("200", json_response("All records, ordered by id", records))
        .build();

    let create = operation::<R>("create", format!("Create a {}", R::LABEL))
        .request_body(Some(json_body(input.clone())))
        .response("201", json_response("The stored record", record.clone()))
        .response("400", error_response("Invalid input"))
        .build();

    let fetch = item_operation::<R>("get", format!("Get a {} by id", R::LABEL))
        .response("200", json_response("The record", record))
        .build();

    let update = item_operation::<R>("update", format!("Replace a {}", R::LABEL))
        .request_body(Some(json_body(input)))
        .response("200", message_response("Record replaced"))
        .response("400", error_response("Invalid input"))
        .build();

    let delete = item_operation::<R>("delete", format!("Delete a {}", R::LABEL))
        .response("200", message_response("Record deleted"))
        .build();

    paths
        .path(
            format!("/{}", R::TABLE),
            PathItemBuilder::new()
                .operation(HttpMethod::Get, list)
                .operation(HttpMethod::Post, create)
                .build(),
        )
        .path(
            format!("/{}/{{id}}", R::TABLE),
            PathItemBuilder::new()
                .operation(HttpMethod::Get, fetch)
                .operation(HttpMethod::Put, update)
                .operation(HttpMethod::Delete, delete)
                .build(),
        )
}

fn operation<R: Resource>(action: &str, summary: String) -> OperationBuilder {
    OperationBuilder::new()
        .tag(R::TAG)
        .operation_id(Some(format!("{}_{}", action, R::TABLE)))
        .summary(Some(summary))
        .response("500", error_response("Store failure"))
}

fn item_operation<R: Resource>(action: &str, summary: String) -> OperationBuilder {
    operation::<R>(action, summary)
        .parameter(id_parameter())
        .response("404", error_response("No record with this id"))
}

fn id_parameter() -> Parameter {
    let integer = ObjectBuilder::new().schema_type(Type::Integer).build();
    ParameterBuilder::new()
        .name("id")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .schema(Some(RefOr::T(Schema::Object(integer))))
        .build()
}

fn schema_ref(name: String) -> RefOr<Schema> {
    RefOr::Ref(Ref::from_schema_name(name))
}

fn json_body(schema: RefOr<Schema>) -> RequestBody {
    RequestBodyBuilder::new()
        .content("application/json", Content::new(Some(schema)))
        .required(Some(Required::True))
        .build()
}

fn json_response(description: &str, schema: RefOr<Schema>) -> RefOr<Response> {
    let response = ResponseBuilder::new()
        .description(description)
        .content("application/json", Content::new(Some(schema)))
        .build();
    RefOr::T(response)
}

fn message_response(description: &str) -> RefOr<Response> {
    json_response(description, schema_ref(MessageResponse::name().into_owned()))
}

fn error_response(description: &str) -> RefOr<Response> {
    json_response(description, schema_ref(ErrorResponse::name().into_owned()))
}
