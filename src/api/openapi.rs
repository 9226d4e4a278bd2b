//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:5000/docs`
//! - OpenAPI JSON: `http://localhost:5000/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::error::ErrorResponse;
use crate::api::handlers::HealthResponse;
use crate::api::types::{AnswerChanged, AnswerCreated, QuestionCreated, QuestionDeleted};
use crate::auth::LoginResponse;
use crate::auth::handlers::CreateAdminResponse;
use crate::error::FieldError;
use crate::forum::models::{AdminInfo, Answer, Question};
use crate::forum::validation::{AnswerInput, Credentials, NewQuestion};

/// JWT bearer security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            let scheme = HttpBuilder::new()
                .scheme(HttpAuthScheme::Bearer)
                .bearer_format("JWT")
                .description(Some("Token from POST /api/auth/login"))
                .build();
            components.add_security_scheme("bearer_auth", SecurityScheme::Http(scheme));
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Q&A Board API",
        version = "1.0.0",
        description = "Public questions, admin answers."
    ),
    servers(
        (url = "http://localhost:5000", description = "Development"),
    ),
    paths(
        crate::api::handlers::health::health_check,
        crate::auth::handlers::login,
        crate::auth::handlers::create_admin,
        crate::api::handlers::questions::list_questions,
        crate::api::handlers::questions::get_question,
        crate::api::handlers::questions::create_question,
        crate::api::handlers::questions::delete_question,
        crate::api::handlers::answers::create_answer,
        crate::api::handlers::answers::update_answer,
        crate::api::handlers::answers::delete_answer,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            FieldError,
            Credentials,
            LoginResponse,
            CreateAdminResponse,
            AdminInfo,
            Question,
            Answer,
            NewQuestion,
            AnswerInput,
            QuestionCreated,
            QuestionDeleted,
            AnswerCreated,
            AnswerChanged,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Questions", description = "Public questions; deletion requires an admin token"),
        (name = "Answers", description = "Admin answers; only the author may edit or delete"),
        (name = "Auth", description = "Admin login"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;
