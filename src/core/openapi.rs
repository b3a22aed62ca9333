use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{self, dtos as auth_dtos, model as auth_model};
use crate::features::notifications::{
    dtos as notifications_dtos, handlers as notifications_handlers,
    models as notifications_models,
};
use crate::features::packages::{dtos as packages_dtos, handlers as packages_handlers};
use crate::features::patients::{dtos as patients_dtos, handlers as patients_handlers};
use crate::features::questions::{
    dtos as questions_dtos, handlers as questions_handlers, models as questions_models,
};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::get_me,
        // Packages (public)
        packages_handlers::list_packages,
        // Account administration
        users_handlers::list_users,
        users_handlers::approve_user,
        users_handlers::set_package,
        users_handlers::delete_user,
        // Patients
        patients_handlers::create_patient,
        patients_handlers::list_patients,
        patients_handlers::update_patient,
        patients_handlers::delete_patient,
        // Questions
        questions_handlers::create_question,
        questions_handlers::list_questions,
        questions_handlers::list_pending_questions,
        questions_handlers::get_question,
        questions_handlers::edit_question,
        questions_handlers::answer_question,
        questions_handlers::update_question_status,
        questions_handlers::delete_question,
        questions_handlers::list_user_questions,
        // Notifications
        notifications_handlers::list_notifications,
        notifications_handlers::get_unread_count,
        notifications_handlers::clear_bell,
        notifications_handlers::mark_notification_read,
    ),
    components(
        schemas(
            Meta,
            auth_model::Role,
            // Auth
            auth_dtos::RegisterRequestDto,
            auth_dtos::LoginRequestDto,
            auth_dtos::AuthResponseDto,
            auth_dtos::MeResponseDto,
            ApiResponse<auth_dtos::AuthResponseDto>,
            ApiResponse<auth_dtos::MeResponseDto>,
            // Users
            users_dtos::UserResponseDto,
            users_dtos::PackageTier,
            users_dtos::SetPackageDto,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            // Packages
            packages_dtos::PackageResponseDto,
            ApiResponse<Vec<packages_dtos::PackageResponseDto>>,
            // Patients
            patients_dtos::Confirmation,
            patients_dtos::PatientRequestDto,
            patients_dtos::PatientResponseDto,
            ApiResponse<patients_dtos::PatientResponseDto>,
            ApiResponse<Vec<patients_dtos::PatientResponseDto>>,
            // Questions
            questions_models::QuestionStatus,
            questions_models::QuestionSort,
            questions_models::ReadStatus,
            questions_models::EditEntry,
            questions_dtos::CreateQuestionDto,
            questions_dtos::EditContentDto,
            questions_dtos::AnswerDto,
            questions_dtos::UpdateStatusDto,
            questions_dtos::QuestionResponseDto,
            ApiResponse<questions_dtos::QuestionResponseDto>,
            ApiResponse<Vec<questions_dtos::QuestionResponseDto>>,
            // Notifications
            notifications_models::NotificationType,
            notifications_dtos::NotificationResponseDto,
            notifications_dtos::UnreadCountResponseDto,
            notifications_dtos::ClearBellResponseDto,
            ApiResponse<Vec<notifications_dtos::NotificationResponseDto>>,
            ApiResponse<notifications_dtos::UnreadCountResponseDto>,
            ApiResponse<notifications_dtos::ClearBellResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and token introspection"),
        (name = "packages", description = "Subscription packages (public)"),
        (name = "admin", description = "Account administration (admin only)"),
        (name = "patients", description = "Patient records"),
        (name = "questions", description = "Consultation questions and answers"),
        (name = "notifications", description = "Notification center and bell indicator"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Dental Consult API",
        version = "0.1.0",
        description = "API documentation for the dental consultation backend",
    )
)]
pub struct ApiDoc;

/// Adds the Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
