use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;
use crate::services::auth_service::SESSION_COOKIE;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
            );
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::wheel::list_segments,
        handlers::wheel::create_segment,
        handlers::wheel::update_segment,
        handlers::wheel::delete_segment,
        handlers::ticket::list_tickets,
        handlers::ticket::create_ticket,
        handlers::ticket::create_batch,
        handlers::ticket::list_winners,
        handlers::spin::spin,
        handlers::setting::list_settings,
        handlers::setting::update_setting,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::get_user,
        handlers::auth::change_password,
        handlers::health::health,
    ),
    components(
        schemas(
            WheelSegmentResponse,
            CreateSegmentRequest,
            UpdateSegmentRequest,
            TicketResponse,
            CreateTicketRequest,
            BatchCreateTicketsRequest,
            WinnerResponse,
            SpinRequest,
            SpinResponse,
            SettingResponse,
            UpdateSettingRequest,
            UserResponse,
            LoginRequest,
            AuthResponse,
            ChangePasswordRequest,
            HealthResponse,
            ApiError,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "wheel", description = "Wheel segment API"),
        (name = "tickets", description = "Ticket management API"),
        (name = "spin", description = "Ticket redemption API"),
        (name = "settings", description = "Site settings API"),
        (name = "auth", description = "Authentication API"),
        (name = "health", description = "Health check"),
    ),
    info(
        title = "Prize Wheel API",
        version = "1.0.0",
        description = "Prize wheel backend REST API documentation"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
