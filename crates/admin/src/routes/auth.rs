//! Login and logout handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::auth::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;
use tower_sessions::Session;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

/// Login form body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Display the login page.
#[instrument]
pub async fn login_page() -> impl IntoResponse {
    LoginTemplate { error: None }
}

/// Handle an email/password login attempt.
///
/// All failures render the same message; the form does not reveal whether
/// the email exists.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let service = AuthService::new(state.pool());

    match service.login(&form.email, &form.password).await {
        Ok(user) => {
            let admin = CurrentAdmin {
                id: user.id,
                email: user.email.clone(),
                name: user.name,
            };
            if let Err(e) = set_current_admin(&session, &admin).await {
                tracing::error!("failed to store admin session: {e}");
                return LoginTemplate {
                    error: Some("No pudimos iniciar tu sesión. Intenta de nuevo.".to_owned()),
                }
                .into_response();
            }
            set_sentry_user(&admin.id.to_string(), Some(&user.email));
            tracing::info!(admin = %user.email, "admin logged in");
            Redirect::to("/").into_response()
        }
        Err(AuthError::Repository(e)) => {
            tracing::error!("login query failed: {e}");
            LoginTemplate {
                error: Some("No pudimos iniciar tu sesión. Intenta de nuevo.".to_owned()),
            }
            .into_response()
        }
        Err(_) => LoginTemplate {
            error: Some("Correo o contraseña incorrectos.".to_owned()),
        }
        .into_response(),
    }
}

/// Log the current admin out.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::warn!("failed to clear admin session: {e}");
    }
    clear_sentry_user();
    Redirect::to("/login").into_response()
}
