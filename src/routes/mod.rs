//! HTTP handlers and the helpers they share.

use actix_session::Session;
use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::users::sync_user;
use crate::session::SessionContext;

pub mod admin;
pub mod ledgers;
pub mod main;
pub mod quotes;

/// Maps flash levels to Bootstrap alert classes.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Context every page starts from.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    current_page: &str,
    home_url: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &user);
    context.insert("display_name", &user.map(AuthenticatedUser::display_name));
    context.insert("current_page", current_page);
    context.insert("home_url", home_url);
    context.insert("is_admin", &false);
    context
}

/// Syncs the signed-in user and wraps them with the session cache.
pub(crate) fn session_context(
    repo: &DieselRepository,
    user: &AuthenticatedUser,
    session: Session,
) -> Result<SessionContext, HttpResponse> {
    match sync_user(repo, user) {
        Ok(stored) => Ok(SessionContext::new(session, stored)),
        Err(ServiceError::Unauthorized) => Err(HttpResponse::Unauthorized().finish()),
        Err(err) => {
            log::error!("Failed to load session user: {err}");
            Err(HttpResponse::InternalServerError().finish())
        }
    }
}

/// Flash-and-redirect handling shared by form handlers.
pub(crate) fn service_error_response(err: ServiceError, back: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            FlashMessage::error("You do not have access to that page.").send();
            redirect("/na")
        }
        ServiceError::NotFound => {
            FlashMessage::error("Not found.").send();
            redirect(back)
        }
        ServiceError::Form(message) | ServiceError::InvalidTransition(message) => {
            FlashMessage::error(message).send();
            redirect(back)
        }
        ServiceError::TypeConstraint(message) => {
            FlashMessage::error(format!("Invalid input: {message}")).send();
            redirect(back)
        }
        err => {
            log::error!("Request failed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
