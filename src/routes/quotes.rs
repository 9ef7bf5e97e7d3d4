//! Customer-facing quote request pages.

use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde_json::json;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::quote_request::{QuoteStatus, ServiceType};
use crate::dto::quotes::{ActionView, MessageView, QuoteRequestView};
use crate::forms::quote_request::QuoteRequestForm;
use crate::forms::quotes::{MessageForm, StatusForm};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{
    base_context, redirect, render_template, service_error_response, session_context,
};
use crate::services::quotes::{
    apply_customer_action, list_my_quotes, load_my_quote, post_customer_message,
    submit_quote_request,
};

#[derive(serde::Deserialize)]
struct QuoteRequestParams {
    service: Option<String>,
}

#[get("/quote-request")]
pub async fn show_quote_request(
    params: web::Query<QuoteRequestParams>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let services = ServiceType::ALL
        .into_iter()
        .map(|service| json!({ "label": service.label(), "slug": service.slug() }))
        .collect::<Vec<_>>();
    let selected = params
        .service
        .as_deref()
        .and_then(ServiceType::from_slug)
        .map(ServiceType::label);

    let mut context = base_context(
        &flash_messages,
        Some(&user),
        "quote_request",
        &server_config.auth_service_url,
    );
    context.insert("services", &services);
    context.insert("selected_service", &selected);
    render_template(&tera, "quotes/request.html", &context)
}

#[post("/quote-request")]
pub async fn create_quote_request(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<QuoteRequestForm>,
) -> impl Responder {
    let ctx = match session_context(repo.get_ref(), &user, session) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    match submit_quote_request(repo.get_ref(), ctx.user(), form) {
        Ok(request) => {
            FlashMessage::success("Your quote request has been submitted.").send();
            redirect(&format!("/my-quotes/{}", request.id))
        }
        Err(err) => service_error_response(err, "/quote-request"),
    }
}

#[get("/my-quotes")]
pub async fn show_my_quotes(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let ctx = match session_context(repo.get_ref(), &user, session) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let requests = match list_my_quotes(repo.get_ref(), ctx.user()) {
        Ok(requests) => requests,
        Err(err) => return service_error_response(err, "/"),
    };
    let requests = requests
        .iter()
        .map(QuoteRequestView::from)
        .collect::<Vec<_>>();

    let mut context = base_context(
        &flash_messages,
        Some(&user),
        "my_quotes",
        &server_config.auth_service_url,
    );
    context.insert("is_admin", &ctx.admin_access(repo.get_ref()).is_granted());
    context.insert("requests", &requests);
    render_template(&tera, "quotes/list.html", &context)
}

#[get("/my-quotes/{id}")]
pub async fn show_my_quote(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let ctx = match session_context(repo.get_ref(), &user, session) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let page = match load_my_quote(repo.get_ref(), ctx.user(), id.into_inner()) {
        Ok(page) => page,
        Err(err) => return service_error_response(err, "/my-quotes"),
    };

    let mut context = base_context(
        &flash_messages,
        Some(&user),
        "my_quotes",
        &server_config.auth_service_url,
    );
    context.insert("is_admin", &ctx.admin_access(repo.get_ref()).is_granted());
    context.insert("request", &QuoteRequestView::from(&page.request));
    context.insert(
        "messages",
        &page.messages.iter().map(MessageView::from).collect::<Vec<_>>(),
    );
    context.insert(
        "actions",
        &page.actions.into_iter().map(ActionView::from).collect::<Vec<_>>(),
    );
    context.insert("is_closed", &page.request.status.is_terminal());
    context.insert("is_quoted", &(page.request.status == QuoteStatus::Quoted));
    render_template(&tera, "quotes/detail.html", &context)
}

#[post("/my-quotes/{id}/message")]
pub async fn post_my_quote_message(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<MessageForm>,
) -> impl Responder {
    let ctx = match session_context(repo.get_ref(), &user, session) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let id = id.into_inner();
    let back = format!("/my-quotes/{id}");

    match post_customer_message(repo.get_ref(), ctx.user(), id, form) {
        Ok(_) => {
            FlashMessage::success("Message sent.").send();
            redirect(&back)
        }
        Err(err) => service_error_response(err, &back),
    }
}

#[post("/my-quotes/{id}/status")]
pub async fn update_my_quote_status(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<StatusForm>,
) -> impl Responder {
    let ctx = match session_context(repo.get_ref(), &user, session) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let id = id.into_inner();
    let back = format!("/my-quotes/{id}");

    match apply_customer_action(repo.get_ref(), ctx.user(), id, form) {
        Ok(request) => {
            FlashMessage::success(format!("Request is now {}.", request.status)).send();
            redirect(&back)
        }
        Err(err) => service_error_response(err, &back),
    }
}
