//! Admin console: dashboard, quote requests and admin users.

use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use serde::Deserialize;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::admin_user::AdminRole;
use crate::domain::quote_request::QuoteStatus;
use crate::dto::quotes::{ActionView, MessageView, QuoteRequestView};
use crate::dto::users::{AdminRowView, UserRowView};
use crate::forms::admin_users::AddAdminForm;
use crate::forms::quotes::{AdminMessageForm, StatusForm};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{
    base_context, redirect, render_template, service_error_response, session_context,
};
use crate::services::ServiceError;
use crate::services::admin_users::{grant_admin_role, load_users, toggle_admin};
use crate::services::dashboard::load_dashboard;
use crate::services::quotes::{
    apply_admin_action, list_quote_requests, load_quote_request, post_admin_message,
};

#[get("/admin")]
pub async fn show_dashboard(
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
    let access = ctx.admin_access(repo.get_ref());

    match load_dashboard(repo.get_ref(), access, Utc::now().naive_utc()) {
        Ok(page) => {
            let mut context = base_context(
                &flash_messages,
                Some(&user),
                "admin_dashboard",
                &server_config.auth_service_url,
            );
            context.insert("is_admin", &true);
            context.insert("stats", &page.stats);
            context.insert(
                "latest_requests",
                &page
                    .latest_requests
                    .iter()
                    .map(QuoteRequestView::from)
                    .collect::<Vec<_>>(),
            );
            render_template(&tera, "admin/dashboard.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to the admin console.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to render dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[derive(Deserialize)]
struct QuoteListParams {
    status: Option<String>,
}

#[get("/admin/quotes")]
pub async fn show_quote_requests(
    params: web::Query<QuoteListParams>,
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
    let access = ctx.admin_access(repo.get_ref());

    let page = match list_quote_requests(repo.get_ref(), access, params.status.as_deref()) {
        Ok(page) => page,
        Err(err) => return service_error_response(err, "/admin"),
    };

    let mut context = base_context(
        &flash_messages,
        Some(&user),
        "admin_quotes",
        &server_config.auth_service_url,
    );
    context.insert("is_admin", &true);
    context.insert(
        "requests",
        &page
            .requests
            .iter()
            .map(QuoteRequestView::from)
            .collect::<Vec<_>>(),
    );
    context.insert(
        "statuses",
        &QuoteStatus::ALL.map(QuoteStatus::as_str).to_vec(),
    );
    context.insert("status_filter", &page.status_filter.map(QuoteStatus::as_str));
    render_template(&tera, "admin/quotes.html", &context)
}

#[get("/admin/quotes/{id}")]
pub async fn show_quote_request(
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
    let access = ctx.admin_access(repo.get_ref());

    let page = match load_quote_request(repo.get_ref(), access, id.into_inner()) {
        Ok(page) => page,
        Err(err) => return service_error_response(err, "/admin/quotes"),
    };

    let mut context = base_context(
        &flash_messages,
        Some(&user),
        "admin_quotes",
        &server_config.auth_service_url,
    );
    context.insert("is_admin", &true);
    context.insert(
        "request",
        &QuoteRequestView::from(&page.request).with_requester(page.requester.as_ref()),
    );
    context.insert(
        "messages",
        &page.messages.iter().map(MessageView::from).collect::<Vec<_>>(),
    );
    context.insert(
        "actions",
        &page.actions.into_iter().map(ActionView::from).collect::<Vec<_>>(),
    );
    context.insert("is_closed", &page.request.status.is_terminal());
    render_template(&tera, "admin/quote.html", &context)
}

#[post("/admin/quotes/{id}/message")]
pub async fn post_quote_message(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AdminMessageForm>,
) -> impl Responder {
    let ctx = match session_context(repo.get_ref(), &user, session) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let access = ctx.admin_access(repo.get_ref());
    let id = id.into_inner();
    let back = format!("/admin/quotes/{id}");

    match post_admin_message(repo.get_ref(), access, ctx.user(), id, form) {
        Ok(QuoteStatus::Quoted) => {
            FlashMessage::success("Quote sent to the customer.").send();
            redirect(&back)
        }
        Ok(_) => {
            FlashMessage::success("Message sent.").send();
            redirect(&back)
        }
        Err(err) => service_error_response(err, &back),
    }
}

#[post("/admin/quotes/{id}/status")]
pub async fn update_quote_status(
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
    let access = ctx.admin_access(repo.get_ref());
    let id = id.into_inner();
    let back = format!("/admin/quotes/{id}");

    match apply_admin_action(repo.get_ref(), access, id, form) {
        Ok(request) => {
            FlashMessage::success(format!("Request is now {}.", request.status)).send();
            redirect(&back)
        }
        Err(err) => service_error_response(err, &back),
    }
}

#[get("/admin/users")]
pub async fn show_users(
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
    let access = ctx.admin_access(repo.get_ref());

    let page = match load_users(repo.get_ref(), access) {
        Ok(page) => page,
        Err(err) => return service_error_response(err, "/admin"),
    };

    let mut context = base_context(
        &flash_messages,
        Some(&user),
        "admin_users",
        &server_config.auth_service_url,
    );
    context.insert("is_admin", &true);
    context.insert(
        "users",
        &page.users.iter().map(UserRowView::from).collect::<Vec<_>>(),
    );
    context.insert(
        "admins",
        &page.admins.iter().map(AdminRowView::from).collect::<Vec<_>>(),
    );
    context.insert(
        "roles",
        &page.roles.into_iter().map(AdminRole::as_str).collect::<Vec<_>>(),
    );
    context.insert("can_manage", &page.can_manage);
    render_template(&tera, "admin/users.html", &context)
}

#[post("/admin/users/add")]
pub async fn add_admin_user(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddAdminForm>,
) -> impl Responder {
    let ctx = match session_context(repo.get_ref(), &user, session) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let access = ctx.admin_access(repo.get_ref());

    match grant_admin_role(repo.get_ref(), access, form) {
        Ok(admin) => {
            FlashMessage::success(format!("Granted the {} role.", admin.role)).send();
            redirect("/admin/users")
        }
        Err(err) => service_error_response(err, "/admin/users"),
    }
}

#[post("/admin/users/{id}/toggle")]
pub async fn toggle_admin_user(
    id: web::Path<i32>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let ctx = match session_context(repo.get_ref(), &user, session) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let access = ctx.admin_access(repo.get_ref());

    match toggle_admin(repo.get_ref(), access, ctx.user(), id.into_inner()) {
        Ok(admin) => {
            let state = if admin.is_active { "activated" } else { "deactivated" };
            FlashMessage::success(format!("Admin access {state}.")).send();
            redirect("/admin/users")
        }
        Err(err) => service_error_response(err, "/admin/users"),
    }
}
