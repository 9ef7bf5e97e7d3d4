use actix_identity::Identity;
use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde_json::{Value, json};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::quote_request::ServiceType;
use crate::forms::contact::ContactForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_response};
use crate::services::contact::submit_contact;
use crate::session::forget_admin_access;

fn service_cards() -> Vec<Value> {
    ServiceType::ALL
        .into_iter()
        .map(|service| {
            json!({
                "label": service.label(),
                "slug": service.slug(),
                "summary": service.summary(),
            })
        })
        .collect()
}

async fn static_page(
    template: &str,
    page: &str,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let mut context = base_context(
        &flash_messages,
        user.as_ref(),
        page,
        &server_config.auth_service_url,
    );
    context.insert("services", &service_cards());
    render_template(&tera, template, &context)
}

#[get("/")]
pub async fn show_index(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    static_page("main/index.html", "index", user, flash_messages, server_config, tera).await
}

#[get("/about")]
pub async fn show_about(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    static_page("main/about.html", "about", user, flash_messages, server_config, tera).await
}

#[get("/services")]
pub async fn show_services(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    static_page("main/services.html", "services", user, flash_messages, server_config, tera).await
}

#[get("/services/{slug}")]
pub async fn show_service(
    slug: web::Path<String>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Some(service) = ServiceType::from_slug(&slug) else {
        return HttpResponse::NotFound().finish();
    };

    let mut context = base_context(
        &flash_messages,
        user.as_ref(),
        "services",
        &server_config.auth_service_url,
    );
    context.insert(
        "service",
        &json!({
            "label": service.label(),
            "slug": service.slug(),
            "summary": service.summary(),
        }),
    );
    context.insert("services", &service_cards());
    render_template(&tera, "main/service.html", &context)
}

#[get("/portfolio")]
pub async fn show_portfolio(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    static_page("main/portfolio.html", "portfolio", user, flash_messages, server_config, tera).await
}

#[get("/contact")]
pub async fn show_contact(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    static_page("main/contact.html", "contact", user, flash_messages, server_config, tera).await
}

#[post("/contact")]
pub async fn send_contact(
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ContactForm>,
) -> impl Responder {
    match submit_contact(repo.get_ref(), form) {
        Ok(_) => {
            FlashMessage::success("Thank you! We will get back to you shortly.").send();
            redirect("/contact")
        }
        Err(err) => service_error_response(err, "/contact"),
    }
}

#[get("/na")]
pub async fn not_assigned(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        Some(&user),
        "na",
        &server_config.auth_service_url,
    );
    render_template(&tera, "main/not_assigned.html", &context)
}

#[post("/logout")]
pub async fn logout(user: Identity, session: Session) -> impl Responder {
    forget_admin_access(&session);
    user.logout();
    redirect("/")
}
