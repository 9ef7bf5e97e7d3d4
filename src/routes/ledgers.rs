//! Invoice and quote builder pages.

use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use serde::Deserialize;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::admin_user::AdminAccess;
use crate::domain::ledger::{Ledger, LedgerKind};
use crate::domain::types::LedgerId;
use crate::dto::ledgers::{LedgerEditorView, LedgerRowView};
use crate::forms::ledger::LedgerForm;
use crate::models::config::ServerConfig;
use crate::render::PrintRenderer;
use crate::repository::DieselRepository;
use crate::repository::local::JsonLedgerStore;
use crate::routes::{
    base_context, redirect, render_template, service_error_response, session_context,
};
use crate::services::ServiceError;
use crate::services::ledgers::{
    LedgerSubmission, SaveOutcome, list_ledgers, load_ledger, new_ledger, submit_ledger,
};

fn parse_kind(kinds: &str) -> Option<LedgerKind> {
    LedgerKind::from_plural(kinds)
}

fn builder_url(ledger: &Ledger) -> String {
    format!("/admin/documents/{}/new?id={}", ledger.kind.plural(), ledger.id)
}

fn render_builder(
    ledger: &Ledger,
    user: &AuthenticatedUser,
    flash_messages: &IncomingFlashMessages,
    server_config: &ServerConfig,
    tera: &Tera,
) -> HttpResponse {
    let mut context = base_context(
        flash_messages,
        Some(user),
        &format!("admin_{}", ledger.kind.plural()),
        &server_config.auth_service_url,
    );
    context.insert("is_admin", &true);
    context.insert("ledger", &LedgerEditorView::from(ledger));
    render_template(tera, "admin/builder.html", &context)
}

/// Resolves the admin decision for ledger pages.
fn ledger_access(
    repo: &DieselRepository,
    user: &AuthenticatedUser,
    session: Session,
) -> Result<AdminAccess, HttpResponse> {
    let ctx = session_context(repo, user, session)?;
    Ok(ctx.admin_access(repo))
}

#[get("/admin/documents/{kinds}")]
pub async fn show_ledgers(
    kinds: web::Path<String>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    local: web::Data<JsonLedgerStore>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Some(kind) = parse_kind(&kinds) else {
        return HttpResponse::NotFound().finish();
    };
    let access = match ledger_access(repo.get_ref(), &user, session) {
        Ok(access) => access,
        Err(response) => return response,
    };

    let ledgers = match list_ledgers(repo.get_ref(), local.get_ref(), access, kind) {
        Ok(ledgers) => ledgers,
        Err(err) => return service_error_response(err, "/admin"),
    };

    let mut context = base_context(
        &flash_messages,
        Some(&user),
        &format!("admin_{}", kind.plural()),
        &server_config.auth_service_url,
    );
    context.insert("is_admin", &true);
    context.insert("kind", kind.as_str());
    context.insert("kinds", kind.plural());
    context.insert("title", kind.document_title());
    context.insert(
        "ledgers",
        &ledgers.iter().map(LedgerRowView::from).collect::<Vec<_>>(),
    );
    render_template(&tera, "admin/ledgers.html", &context)
}

#[derive(Deserialize)]
struct BuilderParams {
    id: Option<String>,
}

#[get("/admin/documents/{kinds}/new")]
pub async fn show_builder(
    kinds: web::Path<String>,
    params: web::Query<BuilderParams>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    local: web::Data<JsonLedgerStore>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Some(kind) = parse_kind(&kinds) else {
        return HttpResponse::NotFound().finish();
    };
    let access = match ledger_access(repo.get_ref(), &user, session) {
        Ok(access) => access,
        Err(response) => return response,
    };
    let list_url = format!("/admin/documents/{}", kind.plural());

    let existing = params
        .id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .map(LedgerId::new);

    let ledger = match existing {
        None => new_ledger(access, kind, Utc::now()),
        Some(Ok(id)) => load_ledger(repo.get_ref(), local.get_ref(), access, kind, &id),
        Some(Err(_)) => Err(ServiceError::NotFound),
    };

    match ledger {
        Ok(ledger) => render_builder(&ledger, &user, &flash_messages, &server_config, &tera),
        Err(err) => service_error_response(err, &list_url),
    }
}

#[post("/admin/documents/{kinds}/save")]
pub async fn save_ledger(
    kinds: web::Path<String>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    local: web::Data<JsonLedgerStore>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    body: web::Bytes,
) -> impl Responder {
    let Some(kind) = parse_kind(&kinds) else {
        return HttpResponse::NotFound().finish();
    };
    let access = match ledger_access(repo.get_ref(), &user, session) {
        Ok(access) => access,
        Err(response) => return response,
    };
    let new_url = format!("/admin/documents/{}/new", kind.plural());

    let now = Utc::now();
    let payload = match LedgerForm::parse(&body).and_then(|form| form.into_payload(kind, now)) {
        Ok(payload) => payload,
        Err(err) => return service_error_response(err.into(), &new_url),
    };

    match submit_ledger(repo.get_ref(), local.get_ref(), access, payload, now) {
        Ok(LedgerSubmission::Edited(ledger)) => {
            render_builder(&ledger, &user, &flash_messages, &server_config, &tera)
        }
        Ok(LedgerSubmission::Saved(SaveOutcome::SavedRemote(ledger))) => {
            FlashMessage::success(format!("{} saved.", kind.document_title())).send();
            redirect(&builder_url(&ledger))
        }
        Ok(LedgerSubmission::Saved(SaveOutcome::SavedLocalOnly { ledger, reason })) => {
            FlashMessage::warning(format!(
                "Saved on this server only; the database is unavailable ({reason})."
            ))
            .send();
            redirect(&builder_url(&ledger))
        }
        Ok(LedgerSubmission::Saved(SaveOutcome::Failed { remote, local })) => {
            log::error!("Ledger save failed: database: {remote}; local store: {local}");
            FlashMessage::error("Could not save the document. Please try again.").send();
            redirect(&new_url)
        }
        Err(err) => service_error_response(err, &new_url),
    }
}

#[get("/admin/documents/{kinds}/{id}/print")]
pub async fn print_ledger(
    path: web::Path<(String, String)>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    local: web::Data<JsonLedgerStore>,
    renderer: web::Data<PrintRenderer>,
) -> impl Responder {
    let (kinds, id) = path.into_inner();
    let Some(kind) = parse_kind(&kinds) else {
        return HttpResponse::NotFound().finish();
    };
    let Ok(id) = LedgerId::new(id) else {
        return HttpResponse::NotFound().finish();
    };
    let access = match ledger_access(repo.get_ref(), &user, session) {
        Ok(access) => access,
        Err(response) => return response,
    };

    let ledger = match load_ledger(repo.get_ref(), local.get_ref(), access, kind, &id) {
        Ok(ledger) => ledger,
        Err(err) => return service_error_response(err, &format!("/admin/documents/{kinds}")),
    };

    match renderer.render(&ledger) {
        Ok(html) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(err) => {
            log::error!("Failed to render {} {}: {err}", ledger.kind, ledger.id);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/documents/{kinds}/{id}.json")]
pub async fn export_ledger(
    path: web::Path<(String, String)>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    local: web::Data<JsonLedgerStore>,
) -> impl Responder {
    let (kinds, id) = path.into_inner();
    let Some(kind) = parse_kind(&kinds) else {
        return HttpResponse::NotFound().finish();
    };
    let Ok(id) = LedgerId::new(id) else {
        return HttpResponse::NotFound().finish();
    };
    let access = match ledger_access(repo.get_ref(), &user, session) {
        Ok(access) => access,
        Err(response) => return response,
    };

    match load_ledger(repo.get_ref(), local.get_ref(), access, kind, &id) {
        Ok(ledger) => HttpResponse::Ok().json(ledger),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Unauthorized) => HttpResponse::Forbidden().finish(),
        Err(err) => {
            log::error!("Failed to export ledger {id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
