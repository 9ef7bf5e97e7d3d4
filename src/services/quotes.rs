//! Quote request workflows for customers and the admin console.

use crate::domain::admin_user::AdminAccess;
use crate::domain::quote_message::{NewQuoteMessage, QuoteMessage};
use crate::domain::quote_request::{
    QuoteAction, QuoteRequest, QuoteRequestWithUser, QuoteStatus,
};
use crate::domain::types::{MessageText, QuoteRequestId};
use crate::domain::user::User;
use crate::forms::quote_request::{QuoteRequestForm, QuoteRequestPayload};
use crate::forms::quotes::{AdminMessageForm, AdminMessagePayload, MessageForm, StatusForm};
use crate::repository::errors::RepositoryError;
use crate::repository::{QuoteRequestListQuery, QuoteRequestReader, QuoteRequestWriter, UserReader};
use crate::services::auth::require_admin;
use crate::services::{ServiceError, ServiceResult};

/// Actions a customer may take on their own request.
pub const CUSTOMER_ACTIONS: [QuoteAction; 2] = [QuoteAction::Accept, QuoteAction::Cancel];

/// A request with its message thread and the actions open to the viewer.
#[derive(Debug)]
pub struct QuoteThreadPageData {
    pub request: QuoteRequest,
    pub requester: Option<User>,
    pub messages: Vec<QuoteMessage>,
    pub actions: Vec<QuoteAction>,
}

#[derive(Debug)]
pub struct QuoteListPageData {
    pub requests: Vec<QuoteRequestWithUser>,
    pub status_filter: Option<QuoteStatus>,
}

fn request_id(id: i32) -> ServiceResult<QuoteRequestId> {
    QuoteRequestId::new(id).map_err(|_| ServiceError::NotFound)
}

fn fetch_request<R>(repo: &R, id: QuoteRequestId) -> ServiceResult<QuoteRequest>
where
    R: QuoteRequestReader + ?Sized,
{
    repo.get_quote_request(id)
        .map_err(|err| {
            log::error!("Failed to load quote request {id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)
}

/// Request owned by `user`; other users' requests are reported missing.
fn owned_request<R>(repo: &R, user: &User, id: i32) -> ServiceResult<QuoteRequest>
where
    R: QuoteRequestReader + ?Sized,
{
    let request = fetch_request(repo, request_id(id)?)?;
    if request.user_id != user.id {
        return Err(ServiceError::NotFound);
    }
    Ok(request)
}

/// Applies `action` to `request` and stores the move together with `message`.
fn transition<R>(
    repo: &R,
    request: &QuoteRequest,
    action: QuoteAction,
    message: Option<&NewQuoteMessage>,
) -> ServiceResult<QuoteRequest>
where
    R: QuoteRequestWriter + ?Sized,
{
    let next = request.status.apply(action)?;

    repo.transition_quote_request(request.id, request.status, next, message)
        .map_err(|err| match err {
            RepositoryError::ConstraintViolation(_) => ServiceError::InvalidTransition(format!(
                "Request #{} changed while you were editing it.",
                request.id
            )),
            other => {
                log::error!("Failed to move quote request {} to {next}: {other}", request.id);
                ServiceError::from(other)
            }
        })
}

fn customer_actions(status: QuoteStatus) -> Vec<QuoteAction> {
    status
        .available_actions()
        .into_iter()
        .filter(|action| CUSTOMER_ACTIONS.contains(action))
        .collect()
}

/// Stores a new `pending` request for `user`.
pub fn submit_quote_request<R>(
    repo: &R,
    user: &User,
    form: QuoteRequestForm,
) -> ServiceResult<QuoteRequest>
where
    R: QuoteRequestWriter + ?Sized,
{
    let payload = QuoteRequestPayload::try_from(form)?;
    let new_request = payload.into_domain(user.id);

    repo.create_quote_request(&new_request).map_err(|err| {
        log::error!("Failed to create quote request for user {}: {err}", user.id);
        ServiceError::from(err)
    })
}

/// The user's own requests, newest first.
pub fn list_my_quotes<R>(repo: &R, user: &User) -> ServiceResult<Vec<QuoteRequest>>
where
    R: QuoteRequestReader + ?Sized,
{
    let requests = repo
        .list_quote_requests(QuoteRequestListQuery::new().user(user.id))
        .map_err(|err| {
            log::error!("Failed to list quote requests of user {}: {err}", user.id);
            err
        })?;

    Ok(requests.into_iter().map(|row| row.request).collect())
}

pub fn load_my_quote<R>(repo: &R, user: &User, id: i32) -> ServiceResult<QuoteThreadPageData>
where
    R: QuoteRequestReader + ?Sized,
{
    let request = owned_request(repo, user, id)?;
    let messages = repo.list_quote_messages(request.id)?;
    let actions = customer_actions(request.status);

    Ok(QuoteThreadPageData {
        request,
        requester: Some(user.clone()),
        messages,
        actions,
    })
}

pub fn post_customer_message<R>(
    repo: &R,
    user: &User,
    id: i32,
    form: MessageForm,
) -> ServiceResult<QuoteMessage>
where
    R: QuoteRequestReader + QuoteRequestWriter + ?Sized,
{
    let request = owned_request(repo, user, id)?;
    let text = MessageText::try_from(form)?;
    let message = NewQuoteMessage::from_customer(request.id, user.id, text);

    repo.add_quote_message(&message).map_err(|err| {
        log::error!("Failed to post message on request {}: {err}", request.id);
        ServiceError::from(err)
    })
}

/// Accept or cancel one of the user's own requests.
pub fn apply_customer_action<R>(
    repo: &R,
    user: &User,
    id: i32,
    form: StatusForm,
) -> ServiceResult<QuoteRequest>
where
    R: QuoteRequestReader + QuoteRequestWriter + ?Sized,
{
    let request = owned_request(repo, user, id)?;
    let action = QuoteAction::try_from(form)?;
    if !CUSTOMER_ACTIONS.contains(&action) {
        return Err(ServiceError::Unauthorized);
    }

    transition(repo, &request, action, None)
}

pub fn list_quote_requests<R>(
    repo: &R,
    access: AdminAccess,
    status: Option<&str>,
) -> ServiceResult<QuoteListPageData>
where
    R: QuoteRequestReader + ?Sized,
{
    require_admin(access)?;

    // Unknown filters show everything.
    let status_filter = status
        .filter(|value| !value.is_empty() && *value != "all")
        .and_then(|value| value.parse::<QuoteStatus>().ok());

    let mut query = QuoteRequestListQuery::new();
    if let Some(status) = status_filter {
        query = query.status(status);
    }

    let requests = repo.list_quote_requests(query).map_err(|err| {
        log::error!("Failed to list quote requests: {err}");
        err
    })?;

    Ok(QuoteListPageData {
        requests,
        status_filter,
    })
}

pub fn load_quote_request<R>(
    repo: &R,
    access: AdminAccess,
    id: i32,
) -> ServiceResult<QuoteThreadPageData>
where
    R: QuoteRequestReader + UserReader + ?Sized,
{
    require_admin(access)?;

    let request = fetch_request(repo, request_id(id)?)?;
    let requester = repo.get_user_by_id(request.user_id)?;
    let messages = repo.list_quote_messages(request.id)?;
    let actions = request.status.available_actions();

    Ok(QuoteThreadPageData {
        request,
        requester,
        messages,
        actions,
    })
}

/// Posts an admin message. A message carrying a price sends the quote,
/// moving the request to `quoted` in the same transaction. Returns the
/// request status afterwards.
pub fn post_admin_message<R>(
    repo: &R,
    access: AdminAccess,
    sender: &User,
    id: i32,
    form: AdminMessageForm,
) -> ServiceResult<QuoteStatus>
where
    R: QuoteRequestReader + QuoteRequestWriter + ?Sized,
{
    require_admin(access)?;

    let request = fetch_request(repo, request_id(id)?)?;
    let payload = AdminMessagePayload::try_from(form)?;
    let message = NewQuoteMessage::from_admin(
        request.id,
        sender.id,
        payload.message,
        payload.price,
        payload.estimated_time,
    );

    if message.price.is_some() {
        let updated = transition(repo, &request, QuoteAction::SendQuote, Some(&message))?;
        return Ok(updated.status);
    }

    repo.add_quote_message(&message).map_err(|err| {
        log::error!("Failed to post admin message on request {}: {err}", request.id);
        ServiceError::from(err)
    })?;
    Ok(request.status)
}

pub fn apply_admin_action<R>(
    repo: &R,
    access: AdminAccess,
    id: i32,
    form: StatusForm,
) -> ServiceResult<QuoteRequest>
where
    R: QuoteRequestReader + QuoteRequestWriter + ?Sized,
{
    require_admin(access)?;

    let request = fetch_request(repo, request_id(id)?)?;
    let action = QuoteAction::try_from(form)?;
    transition(repo, &request, action, None)
}
