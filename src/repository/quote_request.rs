use chrono::Utc;
use diesel::prelude::*;

use crate::domain::quote_message::{NewQuoteMessage, QuoteMessage};
use crate::domain::quote_request::{
    NewQuoteRequest, QuoteRequest, QuoteRequestWithUser, QuoteStatus,
};
use crate::domain::types::QuoteRequestId;
use crate::models::quote_message::{
    NewQuoteMessage as DbNewQuoteMessage, QuoteMessage as DbQuoteMessage,
};
use crate::models::quote_request::{
    NewQuoteRequest as DbNewQuoteRequest, QuoteRequest as DbQuoteRequest,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, QuoteRequestListQuery, QuoteRequestReader, QuoteRequestWriter,
};

impl QuoteRequestReader for DieselRepository {
    fn get_quote_request(&self, id: QuoteRequestId) -> RepositoryResult<Option<QuoteRequest>> {
        use crate::schema::quote_requests;

        let mut conn = self.conn()?;
        let request = quote_requests::table
            .find(id.get())
            .first::<DbQuoteRequest>(&mut conn)
            .optional()?;

        Ok(request.map(QuoteRequest::try_from).transpose()?)
    }

    fn list_quote_requests(
        &self,
        query: QuoteRequestListQuery,
    ) -> RepositoryResult<Vec<QuoteRequestWithUser>> {
        use crate::schema::{quote_requests, users};

        let mut conn = self.conn()?;

        let mut items = quote_requests::table
            .inner_join(users::table)
            .select((DbQuoteRequest::as_select(), users::email, users::full_name))
            .into_boxed();

        if let Some(user_id) = query.user_id {
            items = items.filter(quote_requests::user_id.eq(user_id.get()));
        }
        if let Some(status) = query.status {
            items = items.filter(quote_requests::status.eq(status.as_str()));
        }

        let rows = items
            .order((quote_requests::created_at.desc(), quote_requests::id.desc()))
            .load::<(DbQuoteRequest, String, Option<String>)>(&mut conn)?;

        rows.into_iter()
            .map(
                |(request, user_email, user_name)| -> RepositoryResult<QuoteRequestWithUser> {
                    Ok(QuoteRequestWithUser {
                        request: QuoteRequest::try_from(request)?,
                        user_email,
                        user_name,
                    })
                },
            )
            .collect()
    }

    fn list_quote_messages(&self, id: QuoteRequestId) -> RepositoryResult<Vec<QuoteMessage>> {
        use crate::schema::quote_messages;

        let mut conn = self.conn()?;
        let messages = quote_messages::table
            .filter(quote_messages::quote_request_id.eq(id.get()))
            .order((quote_messages::created_at.asc(), quote_messages::id.asc()))
            .load::<DbQuoteMessage>(&mut conn)?;

        messages
            .into_iter()
            .map(|message| -> RepositoryResult<QuoteMessage> {
                Ok(QuoteMessage::try_from(message)?)
            })
            .collect()
    }
}

impl QuoteRequestWriter for DieselRepository {
    fn create_quote_request(&self, request: &NewQuoteRequest) -> RepositoryResult<QuoteRequest> {
        use crate::schema::quote_requests;

        let mut conn = self.conn()?;
        let new_request = DbNewQuoteRequest::from(request);

        let stored = diesel::insert_into(quote_requests::table)
            .values(&new_request)
            .get_result::<DbQuoteRequest>(&mut conn)?;

        Ok(QuoteRequest::try_from(stored)?)
    }

    fn add_quote_message(&self, message: &NewQuoteMessage) -> RepositoryResult<QuoteMessage> {
        use crate::schema::{quote_messages, quote_requests};

        let mut conn = self.conn()?;
        let new_message = DbNewQuoteMessage::from(message);

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let touched = diesel::update(quote_requests::table.find(new_message.quote_request_id))
                .set(quote_requests::updated_at.eq(Utc::now().naive_utc()))
                .execute(conn)?;
            if touched == 0 {
                return Err(RepositoryError::NotFound);
            }

            let stored = diesel::insert_into(quote_messages::table)
                .values(&new_message)
                .get_result::<DbQuoteMessage>(conn)?;

            Ok(QuoteMessage::try_from(stored)?)
        })
    }

    fn transition_quote_request(
        &self,
        id: QuoteRequestId,
        from: QuoteStatus,
        to: QuoteStatus,
        message: Option<&NewQuoteMessage>,
    ) -> RepositoryResult<QuoteRequest> {
        use crate::schema::{quote_messages, quote_requests};

        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let updated = diesel::update(
                quote_requests::table
                    .filter(quote_requests::id.eq(id.get()))
                    .filter(quote_requests::status.eq(from.as_str())),
            )
            .set((
                quote_requests::status.eq(to.as_str()),
                quote_requests::updated_at.eq(Utc::now().naive_utc()),
            ))
            .get_result::<DbQuoteRequest>(conn)
            .optional()?;

            let Some(updated) = updated else {
                let exists = quote_requests::table
                    .find(id.get())
                    .count()
                    .get_result::<i64>(conn)?
                    > 0;
                return Err(if exists {
                    RepositoryError::ConstraintViolation(format!(
                        "quote request {id} is no longer {from}"
                    ))
                } else {
                    RepositoryError::NotFound
                });
            };

            if let Some(message) = message {
                diesel::insert_into(quote_messages::table)
                    .values(&DbNewQuoteMessage::from(message))
                    .execute(conn)?;
            }

            Ok(QuoteRequest::try_from(updated)?)
        })
    }
}
