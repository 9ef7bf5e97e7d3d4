use diesel::prelude::*;

use crate::domain::contact::{ContactMessage, NewContactMessage};
use crate::models::contact::{
    ContactMessage as DbContactMessage, NewContactMessage as DbNewContactMessage,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{ContactWriter, DieselRepository};

impl ContactWriter for DieselRepository {
    fn create_contact_message(
        &self,
        message: &NewContactMessage,
    ) -> RepositoryResult<ContactMessage> {
        use crate::schema::contact_messages;

        let mut conn = self.conn()?;
        let new_message = DbNewContactMessage::from(message);

        let stored = diesel::insert_into(contact_messages::table)
            .values(&new_message)
            .get_result::<DbContactMessage>(&mut conn)?;

        Ok(ContactMessage::try_from(stored)?)
    }
}
