//! Public contact form submissions.

use crate::domain::contact::{ContactMessage, NewContactMessage};
use crate::forms::contact::ContactForm;
use crate::repository::ContactWriter;
use crate::services::{ServiceError, ServiceResult};

/// Validates and stores a contact message.
pub fn submit_contact<R>(repo: &R, form: ContactForm) -> ServiceResult<ContactMessage>
where
    R: ContactWriter + ?Sized,
{
    let message = NewContactMessage::try_from(form)?;

    repo.create_contact_message(&message).map_err(|err| {
        log::error!("Failed to store contact message from {}: {err}", message.email);
        ServiceError::from(err)
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::domain::types::{ContactMessageId, MessageText, PersonName, UserEmail};
    use crate::repository::mock::MockRepository;

    fn form(email: &str) -> ContactForm {
        ContactForm {
            name: "Omar".into(),
            email: email.into(),
            phone: "+971 50 123 4567".into(),
            service: "Relocation Services".into(),
            message: "Moving a 2 bedroom flat".into(),
        }
    }

    #[test]
    fn invalid_form_is_not_stored() {
        let mut repo = MockRepository::new();
        repo.expect_create_contact_message().never();

        let result = submit_contact(&repo, form("not-an-email"));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn valid_form_is_stored() {
        let mut repo = MockRepository::new();
        repo.expect_create_contact_message()
            .withf(|message| message.phone.is_some())
            .times(1)
            .returning(|message| {
                Ok(ContactMessage {
                    id: ContactMessageId::new(1).unwrap(),
                    name: PersonName::new(message.name.as_str()).unwrap(),
                    email: UserEmail::new(message.email.as_str()).unwrap(),
                    phone: message.phone.clone(),
                    service: message.service.clone(),
                    message: MessageText::new(message.message.as_str()).unwrap(),
                    created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
                })
            });

        let stored = submit_contact(&repo, form("omar@example.com")).expect("stored");
        assert_eq!(stored.email.as_str(), "omar@example.com");
    }
}
