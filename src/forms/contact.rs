//! Public contact form.

use serde::Deserialize;
use validator::Validate;

use crate::domain::contact::NewContactMessage;
use crate::domain::types::{MessageText, PersonName, PhoneNumber, UserEmail};
use crate::forms::{FormError, non_blank};

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub service: String,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

impl TryFrom<ContactForm> for NewContactMessage {
    type Error = FormError;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            name: PersonName::new(form.name).map_err(|_| FormError::InvalidName)?,
            email: UserEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            phone: non_blank(&form.phone)
                .map(PhoneNumber::new)
                .transpose()
                .map_err(|_| FormError::InvalidPhoneNumber)?,
            service: non_blank(&form.service),
            message: MessageText::new(form.message).map_err(|_| FormError::InvalidMessage)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: "Sara".into(),
            email: "sara@example.com".into(),
            phone: String::new(),
            service: "Shipping Services".into(),
            message: "Need a quote for 3 boxes".into(),
        }
    }

    #[test]
    fn valid_form_converts() {
        let message = NewContactMessage::try_from(form()).expect("valid form");
        assert_eq!(message.phone, None);
        assert_eq!(message.service.as_deref(), Some("Shipping Services"));
    }

    #[test]
    fn bad_phone_is_rejected() {
        let mut bad = form();
        bad.phone = "call me".into();
        assert!(matches!(
            NewContactMessage::try_from(bad),
            Err(FormError::InvalidPhoneNumber)
        ));
    }

    #[test]
    fn empty_message_fails_validation() {
        let mut bad = form();
        bad.message = String::new();
        assert!(matches!(
            NewContactMessage::try_from(bad),
            Err(FormError::Validation(_))
        ));
    }
}
