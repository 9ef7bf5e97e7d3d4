//! Forms for managing admin roles.

use serde::Deserialize;
use validator::Validate;

use crate::domain::admin_user::AdminRole;
use crate::domain::types::UserEmail;
use crate::forms::FormError;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct AddAdminForm {
    #[validate(email)]
    pub email: String,
    pub role: String,
}

pub struct AddAdminPayload {
    pub email: UserEmail,
    pub role: AdminRole,
}

impl TryFrom<AddAdminForm> for AddAdminPayload {
    type Error = FormError;

    fn try_from(form: AddAdminForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            email: UserEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            role: form.role.trim().parse().map_err(|_| FormError::InvalidRole)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_role_and_normalizes_email() {
        let payload = AddAdminPayload::try_from(AddAdminForm {
            email: "Ops@WingMovers.com".into(),
            role: "moderator".into(),
        })
        .expect("valid form");
        assert_eq!(payload.email.as_str(), "ops@wingmovers.com");
        assert_eq!(payload.role, AdminRole::Moderator);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let result = AddAdminPayload::try_from(AddAdminForm {
            email: "ops@wingmovers.com".into(),
            role: "owner".into(),
        });
        assert!(matches!(result, Err(FormError::InvalidRole)));
    }
}
