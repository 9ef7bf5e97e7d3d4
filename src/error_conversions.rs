//! Error conversion glue between layers.
//!
//! The domain layer does not depend on repository or service error types;
//! the conversions live here instead.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod server {
    use crate::domain::quote_request::InvalidTransition;
    use crate::domain::types::TypeConstraintError;
    use crate::services::ServiceError;

    impl From<TypeConstraintError> for ServiceError {
        fn from(val: TypeConstraintError) -> Self {
            ServiceError::TypeConstraint(val.to_string())
        }
    }

    impl From<InvalidTransition> for ServiceError {
        fn from(val: InvalidTransition) -> Self {
            ServiceError::InvalidTransition(format!(
                "A {} request cannot take the \"{}\" action.",
                val.from, val.action
            ))
        }
    }
}
