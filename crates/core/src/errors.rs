use std::path::PathBuf;

use thiserror::Error;

use crate::{config::ConfigError, domain::product::ProductId};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("product `{0}` was not found in the catalog")]
    ProductNotFound(ProductId),
    #[error("product id `{0}` appears more than once in the catalog")]
    DuplicateProductId(ProductId),
    #[error("no product id is left after `{0}`")]
    IdSpaceExhausted(ProductId),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog `{origin}`: {source}")]
    Parse { origin: String, source: serde_json::Error },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("configuration failure: {0}")]
    Configuration(#[from] ConfigError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("not found: {message}")]
    NotFound { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::NotFound { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::NotFound { .. } => "The requested product does not exist.",
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::NotFound { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let correlation_id = "unassigned".to_owned();
        match value {
            ApplicationError::Domain(error @ DomainError::ProductNotFound(_))
            | ApplicationError::Catalog(CatalogError::Domain(
                error @ DomainError::ProductNotFound(_),
            )) => Self::NotFound { message: error.to_string(), correlation_id },
            ApplicationError::Domain(error)
            | ApplicationError::Catalog(CatalogError::Domain(error)) => {
                Self::BadRequest { message: error.to_string(), correlation_id }
            }
            ApplicationError::Catalog(error @ CatalogError::Parse { .. }) => {
                Self::BadRequest { message: error.to_string(), correlation_id }
            }
            ApplicationError::Catalog(error @ CatalogError::ReadFile { .. }) => {
                Self::Internal { message: error.to_string(), correlation_id }
            }
            ApplicationError::Configuration(error) => {
                Self::Internal { message: error.to_string(), correlation_id }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ConfigError;
    use crate::domain::product::ProductId;
    use crate::errors::{ApplicationError, DomainError, InterfaceError};

    #[test]
    fn missing_product_maps_to_not_found_interface_error() {
        let interface = ApplicationError::from(DomainError::ProductNotFound(ProductId(42)))
            .into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::NotFound {
                ref correlation_id,
                ref message,
            } if correlation_id == "req-1" && message.contains("42")
        ));
        assert_eq!(interface.user_message(), "The requested product does not exist.");
    }

    #[test]
    fn duplicate_id_maps_to_bad_request_with_user_safe_message() {
        let interface = ApplicationError::from(DomainError::DuplicateProductId(ProductId(1)))
            .into_interface("req-2");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest { ref message, .. } if message.contains("more than once")
        ));
        assert_eq!(interface.correlation_id(), "req-2");
        assert_eq!(
            interface.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
    }

    #[test]
    fn configuration_error_maps_to_internal() {
        let interface =
            ApplicationError::from(ConfigError::Validation("bad log level".to_owned()))
                .into_interface("req-3");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert_eq!(interface.user_message(), "An unexpected internal error occurred.");
    }
}
