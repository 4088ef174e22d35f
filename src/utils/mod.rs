pub mod url_validation;
pub use url_validation::{
    UrlValidationError, validate_service_base_url, validate_service_base_url_dev,
};
