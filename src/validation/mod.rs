pub mod ownership;
pub mod text;
pub mod title;

pub use ownership::{authorize, authorize_mutation, require_default, Variant};
pub use text::{validate_optional_text, validate_text, validate_url_field};
pub use title::check_title_free;
