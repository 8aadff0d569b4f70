pub mod validate;

pub use validate::{name_key, validate_filter_name};
