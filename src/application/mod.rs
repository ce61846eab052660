pub mod engine;
pub mod transformer;
pub mod walker;
pub mod write_back;

pub use engine::{AutoSanitizer, RequestData};
pub use transformer::sanitize_string;
pub use walker::clean_value;
