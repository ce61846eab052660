pub mod input_sanitization;

pub use input_sanitization::{
    create_input_sanitization_middleware, InputSanitizationConfig, InputSanitizationLayer,
    SanitizedPathParams,
};
