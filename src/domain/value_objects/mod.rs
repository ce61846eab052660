mod normalization_form;
mod write_back_mode;

pub use normalization_form::{NormalizationForm, NormalizationSetting};
pub use write_back_mode::WriteBackMode;
