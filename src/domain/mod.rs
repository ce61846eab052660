pub mod errors;
pub mod matcher;
pub mod overrides;
pub mod policy;
pub mod value_objects;

pub use errors::PolicyError;
pub use matcher::{Matcher, SharedMatcher};
pub use overrides::PolicyOverrides;
pub use policy::Policy;
