mod exclude_property;
mod lowercase_validator;
mod selector_validator;

pub use exclude_property::ExcludePropertyOptimizer;
pub use lowercase_validator::LowercaseValidator;
pub use selector_validator::{MatchAction, MatchMode, SelectorValidator};
