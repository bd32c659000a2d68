mod declaration;
mod selectors;
mod stylesheet;
mod values;

pub use self::declaration::*;
pub use self::selectors::*;
pub use self::stylesheet::*;
pub use self::values::*;
