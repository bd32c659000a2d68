mod diagnostic;

pub use self::diagnostic::*;
