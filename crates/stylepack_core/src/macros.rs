/// Build an `anyhow::Error` from format arguments or from a
/// [`crate::diagnostic::Diagnostic`] value.
#[macro_export]
macro_rules! diagnostic_error {
  ($fmt:literal $(, $arg:expr)* $(,)?) => {
    ::anyhow::Error::new($crate::diagnostic::Diagnostic::new(format!($fmt $(, $arg)*)))
  };
  ($diagnostic:expr) => {
    ::anyhow::Error::new($diagnostic)
  };
}
