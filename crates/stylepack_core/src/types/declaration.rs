use crate::types::{Expr, Term};

/// Property prefix reserved for diagnostic declarations inserted by passes.
/// The printer drops these when minifying.
pub const DEBUG_DECLARATION_PREFIX: &str = "-stylepack-dbg-";

/// A `property: value` pair with an optional `!important` priority.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
  pub property: String,
  pub value: Expr,
  pub important: bool,
}

impl Declaration {
  pub fn new(property: impl Into<String>, value: Expr) -> Self {
    Declaration {
      property: property.into(),
      value,
      important: false,
    }
  }

  pub fn important(mut self) -> Self {
    self.important = true;
    self
  }

  pub fn is_debug(&self) -> bool {
    self.property.starts_with(DEBUG_DECLARATION_PREFIX)
  }

  /// The key under which declarations are de-duplicated when rulesets merge.
  ///
  /// A vendor prefix on the value's leading identifier becomes part of the
  /// key, so `display:-ms-grid`, `display:-moz-box` and `display:block` are
  /// three distinct entries and survive a merge as progressive-enhancement
  /// fallbacks.
  pub fn merge_key(&self) -> String {
    let property = self.property.to_ascii_lowercase();
    if let Term::Ident(ident) = &self.value.first {
      if let Some(prefix) = vendor_prefix(ident) {
        return format!("{prefix}{property}");
      }
    }
    property
  }
}

/// The `-xxx-` prefix of a vendor-prefixed identifier, if any.
pub fn vendor_prefix(ident: &str) -> Option<&str> {
  let rest = ident.strip_prefix('-')?;
  let end = rest.find('-')?;
  if end == 0 {
    return None;
  }
  Some(&ident[..end + 2])
}
