use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// This is a user facing error for stylepack.
///
/// Usually but not always this is linked to a node in the stylesheet being
/// processed.
#[derive(Error, Debug, Deserialize, PartialEq, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
  /// A summary user-facing message
  pub message: String,

  /// Indicates where this diagnostic was emitted from
  pub origin: Option<String>,

  /// Pretty-printed text of the offending node (optional)
  pub node_text: Option<String>,

  /// Hints for the user
  pub hints: Option<Vec<String>>,
}

impl Display for Diagnostic {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.message)?;
    if let Some(node_text) = &self.node_text {
      write!(f, "\n\n{node_text}")?;
    }
    Ok(())
  }
}

impl Diagnostic {
  pub fn new(message: impl Into<String>) -> Self {
    Diagnostic {
      message: message.into(),
      ..Default::default()
    }
  }

  pub fn with_node_text(mut self, node_text: impl Into<String>) -> Self {
    self.node_text = Some(node_text.into());
    self
  }

  pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
    self.origin = Some(origin.into());
    self
  }
}
