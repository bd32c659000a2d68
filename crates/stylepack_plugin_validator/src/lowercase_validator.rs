use stylepack_core::diagnostic::Diagnostic;
use stylepack_core::diagnostic_error;
use stylepack_core::plugin::StylesheetTransformerPlugin;
use stylepack_core::printer::ToCss;
use stylepack_core::types::{
  Declaration, Import, KeyFrames, Media, Namespace, Page, Ruleset, StyleSheet, Term,
};
use stylepack_core::visit::{walk_stylesheet, Visit};

/// Fails the pass at the first printed fragment that is not already
/// lowercase: charset, imports, selectors, at-rule keywords and
/// declarations. Quoted-string contents are exempt; they carry user data
/// like font names.
#[derive(Debug, Default)]
pub struct LowercaseValidator {
  error: Option<Diagnostic>,
}

impl LowercaseValidator {
  fn check(&mut self, fragment: &str, node_text: String) {
    if self.error.is_some() {
      return;
    }
    if fragment != fragment.to_lowercase() {
      self.error = Some(
        Diagnostic::new(format!("`{fragment}` must be lowercase")).with_node_text(node_text),
      );
    }
  }
}

impl Visit for LowercaseValidator {
  fn visit_stylesheet(&mut self, n: &StyleSheet) {
    if let Some(charset) = &n.charset {
      self.check(charset, format!("@charset \"{charset}\";"));
    }
  }

  fn visit_import(&mut self, n: &Import) {
    self.check(&n.to_css_string(), n.to_pretty_string());
  }

  fn visit_namespace(&mut self, n: &Namespace) {
    self.check(&n.to_css_string(), n.to_pretty_string());
  }

  fn visit_ruleset(&mut self, n: &Ruleset) {
    self.check(&n.selectors.to_css_string(), n.to_pretty_string());
  }

  fn visit_media(&mut self, n: &Media) {
    self.check(&n.queries.join(","), n.to_pretty_string());
  }

  fn visit_page(&mut self, n: &Page) {
    if let Some(pseudo) = &n.pseudo {
      self.check(pseudo, n.to_pretty_string());
    }
  }

  fn visit_keyframes(&mut self, n: &KeyFrames) {
    self.check(&n.at_keyword, n.to_pretty_string());
    self.check(&n.name, n.to_pretty_string());
  }

  fn visit_declaration(&mut self, n: &Declaration) {
    self.check(&n.property, n.to_pretty_string());
    for term in n.value.terms() {
      let fragment = match term {
        Term::Number {
          unit: Some(unit), ..
        } => unit.clone(),
        Term::Ident(name) => name.clone(),
        Term::Hex(value) => value.clone(),
        Term::Url(url) => url.clone(),
        Term::Function(function) => function.name.clone(),
        _ => continue,
      };
      self.check(&fragment, n.to_pretty_string());
    }
  }
}

impl StylesheetTransformerPlugin for LowercaseValidator {
  fn transform(&mut self, stylesheet: StyleSheet) -> Result<StyleSheet, anyhow::Error> {
    walk_stylesheet(self, &stylesheet);
    match self.error.take() {
      Some(diagnostic) => Err(diagnostic_error!(diagnostic)),
      None => Ok(stylesheet),
    }
  }
}
