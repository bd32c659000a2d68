use stylepack_core::diagnostic::Diagnostic;
use stylepack_core::diagnostic_error;
use stylepack_core::fold::Fold;
use stylepack_core::plugin::StylesheetTransformerPlugin;
use stylepack_core::printer::ToCss;
use stylepack_core::types::{Ruleset, SelectorsGroup, StyleSheet};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
  Exact,
  Substring,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchAction {
  /// Fail the pass on the first banned selector.
  Error,
  /// Drop banned selectors, and the whole ruleset once none remain.
  Remove,
}

/// Checks every ruleset's printed selectors against a banned list.
///
/// In remove mode a ruleset with a mix of banned and allowed selectors is
/// rebuilt with the allowed ones only; the ruleset itself is removed when
/// every selector matches.
#[derive(Debug)]
pub struct SelectorValidator {
  banned: Vec<String>,
  mode: MatchMode,
  action: MatchAction,
  error: Option<anyhow::Error>,
}

impl SelectorValidator {
  pub fn new(banned: Vec<String>, mode: MatchMode, action: MatchAction) -> Self {
    SelectorValidator {
      banned,
      mode,
      action,
      error: None,
    }
  }

  fn is_banned(&self, printed: &str) -> bool {
    self.banned.iter().any(|banned| match self.mode {
      MatchMode::Exact => printed == banned,
      MatchMode::Substring => printed.contains(banned.as_str()),
    })
  }
}

impl Fold for SelectorValidator {
  fn fold_ruleset(&mut self, n: Ruleset) -> Option<Ruleset> {
    if self.error.is_some() {
      return Some(n);
    }

    let banned: Vec<bool> = n
      .selectors
      .selectors
      .iter()
      .map(|selector| self.is_banned(&selector.to_css_string()))
      .collect();
    if !banned.iter().any(|hit| *hit) {
      return Some(n);
    }

    match self.action {
      MatchAction::Error => {
        let offending = n
          .selectors
          .selectors
          .iter()
          .zip(&banned)
          .find(|(_, hit)| **hit)
          .map(|(selector, _)| selector.to_css_string())
          .unwrap_or_default();
        self.error = Some(diagnostic_error!(Diagnostic::new(format!(
          "selector `{offending}` is not allowed"
        ))
        .with_node_text(n.to_pretty_string())));
        Some(n)
      }
      MatchAction::Remove => {
        let kept: Vec<_> = n
          .selectors
          .selectors
          .iter()
          .zip(&banned)
          .filter(|(_, hit)| !**hit)
          .map(|(selector, _)| selector.clone())
          .collect();
        if kept.is_empty() {
          tracing::debug!(
            selector = %n.selectors.to_css_string(),
            "removing fully banned ruleset"
          );
          return None;
        }
        Some(Ruleset {
          selectors: SelectorsGroup::new(kept),
          ..n
        })
      }
    }
  }
}

impl StylesheetTransformerPlugin for SelectorValidator {
  fn transform(&mut self, stylesheet: StyleSheet) -> Result<StyleSheet, anyhow::Error> {
    let output = self.fold_stylesheet(stylesheet);
    match self.error.take() {
      Some(error) => Err(error),
      None => Ok(output),
    }
  }
}
