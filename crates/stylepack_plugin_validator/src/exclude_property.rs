use stylepack_core::fold::Fold;
use stylepack_core::plugin::StylesheetTransformerPlugin;
use stylepack_core::printer::ToCss;
use stylepack_core::types::{Declaration, StyleSheet};

/// Marker substring that flags a declaration for removal.
const EXCLUDE_MARKER: &str = "Exclude";

/// Strips declarations whose printed form carries the exclusion marker,
/// wherever they appear in the stylesheet.
#[derive(Debug, Default)]
pub struct ExcludePropertyOptimizer;

impl Fold for ExcludePropertyOptimizer {
  fn fold_declaration(&mut self, n: Declaration) -> Option<Declaration> {
    if n.to_css_string().contains(EXCLUDE_MARKER) {
      tracing::debug!(property = %n.property, "removing excluded declaration");
      return None;
    }
    Some(n)
  }
}

impl StylesheetTransformerPlugin for ExcludePropertyOptimizer {
  fn transform(&mut self, stylesheet: StyleSheet) -> Result<StyleSheet, anyhow::Error> {
    Ok(self.fold_stylesheet(stylesheet))
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use stylepack_core::types::{
    Expr, Media, Rule, Ruleset, Selector, SelectorsGroup, SimpleSelector, Term,
  };

  use super::*;

  #[test]
  fn removes_marked_declarations_anywhere_in_the_tree() {
    let ruleset = |declarations| {
      Ruleset::new(
        SelectorsGroup::single(Selector::simple(SimpleSelector::class("a"))),
        declarations,
      )
    };
    let stylesheet = StyleSheet::from_rules(vec![
      Rule::Ruleset(ruleset(vec![
        Declaration::new("color", Expr::ident("red")),
        Declaration::new("-my-Excluded-prop", Expr::ident("x")),
      ])),
      Rule::Media(Media {
        queries: vec!["screen".into()],
        rulesets: vec![ruleset(vec![Declaration::new(
          "background",
          Expr::single(Term::url("ExcludeMe.png")),
        )])],
        pages: vec![],
      }),
    ]);

    let output = ExcludePropertyOptimizer
      .transform(stylesheet)
      .unwrap()
      .to_css_string();
    assert_eq!(output, ".a{color:red}@media screen{.a{}}");
  }

  #[test]
  fn unmarked_declarations_are_untouched() {
    let stylesheet = StyleSheet::from_rules(vec![Rule::Ruleset(Ruleset::new(
      SelectorsGroup::single(Selector::simple(SimpleSelector::for_type("p"))),
      vec![Declaration::new("color", Expr::ident("red"))],
    ))]);
    let output = ExcludePropertyOptimizer.transform(stylesheet.clone()).unwrap();
    assert_eq!(output, stylesheet);
  }
}
