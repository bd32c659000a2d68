//! Transforming traversal.
//!
//! `Fold` rebuilds the tree bottom-up by value. Every method's default body
//! delegates to the matching `fold_*_children` function, so a pass that
//! overrides only `fold_term` still traverses the whole stylesheet. Methods
//! at sequence positions return `Option`; `None` removes the node from its
//! parent's child list, which is how exclusion passes delete declarations
//! and rulesets.
//!
//! An un-overridden fold returns a structurally identical tree.

use crate::types::*;

pub trait Fold {
  fn fold_stylesheet(&mut self, n: StyleSheet) -> StyleSheet {
    fold_stylesheet_children(self, n)
  }

  fn fold_import(&mut self, n: Import) -> Option<Import> {
    Some(n)
  }

  fn fold_namespace(&mut self, n: Namespace) -> Option<Namespace> {
    Some(n)
  }

  fn fold_rule(&mut self, n: Rule) -> Option<Rule> {
    fold_rule_children(self, n)
  }

  fn fold_ruleset(&mut self, n: Ruleset) -> Option<Ruleset> {
    fold_ruleset_children(self, n)
  }

  fn fold_media(&mut self, n: Media) -> Option<Media> {
    fold_media_children(self, n)
  }

  fn fold_page(&mut self, n: Page) -> Option<Page> {
    fold_page_children(self, n)
  }

  fn fold_document_query(&mut self, n: DocumentQuery) -> Option<DocumentQuery> {
    fold_document_query_children(self, n)
  }

  fn fold_keyframes(&mut self, n: KeyFrames) -> Option<KeyFrames> {
    fold_keyframes_children(self, n)
  }

  fn fold_keyframe_block(&mut self, n: KeyFrameBlock) -> KeyFrameBlock {
    fold_keyframe_block_children(self, n)
  }

  fn fold_selectors_group(&mut self, n: SelectorsGroup) -> SelectorsGroup {
    fold_selectors_group_children(self, n)
  }

  fn fold_selector(&mut self, n: Selector) -> Option<Selector> {
    fold_selector_children(self, n)
  }

  fn fold_simple_selector(&mut self, n: SimpleSelector) -> SimpleSelector {
    n
  }

  fn fold_declaration(&mut self, n: Declaration) -> Option<Declaration> {
    fold_declaration_children(self, n)
  }

  fn fold_expr(&mut self, n: Expr) -> Expr {
    fold_expr_children(self, n)
  }

  fn fold_term(&mut self, n: Term) -> Term {
    fold_term_children(self, n)
  }

  fn fold_function(&mut self, n: Function) -> Function {
    fold_function_children(self, n)
  }
}

pub fn fold_stylesheet_children<F: Fold + ?Sized>(f: &mut F, n: StyleSheet) -> StyleSheet {
  StyleSheet {
    charset: n.charset,
    dpi: n.dpi,
    imports: n
      .imports
      .into_iter()
      .filter_map(|import| f.fold_import(import))
      .collect(),
    namespaces: n
      .namespaces
      .into_iter()
      .filter_map(|namespace| f.fold_namespace(namespace))
      .collect(),
    rules: n
      .rules
      .into_iter()
      .filter_map(|rule| f.fold_rule(rule))
      .collect(),
  }
}

pub fn fold_rule_children<F: Fold + ?Sized>(f: &mut F, n: Rule) -> Option<Rule> {
  match n {
    Rule::Ruleset(ruleset) => f.fold_ruleset(ruleset).map(Rule::Ruleset),
    Rule::Media(media) => f.fold_media(media).map(Rule::Media),
    Rule::Page(page) => f.fold_page(page).map(Rule::Page),
    Rule::DocumentQuery(query) => f.fold_document_query(query).map(Rule::DocumentQuery),
    Rule::KeyFrames(keyframes) => f.fold_keyframes(keyframes).map(Rule::KeyFrames),
  }
}

pub fn fold_ruleset_children<F: Fold + ?Sized>(f: &mut F, n: Ruleset) -> Option<Ruleset> {
  Some(Ruleset {
    selectors: f.fold_selectors_group(n.selectors),
    declarations: n
      .declarations
      .into_iter()
      .filter_map(|declaration| f.fold_declaration(declaration))
      .collect(),
    important_comments: n.important_comments,
  })
}

pub fn fold_media_children<F: Fold + ?Sized>(f: &mut F, n: Media) -> Option<Media> {
  Some(Media {
    queries: n.queries,
    rulesets: n
      .rulesets
      .into_iter()
      .filter_map(|ruleset| f.fold_ruleset(ruleset))
      .collect(),
    pages: n
      .pages
      .into_iter()
      .filter_map(|page| f.fold_page(page))
      .collect(),
  })
}

pub fn fold_page_children<F: Fold + ?Sized>(f: &mut F, n: Page) -> Option<Page> {
  Some(Page {
    pseudo: n.pseudo,
    declarations: n
      .declarations
      .into_iter()
      .filter_map(|declaration| f.fold_declaration(declaration))
      .collect(),
  })
}

pub fn fold_document_query_children<F: Fold + ?Sized>(
  f: &mut F,
  n: DocumentQuery,
) -> Option<DocumentQuery> {
  Some(DocumentQuery {
    at_keyword: n.at_keyword,
    conditions: n.conditions,
    rulesets: n
      .rulesets
      .into_iter()
      .filter_map(|ruleset| f.fold_ruleset(ruleset))
      .collect(),
  })
}

pub fn fold_keyframes_children<F: Fold + ?Sized>(f: &mut F, n: KeyFrames) -> Option<KeyFrames> {
  Some(KeyFrames {
    at_keyword: n.at_keyword,
    name: n.name,
    blocks: n
      .blocks
      .into_iter()
      .map(|block| f.fold_keyframe_block(block))
      .collect(),
  })
}

pub fn fold_keyframe_block_children<F: Fold + ?Sized>(f: &mut F, n: KeyFrameBlock) -> KeyFrameBlock {
  KeyFrameBlock {
    selectors: n.selectors,
    declarations: n
      .declarations
      .into_iter()
      .filter_map(|declaration| f.fold_declaration(declaration))
      .collect(),
  }
}

pub fn fold_selectors_group_children<F: Fold + ?Sized>(
  f: &mut F,
  n: SelectorsGroup,
) -> SelectorsGroup {
  SelectorsGroup {
    selectors: n
      .selectors
      .into_iter()
      .filter_map(|selector| f.fold_selector(selector))
      .collect(),
  }
}

pub fn fold_selector_children<F: Fold + ?Sized>(f: &mut F, n: Selector) -> Option<Selector> {
  Some(Selector {
    first: f.fold_simple_selector(n.first),
    rest: n
      .rest
      .into_iter()
      .map(|combined| CombinedSelector {
        combinator: combined.combinator,
        selector: f.fold_simple_selector(combined.selector),
      })
      .collect(),
  })
}

pub fn fold_declaration_children<F: Fold + ?Sized>(f: &mut F, n: Declaration) -> Option<Declaration> {
  Some(Declaration {
    property: n.property,
    value: f.fold_expr(n.value),
    important: n.important,
  })
}

pub fn fold_expr_children<F: Fold + ?Sized>(f: &mut F, n: Expr) -> Expr {
  Expr {
    first: f.fold_term(n.first),
    rest: n
      .rest
      .into_iter()
      .map(|term| TermWithOperator {
        operator: term.operator,
        term: f.fold_term(term.term),
      })
      .collect(),
  }
}

pub fn fold_term_children<F: Fold + ?Sized>(f: &mut F, n: Term) -> Term {
  match n {
    Term::Function(function) => Term::Function(f.fold_function(function)),
    other => other,
  }
}

pub fn fold_function_children<F: Fold + ?Sized>(f: &mut F, n: Function) -> Function {
  Function {
    name: n.name,
    args: n.args.map(|args| Box::new(f.fold_expr(*args))),
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  struct Identity;
  impl Fold for Identity {}

  fn sample() -> StyleSheet {
    StyleSheet::from_rules(vec![
      Rule::Ruleset(Ruleset::new(
        SelectorsGroup::single(Selector::simple(SimpleSelector::class("a"))),
        vec![Declaration::new("color", Expr::ident("red"))],
      )),
      Rule::Media(Media {
        queries: vec!["screen".into()],
        rulesets: vec![Ruleset::new(
          SelectorsGroup::single(Selector::simple(SimpleSelector::for_type("p"))),
          vec![Declaration::new(
            "width",
            Expr::single(Term::length("10", "px")),
          )],
        )],
        pages: vec![],
      }),
    ])
  }

  #[test]
  fn identity_fold_rebuilds_an_equal_tree() {
    let input = sample();
    let output = Identity.fold_stylesheet(input.clone());
    assert_eq!(output, input);
  }

  #[test]
  fn returning_none_removes_a_declaration() {
    struct DropWidths;
    impl Fold for DropWidths {
      fn fold_declaration(&mut self, n: Declaration) -> Option<Declaration> {
        if n.property == "width" {
          return None;
        }
        fold_declaration_children(self, n)
      }
    }

    let output = DropWidths.fold_stylesheet(sample());
    let Rule::Media(media) = &output.rules[1] else {
      panic!("expected a media rule");
    };
    assert_eq!(media.rulesets[0].declarations, vec![]);
  }

  #[test]
  fn overriding_one_method_still_traverses_nested_blocks() {
    struct PxToRem;
    impl Fold for PxToRem {
      fn fold_term(&mut self, n: Term) -> Term {
        match n {
          Term::Number {
            unary,
            value,
            unit: Some(unit),
          } if unit == "px" => Term::Number {
            unary,
            value,
            unit: Some("rem".into()),
          },
          other => fold_term_children(self, other),
        }
      }
    }

    let output = PxToRem.fold_stylesheet(sample());
    let Rule::Media(media) = &output.rules[1] else {
      panic!("expected a media rule");
    };
    assert_eq!(
      media.rulesets[0].declarations[0].value.first,
      Term::length("10", "rem")
    );
  }
}
