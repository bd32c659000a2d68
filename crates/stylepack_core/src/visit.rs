//! Read-only traversal.
//!
//! `Visit` methods default to no-ops and never recurse on their own; the
//! `walk_*` functions drive a full source-order traversal and invoke the
//! visitor's hook at every node they pass. A targeted visitor (for example
//! the image-assembly scanner) overrides the one or two hooks it cares
//! about and hands the stylesheet to `walk_stylesheet`.

use crate::types::*;

pub trait Visit {
  fn visit_stylesheet(&mut self, _n: &StyleSheet) {}
  fn visit_import(&mut self, _n: &Import) {}
  fn visit_namespace(&mut self, _n: &Namespace) {}
  fn visit_ruleset(&mut self, _n: &Ruleset) {}
  fn visit_media(&mut self, _n: &Media) {}
  fn visit_page(&mut self, _n: &Page) {}
  fn visit_document_query(&mut self, _n: &DocumentQuery) {}
  fn visit_keyframes(&mut self, _n: &KeyFrames) {}
  fn visit_keyframe_block(&mut self, _n: &KeyFrameBlock) {}
  fn visit_selectors_group(&mut self, _n: &SelectorsGroup) {}
  fn visit_selector(&mut self, _n: &Selector) {}
  fn visit_simple_selector(&mut self, _n: &SimpleSelector) {}
  fn visit_declaration(&mut self, _n: &Declaration) {}
  fn visit_expr(&mut self, _n: &Expr) {}
  fn visit_term(&mut self, _n: &Term) {}
  fn visit_function(&mut self, _n: &Function) {}
}

pub fn walk_stylesheet<V: Visit + ?Sized>(v: &mut V, n: &StyleSheet) {
  v.visit_stylesheet(n);
  for import in &n.imports {
    v.visit_import(import);
  }
  for namespace in &n.namespaces {
    v.visit_namespace(namespace);
  }
  for rule in &n.rules {
    walk_rule(v, rule);
  }
}

pub fn walk_rule<V: Visit + ?Sized>(v: &mut V, n: &Rule) {
  match n {
    Rule::Ruleset(ruleset) => walk_ruleset(v, ruleset),
    Rule::Media(media) => walk_media(v, media),
    Rule::Page(page) => walk_page(v, page),
    Rule::DocumentQuery(query) => walk_document_query(v, query),
    Rule::KeyFrames(keyframes) => walk_keyframes(v, keyframes),
  }
}

pub fn walk_ruleset<V: Visit + ?Sized>(v: &mut V, n: &Ruleset) {
  v.visit_ruleset(n);
  walk_selectors_group(v, &n.selectors);
  for declaration in &n.declarations {
    walk_declaration(v, declaration);
  }
}

pub fn walk_media<V: Visit + ?Sized>(v: &mut V, n: &Media) {
  v.visit_media(n);
  for ruleset in &n.rulesets {
    walk_ruleset(v, ruleset);
  }
  for page in &n.pages {
    walk_page(v, page);
  }
}

pub fn walk_page<V: Visit + ?Sized>(v: &mut V, n: &Page) {
  v.visit_page(n);
  for declaration in &n.declarations {
    walk_declaration(v, declaration);
  }
}

pub fn walk_document_query<V: Visit + ?Sized>(v: &mut V, n: &DocumentQuery) {
  v.visit_document_query(n);
  for ruleset in &n.rulesets {
    walk_ruleset(v, ruleset);
  }
}

pub fn walk_keyframes<V: Visit + ?Sized>(v: &mut V, n: &KeyFrames) {
  v.visit_keyframes(n);
  for block in &n.blocks {
    walk_keyframe_block(v, block);
  }
}

pub fn walk_keyframe_block<V: Visit + ?Sized>(v: &mut V, n: &KeyFrameBlock) {
  v.visit_keyframe_block(n);
  for declaration in &n.declarations {
    walk_declaration(v, declaration);
  }
}

pub fn walk_selectors_group<V: Visit + ?Sized>(v: &mut V, n: &SelectorsGroup) {
  v.visit_selectors_group(n);
  for selector in &n.selectors {
    walk_selector(v, selector);
  }
}

pub fn walk_selector<V: Visit + ?Sized>(v: &mut V, n: &Selector) {
  v.visit_selector(n);
  v.visit_simple_selector(&n.first);
  for combined in &n.rest {
    v.visit_simple_selector(&combined.selector);
  }
}

pub fn walk_declaration<V: Visit + ?Sized>(v: &mut V, n: &Declaration) {
  v.visit_declaration(n);
  walk_expr(v, &n.value);
}

pub fn walk_expr<V: Visit + ?Sized>(v: &mut V, n: &Expr) {
  v.visit_expr(n);
  walk_term(v, &n.first);
  for term in &n.rest {
    walk_term(v, &term.term);
  }
}

pub fn walk_term<V: Visit + ?Sized>(v: &mut V, n: &Term) {
  v.visit_term(n);
  if let Term::Function(function) = n {
    v.visit_function(function);
    if let Some(args) = &function.args {
      walk_expr(v, args);
    }
  }
}
