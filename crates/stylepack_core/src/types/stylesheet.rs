use crate::types::{Declaration, SelectorsGroup};

/// The root of a parsed stylesheet. Children are ordered the way the source
/// was written; that order is cascade-significant and every pass preserves
/// it unless documented otherwise.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleSheet {
  pub charset: Option<String>,
  pub imports: Vec<Import>,
  pub namespaces: Vec<Namespace>,
  /// Target densities for DPI-aware passes, when the build requests them.
  pub dpi: Option<Vec<u32>>,
  pub rules: Vec<Rule>,
}

impl StyleSheet {
  pub fn from_rules(rules: Vec<Rule>) -> Self {
    StyleSheet {
      rules,
      ..Default::default()
    }
  }
}

/// A top-level rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rule {
  Ruleset(Ruleset),
  Media(Media),
  Page(Page),
  DocumentQuery(DocumentQuery),
  KeyFrames(KeyFrames),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
  pub url: String,
  pub media: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Namespace {
  pub prefix: Option<String>,
  pub uri: String,
}

/// A selector group and its declaration block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ruleset {
  pub selectors: SelectorsGroup,
  pub declarations: Vec<Declaration>,
  /// `/*! ... */` comments attached to this ruleset, emitted verbatim.
  pub important_comments: Vec<String>,
}

impl Ruleset {
  pub fn new(selectors: SelectorsGroup, declarations: Vec<Declaration>) -> Self {
    Ruleset {
      selectors,
      declarations,
      important_comments: Vec::new(),
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Media {
  /// Printed media queries, e.g. `screen and (min-width:600px)`.
  pub queries: Vec<String>,
  pub rulesets: Vec<Ruleset>,
  pub pages: Vec<Page>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
  /// Page pseudo-class, e.g. `first` for `@page :first`.
  pub pseudo: Option<String>,
  pub declarations: Vec<Declaration>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentQuery {
  /// The at-keyword as written, e.g. `@-moz-document`.
  pub at_keyword: String,
  /// Raw match-function list, e.g. `url-prefix(http://example.com)`.
  pub conditions: String,
  pub rulesets: Vec<Ruleset>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyFrames {
  /// The at-keyword as written, e.g. `@keyframes` or `@-webkit-keyframes`.
  pub at_keyword: String,
  pub name: String,
  pub blocks: Vec<KeyFrameBlock>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyFrameBlock {
  /// Frame selectors: `from`, `to` or percentages.
  pub selectors: Vec<String>,
  pub declarations: Vec<Declaration>,
}
