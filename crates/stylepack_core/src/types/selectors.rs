/// A comma-separated selector list, e.g. `h1, .title`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorsGroup {
  pub selectors: Vec<Selector>,
}

impl SelectorsGroup {
  pub fn new(selectors: Vec<Selector>) -> Self {
    SelectorsGroup { selectors }
  }

  pub fn single(selector: Selector) -> Self {
    SelectorsGroup {
      selectors: vec![selector],
    }
  }
}

/// One selector: a simple-selector sequence optionally combined with
/// further sequences, e.g. `ul > li a`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
  pub first: SimpleSelector,
  pub rest: Vec<CombinedSelector>,
}

impl Selector {
  pub fn simple(first: SimpleSelector) -> Self {
    Selector {
      first,
      rest: Vec::new(),
    }
  }

  pub fn combined(mut self, combinator: Combinator, selector: SimpleSelector) -> Self {
    self.rest.push(CombinedSelector {
      combinator,
      selector,
    });
    self
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombinedSelector {
  pub combinator: Combinator,
  pub selector: SimpleSelector,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
  Descendant,
  Child,
  AdjacentSibling,
  GeneralSibling,
}

/// An element (or universal) selector with its id/class/attribute/pseudo
/// modifiers, e.g. `input[type=text]:focus`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimpleSelector {
  /// Element name or `*`; absent when the selector starts with a modifier.
  pub type_selector: Option<String>,
  pub modifiers: Vec<SelectorModifier>,
}

impl SimpleSelector {
  pub fn for_type(name: impl Into<String>) -> Self {
    SimpleSelector {
      type_selector: Some(name.into()),
      modifiers: Vec::new(),
    }
  }

  pub fn class(name: impl Into<String>) -> Self {
    SimpleSelector {
      type_selector: None,
      modifiers: vec![SelectorModifier::Class(name.into())],
    }
  }

  pub fn id(name: impl Into<String>) -> Self {
    SimpleSelector {
      type_selector: None,
      modifiers: vec![SelectorModifier::Id(name.into())],
    }
  }

  pub fn with_modifier(mut self, modifier: SelectorModifier) -> Self {
    self.modifiers.push(modifier);
    self
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorModifier {
  Id(String),
  Class(String),
  Attribute(AttributeSelector),
  Pseudo(PseudoSelector),
  Negation(NegationArg),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeSelector {
  pub name: String,
  pub matcher: Option<AttributeMatch>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeMatch {
  pub operator: AttributeOperator,
  pub value: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeOperator {
  Equals,
  Includes,
  DashMatch,
  PrefixMatch,
  SuffixMatch,
  SubstringMatch,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PseudoSelector {
  /// True for `::element` pseudo-elements, false for `:class` pseudo-classes.
  pub element: bool,
  pub name: String,
  /// Raw functional-pseudo argument text, e.g. `2n+1` for `:nth-child(2n+1)`.
  pub argument: Option<String>,
}

impl PseudoSelector {
  pub fn class(name: impl Into<String>) -> Self {
    PseudoSelector {
      element: false,
      name: name.into(),
      argument: None,
    }
  }
}

/// The single simple selector allowed inside `:not(...)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NegationArg {
  Type(String),
  Universal,
  Id(String),
  Class(String),
  Attribute(AttributeSelector),
  Pseudo(PseudoSelector),
}
