/// A declaration value: one leading term plus zero or more operator/term
/// pairs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expr {
  pub first: Term,
  pub rest: Vec<TermWithOperator>,
}

impl Expr {
  pub fn single(term: Term) -> Self {
    Expr {
      first: term,
      rest: Vec::new(),
    }
  }

  pub fn ident(name: impl Into<String>) -> Self {
    Expr::single(Term::Ident(name.into()))
  }

  pub fn push(mut self, operator: Operator, term: Term) -> Self {
    self.rest.push(TermWithOperator { operator, term });
    self
  }

  /// All terms in source order, ignoring operators.
  pub fn terms(&self) -> impl Iterator<Item = &Term> {
    std::iter::once(&self.first).chain(self.rest.iter().map(|t| &t.term))
  }

  pub fn has_comma(&self) -> bool {
    self
      .rest
      .iter()
      .any(|t| t.operator == Operator::Comma)
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermWithOperator {
  pub operator: Operator,
  pub term: Term,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
  Space,
  Comma,
  Slash,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOperator {
  Plus,
  Minus,
}

/// One value term. Numbers keep their source text so formatting passes can
/// rewrite them without round-tripping through floats.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term {
  Number {
    unary: Option<UnaryOperator>,
    value: String,
    unit: Option<String>,
  },
  Ident(String),
  QuotedString(String),
  /// A hex color, including the leading `#`.
  Hex(String),
  Url(String),
  Function(Function),
}

impl Term {
  pub fn number(value: impl Into<String>) -> Self {
    Term::Number {
      unary: None,
      value: value.into(),
      unit: None,
    }
  }

  pub fn length(value: impl Into<String>, unit: impl Into<String>) -> Self {
    Term::Number {
      unary: None,
      value: value.into(),
      unit: Some(unit.into()),
    }
  }

  pub fn negative_length(value: impl Into<String>, unit: impl Into<String>) -> Self {
    Term::Number {
      unary: Some(UnaryOperator::Minus),
      value: value.into(),
      unit: Some(unit.into()),
    }
  }

  pub fn url(url: impl Into<String>) -> Self {
    Term::Url(url.into())
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
  pub name: String,
  pub args: Option<Box<Expr>>,
}

impl Function {
  pub fn new(name: impl Into<String>, args: Option<Expr>) -> Self {
    Function {
      name: name.into(),
      args: args.map(Box::new),
    }
  }
}
