//! CSS serialization.
//!
//! The minified form doubles as the canonical printed form: merge keys and
//! validation messages are all built from `to_css_string`.

use crate::types::*;

#[derive(Clone, Copy, Debug, Default)]
pub struct PrinterOptions {
  pub minify: bool,
}

impl PrinterOptions {
  pub fn minified() -> Self {
    PrinterOptions { minify: true }
  }
}

/// Accumulates CSS text. Passes never build CSS strings by hand; they go
/// through `ToCss` so whitespace and filtering rules live in one place.
pub struct Printer {
  out: String,
  options: PrinterOptions,
  indent: usize,
}

impl Printer {
  pub fn new(options: PrinterOptions) -> Self {
    Printer {
      out: String::new(),
      options,
      indent: 0,
    }
  }

  pub fn minify(&self) -> bool {
    self.options.minify
  }

  pub fn finish(self) -> String {
    self.out
  }

  fn push(&mut self, s: &str) {
    self.out.push_str(s);
  }

  fn push_char(&mut self, c: char) {
    self.out.push(c);
  }

  /// A space that minification removes.
  fn whitespace(&mut self) {
    if !self.options.minify {
      self.out.push(' ');
    }
  }

  fn newline(&mut self) {
    if !self.options.minify {
      self.out.push('\n');
    }
  }

  fn write_indent(&mut self) {
    if !self.options.minify {
      for _ in 0..self.indent {
        self.out.push_str("  ");
      }
    }
  }

  fn write_declarations(&mut self, declarations: &[Declaration]) {
    let mut first = true;
    for declaration in declarations {
      if self.options.minify && declaration.is_debug() {
        continue;
      }
      if !first {
        self.push_char(';');
        self.newline();
      }
      first = false;
      self.write_indent();
      declaration.to_css(self);
    }
    if !first {
      // Pretty output terminates the last declaration too.
      if !self.options.minify {
        self.push_char(';');
      }
      self.newline();
    }
  }

  fn open_block(&mut self) {
    self.whitespace();
    self.push_char('{');
    self.newline();
    self.indent += 1;
  }

  fn close_block(&mut self) {
    self.indent -= 1;
    self.write_indent();
    self.push_char('}');
  }
}

pub trait ToCss {
  fn to_css(&self, printer: &mut Printer);

  /// Minified canonical form.
  fn to_css_string(&self) -> String {
    let mut printer = Printer::new(PrinterOptions::minified());
    self.to_css(&mut printer);
    printer.finish()
  }

  /// Human-readable form, used in diagnostics.
  fn to_pretty_string(&self) -> String {
    let mut printer = Printer::new(PrinterOptions::default());
    self.to_css(&mut printer);
    printer.finish()
  }
}

impl ToCss for StyleSheet {
  fn to_css(&self, printer: &mut Printer) {
    if let Some(charset) = &self.charset {
      printer.push("@charset \"");
      printer.push(charset);
      printer.push("\";");
      printer.newline();
    }
    for import in &self.imports {
      import.to_css(printer);
      printer.newline();
    }
    for namespace in &self.namespaces {
      namespace.to_css(printer);
      printer.newline();
    }
    let mut first = true;
    for rule in &self.rules {
      if !first {
        printer.newline();
      }
      first = false;
      rule.to_css(printer);
    }
    if !first {
      printer.newline();
    }
  }
}

impl ToCss for Import {
  fn to_css(&self, printer: &mut Printer) {
    printer.push("@import url(");
    printer.push(&self.url);
    printer.push_char(')');
    if let Some(media) = &self.media {
      printer.push_char(' ');
      printer.push(media);
    }
    printer.push_char(';');
  }
}

impl ToCss for Namespace {
  fn to_css(&self, printer: &mut Printer) {
    printer.push("@namespace");
    if let Some(prefix) = &self.prefix {
      printer.push_char(' ');
      printer.push(prefix);
    }
    printer.push(" url(");
    printer.push(&self.uri);
    printer.push(");");
  }
}

impl ToCss for Rule {
  fn to_css(&self, printer: &mut Printer) {
    match self {
      Rule::Ruleset(ruleset) => ruleset.to_css(printer),
      Rule::Media(media) => media.to_css(printer),
      Rule::Page(page) => page.to_css(printer),
      Rule::DocumentQuery(query) => query.to_css(printer),
      Rule::KeyFrames(keyframes) => keyframes.to_css(printer),
    }
  }
}

impl ToCss for Ruleset {
  fn to_css(&self, printer: &mut Printer) {
    for comment in &self.important_comments {
      printer.write_indent();
      printer.push(comment);
      printer.newline();
    }
    printer.write_indent();
    self.selectors.to_css(printer);
    printer.open_block();
    printer.write_declarations(&self.declarations);
    printer.close_block();
  }
}

impl ToCss for Media {
  fn to_css(&self, printer: &mut Printer) {
    printer.write_indent();
    printer.push("@media ");
    let mut first = true;
    for query in &self.queries {
      if !first {
        printer.push_char(',');
        printer.whitespace();
      }
      first = false;
      printer.push(query);
    }
    printer.open_block();
    let mut first = true;
    for ruleset in &self.rulesets {
      if !first {
        printer.newline();
      }
      first = false;
      ruleset.to_css(printer);
    }
    for page in &self.pages {
      if !first {
        printer.newline();
      }
      first = false;
      page.to_css(printer);
    }
    if !first {
      printer.newline();
    }
    printer.close_block();
  }
}

impl ToCss for Page {
  fn to_css(&self, printer: &mut Printer) {
    printer.write_indent();
    printer.push("@page");
    if let Some(pseudo) = &self.pseudo {
      printer.push_char(':');
      printer.push(pseudo);
    }
    printer.open_block();
    printer.write_declarations(&self.declarations);
    printer.close_block();
  }
}

impl ToCss for DocumentQuery {
  fn to_css(&self, printer: &mut Printer) {
    printer.write_indent();
    printer.push(&self.at_keyword);
    printer.push_char(' ');
    printer.push(&self.conditions);
    printer.open_block();
    let mut first = true;
    for ruleset in &self.rulesets {
      if !first {
        printer.newline();
      }
      first = false;
      ruleset.to_css(printer);
    }
    if !first {
      printer.newline();
    }
    printer.close_block();
  }
}

impl ToCss for KeyFrames {
  fn to_css(&self, printer: &mut Printer) {
    printer.write_indent();
    printer.push(&self.at_keyword);
    printer.push_char(' ');
    printer.push(&self.name);
    printer.open_block();
    let mut first = true;
    for block in &self.blocks {
      if !first {
        printer.newline();
      }
      first = false;
      block.to_css(printer);
    }
    if !first {
      printer.newline();
    }
    printer.close_block();
  }
}

impl ToCss for KeyFrameBlock {
  fn to_css(&self, printer: &mut Printer) {
    printer.write_indent();
    let mut first = true;
    for selector in &self.selectors {
      if !first {
        printer.push_char(',');
        printer.whitespace();
      }
      first = false;
      printer.push(selector);
    }
    printer.open_block();
    printer.write_declarations(&self.declarations);
    printer.close_block();
  }
}

impl ToCss for SelectorsGroup {
  fn to_css(&self, printer: &mut Printer) {
    let mut first = true;
    for selector in &self.selectors {
      if !first {
        printer.push_char(',');
        printer.whitespace();
      }
      first = false;
      selector.to_css(printer);
    }
  }
}

impl ToCss for Selector {
  fn to_css(&self, printer: &mut Printer) {
    self.first.to_css(printer);
    for combined in &self.rest {
      match combined.combinator {
        Combinator::Descendant => printer.push_char(' '),
        Combinator::Child => {
          printer.whitespace();
          printer.push_char('>');
          printer.whitespace();
        }
        Combinator::AdjacentSibling => {
          printer.whitespace();
          printer.push_char('+');
          printer.whitespace();
        }
        Combinator::GeneralSibling => {
          printer.whitespace();
          printer.push_char('~');
          printer.whitespace();
        }
      }
      combined.selector.to_css(printer);
    }
  }
}

impl ToCss for SimpleSelector {
  fn to_css(&self, printer: &mut Printer) {
    if let Some(type_selector) = &self.type_selector {
      printer.push(type_selector);
    }
    for modifier in &self.modifiers {
      modifier.to_css(printer);
    }
  }
}

impl ToCss for SelectorModifier {
  fn to_css(&self, printer: &mut Printer) {
    match self {
      SelectorModifier::Id(name) => {
        printer.push_char('#');
        printer.push(name);
      }
      SelectorModifier::Class(name) => {
        printer.push_char('.');
        printer.push(name);
      }
      SelectorModifier::Attribute(attribute) => attribute.to_css(printer),
      SelectorModifier::Pseudo(pseudo) => pseudo.to_css(printer),
      SelectorModifier::Negation(arg) => {
        printer.push(":not(");
        arg.to_css(printer);
        printer.push_char(')');
      }
    }
  }
}

impl ToCss for AttributeSelector {
  fn to_css(&self, printer: &mut Printer) {
    printer.push_char('[');
    printer.push(&self.name);
    if let Some(matcher) = &self.matcher {
      printer.push(match matcher.operator {
        AttributeOperator::Equals => "=",
        AttributeOperator::Includes => "~=",
        AttributeOperator::DashMatch => "|=",
        AttributeOperator::PrefixMatch => "^=",
        AttributeOperator::SuffixMatch => "$=",
        AttributeOperator::SubstringMatch => "*=",
      });
      printer.push(&matcher.value);
    }
    printer.push_char(']');
  }
}

impl ToCss for PseudoSelector {
  fn to_css(&self, printer: &mut Printer) {
    printer.push_char(':');
    if self.element {
      printer.push_char(':');
    }
    printer.push(&self.name);
    if let Some(argument) = &self.argument {
      printer.push_char('(');
      printer.push(argument);
      printer.push_char(')');
    }
  }
}

impl ToCss for NegationArg {
  fn to_css(&self, printer: &mut Printer) {
    match self {
      NegationArg::Type(name) => printer.push(name),
      NegationArg::Universal => printer.push_char('*'),
      NegationArg::Id(name) => {
        printer.push_char('#');
        printer.push(name);
      }
      NegationArg::Class(name) => {
        printer.push_char('.');
        printer.push(name);
      }
      NegationArg::Attribute(attribute) => attribute.to_css(printer),
      NegationArg::Pseudo(pseudo) => pseudo.to_css(printer),
    }
  }
}

impl ToCss for Declaration {
  fn to_css(&self, printer: &mut Printer) {
    printer.push(&self.property);
    printer.push_char(':');
    printer.whitespace();
    self.value.to_css(printer);
    if self.important {
      printer.whitespace();
      printer.push("!important");
    }
  }
}

impl ToCss for Expr {
  fn to_css(&self, printer: &mut Printer) {
    self.first.to_css(printer);
    for term in &self.rest {
      match term.operator {
        // The space operator is grammar, not formatting; minification keeps it.
        Operator::Space => printer.push_char(' '),
        Operator::Comma => {
          printer.push_char(',');
          printer.whitespace();
        }
        Operator::Slash => printer.push_char('/'),
      }
      term.term.to_css(printer);
    }
  }
}

impl ToCss for Term {
  fn to_css(&self, printer: &mut Printer) {
    match self {
      Term::Number { unary, value, unit } => {
        match unary {
          Some(UnaryOperator::Minus) => printer.push_char('-'),
          Some(UnaryOperator::Plus) => printer.push_char('+'),
          None => {}
        }
        printer.push(value);
        if let Some(unit) = unit {
          printer.push(unit);
        }
      }
      Term::Ident(name) => printer.push(name),
      Term::QuotedString(value) => {
        printer.push_char('"');
        printer.push(value);
        printer.push_char('"');
      }
      Term::Hex(value) => printer.push(value),
      Term::Url(url) => {
        printer.push("url(");
        printer.push(url);
        printer.push_char(')');
      }
      Term::Function(function) => function.to_css(printer),
    }
  }
}

impl ToCss for Function {
  fn to_css(&self, printer: &mut Printer) {
    printer.push(&self.name);
    printer.push_char('(');
    if let Some(args) = &self.args {
      args.to_css(printer);
    }
    printer.push_char(')');
  }
}
