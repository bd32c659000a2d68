use once_cell::sync::Lazy;
use regex::Regex;
use stylepack_core::fold::{fold_term_children, Fold};
use stylepack_core::plugin::StylesheetTransformerPlugin;
use stylepack_core::types::{StyleSheet, Term, UnaryOperator};

static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]*\.?[0-9]*$").unwrap());

/// Rewrites numeric terms to their minimal form: leading and trailing zeros
/// are dropped (`0.50px` → `.5px`, `1.0` → `1`, `010px` → `10px`) and an
/// all-zero value becomes a bare unsigned `0` with no unit.
#[derive(Debug, Default)]
pub struct NumberOptimizer;

impl Fold for NumberOptimizer {
  fn fold_term(&mut self, n: Term) -> Term {
    match n {
      Term::Number { unary, value, unit }
        if DECIMAL.is_match(&value) && value.contains(|c: char| c.is_ascii_digit()) =>
      {
        minimize(unary, &value, unit)
      }
      other => fold_term_children(self, other),
    }
  }
}

impl StylesheetTransformerPlugin for NumberOptimizer {
  fn transform(&mut self, stylesheet: StyleSheet) -> Result<StyleSheet, anyhow::Error> {
    Ok(self.fold_stylesheet(stylesheet))
  }
}

fn minimize(unary: Option<UnaryOperator>, value: &str, unit: Option<String>) -> Term {
  let (int_part, frac_part) = match value.split_once('.') {
    Some((int_part, frac_part)) => (int_part, frac_part),
    None => (value, ""),
  };
  let int_part = int_part.trim_start_matches('0');
  let frac_part = frac_part.trim_end_matches('0');

  if int_part.is_empty() && frac_part.is_empty() {
    return Term::number("0");
  }

  let minimized = if frac_part.is_empty() {
    int_part.to_string()
  } else {
    format!("{int_part}.{frac_part}")
  };
  Term::Number {
    unary,
    value: minimized,
    unit,
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use stylepack_core::printer::ToCss;

  use super::*;

  fn minimized(term: Term) -> String {
    NumberOptimizer.fold_term(term).to_css_string()
  }

  #[test]
  fn zero_loses_its_unit_and_sign() {
    assert_eq!(minimized(Term::length("0.0", "px")), "0");
    assert_eq!(minimized(Term::number("0")), "0");
    assert_eq!(
      minimized(Term::Number {
        unary: Some(UnaryOperator::Minus),
        value: "000".into(),
        unit: Some("em".into()),
      }),
      "0"
    );
  }

  #[test]
  fn trailing_zeros_are_trimmed() {
    assert_eq!(minimized(Term::length("1.50", "px")), "1.5px");
    assert_eq!(minimized(Term::number("1.0")), "1");
  }

  #[test]
  fn leading_zeros_are_trimmed() {
    assert_eq!(minimized(Term::length("010", "px")), "10px");
    assert_eq!(minimized(Term::length("0.50", "px")), ".5px");
  }

  #[test]
  fn sign_survives_on_non_zero_values() {
    assert_eq!(
      minimized(Term::Number {
        unary: Some(UnaryOperator::Minus),
        value: "0.25".into(),
        unit: Some("em".into()),
      }),
      "-.25em"
    );
  }

  #[test]
  fn non_decimal_values_are_left_alone() {
    let term = Term::Ident("auto".into());
    assert_eq!(NumberOptimizer.fold_term(term.clone()), term);
  }
}
