use stylepack_core::fold::{fold_term_children, Fold};
use stylepack_core::plugin::StylesheetTransformerPlugin;
use stylepack_core::types::{Function, Operator, StyleSheet, Term};

/// Rewrites `rgb(r,g,b)` functions to hex colors and shortens hex colors.
///
/// Percentage channels map 0–100% onto 0–255 and are rounded. A six-digit
/// hex collapses to three digits when each channel repeats its digit, and
/// all hex output is lowercased, which also makes colors canonical for the
/// merge pass.
#[derive(Debug, Default)]
pub struct ColorOptimizer;

impl Fold for ColorOptimizer {
  fn fold_term(&mut self, n: Term) -> Term {
    let n = fold_term_children(self, n);
    match n {
      Term::Function(function) if function.name.eq_ignore_ascii_case("rgb") => {
        match rgb_to_hex(&function) {
          Some(hex) => Term::Hex(hex),
          None => Term::Function(function),
        }
      }
      Term::Hex(hex) => Term::Hex(normalize_hex(&hex)),
      other => other,
    }
  }
}

impl StylesheetTransformerPlugin for ColorOptimizer {
  fn transform(&mut self, stylesheet: StyleSheet) -> Result<StyleSheet, anyhow::Error> {
    Ok(self.fold_stylesheet(stylesheet))
  }
}

fn rgb_to_hex(function: &Function) -> Option<String> {
  let args = function.args.as_ref()?;
  if args.rest.len() != 2
    || !args.rest.iter().all(|term| term.operator == Operator::Comma)
  {
    return None;
  }
  let mut hex = String::from("#");
  for term in args.terms() {
    let Term::Number {
      unary: None,
      value,
      unit,
    } = term
    else {
      return None;
    };
    let channel = match unit.as_deref() {
      None => value.parse::<f64>().ok()?,
      Some("%") => value.parse::<f64>().ok()? * 255.0 / 100.0,
      Some(_) => return None,
    };
    let channel = channel.round().clamp(0.0, 255.0) as u8;
    hex.push_str(&format!("{channel:02x}"));
  }
  Some(normalize_hex(&hex))
}

fn normalize_hex(hex: &str) -> String {
  let hex = hex.to_ascii_lowercase();
  let Some(digits) = hex.strip_prefix('#') else {
    return hex;
  };
  if digits.len() == 6 {
    let bytes = digits.as_bytes();
    if bytes[0] == bytes[1] && bytes[2] == bytes[3] && bytes[4] == bytes[5] {
      return format!("#{}{}{}", bytes[0] as char, bytes[2] as char, bytes[4] as char);
    }
  }
  hex
}
