//! Recognition of background-image declaration groups and the eligibility
//! rules that gate spriting.

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;
use stylepack_core::printer::ToCss;
use stylepack_core::types::{Declaration, Term, UnaryOperator};
use thiserror::Error;

const REPEAT_KEYWORDS: [&str; 4] = ["repeat", "no-repeat", "repeat-x", "repeat-y"];

/// How an image anchors horizontally within its rule. The packer stacks
/// images vertically, so this classification decides which sheet column an
/// image may share.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ImagePosition {
  Left,
  Right,
  Center,
}

/// One parsed component of a background-position value.
#[derive(Clone, Debug, PartialEq)]
pub enum PositionValue {
  Left,
  Right,
  Center,
  Top,
  Bottom,
  Pixels(f64),
  Unsupported(String),
}

impl Display for PositionValue {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      PositionValue::Left => f.write_str("left"),
      PositionValue::Right => f.write_str("right"),
      PositionValue::Center => f.write_str("center"),
      PositionValue::Top => f.write_str("top"),
      PositionValue::Bottom => f.write_str("bottom"),
      PositionValue::Pixels(pixels) => write!(f, "{pixels}px"),
      PositionValue::Unsupported(text) => f.write_str(text),
    }
  }
}

/// The background image reference carried by one declaration group, before
/// eligibility checks.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundReference {
  pub url: String,
  /// True when the url came from the `background` shorthand rather than
  /// `background-image`.
  pub shorthand: bool,
  /// Position components in as-written order: horizontal, then vertical.
  pub positions: Vec<PositionValue>,
  pub repeat: Option<String>,
  /// Printed `background-size` value, when declared.
  pub size: Option<String>,
  pub multiple_images: bool,
  /// Index of the declaration whose value carries the url.
  pub image_declaration: usize,
  pub position_declaration: Option<usize>,
  pub size_declaration: Option<usize>,
}

/// Scan a declaration list for a background image reference. Returns `None`
/// when the group declares no `url(...)` background at all.
pub fn find_background(declarations: &[Declaration]) -> Option<BackgroundReference> {
  let mut url: Option<String> = None;
  let mut shorthand = false;
  let mut positions: Vec<PositionValue> = Vec::new();
  let mut repeat: Option<String> = None;
  let mut size: Option<String> = None;
  let mut multiple_images = false;
  let mut image_declaration = 0;
  let mut position_declaration = None;
  let mut size_declaration = None;

  for (index, declaration) in declarations.iter().enumerate() {
    let value = &declaration.value;
    match declaration.property.to_ascii_lowercase().as_str() {
      "background" => {
        if value.has_comma() {
          multiple_images = true;
        }
        for term in value.terms() {
          match term {
            Term::Url(found) => {
              if url.is_some() {
                multiple_images = true;
              } else {
                url = Some(found.clone());
                shorthand = true;
                image_declaration = index;
              }
            }
            Term::Function(function) if function.name.contains("gradient") => {
              multiple_images = true;
            }
            Term::Ident(ident)
              if REPEAT_KEYWORDS.contains(&ident.to_ascii_lowercase().as_str()) =>
            {
              repeat = Some(ident.to_ascii_lowercase());
            }
            other => {
              if let Some(position) = position_value(other) {
                positions.push(position);
              }
            }
          }
        }
      }
      "background-image" => {
        if value.has_comma() {
          multiple_images = true;
        }
        for term in value.terms() {
          match term {
            Term::Url(found) => {
              if url.is_some() {
                multiple_images = true;
              } else {
                url = Some(found.clone());
                shorthand = false;
                image_declaration = index;
              }
            }
            Term::Function(function) if function.name.contains("gradient") => {
              multiple_images = true;
            }
            _ => {}
          }
        }
      }
      "background-position" => {
        position_declaration = Some(index);
        positions = value
          .terms()
          .map(|term| {
            position_value(term).unwrap_or_else(|| PositionValue::Unsupported(term.to_css_string()))
          })
          .collect();
      }
      "background-repeat" => {
        if let Term::Ident(ident) = &value.first {
          repeat = Some(ident.to_ascii_lowercase());
        }
      }
      "background-size" => {
        size_declaration = Some(index);
        size = Some(value.to_css_string());
      }
      _ => {}
    }
  }

  Some(BackgroundReference {
    url: url?,
    shorthand,
    positions,
    repeat,
    size,
    multiple_images,
    image_declaration,
    position_declaration,
    size_declaration,
  })
}

/// Classify a term as a background-position component, if it is one.
pub fn position_value(term: &Term) -> Option<PositionValue> {
  match term {
    Term::Ident(ident) => match ident.to_ascii_lowercase().as_str() {
      "left" => Some(PositionValue::Left),
      "right" => Some(PositionValue::Right),
      "center" => Some(PositionValue::Center),
      "top" => Some(PositionValue::Top),
      "bottom" => Some(PositionValue::Bottom),
      _ => None,
    },
    Term::Number { unary, value, unit } => {
      let magnitude: f64 = value.parse().ok()?;
      let signed = match unary {
        Some(UnaryOperator::Minus) => -magnitude,
        _ => magnitude,
      };
      match unit.as_deref() {
        Some("px") => Some(PositionValue::Pixels(signed)),
        None if signed == 0.0 => Some(PositionValue::Pixels(0.0)),
        _ => Some(PositionValue::Unsupported(term.to_css_string())),
      }
    }
    _ => None,
  }
}

/// Why a recognized background reference cannot be sprited.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EligibilityFailure {
  #[error("more than one background image in the declaration group")]
  MultipleImages,
  #[error("background-size is declared")]
  BackgroundSizeDeclared,
  #[error("background-repeat must be declared as no-repeat")]
  RepeatNotNoRepeat,
  #[error("unsupported horizontal position `{0}`")]
  UnsupportedHorizontal(String),
  #[error("unsupported vertical position `{0}`")]
  UnsupportedVertical(String),
}

/// A reference that passed every spriting criterion.
#[derive(Clone, Debug, PartialEq)]
pub struct EligibleBackground {
  pub url: String,
  pub position: ImagePosition,
  /// Declared horizontal offset in source pixels, 0 for keyword anchors.
  pub x_offset_px: f64,
  /// Declared vertical offset in source pixels.
  pub y_offset_px: f64,
}

pub fn check_eligibility(
  reference: &BackgroundReference,
) -> Result<EligibleBackground, EligibilityFailure> {
  if reference.multiple_images {
    return Err(EligibilityFailure::MultipleImages);
  }
  if let Some(size) = &reference.size {
    if size != "auto" && size != "auto auto" {
      return Err(EligibilityFailure::BackgroundSizeDeclared);
    }
  }
  match reference.repeat.as_deref() {
    Some("no-repeat") => {}
    _ => return Err(EligibilityFailure::RepeatNotNoRepeat),
  }

  let horizontal = reference.positions.first().unwrap_or(&PositionValue::Left);
  let vertical = reference.positions.get(1).unwrap_or(&PositionValue::Top);

  let (position, x_offset_px) = match horizontal {
    PositionValue::Left => (ImagePosition::Left, 0.0),
    PositionValue::Pixels(pixels) => (ImagePosition::Left, *pixels),
    PositionValue::Right => (ImagePosition::Right, 0.0),
    PositionValue::Center => (ImagePosition::Center, 0.0),
    other => return Err(EligibilityFailure::UnsupportedHorizontal(other.to_string())),
  };
  let y_offset_px = match vertical {
    PositionValue::Top => 0.0,
    PositionValue::Pixels(pixels) => *pixels,
    other => return Err(EligibilityFailure::UnsupportedVertical(other.to_string())),
  };

  Ok(EligibleBackground {
    url: reference.url.clone(),
    position,
    x_offset_px,
    y_offset_px,
  })
}
