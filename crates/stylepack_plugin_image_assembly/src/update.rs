use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use path_slash::PathBufExt;
use serde::Deserialize;
use stylepack_core::fold::Fold;
use stylepack_core::plugin::{PluginContext, StylesheetTransformerPlugin};
use stylepack_core::printer::ToCss;
use stylepack_core::types::{
  Declaration, Expr, Operator, Page, Ruleset, StyleSheet, Term, UnaryOperator,
  DEBUG_DECLARATION_PREFIX,
};

use crate::background::{check_eligibility, find_background, ImagePosition, PositionValue};
use crate::config::{resolve_image_path, ImageAssemblyUpdateConfig};
use crate::error::ImageAssembleError;

/// One image's placement in a sprite sheet, as reported by the external
/// packer.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssembledImage {
  pub original_file: PathBuf,
  pub position: ImagePosition,
  /// Sheet location, relative to the build's destination directory unless
  /// absolute.
  pub sprite_path: PathBuf,
  pub x: u32,
  pub y: u32,
  pub sheet_width: u32,
  pub sheet_height: u32,
}

/// Rewrites eligible background declarations against a sprite-sheet layout.
///
/// Recognition mirrors the scan pass but is tolerant: a declaration group
/// with no matching layout entry is left completely unchanged. A failure
/// while rewriting one group aborts the whole pass, wrapped with that
/// rule's selector text; partial rewriting of a stylesheet is not
/// supported.
#[derive(Debug)]
pub struct ImageAssemblyUpdater {
  config: ImageAssemblyUpdateConfig,
  layout: HashMap<(PathBuf, ImagePosition), AssembledImage>,
  stylesheet_path: PathBuf,
  error: Option<ImageAssembleError>,
}

impl ImageAssemblyUpdater {
  pub fn new(
    _ctx: &PluginContext,
    config: ImageAssemblyUpdateConfig,
    layout: Vec<AssembledImage>,
    stylesheet_path: impl Into<PathBuf>,
  ) -> Self {
    let layout = layout
      .into_iter()
      .map(|image| ((image.original_file.clone(), image.position), image))
      .collect();
    ImageAssemblyUpdater {
      config,
      layout,
      stylesheet_path: stylesheet_path.into(),
      error: None,
    }
  }

  fn update_declarations(
    &self,
    declarations: &[Declaration],
  ) -> Result<Option<Vec<Declaration>>, ImageAssembleError> {
    let Some(reference) = find_background(declarations) else {
      return Ok(None);
    };
    let Ok(eligible) = check_eligibility(&reference) else {
      return Ok(None);
    };
    let resolved = resolve_image_path(
      &eligible.url,
      &self.config.available_sources,
      &self.stylesheet_path,
    );
    let Some(assembled) = self.layout.get(&(resolved, eligible.position)) else {
      return Ok(None);
    };

    let sprite_url = self.sprite_url(assembled)?;
    let horizontal = match eligible.position {
      ImagePosition::Left => self.scaled_term(eligible.x_offset_px - assembled.x as f64),
      ImagePosition::Right => Term::Ident("right".into()),
      ImagePosition::Center => Term::Ident("center".into()),
    };
    let vertical = self.scaled_term(eligible.y_offset_px - assembled.y as f64);
    let position = Expr::single(horizontal).push(Operator::Space, vertical);
    let scale_sheet = (self.config.dpi - 1.0).abs() > f64::EPSILON;

    let mut updated = Vec::with_capacity(declarations.len() + 6);
    for (index, declaration) in declarations.iter().enumerate() {
      if index == reference.image_declaration {
        let mut rewritten = declaration.clone();
        rewritten.value = if reference.shorthand {
          rewrite_shorthand(&declaration.value, &sprite_url)
        } else {
          Expr::single(Term::Url(sprite_url.clone()))
        };
        updated.push(rewritten);
        if reference.position_declaration.is_none() {
          updated.push(Declaration::new("background-position", position.clone()));
        }
      } else if Some(index) == reference.position_declaration {
        updated.push(Declaration::new("background-position", position.clone()));
      } else if Some(index) == reference.size_declaration && scale_sheet {
        // replaced by the computed size below
      } else {
        updated.push(declaration.clone());
      }
    }

    if scale_sheet {
      updated.push(Declaration::new(
        "background-size",
        Expr::single(self.scaled_term(assembled.sheet_width as f64))
          .push(Operator::Space, self.scaled_term(assembled.sheet_height as f64)),
      ));
    }
    updated.extend(self.debug_declarations(&reference.positions, assembled));

    Ok(Some(updated))
  }

  /// The sheet's URL relative to the destination directory (or the
  /// stylesheet's own directory), slash-normalized, with the configured
  /// prefix prepended.
  fn sprite_url(&self, assembled: &AssembledImage) -> Result<String, ImageAssembleError> {
    let stylesheet_dir = self
      .stylesheet_path
      .parent()
      .unwrap_or_else(|| Path::new(""))
      .to_path_buf();
    let base = self
      .config
      .destination_dir
      .clone()
      .unwrap_or(stylesheet_dir);
    let full = if assembled.sprite_path.is_absolute() {
      assembled.sprite_path.clone()
    } else {
      base.join(&assembled.sprite_path)
    };
    let relative = pathdiff::diff_paths(&full, &base).ok_or_else(|| {
      ImageAssembleError::SpritePathNotRelative {
        path: full.clone(),
        base: base.clone(),
      }
    })?;
    let mut url = relative.to_slash_lossy();
    if let Some(prefix) = &self.config.path_prefix {
      url = format!("{prefix}{url}");
    }
    Ok(url)
  }

  /// A pixel quantity scaled into the output unit: `px × factor ÷ dpi`,
  /// rounded to three decimals. Zero collapses to a bare `0`.
  fn scaled_term(&self, pixels: f64) -> Term {
    let value =
      (pixels * self.config.output_unit_factor / self.config.dpi * 1000.0).round() / 1000.0;
    if value == 0.0 {
      return Term::number("0");
    }
    let (unary, magnitude) = if value < 0.0 {
      (Some(UnaryOperator::Minus), -value)
    } else {
      (None, value)
    };
    Term::Number {
      unary,
      value: format_number(magnitude),
      unit: Some(self.config.output_unit.clone()),
    }
  }

  /// Diagnostic declarations recording the rewrite's inputs. The printer
  /// drops them from minified output.
  fn debug_declarations(
    &self,
    positions: &[PositionValue],
    assembled: &AssembledImage,
  ) -> Vec<Declaration> {
    let horizontal = positions
      .first()
      .map(|position| position.to_string())
      .unwrap_or_else(|| "left".to_string());
    let vertical = positions
      .get(1)
      .map(|position| position.to_string())
      .unwrap_or_else(|| "top".to_string());
    vec![
      Declaration::new(
        format!("{DEBUG_DECLARATION_PREFIX}source-position"),
        Expr::ident(horizontal).push(Operator::Space, Term::Ident(vertical)),
      ),
      Declaration::new(
        format!("{DEBUG_DECLARATION_PREFIX}sprite-offset"),
        Expr::single(Term::length(assembled.x.to_string(), "px"))
          .push(Operator::Space, Term::length(assembled.y.to_string(), "px")),
      ),
      Declaration::new(
        format!("{DEBUG_DECLARATION_PREFIX}dpi"),
        Expr::single(Term::number(format_number(self.config.dpi))),
      ),
      Declaration::new(
        format!("{DEBUG_DECLARATION_PREFIX}sheet-size"),
        Expr::single(Term::length(assembled.sheet_width.to_string(), "px")).push(
          Operator::Space,
          Term::length(assembled.sheet_height.to_string(), "px"),
        ),
      ),
    ]
  }
}

/// Replace the shorthand's url and strip its position terms; the computed
/// `background-position` longhand emitted after the shorthand wins the
/// cascade.
fn rewrite_shorthand(value: &Expr, sprite_url: &str) -> Expr {
  let kept: Vec<Term> = value
    .terms()
    .filter_map(|term| match term {
      Term::Url(_) => Some(Term::Url(sprite_url.to_string())),
      other if crate::background::position_value(other).is_some() => None,
      other => Some(other.clone()),
    })
    .collect();
  let mut terms = kept.into_iter();
  let first = terms.next().unwrap_or_else(|| Term::Url(sprite_url.to_string()));
  terms.fold(Expr::single(first), |expr, term| {
    expr.push(Operator::Space, term)
  })
}

fn format_number(value: f64) -> String {
  let text = format!("{value:.3}");
  text.trim_end_matches('0').trim_end_matches('.').to_string()
}

impl Fold for ImageAssemblyUpdater {
  fn fold_ruleset(&mut self, n: Ruleset) -> Option<Ruleset> {
    if self.error.is_some() {
      return Some(n);
    }
    match self.update_declarations(&n.declarations) {
      Ok(Some(declarations)) => Some(Ruleset { declarations, ..n }),
      Ok(None) => Some(n),
      Err(error) => {
        self.error = Some(ImageAssembleError::UpdateFailed {
          selector: n.selectors.to_pretty_string(),
          source: Box::new(error),
        });
        Some(n)
      }
    }
  }

  fn fold_page(&mut self, n: Page) -> Option<Page> {
    if self.error.is_some() {
      return Some(n);
    }
    match self.update_declarations(&n.declarations) {
      Ok(Some(declarations)) => Some(Page { declarations, ..n }),
      Ok(None) => Some(n),
      Err(error) => {
        self.error = Some(ImageAssembleError::UpdateFailed {
          selector: "@page".to_string(),
          source: Box::new(error),
        });
        Some(n)
      }
    }
  }
}

impl StylesheetTransformerPlugin for ImageAssemblyUpdater {
  fn transform(&mut self, stylesheet: StyleSheet) -> Result<StyleSheet, anyhow::Error> {
    let output = self.fold_stylesheet(stylesheet);
    match self.error.take() {
      Some(error) => Err(error.into()),
      None => Ok(output),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use pretty_assertions::assert_eq;
  use stylepack_core::plugin::PluginOptions;
  use stylepack_core::types::{Rule, Selector, SelectorsGroup, SimpleSelector};
  use stylepack_filesystem::InMemoryFileSystem;

  use super::*;

  fn context() -> PluginContext {
    PluginContext {
      file_system: Arc::new(InMemoryFileSystem::new()),
      options: Arc::new(PluginOptions::default()),
    }
  }

  fn assembled(original_file: &str, position: ImagePosition) -> AssembledImage {
    AssembledImage {
      original_file: original_file.into(),
      position,
      sprite_path: "sprites/sheet.png".into(),
      x: 0,
      y: 40,
      sheet_width: 200,
      sheet_height: 100,
    }
  }

  fn background_ruleset(class: &str, declarations: Vec<Declaration>) -> Rule {
    Rule::Ruleset(Ruleset::new(
      SelectorsGroup::single(Selector::simple(SimpleSelector::class(class))),
      declarations,
    ))
  }

  fn longhand_group(url: &str) -> Vec<Declaration> {
    vec![
      Declaration::new("background-image", Expr::single(Term::url(url))),
      Declaration::new("background-repeat", Expr::ident("no-repeat")),
    ]
  }

  #[test]
  fn rewrites_url_position_and_size_at_high_dpi() {
    let config = ImageAssemblyUpdateConfig {
      dpi: 2.0,
      ..Default::default()
    };
    let mut updater = ImageAssemblyUpdater::new(
      &context(),
      config,
      vec![assembled("/project/css/img/a.png", ImagePosition::Left)],
      "/project/css/site.css",
    );
    let stylesheet =
      StyleSheet::from_rules(vec![background_ruleset("a", longhand_group("img/a.png"))]);
    let output = updater.transform(stylesheet).unwrap();
    assert_eq!(
      output.to_css_string(),
      ".a{background-image:url(sprites/sheet.png);\
       background-position:0 -20px;\
       background-repeat:no-repeat;\
       background-size:100px 50px}"
    );
  }

  #[test]
  fn unmatched_declarations_are_returned_unchanged() {
    let mut updater = ImageAssemblyUpdater::new(
      &context(),
      ImageAssemblyUpdateConfig::default(),
      vec![assembled("/project/css/img/other.png", ImagePosition::Left)],
      "/project/css/site.css",
    );
    let stylesheet =
      StyleSheet::from_rules(vec![background_ruleset("a", longhand_group("img/a.png"))]);
    let output = updater.transform(stylesheet.clone()).unwrap();
    assert_eq!(output, stylesheet);
  }

  #[test]
  fn neutral_dpi_adds_no_background_size() {
    let mut updater = ImageAssemblyUpdater::new(
      &context(),
      ImageAssemblyUpdateConfig::default(),
      vec![assembled("/project/css/img/a.png", ImagePosition::Left)],
      "/project/css/site.css",
    );
    let stylesheet =
      StyleSheet::from_rules(vec![background_ruleset("a", longhand_group("img/a.png"))]);
    let css = updater.transform(stylesheet).unwrap().to_css_string();
    assert!(!css.contains("background-size"));
    assert!(css.contains("background-position:0 -40px"));
  }

  #[test]
  fn right_anchored_images_keep_their_keyword() {
    let mut updater = ImageAssemblyUpdater::new(
      &context(),
      ImageAssemblyUpdateConfig::default(),
      vec![assembled("/project/css/img/a.png", ImagePosition::Right)],
      "/project/css/site.css",
    );
    let mut declarations = longhand_group("img/a.png");
    declarations.push(Declaration::new(
      "background-position",
      Expr::ident("right").push(Operator::Space, Term::Ident("top".into())),
    ));
    let stylesheet = StyleSheet::from_rules(vec![background_ruleset("a", declarations)]);
    let css = updater.transform(stylesheet).unwrap().to_css_string();
    assert!(css.contains("background-position:right -40px"));
  }

  #[test]
  fn shorthand_groups_gain_a_position_longhand() {
    let mut updater = ImageAssemblyUpdater::new(
      &context(),
      ImageAssemblyUpdateConfig::default(),
      vec![assembled("/project/css/img/a.png", ImagePosition::Left)],
      "/project/css/site.css",
    );
    let stylesheet = StyleSheet::from_rules(vec![background_ruleset(
      "a",
      vec![Declaration::new(
        "background",
        Expr::single(Term::url("img/a.png"))
          .push(Operator::Space, Term::Ident("no-repeat".into()))
          .push(Operator::Space, Term::Ident("left".into()))
          .push(Operator::Space, Term::Ident("top".into())),
      )],
    )]);
    let css = updater.transform(stylesheet).unwrap().to_css_string();
    assert!(css.contains("background:url(sprites/sheet.png) no-repeat;"));
    assert!(css.contains("background-position:0 -40px"));
  }

  #[test]
  fn debug_declarations_survive_pretty_printing_only() {
    let mut updater = ImageAssemblyUpdater::new(
      &context(),
      ImageAssemblyUpdateConfig::default(),
      vec![assembled("/project/css/img/a.png", ImagePosition::Left)],
      "/project/css/site.css",
    );
    let stylesheet =
      StyleSheet::from_rules(vec![background_ruleset("a", longhand_group("img/a.png"))]);
    let output = updater.transform(stylesheet).unwrap();
    assert!(!output.to_css_string().contains(DEBUG_DECLARATION_PREFIX));
    let pretty = output.to_pretty_string();
    assert!(pretty.contains("-stylepack-dbg-source-position: left top"));
    assert!(pretty.contains("-stylepack-dbg-sprite-offset: 0px 40px"));
    assert!(pretty.contains("-stylepack-dbg-sheet-size: 200px 100px"));
  }

  #[test]
  fn destination_dir_and_prefix_shape_the_sprite_url() {
    let config = ImageAssemblyUpdateConfig {
      destination_dir: Some("/out".into()),
      path_prefix: Some("../".into()),
      ..Default::default()
    };
    let mut updater = ImageAssemblyUpdater::new(
      &context(),
      config,
      vec![assembled("/project/css/img/a.png", ImagePosition::Left)],
      "/project/css/site.css",
    );
    let stylesheet =
      StyleSheet::from_rules(vec![background_ruleset("a", longhand_group("img/a.png"))]);
    let css = updater.transform(stylesheet).unwrap().to_css_string();
    assert!(css.contains("url(../sprites/sheet.png)"));
  }

  #[test]
  fn declared_offsets_shift_the_computed_position() {
    let mut updater = ImageAssemblyUpdater::new(
      &context(),
      ImageAssemblyUpdateConfig::default(),
      vec![assembled("/project/css/img/a.png", ImagePosition::Left)],
      "/project/css/site.css",
    );
    let mut declarations = longhand_group("img/a.png");
    declarations.push(Declaration::new(
      "background-position",
      Expr::single(Term::length("4", "px")).push(Operator::Space, Term::length("8", "px")),
    ));
    let stylesheet = StyleSheet::from_rules(vec![background_ruleset("a", declarations)]);
    let css = updater.transform(stylesheet).unwrap().to_css_string();
    assert!(css.contains("background-position:4px -32px"));
  }

  #[test]
  fn failures_are_wrapped_with_the_selector_context() {
    let mut image = assembled("site/img/a.png", ImagePosition::Left);
    image.sprite_path = "/elsewhere/sheet.png".into();
    // A bare relative stylesheet path gives the updater no absolute base to
    // diff the sprite path against.
    let mut updater = ImageAssemblyUpdater::new(
      &context(),
      ImageAssemblyUpdateConfig::default(),
      vec![image],
      "site/site.css",
    );
    let stylesheet =
      StyleSheet::from_rules(vec![background_ruleset("a", longhand_group("img/a.png"))]);
    let error = updater.transform(stylesheet).unwrap_err();
    let error = error.downcast_ref::<ImageAssembleError>().unwrap();
    match error {
      ImageAssembleError::UpdateFailed { selector, source } => {
        assert_eq!(selector, ".a");
        assert!(matches!(
          **source,
          ImageAssembleError::SpritePathNotRelative { .. }
        ));
      }
      other => panic!("unexpected error: {other}"),
    }
  }
}
