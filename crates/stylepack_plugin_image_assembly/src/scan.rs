use std::collections::HashMap;
use std::collections::HashSet;
use std::path::PathBuf;

use glob_match::glob_match;
use indexmap::IndexMap;
use serde::Serialize;
use stylepack_core::plugin::{PluginContext, StylesheetAnalyzerPlugin};
use stylepack_core::printer::ToCss;
use stylepack_core::types::{Declaration, Page, Ruleset, StyleSheet};
use stylepack_core::visit::{walk_stylesheet, Visit};
use stylepack_filesystem::FileSystemRef;

use crate::background::{check_eligibility, find_background, ImagePosition};
use crate::config::{resolve_image_path, ImageAssemblyScanConfig};
use crate::error::ImageAssembleError;

pub const DEFAULT_BUCKET: &str = "default";

/// One background image eligible for spriting.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputImage {
  pub absolute_path: PathBuf,
  /// The reference as written in the stylesheet.
  pub original_path: String,
  pub position: ImagePosition,
}

/// An ordered, de-duplicated list of images destined for one sprite sheet.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAssemblyScanOutput {
  pub bucket: String,
  pub images: Vec<InputImage>,
}

/// Declarations that looked like background-image candidates but failed a
/// spriting criterion. Diagnostics only; the tree is never touched.
#[derive(Debug, Default)]
pub struct ImageAssemblyAnalysisLog {
  entries: Vec<AnalysisEntry>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisEntry {
  pub url: String,
  pub selector: String,
  pub reason: String,
}

impl ImageAssemblyAnalysisLog {
  fn record(&mut self, url: String, selector: String, reason: String) {
    self.entries.push(AnalysisEntry {
      url,
      selector,
      reason,
    });
  }

  pub fn entries(&self) -> &[AnalysisEntry] {
    &self.entries
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

#[derive(Debug)]
pub struct ScanResult {
  pub outputs: Vec<ImageAssemblyScanOutput>,
  pub log: ImageAssemblyAnalysisLog,
}

/// Read-only pass that collects spriteable background images into buckets.
///
/// A URL classified eligible in one rule and ineligible in another is a
/// fatal inconsistency: the packer would have to sprite it and leave it
/// alone at the same time.
#[derive(Debug)]
pub struct ImageAssemblyScanner {
  config: ImageAssemblyScanConfig,
  file_system: FileSystemRef,
  stylesheet_path: PathBuf,
  buckets: IndexMap<String, Vec<InputImage>>,
  eligible: HashMap<String, ImagePosition>,
  failed: HashSet<String>,
  log: ImageAssemblyAnalysisLog,
  error: Option<ImageAssembleError>,
}

impl ImageAssemblyScanner {
  pub fn new(
    ctx: &PluginContext,
    config: ImageAssemblyScanConfig,
    stylesheet_path: impl Into<PathBuf>,
  ) -> Self {
    let mut buckets: IndexMap<String, Vec<InputImage>> = IndexMap::new();
    for bucket in &config.buckets {
      buckets.insert(bucket.name.clone(), Vec::new());
    }
    buckets.insert(DEFAULT_BUCKET.to_string(), Vec::new());

    ImageAssemblyScanner {
      config,
      file_system: ctx.file_system.clone(),
      stylesheet_path: stylesheet_path.into(),
      buckets,
      eligible: HashMap::new(),
      failed: HashSet::new(),
      log: ImageAssemblyAnalysisLog::default(),
      error: None,
    }
  }

  /// Walk the stylesheet once and hand back the bucketed scan outputs.
  /// Empty buckets are dropped.
  pub fn scan(mut self, stylesheet: &StyleSheet) -> Result<ScanResult, anyhow::Error> {
    self.analyze(stylesheet)
  }

  fn is_ignored(&self, url: &str) -> bool {
    let url = url.replace('\\', "/");
    self.config.ignore_images.iter().any(|pattern| {
      let pattern = pattern.replace('\\', "/");
      if pattern.contains('*') {
        glob_match(&pattern, &url)
      } else {
        pattern == url
      }
    })
  }

  fn bucket_for(&self, url: &str) -> String {
    let url = url.replace('\\', "/");
    self
      .config
      .buckets
      .iter()
      .find(|bucket| {
        bucket
          .image_paths
          .iter()
          .any(|path| path.replace('\\', "/") == url)
      })
      .map(|bucket| bucket.name.clone())
      .unwrap_or_else(|| DEFAULT_BUCKET.to_string())
  }

  fn process_declarations(&mut self, selector: &str, declarations: &[Declaration]) {
    if self.error.is_some() {
      return;
    }
    let Some(reference) = find_background(declarations) else {
      return;
    };
    let url = reference.url.clone();
    if self.is_ignored(&url) {
      tracing::debug!(url = %url, "image is on the ignore list");
      return;
    }

    match check_eligibility(&reference) {
      Err(failure) => {
        if self.eligible.contains_key(&url) {
          self.error = Some(ImageAssembleError::InconsistentReference {
            url,
            selector: selector.to_string(),
          });
          return;
        }
        tracing::debug!(url = %url, reason = %failure, "image failed spriting criteria");
        self.failed.insert(url.clone());
        self.log.record(url, selector.to_string(), failure.to_string());
      }
      Ok(eligible) => {
        if self.failed.contains(&url) {
          self.error = Some(ImageAssembleError::InconsistentReference {
            url,
            selector: selector.to_string(),
          });
          return;
        }
        self.eligible.insert(url.clone(), eligible.position);

        let resolved = resolve_image_path(&url, &self.config.available_sources, &self.stylesheet_path);
        let absolute = if self.file_system.is_file(&resolved) {
          resolved
        } else if let Some(fallback) = &self.config.missing_image {
          tracing::warn!(url = %url, "image not found, substituting the missing-image fallback");
          resolve_image_path(fallback, &self.config.available_sources, &self.stylesheet_path)
        } else if self.config.error_on_missing_image {
          self.error = Some(ImageAssembleError::ImageNotFound {
            url,
            selector: selector.to_string(),
          });
          return;
        } else {
          tracing::debug!(url = %url, "image not found, leaving the reference unresolved");
          return;
        };

        let bucket = self.bucket_for(&url);
        let image = InputImage {
          absolute_path: absolute,
          original_path: url,
          position: eligible.position,
        };
        let images = self.buckets.entry(bucket).or_default();
        let duplicate = images.iter().any(|existing| {
          existing.absolute_path == image.absolute_path && existing.position == image.position
        });
        if !duplicate {
          images.push(image);
        }
      }
    }
  }
}

impl StylesheetAnalyzerPlugin for ImageAssemblyScanner {
  type Output = ScanResult;

  fn analyze(&mut self, stylesheet: &StyleSheet) -> Result<ScanResult, anyhow::Error> {
    walk_stylesheet(self, stylesheet);
    if let Some(error) = self.error.take() {
      return Err(error.into());
    }
    let outputs = std::mem::take(&mut self.buckets)
      .into_iter()
      .filter(|(_, images)| !images.is_empty())
      .map(|(bucket, images)| ImageAssemblyScanOutput { bucket, images })
      .collect();
    Ok(ScanResult {
      outputs,
      log: std::mem::take(&mut self.log),
    })
  }
}

impl Visit for ImageAssemblyScanner {
  fn visit_ruleset(&mut self, n: &Ruleset) {
    let selector = n.selectors.to_css_string();
    self.process_declarations(&selector, &n.declarations);
  }

  fn visit_page(&mut self, n: &Page) {
    let selector = match &n.pseudo {
      Some(pseudo) => format!("@page:{pseudo}"),
      None => "@page".to_string(),
    };
    self.process_declarations(&selector, &n.declarations);
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use pretty_assertions::assert_eq;
  use stylepack_core::plugin::PluginOptions;
  use stylepack_core::types::{
    Expr, Media, Operator, Rule, Selector, SelectorsGroup, SimpleSelector, Term,
  };
  use stylepack_filesystem::InMemoryFileSystem;

  use super::*;
  use crate::config::AssemblyBucketConfig;

  fn context(files: &[&str]) -> PluginContext {
    let file_system = InMemoryFileSystem::new();
    for file in files {
      file_system.write_file(file, "png");
    }
    PluginContext {
      file_system: Arc::new(file_system),
      options: Arc::new(PluginOptions::default()),
    }
  }

  fn background_rule(class: &str, url: &str) -> Rule {
    Rule::Ruleset(Ruleset::new(
      SelectorsGroup::single(Selector::simple(SimpleSelector::class(class))),
      vec![
        Declaration::new("background-image", Expr::single(Term::url(url))),
        Declaration::new("background-repeat", Expr::ident("no-repeat")),
      ],
    ))
  }

  fn scan(
    config: ImageAssemblyScanConfig,
    ctx: &PluginContext,
    stylesheet: &StyleSheet,
  ) -> Result<ScanResult, anyhow::Error> {
    ImageAssemblyScanner::new(ctx, config, "/project/css/site.css").scan(stylesheet)
  }

  #[test]
  fn collects_and_deduplicates_eligible_images() {
    let ctx = context(&["/project/css/img/a.png", "/project/css/img/b.png"]);
    let stylesheet = StyleSheet::from_rules(vec![
      background_rule("one", "img/a.png"),
      background_rule("two", "img/b.png"),
      background_rule("three", "img/a.png"),
    ]);
    let result = scan(ImageAssemblyScanConfig::default(), &ctx, &stylesheet).unwrap();

    assert_eq!(result.outputs.len(), 1);
    let output = &result.outputs[0];
    assert_eq!(output.bucket, DEFAULT_BUCKET);
    assert_eq!(
      output
        .images
        .iter()
        .map(|image| image.original_path.as_str())
        .collect::<Vec<_>>(),
      vec!["img/a.png", "img/b.png"]
    );
    assert_eq!(
      output.images[0].absolute_path,
      PathBuf::from("/project/css/img/a.png")
    );
  }

  #[test]
  fn scans_rulesets_nested_in_media_blocks() {
    let ctx = context(&["/project/css/img/a.png"]);
    let stylesheet = StyleSheet::from_rules(vec![Rule::Media(Media {
      queries: vec!["screen".into()],
      rulesets: vec![Ruleset::new(
        SelectorsGroup::single(Selector::simple(SimpleSelector::class("a"))),
        vec![
          Declaration::new("background-image", Expr::single(Term::url("img/a.png"))),
          Declaration::new("background-repeat", Expr::ident("no-repeat")),
        ],
      )],
      pages: vec![],
    })]);
    let result = scan(ImageAssemblyScanConfig::default(), &ctx, &stylesheet).unwrap();
    assert_eq!(result.outputs[0].images.len(), 1);
  }

  #[test]
  fn inconsistent_usage_is_fatal() {
    let ctx = context(&["/project/css/img/a.png"]);
    let ineligible = Rule::Ruleset(Ruleset::new(
      SelectorsGroup::single(Selector::simple(SimpleSelector::class("stretched"))),
      vec![
        Declaration::new("background-image", Expr::single(Term::url("img/a.png"))),
        Declaration::new("background-repeat", Expr::ident("no-repeat")),
        Declaration::new(
          "background-size",
          Expr::single(Term::length("50", "px")).push(Operator::Space, Term::length("50", "px")),
        ),
      ],
    ));
    let stylesheet =
      StyleSheet::from_rules(vec![background_rule("plain", "img/a.png"), ineligible]);

    let error = scan(ImageAssemblyScanConfig::default(), &ctx, &stylesheet).unwrap_err();
    let error = error.downcast_ref::<ImageAssembleError>().unwrap();
    assert!(matches!(
      error,
      ImageAssembleError::InconsistentReference { url, .. } if url == "img/a.png"
    ));
  }

  #[test]
  fn criteria_failures_land_in_the_analysis_log() {
    let ctx = context(&["/project/css/img/a.png"]);
    let stylesheet = StyleSheet::from_rules(vec![Rule::Ruleset(Ruleset::new(
      SelectorsGroup::single(Selector::simple(SimpleSelector::class("tiled"))),
      vec![
        Declaration::new("background-image", Expr::single(Term::url("img/a.png"))),
        Declaration::new("background-repeat", Expr::ident("repeat-x")),
      ],
    ))]);
    let result = scan(ImageAssemblyScanConfig::default(), &ctx, &stylesheet).unwrap();
    assert!(result.outputs.is_empty());
    assert_eq!(result.log.entries().len(), 1);
    assert_eq!(result.log.entries()[0].url, "img/a.png");
    assert_eq!(result.log.entries()[0].selector, ".tiled");
  }

  #[test]
  fn wildcard_ignore_references_are_skipped() {
    let ctx = context(&["/project/css/img/a.png"]);
    let config = ImageAssemblyScanConfig {
      ignore_images: vec!["img/*".into()],
      ..Default::default()
    };
    let stylesheet = StyleSheet::from_rules(vec![background_rule("a", "img/a.png")]);
    let result = scan(config, &ctx, &stylesheet).unwrap();
    assert!(result.outputs.is_empty());
    assert!(result.log.is_empty());
  }

  #[test]
  fn images_route_to_the_first_matching_bucket() {
    let ctx = context(&["/project/css/img/a.png", "/project/css/img/b.png"]);
    let config = ImageAssemblyScanConfig {
      buckets: vec![AssemblyBucketConfig {
        name: "icons".into(),
        image_paths: vec!["img/a.png".into()],
      }],
      ..Default::default()
    };
    let stylesheet = StyleSheet::from_rules(vec![
      background_rule("a", "img/a.png"),
      background_rule("b", "img/b.png"),
    ]);
    let result = scan(config, &ctx, &stylesheet).unwrap();

    assert_eq!(
      result
        .outputs
        .iter()
        .map(|output| output.bucket.as_str())
        .collect::<Vec<_>>(),
      vec!["icons", DEFAULT_BUCKET]
    );
  }

  #[test]
  fn missing_images_fail_when_configured_to() {
    let ctx = context(&[]);
    let config = ImageAssemblyScanConfig {
      error_on_missing_image: true,
      ..Default::default()
    };
    let stylesheet = StyleSheet::from_rules(vec![background_rule("a", "img/missing.png")]);
    let error = scan(config, &ctx, &stylesheet).unwrap_err();
    let error = error.downcast_ref::<ImageAssembleError>().unwrap();
    assert!(matches!(error, ImageAssembleError::ImageNotFound { .. }));
  }

  #[test]
  fn missing_images_fall_back_when_a_fallback_is_configured() {
    let ctx = context(&["/project/css/img/missing-image.png"]);
    let config = ImageAssemblyScanConfig {
      missing_image: Some("img/missing-image.png".into()),
      ..Default::default()
    };
    let stylesheet = StyleSheet::from_rules(vec![background_rule("a", "img/gone.png")]);
    let result = scan(config, &ctx, &stylesheet).unwrap();
    assert_eq!(
      result.outputs[0].images[0].absolute_path,
      PathBuf::from("/project/css/img/missing-image.png")
    );
  }

  #[test]
  fn missing_images_are_skipped_silently_by_default() {
    let ctx = context(&[]);
    let stylesheet = StyleSheet::from_rules(vec![background_rule("a", "img/gone.png")]);
    let result = scan(ImageAssemblyScanConfig::default(), &ctx, &stylesheet).unwrap();
    assert!(result.outputs.is_empty());
  }
}
