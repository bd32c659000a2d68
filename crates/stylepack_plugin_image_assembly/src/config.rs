use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageAssemblyScanConfig {
  /// Image references to leave alone: exact paths or `dir/*` wildcards.
  pub ignore_images: Vec<String>,

  /// Named sprite-sheet buckets. An eligible image lands in the first
  /// bucket whose candidate list contains its as-written path, else in the
  /// default bucket.
  pub buckets: Vec<AssemblyBucketConfig>,

  /// Substituted for references that do not resolve to a file on disk.
  pub missing_image: Option<String>,

  /// Fail the scan instead of skipping an unresolved reference.
  pub error_on_missing_image: bool,

  /// Unit the eventual update pass will write. The scan itself is
  /// unit-free; this rides along so one config block drives both passes.
  pub output_unit: String,

  pub output_unit_factor: f64,

  /// As-written reference → absolute source path, for images that do not
  /// live relative to the stylesheet.
  pub available_sources: HashMap<String, PathBuf>,
}

impl Default for ImageAssemblyScanConfig {
  fn default() -> Self {
    ImageAssemblyScanConfig {
      ignore_images: Vec::new(),
      buckets: Vec::new(),
      missing_image: None,
      error_on_missing_image: false,
      output_unit: "px".into(),
      output_unit_factor: 1.0,
      available_sources: HashMap::new(),
    }
  }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssemblyBucketConfig {
  pub name: String,
  pub image_paths: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageAssemblyUpdateConfig {
  /// Density the sprite sheet was rendered at; offsets and sizes scale by
  /// its inverse.
  pub dpi: f64,

  /// Unit written into rewritten offsets and sizes, e.g. `px` or `rem`.
  pub output_unit: String,

  /// Multiplier applied when converting pixel values to the output unit.
  pub output_unit_factor: f64,

  /// Where the build writes its output; sprite URLs are made relative to
  /// this directory when set, else to the stylesheet's own directory.
  pub destination_dir: Option<PathBuf>,

  /// Prepended verbatim to every rewritten sprite URL.
  pub path_prefix: Option<String>,

  pub available_sources: HashMap<String, PathBuf>,
}

impl Default for ImageAssemblyUpdateConfig {
  fn default() -> Self {
    ImageAssemblyUpdateConfig {
      dpi: 1.0,
      output_unit: "px".into(),
      output_unit_factor: 1.0,
      destination_dir: None,
      path_prefix: None,
      available_sources: HashMap::new(),
    }
  }
}

impl ImageAssemblyUpdateConfig {
  /// Carry a scan config's unit and source settings into the update pass
  /// that consumes the scan's layout.
  pub fn from_scan(scan: &ImageAssemblyScanConfig, dpi: f64) -> Self {
    ImageAssemblyUpdateConfig {
      dpi,
      output_unit: scan.output_unit.clone(),
      output_unit_factor: scan.output_unit_factor,
      available_sources: scan.available_sources.clone(),
      ..Default::default()
    }
  }
}

/// Resolve an as-written image reference to an absolute source path, via
/// the explicit source map when one is configured, else relative to the
/// stylesheet.
pub(crate) fn resolve_image_path(
  url: &str,
  available_sources: &HashMap<String, PathBuf>,
  stylesheet_path: &Path,
) -> PathBuf {
  if let Some(source) = available_sources.get(url) {
    return source.clone();
  }
  let relative = Path::new(url);
  if relative.is_absolute() {
    return relative.to_path_buf();
  }
  match stylesheet_path.parent() {
    Some(dir) => dir.join(relative),
    None => relative.to_path_buf(),
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn resolves_relative_to_the_stylesheet() {
    let resolved = resolve_image_path(
      "img/logo.png",
      &HashMap::new(),
      Path::new("/project/css/site.css"),
    );
    assert_eq!(resolved, PathBuf::from("/project/css/img/logo.png"));
  }

  #[test]
  fn the_source_map_takes_precedence() {
    let sources = HashMap::from([(
      "img/logo.png".to_string(),
      PathBuf::from("/assets/logo.png"),
    )]);
    let resolved = resolve_image_path("img/logo.png", &sources, Path::new("/project/css/site.css"));
    assert_eq!(resolved, PathBuf::from("/assets/logo.png"));
  }

  #[test]
  fn update_config_defaults_to_neutral_scaling() {
    let config = ImageAssemblyUpdateConfig::default();
    assert_eq!(config.dpi, 1.0);
    assert_eq!(config.output_unit, "px");
    assert_eq!(config.output_unit_factor, 1.0);
  }

  #[test]
  fn scan_config_deserializes_from_camel_case_json() {
    let config: ImageAssemblyScanConfig = serde_json::from_str(
      r#"{
        "ignoreImages": ["img/flags/*"],
        "buckets": [{"name": "icons", "imagePaths": ["img/save.png"]}],
        "missingImage": "img/blank.png",
        "errorOnMissingImage": true
      }"#,
    )
    .unwrap();
    assert_eq!(config.ignore_images, vec!["img/flags/*"]);
    assert_eq!(config.buckets[0].name, "icons");
    assert_eq!(config.missing_image.as_deref(), Some("img/blank.png"));
    assert!(config.error_on_missing_image);
    assert_eq!(config.output_unit, "px");
  }

  #[test]
  fn update_config_inherits_the_scan_units() {
    let scan = ImageAssemblyScanConfig {
      output_unit: "rem".into(),
      output_unit_factor: 0.0625,
      ..Default::default()
    };
    let update = ImageAssemblyUpdateConfig::from_scan(&scan, 2.0);
    assert_eq!(update.dpi, 2.0);
    assert_eq!(update.output_unit, "rem");
    assert_eq!(update.output_unit_factor, 0.0625);
  }
}
