use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;

use stylepack_filesystem::FileSystemRef;

use crate::types::StyleSheet;

/// Shared state handed to plugin constructors.
pub struct PluginContext {
  pub file_system: FileSystemRef,
  pub options: Arc<PluginOptions>,
}

#[derive(Debug, Default)]
pub struct PluginOptions {
  pub project_root: PathBuf,
}

/// Rewrites a stylesheet tree.
///
/// Transformer plugins implement the optimization, validation and sprite
/// rewrite passes. Multiple transformers run in series; the tree returned by
/// each is handed to the next. A transformer owns the tree for the duration
/// of one call and must return either the input unchanged or a newly built
/// tree; it never mutates nodes in place.
///
/// Passes are synchronous, whole-stylesheet walks. Parallelism happens one
/// stylesheet per worker, each with its own plugin instances.
pub trait StylesheetTransformerPlugin: Debug {
  /// Transform the stylesheet, or fail the whole pass.
  fn transform(&mut self, stylesheet: StyleSheet) -> Result<StyleSheet, anyhow::Error>;
}

/// Inspects a stylesheet without rewriting it and produces pass-specific
/// output, e.g. the sprite scan's image buckets. Analyzer instances
/// accumulate state during the walk and are good for a single run.
pub trait StylesheetAnalyzerPlugin: Debug {
  type Output;

  fn analyze(&mut self, stylesheet: &StyleSheet) -> Result<Self::Output, anyhow::Error>;
}
