use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the sprite scan and update passes. Every variant
/// carries enough context to point at the stylesheet rule that caused it.
#[derive(Debug, Error)]
pub enum ImageAssembleError {
  /// The same image must not be spriteable in one rule and un-spriteable in
  /// another; the packer could not honor both.
  #[error("image `{url}` is referenced both as an assembly candidate and as a non-candidate (selector `{selector}`)")]
  InconsistentReference { url: String, selector: String },

  #[error("image `{url}` referenced by `{selector}` was not found and no missing-image fallback is configured")]
  ImageNotFound { url: String, selector: String },

  #[error("cannot express sprite path `{path}` relative to `{base}`")]
  SpritePathNotRelative { path: PathBuf, base: PathBuf },

  #[error("failed to update image references for `{selector}`")]
  UpdateFailed {
    selector: String,
    #[source]
    source: Box<ImageAssembleError>,
  },
}
