mod background;
mod config;
mod error;
mod scan;
mod update;

pub use background::{
  check_eligibility, find_background, BackgroundReference, EligibilityFailure, EligibleBackground,
  ImagePosition, PositionValue,
};
pub use config::{AssemblyBucketConfig, ImageAssemblyScanConfig, ImageAssemblyUpdateConfig};
pub use error::ImageAssembleError;
pub use scan::{
  AnalysisEntry, ImageAssemblyAnalysisLog, ImageAssemblyScanOutput, ImageAssemblyScanner,
  InputImage, ScanResult, DEFAULT_BUCKET,
};
pub use update::{AssembledImage, ImageAssemblyUpdater};
