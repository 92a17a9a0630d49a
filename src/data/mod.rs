pub mod build;
pub mod validate;

pub use build::{load_build, parse_build, sample_build, AbilityEntry, BuildConfig, BuildError};
pub use validate::{validate_build, ValidationDiagnostic, ValidationReport, ValidationSeverity};
