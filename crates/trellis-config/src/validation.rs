use crate::diagnostics::{ConfigValidationError, ConfigWarning, ValidationDiagnostics};
use crate::{LoggingConfig, TrellisConfig};

/// Nesting beyond this is almost certainly a runaway recursion rather than a real type.
const MAX_REASONABLE_TYPE_DEPTH: usize = 4_096;

impl TrellisConfig {
    /// Validate semantic invariants, reporting as many problems as possible in one pass.
    #[must_use]
    pub fn validate(&self) -> ValidationDiagnostics {
        let mut out = ValidationDiagnostics::default();

        validate_resolution(self, &mut out);
        validate_logging(self, &mut out);

        out
    }
}

fn validate_resolution(config: &TrellisConfig, out: &mut ValidationDiagnostics) {
    let depth = config.resolution.max_type_depth;
    if depth == 0 {
        out.errors.push(ConfigValidationError::InvalidValue {
            toml_path: "resolution.max_type_depth".to_string(),
            message: "must be >= 1".to_string(),
        });
    } else if depth > MAX_REASONABLE_TYPE_DEPTH {
        out.warnings.push(ConfigWarning::InvalidValue {
            toml_path: "resolution.max_type_depth".to_string(),
            message: format!(
                "{depth} is unusually deep; malformed types may take long to be rejected"
            ),
        });
    }
}

fn validate_logging(config: &TrellisConfig, out: &mut ValidationDiagnostics) {
    let normalized = LoggingConfig::normalize_level_directives(&config.logging.level);
    if !config.logging.level.trim().is_empty()
        && tracing_subscriber::EnvFilter::try_new(normalized.clone()).is_err()
    {
        out.warnings.push(ConfigWarning::LoggingLevelInvalid {
            value: config.logging.level.clone(),
            normalized,
        });
    }
}
