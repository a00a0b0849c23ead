use crate::consts;

/// Configuration for a template rewrite run
#[derive(Debug, Clone)]
pub struct Config {
    /// Identifier suffix marking template-only type and constructor names
    pub marker_suffix: String,
    /// Suffix appended to generated output files (and recognized to skip
    /// previously generated files as input)
    pub generated_suffix: String,
    /// Emit progress banners on stderr
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marker_suffix: consts::MARKER_SUFFIX.to_string(),
            generated_suffix: consts::GENERATED_SUFFIX.to_string(),
            verbose: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the marker suffix
    pub fn with_marker_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.marker_suffix = suffix.into();
        self
    }

    /// Override the generated-file suffix
    pub fn with_generated_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.generated_suffix = suffix.into();
        self
    }
}
