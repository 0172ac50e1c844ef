use documented::{Documented, DocumentedFields};
use serde::{Deserialize, Serialize};

/// Display settings for CLI output formatting
#[derive(Clone, Debug, Default, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct DisplaySettings {
    /// Use ANSI colors when writing to a terminal
    /// Default: true
    pub color: Option<bool>,

    /// Highlight the searched terms inside package names
    /// Default: true
    pub highlight: Option<bool>,
}

impl DisplaySettings {
    pub fn color(&self) -> bool {
        self.color.unwrap_or(true)
    }

    pub fn highlight(&self) -> bool {
        self.highlight.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = DisplaySettings::default();
        assert!(settings.color());
        assert!(settings.highlight());
    }

    #[test]
    fn test_deserialize_partial() {
        let settings: DisplaySettings = toml::from_str("color = false").unwrap();
        assert!(!settings.color());
        assert!(settings.highlight());
    }
}
