use serde::{Deserialize, Serialize};

use crate::xml::DEFAULT_MAX_DEPTH;

/// How seriously a rule violation is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Reported and logged, the document is still returned.
    Warning,
    /// Aborts the decode or encode.
    Error,
}

/// What the decoder does with elements the model has no field for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnknownElements {
    /// Skip them (logged at debug level).
    Skip,
    /// Fail with `UnexpectedElement`.
    Reject,
}

/// Knobs for decoding and encoding. The default is strict about structure,
/// lenient about advisory rules and tolerant of unknown elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecSettings {
    permissive: bool,
    advisory: Severity,
    unknown_elements: UnknownElements,
    indent: Option<usize>,
    max_depth: usize,
}

impl Default for CodecSettings {
    fn default() -> Self {
        CodecSettings {
            permissive: false,
            advisory: Severity::Warning,
            unknown_elements: UnknownElements::Skip,
            indent: Some(2),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CodecSettings {
    pub fn new() -> Self {
        CodecSettings::default()
    }

    /// Demote structural violations that leave the document usable (bad pricing
    /// model, progress tracker without offset) to warnings when decoding.
    /// An `<Ad>` without exactly one payload is fatal regardless.
    pub fn permissive(mut self, permissive: bool) -> Self {
        self.permissive = permissive;
        self
    }

    pub fn advisory_severity(mut self, severity: Severity) -> Self {
        self.advisory = severity;
        self
    }

    pub fn unknown_elements(mut self, policy: UnknownElements) -> Self {
        self.unknown_elements = policy;
        self
    }

    /// Indentation width of encoded output; `None` writes everything on one line.
    pub fn indent(mut self, indent: Option<usize>) -> Self {
        self.indent = indent;
        self
    }

    /// Deepest element nesting the decoder accepts before failing with `MalformedXml`.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn is_permissive(&self) -> bool {
        self.permissive
    }

    pub fn get_advisory_severity(&self) -> Severity {
        self.advisory
    }

    pub fn get_unknown_elements(&self) -> UnknownElements {
        self.unknown_elements
    }

    pub fn get_indent(&self) -> Option<usize> {
        self.indent
    }

    pub fn get_max_depth(&self) -> usize {
        self.max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_strict_with_advisory_warnings() {
        let settings = CodecSettings::default();
        assert!(!settings.is_permissive());
        assert_eq!(settings.get_advisory_severity(), Severity::Warning);
        assert_eq!(settings.get_unknown_elements(), UnknownElements::Skip);
        assert_eq!(settings.get_indent(), Some(2));
        assert_eq!(settings.get_max_depth(), 256);
    }

    #[test]
    fn builder_overrides_each_knob() {
        let settings = CodecSettings::new()
            .permissive(true)
            .advisory_severity(Severity::Error)
            .unknown_elements(UnknownElements::Reject)
            .indent(None)
            .max_depth(32);
        assert!(settings.is_permissive());
        assert_eq!(settings.get_advisory_severity(), Severity::Error);
        assert_eq!(settings.get_unknown_elements(), UnknownElements::Reject);
        assert_eq!(settings.get_indent(), None);
        assert_eq!(settings.get_max_depth(), 32);
    }
}
