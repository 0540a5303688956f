use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when decoding, validating or encoding VAST XML
#[derive(Error, Debug)]
pub enum VastError {
    #[error("Malformed XML at byte {position} ({location}): {message}")]
    MalformedXml {
        position: u64,
        location: Location,
        message: String,
    },

    #[error("{location}: invalid format: {message}")]
    InvalidFormat { location: Location, message: String },

    #[error("{location}: an <Ad> must contain exactly one <InLine> or <Wrapper>, found {found}")]
    MalformedAd {
        location: Location,
        found: &'static str,
    },

    #[error("{location}: invalid pricing model `{model}`, expected one of cpm, cpc, cpe, cpv")]
    InvalidPricingModel { location: Location, model: String },

    #[error("{location}: category is missing its authority attribute")]
    MissingAuthority { location: Location },

    #[error("{location}: progress tracking event requires an offset")]
    MissingOffset { location: Location },

    #[error("{location}: unexpected element <{name}>")]
    UnexpectedElement { location: Location, name: String },

    #[error("Failed to write XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

pub type Result<T> = std::result::Result<T, VastError>;

/// Errors returned by the decoding half of the codec.
pub type DecodeError = VastError;

/// Errors returned by the encoding half of the codec.
pub type EncodeError = VastError;

/// Fieldless mirror of [`VastError`], convenient for matching and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    MalformedXml,
    InvalidFormat,
    MalformedAd,
    InvalidPricingModel,
    MissingAuthority,
    MissingOffset,
    UnexpectedElement,
    Xml,
}

impl VastError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VastError::MalformedXml { .. } => ErrorKind::MalformedXml,
            VastError::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            VastError::MalformedAd { .. } => ErrorKind::MalformedAd,
            VastError::InvalidPricingModel { .. } => ErrorKind::InvalidPricingModel,
            VastError::MissingAuthority { .. } => ErrorKind::MissingAuthority,
            VastError::MissingOffset { .. } => ErrorKind::MissingOffset,
            VastError::UnexpectedElement { .. } => ErrorKind::UnexpectedElement,
            VastError::Xml(_) => ErrorKind::Xml,
        }
    }

    /// Where in the document the error was detected, when known.
    pub fn location(&self) -> Option<&Location> {
        match self {
            VastError::MalformedXml { location, .. }
            | VastError::InvalidFormat { location, .. }
            | VastError::MalformedAd { location, .. }
            | VastError::InvalidPricingModel { location, .. }
            | VastError::MissingAuthority { location }
            | VastError::MissingOffset { location }
            | VastError::UnexpectedElement { location, .. } => Some(location),
            VastError::Xml(_) => None,
        }
    }

    pub(crate) fn invalid_format(location: &Location, message: impl Into<String>) -> Self {
        VastError::InvalidFormat {
            location: location.clone(),
            message: message.into(),
        }
    }

    pub(crate) fn unexpected(location: &Location, name: &str) -> Self {
        VastError::UnexpectedElement {
            location: location.clone(),
            name: name.to_string(),
        }
    }
}

/// One step of a [`Location`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    /// An element, with its ordinal among same-named siblings.
    Element { name: String, ordinal: usize },
    /// An attribute of the preceding element.
    Attribute(String),
}

/// Path from the document root to the node an error refers to.
///
/// Renders as `VAST[0]/Ad[1]/InLine[0]/Creatives[0]/Creative[0]/Linear[0]/Duration[0]`,
/// every element step carrying its ordinal among same-named siblings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    steps: Vec<Step>,
}

impl Location {
    pub fn root() -> Self {
        Location::default()
    }

    /// Location of a child element reached by name and ordinal.
    pub fn child(&self, name: &str, ordinal: usize) -> Self {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend(self.steps.iter().cloned());
        steps.push(Step::Element {
            name: name.to_string(),
            ordinal,
        });
        Location { steps }
    }

    /// Location of an attribute on the element this location points at.
    pub fn attribute(&self, name: &str) -> Self {
        let mut steps = self.steps.clone();
        steps.push(Step::Attribute(name.to_string()));
        Location { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return f.write_str("/");
        }
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                Step::Element { name, ordinal } => {
                    if i > 0 {
                        f.write_str("/")?;
                    }
                    write!(f, "{}[{}]", name, ordinal)?;
                }
                Step::Attribute(name) => write!(f, "/@{}", name)?,
            }
        }
        Ok(())
    }
}
