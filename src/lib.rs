//! Decode, validate and encode VAST 4.2 (Video Ad Serving Template) documents.
//!
//! ```no_run
//! let xml = std::fs::read("ad.xml").unwrap();
//! let vast = vast_codec::decode(&xml).unwrap();
//! let bytes = vast_codec::encode(&vast).unwrap();
//! ```

pub mod error;
pub mod models;
pub mod parser;
pub mod paths;
pub mod settings;
pub mod validate;
pub mod values;
pub mod writer;
pub mod xml;

pub use error::{DecodeError, EncodeError, ErrorKind, Location, Result, VastError};
pub use models::*;
pub use parser::Decoded;
pub use settings::{CodecSettings, Severity, UnknownElements};
pub use validate::{validate, Issue};
pub use values::{CdataString, Duration, Offset, PlainString};

/// Decode a VAST document with the default settings.
///
/// Advisory issues are logged and dropped; anything more serious is returned as an error.
pub fn decode(xml: &[u8]) -> Result<Vast> {
    decode_with(xml, &CodecSettings::default()).map(|decoded| decoded.vast)
}

/// Decode a VAST document, returning the warnings alongside it.
pub fn decode_with(xml: &[u8], settings: &CodecSettings) -> Result<Decoded> {
    parser::decode_with(xml, settings)
}

/// Parse VAST XML held in a string
pub fn parse_vast(xml: &str) -> Result<Vast> {
    decode(xml.as_bytes())
}

/// Encode a document as UTF-8 XML, refusing structurally invalid documents.
pub fn encode(vast: &Vast) -> Result<Vec<u8>> {
    encode_with(vast, &CodecSettings::default())
}

/// Encode a document under `settings`, which pick the indentation and how
/// advisory rule violations are treated.
pub fn encode_with(vast: &Vast, settings: &CodecSettings) -> Result<Vec<u8>> {
    writer::encode_with(vast, settings)
}

/// Encode a document with the default settings and return the XML as a `String`.
pub fn encode_to_string(vast: &Vast) -> Result<String> {
    let bytes = encode(vast)?;
    // the writer only ever emits UTF-8
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
