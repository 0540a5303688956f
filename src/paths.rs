//! Nested-path rules shared by the decoder and the encoder.
//!
//! Several VAST list fields live one level below a grouping element that holds
//! nothing else (`<Creatives><Creative/>...</Creatives>`). The model has no type for
//! the grouping element; these rules tell the codec which container to descend
//! through on decode and to synthesize on encode.

use crate::xml::Element;

/// A list of `item` elements reached through a `container` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nested {
    pub container: &'static str,
    pub item: &'static str,
}

pub const CREATIVES: Nested = Nested {
    container: "Creatives",
    item: "Creative",
};

pub const EXTENSIONS: Nested = Nested {
    container: "Extensions",
    item: "Extension",
};

pub const CREATIVE_EXTENSIONS: Nested = Nested {
    container: "CreativeExtensions",
    item: "CreativeExtension",
};

pub const TRACKING_EVENTS: Nested = Nested {
    container: "TrackingEvents",
    item: "Tracking",
};

pub const CLOSED_CAPTION_FILES: Nested = Nested {
    container: "ClosedCaptionFiles",
    item: "ClosedCaptionFile",
};

pub const ICONS: Nested = Nested {
    container: "Icons",
    item: "Icon",
};

pub const AD_VERIFICATIONS: Nested = Nested {
    container: "AdVerifications",
    item: "Verification",
};

/// `IconClicks` groups two differently named children, `IconClickThrough` and
/// `IconClickTracking`, so it is handled by name rather than as a [`Nested`] list.
pub const ICON_CLICKS: &str = "IconClicks";

impl Nested {
    /// Wraps already-encoded items in a freshly synthesized container.
    ///
    /// An empty `items` still yields the container: that is how an explicitly
    /// empty list is written.
    pub fn wrap(&self, items: Vec<Element>) -> Element {
        let mut container = Element::new(self.container);
        for item in items {
            container.push(item);
        }
        container
    }

    /// Encodes an optional list: `None` omits the container entirely.
    pub fn wrap_optional<T>(
        &self,
        items: Option<&Vec<T>>,
        encode: impl Fn(&T) -> Element,
    ) -> Option<Element> {
        items.map(|items| self.wrap(items.iter().map(&encode).collect()))
    }

    /// Encodes a list whose absent and empty states are the same on the wire.
    pub fn wrap_non_empty<T>(&self, items: &[T], encode: impl Fn(&T) -> Element) -> Option<Element> {
        if items.is_empty() {
            None
        } else {
            Some(self.wrap(items.iter().map(encode).collect()))
        }
    }
}
