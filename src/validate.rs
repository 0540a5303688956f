//! Rules the type system cannot express, checked over a complete document.
//!
//! The walk collects every violation; [`triage`] then decides, per
//! [`CodecSettings`], which ones abort and which are only reported.

use log::warn;
use serde::Serialize;

use crate::error::{ErrorKind, Location, Result, VastError};
use crate::models::*;
use crate::paths;
use crate::settings::{CodecSettings, Severity};

const PRICING_MODELS: [&str; 4] = ["cpm", "cpc", "cpe", "cpv"];

/// Which side of the codec a document is being checked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Decode,
    Encode,
}

/// A rule violation that did not abort the operation.
#[derive(Debug, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub kind: ErrorKind,
    pub location: Option<Location>,
    pub message: String,
}

impl Issue {
    fn from_error(severity: Severity, error: &VastError) -> Self {
        Issue {
            severity,
            kind: error.kind(),
            location: error.location().cloned(),
            message: error.to_string(),
        }
    }
}

/// Whether a rule protects the document's structure or is advice from the
/// VAST specification that real-world documents routinely ignore.
pub fn is_advisory(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::MissingAuthority)
}

/// The severity a violation gets under the given settings.
///
/// Encoding never emits a structurally invalid document, so permissive mode only
/// applies to decoding. A malformed `<Ad>` is always an error.
pub fn severity_of(kind: ErrorKind, settings: &CodecSettings, direction: Direction) -> Severity {
    if is_advisory(kind) {
        return settings.get_advisory_severity();
    }
    match (kind, direction) {
        (ErrorKind::InvalidPricingModel | ErrorKind::MissingOffset, Direction::Decode)
            if settings.is_permissive() =>
        {
            Severity::Warning
        }
        _ => Severity::Error,
    }
}

/// Splits violations into the first hard error, if any, and the warnings.
pub fn triage(
    violations: Vec<VastError>,
    settings: &CodecSettings,
    direction: Direction,
) -> Result<Vec<Issue>> {
    let mut warnings = Vec::new();
    for violation in violations {
        match severity_of(violation.kind(), settings, direction) {
            Severity::Error => return Err(violation),
            Severity::Warning => {
                warn!("{}", violation);
                warnings.push(Issue::from_error(Severity::Warning, &violation));
            }
        }
    }
    Ok(warnings)
}

/// Collects every rule violation in the document, in document order.
pub fn validate(vast: &Vast) -> Vec<VastError> {
    let mut walker = Walker::default();
    let root = Location::root().child("VAST", 0);
    for (i, ad) in vast.ads.iter().enumerate() {
        let loc = root.child("Ad", i);
        match &ad.payload {
            AdPayload::InLine(inline) => walker.inline(inline, &loc.child("InLine", 0)),
            AdPayload::Wrapper(wrapper) => walker.wrapper(wrapper, &loc.child("Wrapper", 0)),
        }
    }
    walker.violations
}

/// Runs [`validate`] and [`triage`] in one go.
pub fn check(vast: &Vast, settings: &CodecSettings, direction: Direction) -> Result<Vec<Issue>> {
    triage(validate(vast), settings, direction)
}

#[derive(Default)]
struct Walker {
    violations: Vec<VastError>,
}

impl Walker {
    fn inline(&mut self, inline: &InLine, loc: &Location) {
        if let Some(pricing) = &inline.pricing {
            self.pricing(pricing, &loc.child("Pricing", 0));
        }
        for (i, category) in inline.categories.iter().enumerate() {
            self.category(category, &loc.child("Category", i));
        }
        if let Some(verifications) = &inline.ad_verifications {
            self.verifications(verifications, loc);
        }
        let creatives = loc.child(paths::CREATIVES.container, 0);
        for (i, creative) in inline.creatives.iter().enumerate() {
            let loc = creatives.child(paths::CREATIVES.item, i);
            match &creative.content {
                Some(CreativeContent::Linear(linear)) => {
                    self.trackers(linear.tracking_events.as_ref(), &loc.child("Linear", 0));
                }
                Some(CreativeContent::CompanionAds(ads)) => {
                    let loc = loc.child("CompanionAds", 0);
                    for (j, companion) in ads.companions.iter().enumerate() {
                        self.trackers(companion.tracking_events.as_ref(), &loc.child("Companion", j));
                    }
                }
                Some(CreativeContent::NonLinearAds(ads)) => {
                    self.trackers(ads.tracking_events.as_ref(), &loc.child("NonLinearAds", 0));
                }
                None => (),
            }
        }
    }

    fn wrapper(&mut self, wrapper: &Wrapper, loc: &Location) {
        if let Some(pricing) = &wrapper.pricing {
            self.pricing(pricing, &loc.child("Pricing", 0));
        }
        for (i, category) in wrapper.blocked_ad_categories.iter().enumerate() {
            self.category(category, &loc.child("BlockedAdCategories", i));
        }
        if let Some(verifications) = &wrapper.ad_verifications {
            self.verifications(verifications, loc);
        }
        let Some(creatives) = &wrapper.creatives else {
            return;
        };
        let container = loc.child(paths::CREATIVES.container, 0);
        for (i, creative) in creatives.iter().enumerate() {
            let loc = container.child(paths::CREATIVES.item, i);
            match &creative.content {
                Some(CreativeWrapperContent::Linear(linear)) => {
                    self.trackers(linear.tracking_events.as_ref(), &loc.child("Linear", 0));
                }
                Some(CreativeWrapperContent::CompanionAds(ads)) => {
                    let loc = loc.child("CompanionAds", 0);
                    for (j, companion) in ads.companions.iter().enumerate() {
                        self.trackers(companion.tracking_events.as_ref(), &loc.child("Companion", j));
                    }
                }
                Some(CreativeWrapperContent::NonLinearAds(ads)) => {
                    let loc = loc.child("NonLinearAds", 0);
                    self.trackers(ads.tracking_events.as_ref(), &loc);
                    for (j, non_linear) in ads.non_linears.iter().enumerate() {
                        self.trackers(non_linear.tracking_events.as_ref(), &loc.child("NonLinear", j));
                    }
                }
                None => (),
            }
        }
    }

    fn pricing(&mut self, pricing: &Pricing, loc: &Location) {
        let model = pricing.model.trim().to_ascii_lowercase();
        if !PRICING_MODELS.contains(&model.as_str()) {
            self.violations.push(VastError::InvalidPricingModel {
                location: loc.attribute("model"),
                model: pricing.model.clone(),
            });
        }
    }

    fn category(&mut self, category: &Category, loc: &Location) {
        let populated = !category.value.trim().is_empty();
        let has_authority = category.authority.as_deref().is_some_and(|a| !a.trim().is_empty());
        if populated && !has_authority {
            self.violations.push(VastError::MissingAuthority {
                location: loc.clone(),
            });
        }
    }

    fn verifications(&mut self, verifications: &[Verification], loc: &Location) {
        let container = loc.child(paths::AD_VERIFICATIONS.container, 0);
        for (i, verification) in verifications.iter().enumerate() {
            let loc = container.child(paths::AD_VERIFICATIONS.item, i);
            self.trackers(verification.tracking_events.as_ref(), &loc);
        }
    }

    fn trackers(&mut self, trackers: Option<&Vec<Tracking>>, loc: &Location) {
        let Some(trackers) = trackers else {
            return;
        };
        let container = loc.child(paths::TRACKING_EVENTS.container, 0);
        for (i, tracking) in trackers.iter().enumerate() {
            if tracking.event == TrackingEvent::Progress && tracking.offset.is_none() {
                self.violations.push(VastError::MissingOffset {
                    location: container.child(paths::TRACKING_EVENTS.item, i),
                });
            }
        }
    }
}
