use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use log::{debug, trace};

use crate::error::{Location, Result, VastError};
use crate::models::*;
use crate::paths::{self, Nested};
use crate::settings::{CodecSettings, UnknownElements};
use crate::validate::{self, Direction, Issue};
use crate::values::{CdataString, CharData, Duration, Offset};
use crate::xml::{Element, ParseOptions};

/// A decoded document together with the rule violations that did not abort decoding
#[derive(Debug)]
pub struct Decoded {
    pub vast: Vast,
    pub warnings: Vec<Issue>,
}

/// Decode VAST XML bytes, then validate the result under `settings`
pub fn decode_with(xml: &[u8], settings: &CodecSettings) -> Result<Decoded> {
    let options = ParseOptions {
        max_depth: settings.get_max_depth(),
        verbatim: &[paths::EXTENSIONS.item, paths::CREATIVE_EXTENSIONS.item],
    };
    let root = Element::parse_with(xml, &options)?;
    let vast = decode_element(&root, settings)?;
    let warnings = validate::check(&vast, settings, Direction::Decode)?;
    Ok(Decoded { vast, warnings })
}

/// Map an already-parsed element tree onto the document model, without validation
pub fn decode_element(root: &Element, settings: &CodecSettings) -> Result<Vast> {
    Decoder { settings }.parse_vast_element(root)
}

struct Decoder<'s> {
    settings: &'s CodecSettings,
}

/// Child elements paired with their ordinal among same-named siblings
fn indexed(element: &Element) -> Vec<(usize, &Element)> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    element
        .elements()
        .map(|child| {
            let count = seen.entry(child.name.as_str()).or_insert(0);
            let ordinal = *count;
            *count += 1;
            (ordinal, child)
        })
        .collect()
}

fn text<T: CharData>(element: &Element) -> T {
    T::from_text(element.text())
}

fn attr_string(element: &Element, name: &str) -> Option<String> {
    element.attr(name).map(str::to_string)
}

/// Parse a typed attribute; a blank value counts as absent
fn attr_parsed<T>(element: &Element, name: &str, loc: &Location) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match element.attr(name).map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|e| VastError::invalid_format(&loc.attribute(name), format!("`{}`: {}", value, e))),
    }
}

/// Attributes the schema requires; absent ones decode to the type's zero value
fn attr_required<T>(element: &Element, name: &str, loc: &Location) -> Result<T>
where
    T: FromStr + Default,
    T::Err: Display,
{
    Ok(attr_parsed(element, name, loc)?.unwrap_or_default())
}

fn attr_bool(element: &Element, name: &str, loc: &Location) -> Result<Option<bool>> {
    match element.attr(name).map(str::trim) {
        None | Some("") => Ok(None),
        Some("true") | Some("1") => Ok(Some(true)),
        Some("false") | Some("0") => Ok(Some(false)),
        Some(other) => Err(VastError::invalid_format(
            &loc.attribute(name),
            format!("`{}` is not a boolean", other),
        )),
    }
}

/// Parse the element's character data as a value type
fn text_parsed<T>(element: &Element, loc: &Location) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let value = element.text();
    value
        .parse()
        .map_err(|e| VastError::invalid_format(loc, format!("`{}`: {}", value, e)))
}

/// Store a single-valued child, refusing a second occurrence
fn set_once<T>(slot: &mut Option<T>, value: T, child: &Element, loc: &Location) -> Result<()> {
    if slot.is_some() {
        return Err(VastError::unexpected(loc, &child.name));
    }
    *slot = Some(value);
    Ok(())
}

impl Decoder<'_> {
    /// Apply the unknown-element policy to a child the model has no field for
    fn unknown(&self, child: &Element, loc: &Location) -> Result<()> {
        match self.settings.get_unknown_elements() {
            UnknownElements::Skip => {
                debug!("{}: skipping unknown element <{}>", loc, child.name);
                Ok(())
            }
            UnknownElements::Reject => Err(VastError::unexpected(loc, &child.name)),
        }
    }

    /// Descend through a grouping element and decode each item inside it
    fn nested<T>(
        &self,
        rule: Nested,
        container: &Element,
        loc: &Location,
        mut item: impl FnMut(&Self, &Element, &Location) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        for (ordinal, child) in indexed(container) {
            let child_loc = loc.child(&child.name, ordinal);
            if child.local_name() == rule.item {
                items.push(item(self, child, &child_loc)?);
            } else {
                self.unknown(child, &child_loc)?;
            }
        }
        Ok(items)
    }

    /// Parse the root VAST element
    fn parse_vast_element(&self, root: &Element) -> Result<Vast> {
        if root.local_name() != "VAST" {
            return Err(VastError::unexpected(&Location::root(), &root.name));
        }
        let loc = Location::root().child(&root.name, 0);

        let mut vast = Vast {
            version: attr_string(root, "version").unwrap_or_default(),
            xmlns: attr_string(root, "xmlns"),
            mute: attr_bool(root, "mute", &loc)?,
            ads: Vec::new(),
            errors: Vec::new(),
        };
        if vast.version.is_empty() {
            debug!("{}: document has no version attribute", loc);
        }

        for (ordinal, child) in indexed(root) {
            let child_loc = loc.child(&child.name, ordinal);
            match child.local_name() {
                "Ad" => vast.ads.push(self.parse_ad_element(child, &child_loc)?),
                "Error" => vast.errors.push(text(child)),
                _ => self.unknown(child, &child_loc)?,
            }
        }

        trace!("decoded VAST {} with {} ad(s)", vast.version, vast.ads.len());
        Ok(vast)
    }

    /// Parse a single Ad element, dispatching on its payload element
    fn parse_ad_element(&self, element: &Element, loc: &Location) -> Result<Ad> {
        let mut payload = None;

        for (ordinal, child) in indexed(element) {
            let child_loc = loc.child(&child.name, ordinal);
            match child.local_name() {
                "InLine" | "Wrapper" if payload.is_some() => {
                    return Err(VastError::MalformedAd {
                        location: loc.clone(),
                        found: "more than one payload element",
                    });
                }
                "InLine" => {
                    payload = Some(AdPayload::InLine(self.parse_inline_element(child, &child_loc)?));
                }
                "Wrapper" => {
                    payload = Some(AdPayload::Wrapper(self.parse_wrapper_element(child, &child_loc)?));
                }
                _ => self.unknown(child, &child_loc)?,
            }
        }

        let payload = payload.ok_or_else(|| VastError::MalformedAd {
            location: loc.clone(),
            found: "neither",
        })?;

        Ok(Ad {
            id: attr_string(element, "id"),
            ad_type: attr_string(element, "adType"),
            sequence: attr_parsed(element, "sequence", loc)?,
            conditional_ad: attr_bool(element, "conditionalAd", loc)?,
            payload,
        })
    }

    /// Parse an InLine element
    fn parse_inline_element(&self, element: &Element, loc: &Location) -> Result<InLine> {
        let mut inline = InLine::default();
        let mut ad_system = None;
        let mut ad_title = None;
        let mut creatives = None;

        for (ordinal, child) in indexed(element) {
            let child_loc = loc.child(&child.name, ordinal);
            match child.local_name() {
                "AdSystem" => set_once(&mut ad_system, parse_ad_system(child), child, &child_loc)?,
                "AdTitle" => set_once(&mut ad_title, text(child), child, &child_loc)?,
                "Impression" => inline.impressions.push(parse_impression(child)),
                "AdServingId" => set_once(&mut inline.ad_serving_id, text(child), child, &child_loc)?,
                "Category" => inline.categories.push(parse_category(child)),
                "Description" => set_once(&mut inline.description, text(child), child, &child_loc)?,
                "Advertiser" => {
                    let advertiser = Advertiser {
                        id: attr_string(child, "id"),
                        name: text(child),
                    };
                    set_once(&mut inline.advertiser, advertiser, child, &child_loc)?
                }
                "Pricing" => set_once(&mut inline.pricing, parse_pricing(child), child, &child_loc)?,
                "Survey" => {
                    let survey = Survey {
                        r#type: attr_string(child, "type"),
                        uri: text(child),
                    };
                    set_once(&mut inline.survey, survey, child, &child_loc)?
                }
                "Error" => inline.errors.push(text(child)),
                "ViewableImpression" => {
                    let viewable = self.parse_viewable_impression(child, &child_loc)?;
                    set_once(&mut inline.viewable_impression, viewable, child, &child_loc)?
                }
                "Expires" => {
                    let expires = text_parsed(child, &child_loc)?;
                    set_once(&mut inline.expires, expires, child, &child_loc)?
                }
                name if name == paths::EXTENSIONS.container => {
                    let extensions = self.nested(paths::EXTENSIONS, child, &child_loc, |_, e, _| {
                        Ok(parse_extension(e))
                    })?;
                    set_once(&mut inline.extensions, extensions, child, &child_loc)?
                }
                name if name == paths::AD_VERIFICATIONS.container => {
                    let verifications =
                        self.nested(paths::AD_VERIFICATIONS, child, &child_loc, Self::parse_verification)?;
                    set_once(&mut inline.ad_verifications, verifications, child, &child_loc)?
                }
                name if name == paths::CREATIVES.container => {
                    let parsed = self.nested(paths::CREATIVES, child, &child_loc, Self::parse_creative)?;
                    set_once(&mut creatives, parsed, child, &child_loc)?
                }
                _ => self.unknown(child, &child_loc)?,
            }
        }

        inline.ad_system = ad_system.unwrap_or_default();
        inline.ad_title = ad_title.unwrap_or_default();
        inline.creatives = creatives.unwrap_or_default();
        Ok(inline)
    }

    /// Parse a Wrapper element
    fn parse_wrapper_element(&self, element: &Element, loc: &Location) -> Result<Wrapper> {
        let mut wrapper = Wrapper {
            follow_additional_wrappers: attr_bool(element, "followAdditionalWrappers", loc)?,
            allow_multiple_ads: attr_bool(element, "allowMultipleAds", loc)?,
            fallback_on_no_ad: attr_bool(element, "fallbackOnNoAd", loc)?,
            ..Default::default()
        };
        let mut tag_uri = None;

        for (ordinal, child) in indexed(element) {
            let child_loc = loc.child(&child.name, ordinal);
            match child.local_name() {
                "AdSystem" => set_once(&mut wrapper.ad_system, parse_ad_system(child), child, &child_loc)?,
                "VASTAdTagURI" => set_once(&mut tag_uri, text(child), child, &child_loc)?,
                "Impression" => wrapper.impressions.push(parse_impression(child)),
                "Pricing" => set_once(&mut wrapper.pricing, parse_pricing(child), child, &child_loc)?,
                "Error" => wrapper.errors.push(text(child)),
                "ViewableImpression" => {
                    let viewable = self.parse_viewable_impression(child, &child_loc)?;
                    set_once(&mut wrapper.viewable_impression, viewable, child, &child_loc)?
                }
                "BlockedAdCategories" => wrapper.blocked_ad_categories.push(parse_category(child)),
                name if name == paths::EXTENSIONS.container => {
                    let extensions = self.nested(paths::EXTENSIONS, child, &child_loc, |_, e, _| {
                        Ok(parse_extension(e))
                    })?;
                    set_once(&mut wrapper.extensions, extensions, child, &child_loc)?
                }
                name if name == paths::AD_VERIFICATIONS.container => {
                    let verifications =
                        self.nested(paths::AD_VERIFICATIONS, child, &child_loc, Self::parse_verification)?;
                    set_once(&mut wrapper.ad_verifications, verifications, child, &child_loc)?
                }
                name if name == paths::CREATIVES.container => {
                    let creatives =
                        self.nested(paths::CREATIVES, child, &child_loc, Self::parse_creative_wrapper)?;
                    set_once(&mut wrapper.creatives, creatives, child, &child_loc)?
                }
                _ => self.unknown(child, &child_loc)?,
            }
        }

        wrapper.vast_ad_tag_uri = tag_uri.unwrap_or_default();
        Ok(wrapper)
    }

    fn parse_viewable_impression(&self, element: &Element, loc: &Location) -> Result<ViewableImpression> {
        let mut viewable = ViewableImpression {
            id: attr_string(element, "id"),
            ..Default::default()
        };
        for (ordinal, child) in indexed(element) {
            match child.local_name() {
                "Viewable" => viewable.viewable.push(text(child)),
                "NotViewable" => viewable.not_viewable.push(text(child)),
                "ViewUndetermined" => viewable.view_undetermined.push(text(child)),
                _ => self.unknown(child, &loc.child(&child.name, ordinal))?,
            }
        }
        Ok(viewable)
    }

    fn parse_verification(&self, element: &Element, loc: &Location) -> Result<Verification> {
        let mut verification = Verification {
            vendor: attr_string(element, "vendor"),
            ..Default::default()
        };
        for (ordinal, child) in indexed(element) {
            let child_loc = loc.child(&child.name, ordinal);
            match child.local_name() {
                "JavaScriptResource" => verification.javascript_resources.push(JavaScriptResource {
                    api_framework: attr_string(child, "apiFramework"),
                    browser_optional: attr_bool(child, "browserOptional", &child_loc)?,
                    uri: text(child),
                }),
                "ExecutableResource" => verification.executable_resources.push(ExecutableResource {
                    api_framework: attr_string(child, "apiFramework"),
                    r#type: attr_string(child, "type"),
                    uri: text(child),
                }),
                "VerificationParameters" => {
                    set_once(&mut verification.verification_parameters, text(child), child, &child_loc)?
                }
                name if name == paths::TRACKING_EVENTS.container => {
                    let trackers = self.parse_tracking_events(child, &child_loc)?;
                    set_once(&mut verification.tracking_events, trackers, child, &child_loc)?
                }
                _ => self.unknown(child, &child_loc)?,
            }
        }
        Ok(verification)
    }

    /// Parse the attributes and non-payload children shared by both creative kinds.
    /// `payload` returns `Ok(None)` for element names that are not payloads.
    fn parse_creative_parts<C>(
        &self,
        element: &Element,
        loc: &Location,
        mut payload: impl FnMut(&Self, &Element, &Location) -> Result<Option<C>>,
    ) -> Result<(CreativeWrapper, Option<C>)> {
        let mut parts = CreativeWrapper {
            id: attr_string(element, "id"),
            sequence: attr_parsed(element, "sequence", loc)?,
            ad_id: attr_string(element, "adId"),
            api_framework: attr_string(element, "apiFramework"),
            ..Default::default()
        };
        let mut content = None;

        for (ordinal, child) in indexed(element) {
            let child_loc = loc.child(&child.name, ordinal);
            match child.local_name() {
                "UniversalAdId" => parts.universal_ad_ids.push(parse_universal_ad_id(child)),
                name if name == paths::CREATIVE_EXTENSIONS.container => {
                    let extensions =
                        self.nested(paths::CREATIVE_EXTENSIONS, child, &child_loc, |_, e, _| {
                            Ok(parse_extension(e))
                        })?;
                    set_once(&mut parts.creative_extensions, extensions, child, &child_loc)?
                }
                _ => match payload(self, child, &child_loc)? {
                    // a creative carries at most one payload
                    Some(parsed) => set_once(&mut content, parsed, child, &child_loc)?,
                    None => self.unknown(child, &child_loc)?,
                },
            }
        }

        Ok((parts, content))
    }

    /// Parse Creative element
    fn parse_creative(&self, element: &Element, loc: &Location) -> Result<Creative> {
        let (parts, content) = self.parse_creative_parts(element, loc, |this, child, child_loc| {
            Ok(match child.local_name() {
                "Linear" => Some(CreativeContent::Linear(this.parse_linear(child, child_loc)?)),
                "CompanionAds" => Some(CreativeContent::CompanionAds(
                    this.parse_companion_ads(child, child_loc)?,
                )),
                "NonLinearAds" => Some(CreativeContent::NonLinearAds(
                    this.parse_non_linear_ads(child, child_loc)?,
                )),
                _ => None,
            })
        })?;

        Ok(Creative {
            id: parts.id,
            sequence: parts.sequence,
            ad_id: parts.ad_id,
            api_framework: parts.api_framework,
            universal_ad_ids: parts.universal_ad_ids,
            creative_extensions: parts.creative_extensions,
            content,
        })
    }

    /// Parse Creative element inside a Wrapper
    fn parse_creative_wrapper(&self, element: &Element, loc: &Location) -> Result<CreativeWrapper> {
        let (mut parts, content) = self.parse_creative_parts(element, loc, |this, child, child_loc| {
            Ok(match child.local_name() {
                "Linear" => Some(CreativeWrapperContent::Linear(
                    this.parse_linear_wrapper(child, child_loc)?,
                )),
                "CompanionAds" => Some(CreativeWrapperContent::CompanionAds(
                    this.parse_companion_ads_wrapper(child, child_loc)?,
                )),
                "NonLinearAds" => Some(CreativeWrapperContent::NonLinearAds(
                    this.parse_non_linear_ads_wrapper(child, child_loc)?,
                )),
                _ => None,
            })
        })?;
        parts.content = content;
        Ok(parts)
    }

    /// Parse Linear element
    fn parse_linear(&self, element: &Element, loc: &Location) -> Result<Linear> {
        let mut linear = Linear {
            skip_offset: attr_parsed::<Offset>(element, "skipoffset", loc)?,
            ..Default::default()
        };

        for (ordinal, child) in indexed(element) {
            let child_loc = loc.child(&child.name, ordinal);
            match child.local_name() {
                "Duration" => {
                    let duration: Duration = text_parsed(child, &child_loc)?;
                    set_once(&mut linear.duration, duration, child, &child_loc)?
                }
                "AdParameters" => {
                    let params = parse_ad_parameters(child, &child_loc)?;
                    set_once(&mut linear.ad_parameters, params, child, &child_loc)?
                }
                "VideoClicks" => {
                    let clicks = self.parse_video_clicks(child, &child_loc)?;
                    set_once(&mut linear.video_clicks, clicks, child, &child_loc)?
                }
                "MediaFiles" => {
                    let files = self.parse_media_files(child, &child_loc)?;
                    set_once(&mut linear.media_files, files, child, &child_loc)?
                }
                name if name == paths::TRACKING_EVENTS.container => {
                    let trackers = self.parse_tracking_events(child, &child_loc)?;
                    set_once(&mut linear.tracking_events, trackers, child, &child_loc)?
                }
                name if name == paths::ICONS.container => {
                    let icons = self.nested(paths::ICONS, child, &child_loc, Self::parse_icon)?;
                    set_once(&mut linear.icons, icons, child, &child_loc)?
                }
                _ => self.unknown(child, &child_loc)?,
            }
        }

        Ok(linear)
    }

    fn parse_media_files(&self, element: &Element, loc: &Location) -> Result<MediaFiles> {
        let mut media_files = MediaFiles::default();

        for (ordinal, child) in indexed(element) {
            let child_loc = loc.child(&child.name, ordinal);
            match child.local_name() {
                "MediaFile" => media_files.files.push(parse_media_file(child, &child_loc)?),
                "Mezzanine" => media_files.mezzanines.push(parse_mezzanine(child, &child_loc)?),
                "InteractiveCreativeFile" => media_files
                    .interactive_creative_files
                    .push(parse_interactive_creative_file(child, &child_loc)?),
                name if name == paths::CLOSED_CAPTION_FILES.container => {
                    let captions = self.nested(paths::CLOSED_CAPTION_FILES, child, &child_loc, |_, e, _| {
                        Ok(parse_closed_caption_file(e))
                    })?;
                    set_once(&mut media_files.closed_caption_files, captions, child, &child_loc)?
                }
                _ => self.unknown(child, &child_loc)?,
            }
        }

        Ok(media_files)
    }

    /// Parse Linear element inside a Wrapper creative
    fn parse_linear_wrapper(&self, element: &Element, loc: &Location) -> Result<LinearWrapper> {
        let mut linear = LinearWrapper::default();

        for (ordinal, child) in indexed(element) {
            let child_loc = loc.child(&child.name, ordinal);
            match child.local_name() {
                "VideoClicks" => {
                    let clicks = self.parse_video_clicks(child, &child_loc)?;
                    set_once(&mut linear.video_clicks, clicks, child, &child_loc)?
                }
                name if name == paths::TRACKING_EVENTS.container => {
                    let trackers = self.parse_tracking_events(child, &child_loc)?;
                    set_once(&mut linear.tracking_events, trackers, child, &child_loc)?
                }
                name if name == paths::ICONS.container => {
                    let icons = self.nested(paths::ICONS, child, &child_loc, Self::parse_icon)?;
                    set_once(&mut linear.icons, icons, child, &child_loc)?
                }
                _ => self.unknown(child, &child_loc)?,
            }
        }

        Ok(linear)
    }

    /// Parse VideoClicks element
    fn parse_video_clicks(&self, element: &Element, loc: &Location) -> Result<VideoClicks> {
        let mut clicks = VideoClicks::default();
        for (ordinal, child) in indexed(element) {
            match child.local_name() {
                "ClickThrough" => clicks.click_throughs.push(parse_click(child)),
                "ClickTracking" => clicks.click_trackings.push(parse_click(child)),
                "CustomClick" => clicks.custom_clicks.push(parse_click(child)),
                _ => self.unknown(child, &loc.child(&child.name, ordinal))?,
            }
        }
        Ok(clicks)
    }

    /// Parse TrackingEvents element
    fn parse_tracking_events(&self, element: &Element, loc: &Location) -> Result<Vec<Tracking>> {
        self.nested(paths::TRACKING_EVENTS, element, loc, |_, e, l| parse_tracking(e, l))
    }

    /// Parse one rendering resource into `resources`; returns false for other element names
    fn parse_resource(&self, resources: &mut Resources, child: &Element, loc: &Location) -> Result<bool> {
        match child.local_name() {
            "StaticResource" => {
                let resource = StaticResource {
                    creative_type: attr_string(child, "creativeType"),
                    uri: text(child),
                };
                set_once(&mut resources.static_resource, resource, child, loc)?;
            }
            "IFrameResource" => set_once(&mut resources.iframe_resource, text(child), child, loc)?,
            "HTMLResource" => {
                let resource = HtmlResource {
                    xml_encoded: attr_bool(child, "xmlEncoded", loc)?,
                    html: text(child),
                };
                set_once(&mut resources.html_resource, resource, child, loc)?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Parse CompanionAds element
    fn parse_companion_ads(&self, element: &Element, loc: &Location) -> Result<CompanionAds> {
        let mut companion_ads = CompanionAds {
            required: attr_parsed(element, "required", loc)?,
            companions: Vec::new(),
        };
        for (ordinal, child) in indexed(element) {
            let child_loc = loc.child(&child.name, ordinal);
            match child.local_name() {
                "Companion" => companion_ads
                    .companions
                    .push(self.parse_companion(child, &child_loc)?),
                _ => self.unknown(child, &child_loc)?,
            }
        }
        Ok(companion_ads)
    }

    fn parse_companion(&self, element: &Element, loc: &Location) -> Result<Companion> {
        let mut companion = Companion {
            id: attr_string(element, "id"),
            width: attr_parsed(element, "width", loc)?,
            height: attr_parsed(element, "height", loc)?,
            asset_width: attr_parsed(element, "assetWidth", loc)?,
            asset_height: attr_parsed(element, "assetHeight", loc)?,
            expanded_width: attr_parsed(element, "expandedWidth", loc)?,
            expanded_height: attr_parsed(element, "expandedHeight", loc)?,
            api_framework: attr_string(element, "apiFramework"),
            ad_slot_id: attr_string(element, "adSlotId"),
            ..Default::default()
        };

        for (ordinal, child) in indexed(element) {
            let child_loc = loc.child(&child.name, ordinal);
            if self.parse_resource(&mut companion.resources, child, &child_loc)? {
                continue;
            }
            match child.local_name() {
                "AdParameters" => {
                    let params = parse_ad_parameters(child, &child_loc)?;
                    set_once(&mut companion.ad_parameters, params, child, &child_loc)?
                }
                "AltText" => set_once(&mut companion.alt_text, text(child), child, &child_loc)?,
                "CompanionClickThrough" => {
                    set_once(&mut companion.click_through, text(child), child, &child_loc)?
                }
                "CompanionClickTracking" => companion.click_trackings.push(parse_click(child)),
                name if name == paths::TRACKING_EVENTS.container => {
                    let trackers = self.parse_tracking_events(child, &child_loc)?;
                    set_once(&mut companion.tracking_events, trackers, child, &child_loc)?
                }
                _ => self.unknown(child, &child_loc)?,
            }
        }

        Ok(companion)
    }

    fn parse_companion_ads_wrapper(&self, element: &Element, loc: &Location) -> Result<CompanionAdsWrapper> {
        let mut companion_ads = CompanionAdsWrapper {
            required: attr_parsed(element, "required", loc)?,
            companions: Vec::new(),
        };
        for (ordinal, child) in indexed(element) {
            let child_loc = loc.child(&child.name, ordinal);
            match child.local_name() {
                "Companion" => companion_ads
                    .companions
                    .push(self.parse_companion_wrapper(child, &child_loc)?),
                _ => self.unknown(child, &child_loc)?,
            }
        }
        Ok(companion_ads)
    }

    fn parse_companion_wrapper(&self, element: &Element, loc: &Location) -> Result<CompanionWrapper> {
        let mut companion = CompanionWrapper {
            id: attr_string(element, "id"),
            width: attr_required(element, "width", loc)?,
            height: attr_required(element, "height", loc)?,
            asset_width: attr_required(element, "assetWidth", loc)?,
            asset_height: attr_required(element, "assetHeight", loc)?,
            expanded_width: attr_required(element, "expandedWidth", loc)?,
            expanded_height: attr_required(element, "expandedHeight", loc)?,
            api_framework: attr_string(element, "apiFramework"),
            ad_slot_id: attr_string(element, "adSlotId"),
            ..Default::default()
        };

        for (ordinal, child) in indexed(element) {
            let child_loc = loc.child(&child.name, ordinal);
            if self.parse_resource(&mut companion.resources, child, &child_loc)? {
                continue;
            }
            match child.local_name() {
                "AdParameters" => {
                    let params = parse_ad_parameters(child, &child_loc)?;
                    set_once(&mut companion.ad_parameters, params, child, &child_loc)?
                }
                "AltText" => set_once(&mut companion.alt_text, text(child), child, &child_loc)?,
                "CompanionClickThrough" => {
                    set_once(&mut companion.click_through, text(child), child, &child_loc)?
                }
                "CompanionClickTracking" => companion.click_trackings.push(text(child)),
                name if name == paths::TRACKING_EVENTS.container => {
                    let trackers = self.parse_tracking_events(child, &child_loc)?;
                    set_once(&mut companion.tracking_events, trackers, child, &child_loc)?
                }
                _ => self.unknown(child, &child_loc)?,
            }
        }

        Ok(companion)
    }

    /// Parse NonLinearAds element
    fn parse_non_linear_ads(&self, element: &Element, loc: &Location) -> Result<NonLinearAds> {
        let mut non_linear_ads = NonLinearAds::default();
        for (ordinal, child) in indexed(element) {
            let child_loc = loc.child(&child.name, ordinal);
            match child.local_name() {
                "NonLinear" => non_linear_ads
                    .non_linears
                    .push(self.parse_non_linear(child, &child_loc)?),
                name if name == paths::TRACKING_EVENTS.container => {
                    let trackers = self.parse_tracking_events(child, &child_loc)?;
                    set_once(&mut non_linear_ads.tracking_events, trackers, child, &child_loc)?
                }
                _ => self.unknown(child, &child_loc)?,
            }
        }
        Ok(non_linear_ads)
    }

    fn parse_non_linear(&self, element: &Element, loc: &Location) -> Result<NonLinear> {
        let mut non_linear = NonLinear {
            id: attr_string(element, "id"),
            width: attr_required(element, "width", loc)?,
            height: attr_required(element, "height", loc)?,
            expanded_width: attr_required(element, "expandedWidth", loc)?,
            expanded_height: attr_required(element, "expandedHeight", loc)?,
            scalable: attr_bool(element, "scalable", loc)?,
            maintain_aspect_ratio: attr_bool(element, "maintainAspectRatio", loc)?,
            min_suggested_duration: attr_parsed(element, "minSuggestedDuration", loc)?,
            api_framework: attr_string(element, "apiFramework"),
            ..Default::default()
        };

        for (ordinal, child) in indexed(element) {
            let child_loc = loc.child(&child.name, ordinal);
            if self.parse_resource(&mut non_linear.resources, child, &child_loc)? {
                continue;
            }
            match child.local_name() {
                "AdParameters" => {
                    let params = parse_ad_parameters(child, &child_loc)?;
                    set_once(&mut non_linear.ad_parameters, params, child, &child_loc)?
                }
                "NonLinearClickThrough" => {
                    set_once(&mut non_linear.click_through, text(child), child, &child_loc)?
                }
                "NonLinearClickTracking" => non_linear.click_trackings.push(parse_click(child)),
                _ => self.unknown(child, &child_loc)?,
            }
        }

        Ok(non_linear)
    }

    fn parse_non_linear_ads_wrapper(&self, element: &Element, loc: &Location) -> Result<NonLinearAdsWrapper> {
        let mut non_linear_ads = NonLinearAdsWrapper::default();
        for (ordinal, child) in indexed(element) {
            let child_loc = loc.child(&child.name, ordinal);
            match child.local_name() {
                "NonLinear" => non_linear_ads
                    .non_linears
                    .push(self.parse_non_linear_wrapper(child, &child_loc)?),
                name if name == paths::TRACKING_EVENTS.container => {
                    let trackers = self.parse_tracking_events(child, &child_loc)?;
                    set_once(&mut non_linear_ads.tracking_events, trackers, child, &child_loc)?
                }
                _ => self.unknown(child, &child_loc)?,
            }
        }
        Ok(non_linear_ads)
    }

    fn parse_non_linear_wrapper(&self, element: &Element, loc: &Location) -> Result<NonLinearWrapper> {
        let mut non_linear = NonLinearWrapper {
            id: attr_string(element, "id"),
            width: attr_required(element, "width", loc)?,
            height: attr_required(element, "height", loc)?,
            expanded_width: attr_required(element, "expandedWidth", loc)?,
            expanded_height: attr_required(element, "expandedHeight", loc)?,
            scalable: attr_bool(element, "scalable", loc)?,
            maintain_aspect_ratio: attr_bool(element, "maintainAspectRatio", loc)?,
            min_suggested_duration: attr_parsed(element, "minSuggestedDuration", loc)?,
            api_framework: attr_string(element, "apiFramework"),
            ..Default::default()
        };

        for (ordinal, child) in indexed(element) {
            let child_loc = loc.child(&child.name, ordinal);
            match child.local_name() {
                "NonLinearClickTracking" => non_linear.click_trackings.push(text(child)),
                name if name == paths::TRACKING_EVENTS.container => {
                    let trackers = self.parse_tracking_events(child, &child_loc)?;
                    set_once(&mut non_linear.tracking_events, trackers, child, &child_loc)?
                }
                _ => self.unknown(child, &child_loc)?,
            }
        }

        Ok(non_linear)
    }

    /// Parse Icon element; click URLs are read through the IconClicks grouping element
    fn parse_icon(&self, element: &Element, loc: &Location) -> Result<Icon> {
        let mut icon = Icon {
            program: attr_string(element, "program").unwrap_or_default(),
            width: attr_required(element, "width", loc)?,
            height: attr_required(element, "height", loc)?,
            x_position: attr_string(element, "xPosition").unwrap_or_default(),
            y_position: attr_string(element, "yPosition").unwrap_or_default(),
            offset: attr_parsed(element, "offset", loc)?,
            duration: attr_parsed(element, "duration", loc)?,
            api_framework: attr_string(element, "apiFramework"),
            pxratio: attr_string(element, "pxratio"),
            alt_text: attr_string(element, "altText"),
            hover_text: attr_string(element, "hoverText"),
            ..Default::default()
        };

        for (ordinal, child) in indexed(element) {
            let child_loc = loc.child(&child.name, ordinal);
            if self.parse_resource(&mut icon.resources, child, &child_loc)? {
                continue;
            }
            match child.local_name() {
                paths::ICON_CLICKS => {
                    for (click_ordinal, click) in indexed(child) {
                        let click_loc = child_loc.child(&click.name, click_ordinal);
                        match click.local_name() {
                            "IconClickThrough" => {
                                set_once(&mut icon.click_through, text(click), click, &click_loc)?
                            }
                            "IconClickTracking" => icon.click_trackings.push(text(click)),
                            _ => self.unknown(click, &click_loc)?,
                        }
                    }
                }
                "IconViewTracking" => icon.view_trackings.push(text(child)),
                _ => self.unknown(child, &child_loc)?,
            }
        }

        Ok(icon)
    }
}

/// Parse AdSystem element
fn parse_ad_system(element: &Element) -> AdSystem {
    AdSystem {
        name: text(element),
        version: attr_string(element, "version"),
    }
}

/// Parse Impression element
fn parse_impression(element: &Element) -> Impression {
    Impression {
        id: attr_string(element, "id"),
        uri: text(element),
    }
}

/// Parse Pricing element; the model is checked by validation, not here
fn parse_pricing(element: &Element) -> Pricing {
    Pricing {
        model: attr_string(element, "model").unwrap_or_default(),
        currency: attr_string(element, "currency").unwrap_or_default(),
        value: text(element),
    }
}

fn parse_category(element: &Element) -> Category {
    Category {
        authority: attr_string(element, "authority"),
        value: text(element),
    }
}

/// Capture an extension verbatim; vendor payloads are not interpreted
fn parse_extension(element: &Element) -> Extension {
    Extension {
        attributes: element.attributes.clone(),
        children: element.children.clone(),
    }
}

fn parse_universal_ad_id(element: &Element) -> UniversalAdId {
    let registry = attr_string(element, "idRegistry").filter(|r| !r.trim().is_empty());
    let id = element.text();
    UniversalAdId {
        id_registry: registry.unwrap_or_else(|| UNKNOWN_AD_ID.to_string()),
        id: if id.is_empty() { UNKNOWN_AD_ID.into() } else { id.into() },
    }
}

fn parse_click(element: &Element) -> Click {
    Click {
        id: attr_string(element, "id"),
        uri: text::<CdataString>(element),
    }
}

fn parse_ad_parameters(element: &Element, loc: &Location) -> Result<AdParameters> {
    Ok(AdParameters {
        xml_encoded: attr_bool(element, "xmlEncoded", loc)?,
        parameters: text(element),
    })
}

/// Parse MediaFile element
fn parse_media_file(element: &Element, loc: &Location) -> Result<MediaFile> {
    Ok(MediaFile {
        uri: text(element),
        id: attr_string(element, "id"),
        delivery: attr_string(element, "delivery").unwrap_or_default(),
        mime_type: attr_string(element, "type").unwrap_or_default(),
        width: attr_required(element, "width", loc)?,
        height: attr_required(element, "height", loc)?,
        codec: attr_string(element, "codec"),
        bitrate: attr_parsed(element, "bitrate", loc)?,
        min_bitrate: attr_parsed(element, "minBitrate", loc)?,
        max_bitrate: attr_parsed(element, "maxBitrate", loc)?,
        scalable: attr_bool(element, "scalable", loc)?,
        maintain_aspect_ratio: attr_bool(element, "maintainAspectRatio", loc)?,
        api_framework: attr_string(element, "apiFramework"),
        file_size: attr_parsed(element, "fileSize", loc)?,
        media_type: attr_string(element, "mediaType"),
    })
}

fn parse_mezzanine(element: &Element, loc: &Location) -> Result<Mezzanine> {
    Ok(Mezzanine {
        uri: text(element),
        id: attr_string(element, "id"),
        delivery: attr_string(element, "delivery").unwrap_or_default(),
        mime_type: attr_string(element, "type").unwrap_or_default(),
        width: attr_required(element, "width", loc)?,
        height: attr_required(element, "height", loc)?,
        codec: attr_string(element, "codec"),
        file_size: attr_parsed(element, "fileSize", loc)?,
        media_type: attr_string(element, "mediaType"),
    })
}

fn parse_interactive_creative_file(element: &Element, loc: &Location) -> Result<InteractiveCreativeFile> {
    Ok(InteractiveCreativeFile {
        uri: text(element),
        mime_type: attr_string(element, "type"),
        api_framework: attr_string(element, "apiFramework"),
        variable_duration: attr_bool(element, "variableDuration", loc)?,
    })
}

fn parse_closed_caption_file(element: &Element) -> ClosedCaptionFile {
    ClosedCaptionFile {
        uri: text(element),
        mime_type: attr_string(element, "type"),
        language: attr_string(element, "language"),
    }
}

/// Parse Tracking element
fn parse_tracking(element: &Element, loc: &Location) -> Result<Tracking> {
    Ok(Tracking {
        event: TrackingEvent::from(element.attr("event").unwrap_or_default()),
        offset: attr_parsed(element, "offset", loc)?,
        uri: text(element),
        ua: attr_string(element, "ua"),
    })
}
