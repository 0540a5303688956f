use log::trace;

use crate::error::Result;
use crate::models::*;
use crate::paths;
use crate::settings::CodecSettings;
use crate::validate::{self, Direction};
use crate::values::{CharData, Duration};
use crate::xml::Element;

/// Validate `vast` and serialize it as a VAST XML document
pub fn encode_with(vast: &Vast, settings: &CodecSettings) -> Result<Vec<u8>> {
    validate::check(vast, settings, Direction::Encode)?;
    vast_to_xml(vast).to_document_with(
        settings.get_indent(),
        &[paths::EXTENSIONS.item, paths::CREATIVE_EXTENSIONS.item],
    )
}

/// Element for a character-data field, CDATA or plain text as its type dictates
fn char_data<T: CharData>(name: &str, value: &T) -> Element {
    let mut element = Element::new(name);
    let text = value.as_text();
    if !text.is_empty() {
        if T::CDATA {
            element.push_cdata(text);
        } else {
            element.push_text(text);
        }
    }
    element
}

/// Write an optional attribute; `None` is omitted
fn set_opt<T: ToString>(element: &mut Element, name: &str, value: Option<T>) {
    if let Some(value) = value {
        element.set_attr(name, value.to_string());
    }
}

fn push_opt(parent: &mut Element, child: Option<Element>) {
    if let Some(child) = child {
        parent.push(child);
    }
}

/// Build the element tree for a whole document
pub fn vast_to_xml(vast: &Vast) -> Element {
    let mut xml = Element::new("VAST").with_attr("version", vast.version.as_str());
    set_opt(&mut xml, "xmlns", vast.xmlns.as_ref());
    set_opt(&mut xml, "mute", vast.mute);

    for ad in &vast.ads {
        xml.push(ad_to_xml(ad));
    }
    for error in &vast.errors {
        xml.push(char_data("Error", error));
    }

    trace!("encoded VAST {} with {} ad(s)", vast.version, vast.ads.len());
    xml
}

fn ad_to_xml(ad: &Ad) -> Element {
    let mut xml = Element::new("Ad");
    set_opt(&mut xml, "id", ad.id.as_ref());
    set_opt(&mut xml, "sequence", ad.sequence);
    set_opt(&mut xml, "conditionalAd", ad.conditional_ad);
    set_opt(&mut xml, "adType", ad.ad_type.as_ref());

    xml.push(match &ad.payload {
        AdPayload::InLine(inline) => inline_to_xml(inline),
        AdPayload::Wrapper(wrapper) => wrapper_to_xml(wrapper),
    });
    xml
}

fn inline_to_xml(inline: &InLine) -> Element {
    let mut xml = Element::new("InLine");

    xml.push(ad_system_to_xml(&inline.ad_system));
    xml.push(char_data("AdTitle", &inline.ad_title));
    for impression in &inline.impressions {
        xml.push(impression_to_xml(impression));
    }
    push_opt(&mut xml, inline.ad_serving_id.as_ref().map(|id| char_data("AdServingId", id)));
    for category in &inline.categories {
        xml.push(category_to_xml("Category", category));
    }
    push_opt(&mut xml, inline.description.as_ref().map(|d| char_data("Description", d)));
    if let Some(advertiser) = &inline.advertiser {
        let mut element = char_data("Advertiser", &advertiser.name);
        set_opt(&mut element, "id", advertiser.id.as_ref());
        xml.push(element);
    }
    push_opt(&mut xml, inline.pricing.as_ref().map(pricing_to_xml));
    if let Some(survey) = &inline.survey {
        let mut element = char_data("Survey", &survey.uri);
        set_opt(&mut element, "type", survey.r#type.as_ref());
        xml.push(element);
    }
    for error in &inline.errors {
        xml.push(char_data("Error", error));
    }
    push_opt(
        &mut xml,
        paths::EXTENSIONS.wrap_optional(inline.extensions.as_ref(), |e| extension_to_xml(paths::EXTENSIONS.item, e)),
    );
    push_opt(&mut xml, inline.viewable_impression.as_ref().map(viewable_impression_to_xml));
    push_opt(
        &mut xml,
        paths::AD_VERIFICATIONS.wrap_optional(inline.ad_verifications.as_ref(), verification_to_xml),
    );
    push_opt(&mut xml, paths::CREATIVES.wrap_non_empty(&inline.creatives, creative_to_xml));
    if let Some(expires) = inline.expires {
        let mut element = Element::new("Expires");
        element.push_text(expires.to_string());
        xml.push(element);
    }

    xml
}

fn wrapper_to_xml(wrapper: &Wrapper) -> Element {
    let mut xml = Element::new("Wrapper");
    set_opt(&mut xml, "followAdditionalWrappers", wrapper.follow_additional_wrappers);
    set_opt(&mut xml, "allowMultipleAds", wrapper.allow_multiple_ads);
    set_opt(&mut xml, "fallbackOnNoAd", wrapper.fallback_on_no_ad);

    push_opt(&mut xml, wrapper.ad_system.as_ref().map(ad_system_to_xml));
    xml.push(char_data("VASTAdTagURI", &wrapper.vast_ad_tag_uri));
    for impression in &wrapper.impressions {
        xml.push(impression_to_xml(impression));
    }
    push_opt(&mut xml, wrapper.pricing.as_ref().map(pricing_to_xml));
    for error in &wrapper.errors {
        xml.push(char_data("Error", error));
    }
    push_opt(&mut xml, wrapper.viewable_impression.as_ref().map(viewable_impression_to_xml));
    push_opt(
        &mut xml,
        paths::AD_VERIFICATIONS.wrap_optional(wrapper.ad_verifications.as_ref(), verification_to_xml),
    );
    push_opt(
        &mut xml,
        paths::EXTENSIONS.wrap_optional(wrapper.extensions.as_ref(), |e| extension_to_xml(paths::EXTENSIONS.item, e)),
    );
    push_opt(
        &mut xml,
        paths::CREATIVES.wrap_optional(wrapper.creatives.as_ref(), creative_wrapper_to_xml),
    );
    for category in &wrapper.blocked_ad_categories {
        xml.push(category_to_xml("BlockedAdCategories", category));
    }

    xml
}

fn ad_system_to_xml(ad_system: &AdSystem) -> Element {
    let mut xml = char_data("AdSystem", &ad_system.name);
    set_opt(&mut xml, "version", ad_system.version.as_ref());
    xml
}

fn impression_to_xml(impression: &Impression) -> Element {
    let mut xml = char_data("Impression", &impression.uri);
    set_opt(&mut xml, "id", impression.id.as_ref());
    xml
}

fn pricing_to_xml(pricing: &Pricing) -> Element {
    char_data("Pricing", &pricing.value)
        .with_attr("model", pricing.model.as_str())
        .with_attr("currency", pricing.currency.as_str())
}

fn category_to_xml(name: &str, category: &Category) -> Element {
    let mut xml = char_data(name, &category.value);
    set_opt(&mut xml, "authority", category.authority.as_ref());
    xml
}

fn viewable_impression_to_xml(viewable: &ViewableImpression) -> Element {
    let mut xml = Element::new("ViewableImpression");
    set_opt(&mut xml, "id", viewable.id.as_ref());
    for uri in &viewable.viewable {
        xml.push(char_data("Viewable", uri));
    }
    for uri in &viewable.not_viewable {
        xml.push(char_data("NotViewable", uri));
    }
    for uri in &viewable.view_undetermined {
        xml.push(char_data("ViewUndetermined", uri));
    }
    xml
}

fn verification_to_xml(verification: &Verification) -> Element {
    let mut xml = Element::new(paths::AD_VERIFICATIONS.item);
    set_opt(&mut xml, "vendor", verification.vendor.as_ref());

    for resource in &verification.javascript_resources {
        let mut element = char_data("JavaScriptResource", &resource.uri);
        set_opt(&mut element, "apiFramework", resource.api_framework.as_ref());
        set_opt(&mut element, "browserOptional", resource.browser_optional);
        xml.push(element);
    }
    for resource in &verification.executable_resources {
        let mut element = char_data("ExecutableResource", &resource.uri);
        set_opt(&mut element, "apiFramework", resource.api_framework.as_ref());
        set_opt(&mut element, "type", resource.r#type.as_ref());
        xml.push(element);
    }
    push_opt(&mut xml, tracking_events_to_xml(verification.tracking_events.as_ref()));
    push_opt(
        &mut xml,
        verification
            .verification_parameters
            .as_ref()
            .map(|p| char_data("VerificationParameters", p)),
    );
    xml
}

/// Re-emit a captured extension under `name` exactly as it was read
fn extension_to_xml(name: &str, extension: &Extension) -> Element {
    Element {
        name: name.to_string(),
        attributes: extension.attributes.clone(),
        children: extension.children.clone(),
    }
}

fn universal_ad_id_to_xml(universal_ad_id: &UniversalAdId) -> Element {
    let registry = match universal_ad_id.id_registry.trim() {
        "" => UNKNOWN_AD_ID,
        registry => registry,
    };
    let mut xml = Element::new("UniversalAdId").with_attr("idRegistry", registry);
    match universal_ad_id.id.trim() {
        "" => xml.push_text(UNKNOWN_AD_ID),
        id => xml.push_text(id),
    }
    xml
}

/// Attributes and children shared by inline and wrapper creatives
fn creative_header_to_xml(
    id: Option<&String>,
    sequence: Option<u32>,
    ad_id: Option<&String>,
    api_framework: Option<&String>,
    universal_ad_ids: &[UniversalAdId],
    creative_extensions: Option<&Vec<Extension>>,
) -> Element {
    let mut xml = Element::new(paths::CREATIVES.item);
    set_opt(&mut xml, "id", id);
    set_opt(&mut xml, "sequence", sequence);
    set_opt(&mut xml, "adId", ad_id);
    set_opt(&mut xml, "apiFramework", api_framework);

    for universal_ad_id in universal_ad_ids {
        xml.push(universal_ad_id_to_xml(universal_ad_id));
    }
    push_opt(
        &mut xml,
        paths::CREATIVE_EXTENSIONS.wrap_optional(creative_extensions, |e| {
            extension_to_xml(paths::CREATIVE_EXTENSIONS.item, e)
        }),
    );
    xml
}

fn creative_to_xml(creative: &Creative) -> Element {
    let mut xml = creative_header_to_xml(
        creative.id.as_ref(),
        creative.sequence,
        creative.ad_id.as_ref(),
        creative.api_framework.as_ref(),
        &creative.universal_ad_ids,
        creative.creative_extensions.as_ref(),
    );
    push_opt(
        &mut xml,
        creative.content.as_ref().map(|content| match content {
            CreativeContent::Linear(linear) => linear_to_xml(linear),
            CreativeContent::CompanionAds(companion_ads) => companion_ads_to_xml(companion_ads),
            CreativeContent::NonLinearAds(non_linear_ads) => non_linear_ads_to_xml(non_linear_ads),
        }),
    );
    xml
}

fn creative_wrapper_to_xml(creative: &CreativeWrapper) -> Element {
    let mut xml = creative_header_to_xml(
        creative.id.as_ref(),
        creative.sequence,
        creative.ad_id.as_ref(),
        creative.api_framework.as_ref(),
        &creative.universal_ad_ids,
        creative.creative_extensions.as_ref(),
    );
    push_opt(
        &mut xml,
        creative.content.as_ref().map(|content| match content {
            CreativeWrapperContent::Linear(linear) => linear_wrapper_to_xml(linear),
            CreativeWrapperContent::CompanionAds(companion_ads) => companion_ads_wrapper_to_xml(companion_ads),
            CreativeWrapperContent::NonLinearAds(non_linear_ads) => {
                non_linear_ads_wrapper_to_xml(non_linear_ads)
            }
        }),
    );
    xml
}

fn linear_to_xml(linear: &Linear) -> Element {
    let mut xml = Element::new("Linear");
    set_opt(&mut xml, "skipoffset", linear.skip_offset);

    if let Some(duration) = linear.duration {
        let mut element = Element::new("Duration");
        element.push_text(duration.to_string());
        xml.push(element);
    }
    push_opt(&mut xml, linear.media_files.as_ref().map(media_files_to_xml));
    push_opt(&mut xml, linear.ad_parameters.as_ref().map(ad_parameters_to_xml));
    push_opt(&mut xml, tracking_events_to_xml(linear.tracking_events.as_ref()));
    push_opt(&mut xml, linear.video_clicks.as_ref().map(video_clicks_to_xml));
    push_opt(&mut xml, paths::ICONS.wrap_optional(linear.icons.as_ref(), icon_to_xml));
    xml
}

fn linear_wrapper_to_xml(linear: &LinearWrapper) -> Element {
    let mut xml = Element::new("Linear");
    push_opt(&mut xml, paths::ICONS.wrap_optional(linear.icons.as_ref(), icon_to_xml));
    push_opt(&mut xml, tracking_events_to_xml(linear.tracking_events.as_ref()));
    push_opt(&mut xml, linear.video_clicks.as_ref().map(video_clicks_to_xml));
    xml
}

fn media_files_to_xml(media_files: &MediaFiles) -> Element {
    let mut xml = Element::new("MediaFiles");
    for media_file in &media_files.files {
        xml.push(media_file_to_xml(media_file));
    }
    for mezzanine in &media_files.mezzanines {
        xml.push(mezzanine_to_xml(mezzanine));
    }
    for file in &media_files.interactive_creative_files {
        let mut element = char_data("InteractiveCreativeFile", &file.uri);
        set_opt(&mut element, "type", file.mime_type.as_ref());
        set_opt(&mut element, "apiFramework", file.api_framework.as_ref());
        set_opt(&mut element, "variableDuration", file.variable_duration);
        xml.push(element);
    }
    push_opt(
        &mut xml,
        paths::CLOSED_CAPTION_FILES.wrap_optional(media_files.closed_caption_files.as_ref(), |file| {
            let mut element = char_data(paths::CLOSED_CAPTION_FILES.item, &file.uri);
            set_opt(&mut element, "type", file.mime_type.as_ref());
            set_opt(&mut element, "language", file.language.as_ref());
            element
        }),
    );
    xml
}

fn mezzanine_to_xml(mezzanine: &Mezzanine) -> Element {
    let mut xml = char_data("Mezzanine", &mezzanine.uri);
    set_opt(&mut xml, "id", mezzanine.id.as_ref());
    xml.set_attr("delivery", mezzanine.delivery.as_str());
    xml.set_attr("type", mezzanine.mime_type.as_str());
    xml.set_attr("width", mezzanine.width.to_string());
    xml.set_attr("height", mezzanine.height.to_string());
    set_opt(&mut xml, "codec", mezzanine.codec.as_ref());
    set_opt(&mut xml, "fileSize", mezzanine.file_size);
    set_opt(&mut xml, "mediaType", mezzanine.media_type.as_ref());
    xml
}

fn media_file_to_xml(media_file: &MediaFile) -> Element {
    let mut xml = char_data("MediaFile", &media_file.uri);
    set_opt(&mut xml, "id", media_file.id.as_ref());
    xml.set_attr("delivery", media_file.delivery.as_str());
    xml.set_attr("type", media_file.mime_type.as_str());
    xml.set_attr("width", media_file.width.to_string());
    xml.set_attr("height", media_file.height.to_string());
    set_opt(&mut xml, "codec", media_file.codec.as_ref());
    set_opt(&mut xml, "bitrate", media_file.bitrate);
    set_opt(&mut xml, "minBitrate", media_file.min_bitrate);
    set_opt(&mut xml, "maxBitrate", media_file.max_bitrate);
    set_opt(&mut xml, "scalable", media_file.scalable);
    set_opt(&mut xml, "maintainAspectRatio", media_file.maintain_aspect_ratio);
    set_opt(&mut xml, "apiFramework", media_file.api_framework.as_ref());
    set_opt(&mut xml, "fileSize", media_file.file_size);
    set_opt(&mut xml, "mediaType", media_file.media_type.as_ref());
    xml
}

fn click_to_xml(name: &str, click: &Click) -> Element {
    let mut xml = char_data(name, &click.uri);
    set_opt(&mut xml, "id", click.id.as_ref());
    xml
}

fn video_clicks_to_xml(clicks: &VideoClicks) -> Element {
    let mut xml = Element::new("VideoClicks");
    for click in &clicks.click_throughs {
        xml.push(click_to_xml("ClickThrough", click));
    }
    for click in &clicks.click_trackings {
        xml.push(click_to_xml("ClickTracking", click));
    }
    for click in &clicks.custom_clicks {
        xml.push(click_to_xml("CustomClick", click));
    }
    xml
}

fn tracking_events_to_xml(trackers: Option<&Vec<Tracking>>) -> Option<Element> {
    paths::TRACKING_EVENTS.wrap_optional(trackers, tracking_to_xml)
}

fn tracking_to_xml(tracking: &Tracking) -> Element {
    let mut xml = char_data(paths::TRACKING_EVENTS.item, &tracking.uri).with_attr("event", tracking.event.as_str());
    set_opt(&mut xml, "offset", tracking.offset);
    set_opt(&mut xml, "ua", tracking.ua.as_ref());
    xml
}

fn ad_parameters_to_xml(params: &AdParameters) -> Element {
    let mut xml = char_data("AdParameters", &params.parameters);
    set_opt(&mut xml, "xmlEncoded", params.xml_encoded);
    xml
}

fn resources_to_xml(parent: &mut Element, resources: &Resources) {
    if let Some(resource) = &resources.static_resource {
        let mut element = char_data("StaticResource", &resource.uri);
        set_opt(&mut element, "creativeType", resource.creative_type.as_ref());
        parent.push(element);
    }
    if let Some(uri) = &resources.iframe_resource {
        parent.push(char_data("IFrameResource", uri));
    }
    if let Some(resource) = &resources.html_resource {
        let mut element = char_data("HTMLResource", &resource.html);
        set_opt(&mut element, "xmlEncoded", resource.xml_encoded);
        parent.push(element);
    }
}

fn companion_ads_to_xml(companion_ads: &CompanionAds) -> Element {
    let mut xml = Element::new("CompanionAds");
    set_opt(&mut xml, "required", companion_ads.required.map(|r| r.as_str()));
    for companion in &companion_ads.companions {
        xml.push(companion_to_xml(companion));
    }
    xml
}

fn companion_to_xml(companion: &Companion) -> Element {
    let mut xml = Element::new("Companion");
    set_opt(&mut xml, "id", companion.id.as_ref());
    set_opt(&mut xml, "width", companion.width);
    set_opt(&mut xml, "height", companion.height);
    set_opt(&mut xml, "assetWidth", companion.asset_width);
    set_opt(&mut xml, "assetHeight", companion.asset_height);
    set_opt(&mut xml, "expandedWidth", companion.expanded_width);
    set_opt(&mut xml, "expandedHeight", companion.expanded_height);
    set_opt(&mut xml, "apiFramework", companion.api_framework.as_ref());
    set_opt(&mut xml, "adSlotId", companion.ad_slot_id.as_ref());

    resources_to_xml(&mut xml, &companion.resources);
    push_opt(&mut xml, companion.ad_parameters.as_ref().map(ad_parameters_to_xml));
    push_opt(&mut xml, companion.alt_text.as_ref().map(|t| char_data("AltText", t)));
    push_opt(
        &mut xml,
        companion.click_through.as_ref().map(|uri| char_data("CompanionClickThrough", uri)),
    );
    for click in &companion.click_trackings {
        xml.push(click_to_xml("CompanionClickTracking", click));
    }
    push_opt(&mut xml, tracking_events_to_xml(companion.tracking_events.as_ref()));
    xml
}

fn companion_ads_wrapper_to_xml(companion_ads: &CompanionAdsWrapper) -> Element {
    let mut xml = Element::new("CompanionAds");
    set_opt(&mut xml, "required", companion_ads.required.map(|r| r.as_str()));
    for companion in &companion_ads.companions {
        xml.push(companion_wrapper_to_xml(companion));
    }
    xml
}

fn companion_wrapper_to_xml(companion: &CompanionWrapper) -> Element {
    let mut xml = Element::new("Companion");
    set_opt(&mut xml, "id", companion.id.as_ref());
    xml.set_attr("width", companion.width.to_string());
    xml.set_attr("height", companion.height.to_string());
    xml.set_attr("assetWidth", companion.asset_width.to_string());
    xml.set_attr("assetHeight", companion.asset_height.to_string());
    xml.set_attr("expandedWidth", companion.expanded_width.to_string());
    xml.set_attr("expandedHeight", companion.expanded_height.to_string());
    set_opt(&mut xml, "apiFramework", companion.api_framework.as_ref());
    set_opt(&mut xml, "adSlotId", companion.ad_slot_id.as_ref());

    resources_to_xml(&mut xml, &companion.resources);
    push_opt(&mut xml, companion.ad_parameters.as_ref().map(ad_parameters_to_xml));
    push_opt(&mut xml, companion.alt_text.as_ref().map(|t| char_data("AltText", t)));
    push_opt(
        &mut xml,
        companion.click_through.as_ref().map(|uri| char_data("CompanionClickThrough", uri)),
    );
    for uri in &companion.click_trackings {
        xml.push(char_data("CompanionClickTracking", uri));
    }
    push_opt(&mut xml, tracking_events_to_xml(companion.tracking_events.as_ref()));
    xml
}

fn non_linear_ads_to_xml(non_linear_ads: &NonLinearAds) -> Element {
    let mut xml = Element::new("NonLinearAds");
    push_opt(&mut xml, tracking_events_to_xml(non_linear_ads.tracking_events.as_ref()));
    for non_linear in &non_linear_ads.non_linears {
        xml.push(non_linear_to_xml(non_linear));
    }
    xml
}

/// The attributes a `<NonLinear>` carries in both inline and wrapper creatives
fn non_linear_attributes(
    xml: &mut Element,
    id: Option<&String>,
    dimensions: [u32; 4],
    scalable: Option<bool>,
    maintain_aspect_ratio: Option<bool>,
    min_suggested_duration: Option<Duration>,
    api_framework: Option<&String>,
) {
    set_opt(xml, "id", id);
    let [width, height, expanded_width, expanded_height] = dimensions;
    xml.set_attr("width", width.to_string());
    xml.set_attr("height", height.to_string());
    xml.set_attr("expandedWidth", expanded_width.to_string());
    xml.set_attr("expandedHeight", expanded_height.to_string());
    set_opt(xml, "scalable", scalable);
    set_opt(xml, "maintainAspectRatio", maintain_aspect_ratio);
    set_opt(xml, "minSuggestedDuration", min_suggested_duration);
    set_opt(xml, "apiFramework", api_framework);
}

fn non_linear_to_xml(non_linear: &NonLinear) -> Element {
    let mut xml = Element::new("NonLinear");
    non_linear_attributes(
        &mut xml,
        non_linear.id.as_ref(),
        [
            non_linear.width,
            non_linear.height,
            non_linear.expanded_width,
            non_linear.expanded_height,
        ],
        non_linear.scalable,
        non_linear.maintain_aspect_ratio,
        non_linear.min_suggested_duration,
        non_linear.api_framework.as_ref(),
    );

    resources_to_xml(&mut xml, &non_linear.resources);
    push_opt(&mut xml, non_linear.ad_parameters.as_ref().map(ad_parameters_to_xml));
    push_opt(
        &mut xml,
        non_linear.click_through.as_ref().map(|uri| char_data("NonLinearClickThrough", uri)),
    );
    for click in &non_linear.click_trackings {
        xml.push(click_to_xml("NonLinearClickTracking", click));
    }
    xml
}

fn non_linear_ads_wrapper_to_xml(non_linear_ads: &NonLinearAdsWrapper) -> Element {
    let mut xml = Element::new("NonLinearAds");
    push_opt(&mut xml, tracking_events_to_xml(non_linear_ads.tracking_events.as_ref()));
    for non_linear in &non_linear_ads.non_linears {
        let mut element = Element::new("NonLinear");
        non_linear_attributes(
            &mut element,
            non_linear.id.as_ref(),
            [
                non_linear.width,
                non_linear.height,
                non_linear.expanded_width,
                non_linear.expanded_height,
            ],
            non_linear.scalable,
            non_linear.maintain_aspect_ratio,
            non_linear.min_suggested_duration,
            non_linear.api_framework.as_ref(),
        );
        push_opt(&mut element, tracking_events_to_xml(non_linear.tracking_events.as_ref()));
        for uri in &non_linear.click_trackings {
            element.push(char_data("NonLinearClickTracking", uri));
        }
        xml.push(element);
    }
    xml
}

fn icon_to_xml(icon: &Icon) -> Element {
    let mut xml = Element::new(paths::ICONS.item)
        .with_attr("program", icon.program.as_str())
        .with_attr("width", icon.width.to_string())
        .with_attr("height", icon.height.to_string())
        .with_attr("xPosition", icon.x_position.as_str())
        .with_attr("yPosition", icon.y_position.as_str());
    set_opt(&mut xml, "offset", icon.offset);
    set_opt(&mut xml, "duration", icon.duration);
    set_opt(&mut xml, "apiFramework", icon.api_framework.as_ref());
    set_opt(&mut xml, "pxratio", icon.pxratio.as_ref());
    set_opt(&mut xml, "altText", icon.alt_text.as_ref());
    set_opt(&mut xml, "hoverText", icon.hover_text.as_ref());

    resources_to_xml(&mut xml, &icon.resources);

    // IconClicks only exists on the wire when there is something to put in it
    if icon.click_through.is_some() || !icon.click_trackings.is_empty() {
        let mut clicks = Element::new(paths::ICON_CLICKS);
        push_opt(
            &mut clicks,
            icon.click_through.as_ref().map(|uri| char_data("IconClickThrough", uri)),
        );
        for uri in &icon.click_trackings {
            clicks.push(char_data("IconClickTracking", uri));
        }
        xml.push(clicks);
    }
    for uri in &icon.view_trackings {
        xml.push(char_data("IconViewTracking", uri));
    }
    xml
}
