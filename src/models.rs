use serde::{Deserialize, Serialize};

use crate::values::{CdataString, Duration, Offset, PlainString};
use crate::xml::{Attribute, Node};

/// Represents a VAST document (Video Ad Serving Template), the root `<VAST>` element
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Vast {
    /// The VAST version (e.g., "3.0", "4.2")
    pub version: String,

    /// XML namespace, most likely `http://www.iab.com/VAST`
    pub xmlns: Option<String>,

    /// Whether the player should start the ads muted
    pub mute: Option<bool>,

    /// The Ad elements within the VAST document, in document order
    pub ads: Vec<Ad>,

    /// Tracking URIs the player requests upon a "no ad" response
    pub errors: Vec<CdataString>,
}

impl Vast {
    pub fn new(version: impl Into<String>) -> Self {
        Vast {
            version: version.into(),
            ..Default::default()
        }
    }
}

/// Represents an Ad within a VAST document
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Ad {
    /// Ad server-defined identifier
    pub id: Option<String>,

    /// The ad type: video, audio or hybrid. Absent means video.
    pub ad_type: Option<String>,

    /// The ad sequence number; ads carrying one are members of a pod
    pub sequence: Option<u32>,

    /// The conditional ad flag (VAST 4.0+)
    pub conditional_ad: Option<bool>,

    /// The ad definition itself, inline or a wrapper
    pub payload: AdPayload,
}

/// Every `<Ad>` holds exactly one of `<InLine>` or `<Wrapper>`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub enum AdPayload {
    InLine(InLine),
    Wrapper(Wrapper),
}

impl Ad {
    pub fn inline(inline: InLine) -> Self {
        Ad::with_payload(AdPayload::InLine(inline))
    }

    pub fn wrapper(wrapper: Wrapper) -> Self {
        Ad::with_payload(AdPayload::Wrapper(wrapper))
    }

    fn with_payload(payload: AdPayload) -> Self {
        Ad {
            id: None,
            ad_type: None,
            sequence: None,
            conditional_ad: None,
            payload,
        }
    }

    /// The ad type with the documented default applied.
    pub fn ad_type_or_default(&self) -> &str {
        self.ad_type.as_deref().unwrap_or("video")
    }

    pub fn is_pod_member(&self) -> bool {
        self.sequence.is_some_and(|s| s > 0)
    }

    pub fn as_inline(&self) -> Option<&InLine> {
        match &self.payload {
            AdPayload::InLine(inline) => Some(inline),
            AdPayload::Wrapper(_) => None,
        }
    }

    pub fn as_wrapper(&self) -> Option<&Wrapper> {
        match &self.payload {
            AdPayload::Wrapper(wrapper) => Some(wrapper),
            AdPayload::InLine(_) => None,
        }
    }
}

/// Represents an InLine ad, the terminal ad definition with all creatives and trackers
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct InLine {
    /// The ad system name and version
    pub ad_system: AdSystem,

    /// The ad title
    pub ad_title: PlainString,

    /// Impression tracking URLs
    pub impressions: Vec<Impression>,

    /// Pseudo-unique identifier for the lifecycle of this ad
    pub ad_serving_id: Option<PlainString>,

    /// Ad content categories
    pub categories: Vec<Category>,

    /// The description of the ad
    pub description: Option<PlainString>,

    /// The advertiser name
    pub advertiser: Option<Advertiser>,

    /// Pricing information
    pub pricing: Option<Pricing>,

    /// Survey resource (deprecated in VAST 4.1)
    pub survey: Option<Survey>,

    /// Error tracking URLs
    pub errors: Vec<CdataString>,

    /// Extensions; `Some(vec![])` is an explicitly empty `<Extensions>` block
    pub extensions: Option<Vec<Extension>>,

    /// Viewability tracking
    pub viewable_impression: Option<ViewableImpression>,

    /// Third-party verification resources
    pub ad_verifications: Option<Vec<Verification>>,

    /// Creative elements
    pub creatives: Vec<Creative>,

    /// Seconds after the request during which the ad may be played
    pub expires: Option<u32>,
}

/// Represents a Wrapper ad, which redirects to another VAST document
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Wrapper {
    /// The ad system name and version
    pub ad_system: Option<AdSystem>,

    /// The URL of the next VAST document
    pub vast_ad_tag_uri: CdataString,

    /// Impression tracking URLs
    pub impressions: Vec<Impression>,

    /// Pricing information
    pub pricing: Option<Pricing>,

    /// Error tracking URLs
    pub errors: Vec<CdataString>,

    /// Viewability tracking
    pub viewable_impression: Option<ViewableImpression>,

    /// Third-party verification resources
    pub ad_verifications: Option<Vec<Verification>>,

    /// Extensions; `Some(vec![])` is an explicitly empty `<Extensions>` block
    pub extensions: Option<Vec<Extension>>,

    /// Trackers to merge into the creatives of the wrapped ad
    pub creatives: Option<Vec<CreativeWrapper>>,

    /// Categories a downstream ad server must not return
    pub blocked_ad_categories: Vec<Category>,

    /// Whether further wrappers may follow this one (default true)
    pub follow_additional_wrappers: Option<bool>,

    /// Whether the wrapped response may contain several ads (default false)
    pub allow_multiple_ads: Option<bool>,

    /// Whether to fall back to stand-alone ads on a no-ad response
    pub fallback_on_no_ad: Option<bool>,
}

impl Wrapper {
    pub fn follows_additional_wrappers(&self) -> bool {
        self.follow_additional_wrappers.unwrap_or(true)
    }

    pub fn allows_multiple_ads(&self) -> bool {
        self.allow_multiple_ads.unwrap_or(false)
    }

    pub fn falls_back_on_no_ad(&self) -> bool {
        self.fallback_on_no_ad.unwrap_or(false)
    }
}

/// Represents the ad system information
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct AdSystem {
    /// The ad system name
    pub name: PlainString,

    /// The ad system version
    pub version: Option<String>,
}

/// Represents an impression tracking URL
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Impression {
    /// The impression ID
    pub id: Option<String>,

    /// The impression tracking URL
    pub uri: CdataString,
}

/// Represents pricing information
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Pricing {
    /// The pricing model: cpm, cpc, cpe or cpv
    pub model: String,

    /// ISO-4217 currency code (e.g., "USD", "EUR")
    pub currency: String,

    /// The price value
    pub value: CdataString,
}

/// An ad category code, or a blocked category list inside a wrapper
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Category {
    /// URL of the organization that defined the category list
    pub authority: Option<String>,

    /// The category code(s)
    pub value: PlainString,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Advertiser {
    pub id: Option<String>,
    pub name: PlainString,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Survey {
    /// MIME type of the survey resource
    pub r#type: Option<String>,
    pub uri: CdataString,
}

/// Viewability tracking URIs grouped by outcome
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct ViewableImpression {
    pub id: Option<String>,
    pub viewable: Vec<CdataString>,
    pub not_viewable: Vec<CdataString>,
    pub view_undetermined: Vec<CdataString>,
}

/// Resources and metadata needed to run third-party verification code
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Verification {
    /// Vendor identifier, e.g. `company.com-omid`
    pub vendor: Option<String>,
    pub javascript_resources: Vec<JavaScriptResource>,
    pub executable_resources: Vec<ExecutableResource>,
    pub tracking_events: Option<Vec<Tracking>>,
    pub verification_parameters: Option<CdataString>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct JavaScriptResource {
    pub api_framework: Option<String>,
    pub browser_optional: Option<bool>,
    pub uri: CdataString,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct ExecutableResource {
    pub api_framework: Option<String>,
    pub r#type: Option<String>,
    pub uri: CdataString,
}

/// An opaque vendor extension, kept exactly as it appeared on the wire
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Extension {
    /// The extension's attributes, in document order
    pub attributes: Vec<Attribute>,

    /// The extension's content: elements, text and CDATA
    pub children: Vec<Node>,
}

impl Extension {
    /// The `type` attribute, when present
    pub fn extension_type(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == "type")
            .map(|a| a.value.as_str())
    }
}

/// Represents a creative element inside an inline ad
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Creative {
    /// The creative ID
    pub id: Option<String>,

    /// The creative sequence number
    pub sequence: Option<u32>,

    /// The ad with which the creative is served
    pub ad_id: Option<String>,

    /// The creative API framework
    pub api_framework: Option<String>,

    /// Universal ad identifiers (VAST 4.x)
    pub universal_ad_ids: Vec<UniversalAdId>,

    /// Creative extensions; `Some(vec![])` is an explicitly empty block
    pub creative_extensions: Option<Vec<Extension>>,

    /// The creative itself, when one is present
    pub content: Option<CreativeContent>,
}

/// At most one of `<Linear>`, `<CompanionAds>` or `<NonLinearAds>` per creative
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub enum CreativeContent {
    Linear(Linear),
    CompanionAds(CompanionAds),
    NonLinearAds(NonLinearAds),
}

impl Creative {
    pub fn linear(&self) -> Option<&Linear> {
        match &self.content {
            Some(CreativeContent::Linear(linear)) => Some(linear),
            _ => None,
        }
    }

    pub fn companion_ads(&self) -> Option<&CompanionAds> {
        match &self.content {
            Some(CreativeContent::CompanionAds(companions)) => Some(companions),
            _ => None,
        }
    }

    pub fn non_linear_ads(&self) -> Option<&NonLinearAds> {
        match &self.content {
            Some(CreativeContent::NonLinearAds(non_linears)) => Some(non_linears),
            _ => None,
        }
    }
}

/// A creative inside a wrapper; only carries trackers for the wrapped ad
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct CreativeWrapper {
    pub id: Option<String>,
    pub sequence: Option<u32>,
    pub ad_id: Option<String>,
    pub api_framework: Option<String>,
    pub universal_ad_ids: Vec<UniversalAdId>,
    pub creative_extensions: Option<Vec<Extension>>,
    pub content: Option<CreativeWrapperContent>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub enum CreativeWrapperContent {
    Linear(LinearWrapper),
    CompanionAds(CompanionAdsWrapper),
    NonLinearAds(NonLinearAdsWrapper),
}

impl CreativeWrapper {
    pub fn linear(&self) -> Option<&LinearWrapper> {
        match &self.content {
            Some(CreativeWrapperContent::Linear(linear)) => Some(linear),
            _ => None,
        }
    }
}

/// Universal ad identifier; both parts default to "unknown"
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct UniversalAdId {
    pub id_registry: String,
    pub id: PlainString,
}

pub const UNKNOWN_AD_ID: &str = "unknown";

impl Default for UniversalAdId {
    fn default() -> Self {
        UniversalAdId {
            id_registry: UNKNOWN_AD_ID.to_string(),
            id: PlainString::from(UNKNOWN_AD_ID),
        }
    }
}

/// Represents a linear ad
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Linear {
    /// When the skip control is offered
    pub skip_offset: Option<Offset>,

    /// The duration of the ad
    pub duration: Option<Duration>,

    /// Renditions of the ad and their companion files
    pub media_files: Option<MediaFiles>,

    /// Data passed to an interactive creative
    pub ad_parameters: Option<AdParameters>,

    /// Tracking events
    pub tracking_events: Option<Vec<Tracking>>,

    /// Video clicks
    pub video_clicks: Option<VideoClicks>,

    /// Industry icons such as AdChoices
    pub icons: Option<Vec<Icon>>,
}

/// A linear creative inside a wrapper
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct LinearWrapper {
    pub icons: Option<Vec<Icon>>,
    pub tracking_events: Option<Vec<Tracking>>,
    pub video_clicks: Option<VideoClicks>,
}

/// Represents a media file
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct MediaFile {
    /// The media file URL
    pub uri: CdataString,

    pub id: Option<String>,

    /// The delivery method, progressive or streaming
    pub delivery: String,

    /// The media file MIME type
    pub mime_type: String,

    /// Pixel width of the video
    pub width: u32,

    /// Pixel height of the video
    pub height: u32,

    /// The media file codec
    pub codec: Option<String>,

    /// Bitrate in Kbps; exclusive with the min/max pair by convention
    pub bitrate: Option<u32>,

    pub min_bitrate: Option<u32>,

    pub max_bitrate: Option<u32>,

    pub scalable: Option<bool>,

    pub maintain_aspect_ratio: Option<bool>,

    pub api_framework: Option<String>,

    /// Size in bytes
    pub file_size: Option<u64>,

    /// 2D, 3D, 360 and so on
    pub media_type: Option<String>,
}

/// Contents of `<MediaFiles>`
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct MediaFiles {
    pub files: Vec<MediaFile>,

    /// Raw, high quality masters for ad servers that transcode
    pub mezzanines: Vec<Mezzanine>,

    pub interactive_creative_files: Vec<InteractiveCreativeFile>,

    /// `None` when the document has no `<ClosedCaptionFiles>` element
    pub closed_caption_files: Option<Vec<ClosedCaptionFile>>,
}

/// A mezzanine file
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Mezzanine {
    pub uri: CdataString,
    pub id: Option<String>,
    pub delivery: String,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    pub codec: Option<String>,
    pub file_size: Option<u64>,
    pub media_type: Option<String>,
}

/// Executable asset for an interactive creative
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct InteractiveCreativeFile {
    pub uri: CdataString,
    pub mime_type: Option<String>,
    pub api_framework: Option<String>,

    /// The creative may extend the duration of the ad
    pub variable_duration: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct ClosedCaptionFile {
    pub uri: CdataString,
    pub mime_type: Option<String>,

    /// Language code such as `en` or `es-MX`
    pub language: Option<String>,
}

/// Represents click-through, click-tracking and custom click URLs
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct VideoClicks {
    pub click_throughs: Vec<Click>,
    pub click_trackings: Vec<Click>,
    pub custom_clicks: Vec<Click>,
}

/// A click URL with an optional reporting id
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Click {
    pub id: Option<String>,
    pub uri: CdataString,
}

/// Represents a tracking event
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Tracking {
    /// The event to track
    pub event: TrackingEvent,

    /// Playback position for progress events
    pub offset: Option<Offset>,

    /// The tracking URL
    pub uri: CdataString,

    /// Non-standard user agent hint
    pub ua: Option<String>,
}

impl Tracking {
    pub fn new(event: TrackingEvent, uri: impl Into<CdataString>) -> Self {
        Tracking {
            event,
            offset: None,
            uri: uri.into(),
            ua: None,
        }
    }
}

macro_rules! tracking_events {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// The name of a playback milestone a tracker fires on.
        ///
        /// Names outside the VAST 4.2 list are kept verbatim in `Other`.
        #[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone)]
        #[serde(from = "String", into = "String")]
        pub enum TrackingEvent {
            $($variant,)*
            Other(String),
        }

        impl TrackingEvent {
            pub fn as_str(&self) -> &str {
                match self {
                    $(TrackingEvent::$variant => $name,)*
                    TrackingEvent::Other(name) => name,
                }
            }
        }

        impl From<&str> for TrackingEvent {
            fn from(name: &str) -> Self {
                match name {
                    $($name => TrackingEvent::$variant,)*
                    other => TrackingEvent::Other(other.to_string()),
                }
            }
        }
    };
}

tracking_events! {
    CreativeView => "creativeView",
    Start => "start",
    FirstQuartile => "firstQuartile",
    Midpoint => "midpoint",
    ThirdQuartile => "thirdQuartile",
    Complete => "complete",
    Mute => "mute",
    Unmute => "unmute",
    Pause => "pause",
    Resume => "resume",
    Rewind => "rewind",
    Skip => "skip",
    PlayerExpand => "playerExpand",
    PlayerCollapse => "playerCollapse",
    Progress => "progress",
    CloseLinear => "closeLinear",
    Loaded => "loaded",
    NotUsed => "notUsed",
    OtherAdInteraction => "otherAdInteraction",
    AcceptInvitation => "acceptInvitation",
    AdExpand => "adExpand",
    AdCollapse => "adCollapse",
    Minimize => "minimize",
    Close => "close",
    OverlayViewDuration => "overlayViewDuration",
    Fullscreen => "fullscreen",
    ExitFullscreen => "exitFullscreen",
    Expand => "expand",
    Collapse => "collapse",
    AcceptInvitationLinear => "acceptInvitationLinear",
    TimeSpentViewing => "timeSpentViewing",
    InteractiveStart => "interactiveStart",
    VerificationNotExecuted => "verificationNotExecuted",
}

impl From<String> for TrackingEvent {
    fn from(name: String) -> Self {
        TrackingEvent::from(name.as_str())
    }
}

impl From<TrackingEvent> for String {
    fn from(event: TrackingEvent) -> Self {
        match event {
            TrackingEvent::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for TrackingEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The rendering resources of a companion, non-linear or icon.
///
/// Any combination may be present; players use the first they support.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Resources {
    pub static_resource: Option<StaticResource>,
    pub iframe_resource: Option<CdataString>,
    pub html_resource: Option<HtmlResource>,
}

impl Resources {
    pub fn is_empty(&self) -> bool {
        self.static_resource.is_none() && self.iframe_resource.is_none() && self.html_resource.is_none()
    }
}

/// URL to a static file, such as an image
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct StaticResource {
    /// MIME type of the resource
    pub creative_type: Option<String>,
    pub uri: CdataString,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct HtmlResource {
    pub xml_encoded: Option<bool>,
    pub html: CdataString,
}

/// Arbitrary data handed to the creative
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct AdParameters {
    pub xml_encoded: Option<bool>,
    pub parameters: CdataString,
}

/// Which companions the player must display
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CompanionRequired {
    All,
    Any,
    None,
}

impl CompanionRequired {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanionRequired::All => "all",
            CompanionRequired::Any => "any",
            CompanionRequired::None => "none",
        }
    }
}

impl std::str::FromStr for CompanionRequired {
    type Err = crate::values::FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(CompanionRequired::All),
            "any" => Ok(CompanionRequired::Any),
            "none" => Ok(CompanionRequired::None),
            other => Err(crate::values::FormatError {
                literal: other.to_string(),
                expected: "companion requirement (all, any or none)",
            }),
        }
    }
}

/// Represents companion ads
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct CompanionAds {
    pub required: Option<CompanionRequired>,
    pub companions: Vec<Companion>,
}

/// Represents a companion ad; every dimension is optional here
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Companion {
    pub id: Option<String>,

    /// Pixel dimensions of the companion slot
    pub width: Option<u32>,
    pub height: Option<u32>,

    /// Pixel dimensions of the companion asset
    pub asset_width: Option<u32>,
    pub asset_height: Option<u32>,

    /// Pixel dimensions when expanded
    pub expanded_width: Option<u32>,
    pub expanded_height: Option<u32>,

    pub api_framework: Option<String>,

    /// Matches the companion to a publisher placement
    pub ad_slot_id: Option<String>,

    pub resources: Resources,

    pub ad_parameters: Option<AdParameters>,

    pub alt_text: Option<PlainString>,

    /// The companion click-through URL
    pub click_through: Option<CdataString>,

    pub click_trackings: Vec<Click>,

    /// Companion tracking events; creativeView is the only supported event
    pub tracking_events: Option<Vec<Tracking>>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct CompanionAdsWrapper {
    pub required: Option<CompanionRequired>,
    pub companions: Vec<CompanionWrapper>,
}

/// A companion inside a wrapper. Unlike [`Companion`], the six dimension
/// attributes are always written.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct CompanionWrapper {
    pub id: Option<String>,
    pub width: u32,
    pub height: u32,
    pub asset_width: u32,
    pub asset_height: u32,
    pub expanded_width: u32,
    pub expanded_height: u32,
    pub api_framework: Option<String>,
    pub ad_slot_id: Option<String>,
    pub resources: Resources,
    pub ad_parameters: Option<AdParameters>,
    pub alt_text: Option<PlainString>,
    pub click_through: Option<CdataString>,
    pub click_trackings: Vec<CdataString>,
    pub tracking_events: Option<Vec<Tracking>>,
}

/// Represents non-linear ads
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct NonLinearAds {
    pub tracking_events: Option<Vec<Tracking>>,
    pub non_linears: Vec<NonLinear>,
}

/// Represents a non-linear ad
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct NonLinear {
    pub id: Option<String>,

    /// Pixel dimensions
    pub width: u32,
    pub height: u32,

    /// Pixel dimensions when expanded
    pub expanded_width: u32,
    pub expanded_height: u32,

    pub scalable: Option<bool>,
    pub maintain_aspect_ratio: Option<bool>,

    /// Suggested display time, typically for an animation to complete
    pub min_suggested_duration: Option<Duration>,

    pub api_framework: Option<String>,
    pub resources: Resources,
    pub ad_parameters: Option<AdParameters>,

    /// The non-linear click-through URL
    pub click_through: Option<CdataString>,

    pub click_trackings: Vec<Click>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct NonLinearAdsWrapper {
    pub tracking_events: Option<Vec<Tracking>>,
    pub non_linears: Vec<NonLinearWrapper>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct NonLinearWrapper {
    pub id: Option<String>,
    pub width: u32,
    pub height: u32,
    pub expanded_width: u32,
    pub expanded_height: u32,
    pub scalable: Option<bool>,
    pub maintain_aspect_ratio: Option<bool>,
    pub min_suggested_duration: Option<Duration>,
    pub api_framework: Option<String>,
    pub tracking_events: Option<Vec<Tracking>>,
    pub click_trackings: Vec<CdataString>,
}

/// An industry icon such as AdChoices
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Icon {
    /// The industry initiative the icon supports
    pub program: String,

    pub width: u32,
    pub height: u32,

    /// Horizontal position: pixels, `left` or `right`
    pub x_position: String,

    /// Vertical position: pixels, `top` or `bottom`
    pub y_position: String,

    /// When to start showing the icon
    pub offset: Option<Offset>,

    /// How long to show the icon
    pub duration: Option<Duration>,

    pub api_framework: Option<String>,
    pub pxratio: Option<String>,
    pub alt_text: Option<String>,
    pub hover_text: Option<String>,
    pub resources: Resources,

    /// Reached through `<IconClicks>` on the wire
    pub click_through: Option<CdataString>,

    /// Reached through `<IconClicks>` on the wire
    pub click_trackings: Vec<CdataString>,

    pub view_trackings: Vec<CdataString>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_event_names_round_trip() {
        for name in ["creativeView", "progress", "verificationNotExecuted"] {
            assert_eq!(TrackingEvent::from(name).as_str(), name);
        }
        assert_eq!(TrackingEvent::from("start"), TrackingEvent::Start);
        assert_eq!(
            TrackingEvent::from("vendorPing"),
            TrackingEvent::Other("vendorPing".to_string())
        );
        assert_eq!(String::from(TrackingEvent::Midpoint), "midpoint");
    }

    #[test]
    fn documented_defaults_apply_when_absent() {
        let wrapper = Wrapper::default();
        assert!(wrapper.follows_additional_wrappers());
        assert!(!wrapper.allows_multiple_ads());
        assert!(!wrapper.falls_back_on_no_ad());

        let ad = Ad::wrapper(wrapper);
        assert_eq!(ad.ad_type_or_default(), "video");
        assert!(!ad.is_pod_member());
        assert!(ad.as_inline().is_none());
        assert!(ad.as_wrapper().is_some());
    }

    #[test]
    fn universal_ad_id_defaults_to_unknown() {
        let id = UniversalAdId::default();
        assert_eq!(id.id_registry, "unknown");
        assert_eq!(&*id.id, "unknown");
    }

    #[test]
    fn companion_required_parses_policy() {
        assert_eq!("any".parse::<CompanionRequired>().unwrap(), CompanionRequired::Any);
        assert!("some".parse::<CompanionRequired>().is_err());
        assert_eq!(CompanionRequired::None.as_str(), "none");
    }
}
