
use fixtures::*;
use pretty_assertions::assert_eq;
use vast_codec::*;

#[test]
fn test_decodes_minimal_inline_linear() {
    ensure_env_logger_initialized();
    let vast = decode(INLINE_LINEAR.as_bytes()).unwrap();

    assert_eq!(vast.version, "4.2");
    assert_eq!(vast.xmlns.as_deref(), Some("http://www.iab.com/VAST"));
    assert_eq!(vast.ads.len(), 1);

    let ad = &vast.ads[0];
    assert_eq!(ad.id.as_deref(), Some("20001"));
    assert_eq!(ad.sequence, Some(1));
    assert!(ad.is_pod_member());
    assert_eq!(ad.ad_type_or_default(), "video");

    let inline = ad.as_inline().expect("inline ad");
    assert_eq!(&*inline.ad_system.name, "iabtechlab");
    assert_eq!(inline.ad_system.version.as_deref(), Some("4.0"));
    assert_eq!(&*inline.ad_title, "Inline Simple Ad");
    assert_eq!(inline.impressions.len(), 1);
    assert_eq!(&*inline.impressions[0].uri, "https://example.com/track/impression");
    assert_eq!(&*inline.errors[0], "https://example.com/error?code=[ERRORCODE]");
    assert_eq!(inline.extensions, None);

    let creative = &inline.creatives[0];
    assert_eq!(creative.ad_id.as_deref(), Some("2447226"));
    assert_eq!(creative.universal_ad_ids[0].id_registry, "Ad-ID");
    assert_eq!(&*creative.universal_ad_ids[0].id, "8465");

    let linear = creative.linear().expect("linear creative");
    assert_eq!(linear.duration, Some(Duration::from_secs(15)));
    assert_eq!(linear.duration.unwrap().subsec_millis(), 0);

    let media = &linear.media_files.as_ref().unwrap().files[0];
    assert_eq!(&*media.uri, "https://example.com/video/simple.mp4");
    assert_eq!(media.mime_type, "video/mp4");
    assert_eq!((media.width, media.height), (400, 300));
    assert_eq!(media.bitrate, Some(500));
    assert_eq!(media.scalable, Some(true));
    assert_eq!(media.codec.as_deref(), Some("0"));
}

#[test]
fn test_decodes_wrapper() {
    ensure_env_logger_initialized();
    let vast = decode(WRAPPER.as_bytes()).unwrap();

    let ad = &vast.ads[0];
    assert_eq!(ad.conditional_ad, Some(false));
    let wrapper = ad.as_wrapper().expect("wrapper ad");

    assert_eq!(&*wrapper.vast_ad_tag_uri, "https://example.com/vast/inline.xml");
    assert_eq!(wrapper.follow_additional_wrappers, Some(false));
    assert!(!wrapper.follows_additional_wrappers());
    assert!(wrapper.allows_multiple_ads());
    assert_eq!(wrapper.fallback_on_no_ad, None);
    assert!(!wrapper.falls_back_on_no_ad());
    assert_eq!(&*wrapper.blocked_ad_categories[0].value, "IAB8-5");

    let creatives = wrapper.creatives.as_ref().unwrap();
    assert_eq!(creatives.len(), 2);

    let linear = creatives[0].linear().expect("linear wrapper");
    let trackers = linear.tracking_events.as_ref().unwrap();
    assert_eq!(trackers[0].event, TrackingEvent::Start);
    assert_eq!(trackers[1].event, TrackingEvent::Progress);
    assert_eq!(trackers[1].offset, Some(Offset::Time(Duration::from_secs(5))));
    assert_eq!(linear.video_clicks.as_ref().unwrap().click_trackings[0].id.as_deref(), Some("blog"));

    match &creatives[1].content {
        Some(CreativeWrapperContent::NonLinearAds(ads)) => {
            assert_eq!(ads.non_linears[0].width, 300);
            assert_eq!(ads.non_linears[0].expanded_width, 0);
            assert_eq!(&*ads.non_linears[0].click_trackings[0], "https://example.com/nonlinear/click");
        }
        other => panic!("expected non-linear ads, got {:?}", other),
    }
}

#[test]
fn test_decodes_full_featured_document() {
    ensure_env_logger_initialized();
    let decoded = decode_with(FULL_FEATURED.as_bytes(), &CodecSettings::default()).unwrap();
    assert!(decoded.warnings.is_empty(), "{:?}", decoded.warnings);

    let vast = decoded.vast;
    assert_eq!(vast.mute, Some(true));
    let inline = vast.ads[0].as_inline().unwrap();

    assert_eq!(inline.impressions[1].id.as_deref(), Some("second"));
    assert_eq!(&*inline.impressions[1].uri, "https://example.com/imp/2?a=1&b=2");
    assert_eq!(
        inline.ad_serving_id.as_deref(),
        Some("a532d16d-4d7f-4440-bd29-2ec0e693fc80")
    );
    assert_eq!(inline.advertiser.as_ref().unwrap().id.as_deref(), Some("adv-7"));
    assert_eq!(inline.pricing.as_ref().unwrap().model, "CPM");
    assert_eq!(inline.expires, Some(3600));

    let extensions = inline.extensions.as_ref().unwrap();
    assert_eq!(extensions.len(), 2);
    assert_eq!(extensions[0].extension_type(), Some("iab-Count"));
    assert_eq!(extensions[1].children, vec![xml::Node::Text("plain value".to_string())]);

    let viewable = inline.viewable_impression.as_ref().unwrap();
    assert_eq!(viewable.view_undetermined.len(), 1);

    let verification = &inline.ad_verifications.as_ref().unwrap()[0];
    assert_eq!(verification.vendor.as_deref(), Some("company.com-omid"));
    assert_eq!(verification.javascript_resources[0].browser_optional, Some(true));
    assert_eq!(
        verification.tracking_events.as_ref().unwrap()[0].event,
        TrackingEvent::VerificationNotExecuted
    );
    assert_eq!(verification.verification_parameters.as_deref(), Some(r#"{"key":"value"}"#));

    let linear = inline.creatives[0].linear().unwrap();
    assert_eq!(linear.skip_offset, Some(Offset::Percent(25.0)));
    assert_eq!(linear.duration.unwrap().as_millis(), 30_500);
    let media_files = linear.media_files.as_ref().unwrap();
    assert_eq!(media_files.files[0].file_size, Some(1_048_576));
    assert_eq!(media_files.mezzanines[0].width, 3840);
    assert_eq!(media_files.mezzanines[0].codec.as_deref(), Some("H.264"));
    let interactive = &media_files.interactive_creative_files[0];
    assert_eq!(interactive.api_framework.as_deref(), Some("SIMID"));
    assert_eq!(interactive.variable_duration, Some(true));
    let captions = media_files.closed_caption_files.as_ref().unwrap();
    assert_eq!(captions.len(), 2);
    assert_eq!(captions[1].language.as_deref(), Some("es"));
    assert_eq!(&*captions[0].uri, "https://example.com/captions/en.vtt");

    let trackers = linear.tracking_events.as_ref().unwrap();
    assert_eq!(trackers[1].offset, Some(Offset::Percent(50.0)));
    assert_eq!(trackers[2].event, TrackingEvent::Other("vendorPing".to_string()));
    assert_eq!(trackers[2].ua.as_deref(), Some("Player/1.0"));

    let icon = &linear.icons.as_ref().unwrap()[0];
    assert_eq!(icon.program, "AdChoices");
    assert_eq!(icon.duration, Some(Duration::from_secs(10)));
    assert_eq!(icon.click_through.as_deref(), Some("https://example.com/adchoices"));
    assert_eq!(icon.view_trackings.len(), 1);
    assert_eq!(
        icon.resources.static_resource.as_ref().unwrap().creative_type.as_deref(),
        Some("image/png")
    );

    let companions = inline.creatives[1].companion_ads().unwrap();
    assert_eq!(companions.required, Some(CompanionRequired::Any));
    assert_eq!(companions.companions[0].width, Some(300));
    assert_eq!(companions.companions[0].expanded_width, None);
    assert_eq!(companions.companions[0].alt_text.as_deref(), Some("Example companion"));
    assert_eq!(
        &*companions.companions[1].resources.html_resource.as_ref().unwrap().html,
        r#"<div class="banner">Hi</div>"#
    );

    let non_linear_ads = inline.creatives[2].non_linear_ads().unwrap();
    let non_linear = &non_linear_ads.non_linears[0];
    assert_eq!(non_linear.min_suggested_duration, Some(Duration::from_secs(5)));
    assert_eq!(
        non_linear.resources.iframe_resource.as_deref(),
        Some("https://example.com/overlay.html")
    );
    assert_eq!(non_linear_ads.tracking_events.as_ref().unwrap()[0].event, TrackingEvent::AdExpand);
}

#[test]
fn test_decodes_no_ad_response() {
    ensure_env_logger_initialized();
    let vast = parse_vast(NO_AD).unwrap();
    assert!(vast.ads.is_empty());
    assert_eq!(&*vast.errors[0], "https://example.com/error?code=303");
}

#[test]
fn test_cdata_and_plain_text_decode_alike() {
    ensure_env_logger_initialized();
    let cdata = with_creative(
        "<Linear><VideoClicks><ClickThrough><![CDATA[https://a/?x=1&y=2]]></ClickThrough></VideoClicks></Linear>",
    );
    let plain = with_creative(
        "<Linear><VideoClicks><ClickThrough>https://a/?x=1&amp;y=2</ClickThrough></VideoClicks></Linear>",
    );

    let from_cdata = decode(cdata.as_bytes()).unwrap();
    let from_plain = decode(plain.as_bytes()).unwrap();
    assert_eq!(from_cdata, from_plain);
}

#[test]
fn test_serde_json_interchange() {
    ensure_env_logger_initialized();
    let vast = decode(FULL_FEATURED.as_bytes()).unwrap();

    let json = serde_json::to_value(&vast).unwrap();
    let linear = &json["ads"][0]["payload"]["InLine"]["creatives"][0]["content"]["Linear"];
    assert_eq!(linear["duration"], "00:00:30.500");
    assert_eq!(linear["skip_offset"], "25%");
    assert_eq!(linear["tracking_events"][0]["event"], "creativeView");

    let back: Vast = serde_json::from_value(json).unwrap();
    assert_eq!(back, vast);
}
