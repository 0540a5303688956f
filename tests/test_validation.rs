
use fixtures::*;
use pretty_assertions::assert_eq;
use vast_codec::*;

fn error_location(err: &VastError) -> String {
    err.location().map(|l| l.to_string()).unwrap_or_default()
}

#[test]
fn test_ad_with_both_payloads_is_malformed() {
    ensure_env_logger_initialized();
    let xml = r#"<VAST version="4.2"><Ad id="1">
        <InLine><AdSystem>a</AdSystem><AdTitle>t</AdTitle></InLine>
        <Wrapper><VASTAdTagURI>https://example.com</VASTAdTagURI></Wrapper>
    </Ad></VAST>"#;

    let err = decode(xml.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedAd);
    assert_eq!(error_location(&err), "VAST[0]/Ad[0]");

    // permissive mode never picks one payload over the other
    let err = decode_with(xml.as_bytes(), &CodecSettings::new().permissive(true)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedAd);
}

#[test]
fn test_ad_with_neither_payload_is_malformed() {
    ensure_env_logger_initialized();
    let err = decode(br#"<VAST version="4.2"><Ad id="1"/><Ad id="2"></Ad></VAST>"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedAd);
}

#[test]
fn test_malformed_xml_reports_position() {
    ensure_env_logger_initialized();
    let err = decode(b"<VAST version=\"4.2\"><Ad><InLine></Ad></VAST>").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedXml);
    match err {
        VastError::MalformedXml { position, .. } => assert!(position > 0),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_deeply_nested_extension_is_malformed() {
    ensure_env_logger_initialized();
    let depth = 5_000;
    let xml = format!(
        r#"<VAST version="4.2"><Ad><InLine><AdSystem>a</AdSystem><AdTitle>t</AdTitle>
        <Extensions><Extension type="x">{}{}</Extension></Extensions></InLine></Ad></VAST>"#,
        "<a>".repeat(depth),
        "</a>".repeat(depth)
    );

    let err = decode(xml.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedXml);
    assert!(error_location(&err).starts_with("VAST[0]/Ad[0]/InLine[0]/Extensions[0]/Extension[0]/a[0]/a[0]"));

    // a tighter limit rejects ordinary documents too
    let err = decode_with(INLINE_LINEAR.as_bytes(), &CodecSettings::new().max_depth(4)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedXml);
}

#[test]
fn test_invalid_duration_is_located() {
    ensure_env_logger_initialized();
    let xml = r#"<VAST version="4.2"><Ad><InLine><AdSystem>a</AdSystem><AdTitle>t</AdTitle><Creatives>
            <Creative/>
            <Creative><Linear><Duration>30</Duration></Linear></Creative>
        </Creatives></InLine></Ad></VAST>"#;
    let err = decode(xml.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    assert_eq!(
        error_location(&err),
        "VAST[0]/Ad[0]/InLine[0]/Creatives[0]/Creative[1]/Linear[0]/Duration[0]"
    );
}

#[test]
fn test_invalid_offset_is_located() {
    ensure_env_logger_initialized();
    let xml = with_creative(
        r#"<Linear><TrackingEvents>
            <Tracking event="progress" offset="50"><![CDATA[https://t]]></Tracking>
        </TrackingEvents></Linear>"#,
    );
    let err = decode(xml.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    assert!(error_location(&err).ends_with("TrackingEvents[0]/Tracking[0]/@offset"));
}

#[test]
fn test_overflowing_skip_offset_is_invalid() {
    ensure_env_logger_initialized();
    let xml = with_creative(&format!(
        r#"<Linear skipoffset="{}%"><Duration>00:00:10</Duration></Linear>"#,
        "9".repeat(400)
    ));
    let err = decode(xml.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    assert!(error_location(&err).ends_with("Linear[0]/@skipoffset"));
}

#[test]
fn test_invalid_boolean_is_located() {
    ensure_env_logger_initialized();
    let xml = r#"<VAST version="4.2"><Ad><Wrapper followAdditionalWrappers="yes">
        <VASTAdTagURI>https://example.com</VASTAdTagURI>
    </Wrapper></Ad></VAST>"#;
    let err = decode(xml.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    assert_eq!(error_location(&err), "VAST[0]/Ad[0]/Wrapper[0]/@followAdditionalWrappers");
}

#[test]
fn test_progress_without_offset() {
    ensure_env_logger_initialized();
    let xml = with_creative(
        r#"<Linear><TrackingEvents>
            <Tracking event="start"><![CDATA[https://t/start]]></Tracking>
            <Tracking event="progress"><![CDATA[https://t/progress]]></Tracking>
        </TrackingEvents></Linear>"#,
    );

    let err = decode(xml.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingOffset);
    assert!(error_location(&err).ends_with("Linear[0]/TrackingEvents[0]/Tracking[1]"));

    let decoded = decode_with(xml.as_bytes(), &CodecSettings::new().permissive(true)).unwrap();
    assert_eq!(decoded.warnings.len(), 1);
    assert_eq!(decoded.warnings[0].kind, ErrorKind::MissingOffset);
    assert_eq!(decoded.warnings[0].severity, Severity::Warning);

    // a document is never encoded in a state it could not be strictly decoded from
    let err = encode_with(&decoded.vast, &CodecSettings::new().permissive(true)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingOffset);
}

#[test]
fn test_start_without_offset_is_valid() {
    ensure_env_logger_initialized();
    let mut vast = Vast::new("4.2");
    vast.ads.push(Ad::inline(InLine {
        creatives: vec![Creative {
            content: Some(CreativeContent::Linear(Linear {
                tracking_events: Some(vec![Tracking::new(TrackingEvent::Start, "https://t")]),
                ..Default::default()
            })),
            ..Default::default()
        }],
        ..Default::default()
    }));
    assert!(validate(&vast).is_empty());
    assert!(encode(&vast).is_ok());
}

#[test]
fn test_invalid_pricing_model() {
    ensure_env_logger_initialized();
    let xml = r#"<VAST version="4.2"><Ad><InLine><AdSystem>a</AdSystem><AdTitle>t</AdTitle>
        <Pricing model="flat" currency="USD"><![CDATA[1.00]]></Pricing>
    </InLine></Ad></VAST>"#;

    let err = decode(xml.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPricingModel);
    assert_eq!(error_location(&err), "VAST[0]/Ad[0]/InLine[0]/Pricing[0]/@model");

    let decoded = decode_with(xml.as_bytes(), &CodecSettings::new().permissive(true)).unwrap();
    assert_eq!(decoded.warnings[0].kind, ErrorKind::InvalidPricingModel);
    assert_eq!(decoded.vast.ads[0].as_inline().unwrap().pricing.as_ref().unwrap().model, "flat");
}

#[test]
fn test_missing_authority_is_advisory() {
    ensure_env_logger_initialized();
    let xml = r#"<VAST version="4.2"><Ad><InLine><AdSystem>a</AdSystem><AdTitle>t</AdTitle>
        <Category>IAB1-1</Category>
    </InLine></Ad></VAST>"#;

    let decoded = decode_with(xml.as_bytes(), &CodecSettings::default()).unwrap();
    assert_eq!(decoded.warnings.len(), 1);
    assert_eq!(decoded.warnings[0].kind, ErrorKind::MissingAuthority);
    assert_eq!(
        decoded.warnings[0].location.as_ref().map(|l| l.to_string()).as_deref(),
        Some("VAST[0]/Ad[0]/InLine[0]/Category[0]")
    );

    // the plain entry points log the warning and keep going
    assert!(decode(xml.as_bytes()).is_ok());
    assert!(encode(&decoded.vast).is_ok());

    let strict = CodecSettings::new().advisory_severity(Severity::Error);
    let err = decode_with(xml.as_bytes(), &strict).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingAuthority);
}

#[test]
fn test_unknown_elements_policy() {
    ensure_env_logger_initialized();
    let xml = with_creative("<Linear><Duration>00:00:05</Duration><Vendor:Thing>1</Vendor:Thing></Linear>");

    let vast = decode(xml.as_bytes()).unwrap();
    assert!(vast.ads[0].as_inline().unwrap().creatives[0].linear().is_some());

    let reject = CodecSettings::new().unknown_elements(UnknownElements::Reject);
    let err = decode_with(xml.as_bytes(), &reject).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedElement);
    assert!(error_location(&err).ends_with("Linear[0]/Vendor:Thing[0]"));
}

#[test]
fn test_two_creative_payloads_are_rejected() {
    ensure_env_logger_initialized();
    let xml = with_creative("<Linear/><CompanionAds/>");
    let err = decode(xml.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedElement);
}

#[test]
fn test_issues_serialize_for_reporting() {
    ensure_env_logger_initialized();
    let xml = r#"<VAST version="4.2"><Ad><Wrapper>
        <VASTAdTagURI>https://example.com</VASTAdTagURI>
        <BlockedAdCategories>IAB25</BlockedAdCategories>
    </Wrapper></Ad></VAST>"#;
    let decoded = decode_with(xml.as_bytes(), &CodecSettings::default()).unwrap();

    let json = serde_json::to_value(&decoded.warnings).unwrap();
    assert_eq!(json[0]["kind"], "MissingAuthority");
    assert_eq!(json[0]["severity"], "Warning");
}
