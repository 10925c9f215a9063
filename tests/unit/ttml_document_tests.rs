/*!
 * Tests for TTML document parsing and cue extraction
 */

use ttml2srt::errors::DocumentError;
use ttml2srt::time_resolver::{ClockMode, TimeBase, TimingContext};
use ttml2srt::ttml_document::TtmlDocument;
use crate::common;

/// Test timing metadata is read from the tt root element
#[test]
fn test_parse_withTimingAttributes_shouldReadMetadata() {
    let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<tt xmlns="http://www.w3.org/ns/ttml" xmlns:ttp="http://www.w3.org/ns/ttml#parameter"
    ttp:frameRate="25" ttp:tickRate="10000000" ttp:clockMode="utc" ttp:timeBase="smpte">
  <body><div>
    <p begin="00:00:01:00" end="00:00:02:00">line</p>
  </div></body>
</tt>"#;

    let doc = TtmlDocument::parse(xml).unwrap();
    assert_eq!(doc.frame_rate, Some(25.0));
    assert_eq!(doc.tick_rate, Some(10_000_000));
    assert_eq!(doc.clock_mode, Some(ClockMode::Utc));
    assert_eq!(doc.time_base, Some(TimeBase::Smpte));
}

/// Test documents without timing attributes leave metadata unset
#[test]
fn test_parse_withoutTimingAttributes_shouldLeaveMetadataUnset() {
    let doc = TtmlDocument::parse(common::SAMPLE_FRACTION_TTML).unwrap();
    assert_eq!(doc.frame_rate, None);
    assert_eq!(doc.tick_rate, None);
    assert_eq!(doc.clock_mode, None);
    assert_eq!(doc.time_base, None);
}

/// Test paragraph collection keeps document order and begin/end attributes
#[test]
fn test_parse_withTimedParagraphs_shouldCollectInOrder() {
    let doc = TtmlDocument::parse(common::SAMPLE_FRACTION_TTML).unwrap();

    assert_eq!(doc.paragraphs.len(), 3);
    assert_eq!(doc.paragraphs[0].begin, "00:00:01.000");
    assert_eq!(doc.paragraphs[0].end, "00:00:04.000");
    assert_eq!(doc.paragraphs[0].text.trim(), "This is a test subtitle.");
    assert_eq!(doc.paragraphs[2].begin, "00:00:10.000");
}

/// Test paragraphs without a begin attribute are skipped
#[test]
fn test_parse_withUntimedParagraph_shouldSkipIt() {
    let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<tt xmlns="http://www.w3.org/ns/ttml">
  <body><div>
    <p>style-only paragraph</p>
    <p begin="00:00:01.000" end="00:00:02.000">timed</p>
  </div></body>
</tt>"#;

    let doc = TtmlDocument::parse(xml).unwrap();
    assert_eq!(doc.paragraphs.len(), 1);
    assert_eq!(doc.paragraphs[0].text.trim(), "timed");
}

/// Test br elements fold into line breaks within the dialogue
#[test]
fn test_parse_withBrElements_shouldFoldIntoLineBreaks() {
    let doc = TtmlDocument::parse(common::SAMPLE_FRACTION_TTML).unwrap();
    assert_eq!(doc.paragraphs[1].text.trim(), "It contains\nmultiple entries.");
}

/// Test dialogue text inside nested spans is concatenated
#[test]
fn test_parse_withNestedSpans_shouldConcatenateText() {
    let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<tt xmlns="http://www.w3.org/ns/ttml">
  <body><div>
    <p begin="1.0s" end="2.0s"><span>Nested </span><span>dialogue<br/>here</span></p>
  </div></body>
</tt>"#;

    let doc = TtmlDocument::parse(xml).unwrap();
    assert_eq!(doc.paragraphs[0].text, "Nested dialogue\nhere");
}

/// Test a non-UTF-8 encoding declaration is rejected
#[test]
fn test_parse_withLatinOneEncoding_shouldFailWithUnsupportedEncoding() {
    let xml = r#"<?xml version="1.0" encoding="ISO-8859-1"?>
<tt xmlns="http://www.w3.org/ns/ttml"><body/></tt>"#;

    let result = TtmlDocument::parse(xml);
    assert!(matches!(
        result,
        Err(DocumentError::UnsupportedEncoding(e)) if e == "iso-8859-1"
    ));
}

/// Test a missing encoding declaration is assumed to be UTF-8
#[test]
fn test_parse_withoutEncodingDeclaration_shouldAssumeUtf8() {
    let xml = r#"<tt xmlns="http://www.w3.org/ns/ttml"><body>
      <p begin="1.0s" end="2.0s">ok</p>
    </body></tt>"#;
    assert!(TtmlDocument::parse(xml).is_ok());
}

/// Test a document whose root is not tt is rejected
#[test]
fn test_parse_withWrongRoot_shouldFailWithMissingRoot() {
    let xml = r#"<?xml version="1.0" encoding="utf-8"?><html><body/></html>"#;
    assert!(matches!(
        TtmlDocument::parse(xml),
        Err(DocumentError::MissingRoot)
    ));
}

/// Test malformed XML is rejected
#[test]
fn test_parse_withBrokenXml_shouldFailWithMalformedXml() {
    let xml = "<tt><body><p begin=\"1s\">unclosed";
    assert!(matches!(
        TtmlDocument::parse(xml),
        Err(DocumentError::MalformedXml(_))
    ));
}

/// Test unparseable attribute values are ignored with a fallback
#[test]
fn test_parse_withBadFrameRateValue_shouldIgnoreAttribute() {
    let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<tt xmlns="http://www.w3.org/ns/ttml" xmlns:ttp="http://www.w3.org/ns/ttml#parameter" ttp:frameRate="fast">
  <body><p begin="1.0s" end="2.0s">ok</p></body>
</tt>"#;

    let doc = TtmlDocument::parse(xml).unwrap();
    assert_eq!(doc.frame_rate, None);
}

/// Test document metadata wins over caller defaults in the timing context
#[test]
fn test_timingContext_withDocumentMetadata_shouldOverrideDefaults() {
    let doc = TtmlDocument::parse(common::SAMPLE_FRAME_TTML).unwrap();
    let defaults = TimingContext {
        frame_rate: 23.976,
        shift_ms: 1_500,
        ..TimingContext::default()
    };

    let ctx = doc.timing_context(&defaults);
    assert_eq!(ctx.frame_rate, 25.0);
    assert_eq!(ctx.time_base, TimeBase::Smpte);
    // Caller-side settings pass through untouched
    assert_eq!(ctx.shift_ms, 1_500);
    assert_eq!(ctx.scale, 1.0);
}

/// Test caller defaults fill the gaps the document leaves open
#[test]
fn test_timingContext_withoutDocumentMetadata_shouldUseDefaults() {
    let doc = TtmlDocument::parse(common::SAMPLE_FRACTION_TTML).unwrap();
    let defaults = TimingContext {
        frame_rate: 30.0,
        tick_rate: Some(1_000),
        ..TimingContext::default()
    };

    let ctx = doc.timing_context(&defaults);
    assert_eq!(ctx.frame_rate, 30.0);
    assert_eq!(ctx.tick_rate, Some(1_000));
    assert_eq!(ctx.clock_mode, ClockMode::Local);
    assert_eq!(ctx.time_base, TimeBase::Media);
}
