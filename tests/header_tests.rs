use amplicon_demux::{format_header, Error, HeaderContext, HeaderTemplate};

fn context() -> HeaderContext<'static> {
    HeaderContext {
        sample_id: "HS1",
        index: 42,
        label: None,
        barcode_seq: "ACGTAC",
    }
}

#[test]
fn test_sample_and_index() {
    assert_eq!(format_header("{sampleId}_B_{index}", &context()).unwrap(), "HS1_B_42");
}

#[test]
fn test_all_placeholders() {
    let ctx = HeaderContext {
        label: Some("run7"),
        ..context()
    };
    assert_eq!(
        format_header("{label}.{sampleId}.{barcodeSeq}.{index}", &ctx).unwrap(),
        "run7.HS1.ACGTAC.42"
    );
}

#[test]
fn test_missing_label_renders_empty() {
    assert_eq!(format_header("{sampleId}{label}", &context()).unwrap(), "HS1");
}

#[test]
fn test_escaped_braces() {
    assert_eq!(format_header("{{{sampleId}}}", &context()).unwrap(), "{HS1}");
}

#[test]
fn test_unknown_placeholder_is_error() {
    assert!(matches!(
        HeaderTemplate::parse("{sample}_{index}"),
        Err(Error::InvalidTemplate { .. })
    ));
}

#[test]
fn test_unclosed_placeholder_is_error() {
    assert!(HeaderTemplate::parse("{sampleId").is_err());
    assert!(HeaderTemplate::parse("sampleId}").is_err());
}

#[test]
fn test_rendering_is_deterministic() {
    let template = HeaderTemplate::parse("{sampleId}_{index}").unwrap();
    assert_eq!(template.render(&context()), template.render(&context()));
}
