use amplicon_demux::BarcodeTransform;

#[test]
fn test_parse_rules() {
    assert_eq!("identity".parse::<BarcodeTransform>().unwrap(), BarcodeTransform::Identity);
    assert_eq!("truncate:7".parse::<BarcodeTransform>().unwrap(), BarcodeTransform::Truncate(7));
    assert_eq!(
        "slice:2:9".parse::<BarcodeTransform>().unwrap(),
        BarcodeTransform::Slice { start: 2, end: 9 }
    );
}

#[test]
fn test_reject_unknown_and_bad_numbers() {
    assert!("lambda x: x[:7]".parse::<BarcodeTransform>().is_err());
    assert!("truncate:seven".parse::<BarcodeTransform>().is_err());
    assert!("slice:9:2".parse::<BarcodeTransform>().is_err());
}

#[test]
fn test_apply() {
    // 去掉 barcode read 多余的碱基
    assert_eq!(BarcodeTransform::Truncate(7).apply("ACGTACGTAA"), "ACGTACG");
    assert_eq!(BarcodeTransform::Truncate(7).apply("ACG"), "ACG");
    assert_eq!(BarcodeTransform::Slice { start: 2, end: 5 }.apply("ACGTACG"), "GTA");
    assert_eq!(BarcodeTransform::Slice { start: 5, end: 9 }.apply("ACGTAC"), "C");
    assert_eq!(BarcodeTransform::Identity.apply("ACGT"), "ACGT");
}

#[test]
fn test_inverted_slice_is_empty() {
    // 直接构造, 绕过 FromStr 的检查
    assert_eq!(BarcodeTransform::Slice { start: 5, end: 2 }.apply("ACGTACGT"), "");
}

#[test]
fn test_display_round_trips_through_parse() {
    for rule in ["identity", "truncate:4", "slice:1:6"] {
        let parsed: BarcodeTransform = rule.parse().unwrap();
        assert_eq!(parsed.to_string(), rule);
    }
}
