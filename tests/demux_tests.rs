use std::io::Cursor;

use amplicon_demux::{
    BarcodeTable, BarcodeTransform, Demultiplexer, Error, FastqSource, HeaderTemplate,
    MatchResult, Normalization, ReadRecord, Relabel, VecSource,
};

fn table(text: &str, normalization: Normalization) -> BarcodeTable {
    BarcodeTable::load(Cursor::new(text), "barcodes.csv", normalization).unwrap()
}

fn reads(name: &str, seqs: &[&str]) -> VecSource {
    let records = seqs
        .iter()
        .enumerate()
        .map(|(i, seq)| {
            ReadRecord::new(
                format!("r{i}"),
                "desc",
                *seq,
                Some("I".repeat(seq.len())),
            )
        })
        .collect();
    VecSource::new(records, name)
}

#[test]
fn test_matches_and_counts() {
    let table = table("s1,ACGT\ns2,GGCC\n", Normalization::default());
    let mut demux = Demultiplexer::new(
        reads("left", &["AAAA", "CCCC", "GGGG"]),
        reads("barcode", &["ACGTTT", "TTTTTT", "GGCCAA"]),
        reads("right", &["TTTT", "GGGG", "CCCC"]),
        &table,
        BarcodeTransform::Identity,
    );

    let first = demux.next_triplet().unwrap().unwrap();
    assert_eq!(
        first.result,
        MatchResult::Matched {
            sample_id: "s1".to_string(),
            barcode_seq: "ACGT".to_string(),
            index: 0,
        }
    );
    let second = demux.next_triplet().unwrap().unwrap();
    assert_eq!(second.result, MatchResult::Unmatched);
    let third = demux.next_triplet().unwrap().unwrap();
    assert!(matches!(third.result, MatchResult::Matched { index: 1, .. }));

    assert!(demux.next_triplet().unwrap().is_none());
    assert_eq!(demux.stats().matched, 2);
    assert_eq!(demux.stats().skipped, 1);
}

#[test]
fn test_equal_streams_yield_exactly_len_triplets() {
    let table = table("s1,ACGT\n", Normalization::default());
    let demux = Demultiplexer::new(
        reads("left", &["A"; 5]),
        reads("barcode", &["ACGT"; 5]),
        reads("right", &["T"; 5]),
        &table,
        BarcodeTransform::Identity,
    );
    let results: Vec<_> = demux.collect::<Result<_, _>>().unwrap();
    assert_eq!(results.len(), 5);
}

#[test]
fn test_unequal_streams_fail() {
    let table = table("s1,ACGT\n", Normalization::default());
    let mut demux = Demultiplexer::new(
        reads("left", &["A", "A", "A"]),
        reads("barcode", &["ACGT", "ACGT"]),
        reads("right", &["T", "T", "T"]),
        &table,
        BarcodeTransform::Identity,
    );
    assert!(demux.next_triplet().unwrap().is_some());
    assert!(demux.next_triplet().unwrap().is_some());
    match demux.next_triplet() {
        Err(Error::StreamLengthMismatch {
            record,
            exhausted,
            remaining,
        }) => {
            assert_eq!(record, 2);
            assert_eq!(exhausted, "barcode");
            assert_eq!(remaining, "left, right");
        }
        other => panic!("expected StreamLengthMismatch, got {other:?}"),
    }
}

#[test]
fn test_transform_applies_after_truncation() {
    // 最长 barcode 为 6，read 先截断到 6，再取前 4
    let table = table("s1,ACGT\ns2,TTTTTT\n", Normalization::default());
    let mut demux = Demultiplexer::new(
        reads("left", &["A"]),
        reads("barcode", &["ACGTGGCCAA"]),
        reads("right", &["T"]),
        &table,
        BarcodeTransform::Truncate(4),
    );
    assert_eq!(demux.barcode_key("ACGTGGCCAA"), "ACGT");
    let pair = demux.next_triplet().unwrap().unwrap();
    assert!(pair.result.is_matched());
}

#[test]
fn test_read_side_is_not_reverse_complemented() {
    let table = table("s1,AACG\n", Normalization::new(true, true));
    let mut demux = Demultiplexer::new(
        reads("left", &["A", "A"]),
        reads("barcode", &["AACG", "CGTT"]),
        reads("right", &["T", "T"]),
        &table,
        BarcodeTransform::Identity,
    );
    assert_eq!(demux.next_triplet().unwrap().unwrap().result, MatchResult::Unmatched);
    assert!(demux.next_triplet().unwrap().unwrap().result.is_matched());
}

#[test]
fn test_matched_pairs_are_relabeled() {
    let table = table("HS1,ACGT\n", Normalization::default());
    let template = HeaderTemplate::parse("{sampleId}_B_{index}").unwrap();
    let mut demux = Demultiplexer::new(
        reads("left", &["AAAA", "CCCC"]),
        reads("barcode", &["ACGT", "GGGG"]),
        reads("right", &["TTTT", "GGGG"]),
        &table,
        BarcodeTransform::Identity,
    )
    .with_relabel(Relabel::new(template, None));

    let matched = demux.next_triplet().unwrap().unwrap();
    assert_eq!(matched.left.id, "HS1_B_0");
    assert_eq!(matched.left.description, "r0:desc");
    assert_eq!(matched.right.id, "HS1_B_0");

    let unmatched = demux.next_triplet().unwrap().unwrap();
    assert_eq!(unmatched.left.id, "r1");
    assert_eq!(unmatched.left.description, "desc");
}

#[test]
fn test_fastq_sources_in_lockstep() {
    let table = table("s1,ACG\n", Normalization::default());
    let left = FastqSource::new(Cursor::new(b"@a1 x\nAAAA\n+\nIIII\n@a2\nCCCC\n+\nIIII\n".to_vec()), "left");
    let bc = FastqSource::new(Cursor::new(b"@a1\nACGA\n+\nIIII\n@a2\nTTTT\n+\nIIII\n".to_vec()), "barcode");
    let right = FastqSource::new(Cursor::new(b"@a1\nGGGG\n+\nIIII\n@a2\nTTTT\n+\nIIII\n".to_vec()), "right");

    let mut demux = Demultiplexer::new(left, bc, right, &table, BarcodeTransform::Identity);
    let first = demux.next_triplet().unwrap().unwrap();
    assert_eq!(first.left.id, "a1");
    assert_eq!(first.left.description, "x");
    assert!(first.result.is_matched());
    assert_eq!(demux.next_triplet().unwrap().unwrap().result, MatchResult::Unmatched);
    assert!(demux.next_triplet().unwrap().is_none());
}

#[test]
fn test_malformed_fastq_record_is_fatal() {
    let table = table("s1,ACG\n", Normalization::default());
    let left = FastqSource::new(Cursor::new(b"@a1\nAAAA\n+\nIIII\n".to_vec()), "left");
    let bc = FastqSource::new(Cursor::new(b"a1 no at sign\nACGA\n+\nIIII\n".to_vec()), "barcode");
    let right = FastqSource::new(Cursor::new(b"@a1\nGGGG\n+\nIIII\n".to_vec()), "right");

    let mut demux = Demultiplexer::new(left, bc, right, &table, BarcodeTransform::Identity);
    assert!(demux.next_triplet().is_err());
}
