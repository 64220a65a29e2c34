use amplicon_demux::{
    parse_line, render_csv, Aggregator, ClassificationParser, ClassificationRecord, Error,
    UNCLASSIFIED,
};

#[test]
fn test_parse_hit() {
    let line = "H\t0\t250\t99.2\t+\t0\t0\t250M\tsample1.fasta blah blah\tclusterA";
    assert_eq!(parse_line(line).unwrap(), ClassificationRecord::new("sample1", "clusterA"));
}

#[test]
fn test_parse_non_hit_is_unclassified() {
    let line = "N\t*\t*\t*\t*\t*\t*\t*\tsample1.fasta blah blah\tclusterA";
    assert_eq!(parse_line(line).unwrap(), ClassificationRecord::new("sample1", UNCLASSIFIED));

    // 非 hit 行可以没有第 10 列
    let short = "N\t*\t*\t*\t*\t*\t*\t*\tsample2_17 orig";
    assert_eq!(parse_line(short).unwrap(), ClassificationRecord::new("sample2_17", UNCLASSIFIED));
}

#[test]
fn test_nine_field_lines() {
    // 只有 9 列: label 落在第 7 列, cluster 落在第 8 列
    let hit = "H\t1\t250\t99.2\t+\t0\t0\tsample1.fasta blah blah\tclusterA";
    assert!(matches!(parse_line(hit), Err(Error::Format { .. })));

    // 非 hit 行照常解析, 第 8 列被当作 query label
    let non_hit = "N\t*\t*\t*\t*\t*\t*\tsample1.fasta blah blah\tclusterA";
    assert_eq!(parse_line(non_hit).unwrap(), ClassificationRecord::new("clusterA", UNCLASSIFIED));
}

#[test]
fn test_parse_too_few_fields() {
    assert!(matches!(parse_line("H\tx\tx"), Err(Error::Format { .. })));
}

#[test]
fn test_parser_reports_line_number() {
    let mut parser = ClassificationParser::new("otus.uc");
    assert!(parser.parse("").unwrap().is_none());
    match parser.parse("H\tx") {
        Err(Error::Format { location, .. }) => {
            assert_eq!(location.source, "otus.uc");
            assert_eq!(location.line, 2);
        }
        other => panic!("expected Format error, got {other:?}"),
    }
}

#[test]
fn test_csv_sorted_and_dense() {
    let mut aggregator = Aggregator::new();
    aggregator.add(ClassificationRecord::new("s1", "c1"));
    aggregator.add(ClassificationRecord::new("s1", "c1"));
    aggregator.add(ClassificationRecord::new("s2", "c2"));
    assert_eq!(render_csv(aggregator.snapshot()).unwrap(), "c1,c2\ns1,2,0\ns2,0,1\n");
}

#[test]
fn test_csv_orders_labels_lexicographically() {
    let mut aggregator = Aggregator::new();
    for (sample, cluster) in [("b", "z"), ("a", UNCLASSIFIED), ("b", "m"), ("a", "z")] {
        aggregator.add(ClassificationRecord::new(sample, cluster));
    }
    assert_eq!(aggregator.records(), 4);
    assert_eq!(
        render_csv(aggregator.snapshot()).unwrap(),
        "m,unclassified_reads,z\na,0,1,1\nb,1,0,1\n"
    );
}

#[test]
fn test_csv_empty_matrix() {
    assert_eq!(render_csv(Aggregator::new().snapshot()).unwrap(), "\n");
}

#[test]
fn test_csv_quotes_labels_with_commas() {
    let mut aggregator = Aggregator::new();
    aggregator.add(ClassificationRecord::new("s1", "otu1;tax=k:Bacteria,p:Firmicutes"));
    aggregator.add(ClassificationRecord::new("s1", "otu2"));
    assert_eq!(
        render_csv(aggregator.snapshot()).unwrap(),
        "\"otu1;tax=k:Bacteria,p:Firmicutes\",otu2\ns1,1,1\n"
    );
}
