#[cfg(test)]
mod tests {
    use crate::args::RecordPolicy;
    use crate::classifier::{Classification, FlowClassifier};
    use crate::error::FlowTagError;
    use crate::protocols::ProtocolNameResolver;
    use crate::report::render_report;
    use crate::tag_table::{PortProtocol, TagLookupTable, UNTAGGED};
    use std::io;

    const PROTOCOLS: &str = "\
Decimal,Keyword,Protocol,IPv6 Extension Header,Reference
1,ICMP,Internet Control Message,,[RFC792]
6,TCP,Transmission Control,,[RFC9293]
17,UDP,User Datagram,,[RFC768]
146-252,,Unassigned,,[Internet_Assigned_Numbers_Authority]
";

    const TAGS: &str = "\
dstport,protocol,tag
80,tcp,web
53,udp,dns
";

    fn flow_line(dst_port: &str, protocol: &str) -> String {
        format!(
            "2 123456789012 eni-0a1b2c3d 10.0.1.201 198.51.100.2 49153 {} {} 25 20000 1620140761 1620140821 ACCEPT OK",
            dst_port, protocol
        )
    }

    fn flow_log(pairs: &[(&str, &str)]) -> String {
        pairs
            .iter()
            .map(|(port, protocol)| flow_line(port, protocol) + "\n")
            .collect()
    }

    fn setup_tables() -> (ProtocolNameResolver, TagLookupTable) {
        (
            ProtocolNameResolver::from_reader(PROTOCOLS.as_bytes()).unwrap(),
            TagLookupTable::from_reader(TAGS.as_bytes()).unwrap(),
        )
    }

    fn classify(log: &str, policy: RecordPolicy) -> Result<Classification, FlowTagError> {
        let (protocols, tags) = setup_tables();
        FlowClassifier::new(&protocols, &tags, policy).classify(log.as_bytes())
    }

    #[test]
    fn test_end_to_end_counts() {
        let log = flow_log(&[("80", "6"), ("80", "6"), ("53", "17"), ("443", "6")]);
        let result = classify(&log, RecordPolicy::Strict).unwrap();

        assert_eq!(result.records, 4);
        assert_eq!(result.skipped, 0);
        assert_eq!(result.tag_counts.len(), 3);
        assert_eq!(result.tag_counts["web"], 2);
        assert_eq!(result.tag_counts["dns"], 1);
        assert_eq!(result.tag_counts[UNTAGGED], 1);

        assert_eq!(result.port_protocol_counts.len(), 3);
        assert_eq!(result.port_protocol_counts[&PortProtocol::new("80", "tcp")], 2);
        assert_eq!(result.port_protocol_counts[&PortProtocol::new("53", "udp")], 1);
        assert_eq!(result.port_protocol_counts[&PortProtocol::new("443", "tcp")], 1);
    }

    #[test]
    fn test_totals_match_record_count() {
        let log = flow_log(&[
            ("80", "6"),
            ("53", "17"),
            ("53", "6"),
            ("0", "1"),
            ("8080", "200"),
            ("80", "6"),
        ]);
        let result = classify(&log, RecordPolicy::Strict).unwrap();

        assert_eq!(result.records, 6);
        assert_eq!(result.tag_total(), 6);
        assert_eq!(result.port_protocol_total(), 6);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let log = flow_log(&[("80", "6"), ("53", "17"), ("22", "6")]);
        let (protocols, tags) = setup_tables();
        let classifier = FlowClassifier::new(&protocols, &tags, RecordPolicy::Strict);

        let first = classifier.classify(log.as_bytes()).unwrap();
        let second = classifier.classify(log.as_bytes()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_lookup_protocol_is_case_insensitive() {
        let protocols = ProtocolNameResolver::from_reader(PROTOCOLS.as_bytes()).unwrap();
        let tags =
            TagLookupTable::from_reader("dstport,protocol,tag\n 443 , TCP , secure \n".as_bytes())
                .unwrap();
        let log = flow_log(&[("443", " 6 ")]);

        let result = FlowClassifier::new(&protocols, &tags, RecordPolicy::Strict)
            .classify(log.as_bytes())
            .unwrap();
        assert_eq!(result.tag_counts["secure"], 1);
        assert!(!result.tag_counts.contains_key(UNTAGGED));
    }

    #[test]
    fn test_unassigned_protocol_joins_on_name() {
        let protocols = ProtocolNameResolver::from_reader(PROTOCOLS.as_bytes()).unwrap();
        let tags =
            TagLookupTable::from_reader("dstport,protocol,tag\n9,Unassigned,odd\n".as_bytes())
                .unwrap();
        let log = flow_log(&[("9", "146-252")]);

        let result = FlowClassifier::new(&protocols, &tags, RecordPolicy::Strict)
            .classify(log.as_bytes())
            .unwrap();
        assert_eq!(result.tag_counts["odd"], 1);
        assert_eq!(
            result.port_protocol_counts[&PortProtocol::new("9", "unassigned")],
            1
        );
    }

    #[test]
    fn test_unmatched_record_counts_both_tables() {
        let result = classify(&flow_log(&[("53", "6")]), RecordPolicy::Strict).unwrap();
        assert_eq!(result.tag_counts[UNTAGGED], 1);
        assert_eq!(result.port_protocol_counts[&PortProtocol::new("53", "tcp")], 1);
    }

    #[test]
    fn test_tags_are_not_preseeded() {
        let result = classify(&flow_log(&[("80", "6")]), RecordPolicy::Strict).unwrap();
        assert_eq!(result.tag_counts.len(), 1);
        assert!(!result.tag_counts.contains_key("dns"));
    }

    #[test]
    fn test_empty_flow_log() {
        let result = classify("", RecordPolicy::Strict).unwrap();
        assert_eq!(result, Classification::default());
    }

    #[test]
    fn test_strict_unknown_protocol_aborts() {
        let log = flow_log(&[("80", "6"), ("80", "99"), ("53", "17")]);
        match classify(&log, RecordPolicy::Strict) {
            Err(FlowTagError::UnknownProtocolNumber {
                line,
                protocol_number,
            }) => {
                assert_eq!(line, Some(2));
                assert_eq!(protocol_number, "99");
            }
            other => panic!("expected unknown protocol, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_malformed_record_aborts() {
        let log = format!("{}\nshort line\n", flow_line("80", "6"));
        assert!(matches!(
            classify(&log, RecordPolicy::Strict),
            Err(FlowTagError::MalformedFlowRecord { line: 2, fields: 2 })
        ));
    }

    #[test]
    fn test_lenient_skips_bad_records() {
        let log = format!(
            "{}\nshort line\n{}\n\n{}\n",
            flow_line("80", "6"),
            flow_line("80", "99"),
            flow_line("53", "17")
        );
        let result = classify(&log, RecordPolicy::Lenient).unwrap();

        assert_eq!(result.records, 2);
        assert_eq!(result.skipped, 3);
        assert_eq!(result.tag_total(), 2);
        assert_eq!(result.port_protocol_total(), 2);
        assert_eq!(result.tag_counts["web"], 1);
        assert_eq!(result.tag_counts["dns"], 1);
    }

    #[test]
    fn test_read_error_aborts_even_when_lenient() {
        let (protocols, tags) = setup_tables();
        let lines = vec![
            Ok(flow_line("80", "6")),
            Err(io::Error::new(io::ErrorKind::InvalidData, "bad bytes")),
            Ok(flow_line("53", "17")),
        ];

        let result =
            FlowClassifier::new(&protocols, &tags, RecordPolicy::Lenient).classify_lines(lines);
        assert!(matches!(result, Err(FlowTagError::Read(_))));
    }

    #[test]
    fn test_report_from_classification() {
        let log = flow_log(&[("80", "6"), ("80", "6"), ("53", "17"), ("443", "6")]);
        let result = classify(&log, RecordPolicy::Strict).unwrap();

        let report = render_report(&result);
        let tag_rows: Vec<&str> = report.lines().skip(2).take(3).collect();
        assert_eq!(tag_rows, vec!["Untagged,1", "dns,1", "web,2"]);
        assert!(report.ends_with("Port,Protocol,Count\n443,tcp,1\n53,udp,1\n80,tcp,2\n"));
    }
}
