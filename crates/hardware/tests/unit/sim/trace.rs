//! # Trace Parsing Tests

use std::io::Write;

use rstest::rstest;
use vmsim_core::Simulator;
use vmsim_core::common::{AccessType, TraceError};
use vmsim_core::config::Config;
use vmsim_core::sim::trace::{self, TraceOp, TraceReader, parse_line};

// ══════════════════════════════════════════════════════════
// 1. Single Lines
// ══════════════════════════════════════════════════════════

#[rstest]
#[case::upper_read("R 1f00", TraceOp::read(0x1F00))]
#[case::upper_write("W 7fff0010", TraceOp::write(0x7FFF_0010))]
#[case::lower_case("w abc", TraceOp::write(0xABC))]
#[case::prefixed("R 0x2000", TraceOp::read(0x2000))]
#[case::padded("  W   0X10  \n", TraceOp::write(0x10))]
#[case::wide_address("R ffffffffffffffff", TraceOp::read(u64::MAX))]
fn parses_valid_lines(#[case] line: &str, #[case] expected: TraceOp) {
    assert_eq!(parse_line(line, 1).unwrap(), Some(expected));
}

#[rstest]
#[case::blank("")]
#[case::whitespace("   \t")]
#[case::comment("# warm-up phase")]
fn skips_blank_and_comment_lines(#[case] line: &str) {
    assert_eq!(parse_line(line, 1).unwrap(), None);
}

#[test]
fn unknown_operation_reports_line() {
    let err = parse_line("X 10", 4).unwrap_err();
    assert!(matches!(err, TraceError::UnknownOperation { line: 4, ref op } if op == "X"));
}

#[rstest]
#[case::missing_address("R")]
#[case::extra_field("R 10 20")]
fn malformed_lines(#[case] line: &str) {
    let err = parse_line(line, 2).unwrap_err();
    assert!(matches!(err, TraceError::Malformed { line: 2, .. }));
}

#[rstest]
#[case::not_hex("R 12zz")]
#[case::too_wide("W 1ffffffffffffffff")]
#[case::bare_prefix("R 0x")]
fn bad_addresses(#[case] line: &str) {
    let err = parse_line(line, 9).unwrap_err();
    assert!(matches!(err, TraceError::BadAddress { line: 9, .. }));
}

#[test]
fn from_str_parses_one_operation() {
    let op: TraceOp = "W 40".parse().unwrap();
    assert_eq!(op.op, AccessType::Write);
    assert_eq!(op.addr.val(), 0x40);
    assert!("".parse::<TraceOp>().is_err());
}

#[test]
fn error_messages_carry_line_numbers() {
    let err = parse_line("Q 1", 12).unwrap_err();
    assert!(err.to_string().contains("12"));
}

// ══════════════════════════════════════════════════════════
// 2. Streams
// ══════════════════════════════════════════════════════════

#[test]
fn reader_skips_noise_and_counts_lines() {
    let text = "# header\nR 0\n\nW 1000\n";
    let mut reader = TraceReader::new(text.as_bytes());
    assert_eq!(reader.next().unwrap().unwrap(), TraceOp::read(0));
    assert_eq!(reader.next().unwrap().unwrap(), TraceOp::write(0x1000));
    assert!(reader.next().is_none());
    assert_eq!(reader.lines_read(), 4);
}

#[test]
fn parse_str_stops_at_first_error() {
    let err = trace::parse_str("R 0\nR 1\nZ 2\nR 3\n").unwrap_err();
    assert!(matches!(err, TraceError::UnknownOperation { line: 3, .. }));
}

#[test]
fn open_streams_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "R 0").unwrap();
    writeln!(file, "R 0").unwrap();
    writeln!(file, "W 5000").unwrap();
    file.flush().unwrap();

    let ops: Vec<TraceOp> = trace::open(file.path())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        ops,
        vec![TraceOp::read(0), TraceOp::read(0), TraceOp::write(0x5000)]
    );
}

#[test]
fn open_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = trace::open(dir.path().join("absent.trace")).unwrap_err();
    assert!(matches!(err, TraceError::Io(_)));
}

#[test]
fn run_trace_keeps_work_done_before_an_error() {
    let mut sim = Simulator::new(&Config::default()).unwrap();
    let reader = TraceReader::new("R 0\nW 1000\nbogus line here\nR 2000\n".as_bytes());
    let err = sim.run_trace(reader).unwrap_err();
    assert!(matches!(err, TraceError::Malformed { line: 3, .. }));
    assert_eq!(sim.instructions(), 2);
    assert_eq!(sim.page_faults(), 2);
}
