//! Integration test: structured logging contract
//!
//! Validates that:
//! 1. LogEmitter writes valid JSONL to files.
//! 2. validate_log_file counts lines and reports violations by line number.
//! 3. The ABI layer's fatal record fits the same required-field contract.
//!
//! Run: cargo test -p platshim-harness --test structured_log_test

use std::io::Write;

use platshim_harness::structured_log::{
    LogEmitter, LogEntry, LogLevel, Outcome, validate_log_file, validate_log_line,
};

#[test]
fn emitter_file_output_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.jsonl");

    let mut emitter = LogEmitter::to_file(&path, "it-1").unwrap();
    emitter.emit(LogLevel::Info, "probe_start").unwrap();
    emitter
        .emit_entry(
            LogEntry::new("", LogLevel::Warn, "call")
                .with_symbol("C_fstatat64")
                .with_outcome(Outcome::Fail)
                .with_errno(libc::ENOENT),
        )
        .unwrap();
    emitter.emit(LogLevel::Info, "probe_end").unwrap();
    emitter.flush().unwrap();
    drop(emitter);

    let (lines, errors) = validate_log_file(&path).unwrap();
    assert_eq!(lines, 3);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn file_validation_skips_blank_lines_and_reports_line_numbers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed.jsonl");
    let good = LogEntry::new("platshim::it::001", LogLevel::Info, "ok")
        .to_jsonl()
        .unwrap();

    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "{good}").unwrap();
    writeln!(f).unwrap();
    writeln!(f, r#"{{"timestamp":"t","trace_id":"x::y::1","level":"info"}}"#).unwrap();
    writeln!(f, "not json").unwrap();
    drop(f);

    let (lines, errors) = validate_log_file(&path).unwrap();
    assert_eq!(lines, 3);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].line_number, 3);
    assert_eq!(errors[0].field, "event");
    assert_eq!(errors[1].line_number, 4);
    assert_eq!(errors[1].field, "<json>");
    assert!(errors[1].to_string().starts_with("line 4: field '<json>'"));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(validate_log_file(&dir.path().join("absent.jsonl")).is_err());
}

#[test]
fn pass_outcome_does_not_need_errno() {
    let line = LogEntry::new("platshim::it::002", LogLevel::Info, "call")
        .with_outcome(Outcome::Pass)
        .to_jsonl()
        .unwrap();
    let entry = validate_log_line(&line, 1).unwrap();
    assert_eq!(entry.outcome, Some(Outcome::Pass));
}

#[test]
fn fatal_level_is_part_of_the_vocabulary() {
    let line = serde_json::json!({
        "timestamp": "2026-01-01T00:00:00.000Z",
        "trace_id": "platshim::abort::001",
        "level": "fatal",
        "event": "narrowing_overflow",
        "symbol": "C_futimens64",
    })
    .to_string();
    let entry = validate_log_line(&line, 1).unwrap();
    assert_eq!(entry.level, LogLevel::Fatal);
    assert_eq!(entry.symbol.as_deref(), Some("C_futimens64"));
}
