#![allow(clippy::missing_panics_doc, clippy::float_cmp)]
//! Integration tests for converting TopPIC result files
use std::sync::atomic::AtomicBool;

use mzsynopsis::prelude::*;

fn toppic_file(rows: &[[&str; 25]], header: bool) -> String {
    let mut text = String::new();
    if header {
        text.push_str(&TopPIC::DEFAULT_COLUMNS.join("\t"));
        text.push('\n');
    }
    for row in rows {
        text.push_str(&row.join("\t"));
        text.push('\n');
    }
    text
}

const ROWS: [[&str; 25]; 3] = [
    [
        "run.msalign", "0", "10", "HCD", "200", "50", "3", "737.3235", "737.3232", "1", "1e5",
        "sp|A|PROTA", "Protein A", "2", "7", "M.(S)[Acetyl]ADEFK.-", "0", "-", "1", "20", "18",
        "1e-10", "1e-8", "0", "0",
    ],
    [
        "run.msalign", "1", "11", "HCD", "201 202", "40", "2", "799.3605", "", "2", "1e5",
        "DECOY_B", "Protein B", "10", "16", "K.PEPTIDE.R", "0", "-", "0", "15", "14", "1e-5",
        "1e-3", "0.5", "0.5",
    ],
    [
        "run.msalign", "2", "12", "HCD", "203", "30", "2", "799.3605", "", "3", "1e5",
        "sp|C|PROTC", "Protein C", "10", "16", "K.PEPTIDE.R", "0", "-", "0", "5", "5", "0.5",
        "Infinity", "Infinity", "Infinity",
    ],
];

#[test]
fn headerless_pipeline() {
    let parameters = SynopsisParameters::default();
    let processed = process_reader::<TopPIC>(
        toppic_file(&ROWS, false).as_bytes(),
        &parameters,
        &AtomicBool::new(false),
    )
    .unwrap();
    assert_eq!(processed.lines_read, 3);
    assert_eq!(processed.lines_skipped, 0);
    let entries = &processed.synopsis.entries;
    assert_eq!(entries.len(), 2, "the row with a P-value of 0.5 is filtered out");

    let first = &entries[0].ranked.result;
    assert_eq!(first.scan, 200);
    assert_eq!(first.clean_sequence, "SADEFK");
    assert_eq!(first.modification_description, "Acetyl:1");
    assert!((first.computed_mass - 737.323).abs() < 1e-2);
    assert!(first.warnings.is_empty());

    let second = &entries[1].ranked.result;
    assert_eq!(second.scan, 201);
    assert_eq!(second.protein, "DECOY_B");
    assert_eq!(entries[1].ranked.fdr, 1.0);
    assert_eq!(entries[0].ranked.q_value, 0.0);
    assert_eq!(entries[1].ranked.q_value, 1.0);

    let acetyl = processed
        .synopsis
        .modifications
        .iter()
        .find(|m| m.mass_correction_tag == "Acetyl")
        .unwrap();
    assert_eq!(acetyl.occurrence_count, 1);
    assert_eq!(acetyl.kind, 'D');
}

#[test]
fn with_header_and_threshold() {
    let parameters = SynopsisParameters::from_json(r#"{"significance_threshold": 1.0}"#).unwrap();
    let processed = process_reader::<TopPIC>(
        toppic_file(&ROWS, true).as_bytes(),
        &parameters,
        &AtomicBool::new(false),
    )
    .unwrap();
    let entries = &processed.synopsis.entries;
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[2].ranked.result.extra.e_value, 0.0);
    assert_eq!(entries[2].ranked.result.extra.spectral_fdr, 10.0);
    assert_eq!(processed.synopsis.sequences.len(), 2);
    assert_eq!(entries[1].unique_sequence_id, entries[2].unique_sequence_id);
}

#[test]
fn empty_file() {
    let parameters = SynopsisParameters::default();
    assert!(
        process_reader::<TopPIC>("".as_bytes(), &parameters, &AtomicBool::new(false)).is_err()
    );
}
