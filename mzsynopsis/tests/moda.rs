#![allow(clippy::missing_panics_doc, clippy::float_cmp)]
//! Integration tests for converting MODa result files
use std::{io::Write, sync::atomic::AtomicBool};

use flate2::{Compression, write::GzEncoder};
use mzsynopsis::{formats::MODaExtra, prelude::*, processor::ProcessedFile};

const HEADER: &str = "SpectrumFile\tIndex\tScanNo\tObservedMonoMass\tCharge\tCalculatedMonoMass\tDeltaMass\tScore\tProbability\tPeptide\tProtein\tPeptidePosition";

const PARAMETERS: &str = r#"{
    "modifications": [
        {"mass": 57.021464, "mass_correction_tag": "IodoAcet", "kind": "Static", "target_residues": ["C"]},
        {"mass": 15.994915, "mass_correction_tag": "Plus1Oxy", "kind": "Dynamic", "target_residues": ["M"]}
    ]
}"#;

fn moda_file(rows: &[[&str; 12]], header: bool) -> String {
    let mut text = String::new();
    if header {
        text.push_str(HEADER);
        text.push('\n');
    }
    for row in rows {
        text.push_str(&row.join("\t"));
        text.push('\n');
    }
    text
}

fn process(text: &str) -> ProcessedFile<MODaExtra> {
    let parameters = SynopsisParameters::from_json(PARAMETERS).unwrap();
    process_reader::<MODa>(text.as_bytes(), &parameters, &AtomicBool::new(false)).unwrap()
}

const ROWS: [[&str; 12]; 6] = [
    ["s.mgf", "1", "100", "946.3960", "2", "946.3954", "0.0006", "40", "0.99", "K.M+15.995PEPTIDE.R", "P1", "[1~8]"],
    ["s.mgf", "2", "101", "985.3640", "2", "0", "0", "38", "0.98", "K.ACDEFGCK.R", "P2", "[5~12]"],
    ["s.mgf", "3", "102", "799.3605", "2", "799.3600", "0", "20", "0.3", "K.PEPTIDE.R", "XXX_P3", "[1~7]"],
    ["s.mgf", "4", "100", "931.4010", "2", "930.4004", "0", "10", "0.5", "K.MPEPTIDE.R", "P1", "[1~8]"],
    ["s.mgf", "5", "104", "mass", "2", "930.4004", "0", "10", "0.5", "K.MPEPTIDE.R", "P1", "[1~8]"],
    ["s.mgf", "6", "103", "799.3605", "2", "799.3600", "0", "5", "0.01", "K.PEPTIDE.R", "P4", "[1~7]"],
];

#[test]
fn full_pipeline() {
    let processed = process(&moda_file(&ROWS, true));
    assert!(!processed.aborted);
    assert_eq!(processed.lines_read, 6);
    assert_eq!(processed.lines_skipped, 1);
    assert_eq!(processed.error_log.len(), 1);
    assert_eq!(processed.passing_fdr, 3);

    let entries = &processed.synopsis.entries;
    assert_eq!(entries.len(), 4, "the low probability row is filtered out");
    let summary: Vec<_> = entries
        .iter()
        .map(|e| {
            (
                e.result_id,
                e.ranked.result.scan,
                e.ranked.rank,
                e.unique_sequence_id,
                e.ranked.result.modification_description.as_str(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        [
            (1, 100, 1, 1, "Plus1Oxy:1"),
            (2, 101, 1, 2, "IodoAcet:2,IodoAcet:7"),
            (3, 100, 2, 3, ""),
            (4, 102, 1, 4, ""),
        ]
    );
    let q_values: Vec<f64> = entries.iter().map(|e| e.ranked.q_value).collect();
    assert_eq!(q_values[..3], [0.0, 0.0, 0.0]);
    assert!((q_values[3] - 1.0 / 3.0).abs() < 1e-12);

    let first = &entries[0].ranked.result;
    assert!((first.computed_mass - 946.395_364).abs() < 1e-3);
    assert!((first.mh() - 947.402_640).abs() < 1e-3);
    assert!(first.warnings.is_empty());
    let second = &entries[1].ranked.result;
    assert!((second.computed_mass - 985.363_34).abs() < 1e-3);

    assert_eq!(processed.synopsis.sequences.len(), 4);
    let modifications = &processed.synopsis.modifications;
    assert_eq!(modifications.len(), 2);
    assert_eq!(modifications[0].mass_correction_tag, "IodoAcet");
    assert_eq!(modifications[0].occurrence_count, 2);
    assert_eq!(modifications[1].mass_correction_tag, "Plus1Oxy");
    assert_eq!(modifications[1].occurrence_count, 1);
}

#[test]
fn headerless() {
    let with_header = process(&moda_file(&ROWS, true));
    let without_header = process(&moda_file(&ROWS, false));
    assert_eq!(
        with_header.synopsis.entries.len(),
        without_header.synopsis.entries.len()
    );
    assert_eq!(without_header.lines_read, 6);
}

#[test]
fn decoy_fdr() {
    let rows = [
        ["s.mgf", "1", "1", "799.3605", "2", "0", "0", "40", "0.99", "K.PEPTIDE.R", "P1", ""],
        ["s.mgf", "2", "2", "799.3605", "2", "0", "0", "40", "0.98", "K.PEPTIDE.R", "P2", ""],
        ["s.mgf", "3", "3", "799.3605", "2", "0", "0", "40", "0.97", "K.PEPTIDE.R", "P3", ""],
        ["s.mgf", "4", "4", "799.3605", "2", "0", "0", "40", "0.96", "K.PEPTIDE.R", "P4", ""],
        ["s.mgf", "5", "5", "799.3605", "2", "0", "0", "40", "0.90", "K.PEPTIDE.R", "Reversed_P5", ""],
        ["s.mgf", "6", "6", "799.3605", "2", "0", "0", "40", "0.80", "K.PEPTIDE.R", "Reversed_P6", ""],
    ];
    let processed = process(&moda_file(&rows, true));
    let entries = &processed.synopsis.entries;
    assert_eq!(entries.len(), 6);
    let fdr: Vec<f64> = entries.iter().map(|e| e.ranked.fdr).collect();
    assert_eq!(fdr, [0.0, 0.0, 0.0, 0.0, 0.25, 0.5]);
    for pair in entries.windows(2) {
        assert!(pair[0].ranked.q_value <= pair[1].ranked.q_value);
    }
    assert!(
        entries
            .iter()
            .all(|e| e.ranked.q_value >= entries[0].ranked.q_value)
    );
    assert_eq!(processed.synopsis.sequences.len(), 1);
    assert!(entries.iter().all(|e| e.unique_sequence_id == 1));
}

#[test]
fn abort() {
    let parameters = SynopsisParameters::from_json(PARAMETERS).unwrap();
    let processed = process_reader::<MODa>(
        moda_file(&ROWS, true).as_bytes(),
        &parameters,
        &AtomicBool::new(true),
    )
    .unwrap();
    assert!(processed.aborted);
    assert!(processed.synopsis.entries.is_empty());
}

#[test]
fn files() {
    let directory = std::env::temp_dir().join("mzsynopsis_moda_files");
    std::fs::create_dir_all(&directory).unwrap();
    let input = directory.join("sample_moda.txt.gz");
    let mut encoder = GzEncoder::new(std::fs::File::create(&input).unwrap(), Compression::default());
    encoder
        .write_all(moda_file(&ROWS, true).as_bytes())
        .unwrap();
    encoder.finish().unwrap();

    let parameters = SynopsisParameters::from_json(PARAMETERS).unwrap();
    let processed = process_file::<MODa>(&input, &parameters, &AtomicBool::new(false)).unwrap();
    assert_eq!(processed.synopsis.entries.len(), 4);
    let base = mzsynopsis::processor::output_base_name(&input);
    assert_eq!(base, "sample_moda");
    let paths = write_outputs::<MODa>(&processed.synopsis, &directory, &base).unwrap();
    assert_eq!(paths.len(), 4);

    let synopsis = std::fs::read_to_string(&paths[0]).unwrap();
    let mut lines = synopsis.lines();
    assert_eq!(
        lines.next().unwrap(),
        "ResultID\tScan\tCharge\tPrecursorMZ\tDelM\tDelM_PPM\tMH\tPeptide\tProtein\tSpectrum_Index\tMODa_Score\tProbability\tRank\tQValue"
    );
    let first: Vec<&str> = lines.next().unwrap().split('\t').collect();
    assert_eq!(first[0], "1");
    assert_eq!(first[1], "100");
    assert_eq!(first[7], "K.M+15.995PEPTIDE.R");
    assert_eq!(first[13], "0.00000");
    assert_eq!(synopsis.lines().count(), 5);

    let map = std::fs::read_to_string(&paths[2]).unwrap();
    assert_eq!(
        map,
        "ResultID\tUnique_Seq_ID\n1\t1\n2\t2\n3\t3\n4\t4\n"
    );
    let sequences = std::fs::read_to_string(&paths[1]).unwrap();
    assert!(sequences.contains("\n2\t2\tIodoAcet:2,IodoAcet:7\t"));
    let modifications = std::fs::read_to_string(&paths[3]).unwrap();
    assert_eq!(modifications.lines().count(), 3);
    assert!(paths[3].ends_with("sample_moda_syn_ModSummary.txt"));

    assert!(process_file::<MODa>(directory.join("missing.txt"), &parameters, &AtomicBool::new(false)).is_err());
}
