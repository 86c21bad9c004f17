use context_error::*;
use serde::{Deserialize, Serialize};

use crate::{
    annotation::ModificationDialect, csv::CsvLine, formats::SearchTool, psm::SearchResult,
    rank::ScoreOrientation,
};

static NUMBER_ERROR: (&str, &str) = (
    "Invalid MODa line",
    "This column is not a number but it is required to be a number in this MODa format",
);

/// The value used for probabilities and scores written as `Infinity`
const INFINITE_SCORE: f64 = 0.0;

/// MODa, peptides are written with unwrapped masses as in `K.M+16PEPTIDE.R` and the
/// probability is used as significance score.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MODa;

/// The MODa specific fields of a search result
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct MODaExtra {
    /// The spectrum file name
    pub spectrum_file: String,
    /// The index of the spectrum in the file
    pub spectrum_index: u32,
    /// The MODa score
    pub moda_score: f64,
    /// The probability, this is also the significance score
    pub probability: f64,
    /// The delta mass as reported by MODa
    pub reported_delta_mass: f64,
    /// The location of the peptide in the protein as reported by MODa, eg `[123~131]`
    pub peptide_position: String,
}

impl SearchTool for MODa {
    type Extra = MODaExtra;

    const NAME: &'static str = "MODa";
    const DEFAULT_COLUMNS: &'static [&'static str] = &[
        "SpectrumFile",
        "Index",
        "ScanNo",
        "ObservedMonoMass",
        "Charge",
        "CalculatedMonoMass",
        "DeltaMass",
        "Score",
        "Probability",
        "Peptide",
        "Protein",
        "PeptidePosition",
    ];
    const DIALECT: ModificationDialect = ModificationDialect::UNWRAPPED;
    const ORIENTATION: ScoreOrientation = ScoreOrientation::HigherIsBetter;
    const DEFAULT_THRESHOLD: f64 = 0.05;
    const SCORE_COLUMNS: &'static [&'static str] = &["Spectrum_Index", "MODa_Score", "Probability"];

    fn parse_line(line: &CsvLine) -> Result<SearchResult<MODaExtra>, BoxedError<'static, BasicKind>> {
        let spectrum_index: u32 = line.column("index")?.parse(NUMBER_ERROR)?;
        let probability = line
            .column("probability")?
            .parse_float_or_infinity(INFINITE_SCORE, NUMBER_ERROR)?;
        let mut result = SearchResult::new(MODaExtra {
            spectrum_file: line.column("spectrumfile")?.get_string(),
            spectrum_index,
            moda_score: line
                .column("score")?
                .parse_float_or_infinity(INFINITE_SCORE, NUMBER_ERROR)?,
            probability,
            reported_delta_mass: line
                .column("deltamass")?
                .or_empty()
                .map(|l| l.parse::<f64>(NUMBER_ERROR))
                .transpose()?
                .unwrap_or_default(),
            peptide_position: line
                .column("peptideposition")
                .ok()
                .map(|l| l.get_string())
                .unwrap_or_default(),
        });
        // MODa writes -1 when the scan number is unknown
        let scan: i64 = line.column("scanno")?.parse(NUMBER_ERROR)?;
        result.scan = u32::try_from(scan).unwrap_or(spectrum_index);
        result.charge = line.column("charge")?.parse(NUMBER_ERROR)?;
        result.precursor_mass = line.column("observedmonomass")?.parse(NUMBER_ERROR)?;
        result.reported_mass = line.column("calculatedmonomass")?.parse(NUMBER_ERROR)?;
        result.score = probability;
        result.protein = line.column("protein")?.get_string();
        let peptide = line.column("peptide")?;
        if peptide.as_str().is_empty() {
            return Err(BoxedError::new(
                BasicKind::Error,
                "Invalid MODa line",
                "The peptide column is empty",
                peptide.context(),
            ));
        }
        result.set_peptide(peptide.as_str());
        Ok(result)
    }

    fn score_values(result: &SearchResult<MODaExtra>) -> Vec<String> {
        vec![
            result.extra.spectrum_index.to_string(),
            result.extra.moda_score.to_string(),
            result.extra.probability.to_string(),
        ]
    }
}
