use context_error::*;
use serde::{Deserialize, Serialize};

use crate::{
    annotation::ModificationDialect,
    csv::{CsvLine, Location},
    formats::SearchTool,
    psm::SearchResult,
    rank::ScoreOrientation,
};

static NUMBER_ERROR: (&str, &str) = (
    "Invalid TopPIC line",
    "This column is not a number but it is required to be a number in this TopPIC format",
);

/// The value used for P-values and E-values that are reported as `Infinity`
const INFINITE_P_VALUE: f64 = 0.0;
/// The value used for Q-values and FDRs that are reported as `Infinity`
const INFINITE_Q_VALUE: f64 = 10.0;

/// TopPIC, proteoforms are written with bracketed modifications as in `K.(AC)[Acetyl]DEFK.R`
/// and the P-value is used as significance score.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TopPIC;

/// The TopPIC specific fields of a search result
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct TopPICExtra {
    /// The data file name
    pub data_file: String,
    /// The PrSM identifier
    pub prsm_id: u32,
    /// The spectrum identifier
    pub spectrum_id: u32,
    /// The fragmentation method
    pub fragmentation: String,
    /// The number of peaks in the spectrum
    pub peaks: u32,
    /// The proteoform identifier
    pub proteoform_id: String,
    /// The intensity of the precursor feature
    pub feature_intensity: String,
    /// The protein description
    pub protein_description: String,
    /// The first residue of the proteoform in the protein
    pub first_residue: String,
    /// The last residue of the proteoform in the protein
    pub last_residue: String,
    /// The number of unexpected modifications
    pub unexpected_modifications: u32,
    /// The MIScore, the confidence of the modification localisation
    pub mi_score: String,
    /// The number of variable modifications
    pub variable_ptms: u32,
    /// The number of matched peaks
    pub matched_peaks: u32,
    /// The number of matched fragment ions
    pub matched_fragment_ions: u32,
    /// The P-value, this is also the significance score
    pub p_value: f64,
    /// The E-value
    pub e_value: f64,
    /// The spectral level FDR as reported by TopPIC
    pub spectral_fdr: f64,
    /// The proteoform level FDR as reported by TopPIC
    pub proteoform_fdr: f64,
}

/// Get the first number from a field that can contain multiple numbers as in `1503 1504`
fn first_number(location: &Location) -> Result<u32, BoxedError<'static, BasicKind>> {
    location
        .as_str()
        .split(|c: char| c.is_ascii_whitespace() || c == ',')
        .find(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            BoxedError::new(
                BasicKind::Error,
                NUMBER_ERROR.0,
                NUMBER_ERROR.1,
                location.context(),
            )
        })
}

fn optional_string(line: &CsvLine, column: &str) -> String {
    line.column(column)
        .ok()
        .map(|l| l.get_string())
        .unwrap_or_default()
}

fn optional_number(
    line: &CsvLine,
    column: &str,
) -> Result<u32, BoxedError<'static, BasicKind>> {
    line.column(column)
        .ok()
        .and_then(Location::or_empty)
        .map(|l| l.parse(NUMBER_ERROR))
        .transpose()
        .map(Option::unwrap_or_default)
}

fn optional_float_or_infinity(
    line: &CsvLine,
    column: &str,
    infinity: f64,
) -> Result<f64, BoxedError<'static, BasicKind>> {
    line.column(column)
        .ok()
        .and_then(Location::or_empty)
        .map(|l| l.parse_float_or_infinity(infinity, NUMBER_ERROR))
        .transpose()
        .map(Option::unwrap_or_default)
}

impl SearchTool for TopPIC {
    type Extra = TopPICExtra;

    const NAME: &'static str = "TopPIC";
    const DEFAULT_COLUMNS: &'static [&'static str] = &[
        "Data file name",
        "Prsm ID",
        "Spectrum ID",
        "Fragmentation",
        "Scan(s)",
        "#peaks",
        "Charge",
        "Precursor mass",
        "Adjusted precursor mass",
        "Proteoform ID",
        "Feature intensity",
        "Protein accession",
        "Protein description",
        "First residue",
        "Last residue",
        "Proteoform",
        "#unexpected modifications",
        "MIScore",
        "#variable PTMs",
        "#matched peaks",
        "#matched fragment ions",
        "P-value",
        "E-value",
        "Q-value (spectral FDR)",
        "Proteoform FDR",
    ];
    const DIALECT: ModificationDialect = ModificationDialect::BRACKETED;
    const ORIENTATION: ScoreOrientation = ScoreOrientation::LowerIsBetter;
    const DEFAULT_THRESHOLD: f64 = 0.01;
    const SCORE_COLUMNS: &'static [&'static str] = &[
        "Prsm_ID",
        "Spectrum_ID",
        "Unexpected_Mod_Count",
        "Peak_Count",
        "Matched_Peak_Count",
        "Matched_Fragment_Ion_Count",
        "PValue",
        "EValue",
        "QValue_TopPIC",
        "Proteoform_FDR",
    ];

    fn parse_line(
        line: &CsvLine,
    ) -> Result<SearchResult<TopPICExtra>, BoxedError<'static, BasicKind>> {
        let p_value = line
            .column("p-value")?
            .parse_float_or_infinity(INFINITE_P_VALUE, NUMBER_ERROR)?;
        let mut result = SearchResult::new(TopPICExtra {
            data_file: optional_string(line, "data file name"),
            prsm_id: line.column("prsm id")?.parse(NUMBER_ERROR)?,
            spectrum_id: optional_number(line, "spectrum id")?,
            fragmentation: optional_string(line, "fragmentation"),
            peaks: optional_number(line, "#peaks")?,
            proteoform_id: optional_string(line, "proteoform id"),
            feature_intensity: optional_string(line, "feature intensity"),
            protein_description: optional_string(line, "protein description"),
            first_residue: optional_string(line, "first residue"),
            last_residue: optional_string(line, "last residue"),
            unexpected_modifications: optional_number(line, "#unexpected modifications")?,
            mi_score: optional_string(line, "miscore"),
            variable_ptms: optional_number(line, "#variable ptms")?,
            matched_peaks: optional_number(line, "#matched peaks")?,
            matched_fragment_ions: optional_number(line, "#matched fragment ions")?,
            p_value,
            e_value: optional_float_or_infinity(line, "e-value", INFINITE_P_VALUE)?,
            spectral_fdr: optional_float_or_infinity(
                line,
                "q-value (spectral fdr)",
                INFINITE_Q_VALUE,
            )?,
            proteoform_fdr: optional_float_or_infinity(line, "proteoform fdr", INFINITE_Q_VALUE)?,
        });
        result.scan = first_number(&line.column("scan(s)")?)?;
        result.charge = line.column("charge")?.parse(NUMBER_ERROR)?;
        result.precursor_mass = line.column("precursor mass")?.parse(NUMBER_ERROR)?;
        result.reported_mass = line
            .column("adjusted precursor mass")?
            .or_empty()
            .map(|l| l.parse::<f64>(NUMBER_ERROR))
            .transpose()?
            .unwrap_or_default();
        result.score = p_value;
        // Older versions call the accession column 'Protein name'
        result.protein = line
            .column("protein accession")
            .or_else(|_| line.column("protein name"))?
            .get_string();
        let proteoform = line.column("proteoform")?;
        if proteoform.as_str().is_empty() {
            return Err(BoxedError::new(
                BasicKind::Error,
                "Invalid TopPIC line",
                "The proteoform column is empty",
                proteoform.context(),
            ));
        }
        result.set_peptide(proteoform.as_str());
        Ok(result)
    }

    fn score_values(result: &SearchResult<TopPICExtra>) -> Vec<String> {
        let extra = &result.extra;
        vec![
            extra.prsm_id.to_string(),
            extra.spectrum_id.to_string(),
            extra.unexpected_modifications.to_string(),
            extra.peaks.to_string(),
            extra.matched_peaks.to_string(),
            extra.matched_fragment_ions.to_string(),
            extra.p_value.to_string(),
            extra.e_value.to_string(),
            extra.spectral_fdr.to_string(),
            extra.proteoform_fdr.to_string(),
        ]
    }
}
