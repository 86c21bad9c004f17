//! Converting a whole search result file into synopsis files

use std::{
    fmt::Display,
    fs::File,
    io::{BufWriter, Read},
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

use context_error::*;

use crate::{
    csv::{open_file, parse_csv_raw},
    fdr::{compute_fdr, sort_for_fdr},
    formats::SearchTool,
    parameters::SynopsisParameters,
    rank::{RankedResult, assign_ranks_per_scan, filter_by_threshold},
    synopsis::{ModificationSummary, SequenceInfo, Synopsis, SynopsisEntry},
    unique_sequence::UniqueSequenceRegistry,
};

/// A text log of all non fatal problems encountered in a file. The log stops accepting text once
/// its character budget is used up, but keeps counting the dropped entries.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ErrorLog {
    text: String,
    max_chars: usize,
    entries: usize,
    dropped: usize,
    full: bool,
}

impl ErrorLog {
    /// Create an empty log with the given character budget
    pub const fn new(max_chars: usize) -> Self {
        Self {
            text: String::new(),
            max_chars,
            entries: 0,
            dropped: 0,
            full: false,
        }
    }

    /// Add a single entry, once an entry does not fit in the budget all later entries are dropped
    pub fn push(&mut self, entry: impl Display) {
        self.entries += 1;
        let line = format!("{entry}\n");
        if !self.full && self.text.chars().count() + line.chars().count() <= self.max_chars {
            self.text.push_str(&line);
        } else {
            self.full = true;
            self.dropped += 1;
        }
    }

    /// The logged text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The total number of entries, including the dropped ones
    pub const fn len(&self) -> usize {
        self.entries
    }

    /// If nothing was logged
    pub const fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// The number of entries that did not fit in the log
    pub const fn dropped(&self) -> usize {
        self.dropped
    }
}

/// The result of processing a single file
#[derive(Clone, Debug)]
pub struct ProcessedFile<Extra> {
    /// The synopsis rows and companion tables
    pub synopsis: Synopsis<Extra>,
    /// All non fatal problems
    pub error_log: ErrorLog,
    /// The number of data lines read
    pub lines_read: usize,
    /// The number of lines that could not be parsed and were skipped
    pub lines_skipped: usize,
    /// The number of synopsis rows with a Q-value at or below 0.01
    pub passing_fdr: usize,
    /// If processing was stopped early on request
    pub aborted: bool,
}

impl<Extra> ProcessedFile<Extra> {
    fn new(max_error_log_chars: usize) -> Self {
        Self {
            synopsis: Synopsis::default(),
            error_log: ErrorLog::new(max_error_log_chars),
            lines_read: 0,
            lines_skipped: 0,
            passing_fdr: 0,
            aborted: false,
        }
    }
}

/// Process a search result file from the given path, `.gz` files are decompressed on the fly.
/// # Errors
/// If the file could not be opened or read, see [`process_reader`].
pub fn process_file<T: SearchTool>(
    path: impl AsRef<Path>,
    parameters: &SynopsisParameters,
    abort: &AtomicBool,
) -> Result<ProcessedFile<T::Extra>, BoxedError<'static, BasicKind>> {
    let path = path.as_ref();
    log::info!("Processing {} file {}", T::NAME, path.display());
    process_reader::<T>(open_file(path)?, parameters, abort)
}

/// Process a search result file. Every line is parsed, lines that cannot be parsed are logged and
/// skipped. All results are ranked per scan, filtered on the significance threshold, sorted best
/// first, and get their FDR and Q-value. Then each result is annotated with its modifications,
/// its masses are reconciled, and it gets its result identifier and unique sequence identifier.
///
/// The abort flag is checked between lines, if it is set the results up until then are returned.
/// # Errors
/// If the file is empty, its header cannot be read, or the parameters are invalid. Problems with
/// single lines are never fatal.
pub fn process_reader<T: SearchTool>(
    reader: impl Read,
    parameters: &SynopsisParameters,
    abort: &AtomicBool,
) -> Result<ProcessedFile<T::Extra>, BoxedError<'static, BasicKind>> {
    let mut catalog = parameters.catalog()?;
    let mut annotator = parameters.annotator::<T>();
    let calculator = parameters.mass_calculator();
    let mut registry = UniqueSequenceRegistry::new();
    let mut output = ProcessedFile::new(parameters.max_error_log_chars);

    let mut results = Vec::new();
    for line in parse_csv_raw(reader, T::SEPARATOR, Some(T::DEFAULT_COLUMNS))? {
        if abort.load(Ordering::Relaxed) {
            log::warn!("Abort requested, stopped reading after {} lines", output.lines_read);
            output.aborted = true;
            return Ok(output);
        }
        output.lines_read += 1;
        match line.and_then(|line| T::parse_line(&line)) {
            Ok(result) => results.push(RankedResult::new(result)),
            Err(error) => {
                output.lines_skipped += 1;
                output.error_log.push(error);
            }
        }
    }

    assign_ranks_per_scan(&mut results, T::ORIENTATION);
    let mut results = filter_by_threshold(results, T::ORIENTATION, parameters.threshold::<T>());
    sort_for_fdr(&mut results, T::ORIENTATION);
    output.passing_fdr = compute_fdr(&mut results, &parameters.decoy_prefixes);

    catalog.reset_occurrence_counts();
    for (index, mut ranked) in results.into_iter().enumerate() {
        if abort.load(Ordering::Relaxed) {
            log::warn!("Abort requested, stopped after {index} synopsis rows");
            output.aborted = true;
            break;
        }
        let result = &mut ranked.result;
        annotator.annotate(&mut catalog, result, true);
        let reconciliation = result.reconcile_mass(&calculator, parameters.adjust_precursor_for_c13);
        if let Some(warning) = &reconciliation.warning {
            log::warn!("{warning}");
        }
        for warning in &result.warnings {
            output.error_log.push(warning);
        }
        let (unique_sequence_id, existing) =
            registry.get_or_assign_id(&result.clean_sequence, &result.modification_description);
        if !existing {
            output
                .synopsis
                .sequences
                .push(SequenceInfo::from_result(unique_sequence_id, result));
        }
        output.synopsis.entries.push(SynopsisEntry {
            result_id: index + 1,
            unique_sequence_id,
            ranked,
        });
    }
    output.synopsis.modifications = ModificationSummary::from_catalog(&catalog);

    log::info!(
        "Read {} lines ({} skipped), wrote {} synopsis rows for {} unique sequences, {} rows pass 1% FDR",
        output.lines_read,
        output.lines_skipped,
        output.synopsis.entries.len(),
        output.synopsis.sequences.len(),
        output.passing_fdr
    );
    if output.error_log.dropped() > 0 {
        log::warn!(
            "{} of {} errors did not fit in the error log",
            output.error_log.dropped(),
            output.error_log.len()
        );
    }
    Ok(output)
}

/// The base name for the output files of the given input file: the file name without the
/// extension and without `.gz`.
pub fn output_base_name(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = name
        .strip_suffix(".gz")
        .or_else(|| name.strip_suffix(".GZ"))
        .unwrap_or(&name);
    Path::new(name)
        .file_stem()
        .map_or_else(|| name.to_string(), |s| s.to_string_lossy().to_string())
}

fn create_file(path: &Path) -> Result<BufWriter<File>, BoxedError<'static, BasicKind>> {
    File::create(path).map(BufWriter::new).map_err(|err| {
        BoxedError::new(
            BasicKind::Error,
            "Could not create file",
            err.to_string(),
            Context::show(path.to_string_lossy().to_string()),
        )
    })
}

/// Write the synopsis file and its companion files to the given directory: `<base>_syn.txt`,
/// `<base>_syn_SeqInfo.txt`, `<base>_syn_ResultToSeqMap.txt`, and `<base>_syn_ModSummary.txt`.
/// Returns the paths of the written files.
/// # Errors
/// If any of the files could not be created or written.
pub fn write_outputs<T: SearchTool>(
    synopsis: &Synopsis<T::Extra>,
    directory: impl AsRef<Path>,
    base_name: &str,
) -> Result<Vec<PathBuf>, BoxedError<'static, BasicKind>> {
    let directory = directory.as_ref();
    let path = |suffix: &str| directory.join(format!("{base_name}_syn{suffix}.txt"));
    let paths = [
        path(""),
        path("_SeqInfo"),
        path("_ResultToSeqMap"),
        path("_ModSummary"),
    ];
    synopsis.write_synopsis::<T>(create_file(&paths[0])?)?;
    synopsis.write_sequence_info(create_file(&paths[1])?)?;
    synopsis.write_result_to_sequence_map(create_file(&paths[2])?)?;
    synopsis.write_modification_summary(create_file(&paths[3])?)?;
    log::info!("Wrote synopsis files to {}", paths[0].display());
    Ok(paths.to_vec())
}
