//! Reading character separated files while keeping track of the information needed for good error messages

use std::{
    borrow::Cow,
    fs::File,
    io::{BufRead, BufReader, Read, Write},
    ops::Range,
    path::Path,
    str::FromStr,
    sync::Arc,
};

use context_error::*;
use flate2::bufread::GzDecoder;
use itertools::Itertools;

use crate::helper_functions::{check_extension, parse_float_or_infinity};

/// A single line in a CSV file
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CsvLine {
    line_index: usize,
    line: String,
    fields: Vec<(Arc<String>, Range<usize>)>,
}

impl CsvLine {
    /// Get the line index (0 based)
    pub const fn line_index(&self) -> usize {
        self.line_index
    }

    /// Get the full line
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Get the column headers
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.0.as_str())
    }

    /// Get the number of columns
    pub fn number_of_columns(&self) -> usize {
        self.fields.len()
    }

    /// Get the context for the whole line
    pub fn full_context(&self) -> Context<'_> {
        Context::full_line(self.line_index as u32, &self.line)
    }

    /// Get the context for the specified range in the line
    pub fn range_context(&self, range: Range<usize>) -> Context<'_> {
        Context::line(Some(self.line_index as u32), &self.line, range.start, range.len())
    }

    /// Get the specified column by name (case insensitive)
    /// # Errors
    /// If the given name is not a column header
    pub fn column<'a>(&'a self, name: &'a str) -> Result<Location<'a>, BoxedError<'static, BasicKind>> {
        self.fields
            .iter()
            .find(|f| f.0.eq_ignore_ascii_case(name))
            .map(|f| Location {
                line: self,
                location: f.1.clone(),
                column: name,
            })
            .ok_or_else(|| {
                BoxedError::new(
                    BasicKind::Error,
                    "Could not find given column",
                    format!("This file does not contain the needed column '{name}'"),
                    self.full_context().to_owned(),
                )
            })
    }
}

impl std::ops::Index<usize> for CsvLine {
    type Output = str;
    fn index(&self, index: usize) -> &str {
        &self.line[self.fields[index].1.clone()]
    }
}

/// A single field in a line
#[derive(Clone, Debug)]
pub struct Location<'a> {
    line: &'a CsvLine,
    location: Range<usize>,
    column: &'a str,
}

impl Location<'_> {
    /// The text of this field
    pub fn as_str(&self) -> &str {
        self.line.line[self.location.clone()].trim()
    }

    /// Get the text as an owned string
    pub fn get_string(&self) -> String {
        self.as_str().to_string()
    }

    /// `None` if the field is empty or `-`
    #[must_use]
    pub fn or_empty(self) -> Option<Self> {
        let text = self.as_str();
        if text.is_empty() || text == "-" {
            None
        } else {
            Some(self)
        }
    }

    /// The context pointing to this field
    pub fn context(&self) -> Context<'static> {
        Context::line(
            Some(self.line.line_index as u32),
            Cow::Owned(self.line.line.clone()),
            self.location.start,
            self.location.len(),
        )
    }

    /// Parse the field.
    /// # Errors
    /// If the parse method fails, the error is built from the given short and long description.
    pub fn parse<T: FromStr>(
        &self,
        base_error: (&'static str, &'static str),
    ) -> Result<T, BoxedError<'static, BasicKind>> {
        self.as_str().parse().map_err(|_| self.error(base_error))
    }

    /// Parse the field as a number that could be `Infinity`, which is replaced by the given value.
    /// # Errors
    /// If the field is not a number.
    pub fn parse_float_or_infinity(
        &self,
        infinity: f64,
        base_error: (&'static str, &'static str),
    ) -> Result<f64, BoxedError<'static, BasicKind>> {
        parse_float_or_infinity(self.as_str(), infinity).ok_or_else(|| self.error(base_error))
    }

    fn error(&self, base_error: (&'static str, &'static str)) -> BoxedError<'static, BasicKind> {
        BoxedError::new(
            BasicKind::Error,
            base_error.0,
            format!("{} (column '{}')", base_error.1, self.column),
            self.context(),
        )
    }
}

/// Open a file, transparently decompressing it if the extension is `.gz`.
/// # Errors
/// If the file could not be opened.
pub fn open_file(path: impl AsRef<Path>) -> Result<Box<dyn Read>, BoxedError<'static, BasicKind>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        BoxedError::new(
            BasicKind::Error,
            "Could not open file",
            e.to_string(),
            Context::show(path.to_string_lossy().to_string()),
        )
    })?;
    if check_extension(path, "gz") {
        Ok(Box::new(GzDecoder::new(BufReader::new(file))))
    } else {
        Ok(Box::new(file))
    }
}

/// Check if the first line of a file is a data line instead of a header line, this is the case
/// if the second field of the line is an integer.
pub fn is_headerless(first_line: &str, separator: u8) -> bool {
    csv_separate(first_line, separator).is_ok_and(|row| {
        row.get(1)
            .is_some_and(|range| first_line[range.clone()].trim().parse::<i64>().is_ok())
    })
}

/// Parse a CSV file from a reader. The first non empty line is used as header, unless it is a
/// data line (see [`is_headerless`]) in which case the given default header is used. The header
/// names are stored lowercase.
/// # Errors
/// If the file is empty, the header line cannot be read, or the first line is data but no
/// default header is given.
pub fn parse_csv_raw<T: Read>(
    reader: T,
    separator: u8,
    default_header: Option<&[&str]>,
) -> Result<CsvLineIter<T>, BoxedError<'static, BasicKind>> {
    let reader = BufReader::new(reader);
    let mut lines = reader.lines().enumerate().peekable();
    while lines
        .peek()
        .is_some_and(|(_, l)| l.as_ref().is_ok_and(|l| l.trim().is_empty()))
    {
        let _unused = lines.next();
    }
    let (line_index, first) = lines.peek().ok_or_else(|| {
        BoxedError::new(
            BasicKind::Error,
            "Could not parse file",
            "The file is empty",
            Context::none(),
        )
    })?;
    let line_index = *line_index;
    let first = first.as_ref().map_err(|err| {
        BoxedError::new(
            BasicKind::Error,
            "Could not read header line",
            err.to_string(),
            Context::none(),
        )
    })?;
    let header = if is_headerless(first, separator) {
        let header = default_header.ok_or_else(|| {
            BoxedError::new(
                BasicKind::Error,
                "Missing header",
                "The first line of this file does not look like a header line, and no default header is known",
                Context::full_line(line_index as u32, first.clone()),
            )
        })?;
        log::debug!("No header line found, using the default column order");
        header
            .iter()
            .map(|h| Arc::new(h.to_lowercase()))
            .collect()
    } else {
        let header = csv_separate(first, separator)
            .map_err(BoxedError::to_owned)?
            .into_iter()
            .map(|r| Arc::new(first[r].to_lowercase()))
            .collect();
        log::debug!("Header line found at line {}", line_index + 1);
        let _unused = lines.next();
        header
    };

    Ok(CsvLineIter {
        lines,
        header,
        separator,
    })
}

/// An iterator returning CSV lines, empty lines are skipped
#[derive(Debug)]
pub struct CsvLineIter<T: Read> {
    lines: std::iter::Peekable<std::iter::Enumerate<std::io::Lines<BufReader<T>>>>,
    header: Vec<Arc<String>>,
    separator: u8,
}

impl<T: Read> CsvLineIter<T> {
    /// The column headers (lowercase)
    pub fn header(&self) -> impl Iterator<Item = &str> {
        self.header.iter().map(|h| h.as_str())
    }
}

impl<T: Read> Iterator for CsvLineIter<T> {
    type Item = Result<CsvLine, BoxedError<'static, BasicKind>>;
    fn next(&mut self) -> Option<Self::Item> {
        let (line_index, line) = self
            .lines
            .find(|(_, l)| l.as_ref().map_or(true, |l| !l.trim().is_empty()))?;
        Some(
            line.map_err(|err| {
                BoxedError::new(
                    BasicKind::Error,
                    "Could not read line",
                    err.to_string(),
                    Context::none(),
                )
            })
            .and_then(|line| {
                let row = csv_separate(&line, self.separator).map_err(BoxedError::to_owned)?;
                if self.header.len() == row.len() {
                    Ok(CsvLine {
                        line_index,
                        fields: self.header.iter().cloned().zip(row).collect(),
                        line,
                    })
                } else {
                    Err(BoxedError::new(
                        BasicKind::Error,
                        "Incorrect number of columns",
                        format!(
                            "It does not have the correct number of columns. {} columns were expected but {} were found.",
                            self.header.len(),
                            row.len()
                        ),
                        Context::full_line(line_index as u32, line),
                    ))
                }
            }),
        )
    }
}

/// Split a line on the separator, taking quoted fields into account.
/// # Errors
/// If the line is empty.
pub(crate) fn csv_separate(
    line: &str,
    separator: u8,
) -> Result<Vec<Range<usize>>, BoxedError<'_, BasicKind>> {
    if line.is_empty() {
        return Err(BoxedError::new(
            BasicKind::Error,
            "Empty line",
            "The line is empty",
            Context::none(),
        ));
    }
    let mut enclosed = None;
    let mut was_enclosed = false;
    let mut row = Vec::new();
    let mut start = None;
    let mut last_non_whitespace = None;
    for (index, ch) in line.bytes().enumerate() {
        match (ch, enclosed, start) {
            (b'\"', None, None) => {
                enclosed = Some(ch);
                start = Some(index + 1);
            }
            (c, Some(e), Some(s)) if c == e => {
                enclosed = None;
                row.push(s..index);
                start = None;
                last_non_whitespace = None;
                was_enclosed = true;
            }
            (sep, None, Some(s)) if sep == separator => {
                row.push(s..last_non_whitespace.unwrap_or(index));
                start = None;
                last_non_whitespace = None;
                was_enclosed = false;
            }
            (sep, None, None) if sep == separator => {
                if !was_enclosed {
                    // Empty field
                    row.push(index..index);
                }
                was_enclosed = false;
            }
            (c, _, _) if c.is_ascii_whitespace() && c != separator => (), // ignore
            (_, _, None) => {
                start = Some(index);
                last_non_whitespace = Some(index + 1);
            }
            _ => last_non_whitespace = Some(index + 1),
        }
    }
    if let Some(s) = start {
        row.push(s..last_non_whitespace.unwrap_or(line.len()));
    } else if !was_enclosed {
        row.push(line.len()..line.len());
    }
    Ok(row)
}

/// Write a table with the given header, values containing the separator are quoted.
/// # Errors
/// If writing to the writer fails.
pub fn write_csv(
    mut f: impl Write,
    header: &[&str],
    rows: impl IntoIterator<Item = impl IntoIterator<Item = String>>,
    separator: char,
) -> Result<(), std::io::Error> {
    let quote = |value: String| {
        if value.contains(separator) {
            format!("\"{}\"", value.replace('\"', "\'"))
        } else {
            value
        }
    };
    let separator = separator.to_string();
    writeln!(
        f,
        "{}",
        header.iter().map(|h| quote((*h).to_string())).join(&separator)
    )?;
    for row in rows {
        writeln!(f, "{}", row.into_iter().map(quote).join(&separator))?;
    }
    Ok(())
}
