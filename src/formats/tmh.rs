//! Transmembrane helix (TMH) table parser.
//!
//! One flat file holds the TMH predictions of one genome. Unlike the
//! protein and ARG tables, a logical row spans *multiple physical
//! lines*: the predictor emits one line per topology segment, and every
//! line repeats the per-protein columns. Consecutive lines whose
//! per-protein columns are equal collapse into one [`TmhRecord`] with an
//! ordered list of [`HelixRecord`] segments.
//!
//! Grouping-key equality, not line position, defines row boundaries.
//! The File Index records *logical* (grouped) row counts for TMH files,
//! and [`count_grouped_rows`] applies the same grouping rule as the
//! parser so the two can never disagree on an unchanged file.
//!
//! # Format Structure
//!
//! Tab-delimited, one header line, 11 columns:
//!
//! 1. **genome_id**: Genome assembly accession
//! 2. **contig_id**: Contig of the underlying gene call
//! 3. **protein_id**: Protein the prediction belongs to
//! 4. **length**: Protein length in residues
//! 5. **predicted_tmh_count**: Number of predicted helices
//! 6. **exp_aa**: Expected residues in transmembrane helices (`-` allowed)
//! 7. **first60**: Expected helix residues in the first 60 aa (`-` allowed)
//! 8. **source**: Prediction tool (e.g. `TMHMM2.0`)
//! 9. **topology**: Segment kind (`inside`, `outside`, `TMhelix`)
//! 10. **start**: Segment start residue (1-based, inclusive)
//! 11. **end**: Segment end residue (1-based, inclusive)
//!
//! Columns 1–8 are the grouping key; columns 9–11 describe one segment.
//!
//! # Example
//!
//! ```
//! use flatpage::formats::tmh::TmhParser;
//!
//! let data = "genome_id\tcontig_id\tprotein_id\tlength\tpredicted_tmh_count\texp_aa\tfirst60\tsource\ttopology\tstart\tend\n\
//!             GCF_1\tc1\tP1\t240\t2\t44.1\t21.8\tTMHMM2.0\toutside\t1\t9\n\
//!             GCF_1\tc1\tP1\t240\t2\t44.1\t21.8\tTMHMM2.0\tTMhelix\t10\t32\n\
//!             GCF_1\tc1\tP2\t88\t1\t20.3\t20.3\tTMHMM2.0\tTMhelix\t5\t27\n";
//! let records: Vec<_> = TmhParser::new(data.as_bytes())
//!     .skip_lines(1)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].helices.len(), 2);
//! ```

use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use super::primitives::{
    fields::{parse_optional, parse_required, split_fields},
    open_flat, FormatError, Result,
};

/// Number of tab-delimited columns in a TMH table
pub const TMH_FIELDS: usize = 11;

/// Number of leading columns forming the grouping key
const KEY_FIELDS: usize = 8;

/// Topology of one predicted segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Topology {
    /// Cytoplasmic side
    #[serde(rename = "inside")]
    Inside,
    /// Extracellular side
    #[serde(rename = "outside")]
    Outside,
    /// Membrane-spanning helix
    #[serde(rename = "TMhelix")]
    Helix,
}

impl Topology {
    /// Canonical on-file representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Topology::Inside => "inside",
            Topology::Outside => "outside",
            Topology::Helix => "TMhelix",
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topology {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "inside" => Ok(Topology::Inside),
            "outside" => Ok(Topology::Outside),
            "TMhelix" => Ok(Topology::Helix),
            other => Err(FormatError::InvalidField {
                field: "topology".to_string(),
                line: 0,
                reason: format!("unknown topology '{other}'"),
            }),
        }
    }
}

/// One topology segment of a prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HelixRecord {
    /// Segment kind
    pub topology: Topology,
    /// Segment start residue (1-based, inclusive)
    pub start: u32,
    /// Segment end residue (1-based, inclusive)
    pub end: u32,
}

/// One logical TMH row: a protein's full prediction with its segments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TmhRecord {
    /// Genome assembly accession
    pub genome_id: String,
    /// Contig of the underlying gene call
    pub contig_id: String,
    /// Protein the prediction belongs to
    pub protein_id: String,
    /// Protein length in residues
    pub length: u32,
    /// Number of predicted helices
    pub predicted_tmh_count: u32,
    /// Expected residues in transmembrane helices
    pub exp_aa: Option<f64>,
    /// Expected helix residues in the first 60 residues
    pub first60: Option<f64>,
    /// Prediction tool
    pub source: String,
    /// Topology segments, in on-file order
    pub helices: Vec<HelixRecord>,
}

impl TmhRecord {
    /// Render the record back to its physical lines, one per segment.
    pub fn to_lines(&self) -> Vec<String> {
        let key = format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.genome_id,
            self.contig_id,
            self.protein_id,
            self.length,
            self.predicted_tmh_count,
            self.exp_aa.map_or("-".to_string(), |v| v.to_string()),
            self.first60.map_or("-".to_string(), |v| v.to_string()),
            self.source,
        );
        self.helices
            .iter()
            .map(|h| format!("{}\t{}\t{}\t{}", key, h.topology, h.start, h.end))
            .collect()
    }
}

/// Grouping key of a physical line: its first eight fields.
///
/// Lines with fewer than eight fields key on the whole line, so a
/// malformed line forms a run of its own instead of merging into a
/// neighboring prediction.
fn group_key(line: &str) -> &str {
    let mut tabs = 0;
    for (i, b) in line.bytes().enumerate() {
        if b == b'\t' {
            tabs += 1;
            if tabs == KEY_FIELDS {
                return &line[..i];
            }
        }
    }
    line
}

/// Count logical (grouped) rows in a TMH table.
///
/// Applies the identical run segmentation as [`TmhParser`]; the File
/// Index must record this count, not the physical line count.
pub fn count_grouped_rows<R: BufRead>(mut reader: R, header_lines: usize) -> std::io::Result<u64> {
    let mut count = 0u64;
    let mut raw_line = 0usize;
    let mut buf = String::new();
    let mut prev_key: Option<String> = None;

    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            return Ok(count);
        }
        raw_line += 1;
        if raw_line <= header_lines {
            continue;
        }
        let line = buf.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let key = group_key(line);
        if prev_key.as_deref() != Some(key) {
            count += 1;
            prev_key = Some(key.to_string());
        }
    }
}

/// Streaming parser yielding one [`TmhRecord`] per grouping-key run.
///
/// A run containing any malformed line is consumed whole and yielded as
/// a single `Err` item, so each run accounts for exactly one item
/// whether it parsed or not.
pub struct TmhParser<R: Read> {
    reader: BufReader<R>,
    line_buf: String,
    line_number: usize,
    header_remaining: usize,
    pending: Option<(String, usize)>,
}

impl<R: Read> TmhParser<R> {
    /// Creates a new parser from a reader.
    pub fn new(reader: R) -> Self {
        TmhParser {
            reader: BufReader::new(reader),
            line_buf: String::with_capacity(256),
            line_number: 0,
            header_remaining: 0,
            pending: None,
        }
    }

    /// Skip the first `n` raw lines (header lines) before parsing records.
    pub fn skip_lines(mut self, n: usize) -> Self {
        self.header_remaining = n;
        self
    }

    /// Next data line (header, blank, and `#`-comment lines skipped).
    fn next_data_line(&mut self) -> Option<std::io::Result<(String, usize)>> {
        loop {
            self.line_buf.clear();
            match self.reader.read_line(&mut self.line_buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    if self.header_remaining > 0 {
                        self.header_remaining -= 1;
                        continue;
                    }
                    let line = self.line_buf.trim_end();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    return Some(Ok((line.to_string(), self.line_number)));
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }

    fn build_record(lines: &[(String, usize)]) -> Result<TmhRecord> {
        let (first_line, first_no) = &lines[0];
        let fields = split_fields(first_line, Some(TMH_FIELDS), *first_no)?;

        let mut record = TmhRecord {
            genome_id: fields[0].to_string(),
            contig_id: fields[1].to_string(),
            protein_id: fields[2].to_string(),
            length: parse_required(fields[3], "length", *first_no)?,
            predicted_tmh_count: parse_required(fields[4], "predicted_tmh_count", *first_no)?,
            exp_aa: parse_optional(fields[5], "exp_aa", *first_no)?,
            first60: parse_optional(fields[6], "first60", *first_no)?,
            source: fields[7].to_string(),
            helices: Vec::with_capacity(lines.len()),
        };

        for (line, line_no) in lines {
            let fields = split_fields(line, Some(TMH_FIELDS), *line_no)?;
            record.helices.push(HelixRecord {
                topology: parse_required(fields[8], "topology", *line_no)?,
                start: parse_required(fields[9], "start", *line_no)?,
                end: parse_required(fields[10], "end", *line_no)?,
            });
        }

        Ok(record)
    }
}

impl TmhParser<Box<dyn Read>> {
    /// Creates a parser from a flat-file path, decompressing `.gz` by extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn from_flat_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(open_flat(path)?))
    }
}

impl<R: Read> Iterator for TmhParser<R> {
    type Item = Result<TmhRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = match self.pending.take() {
            Some(line) => line,
            None => match self.next_data_line()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            },
        };

        let mut lines = vec![first];
        loop {
            match self.next_data_line() {
                None => break,
                Some(Err(e)) => return Some(Err(e.into())),
                Some(Ok(line)) => {
                    if group_key(&line.0) == group_key(&lines[0].0) {
                        lines.push(line);
                    } else {
                        self.pending = Some(line);
                        break;
                    }
                }
            }
        }

        Some(Self::build_record(&lines))
    }
}
