//! Antibiotic resistance gene (ARG) table parser.
//!
//! One flat file holds every resistance-gene hit of one genome, in the
//! shape produced by CARD/RGI-style screening: the protein coordinates
//! plus the reference-database assignment and alignment quality.
//!
//! # Format Structure
//!
//! Tab-delimited, one header line, 13 columns:
//!
//! 1. **protein_id**: Protein identifier carrying the hit
//! 2. **genome_id**: Genome assembly accession
//! 3. **contig_id**: Contig of the underlying gene call
//! 4. **start**: Start position (1-based, inclusive)
//! 5. **end**: End position (1-based, inclusive)
//! 6. **strand**: `+` or `-`
//! 7. **cutoff**: Detection confidence class (`Perfect`, `Strict`, `Loose`)
//! 8. **best_hit**: Best-matching reference gene
//! 9. **drug_class**: Semicolon-separated drug classes
//! 10. **resistance_mechanism**: Semicolon-separated mechanisms
//! 11. **gene_family**: Semicolon-separated AMR gene families
//! 12. **identity**: Percent identity of the best hit (`-` if unaligned)
//! 13. **coverage**: Percent reference coverage (`-` if unaligned)

use serde::Serialize;

use crate::formats::primitives::{
    fields::{format_list, parse_list, parse_optional, parse_required, split_fields},
    Result, Strand, TabDelimitedParser, TabDelimitedRecord,
};

/// Number of tab-delimited columns in an ARG table
pub const ARG_FIELDS: usize = 13;

/// One resistance-gene hit row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgRecord {
    /// Protein identifier carrying the hit
    pub protein_id: String,
    /// Genome assembly accession
    pub genome_id: String,
    /// Contig of the underlying gene call
    pub contig_id: String,
    /// Start position (1-based, inclusive)
    pub start: u64,
    /// End position (1-based, inclusive)
    pub end: u64,
    /// Coding strand
    pub strand: Strand,
    /// Detection confidence class (`Perfect`, `Strict`, `Loose`)
    pub cutoff: String,
    /// Best-matching reference gene
    pub best_hit: String,
    /// Drug classes the gene confers resistance to
    pub drug_classes: Vec<String>,
    /// Resistance mechanisms
    pub resistance_mechanisms: Vec<String>,
    /// AMR gene families
    pub gene_families: Vec<String>,
    /// Percent identity of the best hit, absent when unaligned
    pub identity: Option<f64>,
    /// Percent reference coverage, absent when unaligned
    pub coverage: Option<f64>,
}

impl TabDelimitedRecord for ArgRecord {
    fn from_line(line: &str) -> Result<Self> {
        let fields = split_fields(line, Some(ARG_FIELDS), 0)?;

        Ok(ArgRecord {
            protein_id: fields[0].to_string(),
            genome_id: fields[1].to_string(),
            contig_id: fields[2].to_string(),
            start: parse_required(fields[3], "start", 0)?,
            end: parse_required(fields[4], "end", 0)?,
            strand: parse_required(fields[5], "strand", 0)?,
            cutoff: fields[6].to_string(),
            best_hit: fields[7].to_string(),
            drug_classes: parse_list(fields[8]),
            resistance_mechanisms: parse_list(fields[9]),
            gene_families: parse_list(fields[10]),
            identity: parse_optional(fields[11], "identity", 0)?,
            coverage: parse_optional(fields[12], "coverage", 0)?,
        })
    }

    fn to_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.protein_id,
            self.genome_id,
            self.contig_id,
            self.start,
            self.end,
            self.strand,
            self.cutoff,
            self.best_hit,
            format_list(&self.drug_classes),
            format_list(&self.resistance_mechanisms),
            format_list(&self.gene_families),
            self.identity.map_or("-".to_string(), |v| v.to_string()),
            self.coverage.map_or("-".to_string(), |v| v.to_string()),
        )
    }

    fn expected_fields() -> Option<usize> {
        Some(ARG_FIELDS)
    }
}

/// Streaming ARG table parser
pub type ArgTableParser<R> = TabDelimitedParser<R, ArgRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "PROT_00107\tGCF_000123.1\tcontig_3\t104220\t105431\t+\tStrict\t\
                        adeF\tfluoroquinolone antibiotic;tetracycline antibiotic\t\
                        antibiotic efflux\tresistance-nodulation-cell division (RND) antibiotic efflux pump\t\
                        41.22\t97.3";

    #[test]
    fn test_parse_full_record() {
        let record = ArgRecord::from_line(LINE).unwrap();
        assert_eq!(record.protein_id, "PROT_00107");
        assert_eq!(record.cutoff, "Strict");
        assert_eq!(record.best_hit, "adeF");
        assert_eq!(
            record.drug_classes,
            vec!["fluoroquinolone antibiotic", "tetracycline antibiotic"]
        );
        assert_eq!(record.identity, Some(41.22));
        assert_eq!(record.coverage, Some(97.3));
    }

    #[test]
    fn test_unaligned_hit_has_no_identity() {
        let line = LINE.replace("41.22\t97.3", "-\t-");
        let record = ArgRecord::from_line(&line).unwrap();
        assert_eq!(record.identity, None);
        assert_eq!(record.coverage, None);
    }

    #[test]
    fn test_wrong_field_count_rejected() {
        assert!(ArgRecord::from_line("PROT_1\tGCF_1\tc1").is_err());
    }

    #[test]
    fn test_to_line_round_trip() {
        let record = ArgRecord::from_line(LINE).unwrap();
        let reparsed = ArgRecord::from_line(&record.to_line()).unwrap();
        assert_eq!(reparsed, record);
    }
}
