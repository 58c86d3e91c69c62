//! Protein annotation table parser.
//!
//! One flat file holds every predicted protein of one genome: the gene
//! call coordinates plus the functional assignment columns produced by
//! the annotation pipeline.
//!
//! # Format Structure
//!
//! Tab-delimited, one header line, 14 columns:
//!
//! 1. **protein_id**: Protein identifier (unique within the genome)
//! 2. **genome_id**: Genome assembly accession
//! 3. **contig_id**: Contig the gene was called on
//! 4. **start**: Start position (1-based, inclusive)
//! 5. **end**: End position (1-based, inclusive)
//! 6. **strand**: `+` or `-`
//! 7. **phase**: CDS phase (0, 1, 2, or `-`)
//! 8. **product**: Predicted product name
//! 9. **cog_category**: COG functional category letters (e.g. `KT`, `-`)
//! 10. **description**: Free-text functional description
//! 11. **preferred_name**: Preferred gene name
//! 12. **gos**: Semicolon-separated GO terms
//! 13. **ec**: Semicolon-separated EC numbers
//! 14. **kegg_ko**: Semicolon-separated KEGG KO identifiers
//!
//! Missing values use `-` (empty list / `None`, never an error).
//!
//! # Example
//!
//! ```
//! use flatpage::formats::protein::ProteinRecord;
//! use flatpage::formats::primitives::TabDelimitedRecord;
//!
//! let line = "PROT_00001\tGCF_000123.1\tcontig_1\t337\t2799\t+\t0\t\
//!             DNA polymerase III subunit beta\tL\tDNA replication\tdnaN\t\
//!             GO:0003677;GO:0008408\t2.7.7.7\tK02338";
//! let record = ProteinRecord::from_line(line).unwrap();
//! assert_eq!(record.protein_id, "PROT_00001");
//! assert_eq!(record.gos.len(), 2);
//! ```

use serde::Serialize;

use crate::formats::primitives::{
    fields::{format_list, is_missing, parse_list, parse_optional, parse_required, split_fields},
    Result, Strand, TabDelimitedParser, TabDelimitedRecord,
};

/// Number of tab-delimited columns in a protein table
pub const PROTEIN_FIELDS: usize = 14;

/// One protein annotation row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProteinRecord {
    /// Protein identifier (unique within the genome)
    pub protein_id: String,
    /// Genome assembly accession
    pub genome_id: String,
    /// Contig the gene was called on
    pub contig_id: String,
    /// Start position (1-based, inclusive)
    pub start: u64,
    /// End position (1-based, inclusive)
    pub end: u64,
    /// Coding strand
    pub strand: Strand,
    /// CDS phase, absent for ab-initio calls without one
    pub phase: Option<u8>,
    /// Predicted product name
    pub product: String,
    /// COG functional category letters
    pub cog_categories: Vec<char>,
    /// Free-text functional description
    pub description: String,
    /// Preferred gene name
    pub preferred_name: String,
    /// GO terms
    pub gos: Vec<String>,
    /// EC numbers
    pub ec_numbers: Vec<String>,
    /// KEGG KO identifiers
    pub kegg_kos: Vec<String>,
}

impl TabDelimitedRecord for ProteinRecord {
    fn from_line(line: &str) -> Result<Self> {
        let fields = split_fields(line, Some(PROTEIN_FIELDS), 0)?;

        Ok(ProteinRecord {
            protein_id: fields[0].to_string(),
            genome_id: fields[1].to_string(),
            contig_id: fields[2].to_string(),
            start: parse_required(fields[3], "start", 0)?,
            end: parse_required(fields[4], "end", 0)?,
            strand: parse_required(fields[5], "strand", 0)?,
            phase: parse_optional(fields[6], "phase", 0)?,
            product: fields[7].to_string(),
            cog_categories: if is_missing(fields[8]) {
                Vec::new()
            } else {
                fields[8].chars().collect()
            },
            description: fields[9].to_string(),
            preferred_name: fields[10].to_string(),
            gos: parse_list(fields[11]),
            ec_numbers: parse_list(fields[12]),
            kegg_kos: parse_list(fields[13]),
        })
    }

    fn to_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.protein_id,
            self.genome_id,
            self.contig_id,
            self.start,
            self.end,
            self.strand,
            self.phase.map_or("-".to_string(), |p| p.to_string()),
            self.product,
            if self.cog_categories.is_empty() {
                "-".to_string()
            } else {
                self.cog_categories.iter().collect()
            },
            self.description,
            self.preferred_name,
            format_list(&self.gos),
            format_list(&self.ec_numbers),
            format_list(&self.kegg_kos),
        )
    }

    fn expected_fields() -> Option<usize> {
        Some(PROTEIN_FIELDS)
    }
}

/// Streaming protein table parser
pub type ProteinTableParser<R> = TabDelimitedParser<R, ProteinRecord>;
