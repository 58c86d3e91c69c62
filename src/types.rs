//! Partition vocabulary shared across the crate.
//!
//! Annotation flat files are partitioned three ways: by organism group
//! (Archaea, Bacteria, Fungi, Viruses), by assembly type (MAG vs.
//! single-isolate), and by dataset (proteins, resistance genes,
//! transmembrane helices). One catalog file serves one
//! [`Partition`]; the paging engine itself is partition-agnostic and is
//! parameterized only by [`Dataset`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FlatpageError;

/// Organism group a dataset belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganismGroup {
    /// Archaeal genomes
    Archaea,
    /// Bacterial genomes
    Bacteria,
    /// Fungal genomes
    Fungi,
    /// Viral genomes
    Viruses,
}

impl OrganismGroup {
    /// Canonical lowercase name used in catalog file names
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganismGroup::Archaea => "archaea",
            OrganismGroup::Bacteria => "bacteria",
            OrganismGroup::Fungi => "fungi",
            OrganismGroup::Viruses => "viruses",
        }
    }
}

impl fmt::Display for OrganismGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrganismGroup {
    type Err = FlatpageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "archaea" => Ok(OrganismGroup::Archaea),
            "bacteria" => Ok(OrganismGroup::Bacteria),
            "fungi" => Ok(OrganismGroup::Fungi),
            "viruses" => Ok(OrganismGroup::Viruses),
            other => Err(FlatpageError::InvalidPartition {
                value: other.to_string(),
            }),
        }
    }
}

/// How the genomes in a partition were assembled
///
/// MAG partitions hold metagenome-assembled genomes; unMAG partitions hold
/// single-isolate assemblies. The two variants share schemas but never
/// share catalog files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssemblyType {
    /// Metagenome-assembled genome
    Mag,
    /// Single-isolate assembly
    #[serde(rename = "unmag")]
    Isolate,
}

impl AssemblyType {
    /// Canonical lowercase name used in catalog file names
    pub fn as_str(&self) -> &'static str {
        match self {
            AssemblyType::Mag => "mag",
            AssemblyType::Isolate => "unmag",
        }
    }
}

impl fmt::Display for AssemblyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssemblyType {
    type Err = FlatpageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mag" => Ok(AssemblyType::Mag),
            "unmag" => Ok(AssemblyType::Isolate),
            other => Err(FlatpageError::InvalidPartition {
                value: other.to_string(),
            }),
        }
    }
}

/// Which per-genome annotation table a flat file holds
///
/// The dataset selects the row schema and the row-counting rule: proteins
/// and resistance genes count one row per data line, transmembrane
/// helices count one row per grouped prediction (see
/// [`crate::formats::tmh`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    /// Protein annotations (gene calls + functional assignments)
    Proteins,
    /// Antibiotic resistance gene hits
    Args,
    /// Transmembrane helix predictions
    Tmhs,
}

impl Dataset {
    /// Canonical lowercase name used in catalog file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Proteins => "proteins",
            Dataset::Args => "args",
            Dataset::Tmhs => "tmhs",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = FlatpageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proteins" => Ok(Dataset::Proteins),
            "args" => Ok(Dataset::Args),
            "tmhs" => Ok(Dataset::Tmhs),
            other => Err(FlatpageError::InvalidPartition {
                value: other.to_string(),
            }),
        }
    }
}

/// One cell of the organism-group × assembly-type × dataset matrix
///
/// A partition identifies exactly one catalog file and one flat-file
/// directory. Index keys are unique within a partition, not globally.
///
/// # Examples
///
/// ```
/// use flatpage::{AssemblyType, Dataset, OrganismGroup, Partition};
///
/// let p = Partition::new(OrganismGroup::Bacteria, AssemblyType::Mag, Dataset::Proteins);
/// assert_eq!(p.to_string(), "bacteria.mag.proteins");
/// assert_eq!(p.catalog_file_name(), "bacteria.mag.proteins.idx");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Partition {
    /// Organism group
    pub group: OrganismGroup,
    /// Assembly type
    pub assembly: AssemblyType,
    /// Dataset
    pub dataset: Dataset,
}

impl Partition {
    /// Create a partition from its three components
    pub fn new(group: OrganismGroup, assembly: AssemblyType, dataset: Dataset) -> Self {
        Self {
            group,
            assembly,
            dataset,
        }
    }

    /// File name of this partition's catalog, e.g. `bacteria.mag.proteins.idx`
    pub fn catalog_file_name(&self) -> String {
        format!("{}.{}.{}.idx", self.group, self.assembly, self.dataset)
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.group, self.assembly, self.dataset)
    }
}

impl FromStr for Partition {
    type Err = FlatpageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '.');
        let (group, assembly, dataset) = match (parts.next(), parts.next(), parts.next()) {
            (Some(g), Some(a), Some(d)) => (g, a, d),
            _ => {
                return Err(FlatpageError::InvalidPartition {
                    value: s.to_string(),
                })
            }
        };

        Ok(Partition {
            group: group.parse()?,
            assembly: assembly.parse()?,
            dataset: dataset.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_round_trip() {
        let p = Partition::new(OrganismGroup::Fungi, AssemblyType::Isolate, Dataset::Tmhs);
        assert_eq!(p.to_string(), "fungi.unmag.tmhs");
        assert_eq!("fungi.unmag.tmhs".parse::<Partition>().unwrap(), p);
    }

    #[test]
    fn test_partition_catalog_file_name() {
        let p = Partition::new(OrganismGroup::Viruses, AssemblyType::Mag, Dataset::Args);
        assert_eq!(p.catalog_file_name(), "viruses.mag.args.idx");
    }

    #[test]
    fn test_unknown_component_rejected() {
        assert!("bacteria.mag.plasmids".parse::<Partition>().is_err());
        assert!("protista.mag.args".parse::<Partition>().is_err());
        assert!("bacteria.mag".parse::<Partition>().is_err());
    }

    #[test]
    fn test_assembly_type_names() {
        assert_eq!(AssemblyType::Mag.as_str(), "mag");
        assert_eq!(AssemblyType::Isolate.as_str(), "unmag");
    }
}
