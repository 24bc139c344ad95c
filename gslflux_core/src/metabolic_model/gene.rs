//! This module provides the Gene struct, representing a gene associated with one or more
//! reactions through their gene protein reaction rules
use std::fmt::{Display, Formatter};
use std::hash::Hash;

use derive_builder::Builder;

/// Structure Representing a Gene
#[derive(Builder, Clone, Debug, Eq, PartialEq)]
pub struct Gene {
    /// Used to identify the gene
    pub id: String,
    /// Human Readable Gene Name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Notes about the gene
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Gene Annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
}

impl Gene {
    /// Create a gene with only an id, used when a GPR references a gene the model
    /// doesn't list
    pub fn from_id(id: &str) -> Gene {
        Gene {
            id: id.to_string(),
            name: None,
            notes: None,
            annotation: None,
        }
    }
}

impl Display for Gene {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl Hash for Gene {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let gene = GeneBuilder::default()
            .id("ENSG00000128274".to_string())
            .build()
            .unwrap();
        assert_eq!(gene.id, "ENSG00000128274");
        assert!(gene.name.is_none());
        assert!(gene.notes.is_none());
        assert!(gene.annotation.is_none());
    }

    #[test]
    fn display() {
        let gene = Gene::from_id("ENSG00000115525");
        assert_eq!(format!("{}", gene), "ENSG00000115525");
    }
}
