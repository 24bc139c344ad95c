//! This module provides a struct for representing reactions
use super::model::Gpr;
use derive_builder::Builder;
use indexmap::IndexMap;

/// Represents a reaction in the metabolic model
#[derive(Builder, Debug, Clone)]
pub struct Reaction {
    /// Used to identify the reaction
    pub id: String,
    /// Metabolite stoichiometry of the reaction
    ///
    /// Keyed by metabolite id, negative coefficients are consumed and positive
    /// coefficients are produced
    #[builder(default = "IndexMap::new()")]
    pub metabolites: IndexMap<String, f64>,
    /// Human-readable reaction name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Gene Protein Reaction rule associating genes with this reaction
    #[builder(default = "None")]
    pub gpr: Option<Gpr>,
    /// Reaction subsystem
    #[builder(default = "None")]
    pub subsystem: Option<String>,
    /// Notes about the reaction
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Reaction Annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
}

impl Reaction {
    /// Ids of the genes referenced by the reaction's GPR
    ///
    /// Each gene appears once, in the order it is first encountered in the rule. A reaction
    /// without a GPR has no genes.
    pub fn gene_ids(&self) -> Vec<String> {
        match self.gpr {
            Some(ref gpr) => gpr.gene_ids(),
            None => Vec::new(),
        }
    }

    /// Metabolites consumed by the reaction (strictly negative coefficient)
    pub fn reactants(&self) -> impl Iterator<Item = (&String, f64)> {
        self.metabolites
            .iter()
            .filter(|(_, coef)| **coef < 0f64)
            .map(|(id, coef)| (id, *coef))
    }

    /// Metabolites produced by the reaction (strictly positive coefficient)
    pub fn products(&self) -> impl Iterator<Item = (&String, f64)> {
        self.metabolites
            .iter()
            .filter(|(_, coef)| **coef > 0f64)
            .map(|(id, coef)| (id, *coef))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::model::GprOperation;

    fn sialyltransferase() -> Reaction {
        let mut metabolites = IndexMap::new();
        metabolites.insert("MAM02328g".to_string(), -1.0);
        metabolites.insert("MAM01592g".to_string(), -1.0);
        metabolites.insert("MAM02015g".to_string(), 1.0);
        metabolites.insert("MAM01590g".to_string(), 1.0);
        metabolites.insert("MAM02039g".to_string(), 0.0);
        ReactionBuilder::default()
            .id("MAR00901".to_string())
            .metabolites(metabolites)
            .gpr(Some(Gpr::Operation(GprOperation::Or {
                left: Box::new(Gpr::GeneNode("ENSG00000128274".to_string())),
                right: Box::new(Gpr::GeneNode("ENSG00000115525".to_string())),
            })))
            .build()
            .unwrap()
    }

    #[test]
    fn reactants_and_products_exclude_zero_coefficients() {
        let reaction = sialyltransferase();
        let reactants: Vec<&String> = reaction.reactants().map(|(id, _)| id).collect();
        let products: Vec<&String> = reaction.products().map(|(id, _)| id).collect();
        assert_eq!(reactants, vec!["MAM02328g", "MAM01592g"]);
        assert_eq!(products, vec!["MAM02015g", "MAM01590g"]);
    }

    #[test]
    fn gene_ids() {
        let reaction = sialyltransferase();
        assert_eq!(
            reaction.gene_ids(),
            vec!["ENSG00000128274".to_string(), "ENSG00000115525".to_string()]
        );
        let no_gpr = ReactionBuilder::default()
            .id("MAR00902".to_string())
            .build()
            .unwrap();
        assert!(no_gpr.gene_ids().is_empty());
    }
}
