//! Module providing JSON IO for models and solutions
use std::fs;
use std::path::Path;

use crate::io::gpr_parse::{parse_gpr, GprParseError};
use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::{Reaction, ReactionBuilder, ReactionBuilderError};
use crate::solution::{OptimizationStatus, Solution, SolutionError};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

// region JSON Model
/// Represents a JSON serialized model, fields which aren't needed for analysis are ignored
#[derive(Deserialize)]
struct JsonModel {
    metabolites: Vec<JsonMetabolite>,
    reactions: Vec<JsonReaction>,
    genes: Vec<JsonGene>,
    id: Option<String>,
    compartments: Option<IndexMap<String, String>>,
    version: Option<String>,
}

#[derive(Deserialize)]
struct JsonMetabolite {
    id: String,
    name: Option<String>,
    compartment: Option<String>,
    charge: Option<i32>,
    formula: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}

#[derive(Deserialize)]
struct JsonReaction {
    id: String,
    name: Option<String>,
    metabolites: IndexMap<String, f64>,
    #[serde(default)]
    gene_reaction_rule: String,
    subsystem: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}

#[derive(Deserialize)]
struct JsonGene {
    id: String,
    name: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}
// endregion JSON Model

// region JSON Solution
/// A solution in json format, either an object with a `fluxes` member (plus optional status
/// and objective value) or a bare object of reaction ids to fluxes
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonSolution {
    Full {
        fluxes: IndexMap<String, f64>,
        #[serde(default)]
        status: OptimizationStatus,
        #[serde(default)]
        objective_value: Option<f64>,
    },
    Fluxes(IndexMap<String, f64>),
}

impl From<JsonSolution> for Solution {
    fn from(s: JsonSolution) -> Self {
        match s {
            JsonSolution::Full {
                fluxes,
                status,
                objective_value,
            } => Solution {
                status,
                objective_value,
                fluxes,
            },
            JsonSolution::Fluxes(fluxes) => Solution::from_fluxes(fluxes),
        }
    }
}

impl Solution {
    /// Read a solution from a json file
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Solution, SolutionError> {
        let solution_str = fs::read_to_string(path)?;
        Solution::from_json_str(&solution_str)
    }

    /// Parse a solution from a json string
    pub fn from_json_str(data: &str) -> Result<Solution, SolutionError> {
        let json_solution: JsonSolution = serde_json::from_str(data)?;
        Ok(json_solution.into())
    }
}
// endregion JSON Solution

// region Conversions
impl From<JsonGene> for Gene {
    fn from(g: JsonGene) -> Self {
        // Notes and annotations are kept as json strings, they aren't used for analysis
        Self {
            id: g.id,
            name: g.name,
            notes: g.notes.map(|v| v.to_string()),
            annotation: g.annotation.map(|v| v.to_string()),
        }
    }
}

impl From<JsonMetabolite> for Metabolite {
    fn from(m: JsonMetabolite) -> Self {
        Self {
            id: m.id,
            name: m.name,
            compartment: m.compartment,
            charge: m.charge.unwrap_or_default(),
            formula: m.formula,
            notes: m.notes.map(|v| v.to_string()),
            annotation: m.annotation.map(|v| v.to_string()),
        }
    }
}

impl Model {
    /// Read a model from a COBRA formatted json file
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Model, JsonError> {
        let model_str = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) => return Err(JsonError::UnableToRead(format!("{:?}", err))),
        };
        Model::from_json_str(&model_str)
    }

    /// Parse a model from a COBRA formatted json string
    pub fn from_json_str(data: &str) -> Result<Model, JsonError> {
        let json_model = match serde_json::from_str::<JsonModel>(data) {
            Ok(model) => model,
            Err(err) => return Err(JsonError::UnableToParse(format!("{:?}", err))),
        };
        Model::from_json(json_model)
    }

    fn from_json(json_model: JsonModel) -> Result<Self, JsonError> {
        let mut reactions: IndexMap<String, Reaction> = IndexMap::new();
        let mut genes: IndexMap<String, Gene> = IndexMap::new();
        let mut metabolites: IndexMap<String, Metabolite> = IndexMap::new();
        // Start by converting the genes and metabolites using the From methods
        json_model.genes.into_iter().for_each(|g| {
            genes.insert(g.id.clone(), Gene::from(g));
        });
        json_model.metabolites.into_iter().for_each(|m| {
            metabolites.insert(m.id.clone(), Metabolite::from(m));
        });
        // Now, iterate through the reactions, parsing GPRs
        for rxn in json_model.reactions {
            let gpr = if !rxn.gene_reaction_rule.trim().is_empty() {
                Some(parse_gpr(&rxn.gene_reaction_rule, &mut genes)?)
            } else {
                None
            };
            let new_reaction = ReactionBuilder::default()
                .id(rxn.id.clone())
                .metabolites(rxn.metabolites)
                .name(rxn.name)
                .gpr(gpr)
                .subsystem(rxn.subsystem)
                .notes(rxn.notes.map(|v| v.to_string()))
                .annotation(rxn.annotation.map(|v| v.to_string()))
                .build()?;
            reactions.insert(rxn.id, new_reaction);
        }
        debug!(
            reactions = reactions.len(),
            metabolites = metabolites.len(),
            genes = genes.len(),
            "read json model"
        );
        Ok(Model {
            reactions,
            genes,
            metabolites,
            id: json_model.id,
            compartments: json_model.compartments,
            version: json_model.version,
        })
    }
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Unable to parse a GPR rule during conversion from JSON")]
    GprParserError(#[from] GprParseError),
    #[error("Unable to read file due to {0}")]
    UnableToRead(String),
    #[error("Unable to parse json due to {0}")]
    UnableToParse(String),
    #[error("Unable to build reaction")]
    UnableToBuildReaction(#[from] ReactionBuilderError),
}

// endregion Conversions
