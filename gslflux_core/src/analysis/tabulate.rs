//! Build the table of fluxes into allow listed metabolites
use std::cmp::Ordering;

use crate::analysis::allow_list::AllowList;
use crate::analysis::selection::select_reactions;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::Reaction;
use crate::solution::Solution;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// One row of the results table, describing a reaction which produces an allow listed
/// metabolite
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultRecord {
    #[serde(rename = "Reaction ID")]
    pub reaction_id: String,
    /// Consumed metabolites, as `"<id> (<name>)"` joined by `", "`
    #[serde(rename = "Reactants")]
    pub reactants: String,
    /// Produced metabolites, as `"<id> (<name>)"` joined by `", "`
    #[serde(rename = "Products")]
    pub products: String,
    /// Names of the produced metabolites which are allow listed, joined by `", "`
    #[serde(rename = "Key Product")]
    pub key_product: String,
    /// Ids of the genes associated with the reaction
    #[serde(rename = "Genes")]
    pub genes: String,
    /// Flux through the reaction, None if the solution has no value for it
    #[serde(rename = "Flux (mmol/gDW/hr)")]
    pub flux: Option<f64>,
    /// Percentage of the total flux of the table carried by this reaction
    #[serde(rename = "Relative GSL Flux (%)")]
    pub relative_flux: f64,
}

/// Results table, sorted by flux from highest to lowest
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultTable {
    records: Vec<ResultRecord>,
}

impl ResultTable {
    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Row for a reaction id, if the reaction was retained
    pub fn get(&self, reaction_id: &str) -> Option<&ResultRecord> {
        self.records.iter().find(|r| r.reaction_id == reaction_id)
    }

    /// Sum of the known fluxes in the table
    pub fn total_flux(&self) -> f64 {
        self.records.iter().filter_map(known_flux).sum()
    }

    pub fn into_records(self) -> Vec<ResultRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a ResultRecord;
    type IntoIter = std::slice::Iter<'a, ResultRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<ResultRecord> for ResultTable {
    fn from_iter<T: IntoIterator<Item = ResultRecord>>(iter: T) -> Self {
        ResultTable {
            records: iter.into_iter().collect(),
        }
    }
}

/// Errors raised while exporting a results table
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Unable to write table")]
    UnableToWrite(#[from] std::io::Error),
    #[error("Unable to serialize table to csv")]
    Csv(#[from] csv::Error),
    #[error("Table csv was not valid utf-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Tabulate the flux into allow listed metabolites for a solved model
///
/// Each reaction touching the allow list becomes a row, unless none of its allow listed
/// products has a name. The relative flux of each row is its share of the summed flux of all
/// rows, which is not finite when that sum is zero.
///
/// # Examples
/// ```rust
/// use indexmap::IndexMap;
/// use gslflux_core::analysis::allow_list::AllowList;
/// use gslflux_core::analysis::tabulate::tabulate_model_results;
/// use gslflux_core::metabolic_model::metabolite::MetaboliteBuilder;
/// use gslflux_core::metabolic_model::model::Model;
/// use gslflux_core::metabolic_model::reaction::ReactionBuilder;
/// use gslflux_core::solution::Solution;
///
/// let mut model = Model::new_empty();
/// model.add_metabolite(
///     MetaboliteBuilder::default()
///         .id("MAM02015g".to_string())
///         .name(Some("GM3".to_string()))
///         .build()
///         .unwrap(),
/// );
/// let mut metabolites = IndexMap::new();
/// metabolites.insert("MAM02015g".to_string(), 1.0);
/// model.add_reaction(
///     ReactionBuilder::default()
///         .id("R2".to_string())
///         .metabolites(metabolites)
///         .build()
///         .unwrap(),
/// );
/// let solution: Solution = vec![("R2".to_string(), 5.0)].into_iter().collect();
/// let table = tabulate_model_results(&model, &solution, &AllowList::gsl());
/// assert_eq!(table.len(), 1);
/// assert!((table.records()[0].relative_flux - 100.0).abs() < 1e-9);
/// ```
pub fn tabulate_model_results(
    model: &Model,
    solution: &Solution,
    allow_list: &AllowList,
) -> ResultTable {
    let mut records: Vec<ResultRecord> = select_reactions(model, allow_list)
        .into_iter()
        .filter_map(|rxn| {
            let record = build_record(model, solution, allow_list, rxn);
            if record.is_none() {
                debug!(reaction = %rxn.id, "dropping reaction without a named allow listed product");
            }
            record
        })
        .collect();

    let total: f64 = records.iter().filter_map(known_flux).sum();
    for record in records.iter_mut() {
        record.relative_flux = match record.flux {
            Some(flux) => flux / total * 100.,
            None => f64::NAN,
        };
    }

    // Stable, so equal fluxes keep the model order. Unknown fluxes go last.
    records.sort_by(|a, b| match (known_flux(a), known_flux(b)) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    ResultTable { records }
}

/// Build the row for a reaction, None if its key product is empty
///
/// The key product joins the names of the allow listed products, so a reaction whose only
/// allow listed products are unnamed is dropped as well.
fn build_record(
    model: &Model,
    solution: &Solution,
    allow_list: &AllowList,
    rxn: &Reaction,
) -> Option<ResultRecord> {
    let key_products: Vec<&str> = rxn
        .products()
        .filter(|(met_id, _)| allow_list.contains(met_id))
        .map(|(met_id, _)| {
            model
                .metabolites
                .get(met_id.as_str())
                .map(|m| m.name_or_empty())
                .unwrap_or("")
        })
        .collect();
    let key_product = key_products.join(", ");
    if key_product.is_empty() {
        return None;
    }

    let reactants: Vec<String> = rxn
        .reactants()
        .map(|(met_id, _)| model.describe_metabolite(met_id))
        .collect();
    let products: Vec<String> = rxn
        .products()
        .map(|(met_id, _)| model.describe_metabolite(met_id))
        .collect();

    Some(ResultRecord {
        reaction_id: rxn.id.clone(),
        reactants: reactants.join(", "),
        products: products.join(", "),
        key_product,
        genes: rxn.gene_ids().join(", "),
        flux: solution.flux(&rxn.id),
        relative_flux: f64::NAN,
    })
}

/// The flux of a row, treating NaN the same as a missing value
fn known_flux(record: &ResultRecord) -> Option<f64> {
    record.flux.filter(|f| !f.is_nan())
}
