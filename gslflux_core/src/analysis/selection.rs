//! Select the reactions of a model which involve allow listed metabolites
use crate::analysis::allow_list::AllowList;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::Reaction;
use tracing::debug;

/// Reactions with at least one metabolite in `allow_list`, in model order
///
/// The metabolite may take any role in the reaction, including a zero coefficient.
pub fn select_reactions<'m>(model: &'m Model, allow_list: &AllowList) -> Vec<&'m Reaction> {
    let selected: Vec<&Reaction> = model
        .reactions
        .values()
        .filter(|rxn| involves_any(rxn, allow_list))
        .collect();
    debug!(
        selected = selected.len(),
        total = model.reactions.len(),
        "selected reactions touching allow listed metabolites"
    );
    selected
}

/// Whether any metabolite of `reaction` is in `allow_list`
pub fn involves_any(reaction: &Reaction, allow_list: &AllowList) -> bool {
    reaction
        .metabolites
        .keys()
        .any(|met_id| allow_list.contains(met_id))
}
