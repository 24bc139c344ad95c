//! The set of metabolites whose reactions are reported on
use indexmap::IndexSet;

/// Glycosphingolipid metabolites of interest, as (metabolite id, common name)
///
/// Ids are from the Human-GEM namespace, all in the Golgi compartment.
pub const GSL_METABOLITES: [(&str, &str); 27] = [
    ("MAM01904g", "GA1"),
    ("MAM01905g", "GA2"),
    ("MAM01941g", "GD1a"),
    ("MAM01942g", "GD1alpha"),
    ("MAM01943g", "GD1b"),
    ("MAM01945g", "GD1c"),
    ("MAM01946g", "GD2"),
    ("MAM01947g", "GD3"),
    ("MAM01912g", "GB5"),
    ("MAM01959g", "GB4"),
    ("MAM01960g", "GB3"),
    ("MAM02008g", "GM1"),
    ("MAM02010g", "GM1b"),
    ("MAM02011g", "GM2"),
    ("MAM02015g", "GM3"),
    ("MAM02023g", "GQ1b"),
    ("MAM02025g", "GQ1c"),
    ("MAM02028g", "GT1a"),
    ("MAM02030g", "GT1b"),
    ("MAM02031g", "GT1c"),
    ("MAM02032g", "GT2"),
    ("MAM02033g", "GT3"),
    ("MAM02328g", "LacCer_Pool"),
    ("MAM02346g", "LC3"),
    ("MAM02347g", "LC4"),
    ("MAM02330g", "paragloboside"),
    ("MAM02904g", "sialylparagloboside"),
];

/// Ordered set of metabolite ids used to select reactions
///
/// The same list drives both the results table and the flux network, so it is built once
/// and passed to each of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllowList {
    ids: IndexSet<String>,
}

impl AllowList {
    /// Create an allow list from metabolite ids, duplicates are ignored
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AllowList {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// The glycosphingolipid allow list (see [`GSL_METABOLITES`])
    pub fn gsl() -> Self {
        AllowList::new(GSL_METABOLITES.iter().map(|(id, _)| *id))
    }

    pub fn contains(&self, metabolite_id: &str) -> bool {
        self.ids.contains(metabolite_id)
    }

    /// Metabolite ids in the order they were added
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Default for AllowList {
    fn default() -> Self {
        AllowList::gsl()
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        AllowList::new(iter)
    }
}

/// Common name of a glycosphingolipid metabolite id, if it is one of [`GSL_METABOLITES`]
pub fn gsl_common_name(metabolite_id: &str) -> Option<&'static str> {
    GSL_METABOLITES
        .iter()
        .find(|(id, _)| *id == metabolite_id)
        .map(|(_, name)| *name)
}
