//! Post-processing of a solved model: tabulating, plotting and graphing flux through the
//! allow listed metabolites
pub mod allow_list;
pub mod network;
pub mod plot;
pub mod selection;
pub mod tabulate;
