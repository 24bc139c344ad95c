//! Module for reading and writing models, solutions and results
pub mod delimited;
pub mod gpr_parse;
pub mod json;
