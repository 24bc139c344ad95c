//! Core rust implementation of gslflux, a crate for post-processing the flux through
//! glycosphingolipid metabolism in a solved genome scale metabolic model.
#![allow(unused)]

pub mod analysis;
pub mod io;
pub mod metabolic_model;
pub mod solution;
mod utils;
