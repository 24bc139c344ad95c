//! Module for parsing Gene Protein Reaction strings into AST values

use crate::io::gpr_parse::lexer::LexerError;
use crate::io::gpr_parse::parser::ParseError;
use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::model::Gpr;
use indexmap::IndexMap;
use thiserror::Error;

mod lexer;
pub mod parser;
mod token;

/// Parse a Gene Protein Reaction string into a GPR Tree
///
/// # Parameters
/// - `input`: &str representing the gene protein reaction rule
/// - `gene_map`: map of gene id strings to genes, any gene not yet in the map is added
///
/// # Returns
/// Parse result which is
/// - `Ok`: The root node of the GPR tree
/// - `Err`: Returns the GprParseError describing the issue with the GPR rule which
///     was being parsed.
///
/// # Examples
/// ```rust
/// use indexmap::IndexMap;
/// use gslflux_core::io::gpr_parse::parse_gpr;
/// let gpr: &str = "ENSG00000128274 or ENSG00000115525";
/// let mut gene_map = IndexMap::new();
/// let gpr_tree = parse_gpr(gpr, &mut gene_map).unwrap();
/// assert_eq!(gene_map.len(), 2);
/// ```
pub fn parse_gpr(input: &str, gene_map: &mut IndexMap<String, Gene>) -> Result<Gpr, GprParseError> {
    // Convert the GPR string into tokens
    let mut lexer = lexer::Lexer::new(input);
    let tokens = lexer.lex()?;

    // Now parse those tokens into a GPR tree
    let mut parser = parser::GPRParser::new(tokens, gene_map);
    let gpr = parser.parse()?;
    Ok(gpr)
}

/// Enum representing possible lex and parse errors
#[derive(Debug, Error)]
pub enum GprParseError {
    /// Lexing Error
    #[error("Error occurred during lexing (conversion of GPR string to tokens)")]
    LexingError(#[from] LexerError),
    /// Parsing Error
    #[error("Error occurred during parsing (conversion of tokens to GPR tree)")]
    ParsingError(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use crate::io::gpr_parse::{parse_gpr, GprParseError};
    use crate::metabolic_model::gene::Gene;
    use crate::metabolic_model::model::{Gpr, GprOperation};
    use indexmap::IndexMap;

    #[test]
    fn test_parse_gpr() {
        let gpr = "Rv0001 and (Rv0002 or Rv0003)";
        let mut gene_map: IndexMap<String, Gene> = IndexMap::new();
        gene_map.insert("Rv0001".to_string(), Gene::from_id("Rv0001"));
        let gpr_tree = parse_gpr(gpr, &mut gene_map).unwrap();
        match gpr_tree {
            Gpr::Operation(GprOperation::And { left, right }) => {
                assert_eq!(*left, Gpr::GeneNode("Rv0001".to_string()));
                match *right {
                    Gpr::Operation(GprOperation::Or { left, right }) => {
                        assert_eq!(*left, Gpr::GeneNode("Rv0002".to_string()));
                        assert_eq!(*right, Gpr::GeneNode("Rv0003".to_string()));
                    }
                    _ => panic!("Incorrect Parse"),
                }
            }
            _ => panic!("Incorrect operation"),
        }
        // The genes which weren't already present were added
        assert_eq!(
            gene_map.keys().collect::<Vec<_>>(),
            vec!["Rv0001", "Rv0002", "Rv0003"]
        );
    }

    #[test]
    fn errors_are_wrapped() {
        let mut gene_map = IndexMap::new();
        assert!(matches!(
            parse_gpr("Rv0001 | Rv0002", &mut gene_map),
            Err(GprParseError::LexingError(_))
        ));
        assert!(matches!(
            parse_gpr("(Rv0001", &mut gene_map),
            Err(GprParseError::ParsingError(_))
        ));
    }
}
