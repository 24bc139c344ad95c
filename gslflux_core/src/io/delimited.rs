//! Module providing delimited (CSV) IO for solutions and results tables
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::analysis::tabulate::{ResultTable, TableError};
use crate::solution::{Solution, SolutionError};
use indexmap::IndexMap;
use tracing::{debug, info};

impl Solution {
    /// Read a solution from a csv file of reaction ids and fluxes
    ///
    /// The first row is a header and is skipped. Each following row holds a reaction id in
    /// the first column and its flux in the second, which is the layout of a flux series
    /// written by pandas. Rows with an empty flux are left out of the solution.
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Solution, SolutionError> {
        let file = File::open(path)?;
        Solution::from_csv_reader(file)
    }

    /// Read a solution from any csv source, see [`Solution::read_csv`]
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Solution, SolutionError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut fluxes: IndexMap<String, f64> = IndexMap::new();
        for row in csv_reader.records() {
            let row = row?;
            let reaction_id = row.get(0).unwrap_or_default();
            let value = row.get(1).unwrap_or_default();
            if reaction_id.is_empty() || value.is_empty() {
                debug!(reaction = reaction_id, "skipping csv row without a flux");
                continue;
            }
            let flux: f64 = value.parse().map_err(|_| SolutionError::InvalidFlux {
                reaction_id: reaction_id.to_string(),
                value: value.to_string(),
            })?;
            fluxes.insert(reaction_id.to_string(), flux);
        }
        Ok(Solution::from_fluxes(fluxes))
    }
}

impl ResultTable {
    /// Write the table to a csv file, replacing any existing file
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), TableError> {
        let file = File::create(path.as_ref())?;
        self.write_csv_to(file)?;
        info!("results table written to: {}", path.as_ref().display());
        Ok(())
    }

    /// Render the table as a csv string
    pub fn to_csv_string(&self) -> Result<String, TableError> {
        let mut buffer: Vec<u8> = Vec::new();
        self.write_csv_to(&mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    fn write_csv_to<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        if self.is_empty() {
            // Serializing no records would write no header either
            csv_writer.write_record(RESULT_COLUMNS)?;
        }
        for record in self {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Column names of the results table
pub const RESULT_COLUMNS: [&str; 7] = [
    "Reaction ID",
    "Reactants",
    "Products",
    "Key Product",
    "Genes",
    "Flux (mmol/gDW/hr)",
    "Relative GSL Flux (%)",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::allow_list::AllowList;
    use crate::analysis::tabulate::tabulate_model_results;
    use crate::metabolic_model::model::Model;
    use std::path::PathBuf;

    fn data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_data")
    }

    #[test]
    fn read_pandas_flux_series() {
        let solution =
            Solution::read_csv(data_dir().join("test_solutions").join("gsl_toy_fluxes.csv"))
                .unwrap();
        assert_eq!(solution.fluxes.len(), 5);
        assert_eq!(solution.flux("MAR00902"), Some(15.0));
        assert_eq!(solution.fluxes.keys().next().unwrap(), "MAR00901");
    }

    #[test]
    fn empty_flux_rows_are_skipped() {
        let data = "reaction,flux\nR1,1.5\nR2,\nR3,-2\n";
        let solution = Solution::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(solution.flux("R1"), Some(1.5));
        assert_eq!(solution.flux("R2"), None);
        assert_eq!(solution.flux("R3"), Some(-2.0));
    }

    #[test]
    fn invalid_flux() {
        let data = "reaction,flux\nR1,lots\n";
        match Solution::from_csv_reader(data.as_bytes()) {
            Err(SolutionError::InvalidFlux { reaction_id, value }) => {
                assert_eq!(reaction_id, "R1");
                assert_eq!(value, "lots");
            }
            other => panic!("Expected an invalid flux error, got {:?}", other),
        }
    }

    #[test]
    fn table_csv() {
        let model =
            Model::read_json(data_dir().join("test_models").join("gsl_toy.json")).unwrap();
        let solution = Solution::read_json(
            data_dir()
                .join("test_solutions")
                .join("gsl_toy_solution.json"),
        )
        .unwrap();
        let table = tabulate_model_results(&model, &solution, &AllowList::gsl());
        let csv_string = table.to_csv_string().unwrap();
        let mut lines = csv_string.lines();
        assert_eq!(lines.next().unwrap(), RESULT_COLUMNS.join(","));
        assert_eq!(
            lines.next().unwrap(),
            "MAR00902,\"MAM02015g (GM3), MAM03106g (UDP-N-acetylgalactosamine)\",\
             \"MAM02011g (GM2), MAM03104g (UDP)\",GM2,ENSG00000135454,15.0,75.0"
        );
        assert_eq!(csv_string.lines().count(), 4);

        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("results.csv");
        table.write_csv(&out_path).unwrap();
        assert_eq!(std::fs::read_to_string(&out_path).unwrap(), csv_string);
    }

    #[test]
    fn missing_flux_is_an_empty_field() {
        let model =
            Model::read_json(data_dir().join("test_models").join("gsl_toy.json")).unwrap();
        let mut solution = Solution::read_json(
            data_dir()
                .join("test_solutions")
                .join("gsl_toy_solution.json"),
        )
        .unwrap();
        solution.fluxes.shift_remove("MAR00903");
        let table = tabulate_model_results(&model, &solution, &AllowList::gsl());
        let csv_string = table.to_csv_string().unwrap();

        // Rows without a flux sort last, with no flux and a NaN share
        let last = csv_string.lines().last().unwrap();
        assert!(last.starts_with("MAR00903,"));
        assert!(last.ends_with(",\"ENSG00000111728, ENSG00000115525\",,NaN"));
    }

    #[test]
    fn empty_table_still_has_header() {
        let table = ResultTable::default();
        assert_eq!(
            table.to_csv_string().unwrap().trim_end(),
            RESULT_COLUMNS.join(",")
        );
    }
}
