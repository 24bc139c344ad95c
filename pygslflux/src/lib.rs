use std::error::Error;
use std::path::PathBuf;

use gslflux_core::analysis::allow_list::AllowList;
use gslflux_core::analysis::network::{
    NetworkOptionsBuilder, DEFAULT_FILE_PATH, DEFAULT_HEIGHT, DEFAULT_METABOLITE_COLOR,
    DEFAULT_REACTION_COLOR, DEFAULT_WIDTH,
};
use gslflux_core::analysis::plot::plot_model_results as plot_table;
use gslflux_core::analysis::tabulate::{
    tabulate_model_results as tabulate, ResultRecord, ResultTable,
};
use gslflux_core::io::delimited::RESULT_COLUMNS;
use gslflux_core::metabolic_model::model::Model;
use gslflux_core::solution::Solution;
use indexmap::IndexMap;
use pyo3::exceptions::{PyIOError, PyKeyError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Error message including the chain of underlying causes
fn error_message(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn value_error(err: &dyn Error) -> PyErr {
    PyValueError::new_err(error_message(err))
}

#[pyclass(name = "Model")]
struct PyModel {
    inner: Model,
}

#[pymethods]
impl PyModel {
    /// Read a model from a COBRA JSON file
    #[staticmethod]
    fn read_json(path: PathBuf) -> PyResult<Self> {
        let inner = Model::read_json(&path).map_err(|e| value_error(&e))?;
        Ok(PyModel { inner })
    }

    #[getter]
    fn id(&self) -> Option<String> {
        self.inner.id.clone()
    }

    #[getter]
    fn reaction_ids(&self) -> Vec<String> {
        self.inner.reactions.keys().cloned().collect()
    }

    #[getter]
    fn metabolite_ids(&self) -> Vec<String> {
        self.inner.metabolites.keys().cloned().collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "Model(id={:?}, reactions={}, metabolites={}, genes={})",
            self.inner.id.as_deref().unwrap_or(""),
            self.inner.reactions.len(),
            self.inner.metabolites.len(),
            self.inner.genes.len()
        )
    }
}

#[pyclass(name = "Solution")]
struct PySolution {
    inner: Solution,
}

#[pymethods]
impl PySolution {
    /// Read a solution from JSON, either a full solution or a bare map of fluxes
    #[staticmethod]
    fn read_json(path: PathBuf) -> PyResult<Self> {
        let inner = Solution::read_json(&path).map_err(|e| value_error(&e))?;
        Ok(PySolution { inner })
    }

    /// Read fluxes from a csv of reaction ids and fluxes, such as a saved pandas Series
    #[staticmethod]
    fn read_csv(path: PathBuf) -> PyResult<Self> {
        let inner = Solution::read_csv(&path).map_err(|e| value_error(&e))?;
        Ok(PySolution { inner })
    }

    /// Create a solution from a dict of reaction ids to fluxes
    #[staticmethod]
    fn from_fluxes(fluxes: &Bound<'_, PyDict>) -> PyResult<Self> {
        let mut map: IndexMap<String, f64> = IndexMap::with_capacity(fluxes.len());
        for (key, value) in fluxes.iter() {
            map.insert(key.extract()?, value.extract()?);
        }
        Ok(PySolution {
            inner: Solution::from_fluxes(map),
        })
    }

    fn flux(&self, reaction_id: &str) -> Option<f64> {
        self.inner.flux(reaction_id)
    }

    #[getter]
    fn objective_value(&self) -> Option<f64> {
        self.inner.objective_value
    }

    #[getter]
    fn status(&self) -> String {
        format!("{:?}", self.inner.status)
    }

    fn __len__(&self) -> usize {
        self.inner.fluxes.len()
    }
}

/// Results table, one row per reaction producing a glycosphingolipid
#[pyclass(name = "ResultTable")]
struct PyResultTable {
    inner: ResultTable,
}

#[pymethods]
impl PyResultTable {
    /// Build a table from a list of row dicts, as returned by `to_records`
    #[staticmethod]
    fn from_records(records: &Bound<'_, PyAny>) -> PyResult<Self> {
        Ok(PyResultTable {
            inner: table_from_records(records)?,
        })
    }

    /// Rows as dicts keyed by column name
    fn to_records<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyDict>>> {
        self.inner
            .iter()
            .map(|record| record_to_dict(py, record))
            .collect()
    }

    fn to_csv(&self) -> PyResult<String> {
        self.inner.to_csv_string().map_err(|e| value_error(&e))
    }

    fn write_csv(&self, path: PathBuf) -> PyResult<()> {
        self.inner
            .write_csv(&path)
            .map_err(|e| PyIOError::new_err(error_message(&e)))
    }

    #[getter]
    fn columns(&self) -> Vec<&'static str> {
        RESULT_COLUMNS.to_vec()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

fn record_to_dict<'py>(py: Python<'py>, record: &ResultRecord) -> PyResult<Bound<'py, PyDict>> {
    let [id_col, reactants_col, products_col, key_col, genes_col, flux_col, relative_col] =
        RESULT_COLUMNS;
    let row = PyDict::new(py);
    row.set_item(id_col, &record.reaction_id)?;
    row.set_item(reactants_col, &record.reactants)?;
    row.set_item(products_col, &record.products)?;
    row.set_item(key_col, &record.key_product)?;
    row.set_item(genes_col, &record.genes)?;
    row.set_item(flux_col, record.flux)?;
    row.set_item(relative_col, record.relative_flux)?;
    Ok(row)
}

fn field<'py, T: FromPyObject<'py>>(row: &Bound<'py, PyDict>, column: &str) -> PyResult<T> {
    row.get_item(column)?
        .ok_or_else(|| PyKeyError::new_err(column.to_string()))?
        .extract()
}

fn record_from_dict(row: &Bound<'_, PyDict>) -> PyResult<ResultRecord> {
    let [id_col, reactants_col, products_col, key_col, genes_col, flux_col, relative_col] =
        RESULT_COLUMNS;
    Ok(ResultRecord {
        reaction_id: field(row, id_col)?,
        reactants: field(row, reactants_col)?,
        products: field(row, products_col)?,
        key_product: field(row, key_col)?,
        genes: field(row, genes_col)?,
        flux: field(row, flux_col)?,
        relative_flux: field(row, relative_col)?,
    })
}

/// Rows in the order given, from any iterable of row dicts
fn table_from_records(records: &Bound<'_, PyAny>) -> PyResult<ResultTable> {
    records
        .try_iter()?
        .map(|row| record_from_dict(row?.downcast::<PyDict>()?))
        .collect()
}

/// Tabulate the flux into glycosphingolipids, one row per reaction, sorted by flux
#[pyfunction]
fn tabulate_model_results(model: &PyModel, sol: &PySolution) -> PyResultTable {
    PyResultTable {
        inner: tabulate(&model.inner, &sol.inner, &AllowList::gsl()),
    }
}

/// Plot the relative glycosphingolipid flux of a results table by key product and by
/// gene, returning the figure as html
///
/// `data` is a `ResultTable` or an iterable of row dicts, so filtered or edited rows can be
/// plotted. The html is also written to `file_path` when one is given.
#[pyfunction]
#[pyo3(signature = (data, file_path = None))]
fn plot_model_results(data: &Bound<'_, PyAny>, file_path: Option<PathBuf>) -> PyResult<String> {
    let plot = match data.downcast::<PyResultTable>() {
        Ok(table) => plot_table(&table.borrow().inner),
        Err(_) => plot_table(&table_from_records(data)?),
    }
    .map_err(|e| value_error(&e))?;
    let html = plot.to_html();
    if let Some(path) = file_path {
        std::fs::write(&path, &html).map_err(|e| PyIOError::new_err(e.to_string()))?;
        info!("plot written to: {}", path.display());
    }
    Ok(html)
}

/// Write an interactive network of glycosphingolipid metabolites and the reactions
/// between them, returning the path of the html file
#[pyfunction]
#[pyo3(signature = (
    model,
    solution,
    file_path = PathBuf::from(DEFAULT_FILE_PATH),
    height = DEFAULT_HEIGHT,
    width = DEFAULT_WIDTH,
    met_col = DEFAULT_METABOLITE_COLOR,
    rxn_col = DEFAULT_REACTION_COLOR,
))]
fn visualise_flux_network(
    model: &PyModel,
    solution: &PySolution,
    file_path: PathBuf,
    height: &str,
    width: &str,
    met_col: &str,
    rxn_col: &str,
) -> PyResult<PathBuf> {
    let options = NetworkOptionsBuilder::default()
        .file_path(file_path)
        .height(height)
        .width(width)
        .metabolite_color(met_col)
        .reaction_color(rxn_col)
        .build()
        .map_err(|e| value_error(&e))?;
    gslflux_core::analysis::network::visualise_flux_network(
        &model.inner,
        &solution.inner,
        &AllowList::gsl(),
        &options,
    )
    .map_err(|e| value_error(&e))
}

/// A Python module implemented in Rust. The name of this function must match
/// the `lib.name` setting in the `Cargo.toml`, else Python will not be able to
/// import the module.
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Another extension may already have installed a subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    m.add_class::<PyModel>()?;
    m.add_class::<PySolution>()?;
    m.add_class::<PyResultTable>()?;
    m.add_function(wrap_pyfunction!(tabulate_model_results, m)?)?;
    m.add_function(wrap_pyfunction!(plot_model_results, m)?)?;
    m.add_function(wrap_pyfunction!(visualise_flux_network, m)?)?;
    Ok(())
}
