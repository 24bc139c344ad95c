//! Directed flux network between allow listed metabolites and the reactions which touch
//! them, rendered as an interactive vis-network page
use std::path::{Path, PathBuf};

use crate::analysis::allow_list::AllowList;
use crate::analysis::selection::select_reactions;
use crate::metabolic_model::model::Model;
use crate::solution::Solution;
use crate::utils::number_format::format_general;
use derive_builder::Builder;
use indexmap::IndexMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_FILE_PATH: &str = "./flux_network_graph.html";
pub const DEFAULT_HEIGHT: &str = "600px";
pub const DEFAULT_WIDTH: &str = "800px";
pub const DEFAULT_METABOLITE_COLOR: &str = "#F6A6B2";
pub const DEFAULT_REACTION_COLOR: &str = "#AED6F1";

const METABOLITE_NODE_SIZE: f64 = 20.;
const REACTION_NODE_MIN_SIZE: f64 = 10.;
const EDGE_MIN_VALUE: f64 = 1.;
const FLUX_SCALE: f64 = 40.;

const VIS_NETWORK_JS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/vis-network/9.1.2/dist/vis-network.min.js";
const VIS_NETWORK_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/vis-network/9.1.2/dist/dist/vis-network.min.css";

/// Options controlling the look of the network and where it is written
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct NetworkOptions {
    /// Path of the html file to write, overwritten if it exists
    #[builder(default = "PathBuf::from(DEFAULT_FILE_PATH)", setter(into))]
    pub file_path: PathBuf,
    /// CSS height of the network canvas, any single CSS value
    #[builder(default = "DEFAULT_HEIGHT.to_string()", setter(into))]
    pub height: String,
    /// CSS width of the network canvas
    #[builder(default = "DEFAULT_WIDTH.to_string()", setter(into))]
    pub width: String,
    #[builder(default = "DEFAULT_METABOLITE_COLOR.to_string()", setter(into))]
    pub metabolite_color: String,
    #[builder(default = "DEFAULT_REACTION_COLOR.to_string()", setter(into))]
    pub reaction_color: String,
}

impl NetworkOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("height", &self.height),
            ("width", &self.width),
            ("metabolite_color", &self.metabolite_color),
            ("reaction_color", &self.reaction_color),
        ] {
            if let Some(value) = value {
                if !is_css_value(value) {
                    return Err(format!(
                        "{} must be a single CSS value, got {:?}",
                        field, value
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Default for NetworkOptions {
    fn default() -> Self {
        NetworkOptions {
            file_path: PathBuf::from(DEFAULT_FILE_PATH),
            height: DEFAULT_HEIGHT.to_string(),
            width: DEFAULT_WIDTH.to_string(),
            metabolite_color: DEFAULT_METABOLITE_COLOR.to_string(),
            reaction_color: DEFAULT_REACTION_COLOR.to_string(),
        }
    }
}

/// A non-empty value which can't end its CSS declaration or the surrounding markup
///
/// Values are written into the page as is, so anything valid in CSS is accepted, e.g.
/// `600px`, `auto` or `calc(100% - 20px)`.
fn is_css_value(value: &str) -> bool {
    !value.trim().is_empty()
        && !value
            .chars()
            .any(|c| matches!(c, ';' | '{' | '}' | '<' | '>' | '"' | '\'') || c.is_control())
}

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("No reactions involve the allow listed metabolites")]
    NoReactions,
    #[error("Invalid network options")]
    OptionsError(#[from] NetworkOptionsBuilderError),
    #[error("Unable to write network html")]
    UnableToWrite(#[from] std::io::Error),
    #[error("Unable to serialize network")]
    UnableToSerialize(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Metabolite,
    Reaction,
}

/// A metabolite or reaction node in the flux network
#[derive(Clone, Debug, PartialEq)]
pub struct FluxNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub color: String,
    pub size: f64,
}

/// An edge in the flux network, weighted by the scaled flux of its reaction
#[derive(Clone, Debug, PartialEq)]
pub struct FluxEdge {
    pub value: f64,
    /// Hover text, `flux=<flux>`
    pub title: String,
}

/// Directed graph of metabolite and reaction nodes, with node lookup by id
#[derive(Clone, Debug, Default)]
pub struct FluxGraph {
    graph: DiGraph<FluxNode, FluxEdge>,
    index: IndexMap<String, NodeIndex>,
}

impl FluxGraph {
    /// Add a node, replacing the attributes of an existing node with the same id
    fn add_node(&mut self, node: FluxNode) -> NodeIndex {
        match self.index.get(&node.id) {
            Some(&idx) => {
                self.graph[idx] = node;
                idx
            }
            None => {
                let id = node.id.clone();
                let idx = self.graph.add_node(node);
                self.index.insert(id, idx);
                idx
            }
        }
    }

    /// Add an edge between two existing nodes, returns false if either node is missing
    fn add_edge(&mut self, source: &str, target: &str, edge: FluxEdge) -> bool {
        match (self.index.get(source), self.index.get(target)) {
            (Some(&a), Some(&b)) => {
                self.graph.update_edge(a, b, edge);
                true
            }
            _ => false,
        }
    }

    pub fn node(&self, id: &str) -> Option<&FluxNode> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &FluxNode> {
        self.index.values().map(move |&idx| &self.graph[idx])
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&FluxEdge> {
        let a = *self.index.get(source)?;
        let b = *self.index.get(target)?;
        self.graph
            .find_edge(a, b)
            .map(|edge_idx| &self.graph[edge_idx])
    }

    /// Edges as (source id, target id, edge)
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &FluxEdge)> {
        self.graph.edge_references().map(move |edge| {
            (
                self.graph[edge.source()].id.as_str(),
                self.graph[edge.target()].id.as_str(),
                edge.weight(),
            )
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The underlying petgraph graph
    pub fn graph(&self) -> &DiGraph<FluxNode, FluxEdge> {
        &self.graph
    }
}

/// Build the flux network for the reactions touching `allow_list`
///
/// Every allow listed metabolite in the model becomes a node. Each selected reaction
/// becomes a node sized by its absolute flux relative to the largest absolute flux, with
/// edges into it from the allow listed metabolites it consumes and out of it to the rest.
/// A reaction missing from the solution is treated as carrying no flux.
pub fn build_flux_graph(
    model: &Model,
    solution: &Solution,
    allow_list: &AllowList,
    options: &NetworkOptions,
) -> Result<FluxGraph, NetworkError> {
    let reactions = select_reactions(model, allow_list);
    if reactions.is_empty() {
        return Err(NetworkError::NoReactions);
    }

    let mut graph = FluxGraph::default();
    for met_id in allow_list.iter() {
        match model.metabolites.get(met_id) {
            Some(met) => {
                graph.add_node(FluxNode {
                    id: met.id.clone(),
                    label: met.name_or_empty().to_string(),
                    kind: NodeKind::Metabolite,
                    color: options.metabolite_color.clone(),
                    size: METABOLITE_NODE_SIZE,
                });
            }
            None => debug!(metabolite = %met_id, "allow listed metabolite not in model"),
        }
    }

    let max_abs_flux = reactions
        .iter()
        .map(|rxn| solution.flux_or_zero(&rxn.id).abs())
        .fold(0f64, f64::max);
    let max_abs_flux = if max_abs_flux == 0f64 {
        1f64
    } else {
        max_abs_flux
    };

    for rxn in reactions {
        let flux = solution.flux_or_zero(&rxn.id);
        let scaled = flux.abs() / max_abs_flux;
        let genes = rxn.gene_ids();
        let label = if genes.is_empty() {
            rxn.id.clone()
        } else {
            genes.join(",")
        };
        graph.add_node(FluxNode {
            id: rxn.id.clone(),
            label,
            kind: NodeKind::Reaction,
            color: options.reaction_color.clone(),
            size: scaled * FLUX_SCALE + REACTION_NODE_MIN_SIZE,
        });

        for (met_id, coef) in rxn.metabolites.iter() {
            if !allow_list.contains(met_id) {
                continue;
            }
            let edge = FluxEdge {
                value: scaled * FLUX_SCALE + EDGE_MIN_VALUE,
                title: format!("flux={}", format_general(flux, 3)),
            };
            let added = if *coef < 0f64 {
                graph.add_edge(met_id, &rxn.id, edge)
            } else {
                graph.add_edge(&rxn.id, met_id, edge)
            };
            if !added {
                debug!(reaction = %rxn.id, metabolite = %met_id, "skipping edge to metabolite without a node");
            }
        }
    }

    Ok(graph)
}

#[derive(Serialize)]
struct VisNode<'a> {
    id: &'a str,
    label: &'a str,
    color: &'a str,
    size: f64,
    shape: &'static str,
}

#[derive(Serialize)]
struct VisEdge<'a> {
    from: &'a str,
    to: &'a str,
    value: f64,
    title: &'a str,
    arrows: &'static str,
}

/// Render the network as a standalone html page
///
/// The page loads vis-network from a CDN, so viewing it requires network access.
pub fn render_html(graph: &FluxGraph, options: &NetworkOptions) -> Result<String, NetworkError> {
    let nodes: Vec<VisNode> = graph
        .nodes()
        .map(|node| VisNode {
            id: &node.id,
            label: &node.label,
            color: &node.color,
            size: node.size,
            shape: "dot",
        })
        .collect();
    let edges: Vec<VisEdge> = graph
        .edges()
        .map(|(from, to, edge)| VisEdge {
            from,
            to,
            value: edge.value,
            title: &edge.title,
            arrows: "to",
        })
        .collect();
    let vis_options = json!({
        "edges": {
            "arrows": {"to": {"enabled": true}},
            "color": {"inherit": true},
            "smooth": {"enabled": true, "type": "dynamic"}
        },
        "interaction": {"dragNodes": true, "hideEdgesOnDrag": false, "hideNodesOnDrag": false},
        "physics": {
            "enabled": true,
            "solver": "forceAtlas2Based",
            "forceAtlas2Based": {
                "gravitationalConstant": -50,
                "centralGravity": 0.01,
                "springLength": 200,
                "springConstant": 0.08,
                "damping": 0.4,
                "avoidOverlap": 0
            },
            "stabilization": {"enabled": true, "iterations": 1000}
        }
    });

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<link rel="stylesheet" href="{css}" crossorigin="anonymous" referrerpolicy="no-referrer" />
<script src="{js}" crossorigin="anonymous" referrerpolicy="no-referrer"></script>
<style type="text/css">
#mynetwork {{
    width: {width};
    height: {height};
    background-color: #ffffff;
    border: 1px solid lightgray;
    position: relative;
    float: left;
}}
</style>
</head>
<body>
<div id="mynetwork"></div>
<script type="text/javascript">
var nodes = new vis.DataSet({nodes});
var edges = new vis.DataSet({edges});
var container = document.getElementById("mynetwork");
var data = {{nodes: nodes, edges: edges}};
var options = {options};
var network = new vis.Network(container, data, options);
</script>
</body>
</html>
"#,
        css = VIS_NETWORK_CSS,
        js = VIS_NETWORK_JS,
        width = options.width,
        height = options.height,
        nodes = script_json(&nodes)?,
        edges = script_json(&edges)?,
        options = script_json(&vis_options)?,
    ))
}

/// Serialize to JSON which is safe to embed in a script element
fn script_json<T: Serialize>(value: &T) -> Result<String, NetworkError> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Build the flux network and write it to `options.file_path` as html
///
/// Returns the path written to.
pub fn visualise_flux_network(
    model: &Model,
    solution: &Solution,
    allow_list: &AllowList,
    options: &NetworkOptions,
) -> Result<PathBuf, NetworkError> {
    let graph = build_flux_graph(model, solution, allow_list, options)?;
    let html = render_html(&graph, options)?;
    write_html(&options.file_path, &html)?;
    info!("html file written to: {}", options.file_path.display());
    Ok(options.file_path.clone())
}

fn write_html(path: &Path, html: &str) -> Result<(), NetworkError> {
    std::fs::write(path, html)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::metabolite::MetaboliteBuilder;
    use crate::metabolic_model::reaction::ReactionBuilder;
    use std::path::PathBuf;

    fn toy_inputs() -> (Model, Solution) {
        let data_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_data");
        let model = Model::read_json(data_dir.join("test_models").join("gsl_toy.json")).unwrap();
        let solution = Solution::read_json(
            data_dir
                .join("test_solutions")
                .join("gsl_toy_solution.json"),
        )
        .unwrap();
        (model, solution)
    }

    fn small_model() -> Model {
        let mut model = Model::new_empty();
        model.add_metabolite(
            MetaboliteBuilder::default()
                .id("MAM02015g".to_string())
                .name(Some("GM3".to_string()))
                .build()
                .unwrap(),
        );
        let mut metabolites = IndexMap::new();
        metabolites.insert("MAM_missing".to_string(), -1.0);
        metabolites.insert("MAM02015g".to_string(), 1.0);
        model.add_reaction(
            ReactionBuilder::default()
                .id("R_gm3".to_string())
                .metabolites(metabolites)
                .build()
                .unwrap(),
        );
        model
    }

    #[test]
    fn toy_network() {
        let (model, solution) = toy_inputs();
        let graph =
            build_flux_graph(&model, &solution, &AllowList::gsl(), &NetworkOptions::default())
                .unwrap();

        // LacCer, GM3, GM2 and GD3 plus four reactions
        assert_eq!(graph.node_count(), 8);
        assert_eq!(graph.edge_count(), 7);

        let lac_cer = graph.node("MAM02328g").unwrap();
        assert_eq!(lac_cer.kind, NodeKind::Metabolite);
        assert_eq!(lac_cer.label, "LacCer pool");
        assert_eq!(lac_cer.size, 20.0);
        assert_eq!(lac_cer.color, DEFAULT_METABOLITE_COLOR);
        assert!(graph.node("MAM01592g").is_none());

        let gm2_synthesis = graph.node("MAR00902").unwrap();
        assert_eq!(gm2_synthesis.kind, NodeKind::Reaction);
        assert_eq!(gm2_synthesis.label, "ENSG00000135454");
        assert_eq!(gm2_synthesis.size, 50.0);
        assert_eq!(gm2_synthesis.color, DEFAULT_REACTION_COLOR);
        assert_eq!(
            graph.node("MAR00903").unwrap().label,
            "ENSG00000111728,ENSG00000115525"
        );
        assert_eq!(graph.node("MAR00903").unwrap().size, 10.0);
        assert_eq!(graph.node("MAR00904").unwrap().label, "MAR00904");

        let consumed = graph.edge("MAM02015g", "MAR00902").unwrap();
        assert_eq!(consumed.value, 41.0);
        assert_eq!(consumed.title, "flux=15");
        let produced = graph.edge("MAR00902", "MAM02011g").unwrap();
        assert_eq!(produced.value, 41.0);
        assert!(graph.edge("MAM02011g", "MAR00902").is_none());
        assert!(graph.edge("MAM02011g", "MAR00904").is_some());
        assert_eq!(graph.edge("MAR00901", "MAM02015g").unwrap().title, "flux=5");
    }

    #[test]
    fn unnamed_metabolite_has_empty_label() {
        let mut model = small_model();
        model.add_metabolite(
            MetaboliteBuilder::default()
                .id("MAM02011g".to_string())
                .build()
                .unwrap(),
        );
        let allow_list = AllowList::new(["MAM02015g", "MAM02011g"]);
        let solution: Solution = vec![("R_gm3".to_string(), 2.0)].into_iter().collect();
        let graph =
            build_flux_graph(&model, &solution, &allow_list, &NetworkOptions::default()).unwrap();
        assert_eq!(graph.node("MAM02011g").unwrap().label, "");
        assert_eq!(graph.node("MAM02015g").unwrap().label, "GM3");
    }

    #[test]
    fn missing_metabolite_has_no_node_or_edge() {
        let model = small_model();
        let allow_list = AllowList::new(["MAM_missing", "MAM02015g"]);
        let solution: Solution = vec![("R_gm3".to_string(), 2.0)].into_iter().collect();
        let graph =
            build_flux_graph(&model, &solution, &allow_list, &NetworkOptions::default()).unwrap();

        assert_eq!(graph.node_count(), 2);
        assert!(graph.node("MAM_missing").is_none());
        assert_eq!(graph.edge_count(), 1);
        let edges: Vec<(&str, &str)> = graph.edges().map(|(a, b, _)| (a, b)).collect();
        assert_eq!(edges, vec![("R_gm3", "MAM02015g")]);
    }

    #[test]
    fn zero_flux_gives_minimum_sizes() {
        let (model, _) = toy_inputs();
        let solution: Solution = model
            .reactions
            .keys()
            .map(|id| (id.clone(), 0.0))
            .collect();
        let graph =
            build_flux_graph(&model, &solution, &AllowList::gsl(), &NetworkOptions::default())
                .unwrap();
        for node in graph.nodes().filter(|n| n.kind == NodeKind::Reaction) {
            assert_eq!(node.size, 10.0);
        }
        for (_, _, edge) in graph.edges() {
            assert_eq!(edge.value, 1.0);
            assert_eq!(edge.title, "flux=0");
        }
    }

    #[test]
    fn missing_flux_counts_as_zero() {
        let model = small_model();
        let graph = build_flux_graph(
            &model,
            &Solution::from_fluxes(IndexMap::new()),
            &AllowList::gsl(),
            &NetworkOptions::default(),
        )
        .unwrap();
        assert_eq!(graph.node("R_gm3").unwrap().size, 10.0);
    }

    #[test]
    fn no_reactions() {
        let model = small_model();
        let err = build_flux_graph(
            &model,
            &Solution::from_fluxes(IndexMap::new()),
            &AllowList::new(["MAM01947g"]),
            &NetworkOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, NetworkError::NoReactions));
    }

    #[test]
    fn options() {
        let options = NetworkOptionsBuilder::default().build().unwrap();
        assert_eq!(options, NetworkOptions::default());
        assert_eq!(options.file_path, PathBuf::from("./flux_network_graph.html"));

        let options = NetworkOptionsBuilder::default()
            .height("100%")
            .width("1200px")
            .reaction_color("#000000")
            .build()
            .unwrap();
        assert_eq!(options.height, "100%");
        assert_eq!(options.metabolite_color, DEFAULT_METABOLITE_COLOR);

        for length in ["calc(100% - 20px)", "auto", "50vmin", "100%"] {
            let options = NetworkOptionsBuilder::default()
                .width(length)
                .build()
                .unwrap();
            assert_eq!(options.width, length);
        }
        assert!(NetworkOptionsBuilder::default()
            .height("600px; background: red")
            .build()
            .is_err());
        assert!(NetworkOptionsBuilder::default()
            .height("600px}</style><script>")
            .build()
            .is_err());
        assert!(NetworkOptionsBuilder::default().width("").build().is_err());
        assert!(NetworkOptionsBuilder::default()
            .metabolite_color(" ")
            .build()
            .is_err());
    }

    #[test]
    fn writes_html() {
        let (model, solution) = toy_inputs();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network.html");
        let options = NetworkOptionsBuilder::default()
            .file_path(path.clone())
            .height("500px")
            .build()
            .unwrap();
        let written =
            visualise_flux_network(&model, &solution, &AllowList::gsl(), &options).unwrap();
        assert_eq!(written, path);

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("vis-network.min.js"));
        assert!(html.contains("height: 500px;"));
        assert!(html.contains("width: 800px;"));
        assert!(html.contains("\"solver\":\"forceAtlas2Based\""));
        assert!(html.contains("\"gravitationalConstant\":-50"));
        assert!(html.contains("\"springLength\":200"));
        assert!(html.contains("\"id\":\"MAR00902\""));
        assert!(html.contains("\"title\":\"flux=15\""));
    }

    #[test]
    fn script_json_is_escaped() {
        let escaped = script_json(&json!({"label": "</script>"})).unwrap();
        assert!(!escaped.contains("</script>"));
    }
}
