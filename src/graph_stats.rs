// ==============================================================================
// graph_stats.rs - Graph Statistics Runner
// ==============================================================================
// Description: Loads ranked edge lists and computes per-node graph statistics
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{DataError, Result};
use crate::models::NodeId;
use crate::parsers::EdgeListParser;

/// Network loaded from an edge list.
///
/// Undirected networks store each edge once in the underlying `DiGraph` and
/// treat it as traversable both ways.
#[derive(Debug, Clone)]
pub struct NetworkGraph {
    graph: DiGraph<NodeId, f64>,
    node_indices: HashMap<NodeId, NodeIndex>,
    directed: bool,
}

impl NetworkGraph {
    pub fn new(directed: bool) -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
            directed,
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    /// Add an edge, or update the rank of an existing one. Returns true if the edge is new.
    ///
    /// Self-loops are the caller's concern; `load_graph` rejects them for directed graphs.
    pub fn add_edge(&mut self, source: &str, target: &str, rank: f64) -> bool {
        let a = self.ensure_node(source);
        let b = self.ensure_node(target);

        match self.find_edge(a, b) {
            Some(edge) => {
                self.graph[edge] = rank;
                false
            }
            None => {
                self.graph.add_edge(a, b, rank);
                true
            }
        }
    }

    /// Rank attribute of the edge between two nodes, if present
    pub fn rank(&self, source: &str, target: &str) -> Option<f64> {
        let a = *self.node_indices.get(source)?;
        let b = *self.node_indices.get(target)?;
        self.find_edge(a, b).map(|e| self.graph[e])
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.to_string());
        self.node_indices.insert(id.to_string(), idx);
        idx
    }

    fn find_edge(&self, a: NodeIndex, b: NodeIndex) -> Option<petgraph::graph::EdgeIndex> {
        self.graph.find_edge(a, b).or_else(|| {
            if self.directed {
                None
            } else {
                self.graph.find_edge(b, a)
            }
        })
    }

    fn name(&self, idx: NodeIndex) -> NodeId {
        self.graph[idx].clone()
    }

    /// Distinct successor and predecessor sets per node, indexed by `NodeIndex::index()`.
    /// For undirected graphs both are the full neighborhood.
    fn adjacency(&self) -> (Vec<HashSet<usize>>, Vec<HashSet<usize>>) {
        let n = self.graph.node_count();
        let mut succ = vec![HashSet::new(); n];
        let mut pred = vec![HashSet::new(); n];

        for edge in self.graph.raw_edges() {
            let (a, b) = (edge.source().index(), edge.target().index());
            succ[a].insert(b);
            pred[b].insert(a);
            if !self.directed {
                succ[b].insert(a);
                pred[a].insert(b);
            }
        }

        (succ, pred)
    }
}

/// Load an edge list (`source target rank` per line)
///
/// # Arguments
/// * `path` - Edge list file
/// * `directed` - Build a directed graph; self-loops are then rejected
///
/// # Returns
/// * `Ok(NetworkGraph)` - Graph with a `rank` on every edge
/// * `Err(DataError::Format)` - Malformed line, or a self-loop in directed mode
pub fn load_graph(path: impl AsRef<Path>, directed: bool) -> Result<NetworkGraph> {
    let path = path.as_ref();
    let edges = EdgeListParser::new().parse(path)?;

    let mut graph = NetworkGraph::new(directed);
    let mut repeated = 0usize;

    for edge in &edges {
        if directed && edge.source == edge.target {
            return Err(DataError::format(
                path,
                edge.line,
                format!("Self-loop on '{}' is not allowed in a directed graph", edge.source),
            ));
        }
        if !graph.add_edge(&edge.source, &edge.target, edge.rank) {
            repeated += 1;
        }
    }

    if repeated > 0 {
        debug!("{} repeated edges in {:?} updated the existing rank", repeated, path);
    }

    info!(
        "Loaded {} graph from {:?}: {} nodes, {} edges",
        if directed { "directed" } else { "undirected" },
        path,
        graph.node_count(),
        graph.edge_count()
    );

    Ok(graph)
}

/// Result of one statistic: a value per node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Counts(BTreeMap<NodeId, u64>),
    Scores(BTreeMap<NodeId, f64>),
}

impl StatValue {
    /// Reinterpret as per-node scores. An untagged empty map always reads back as `Counts`.
    pub fn into_scores(self) -> StatValue {
        match self {
            StatValue::Counts(counts) => StatValue::Scores(
                counts.into_iter().map(|(node, c)| (node, c as f64)).collect(),
            ),
            scores => scores,
        }
    }
}

/// Statistics whose per-node values are floats
const SCORE_STATISTICS: &[&str] = &["clustering", "betweenness_centrality"];

/// Statistic name -> per-node result
pub type StatisticsReport = BTreeMap<String, StatValue>;

/// A named pure function over a graph
#[derive(Debug, Clone)]
pub struct Statistic {
    pub name: String,
    pub compute: fn(&NetworkGraph) -> StatValue,
}

impl Statistic {
    pub fn new(name: impl Into<String>, compute: fn(&NetworkGraph) -> StatValue) -> Self {
        Self {
            name: name.into(),
            compute,
        }
    }
}

/// degree, clustering and betweenness_centrality, in that order
pub fn default_statistics() -> Vec<Statistic> {
    vec![
        Statistic::new("degree", degree),
        Statistic::new("clustering", clustering),
        Statistic::new("betweenness_centrality", betweenness_centrality),
    ]
}

/// Apply each statistic and key its result by name
pub fn compute_statistics(graph: &NetworkGraph, statistics: &[Statistic]) -> StatisticsReport {
    statistics
        .iter()
        .map(|stat| {
            debug!("Computing {}", stat.name);
            (stat.name.clone(), (stat.compute)(graph))
        })
        .collect()
}

/// Edges touching each node; in + out for directed graphs. A self-loop counts twice.
pub fn degree(graph: &NetworkGraph) -> StatValue {
    let g = &graph.graph;
    StatValue::Counts(
        g.node_indices()
            .map(|idx| {
                let d = g.edges_directed(idx, Direction::Outgoing).count()
                    + g.edges_directed(idx, Direction::Incoming).count();
                (graph.name(idx), d as u64)
            })
            .collect(),
    )
}

/// Local clustering coefficient.
///
/// Undirected: triangles through v / possible triangles among its neighbors.
/// Directed: directed triangles / (2 * (d_tot(d_tot - 1) - 2 d_bi)), with
/// d_tot = in + out degree and d_bi the number of reciprocated neighbors.
pub fn clustering(graph: &NetworkGraph) -> StatValue {
    let (succ, pred) = graph.adjacency();
    let without = |set: &HashSet<usize>, v: usize| -> HashSet<usize> {
        set.iter().copied().filter(|&u| u != v).collect()
    };

    let scores = graph
        .graph
        .node_indices()
        .map(|idx| {
            let v = idx.index();
            let coefficient = if graph.directed {
                let ipreds = without(&pred[v], v);
                let isuccs = without(&succ[v], v);

                let mut triangles = 0usize;
                for &j in ipreds.iter().chain(isuccs.iter()) {
                    let jpreds = without(&pred[j], j);
                    let jsuccs = without(&succ[j], j);
                    triangles += ipreds.intersection(&jpreds).count()
                        + ipreds.intersection(&jsuccs).count()
                        + isuccs.intersection(&jpreds).count()
                        + isuccs.intersection(&jsuccs).count();
                }

                let d_tot = ipreds.len() + isuccs.len();
                let d_bi = ipreds.intersection(&isuccs).count();
                let possible = 2 * (d_tot * d_tot.saturating_sub(1)).saturating_sub(2 * d_bi);

                if triangles == 0 || possible == 0 {
                    0.0
                } else {
                    triangles as f64 / possible as f64
                }
            } else {
                let neighbors = without(&succ[v], v);
                let d = neighbors.len();
                // each triangle is seen from both of its other vertices
                let triangles: usize = neighbors
                    .iter()
                    .map(|&w| neighbors.intersection(&without(&succ[w], w)).count())
                    .sum();

                if triangles == 0 {
                    0.0
                } else {
                    triangles as f64 / (d * (d - 1)) as f64
                }
            };

            (graph.name(idx), coefficient)
        })
        .collect();

    StatValue::Scores(scores)
}

/// Unweighted betweenness centrality (Brandes), normalized by 1 / ((n-1)(n-2))
pub fn betweenness_centrality(graph: &NetworkGraph) -> StatValue {
    let (succ, _) = graph.adjacency();
    let n = succ.len();
    let mut centrality = vec![0.0f64; n];

    for source in 0..n {
        let mut stack = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0f64; n];
        let mut distance: Vec<Option<usize>> = vec![None; n];

        sigma[source] = 1.0;
        distance[source] = Some(0);

        let mut queue = VecDeque::new();
        queue.push_back(source);

        while let Some(v) = queue.pop_front() {
            stack.push(v);
            let dv = distance[v].unwrap_or(0);

            for &w in &succ[v] {
                if distance[w].is_none() {
                    distance[w] = Some(dv + 1);
                    queue.push_back(w);
                }
                if distance[w] == Some(dv + 1) {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        // Accumulate dependencies in order of non-increasing distance
        let mut delta = vec![0.0f64; n];
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
            }
            if w != source {
                centrality[w] += delta[w];
            }
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for value in &mut centrality {
            *value *= scale;
        }
    }

    StatValue::Scores(
        graph
            .graph
            .node_indices()
            .map(|idx| (graph.name(idx), centrality[idx.index()]))
            .collect(),
    )
}

/// Write a statistics report as pretty-printed JSON
pub fn save_statistics(report: &StatisticsReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| DataError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, report).map_err(|e| {
        DataError::format(path, 0, format!("Failed to write statistics JSON: {}", e))
    })?;
    writer.flush().map_err(|e| DataError::io(path, e))?;

    info!("Wrote {} statistics to {:?}", report.len(), path);
    Ok(())
}

/// Read a statistics report written by [`save_statistics`]
pub fn load_statistics(path: impl AsRef<Path>) -> Result<StatisticsReport> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DataError::io(path, e))?;

    let report: StatisticsReport = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        DataError::format(
            path,
            e.line(),
            format!("Invalid statistics JSON: {}", e),
        )
    })?;

    Ok(report
        .into_iter()
        .map(|(name, value)| {
            let value = if SCORE_STATISTICS.contains(&name.as_str()) {
                value.into_scores()
            } else {
                value
            };
            (name, value)
        })
        .collect())
}

/// Load a graph, compute the default statistics, and write them to `outfile`
pub fn run(infile: impl AsRef<Path>, outfile: impl AsRef<Path>, directed: bool) -> Result<StatisticsReport> {
    let graph = load_graph(infile, directed)?;
    let report = compute_statistics(&graph, &default_statistics());
    save_statistics(&report, outfile)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn create_test_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn scores(value: &StatValue) -> &BTreeMap<NodeId, f64> {
        match value {
            StatValue::Scores(s) => s,
            other => panic!("Expected scores, got {:?}", other),
        }
    }

    fn counts(value: &StatValue) -> &BTreeMap<NodeId, u64> {
        match value {
            StatValue::Counts(c) => c,
            other => panic!("Expected counts, got {:?}", other),
        }
    }

    #[test]
    fn test_path_graph_statistics() {
        let file = create_test_file("A B 1.0\nB C 2.0\n");
        let graph = load_graph(file.path(), false).unwrap();

        let report = compute_statistics(&graph, &default_statistics());

        let expected: BTreeMap<NodeId, u64> =
            [("A", 1), ("B", 2), ("C", 1)].iter().map(|(k, v)| (k.to_string(), *v)).collect();
        assert_eq!(counts(&report["degree"]), &expected);

        assert!(scores(&report["clustering"]).values().all(|&c| c == 0.0));

        let betweenness = scores(&report["betweenness_centrality"]);
        assert_eq!(betweenness["A"], 0.0);
        assert_eq!(betweenness["B"], 1.0);
        assert_eq!(betweenness["C"], 0.0);
    }

    #[test]
    fn test_directed_path_betweenness() {
        let file = create_test_file("A B 1\nB C 1\n");
        let graph = load_graph(file.path(), true).unwrap();

        let report = compute_statistics(&graph, &default_statistics());

        assert_eq!(counts(&report["degree"])["B"], 2);
        assert_eq!(scores(&report["betweenness_centrality"])["B"], 0.5);
    }

    #[test]
    fn test_triangle_clustering() {
        let file = create_test_file("A B 1\nB C 1\nC A 1\nC D 1\n");
        let graph = load_graph(file.path(), false).unwrap();

        let clustering = clustering(&graph);
        let c = scores(&clustering);

        assert_eq!(c["A"], 1.0);
        assert_eq!(c["B"], 1.0);
        assert!((c["C"] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(c["D"], 0.0);
    }

    #[test]
    fn test_directed_cycle_clustering() {
        let file = create_test_file("A B 1\nB C 1\nC A 1\n");
        let graph = load_graph(file.path(), true).unwrap();

        let clustering = clustering(&graph);
        for value in scores(&clustering).values() {
            assert_eq!(*value, 0.5);
        }
    }

    #[test]
    fn test_directed_self_loop_rejected() {
        let file = create_test_file("A B 1.0\nA A 1.0\n");

        match load_graph(file.path(), true).unwrap_err() {
            DataError::Format { line, details, .. } => {
                assert_eq!(line, 2);
                assert!(details.contains("Self-loop"));
            }
            other => panic!("Expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn test_undirected_self_loop_counts_twice() {
        let file = create_test_file("A A 1.0\nA B 1.0\n");
        let graph = load_graph(file.path(), false).unwrap();

        let degree = degree(&graph);
        assert_eq!(counts(&degree)["A"], 3);
        assert_eq!(counts(&degree)["B"], 1);
    }

    #[test]
    fn test_repeated_edge_updates_rank() {
        let file = create_test_file("A B 1.0\nB A 4.0\n");
        let graph = load_graph(file.path(), false).unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.rank("A", "B"), Some(4.0));

        let directed = load_graph(file.path(), true).unwrap();
        assert_eq!(directed.edge_count(), 2);
        assert_eq!(directed.rank("A", "B"), Some(1.0));
    }

    #[test]
    fn test_custom_statistics_list() {
        let file = create_test_file("A B 1\n");
        let graph = load_graph(file.path(), false).unwrap();

        let report = compute_statistics(&graph, &[Statistic::new("degree", degree)]);

        assert_eq!(report.len(), 1);
        assert!(report.contains_key("degree"));
        // the defaults are untouched by a custom call
        assert_eq!(default_statistics().len(), 3);
    }

    #[test]
    fn test_empty_graph_round_trip() {
        let input = create_test_file("# nothing\n");
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("empty.json");

        let report = run(input.path(), &output, false).unwrap();
        let reloaded = load_statistics(&output).unwrap();

        assert_eq!(reloaded, report);
        assert_eq!(reloaded["clustering"], StatValue::Scores(BTreeMap::new()));
        assert_eq!(reloaded["degree"], StatValue::Counts(BTreeMap::new()));
    }

    #[test]
    fn test_run_writes_round_trippable_json() {
        let input = create_test_file("A B 1.0\nB C 2.0\nC A 0.5\nC D 3.0\n");
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("stats.json");

        let report = run(input.path(), &output, false).unwrap();
        let reloaded = load_statistics(&output).unwrap();

        assert_eq!(reloaded, report);
        assert!(matches!(reloaded["degree"], StatValue::Counts(_)));
        assert!(matches!(reloaded["clustering"], StatValue::Scores(_)));
    }
}
