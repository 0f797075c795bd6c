//! Explicit directed graphs.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::problem::Problem;
use crate::space::Space;

pub type NodeId = usize;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node {node} is not in a graph of {nodes} nodes")]
    UnknownNode { node: NodeId, nodes: usize },
    #[error("Row {row} has {len} columns, expected {nodes}")]
    NotSquare { row: usize, len: usize, nodes: usize },
}

/// A directed graph stored as adjacency lists.
///
/// Nodes are `0..num_nodes()`. Successors keep the order their edges were
/// added in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectedGraph {
    successors: Vec<Vec<NodeId>>,
}

impl DirectedGraph {
    pub fn with_nodes(n: usize) -> Self {
        Self {
            successors: vec![vec![]; n],
        }
    }

    pub fn from_edges(n: usize, edges: &[(NodeId, NodeId)]) -> Result<Self, GraphError> {
        let mut g = Self::with_nodes(n);
        for &(from, to) in edges {
            g.add_edge(from, to)?;
        }
        Ok(g)
    }

    /// Builds a graph from an adjacency matrix.
    ///
    /// `matrix[i][j]` holds the weight of the edge `i -> j`, if any. Weights
    /// are dropped, only whether the edge exists matters here.
    pub fn from_matrix<W>(matrix: &[Vec<Option<W>>]) -> Result<Self, GraphError> {
        let n = matrix.len();
        let mut g = Self::with_nodes(n);
        for (row, weights) in matrix.iter().enumerate() {
            if weights.len() != n {
                return Err(GraphError::NotSquare {
                    row,
                    len: weights.len(),
                    nodes: n,
                });
            }
            for (column, w) in weights.iter().enumerate() {
                if w.is_some() {
                    g.add_edge(row, column)?;
                }
            }
        }
        Ok(g)
    }

    /// Adds `from -> to`. Repeated edges are kept once.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<(), GraphError> {
        self.check(from)?;
        self.check(to)?;

        let successors = &mut self.successors[from];
        if !successors.contains(&to) {
            successors.push(to);
        }
        Ok(())
    }

    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.successors.len()
    }
    pub fn num_edges(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    pub fn successors(&self, n: NodeId) -> &[NodeId] {
        match self.successors.get(n) {
            Some(s) => s,
            None => &[],
        }
    }

    fn check(&self, node: NodeId) -> Result<NodeId, GraphError> {
        if node < self.num_nodes() {
            Ok(node)
        } else {
            Err(GraphError::UnknownNode {
                node,
                nodes: self.num_nodes(),
            })
        }
    }
}

impl Space<NodeId> for DirectedGraph {
    #[inline(always)]
    fn neighbours(&self, s: &NodeId) -> Vec<NodeId> {
        self.successors(*s).to_vec()
    }

    #[inline(always)]
    fn valid(&self, s: &NodeId) -> bool {
        *s < self.num_nodes()
    }

    fn size(&self) -> Option<usize> {
        Some(self.num_nodes())
    }
}

/// Reach any of the goal nodes of a graph from a start node.
#[derive(Clone, Debug)]
pub struct GraphProblem {
    graph: DirectedGraph,
    start: NodeId,
    goals: FxHashSet<NodeId>,
}

impl GraphProblem {
    pub fn new<I>(graph: DirectedGraph, start: NodeId, goals: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let start = graph.check(start)?;
        let goals = goals
            .into_iter()
            .map(|g| graph.check(g))
            .collect::<Result<FxHashSet<NodeId>, GraphError>>()?;

        Ok(Self {
            graph,
            start,
            goals,
        })
    }

    pub fn goals(&self) -> &FxHashSet<NodeId> {
        &self.goals
    }
}

impl Problem<DirectedGraph, NodeId> for GraphProblem {
    fn space(&self) -> &DirectedGraph {
        &self.graph
    }
    fn start(&self) -> &NodeId {
        &self.start
    }
    #[inline(always)]
    fn is_goal(&self, s: &NodeId) -> bool {
        self.goals.contains(s)
    }
}
