//! Implementation of a simple, undirected multigraph built once from an edge list.
//! Parallel edges are kept, so a neighbor can appear more than once in an adjacency list.

use fxhash::FxHashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use crate::cust_error::ProcessingError;

/// An immutable undirected graph over the nodes `0..n`.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct SnarkGraph {
    adj_list: Vec<Vec<usize>>,
    num_edges: usize,
}

impl SnarkGraph {

    /// Builds the adjacency lists of `num_nodes` nodes from `edges`, inserting both directions of
    /// every edge in the given order. The graph is sized by `num_nodes`, not by the nodes that
    /// happen to appear in `edges`, so isolated nodes are kept.
    ///
    /// Returns a `ProcessingError` for self loops and for endpoints outside of `0..num_nodes`.
    pub fn from_edges(num_nodes: usize, edges: &[(usize, usize)]) -> Result<Self, ProcessingError> {
        let mut adj_list = vec![Vec::new(); num_nodes];
        for &(src, trg) in edges {
            if src >= num_nodes || trg >= num_nodes {
                return Err(ProcessingError::GraphError(format!(
                    "edge ({}, {}) leaves the node range 0..{}", src, trg, num_nodes
                )))
            }
            if src == trg {
                return Err(ProcessingError::GraphError(format!("self loop at node {}", src)))
            }
            adj_list[src].push(trg);
            adj_list[trg].push(src);
        }
        Ok(SnarkGraph {
            adj_list,
            num_edges: edges.len(),
        })
    }

    /// Returns an `Iterator` over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item=usize> {
        0..self.adj_list.len()
    }

    /// Returns the number of nodes of `self`.
    pub fn num_nodes(&self) -> usize {
        self.adj_list.len()
    }

    /// Returns the number of edges of `self`, parallel edges included.
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Returns the neighbors of `node` in insertion order, with repetitions for parallel edges.
    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.adj_list[node]
    }

    /// Returns the degree of `node`, counting parallel edges.
    pub fn degree(&self, node: usize) -> usize {
        self.adj_list[node].len()
    }

    /// Returns an iterator over all edges `(src, trg)` with `src < trg`. Parallel edges are
    /// yielded once per copy.
    pub fn edges(&self) -> impl Iterator<Item=(usize, usize)> + '_ {
        self.adj_list
            .iter()
            .enumerate()
            .flat_map(|(i, adj)| {
                adj.iter()
                    .filter(move |neigh| i < **neigh)
                    .map(move |neigh| (i, *neigh))
            })
    }

    /// Checks if every node has degree 3.
    pub fn is_cubic(&self) -> bool {
        self.nodes().all(|node| self.degree(node) == 3)
    }

    /// Returns a set of all nodes reachable by `node`, including `node`.
    pub fn reachable(&self, node: usize) -> FxHashSet<usize> {
        let mut reached = FxHashSet::default();
        let mut queue = vec![node];
        while let Some(next) = queue.pop() {
            if !reached.insert(next) {
                continue
            }
            queue.extend(self.neighbors(next).iter().filter(|neigh| !reached.contains(*neigh)));
        }
        reached
    }

    /// Checks if `self` is disconnected.
    pub fn disconnected(&self) -> bool {
        if self.num_nodes() == 0 {
            return false
        }
        self.reachable(0).len() != self.num_nodes()
    }

    /// Writes `self` in `.gr` format: a `p td <n> <m>` header followed by one line per edge with
    /// 1-based endpoints.
    pub fn write_gr<W: Write>(&self, mut out: W) -> Result<(), io::Error> {
        writeln!(out, "p td {} {}", self.num_nodes(), self.num_edges())?;
        for (src, trg) in self.edges() {
            writeln!(out, "{} {}", src + 1, trg + 1)?;
        }
        Ok(())
    }

    /// Writes `self` in `.gr` format to the file at `path`, flushing before returning so that
    /// write errors are reported.
    pub fn export_gr(&self, path: &Path) -> Result<(), io::Error> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_gr(&mut out)?;
        out.flush()
    }

}
