//! Integer linear program for the Double Roman Domination Problem (model DRDP-1'' of Cai, Fan,
//! Shi and Yao, "Integer Linear Programming Formulations for Double Roman Domination Problem").
//!
//! Every node `v` gets two binary indicators `y_v` and `z_v`, its label is `2 y_v + 3 z_v`.
//! A node is defended if
//!
//! ```text
//! y_v + z_v + sum_{u in N(v)} (y_u / 2 + z_u) >= 1
//! ```
//!
//! and the total weight `sum_v 2 y_v + 3 z_v` is minimised.

use std::io::{self, Write};
use tracing::{info, warn};
use crate::cust_error::ProcessingError;
use crate::graph::SnarkGraph;
use crate::milp::{LinearExpr, MilpBackend, SolveStatus};

/// Weight of a node whose `y` indicator is set.
pub const Y_WEIGHT: u8 = 2;
/// Weight of a node whose `z` indicator is set.
pub const Z_WEIGHT: u8 = 3;

/// A graph together with its DRDP model in `backend`.
pub struct DrdpInstance<B: MilpBackend> {
    pub graph: SnarkGraph,
    backend: B,
    y: Vec<B::Var>,
    z: Vec<B::Var>,
}

impl<B: MilpBackend> DrdpInstance<B> {

    /// Declares `y_v` and `z_v` for every node of `graph`, adds one covering constraint per node
    /// and the minimisation objective to `backend`.
    pub fn build(graph: SnarkGraph, mut backend: B) -> Self {
        let n = graph.num_nodes();
        let mut y = Vec::with_capacity(n);
        let mut z = Vec::with_capacity(n);
        for node in graph.nodes() {
            y.push(backend.declare_binary(&format!("y_{}", node)));
            z.push(backend.declare_binary(&format!("z_{}", node)));
        }
        let mut instance = DrdpInstance { graph, backend, y, z };
        for node in instance.graph.nodes() {
            let lhs = instance.covering_expr(node);
            instance.backend.add_constraint(lhs, 1.0);
        }
        let objective = instance.objective_expr();
        instance.backend.set_objective(objective);
        info!(nodes = n, edges = instance.graph.num_edges(), "built drdp model");
        instance
    }

    /// Left-hand side of the covering constraint of `node`. Parallel edges contribute once per
    /// copy.
    fn covering_expr(&self, node: usize) -> LinearExpr<B::Var> {
        let neighbors = self.graph.neighbors(node);
        let mut expr = Vec::with_capacity(2 + 2 * neighbors.len());
        expr.push((1.0, self.y[node]));
        expr.push((1.0, self.z[node]));
        for &neigh in neighbors {
            expr.push((0.5, self.y[neigh]));
            expr.push((1.0, self.z[neigh]));
        }
        expr
    }

    fn objective_expr(&self) -> LinearExpr<B::Var> {
        self.y.iter()
            .zip(&self.z)
            .flat_map(|(y, z)| [(f64::from(Y_WEIGHT), *y), (f64::from(Z_WEIGHT), *z)])
            .collect()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Runs the solver once.
    ///
    /// Returns the labeling if the solver reports `SolveStatus::Optimal`, and
    /// `ProcessingError::NotOptimal` with the reported status otherwise.
    pub fn solve(&mut self) -> Result<DrdpSolution, ProcessingError> {
        let status = self.backend.solve();
        if status != SolveStatus::Optimal {
            warn!(%status, "no optimal labeling");
            return Err(ProcessingError::NotOptimal(status))
        }
        let y = self.y.iter().map(|var| self.backend.variable_value(*var) > 0.5).collect();
        let z = self.z.iter().map(|var| self.backend.variable_value(*var) > 0.5).collect();
        let solution = DrdpSolution {
            objective: self.backend.objective_value(),
            y,
            z,
        };
        info!(objective = solution.objective, weight = solution.weight(), "found optimal labeling");
        Ok(solution)
    }

}

/// An optimal labeling as reported by the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct DrdpSolution {
    /// Objective value as reported by the solver.
    pub objective: f64,
    y: Vec<bool>,
    z: Vec<bool>,
}

impl DrdpSolution {

    /// Builds a solution from integral indicators. `y` and `z` must have the same length.
    pub fn from_indicators(objective: f64, y: Vec<bool>, z: Vec<bool>) -> Self {
        debug_assert_eq!(y.len(), z.len());
        DrdpSolution { objective, y, z }
    }

    pub fn num_nodes(&self) -> usize {
        self.y.len()
    }

    /// Returns the label `2 y + 3 z` of `node`, one of `0`, `2`, `3` or `5`.
    pub fn label(&self, node: usize) -> u8 {
        Y_WEIGHT * u8::from(self.y[node]) + Z_WEIGHT * u8::from(self.z[node])
    }

    /// Returns the labels of all nodes in index order.
    pub fn labels(&self) -> Vec<u8> {
        (0..self.num_nodes()).map(|node| self.label(node)).collect()
    }

    /// Returns the sum of all labels.
    pub fn weight(&self) -> usize {
        (0..self.num_nodes()).map(|node| usize::from(self.label(node))).sum()
    }

    /// Checks that every node of `graph` is defended by `self`, counted in half units:
    /// `2 y_v + 2 z_v + sum_{u in N(v)} (y_u + 2 z_u) >= 2`.
    pub fn validate(&self, graph: &SnarkGraph) -> Result<(), ProcessingError> {
        if graph.num_nodes() != self.num_nodes() {
            return Err(ProcessingError::InvalidSolution(format!(
                "{} labels for {} nodes", self.num_nodes(), graph.num_nodes()
            )))
        }
        for node in graph.nodes() {
            let own = 2 * usize::from(self.y[node]) + 2 * usize::from(self.z[node]);
            let support: usize = graph.neighbors(node)
                .iter()
                .map(|neigh| usize::from(self.y[*neigh]) + 2 * usize::from(self.z[*neigh]))
                .sum();
            if own + support < 2 {
                return Err(ProcessingError::InvalidSolution(format!("node {} is not defended", node)))
            }
        }
        Ok(())
    }

    /// Writes the objective value and the label of every node to a `Write` type.
    pub fn write_solution<W: Write>(&self, mut out: W) -> Result<(), io::Error> {
        writeln!(out, "Optimal function weight = {}", self.objective)?;
        writeln!(out, "Vertex Labels:")?;
        for node in 0..self.num_nodes() {
            writeln!(out, "label of v_{} = {}", node, self.label(node))?;
        }
        Ok(())
    }

}
