//! A minimal interface to a mixed integer linear programming solver, and its implementation on
//! top of `good_lp`.

use std::fmt;
use good_lp::{
    constraint, default_solver, variable, Expression, ProblemVariables, ResolutionError,
    Solution, SolverModel, Variable,
};
use tracing::{info, warn};

/// Linear expression as a list of `(coefficient, variable)` terms. Repeated variables add up.
pub type LinearExpr<V> = Vec<(f64, V)>;

/// Terminal state of a solve call.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// The solver stopped because of an internal error.
    Abnormal,
    NotSolved,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Optimal => write!(f, "optimal"),
            Self::Infeasible => write!(f, "infeasible"),
            Self::Unbounded => write!(f, "unbounded"),
            Self::Abnormal => write!(f, "abnormal"),
            Self::NotSolved => write!(f, "not solved"),
        }
    }
}

/// The operations a model builder needs from a solver: binary variables, `>=` constraints, a
/// minimisation objective and a blocking solve.
pub trait MilpBackend {
    type Var: Copy;

    /// Declares a variable with domain `{0, 1}`.
    fn declare_binary(&mut self, name: &str) -> Self::Var;

    /// Adds the constraint `expr >= lower`.
    fn add_constraint(&mut self, expr: LinearExpr<Self::Var>, lower: f64);

    /// Sets the expression to be minimised.
    fn set_objective(&mut self, expr: LinearExpr<Self::Var>);

    /// Solves the model and returns its terminal status.
    fn solve(&mut self) -> SolveStatus;

    /// Value of the objective. Only meaningful after `solve()` returned `SolveStatus::Optimal`.
    fn objective_value(&self) -> f64;

    /// Value of `var`. Only meaningful after `solve()` returned `SolveStatus::Optimal`.
    fn variable_value(&self, var: Self::Var) -> f64;
}

fn to_expression(expr: &[(f64, Variable)]) -> Expression {
    let mut sum = Expression::with_capacity(expr.len());
    for &(coefficient, var) in expr {
        sum += coefficient * var;
    }
    sum
}

/// Handle returned by `GoodLpBackend::declare_binary` after the model was solved.
pub const UNDECLARED: usize = usize::MAX;

/// `MilpBackend` on `good_lp`'s default solver.
///
/// Constraints and the objective are collected until `solve()` hands the whole model to the
/// solver at once. A backend can be solved once: later calls return `SolveStatus::NotSolved`,
/// and declarations, constraints and objectives given after the solve are ignored.
pub struct GoodLpBackend {
    vars: Option<ProblemVariables>,
    /// Variables in declaration order, used to read back the solution.
    declared: Vec<Variable>,
    constraints: Vec<(Expression, f64)>,
    objective: Expression,
    status: SolveStatus,
    objective_value: f64,
    values: Vec<f64>,
}

impl GoodLpBackend {

    pub fn new() -> Self {
        GoodLpBackend {
            vars: Some(ProblemVariables::new()),
            declared: Vec::new(),
            constraints: Vec::new(),
            objective: Expression::with_capacity(0),
            status: SolveStatus::NotSolved,
            objective_value: 0.0,
            values: Vec::new(),
        }
    }

    /// Returns the status of the last solve, `SolveStatus::NotSolved` before that.
    pub fn status(&self) -> SolveStatus {
        self.status
    }

}

impl Default for GoodLpBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MilpBackend for GoodLpBackend {
    type Var = usize;

    /// Returns `UNDECLARED` once the model was solved.
    fn declare_binary(&mut self, name: &str) -> usize {
        let vars = match self.vars.as_mut() {
            Some(vars) => vars,
            None => {
                warn!(variable = name, "model was already solved, variable ignored");
                return UNDECLARED
            }
        };
        let var = vars.add(variable().binary().name(name));
        self.declared.push(var);
        self.declared.len() - 1
    }

    fn add_constraint(&mut self, expr: LinearExpr<usize>, lower: f64) {
        if self.vars.is_none() {
            warn!("model was already solved, constraint ignored");
            return
        }
        let expr: Vec<(f64, Variable)> = expr.into_iter().map(|(c, v)| (c, self.declared[v])).collect();
        self.constraints.push((to_expression(&expr), lower));
    }

    fn set_objective(&mut self, expr: LinearExpr<usize>) {
        if self.vars.is_none() {
            warn!("model was already solved, objective ignored");
            return
        }
        let expr: Vec<(f64, Variable)> = expr.into_iter().map(|(c, v)| (c, self.declared[v])).collect();
        self.objective = to_expression(&expr);
    }

    fn solve(&mut self) -> SolveStatus {
        let vars = match self.vars.take() {
            Some(vars) => vars,
            None => {
                warn!("model was already solved");
                return SolveStatus::NotSolved
            }
        };
        info!(
            variables = self.declared.len(),
            constraints = self.constraints.len(),
            "solving milp"
        );
        let mut model = vars.minimise(self.objective.clone()).using(default_solver);
        for (expr, lower) in self.constraints.drain(..) {
            model = model.with(constraint!(expr >= lower));
        }
        self.status = match model.solve() {
            Ok(solution) => {
                self.objective_value = solution.eval(self.objective.clone());
                self.values = self.declared.iter().map(|var| solution.value(*var)).collect();
                SolveStatus::Optimal
            },
            Err(ResolutionError::Infeasible) => SolveStatus::Infeasible,
            Err(ResolutionError::Unbounded) => SolveStatus::Unbounded,
            Err(err) => {
                warn!(error = %err, "solver failed");
                SolveStatus::Abnormal
            },
        };
        self.status
    }

    fn objective_value(&self) -> f64 {
        self.objective_value
    }

    fn variable_value(&self, var: usize) -> f64 {
        self.values.get(var).copied().unwrap_or(0.0)
    }
}
