//! The proof-search driver: negate the claim, grow the tableau branch by
//! branch, and report validity.

use std::sync::Arc;

use hashbrown::HashMap;
use log::{debug, trace};
use serde::Serialize;

use crate::{
    error::Result,
    formula::{AFormula, Assignment, Formula, FormulaFactory, UnaryOp},
    logic::Logic,
    proof::{
        rules::{rules, Rule, RuleApplyFactory},
        NodeId, ProofTree,
    },
};

pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// Outcome of a proof attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Every branch closed: the negated claim is unsatisfiable.
    Valid,
    /// Some branch saturated without closing; it describes a counter-model.
    Invalid,
    /// The step budget ran out first. Modal and tense trees can grow
    /// forever, so the driver gives up rather than loop.
    Undetermined,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Valid => "valid".fmt(f),
            Verdict::Invalid => "invalid".fmt(f),
            Verdict::Undetermined => "undetermined".fmt(f),
        }
    }
}

/// A finished proof attempt: the verdict together with the tableau that
/// produced it.
#[derive(Debug)]
pub struct Proof {
    verdict: Verdict,
    tree: ProofTree,
    open_branch: Option<Vec<NodeId>>,
}

impl Proof {
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn tree(&self) -> &ProofTree {
        &self.tree
    }

    /// The saturated open branch refuting validity, when there is one.
    pub fn open_branch(&self) -> Option<&[NodeId]> {
        self.open_branch.as_deref()
    }

    /// Reads the open branch's initial-world literals back into an
    /// assignment. Completing it with arbitrary values for the remaining
    /// variables yields a counter-model of the claim.
    pub fn counter_assignment(&self) -> Option<Assignment> {
        let branch = self.open_branch.as_ref()?;
        let world = self.tree.factory().initial_world();
        let mut assignment = Assignment::new();
        for &id in branch.iter() {
            let node = self.tree.node(id);
            if node.world() != world {
                continue;
            }
            match node.formula().as_ref() {
                Formula::Atom(token) => assignment.bind(token.clone(), true),
                Formula::Unary {
                    op: UnaryOp::Negation,
                    operand,
                } => {
                    if let Formula::Atom(token) = operand.as_ref() {
                        assignment.bind(token.clone(), false);
                    }
                }
                _ => {}
            }
        }
        Some(assignment)
    }
}

enum BranchStatus {
    Closed,
    Open(Vec<NodeId>),
    Exhausted,
}

#[derive(Debug, Clone, Copy)]
pub struct Prover {
    logic: Logic,
    max_steps: usize,
}

impl Prover {
    pub fn new(logic: Logic) -> Self {
        Self {
            logic,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn logic(&self) -> Logic {
        self.logic
    }

    /// Tests `formula` for validity by refuting its negation.
    pub fn prove(&self, formula: &AFormula) -> Result<Proof> {
        let factory = Arc::new(FormulaFactory::new(self.logic));
        let negated = factory.negate(formula);
        debug!("refuting {negated}");
        let mut tree = ProofTree::new(factory, negated);
        let root = tree.root();
        let mut search = Search {
            max_steps: self.max_steps,
            steps: 0,
        };
        let status = search.expand(&mut tree, vec![root], HashMap::new())?;
        let (verdict, open_branch) = match status {
            BranchStatus::Closed => (Verdict::Valid, None),
            BranchStatus::Open(branch) => (Verdict::Invalid, Some(branch)),
            BranchStatus::Exhausted => (Verdict::Undetermined, None),
        };
        debug!("verdict after {} steps: {verdict}", search.steps);
        Ok(Proof {
            verdict,
            tree,
            open_branch,
        })
    }
}

struct Search {
    max_steps: usize,
    steps: usize,
}

impl Search {
    /// Expands one branch to completion. `used` maps nodes already
    /// decomposed on this branch to the number of accessibility
    /// descriptors present when they were; a necessity node becomes
    /// eligible again once that number grows.
    fn expand(
        &mut self,
        tree: &mut ProofTree,
        mut path: Vec<NodeId>,
        mut used: HashMap<NodeId, usize>,
    ) -> Result<BranchStatus> {
        loop {
            // follow whatever is already attached below the leaf
            loop {
                let [.., leaf] = path[..] else {
                    unreachable!("branch paths start at the root")
                };
                let (left, right) = {
                    let node = tree.node(leaf);
                    (node.left(), node.right())
                };
                match (left, right) {
                    (Some(left), Some(right)) => {
                        let mut left_path = path.clone();
                        left_path.push(left);
                        let left_status = self.expand(tree, left_path, used.clone())?;
                        if let BranchStatus::Open(_) = left_status {
                            // one saturated open branch already refutes
                            return Ok(left_status);
                        }
                        let mut right_path = path;
                        right_path.push(right);
                        let right_status = self.expand(tree, right_path, used)?;
                        return Ok(match (left_status, right_status) {
                            (BranchStatus::Closed, BranchStatus::Closed) => BranchStatus::Closed,
                            (_, open @ BranchStatus::Open(_)) => open,
                            _ => BranchStatus::Exhausted,
                        });
                    }
                    (Some(left), None) => path.push(left),
                    (None, _) => break,
                }
            }

            if tree.branch_closes(&path) {
                trace!("branch closed at depth {}", path.len());
                return Ok(BranchStatus::Closed);
            }

            if self.steps >= self.max_steps {
                debug!("step budget exhausted after {} steps", self.steps);
                return Ok(BranchStatus::Exhausted);
            }

            let Some((rule, node_id)) = self.pick(tree, &path, &used) else {
                trace!("branch saturated open at depth {}", path.len());
                return Ok(BranchStatus::Open(path));
            };

            self.steps += 1;
            trace!(
                "step {}: {} on {}",
                self.steps,
                rule.name(),
                tree.node(node_id).formula()
            );
            used.insert(node_id, tree.relation_count(&path));
            let [.., leaf] = path[..] else {
                unreachable!("branch paths start at the root")
            };
            let subtree = {
                let mut factory = RuleApplyFactory::new(tree, node_id, &path);
                rule.apply(&mut factory)?
            };
            tree.graft(leaf, &subtree);
        }
    }

    /// First applicable (rule, node) pair on the branch, scanning the
    /// rule set in order so non-branching rules win. At most one rule is
    /// applied per expansion step.
    fn pick(
        &self,
        tree: &ProofTree,
        path: &[NodeId],
        used: &HashMap<NodeId, usize>,
    ) -> Option<(&'static dyn Rule, NodeId)> {
        let logic = tree.factory().logic();
        let relations = tree.relation_count(path);
        rules().iter().find_map(|rule| {
            path.iter()
                .copied()
                .find(|&id| {
                    let node = tree.node(id);
                    let eligible = match used.get(&id) {
                        None => true,
                        Some(&at) => revisitable(node.formula()) && relations > at,
                    };
                    eligible && rule.is_applicable(logic, node)
                })
                .map(|id| (*rule, id))
        })
    }
}

/// Necessity nodes are the only ones worth a second visit: new
/// accessibility edges give them new worlds to instantiate.
fn revisitable(formula: &AFormula) -> bool {
    matches!(
        formula.as_ref(),
        Formula::Unary { op, .. } if op.is_necessity_like()
    )
}
