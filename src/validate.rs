//! Connection validation.
//!
//! [`validate_connection`] decides whether an edge `source -> target` may be
//! added to a graph. It never mutates the graph; insertion is done by the
//! caller once the result is [`ValidationResult::Valid`].
//!
//! The standard checks run in a fixed order and the first failure wins:
//!
//! 1. self-loop
//! 2. duplicate (source, target) pair
//! 3. missing target node
//! 4. missing source node
//! 5. single-input capacity of the target
//! 6. cycle
//!
//! Each check is also available as a [`ConnectionRule`] so hosts can append
//! their own rules through [`ConnectionValidator::add`].

use crate::graph::Graph;
use thiserror::Error;

/// Result of validating a proposed connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Connection may be added
    Valid,
    /// Connection is rejected with a reason
    Invalid(RejectReason),
}

impl ValidationResult {
    /// Check if the result is valid
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// The rejection reason, if any.
    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(reason) => Some(reason),
        }
    }

    /// Combine two results (AND logic): returns first error if any
    pub fn and(self, other: ValidationResult) -> ValidationResult {
        match self {
            ValidationResult::Valid => other,
            invalid => invalid,
        }
    }

    /// Like [`and`](Self::and), but only evaluates `next` when `self` is valid.
    pub fn and_then<F>(self, next: F) -> ValidationResult
    where
        F: FnOnce() -> ValidationResult,
    {
        match self {
            ValidationResult::Valid => next(),
            invalid => invalid,
        }
    }

    pub fn into_result(self) -> Result<(), RejectReason> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(reason) => Err(reason),
        }
    }
}

/// Why a connection was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("cannot connect node '{0}' to itself")]
    SelfLoop(String),
    #[error("an edge from '{source_id}' to '{target_id}' already exists")]
    DuplicateEdge { source_id: String, target_id: String },
    #[error("target node '{0}' does not exist")]
    TargetNotFound(String),
    #[error("source node '{0}' does not exist")]
    SourceNotFound(String),
    #[error("node '{0}' accepts a single input and already has one")]
    InputCapacityExceeded(String),
    #[error("connecting '{source_id}' to '{target_id}' would create a cycle")]
    Cycle { source_id: String, target_id: String },
    #[error("{0}")]
    Custom(String),
}

/// A single rule a proposed connection must satisfy.
///
/// # Example
///
/// ```ignore
/// struct MaxFanOut(usize);
///
/// impl ConnectionRule for MaxFanOut {
///     fn check(&self, source: &str, _target: &str, graph: &Graph) -> ValidationResult {
///         if graph.outgoing(source).count() >= self.0 {
///             ValidationResult::Invalid(RejectReason::Custom("too many outputs".into()))
///         } else {
///             ValidationResult::Valid
///         }
///     }
/// }
/// ```
pub trait ConnectionRule {
    fn check(&self, source: &str, target: &str, graph: &Graph) -> ValidationResult;
}

impl<F> ConnectionRule for F
where
    F: Fn(&str, &str, &Graph) -> ValidationResult,
{
    fn check(&self, source: &str, target: &str, graph: &Graph) -> ValidationResult {
        self(source, target, graph)
    }
}

/// Rejects `source == target`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSelfLoops;

impl ConnectionRule for NoSelfLoops {
    fn check(&self, source: &str, target: &str, _graph: &Graph) -> ValidationResult {
        if source == target {
            ValidationResult::Invalid(RejectReason::SelfLoop(source.to_owned()))
        } else {
            ValidationResult::Valid
        }
    }
}

/// Rejects a second edge with the same ordered (source, target) pair.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDuplicateEdges;

impl ConnectionRule for NoDuplicateEdges {
    fn check(&self, source: &str, target: &str, graph: &Graph) -> ValidationResult {
        if graph.has_edge_between(source, target) {
            ValidationResult::Invalid(RejectReason::DuplicateEdge {
                source_id: source.to_owned(),
                target_id: target.to_owned(),
            })
        } else {
            ValidationResult::Valid
        }
    }
}

/// Rejects connections whose endpoints are not in the graph (target first).
#[derive(Clone, Copy, Debug, Default)]
pub struct EndpointsExist;

impl ConnectionRule for EndpointsExist {
    fn check(&self, source: &str, target: &str, graph: &Graph) -> ValidationResult {
        if !graph.contains_node(target) {
            return ValidationResult::Invalid(RejectReason::TargetNotFound(target.to_owned()));
        }
        if !graph.contains_node(source) {
            return ValidationResult::Invalid(RejectReason::SourceNotFound(source.to_owned()));
        }
        ValidationResult::Valid
    }
}

/// Rejects a second incoming edge on targets that accept a single input.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputCapacity;

impl ConnectionRule for InputCapacity {
    fn check(&self, _source: &str, target: &str, graph: &Graph) -> ValidationResult {
        let Some(node) = graph.node(target) else {
            return ValidationResult::Valid;
        };
        if !node.allow_multiple_inputs && graph.incoming(target).next().is_some() {
            ValidationResult::Invalid(RejectReason::InputCapacityExceeded(target.to_owned()))
        } else {
            ValidationResult::Valid
        }
    }
}

/// Rejects edges that would close a cycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct Acyclic;

impl ConnectionRule for Acyclic {
    fn check(&self, source: &str, target: &str, graph: &Graph) -> ValidationResult {
        if would_create_cycle(source, target, graph) {
            ValidationResult::Invalid(RejectReason::Cycle {
                source_id: source.to_owned(),
                target_id: target.to_owned(),
            })
        } else {
            ValidationResult::Valid
        }
    }
}

/// Whether adding `source -> target` would close a cycle, i.e. whether
/// `source` is already reachable from `target` in the current graph.
pub fn would_create_cycle(source: &str, target: &str, graph: &Graph) -> bool {
    graph.is_reachable(target, source)
}

/// Validate a proposed connection with the standard rules.
pub fn validate_connection(source: &str, target: &str, graph: &Graph) -> ValidationResult {
    NoSelfLoops
        .check(source, target, graph)
        .and_then(|| NoDuplicateEdges.check(source, target, graph))
        .and_then(|| EndpointsExist.check(source, target, graph))
        .and_then(|| InputCapacity.check(source, target, graph))
        .and_then(|| Acyclic.check(source, target, graph))
}

/// Ordered set of rules: the standard checks, then any rules added by the host.
///
/// All rules must pass (AND logic); the first failure short-circuits.
pub struct ConnectionValidator {
    extra: Vec<Box<dyn ConnectionRule>>,
}

impl Default for ConnectionValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionValidator")
            .field("extra_rules", &self.extra.len())
            .finish()
    }
}

impl ConnectionValidator {
    /// A validator running only the standard rules.
    pub fn new() -> Self {
        Self { extra: Vec::new() }
    }

    /// Append a rule, checked after the standard rules and any earlier additions.
    pub fn add<R: ConnectionRule + 'static>(mut self, rule: R) -> Self {
        self.extra.push(Box::new(rule));
        self
    }

    pub fn push<R: ConnectionRule + 'static>(&mut self, rule: R) {
        self.extra.push(Box::new(rule));
    }

    pub fn validate(&self, source: &str, target: &str, graph: &Graph) -> ValidationResult {
        let standard = validate_connection(source, target, graph);
        if !standard.is_valid() {
            return standard;
        }
        for rule in &self.extra {
            let result = rule.check(source, target, graph);
            if !result.is_valid() {
                return result;
            }
        }
        ValidationResult::Valid
    }
}
