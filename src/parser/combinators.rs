use crate::ast::{NodeType, Param};
use ahash::AHashMap;
use std::sync::Arc;

/// A rejected parameter list, pointing at the entry that broke the rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamViolation {
    /// Zero-based index into the combinator's params.
    pub index: usize,
    pub message: String,
}

impl ParamViolation {
    pub fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }
}

/// Defines the contract for a combinator keyword such as `parallel`.
///
/// The grammar is the same for every combinator; a rule only names the node
/// kind it produces and decides which parameter lists are acceptable.
pub trait CombinatorRule: Send + Sync {
    fn keyword(&self) -> &str;
    fn node_type(&self) -> NodeType;
    fn check_params(&self, params: &[Param]) -> Result<(), ParamViolation>;
}

pub(super) type Registry = AHashMap<String, Arc<dyn CombinatorRule>>;

/// Every parameter must be a flow branch.
pub fn require_branches(params: &[Param]) -> Result<(), ParamViolation> {
    match params.iter().position(|p| !p.is_branch()) {
        Some(index) => Err(ParamViolation::new(
            index,
            format!(
                "expected a flow branch, but parameter {} is a number",
                index + 1
            ),
        )),
        None => Ok(()),
    }
}

/// Exactly one parameter, and it must be a repeat count.
pub fn require_count(params: &[Param]) -> Result<(), ParamViolation> {
    if params.len() != 1 {
        return Err(ParamViolation::new(
            1,
            format!(
                "takes exactly one repeat count, but received {} parameters",
                params.len()
            ),
        ));
    }
    match params[0] {
        Param::Count(_) => Ok(()),
        _ => Err(ParamViolation::new(
            0,
            "expected a repeat count, but found a flow",
        )),
    }
}

/// Defines the built-in combinator rules and their registration.
macro_rules! define_combinators {
    ( $( ($struct_name:ident, $keyword:literal, $node_type:expr, $check:ident) ),* $(,)? ) => {
        $(
            struct $struct_name;
            impl CombinatorRule for $struct_name {
                fn keyword(&self) -> &str { $keyword }
                fn node_type(&self) -> NodeType { $node_type }
                fn check_params(&self, params: &[Param]) -> Result<(), ParamViolation> {
                    $check(params)
                }
            }
        )*

        pub(super) fn register_default_combinators(registry: &mut Registry) {
            $( registry.insert($keyword.to_string(), Arc::new($struct_name)); )*
        }
    };
}

define_combinators! {
    (IterationRule, "iteration", NodeType::Iteration, require_branches),
    (ParallelRule, "parallel", NodeType::Parallel, require_branches),
    (RetryRule, "retry", NodeType::Retry, require_count),
}
