//! Activation control: deciding per node whether its condition should be
//! re-evaluated right now, and annotating a copy of the tree with the
//! outcome.
//!
//! Live evaluation is opt-in per type because some evaluators are expensive
//! (network-backed custom kinds in particular); everything not explicitly
//! enabled passes its pre-existing `activated` flag through untouched.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::evaluate::evaluate_attribute_condition;
use crate::time_window::is_time_window_open;
use crate::types::{ActivateError, ConditionKind, ConditionNode, RuntimeContext};
use crate::url_pattern::is_match_url_pattern;

/// An asynchronous evaluator for a condition type, supplied by the caller.
/// Overrides the built-in leaf evaluator for that type when present.
#[async_trait]
pub trait CustomEvaluator: Send + Sync {
    /// Evaluate a node against the context. Errors abort the whole
    /// `activate` call.
    async fn evaluate(
        &self,
        node: &ConditionNode,
        ctx: &RuntimeContext,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}

/// Per-call activation policy.
///
/// Priority order per node: `activated_ids` wins over `deactivated_ids`,
/// which wins over `type_control`. Types absent from `type_control` (or
/// explicitly disabled) are never evaluated; their nodes keep whatever
/// `activated` value they arrived with.
#[derive(Default)]
pub struct ActivateOptions {
    pub activated_ids: HashSet<String>,
    pub deactivated_ids: HashSet<String>,
    pub type_control: HashMap<String, bool>,
    pub custom_evaluators: HashMap<String, Arc<dyn CustomEvaluator>>,
}

impl ActivateOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the node with this id active.
    #[must_use]
    pub fn activate_id(mut self, id: &str) -> Self {
        self.activated_ids.insert(id.to_owned());
        self
    }

    /// Force the node with this id inactive (unless also force-activated).
    #[must_use]
    pub fn deactivate_id(mut self, id: &str) -> Self {
        self.deactivated_ids.insert(id.to_owned());
        self
    }

    /// Enable live evaluation for a condition type.
    #[must_use]
    pub fn enable_type(mut self, type_name: &str) -> Self {
        self.type_control.insert(type_name.to_owned(), true);
        self
    }

    /// Explicitly disable a condition type (same pass-through behavior as
    /// leaving it out; present for callers that toggle).
    #[must_use]
    pub fn disable_type(mut self, type_name: &str) -> Self {
        self.type_control.insert(type_name.to_owned(), false);
        self
    }

    /// Register an async evaluator for a condition type. Only consulted for
    /// types enabled via [`enable_type`](Self::enable_type).
    #[must_use]
    pub fn with_custom_evaluator(
        mut self,
        type_name: &str,
        evaluator: Arc<dyn CustomEvaluator>,
    ) -> Self {
        self.custom_evaluators
            .insert(type_name.to_owned(), evaluator);
        self
    }
}

/// Produce a structurally identical copy of `nodes` with every node's
/// `activated` flag recomputed under `options`. The input tree is never
/// mutated.
///
/// # Errors
///
/// Returns [`ActivateError`] if a caller-supplied custom evaluator fails;
/// built-in leaf evaluators cannot fail (they evaluate closed instead).
pub async fn activate(
    nodes: &[ConditionNode],
    ctx: &RuntimeContext,
    options: &ActivateOptions,
) -> Result<Vec<ConditionNode>, ActivateError> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        out.push(activate_node(node, ctx, options).await?);
    }
    Ok(out)
}

// Recursive async walks need an explicitly boxed future.
fn activate_node<'a>(
    node: &'a ConditionNode,
    ctx: &'a RuntimeContext,
    options: &'a ActivateOptions,
) -> Pin<Box<dyn Future<Output = Result<ConditionNode, ActivateError>> + Send + 'a>> {
    Box::pin(async move {
        if let ConditionKind::Group(children) = &node.kind {
            let mut rebuilt = Vec::with_capacity(children.len());
            for child in children {
                rebuilt.push(activate_node(child, ctx, options).await?);
            }
            // activation state lives on leaves; a group carries no own flag
            return Ok(ConditionNode {
                id: node.id.clone(),
                operator: node.operator,
                activated: None,
                kind: ConditionKind::Group(rebuilt),
            });
        }

        let activated = if options.activated_ids.contains(&node.id) {
            Some(true)
        } else if options.deactivated_ids.contains(&node.id) {
            Some(false)
        } else if options.type_control.get(node.type_name()) == Some(&true) {
            Some(evaluate_enabled(node, ctx, options).await?)
        } else {
            node.activated
        };

        Ok(ConditionNode {
            id: node.id.clone(),
            operator: node.operator,
            activated,
            kind: node.kind.clone(),
        })
    })
}

async fn evaluate_enabled(
    node: &ConditionNode,
    ctx: &RuntimeContext,
    options: &ActivateOptions,
) -> Result<bool, ActivateError> {
    if let Some(evaluator) = options.custom_evaluators.get(node.type_name()) {
        return evaluator
            .evaluate(node, ctx)
            .await
            .map_err(|source| ActivateError::CustomEvaluator {
                kind: node.type_name().to_owned(),
                source,
            });
    }
    Ok(match &node.kind {
        ConditionKind::CurrentPage(url) => ctx
            .current_url()
            .is_some_and(|u| is_match_url_pattern(u, &url.includes, &url.excludes)),
        ConditionKind::Time(window) => is_time_window_open(window, ctx.now()),
        ConditionKind::Attribute(cond) => evaluate_attribute_condition(cond, ctx),
        ConditionKind::Custom { kind, .. } => {
            debug!(kind = %kind, "custom type enabled without an evaluator");
            false
        }
        // groups are handled before reaching here
        ConditionKind::Group(_) => false,
    })
}
