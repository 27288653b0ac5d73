//! Live condition tree evaluation.

use tracing::debug;

use crate::compare::compare_values;
use crate::time_window::is_time_window_open;
use crate::types::{
    AttributeCondition, ConditionKind, ConditionNode, RuntimeContext, SiblingOperator,
};
use crate::url_pattern::is_match_url_pattern;

/// Evaluate a condition tree against the runtime context.
///
/// An empty root sequence is `true`: absence of conditions imposes no
/// restriction. A nested empty group, by contrast, is `false` — an authored
/// but unconfigured branch must not activate gated content.
#[must_use]
pub fn evaluate_conditions(nodes: &[ConditionNode], ctx: &RuntimeContext) -> bool {
    if nodes.is_empty() {
        return true;
    }
    combine_live(nodes, ctx)
}

/// Combine pre-computed `activated` flags with the same AND/OR bucketing as
/// live evaluation, without re-evaluating any leaf. Group activation derives
/// recursively from children. An empty sequence is `false`.
#[must_use]
pub fn is_active(nodes: &[ConditionNode]) -> bool {
    let mut and = Bucket::default();
    let mut or = Bucket::default();
    for node in nodes {
        let result = match &node.kind {
            ConditionKind::Group(children) => is_active(children),
            _ => node.activated.unwrap_or(false),
        };
        bucket_for(node, &mut and, &mut or).push(result);
    }
    satisfied(&and, &or)
}

/// Evaluate one attribute leaf: resolve the descriptor by id, pick the value
/// map for its scope, read the value by code name, and dispatch to the
/// comparator for the declared data type. Every resolution failure is
/// closed (false).
#[must_use]
pub fn evaluate_attribute_condition(cond: &AttributeCondition, ctx: &RuntimeContext) -> bool {
    let Some(descriptor) = ctx.descriptor(&cond.attr_id) else {
        debug!(attr_id = %cond.attr_id, "attribute descriptor not found");
        return false;
    };
    let actual = ctx
        .attributes_for(descriptor.scope)
        .get(&descriptor.code_name);
    compare_values(
        descriptor.data_type,
        &cond.logic,
        actual,
        &cond.values,
        ctx.now(),
    )
}

/// Sibling combination state: each child lands in the bucket named by its
/// own operator; a group is satisfied when the AND bucket is non-empty and
/// all-true, or the OR bucket is non-empty and any-true.
#[derive(Default)]
struct Bucket {
    seen: bool,
    all: bool,
    any: bool,
}

impl Bucket {
    fn push(&mut self, result: bool) {
        if !self.seen {
            self.seen = true;
            self.all = true;
        }
        self.all &= result;
        self.any |= result;
    }
}

fn bucket_for<'a>(node: &ConditionNode, and: &'a mut Bucket, or: &'a mut Bucket) -> &'a mut Bucket {
    match node.operator {
        SiblingOperator::And => and,
        SiblingOperator::Or => or,
    }
}

fn satisfied(and: &Bucket, or: &Bucket) -> bool {
    (and.seen && and.all) || (or.seen && or.any)
}

fn combine_live(nodes: &[ConditionNode], ctx: &RuntimeContext) -> bool {
    let mut and = Bucket::default();
    let mut or = Bucket::default();
    for node in nodes {
        let result = evaluate_node(node, ctx);
        bucket_for(node, &mut and, &mut or).push(result);
    }
    satisfied(&and, &or)
}

fn evaluate_node(node: &ConditionNode, ctx: &RuntimeContext) -> bool {
    match &node.kind {
        ConditionKind::CurrentPage(url) => ctx
            .current_url()
            .is_some_and(|u| is_match_url_pattern(u, &url.includes, &url.excludes)),
        ConditionKind::Time(window) => is_time_window_open(window, ctx.now()),
        ConditionKind::Attribute(cond) => evaluate_attribute_condition(cond, ctx),
        ConditionKind::Custom { kind, data } => match ctx.custom_predicate(kind) {
            Some(predicate) => predicate(data),
            None => {
                debug!(kind = %kind, "no predicate registered for custom condition");
                false
            }
        },
        // an empty group leaves both buckets empty and is false
        ConditionKind::Group(children) => combine_live(children, ctx),
    }
}
