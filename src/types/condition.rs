use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::attribute::AttributeValue;

/// Condition type name for URL-targeting leaves.
pub const TYPE_CURRENT_PAGE: &str = "current-page";
/// Condition type name for time-window leaves.
pub const TYPE_TIME: &str = "time";
/// Condition type name for attribute-comparison leaves.
pub const TYPE_ATTRIBUTE: &str = "user-attr";
/// Condition type name for group nodes.
pub const TYPE_GROUP: &str = "group";

/// How a node combines with its *siblings*. Every node in one sibling
/// sequence is expected to carry the same operator; mixed sequences get
/// per-sibling bucketing (see [`evaluate_conditions`](crate::evaluate_conditions)).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiblingOperator {
    #[default]
    And,
    Or,
}

/// Payload of a `current-page` leaf: user-authored URL patterns with `*`
/// wildcards and `:param` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlCondition {
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
}

/// Payload of a `time` leaf: an optional wall-clock window.
///
/// Dates are `YYYY-MM-DD`; hour/minute fields are zero-padded into the
/// timestamp at evaluation time. A missing or unparsable start makes the
/// window evaluate closed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub start_date_hour: u32,
    #[serde(default)]
    pub start_date_minute: u32,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub end_date_hour: u32,
    #[serde(default)]
    pub end_date_minute: u32,
}

/// Payload of an attribute leaf: which attribute to read, the comparison
/// logic tag, and the operand value(s).
///
/// `logic` is kept as an opaque tag rather than an enum: unknown tags must
/// fail closed, never fail to construct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeCondition {
    pub attr_id: String,
    pub logic: String,
    #[serde(default)]
    pub values: Vec<AttributeValue>,
}

/// The closed union of condition payloads. Adding a leaf kind is a one-place
/// change: extend this enum and the dispatch in the tree evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionKind {
    /// Match the current page URL against include/exclude pattern lists.
    CurrentPage(UrlCondition),
    /// Check whether "now" falls inside a wall-clock window.
    Time(TimeWindow),
    /// Compare a named attribute's runtime value against operand(s). The
    /// serde tag matches [`TYPE_ATTRIBUTE`], the name activation control
    /// uses for this kind.
    #[serde(rename = "user-attr")]
    Attribute(AttributeCondition),
    /// An opaque leaf evaluated by a caller-supplied predicate or evaluator.
    Custom {
        kind: String,
        #[serde(default)]
        data: JsonValue,
    },
    /// An ordered sequence of child nodes, nestable to arbitrary depth.
    Group(Vec<ConditionNode>),
}

/// One node in a condition tree: a leaf predicate or a group of children.
///
/// `activated` is a pre-computed result flag populated by
/// [`activate`](crate::activate); live evaluation ignores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionNode {
    pub id: String,
    #[serde(default)]
    pub operator: SiblingOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated: Option<bool>,
    pub kind: ConditionKind,
}

impl ConditionNode {
    fn new(id: &str, kind: ConditionKind) -> Self {
        Self {
            id: id.to_owned(),
            operator: SiblingOperator::And,
            activated: None,
            kind,
        }
    }

    /// A `current-page` leaf with include/exclude URL patterns.
    #[must_use]
    pub fn current_page(id: &str, includes: &[&str], excludes: &[&str]) -> Self {
        Self::new(
            id,
            ConditionKind::CurrentPage(UrlCondition {
                includes: includes.iter().map(|s| (*s).to_owned()).collect(),
                excludes: excludes.iter().map(|s| (*s).to_owned()).collect(),
            }),
        )
    }

    /// A `time` leaf.
    #[must_use]
    pub fn time(id: &str, window: TimeWindow) -> Self {
        Self::new(id, ConditionKind::Time(window))
    }

    /// An attribute leaf comparing the attribute `attr_id` via `logic`.
    #[must_use]
    pub fn attribute(id: &str, attr_id: &str, logic: &str, values: Vec<AttributeValue>) -> Self {
        Self::new(
            id,
            ConditionKind::Attribute(AttributeCondition {
                attr_id: attr_id.to_owned(),
                logic: logic.to_owned(),
                values,
            }),
        )
    }

    /// A custom leaf with an opaque payload.
    #[must_use]
    pub fn custom(id: &str, kind: &str, data: JsonValue) -> Self {
        Self::new(
            id,
            ConditionKind::Custom {
                kind: kind.to_owned(),
                data,
            },
        )
    }

    /// A group node over an ordered child sequence.
    #[must_use]
    pub fn group(id: &str, conditions: Vec<ConditionNode>) -> Self {
        Self::new(id, ConditionKind::Group(conditions))
    }

    /// Set the sibling operator (defaults to AND).
    #[must_use]
    pub fn with_operator(mut self, operator: SiblingOperator) -> Self {
        self.operator = operator;
        self
    }

    /// Set the pre-computed activation flag.
    #[must_use]
    pub fn with_activated(mut self, activated: bool) -> Self {
        self.activated = Some(activated);
        self
    }

    /// The type name this node is controlled by in
    /// [`ActivateOptions::type_control`](crate::ActivateOptions).
    #[must_use]
    pub fn type_name(&self) -> &str {
        match &self.kind {
            ConditionKind::CurrentPage(_) => TYPE_CURRENT_PAGE,
            ConditionKind::Time(_) => TYPE_TIME,
            ConditionKind::Attribute(_) => TYPE_ATTRIBUTE,
            ConditionKind::Custom { kind, .. } => kind,
            ConditionKind::Group(_) => TYPE_GROUP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let node = ConditionNode::current_page("n1", &["https://a.com/*"], &[]);
        assert_eq!(node.id, "n1");
        assert_eq!(node.operator, SiblingOperator::And);
        assert_eq!(node.activated, None);
        assert_eq!(node.type_name(), TYPE_CURRENT_PAGE);
    }

    #[test]
    fn with_operator_and_activated() {
        let node = ConditionNode::time("t", TimeWindow::default())
            .with_operator(SiblingOperator::Or)
            .with_activated(true);
        assert_eq!(node.operator, SiblingOperator::Or);
        assert_eq!(node.activated, Some(true));
    }

    #[test]
    fn custom_type_name_is_its_kind() {
        let node = ConditionNode::custom("c", "segment", serde_json::json!({"segmentId": "s1"}));
        assert_eq!(node.type_name(), "segment");
    }

    #[test]
    fn group_type_name() {
        let node = ConditionNode::group("g", vec![]);
        assert_eq!(node.type_name(), TYPE_GROUP);
    }

    #[test]
    fn sibling_operator_serde_names() {
        assert_eq!(
            serde_json::to_string(&SiblingOperator::And).unwrap(),
            "\"and\""
        );
        assert_eq!(
            serde_json::to_string(&SiblingOperator::Or).unwrap(),
            "\"or\""
        );
    }

    #[test]
    fn kind_serde_tags_match_activation_type_names() {
        let nodes = [
            (
                ConditionNode::current_page("a", &[], &[]),
                TYPE_CURRENT_PAGE,
            ),
            (ConditionNode::time("b", TimeWindow::default()), TYPE_TIME),
            (
                ConditionNode::attribute("c", "attr-1", "is", vec![]),
                TYPE_ATTRIBUTE,
            ),
            (ConditionNode::group("d", vec![]), TYPE_GROUP),
        ];
        for (node, tag) in nodes {
            let json = serde_json::to_value(&node).unwrap();
            assert!(
                json["kind"].get(tag).is_some(),
                "kind tag should be {tag}: {json}"
            );
        }
    }

    #[test]
    fn node_round_trips_through_serde() {
        let node = ConditionNode::group(
            "root",
            vec![
                ConditionNode::attribute("a", "attr-1", "is", vec!["pro".into()]),
                ConditionNode::current_page("b", &["/app/*"], &["/app/admin"])
                    .with_operator(SiblingOperator::Or),
            ],
        );
        let json = serde_json::to_string(&node).unwrap();
        let back: ConditionNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
