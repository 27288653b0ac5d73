use chrono::{TimeZone, Utc};
use flowgate::{
    AttributeDataType, AttributeDescriptor, AttributeScope, AttributeValue, ConditionNode,
    RuntimeContext, SiblingOperator,
};
use proptest::prelude::*;

// --- Fixed attribute schema ---
// plan      : string, one of {"free", "pro", "enterprise"}  (user scope)
// seats     : number, 0..=200                               (company scope)
// beta      : bool                                          (user scope)
// tags      : list over {"saas", "fintech", "gaming"}       (company scope)
// signed_up : date-time, including unparsable values        (user scope)

const PLANS: &[&str] = &["free", "pro", "enterprise"];
const TAGS: &[&str] = &["saas", "fintech", "gaming"];
const SIGNUPS: &[&str] = &[
    "2024-05-08T09:00:00",
    "2024-05-01",
    "1999-12-31T23:59:59",
    "not-a-date",
    "",
];

pub fn descriptors() -> Vec<AttributeDescriptor> {
    vec![
        AttributeDescriptor::new(
            "attr-plan",
            "plan",
            AttributeDataType::String,
            AttributeScope::User,
        ),
        AttributeDescriptor::new(
            "attr-seats",
            "seats",
            AttributeDataType::Number,
            AttributeScope::Company,
        ),
        AttributeDescriptor::new(
            "attr-beta",
            "beta",
            AttributeDataType::Bool,
            AttributeScope::User,
        ),
        AttributeDescriptor::new(
            "attr-tags",
            "tags",
            AttributeDataType::List,
            AttributeScope::Company,
        ),
        AttributeDescriptor::new(
            "attr-signup",
            "signed_up",
            AttributeDataType::DateTime,
            AttributeScope::User,
        ),
    ]
}

/// Generate a context aligned with the fixed attribute schema.
pub fn arb_context() -> impl Strategy<Value = RuntimeContext> {
    (
        prop::sample::select(PLANS),
        0_i64..=200,
        any::<bool>(),
        prop::sample::subsequence(TAGS.to_vec(), 0..=TAGS.len()),
        prop::sample::select(SIGNUPS),
    )
        .prop_map(|(plan, seats, beta, tags, signed_up)| {
            let tags: Vec<AttributeValue> = tags.into_iter().map(AttributeValue::from).collect();
            RuntimeContext::new()
                .with_now(Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap())
                .with_current_url("https://app.example.com/home")
                .with_descriptors(descriptors())
                .set_user_attribute("plan", plan)
                .set_user_attribute("beta", beta)
                .set_user_attribute("signed_up", signed_up)
                .set_company_attribute("seats", seats)
                .set_company_attribute("tags", tags)
        })
}

/// Generate an attribute leaf over the schema. Logic tags include a bogus
/// one so the fail-closed path stays exercised.
pub fn arb_leaf() -> impl Strategy<Value = ConditionNode> {
    let counter = std::sync::atomic::AtomicU64::new(0);
    let plan = (
        prop::sample::select(PLANS),
        prop::sample::select(&["is", "not", "contains", "empty", "any", "bogus"][..]),
    )
        .prop_map(|(value, logic)| ("attr-plan", logic, vec![AttributeValue::from(value)]));
    let seats = (
        0_i64..=200,
        prop::sample::select(
            &["is", "isLessThan", "isGreaterThanOrEqualTo", "between", "bogus"][..],
        ),
    )
        .prop_map(|(value, logic)| {
            let operands = vec![AttributeValue::from(value), AttributeValue::from(value + 10)];
            ("attr-seats", logic, operands)
        });
    let beta = prop::sample::select(&["true", "false", "empty", "any"][..])
        .prop_map(|logic| ("attr-beta", logic, vec![]));
    let tags = (
        prop::sample::subsequence(TAGS.to_vec(), 0..=TAGS.len()),
        prop::sample::select(&["includesAtLeastOne", "includesAll", "notIncludesAll"][..]),
    )
        .prop_map(|(values, logic)| {
            let values: Vec<AttributeValue> =
                values.into_iter().map(AttributeValue::from).collect();
            ("attr-tags", logic, values)
        });
    // day counts over the whole f64 range so the comparator arithmetic is
    // exercised at the boundaries too
    let signup = (
        any::<f64>(),
        prop::sample::select(
            &["lessThan", "moreThan", "exactly", "before", "on", "after", "bogus"][..],
        ),
    )
        .prop_map(|(days, logic)| ("attr-signup", logic, vec![AttributeValue::Number(days)]));

    prop_oneof![plan, seats, beta, tags, signup].prop_map(move |(attr, logic, values)| {
        let n = counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        ConditionNode::attribute(&format!("leaf-{n}"), attr, logic, values)
    })
}

/// Generate a condition tree of bounded depth: attribute leaves composed
/// into groups, with random sibling operators and random pre-set activation
/// flags on leaves (never on groups).
pub fn arb_tree(max_depth: u32) -> impl Strategy<Value = Vec<ConditionNode>> {
    let node = arb_leaf().prop_recursive(max_depth, 24, 4, |inner| {
        prop::collection::vec(inner, 1..4)
            .prop_map(|children| ConditionNode::group("group", children))
    });
    prop::collection::vec(decorate(node), 0..4)
}

fn decorate(node: impl Strategy<Value = ConditionNode>) -> impl Strategy<Value = ConditionNode> {
    (node, any::<bool>(), prop::option::of(any::<bool>())).prop_map(
        |(node, use_or, activated)| {
            let node = if use_or {
                node.with_operator(SiblingOperator::Or)
            } else {
                node
            };
            match activated {
                // groups never carry their own flag
                Some(flag) if !matches!(node.kind, flowgate::ConditionKind::Group(_)) => {
                    node.with_activated(flag)
                }
                _ => node,
            }
        },
    )
}
