use tracing::debug;

use crate::types::AttributeValue;

/// List comparator for set-valued attributes.
///
/// The operand is itself a list (either a single `List` value or the raw
/// operand slice). Null/empty operand entries are dropped before matching;
/// an operand list that filters down to nothing makes all four membership
/// logics false.
pub(super) fn compare(
    logic: &str,
    actual: Option<&AttributeValue>,
    operands: &[AttributeValue],
) -> bool {
    match logic {
        "empty" => actual.is_none_or(AttributeValue::is_empty),
        "any" => !actual.is_none_or(AttributeValue::is_empty),
        _ => {
            let operand = filtered_operand(operands);
            if operand.is_empty() {
                return false;
            }
            let actual = actual_items(actual);
            match logic {
                "includesAtLeastOne" => operand.iter().any(|v| actual.contains(v)),
                "includesAll" => operand.iter().all(|v| actual.contains(v)),
                "notIncludesAtLeastOne" => operand.iter().any(|v| !actual.contains(v)),
                "notIncludesAll" => operand.iter().all(|v| !actual.contains(v)),
                other => {
                    debug!(logic = other, "unknown list logic");
                    false
                }
            }
        }
    }
}

/// The operand list with null/empty entries removed.
fn filtered_operand(operands: &[AttributeValue]) -> Vec<&AttributeValue> {
    let raw: &[AttributeValue] = match operands.first() {
        Some(AttributeValue::List(items)) if operands.len() == 1 => items,
        _ => operands,
    };
    raw.iter().filter(|v| !v.is_empty()).collect()
}

/// The actual value as a slice of members. A scalar counts as a one-element
/// list so membership checks still apply.
fn actual_items(actual: Option<&AttributeValue>) -> Vec<&AttributeValue> {
    match actual {
        None | Some(AttributeValue::Null) => Vec::new(),
        Some(AttributeValue::List(items)) => items.iter().collect(),
        Some(other) => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> AttributeValue {
        AttributeValue::List(values.iter().map(|s| (*s).into()).collect())
    }

    #[test]
    fn includes_at_least_one() {
        let actual = tags(&["a", "b", "c"]);
        assert!(compare("includesAtLeastOne", Some(&actual), &["c".into(), "z".into()]));
        assert!(!compare("includesAtLeastOne", Some(&actual), &["x".into(), "z".into()]));
    }

    #[test]
    fn includes_all() {
        let actual = tags(&["a", "b", "c"]);
        assert!(compare("includesAll", Some(&actual), &["a".into(), "c".into()]));
        assert!(!compare("includesAll", Some(&actual), &["a".into(), "z".into()]));
    }

    #[test]
    fn not_includes_variants() {
        let actual = tags(&["a", "b"]);
        assert!(compare("notIncludesAtLeastOne", Some(&actual), &["a".into(), "z".into()]));
        assert!(!compare("notIncludesAtLeastOne", Some(&actual), &["a".into(), "b".into()]));
        assert!(compare("notIncludesAll", Some(&actual), &["x".into(), "z".into()]));
        assert!(!compare("notIncludesAll", Some(&actual), &["x".into(), "b".into()]));
    }

    #[test]
    fn operand_as_single_list_value() {
        let actual = tags(&["a", "b"]);
        let operand = vec![tags(&["b"])];
        assert!(compare("includesAtLeastOne", Some(&actual), &operand));
    }

    #[test]
    fn null_and_empty_operand_entries_are_dropped() {
        let actual = tags(&["a", "b"]);
        let operand: Vec<AttributeValue> =
            vec![AttributeValue::Null, "".into(), "b".into()];
        // only "b" survives filtering, and it is present
        assert!(compare("includesAll", Some(&actual), &operand));
    }

    #[test]
    fn fully_filtered_operand_is_always_false() {
        let actual = tags(&["a", "b"]);
        let operand: Vec<AttributeValue> = vec![AttributeValue::Null, "".into()];
        for logic in [
            "includesAtLeastOne",
            "includesAll",
            "notIncludesAtLeastOne",
            "notIncludesAll",
        ] {
            assert!(
                !compare(logic, Some(&actual), &operand),
                "{logic} must be false for an empty filtered operand"
            );
        }
    }

    #[test]
    fn scalar_actual_acts_as_one_element_list() {
        let actual = AttributeValue::from("a");
        assert!(compare("includesAtLeastOne", Some(&actual), &["a".into()]));
        assert!(!compare("includesAtLeastOne", Some(&actual), &["b".into()]));
    }

    #[test]
    fn empty_and_any() {
        assert!(compare("empty", None, &[]));
        assert!(compare("empty", Some(&tags(&[])), &[]));
        assert!(compare("any", Some(&tags(&["a"])), &[]));
        assert!(!compare("any", None, &[]));
    }

    #[test]
    fn unknown_logic_is_false() {
        let actual = tags(&["a"]);
        assert!(!compare("includes", Some(&actual), &["a".into()]));
    }
}
