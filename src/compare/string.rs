use tracing::debug;

use crate::types::AttributeValue;

/// String comparator. The actual value is coerced to a string first; an
/// absent value coerces to the empty string.
pub(super) fn compare(
    logic: &str,
    actual: Option<&AttributeValue>,
    operands: &[AttributeValue],
) -> bool {
    let actual = actual.map(AttributeValue::coerce_string).unwrap_or_default();
    let operand = operands
        .first()
        .map(AttributeValue::coerce_string)
        .unwrap_or_default();

    match logic {
        "is" => actual == operand,
        "not" => actual != operand,
        "contains" => actual.contains(&operand),
        "notContain" => !actual.contains(&operand),
        "startsWith" => actual.starts_with(&operand),
        "endsWith" => actual.ends_with(&operand),
        "empty" => actual.is_empty(),
        "any" => !actual.is_empty(),
        other => {
            debug!(logic = other, "unknown string logic");
            false
        }
    }
}
