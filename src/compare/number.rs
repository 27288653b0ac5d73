use tracing::debug;

use crate::types::AttributeValue;

/// Number comparator. A non-numeric actual value makes every comparison
/// logic false; only `empty`/`any` look at the raw value.
pub(super) fn compare(
    logic: &str,
    actual: Option<&AttributeValue>,
    operands: &[AttributeValue],
) -> bool {
    match logic {
        "empty" => actual.is_none_or(AttributeValue::is_empty),
        "any" => !actual.is_none_or(AttributeValue::is_empty),
        _ => {
            let Some(actual) = actual.and_then(AttributeValue::as_number) else {
                return false;
            };
            compare_numeric(logic, actual, operands)
        }
    }
}

fn compare_numeric(logic: &str, actual: f64, operands: &[AttributeValue]) -> bool {
    let operand = operands.first().and_then(AttributeValue::as_number);
    match logic {
        "between" => {
            // Inclusive on both ends; bounds are taken as authored, never
            // reordered.
            let (Some(low), Some(high)) = (
                operand,
                operands.get(1).and_then(AttributeValue::as_number),
            ) else {
                return false;
            };
            actual >= low && actual <= high
        }
        _ => {
            let Some(operand) = operand else {
                return false;
            };
            match logic {
                "is" => actual == operand,
                "not" => actual != operand,
                "isLessThan" => actual < operand,
                "isLessThanOrEqualTo" => actual <= operand,
                "isGreaterThan" => actual > operand,
                "isGreaterThanOrEqualTo" => actual >= operand,
                other => {
                    debug!(logic = other, "unknown number logic");
                    false
                }
            }
        }
    }
}
