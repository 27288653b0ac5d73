use tracing::debug;

use crate::types::AttributeValue;

/// Boolean comparator. Only genuine booleans satisfy `true`/`false`.
pub(super) fn compare(logic: &str, actual: Option<&AttributeValue>) -> bool {
    match logic {
        "true" => actual.and_then(AttributeValue::as_bool) == Some(true),
        "false" => actual.and_then(AttributeValue::as_bool) == Some(false),
        "empty" => actual.is_none_or(AttributeValue::is_empty),
        "any" => !actual.is_none_or(AttributeValue::is_empty),
        other => {
            debug!(logic = other, "unknown boolean logic");
            false
        }
    }
}
