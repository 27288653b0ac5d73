//! Typed value comparators, one module per attribute data type.
//!
//! Every comparator takes an opaque `logic` tag, the actual runtime value
//! (absent key = `None` = empty), and the authored operand slice, and
//! returns a boolean. Unknown logic tags fail closed for every type.

mod boolean;
mod datetime;
mod list;
mod number;
mod string;

use chrono::{DateTime, Utc};

use crate::types::{AttributeDataType, AttributeValue};

/// Dispatch a comparison to the comparator for `data_type`.
///
/// `now` anchors the day-relative logics of the date-time comparator; the
/// other comparators ignore it.
#[must_use]
pub fn compare_values(
    data_type: AttributeDataType,
    logic: &str,
    actual: Option<&AttributeValue>,
    operands: &[AttributeValue],
    now: DateTime<Utc>,
) -> bool {
    match data_type {
        AttributeDataType::String => string::compare(logic, actual, operands),
        AttributeDataType::Number => number::compare(logic, actual, operands),
        AttributeDataType::Bool => boolean::compare(logic, actual),
        AttributeDataType::List => list::compare(logic, actual, operands),
        AttributeDataType::DateTime => datetime::compare(logic, actual, operands, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_reaches_each_comparator() {
        let now = Utc::now();
        let pro = AttributeValue::from("pro");
        assert!(compare_values(
            AttributeDataType::String,
            "is",
            Some(&pro),
            &["pro".into()],
            now,
        ));
        let three = AttributeValue::from(3_i64);
        assert!(compare_values(
            AttributeDataType::Number,
            "isGreaterThan",
            Some(&three),
            &[2_i64.into()],
            now,
        ));
        let yes = AttributeValue::from(true);
        assert!(compare_values(AttributeDataType::Bool, "true", Some(&yes), &[], now));
        let tags = AttributeValue::from(vec!["a".into(), "b".into()]);
        assert!(compare_values(
            AttributeDataType::List,
            "includesAtLeastOne",
            Some(&tags),
            &["b".into()],
            now,
        ));
    }

    #[test]
    fn unknown_logic_fails_closed_for_every_type() {
        let now = Utc::now();
        let value = AttributeValue::from("x");
        for data_type in [
            AttributeDataType::String,
            AttributeDataType::Number,
            AttributeDataType::Bool,
            AttributeDataType::List,
            AttributeDataType::DateTime,
        ] {
            assert!(
                !compare_values(data_type, "bogus", Some(&value), &["x".into()], now),
                "unknown logic must fail closed for {data_type:?}"
            );
        }
    }
}
