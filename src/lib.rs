mod activate;
mod compare;
mod evaluate;
mod time_window;
mod types;
mod url_pattern;

pub use activate::{activate, ActivateOptions, CustomEvaluator};
pub use compare::compare_values;
pub use evaluate::{evaluate_attribute_condition, evaluate_conditions, is_active};
pub use time_window::is_time_window_open;
pub use types::{
    ActivateError, AttributeCondition, AttributeDataType, AttributeDescriptor, AttributeScope,
    AttributeValue, ConditionKind, ConditionNode, CustomPredicate, RuntimeContext,
    SiblingOperator, TimeWindow, UrlCondition, TYPE_ATTRIBUTE, TYPE_CURRENT_PAGE, TYPE_GROUP,
    TYPE_TIME,
};
pub use url_pattern::{is_match_url_pattern, UrlPattern};
