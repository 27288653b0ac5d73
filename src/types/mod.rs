mod attribute;
mod condition;
mod context;
mod error;

pub use attribute::{
    AttributeDataType, AttributeDescriptor, AttributeScope, AttributeValue,
};
pub use condition::{
    AttributeCondition, ConditionKind, ConditionNode, SiblingOperator, TimeWindow, UrlCondition,
    TYPE_ATTRIBUTE, TYPE_CURRENT_PAGE, TYPE_GROUP, TYPE_TIME,
};
pub use context::{CustomPredicate, RuntimeContext};
pub use error::ActivateError;
