use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use super::attribute::{AttributeDescriptor, AttributeScope, AttributeValue};

/// A synchronous predicate backing a custom leaf kind during live tree
/// evaluation. Receives the leaf's opaque `data` payload.
pub type CustomPredicate = dyn Fn(&JsonValue) -> bool + Send + Sync;

/// The caller-supplied bag of facts an evaluation runs against: current page
/// URL, a pinned "now", attribute descriptors, per-scope attribute values,
/// and sync predicates for custom leaf kinds.
///
/// Constructed fresh per evaluation call and discarded afterward; the engine
/// holds no state across calls and never mutates the context.
#[derive(Clone)]
pub struct RuntimeContext {
    current_url: Option<String>,
    now: DateTime<Utc>,
    descriptors: Vec<AttributeDescriptor>,
    user_attributes: HashMap<String, AttributeValue>,
    company_attributes: HashMap<String, AttributeValue>,
    membership_attributes: HashMap<String, AttributeValue>,
    custom_predicates: HashMap<String, Arc<CustomPredicate>>,
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self {
            current_url: None,
            now: Utc::now(),
            descriptors: Vec::new(),
            user_attributes: HashMap::new(),
            company_attributes: HashMap::new(),
            membership_attributes: HashMap::new(),
            custom_predicates: HashMap::new(),
        }
    }
}

impl RuntimeContext {
    /// Create an empty context with "now" pinned to the current wall clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the evaluation clock. Every time-dependent evaluator reads this
    /// instant instead of the live wall clock.
    #[must_use]
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Set the current page URL.
    #[must_use]
    pub fn with_current_url(mut self, url: &str) -> Self {
        self.current_url = Some(url.to_owned());
        self
    }

    /// Supply the attribute descriptor list.
    #[must_use]
    pub fn with_descriptors(mut self, descriptors: Vec<AttributeDescriptor>) -> Self {
        self.descriptors = descriptors;
        self
    }

    /// Set a user-scope attribute value.
    #[must_use]
    pub fn set_user_attribute(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.user_attributes.insert(name.to_owned(), value.into());
        self
    }

    /// Set a company-scope attribute value.
    #[must_use]
    pub fn set_company_attribute(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.company_attributes.insert(name.to_owned(), value.into());
        self
    }

    /// Set a membership-scope attribute value.
    #[must_use]
    pub fn set_membership_attribute(
        mut self,
        name: &str,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.membership_attributes
            .insert(name.to_owned(), value.into());
        self
    }

    /// Register a synchronous predicate for a custom leaf kind. Custom
    /// leaves with no registered predicate evaluate closed (false).
    #[must_use]
    pub fn with_custom_predicate(
        mut self,
        kind: &str,
        predicate: impl Fn(&JsonValue) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.custom_predicates
            .insert(kind.to_owned(), Arc::new(predicate));
        self
    }

    #[must_use]
    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Resolve a descriptor by attribute id.
    #[must_use]
    pub fn descriptor(&self, attr_id: &str) -> Option<&AttributeDescriptor> {
        self.descriptors.iter().find(|d| d.id == attr_id)
    }

    /// The attribute value map for a scope.
    #[must_use]
    pub fn attributes_for(&self, scope: AttributeScope) -> &HashMap<String, AttributeValue> {
        match scope {
            AttributeScope::User => &self.user_attributes,
            AttributeScope::Company => &self.company_attributes,
            AttributeScope::Membership => &self.membership_attributes,
        }
    }

    #[must_use]
    pub fn custom_predicate(&self, kind: &str) -> Option<&Arc<CustomPredicate>> {
        self.custom_predicates.get(kind)
    }
}

impl fmt::Debug for RuntimeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeContext")
            .field("current_url", &self.current_url)
            .field("now", &self.now)
            .field("descriptors", &self.descriptors.len())
            .field("user_attributes", &self.user_attributes)
            .field("company_attributes", &self.company_attributes)
            .field("membership_attributes", &self.membership_attributes)
            .field(
                "custom_predicates",
                &self.custom_predicates.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}
