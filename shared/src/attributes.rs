use std::collections::HashMap;

use crate::LegacyAttribute;

pub const EMAIL_VERIFIED: &str = "email_verified";

/// Ordered set of attribute names allowed to cross into the new user pool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeAllowList {
    names: Vec<String>,
}

impl AttributeAllowList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::default();
        for name in names {
            let name = name.into();
            if !name.is_empty() && !list.contains(&name) {
                list.names.push(name);
            }
        }
        list
    }

    /// Parse a comma-separated list such as `email,custom:id`
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(',').map(str::trim))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Build the `userAttributes` handed to the new user pool.
///
/// Only pairs with a non-empty name and a non-empty value, whose name is on the
/// allow-list, are copied. `email_verified` is always forced to `"true"` so the
/// new pool never sends a verification code for a migrated user.
pub fn filter_attributes(
    attributes: &[LegacyAttribute],
    allow_list: &AttributeAllowList,
) -> HashMap<String, String> {
    let mut user_attributes = HashMap::new();

    for attribute in attributes {
        let (Some(name), Some(value)) = (attribute.name.as_deref(), attribute.value.as_deref())
        else {
            continue;
        };
        if !name.is_empty() && !value.is_empty() && allow_list.contains(name) {
            user_attributes.insert(name.to_string(), value.to_string());
        }
    }

    user_attributes.insert(EMAIL_VERIFIED.to_string(), "true".to_string());
    user_attributes
}
