use crate::{AsValue, Value};
use std::collections::HashMap;

/// Address of a parameter inside a [`ParameterContainer`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParameterKey {
    /// Ordinal position (from 0).
    Position(usize),
    /// Parameter name, a leading `:` is ignored.
    Name(String),
    /// Append after the last parameter.
    Next,
}

impl From<usize> for ParameterKey {
    fn from(value: usize) -> Self {
        ParameterKey::Position(value)
    }
}

impl From<&str> for ParameterKey {
    fn from(value: &str) -> Self {
        ParameterKey::Name(value.into())
    }
}

impl From<String> for ParameterKey {
    fn from(value: String) -> Self {
        ParameterKey::Name(value)
    }
}

/// Type hint attached to a parameter, for backends that bind by type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ParameterType {
    #[default]
    Auto,
    Null,
    Double,
    Integer,
    Binary,
    String,
    Lob,
}

/// Ordered store of statement parameters, addressable both by name and by position.
///
/// Every parameter has a name: parameters set by a position that does not
/// exist yet are named after the decimal representation of that position.
/// The position of a parameter is the order in which its name was first set.
///
/// ```rust
/// use slate_core::{AsValue, ParameterContainer, ParameterKey, Value};
/// let mut container = ParameterContainer::new();
/// container
///     .offset_set(":id", 1)
///     .offset_set("name", "Alice")
///     .offset_set(ParameterKey::Next, true);
/// assert_eq!(container.count(), 3);
/// assert_eq!(container.key_name(2), Some("2"));
/// assert_eq!(container.offset_get(0usize), Some(&Value::Int32(Some(1))));
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParameterContainer {
    data: HashMap<String, Value>,
    positions: Vec<String>,
    errata: HashMap<String, ParameterType>,
    max_length: HashMap<String, usize>,
}

impl ParameterContainer {
    pub fn new() -> Self {
        Default::default()
    }

    /// Name the key refers to, when the key refers to an existing parameter.
    fn existing_name(&self, key: &ParameterKey) -> Option<&str> {
        match key {
            ParameterKey::Position(position) => {
                self.positions.get(*position).map(String::as_str)
            }
            ParameterKey::Name(name) => self
                .data
                .get_key_value(name.trim_start_matches(':'))
                .map(|(k, _)| k.as_str()),
            ParameterKey::Next => None,
        }
    }

    /// Name a new value set through this key would be stored under.
    fn name_for(&self, key: &ParameterKey) -> String {
        match key {
            ParameterKey::Position(position) => self
                .positions
                .get(*position)
                .cloned()
                .unwrap_or_else(|| position.to_string()),
            ParameterKey::Name(name) => name.trim_start_matches(':').to_string(),
            ParameterKey::Next => self.data.len().to_string(),
        }
    }

    /// Set a parameter, overwriting in place if the key refers to an existing one.
    pub fn offset_set<V: AsValue>(
        &mut self,
        key: impl Into<ParameterKey>,
        value: V,
    ) -> &mut Self {
        self.set_named(self.name_for(&key.into()), value.as_value());
        self
    }

    /// Set a parameter together with its type hint and maximum length.
    pub fn offset_set_with<V: AsValue>(
        &mut self,
        key: impl Into<ParameterKey>,
        value: V,
        errata: ParameterType,
        max_length: Option<usize>,
    ) -> &mut Self {
        let name = self.name_for(&key.into());
        self.set_named(name.clone(), value.as_value());
        self.errata.insert(name.clone(), errata);
        if let Some(max_length) = max_length {
            self.max_length.insert(name, max_length);
        }
        self
    }

    fn set_named(&mut self, name: String, value: Value) {
        if !self.data.contains_key(&name) {
            self.positions.push(name.clone());
        }
        self.data.insert(name, value);
    }

    pub fn offset_get(&self, key: impl Into<ParameterKey>) -> Option<&Value> {
        self.existing_name(&key.into())
            .and_then(|name| self.data.get(name))
    }

    pub fn offset_exists(&self, key: impl Into<ParameterKey>) -> bool {
        self.existing_name(&key.into()).is_some()
    }

    /// Remove a parameter, the ones after it shift back by one position.
    pub fn offset_unset(&mut self, key: impl Into<ParameterKey>) -> &mut Self {
        let Some(name) = self.existing_name(&key.into()).map(ToOwned::to_owned) else {
            return self;
        };
        self.data.remove(&name);
        self.positions.retain(|v| *v != name);
        self.errata.remove(&name);
        self.max_length.remove(&name);
        self
    }

    /// Load every `(key, value)` pair, in order.
    pub fn set_from_array<K, V, I>(&mut self, values: I) -> &mut Self
    where
        K: Into<ParameterKey>,
        V: AsValue,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in values {
            self.offset_set(key, value);
        }
        self
    }

    /// Load a positional list: the value at index `i` is set at position `i`.
    pub fn set_from_values<V, I>(&mut self, values: I) -> &mut Self
    where
        V: AsValue,
        I: IntoIterator<Item = V>,
    {
        self.set_from_array(values.into_iter().enumerate())
    }

    /// Copy all the parameters of `other` with their type hints and lengths.
    pub fn merge(&mut self, other: &ParameterContainer) -> &mut Self {
        for (name, value) in other.iter() {
            self.set_named(name.to_string(), value.clone());
            if let Some(errata) = other.errata.get(name) {
                self.errata.insert(name.to_string(), *errata);
            }
            if let Some(max_length) = other.max_length.get(name) {
                self.max_length.insert(name.to_string(), *max_length);
            }
        }
        self
    }

    pub fn offset_set_errata(
        &mut self,
        key: impl Into<ParameterKey>,
        errata: ParameterType,
    ) -> &mut Self {
        let name = self.name_for(&key.into());
        self.errata.insert(name, errata);
        self
    }

    pub fn offset_get_errata(&self, key: impl Into<ParameterKey>) -> Option<ParameterType> {
        self.existing_name(&key.into())
            .and_then(|name| self.errata.get(name).copied())
    }

    pub fn offset_has_errata(&self, key: impl Into<ParameterKey>) -> bool {
        self.offset_get_errata(key).is_some()
    }

    pub fn offset_unset_errata(&mut self, key: impl Into<ParameterKey>) -> &mut Self {
        let name = self.name_for(&key.into());
        self.errata.remove(&name);
        self
    }

    pub fn offset_set_max_length(
        &mut self,
        key: impl Into<ParameterKey>,
        max_length: usize,
    ) -> &mut Self {
        let name = self.name_for(&key.into());
        self.max_length.insert(name, max_length);
        self
    }

    pub fn offset_get_max_length(&self, key: impl Into<ParameterKey>) -> Option<usize> {
        self.existing_name(&key.into())
            .and_then(|name| self.max_length.get(name).copied())
    }

    pub fn offset_has_max_length(&self, key: impl Into<ParameterKey>) -> bool {
        self.offset_get_max_length(key).is_some()
    }

    pub fn offset_unset_max_length(&mut self, key: impl Into<ParameterKey>) -> &mut Self {
        let name = self.name_for(&key.into());
        self.max_length.remove(&name);
        self
    }

    pub fn key_position(&self, name: &str) -> Option<usize> {
        let name = name.trim_start_matches(':');
        self.positions.iter().position(|v| v == name)
    }

    pub fn key_name(&self, position: usize) -> Option<&str> {
        self.positions.get(position).map(String::as_str)
    }

    pub fn count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Parameters as `(name, value)` in position order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.positions
            .iter()
            .filter_map(|name| self.data.get(name).map(|v| (name.as_str(), v)))
    }

    pub fn named_array(&self) -> Vec<(String, Value)> {
        self.iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// The values in position order, this is what gets bound to positional placeholders.
    pub fn positional_array(&self) -> Vec<Value> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    pub fn errata(&self) -> impl Iterator<Item = (&str, ParameterType)> {
        self.positions
            .iter()
            .filter_map(|name| self.errata.get(name).map(|v| (name.as_str(), *v)))
    }
}

impl<K: Into<ParameterKey>, V: AsValue> FromIterator<(K, V)> for ParameterContainer {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut result = ParameterContainer::new();
        result.set_from_array(iter);
        result
    }
}

impl From<Vec<Value>> for ParameterContainer {
    fn from(value: Vec<Value>) -> Self {
        let mut result = ParameterContainer::new();
        result.set_from_values(value);
        result
    }
}
