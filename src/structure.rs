//! Section definitions and typed attribute values.
//!
//! Every configurable section carries an ordered set of attributes whose
//! [`Kind`] is fixed when the section is defined. Operator input is parsed
//! against that kind, so a value can never change type across edits.

use std::fmt;
use thiserror::Error;

/// The fixed, ordered set of configurable sections.
///
/// The derived ordering follows the menu order, which is also the order
/// sections are stored and listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionName {
    Model,
    PermissionGroup,
    Permissions,
    Menu,
    Files,
}

impl SectionName {
    /// All sections in menu order.
    pub const ALL: [SectionName; 5] = [
        SectionName::Model,
        SectionName::PermissionGroup,
        SectionName::Permissions,
        SectionName::Menu,
        SectionName::Files,
    ];

    /// Human readable menu label.
    pub fn label(&self) -> &'static str {
        match self {
            SectionName::Model => "Model",
            SectionName::PermissionGroup => "Permission Group",
            SectionName::Permissions => "Permissions",
            SectionName::Menu => "Menu",
            SectionName::Files => "Files",
        }
    }

    /// Store key (lower camel case of the label).
    pub fn key(&self) -> &'static str {
        match self {
            SectionName::Model => "model",
            SectionName::PermissionGroup => "permissionGroup",
            SectionName::Permissions => "permissions",
            SectionName::Menu => "menu",
            SectionName::Files => "files",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.key() == key)
    }

    /// Whether the section is a set of boolean selection flags, pruned down
    /// to the selected ones before generation.
    pub fn is_flag_set(&self) -> bool {
        matches!(self, SectionName::Files)
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Declared type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Bool,
    Int,
    Str,
    /// Declared without a type; any input is taken as-is.
    Null,
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Bool => "boolean",
            Kind::Int => "integer",
            Kind::Str => "string",
            Kind::Null => "NULL",
        }
    }

    /// Whether a value may be stored in an attribute of this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        *self == Kind::Null || value.kind() == *self
    }

    /// Parses raw operator input for the attribute `key`.
    ///
    /// Integers must round-trip exactly through parsing, so `"007"` or
    /// `"+5"` are rejected while `"-3"` is accepted.
    pub fn parse(&self, key: &str, raw: &str) -> Result<Value, InputError> {
        match self {
            Kind::Null | Kind::Str => Ok(Value::Str(raw.to_string())),
            Kind::Int => match raw.parse::<i64>() {
                Ok(number) if number.to_string() == raw => Ok(Value::Int(number)),
                _ => Err(self.mismatch(key)),
            },
            Kind::Bool => match raw.to_lowercase().as_str() {
                "y" | "yes" | "true" | "1" => Ok(Value::Bool(true)),
                "n" | "no" | "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(self.mismatch(key)),
            },
        }
    }

    fn mismatch(&self, key: &str) -> InputError {
        InputError::TypeMismatch {
            key: key.to_string(),
            expected: self.name(),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
    Null,
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Str(_) => Kind::Str,
            Value::Null => Kind::Null,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(value) => write!(f, "{}", value),
            Value::Int(value) => write!(f, "{}", value),
            Value::Str(value) => f.write_str(value),
            Value::Null => f.write_str("null"),
        }
    }
}

/// Recoverable input errors. The wizard reports these and re-prompts.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("{key} must be of type {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Value \"{0}\" is invalid")]
    InvalidChoice(String),
}

#[derive(Debug, Clone, PartialEq)]
struct Attribute {
    kind: Kind,
    value: Value,
}

/// Ordered attribute map of one section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, Attribute)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attribute whose kind is taken from its default value.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.entries.push((
            key.to_string(),
            Attribute {
                kind: value.kind(),
                value,
            },
        ));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.position(key).map(|index| &self.entries[index].1.value)
    }

    pub fn kind(&self, key: &str) -> Option<Kind> {
        self.position(key).map(|index| self.entries[index].1.kind)
    }

    /// Returns the attribute at `index` in declaration order.
    pub fn entry(&self, index: usize) -> Option<(&str, Kind, &Value)> {
        self.entries
            .get(index)
            .map(|(key, attribute)| (key.as_str(), attribute.kind, &attribute.value))
    }

    /// Stores `value` under `key`, rejecting values whose kind differs from
    /// the declared one. Unknown keys are added with the value's kind.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), InputError> {
        match self.position(key) {
            Some(index) => {
                let attribute = &mut self.entries[index].1;
                if !attribute.kind.accepts(&value) {
                    return Err(attribute.kind.mismatch(key));
                }
                attribute.value = value;
            }
            None => self.entries.push((
                key.to_string(),
                Attribute {
                    kind: value.kind(),
                    value,
                },
            )),
        }
        Ok(())
    }

    /// Removes `key`. Removing a missing key is a no-op.
    pub fn remove(&mut self, key: &str) {
        self.entries.retain(|(existing, _)| existing != key);
    }

    pub fn has(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(key, attribute)| (key.as_str(), &attribute.value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(existing, _)| existing == key)
    }
}

/// One configurable section: typed attributes, prerequisites and whether the
/// operator has confirmed it.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    name: SectionName,
    attributes: Attributes,
    requires: Vec<SectionName>,
    configured: bool,
}

impl Section {
    pub fn new(name: SectionName, attributes: Attributes, requires: Vec<SectionName>) -> Self {
        Self {
            name,
            attributes,
            requires,
            configured: false,
        }
    }

    /// Built-in definition of `name` with its default attributes.
    pub fn default_for(name: SectionName) -> Self {
        match name {
            SectionName::Model => Self::new(
                name,
                Attributes::new()
                    .with("name", "Model")
                    .with("namespace", "App"),
                vec![],
            ),
            SectionName::PermissionGroup => Self::new(
                name,
                Attributes::new().with("name", "administration.models"),
                vec![],
            ),
            SectionName::Permissions => Self::new(
                name,
                Attributes::new()
                    .with("index", true)
                    .with("create", true)
                    .with("store", true)
                    .with("show", false)
                    .with("edit", true)
                    .with("update", true)
                    .with("destroy", true)
                    .with("initTable", true)
                    .with("tableData", true)
                    .with("exportExcel", true)
                    .with("options", true),
                vec![SectionName::Model, SectionName::PermissionGroup],
            ),
            SectionName::Menu => Self::new(
                name,
                Attributes::new()
                    .with("name", "Models")
                    .with("icon", "list")
                    .with("parentMenu", Value::Null)
                    .with("orderIndex", 999i64)
                    .with("hasChildren", false),
                vec![SectionName::Permissions],
            ),
            SectionName::Files => Self::new(
                name,
                Attributes::new()
                    .with("model", true)
                    .with("migration", true)
                    .with("seeder", false)
                    .with("policy", true),
                vec![SectionName::Model],
            ),
        }
    }

    pub fn name(&self) -> SectionName {
        self.name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub fn requires(&self) -> &[SectionName] {
        &self.requires
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Marks the section as configured. There is no way back.
    pub fn confirm(&mut self) {
        self.configured = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_keys_round_trip_through_from_key() {
        for name in SectionName::ALL {
            assert_eq!(SectionName::from_key(name.key()), Some(name));
        }
        assert_eq!(SectionName::from_key("generate"), None);
    }

    #[test]
    fn test_sections_order_follows_menu() {
        let mut names = vec![SectionName::Files, SectionName::Model, SectionName::Menu];
        names.sort();
        assert_eq!(names, vec![SectionName::Model, SectionName::Menu, SectionName::Files]);
    }

    #[test]
    fn test_int_parse_requires_exact_round_trip() {
        assert_eq!(Kind::Int.parse("order", "42"), Ok(Value::Int(42)));
        assert_eq!(Kind::Int.parse("order", "-3"), Ok(Value::Int(-3)));

        for raw in ["007", "+5", "4.2", "ten", " 1"] {
            assert_eq!(
                Kind::Int.parse("order", raw),
                Err(InputError::TypeMismatch {
                    key: "order".to_string(),
                    expected: "integer",
                }),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_bool_parse_accepts_common_answers() {
        assert_eq!(Kind::Bool.parse("index", "Yes"), Ok(Value::Bool(true)));
        assert_eq!(Kind::Bool.parse("index", "n"), Ok(Value::Bool(false)));
        assert!(Kind::Bool.parse("index", "maybe").is_err());
    }

    #[test]
    fn test_null_kind_accepts_any_input() {
        assert_eq!(Kind::Null.parse("parentMenu", "12"), Ok(Value::Str("12".to_string())));
        assert!(Kind::Null.accepts(&Value::Int(1)));
        assert!(Kind::Null.accepts(&Value::Null));
    }

    #[test]
    fn test_set_rejects_kind_change() {
        let mut attributes = Attributes::new().with("name", "Model").with("orderIndex", 999i64);

        let err = attributes.set("orderIndex", Value::from("first")).unwrap_err();
        assert_eq!(err.to_string(), "orderIndex must be of type integer");
        assert_eq!(attributes.get("orderIndex"), Some(&Value::Int(999)));

        attributes.set("name", Value::from("Invoice")).unwrap();
        assert_eq!(attributes.get("name"), Some(&Value::from("Invoice")));
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let mut attributes = Attributes::new().with("model", true);
        attributes.remove("seeder");
        attributes.remove("model");
        attributes.remove("model");
        assert!(attributes.is_empty());
    }

    #[test]
    fn test_keys_keep_declaration_order() {
        let section = Section::default_for(SectionName::Files);
        let keys: Vec<&str> = section.attributes().keys().collect();
        assert_eq!(keys, vec!["model", "migration", "seeder", "policy"]);
    }

    #[test]
    fn test_permissions_require_model_and_group() {
        let section = Section::default_for(SectionName::Permissions);
        assert_eq!(
            section.requires(),
            &[SectionName::Model, SectionName::PermissionGroup]
        );
        assert!(!section.is_configured());
    }
}
