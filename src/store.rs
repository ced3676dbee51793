//! The configuration store shared by the wizard and the generators.

use crate::structure::{InputError, Section, SectionName, Value};
use anyhow::{Context, Result, anyhow, bail};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

/// Session parameters that locate the generated files.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    /// Base segment for front-end artifacts such as form templates.
    pub root_segment: PathBuf,
    /// Project root for back-end artifacts.
    pub base_path: PathBuf,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            root_segment: PathBuf::from("client/src/js/pages"),
            base_path: PathBuf::from("."),
        }
    }
}

/// Ordered mapping from section name to section, plus session parameters.
///
/// Sections are kept in menu order.
#[derive(Debug, Clone)]
pub struct Choices {
    sections: BTreeMap<SectionName, Section>,
    params: Params,
}

impl Choices {
    /// Creates a store holding every section with its default attributes.
    pub fn new(params: Params) -> Self {
        let sections = SectionName::ALL
            .into_iter()
            .map(|name| (name, Section::default_for(name)))
            .collect();
        Self { sections, params }
    }

    /// Creates a store with no sections.
    pub fn empty(params: Params) -> Self {
        Self {
            sections: BTreeMap::new(),
            params,
        }
    }

    /// Builds a store from a JSON object of `section -> { attribute: value }`.
    ///
    /// Every listed section is marked configured. Values go through the same
    /// kind checks as interactive input.
    pub fn from_json(params: Params, json: &str) -> Result<Self> {
        let document: serde_json::Value =
            serde_json::from_str(json).context("Failed to parse replay file")?;
        let object = document
            .as_object()
            .ok_or_else(|| anyhow!("Replay file must contain a JSON object"))?;

        let mut choices = Self::new(params);

        for (key, attributes) in object {
            let name = SectionName::from_key(key)
                .ok_or_else(|| anyhow!("Unknown section in replay file: {}", key))?;
            let attributes = attributes
                .as_object()
                .ok_or_else(|| anyhow!("Section '{}' must be a JSON object", key))?;
            let section = choices
                .get_mut(name)
                .ok_or_else(|| anyhow!("Section '{}' is not defined", key))?;

            for (attribute, raw) in attributes {
                let kind = section
                    .attributes()
                    .kind(attribute)
                    .ok_or_else(|| InputError::UnknownAttribute(format!("{}.{}", key, attribute)))?;
                let value = json_value(raw).ok_or_else(|| InputError::TypeMismatch {
                    key: attribute.clone(),
                    expected: kind.name(),
                })?;
                section
                    .attributes_mut()
                    .set(attribute, value)
                    .with_context(|| format!("Invalid value in section '{}'", key))?;
            }

            section.confirm();
            debug!("Replayed section '{}'", key);
        }

        Ok(choices)
    }

    pub fn get(&self, name: SectionName) -> Option<&Section> {
        self.sections.get(&name)
    }

    pub fn get_mut(&mut self, name: SectionName) -> Option<&mut Section> {
        self.sections.get_mut(&name)
    }

    pub fn set(&mut self, section: Section) {
        self.sections.insert(section.name(), section);
    }

    /// Removes a section. Removing a missing section is a no-op.
    pub fn remove(&mut self, name: SectionName) {
        self.sections.remove(&name);
    }

    pub fn has(&self, name: SectionName) -> bool {
        self.sections.contains_key(&name)
    }

    /// Section names in menu order.
    pub fn keys(&self) -> Vec<SectionName> {
        self.sections.keys().copied().collect()
    }

    /// Names of the sections the operator has confirmed, in menu order.
    pub fn configured(&self) -> Vec<SectionName> {
        self.sections
            .values()
            .filter(|section| section.is_configured())
            .map(Section::name)
            .collect()
    }

    pub fn is_configured(&self, name: SectionName) -> bool {
        self.get(name).is_some_and(Section::is_configured)
    }

    /// Marks `name` configured. Returns false when the section is unknown.
    pub fn confirm(&mut self, name: SectionName) -> bool {
        match self.get_mut(name) {
            Some(section) => {
                section.confirm();
                true
            }
            None => false,
        }
    }

    /// Prerequisites of `name` that are not configured yet.
    pub fn missing_requirements(&self, name: SectionName) -> Vec<SectionName> {
        let requires = match self.get(name) {
            Some(section) => section.requires().to_vec(),
            None => Section::default_for(name).requires().to_vec(),
        };

        requires
            .into_iter()
            .filter(|required| !self.is_configured(*required))
            .collect()
    }

    /// Looks up an attribute value of a section in the store.
    pub fn attribute(&self, name: SectionName, key: &str) -> Option<&Value> {
        self.get(name).and_then(|section| section.attributes().get(key))
    }

    /// String attribute of a section, falling back to the built-in default
    /// when the section was filtered out.
    pub fn string_or_default(&self, name: SectionName, key: &str) -> String {
        match self.attribute(name, key) {
            Some(value) => value.to_string(),
            None => Section::default_for(name)
                .attributes()
                .get(key)
                .map(Value::to_string)
                .unwrap_or_default(),
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

fn json_value(raw: &serde_json::Value) -> Option<Value> {
    match raw {
        serde_json::Value::Null => Some(Value::Null),
        serde_json::Value::Bool(value) => Some(Value::Bool(*value)),
        serde_json::Value::Number(number) => number.as_i64().map(Value::Int),
        serde_json::Value::String(value) => Some(Value::Str(value.clone())),
        _ => None,
    }
}

/// Fails with the operator-facing message when nothing was configured.
pub fn ensure_configured(choices: &Choices) -> Result<()> {
    if choices.configured().is_empty() {
        bail!("There is nothing configured yet!");
    }
    Ok(())
}
