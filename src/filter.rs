//! Normalization and pruning applied once the wizard hands over.
//!
//! [`apply`] canonicalizes the model name, drops every section the operator
//! never confirmed and strips unselected flags from flag-set sections.

use crate::store::Choices;
use crate::structure::{SectionName, Value};
use anyhow::Result;
use tracing::{debug, info};

/// Runs sanitize then filter. Applying it twice yields the same store.
pub fn apply(mut choices: Choices) -> Result<Choices> {
    sanitize(&mut choices)?;
    filter(&mut choices);
    Ok(choices)
}

/// Forces the first character of the model name to uppercase.
pub fn sanitize(choices: &mut Choices) -> Result<()> {
    let Some(model) = choices.get_mut(SectionName::Model) else {
        return Ok(());
    };

    let canonical = match model.attributes().get("name") {
        Some(Value::Str(name)) => upper_first(name),
        _ => return Ok(()),
    };

    model.attributes_mut().set("name", Value::Str(canonical))?;
    Ok(())
}

/// Removes unconfigured sections and unselected flags.
pub fn filter(choices: &mut Choices) {
    for name in choices.keys() {
        if !choices.is_configured(name) {
            debug!("Dropping unconfigured section '{}'", name);
            choices.remove(name);
        }
    }

    for name in choices.keys().into_iter().filter(SectionName::is_flag_set) {
        let Some(section) = choices.get_mut(name) else {
            continue;
        };

        let unselected: Vec<String> = section
            .attributes()
            .iter()
            .filter(|(_, value)| matches!(value, Value::Bool(false)))
            .map(|(key, _)| key.to_string())
            .collect();

        for key in &unselected {
            section.attributes_mut().remove(key);
        }
    }

    info!("Filtered configuration keeps sections: {:?}", choices.keys());
}

fn upper_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
