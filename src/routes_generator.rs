//! Route declarations for the configured permissions.
//!
//! The text is printed for the operator to paste into their routes file;
//! it is never written to disk.

use crate::store::Choices;
use crate::stub::{FromTo, Stubs, render};
use crate::structure::SectionName;
use anyhow::{Result, anyhow};
use heck::{ToLowerCamelCase, ToUpperCamelCase};

pub struct RoutesGenerator<'a> {
    choices: &'a Choices,
    stubs: &'a Stubs,
}

impl<'a> RoutesGenerator<'a> {
    pub fn new(choices: &'a Choices, stubs: &'a Stubs) -> Self {
        Self { choices, stubs }
    }

    /// Renders the route group for every selected permission.
    pub fn run(&self) -> Result<String> {
        let permissions = self
            .choices
            .get(SectionName::Permissions)
            .ok_or_else(|| anyhow!("Permissions are not configured"))?;

        let group = self
            .choices
            .string_or_default(SectionName::PermissionGroup, "name");
        let model = self
            .choices
            .string_or_default(SectionName::Model, "name")
            .to_lower_camel_case();

        let routes: Vec<String> = permissions
            .attributes()
            .iter()
            .filter(|(_, value)| value.as_bool() == Some(true))
            .filter_map(|(permission, _)| route(permission, &model))
            .collect();

        let from_to = FromTo::from([
            ("${routePrefix}".to_string(), group.replace('.', "/")),
            ("${permissionGroup}".to_string(), group),
            ("${routes}".to_string(), routes.join("\n")),
        ]);

        Ok(render(&self.stubs.get("routes")?, &from_to))
    }
}

/// One route line, or `None` for a permission without a route.
fn route(permission: &str, model: &str) -> Option<String> {
    let (verb, uri) = match permission {
        "index" => ("get", String::new()),
        "create" => ("get", "create".to_string()),
        "store" => ("post", String::new()),
        "show" => ("get", format!("{{{}}}", model)),
        "edit" => ("get", format!("{{{}}}/edit", model)),
        "update" => ("patch", format!("{{{}}}", model)),
        "destroy" => ("delete", format!("{{{}}}", model)),
        "initTable" | "tableData" | "exportExcel" | "options" => ("get", permission.to_string()),
        _ => return None,
    };

    Some(format!(
        "        Route::{}('{}', '{}')->name('{}');",
        verb,
        uri,
        permission.to_upper_camel_case(),
        permission
    ))
}
