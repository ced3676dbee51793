//! Concrete stub providers, one per generated artifact.

use crate::store::Choices;
use crate::stub::{FromTo, StubProvider, Stubs, prepare_directory};
use crate::structure::{SectionName, Value};
use anyhow::Result;
use heck::{ToLowerCamelCase, ToSnakeCase};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Builds the providers the filtered configuration asks for, in write order.
pub fn providers<'a>(choices: &Choices, stubs: &'a Stubs) -> Vec<Box<dyn StubProvider + 'a>> {
    let mut providers: Vec<Box<dyn StubProvider + 'a>> = Vec::new();
    let model = ModelInfo::from_choices(choices);

    if choices.has(SectionName::Model) {
        providers.push(Box::new(Template::new(choices, stubs)));
    }

    if let Some(files) = choices.get(SectionName::Files) {
        for (flag, selected) in files.attributes().iter() {
            if selected.as_bool() != Some(true) {
                continue;
            }
            match flag {
                "model" => providers.push(Box::new(ModelClass::new(model.clone(), choices, stubs))),
                "migration" => providers.push(Box::new(Migration::new(model.clone(), choices, stubs))),
                "seeder" => providers.push(Box::new(Seeder::new(model.clone(), choices, stubs))),
                "policy" => providers.push(Box::new(Policy::new(model.clone(), choices, stubs))),
                other => debug!("No writer for file flag '{}'", other),
            }
        }
    }

    if choices.has(SectionName::Permissions) || choices.has(SectionName::Menu) {
        providers.push(Box::new(StructureMigration::new(model, choices, stubs)));
    }

    providers
}

/// Model naming shared by the back-end providers.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub name: String,
    pub namespace: String,
}

impl ModelInfo {
    pub fn from_choices(choices: &Choices) -> Self {
        Self {
            name: choices.string_or_default(SectionName::Model, "name"),
            namespace: choices.string_or_default(SectionName::Model, "namespace"),
        }
    }

    /// Class name, the sanitized model name as entered, e.g. `InvoiceLine`.
    pub fn class(&self) -> String {
        self.name.clone()
    }

    /// Variable name, e.g. `invoiceLine`.
    pub fn variable(&self) -> String {
        self.name.to_lower_camel_case()
    }

    /// Table name, e.g. `invoice_lines`.
    pub fn table(&self) -> String {
        format!("{}s", self.name.to_snake_case())
    }

    fn from_to(&self) -> FromTo {
        FromTo::from([
            ("${Model}".to_string(), self.class()),
            ("${model}".to_string(), self.variable()),
            ("${table}".to_string(), self.table()),
            ("${namespace}".to_string(), self.namespace.clone()),
        ])
    }
}

/// Form template, `{root_segment}/Forms/Templates/{model}.json`.
pub struct Template<'a> {
    name: String,
    group: String,
    root_segment: PathBuf,
    stubs: &'a Stubs,
}

impl<'a> Template<'a> {
    pub fn new(choices: &Choices, stubs: &'a Stubs) -> Self {
        Self {
            name: choices.string_or_default(SectionName::Model, "name"),
            group: choices.string_or_default(SectionName::PermissionGroup, "name"),
            root_segment: choices.params().root_segment.clone(),
            stubs,
        }
    }

    fn path(&self) -> PathBuf {
        self.root_segment.join("Forms").join("Templates")
    }
}

impl StubProvider for Template<'_> {
    fn prepare(&self) -> Result<()> {
        prepare_directory(&self.path())
    }

    fn file_path(&self) -> PathBuf {
        self.path()
            .join(format!("{}.json", self.name.to_lower_camel_case()))
    }

    fn from_to(&self) -> FromTo {
        FromTo::from([("${permissionGroup}".to_string(), self.group.clone())])
    }

    fn stub(&self) -> Result<String> {
        self.stubs.get("template")
    }
}

/// Eloquent model class, `{base_path}/app/{Model}.php`.
pub struct ModelClass<'a> {
    model: ModelInfo,
    base_path: PathBuf,
    stubs: &'a Stubs,
}

impl<'a> ModelClass<'a> {
    pub fn new(model: ModelInfo, choices: &Choices, stubs: &'a Stubs) -> Self {
        Self {
            model,
            base_path: choices.params().base_path.clone(),
            stubs,
        }
    }
}

impl StubProvider for ModelClass<'_> {
    fn prepare(&self) -> Result<()> {
        prepare_directory(&self.base_path.join("app"))
    }

    fn file_path(&self) -> PathBuf {
        self.base_path
            .join("app")
            .join(format!("{}.php", self.model.class()))
    }

    fn from_to(&self) -> FromTo {
        self.model.from_to()
    }

    fn stub(&self) -> Result<String> {
        self.stubs.get("model")
    }
}

/// Table migration, `{base_path}/database/migrations/create_{table}_table.php`.
pub struct Migration<'a> {
    model: ModelInfo,
    base_path: PathBuf,
    stubs: &'a Stubs,
}

impl<'a> Migration<'a> {
    pub fn new(model: ModelInfo, choices: &Choices, stubs: &'a Stubs) -> Self {
        Self {
            model,
            base_path: choices.params().base_path.clone(),
            stubs,
        }
    }
}

impl StubProvider for Migration<'_> {
    fn prepare(&self) -> Result<()> {
        prepare_directory(&migrations_dir(&self.base_path))
    }

    fn file_path(&self) -> PathBuf {
        migrations_dir(&self.base_path).join(format!("create_{}_table.php", self.model.table()))
    }

    fn from_to(&self) -> FromTo {
        self.model.from_to()
    }

    fn stub(&self) -> Result<String> {
        self.stubs.get("migration")
    }
}

/// Table seeder, `{base_path}/database/seeds/{Model}Seeder.php`.
pub struct Seeder<'a> {
    model: ModelInfo,
    base_path: PathBuf,
    stubs: &'a Stubs,
}

impl<'a> Seeder<'a> {
    pub fn new(model: ModelInfo, choices: &Choices, stubs: &'a Stubs) -> Self {
        Self {
            model,
            base_path: choices.params().base_path.clone(),
            stubs,
        }
    }

    fn path(&self) -> PathBuf {
        self.base_path.join("database").join("seeds")
    }
}

impl StubProvider for Seeder<'_> {
    fn prepare(&self) -> Result<()> {
        prepare_directory(&self.path())
    }

    fn file_path(&self) -> PathBuf {
        self.path().join(format!("{}Seeder.php", self.model.class()))
    }

    fn from_to(&self) -> FromTo {
        self.model.from_to()
    }

    fn stub(&self) -> Result<String> {
        self.stubs.get("seeder")
    }
}

/// Authorization policy, `{base_path}/app/Policies/{Model}Policy.php`.
pub struct Policy<'a> {
    model: ModelInfo,
    base_path: PathBuf,
    stubs: &'a Stubs,
}

impl<'a> Policy<'a> {
    pub fn new(model: ModelInfo, choices: &Choices, stubs: &'a Stubs) -> Self {
        Self {
            model,
            base_path: choices.params().base_path.clone(),
            stubs,
        }
    }

    fn path(&self) -> PathBuf {
        self.base_path.join("app").join("Policies")
    }
}

impl StubProvider for Policy<'_> {
    fn prepare(&self) -> Result<()> {
        prepare_directory(&self.path())
    }

    fn file_path(&self) -> PathBuf {
        self.path().join(format!("{}Policy.php", self.model.class()))
    }

    fn from_to(&self) -> FromTo {
        self.model.from_to()
    }

    fn stub(&self) -> Result<String> {
        self.stubs.get("policy")
    }
}

/// Permissions and menu entry migration,
/// `{base_path}/database/migrations/create_structure_for_{table}.php`.
pub struct StructureMigration<'a> {
    model: ModelInfo,
    group: String,
    permissions: Vec<String>,
    menu: Option<Vec<(String, Value)>>,
    base_path: PathBuf,
    stubs: &'a Stubs,
}

impl<'a> StructureMigration<'a> {
    pub fn new(model: ModelInfo, choices: &Choices, stubs: &'a Stubs) -> Self {
        let permissions: Vec<String> = choices
            .get(SectionName::Permissions)
            .map(|section| {
                section
                    .attributes()
                    .iter()
                    .filter(|(_, value)| value.as_bool() == Some(true))
                    .map(|(key, _)| key.to_string())
                    .collect()
            })
            .unwrap_or_default();

        let menu: Option<Vec<(String, Value)>> = choices.get(SectionName::Menu).map(|section| {
            section
                .attributes()
                .iter()
                .map(|(key, value)| (key.to_snake_case(), value.clone()))
                .collect()
        });

        Self {
            model,
            group: choices.string_or_default(SectionName::PermissionGroup, "name"),
            permissions,
            menu,
            base_path: choices.params().base_path.clone(),
            stubs,
        }
    }

    fn permissions_block(&self) -> String {
        self.permissions
            .iter()
            .map(|permission| {
                format!(
                    "        ['name' => '{}.{}', 'is_default' => false],",
                    self.group, permission
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn menu_block(&self) -> String {
        match &self.menu {
            None => "null".to_string(),
            Some(entries) => {
                let mut lines: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| format!("        '{}' => {},", key, php_literal(value)))
                    .collect();
                if self.permissions.iter().any(|permission| permission == "index") {
                    lines.push(format!("        'route' => '{}.index',", self.group));
                }
                format!("[\n{}\n    ]", lines.join("\n"))
            }
        }
    }
}

impl StubProvider for StructureMigration<'_> {
    fn prepare(&self) -> Result<()> {
        prepare_directory(&migrations_dir(&self.base_path))
    }

    fn file_path(&self) -> PathBuf {
        migrations_dir(&self.base_path)
            .join(format!("create_structure_for_{}.php", self.model.table()))
    }

    fn from_to(&self) -> FromTo {
        let mut from_to = self.model.from_to();
        from_to.insert("${permissionGroup}".to_string(), self.group.clone());
        from_to.insert("${permissions}".to_string(), self.permissions_block());
        from_to.insert("${menu}".to_string(), self.menu_block());
        from_to
    }

    fn stub(&self) -> Result<String> {
        self.stubs.get("structure_migration")
    }
}

fn migrations_dir(base_path: &Path) -> PathBuf {
    base_path.join("database").join("migrations")
}

fn php_literal(value: &Value) -> String {
    match value {
        Value::Str(text) => format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'")),
        other => other.to_string(),
    }
}
