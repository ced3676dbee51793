use anyhow::Result;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use structure_maker::config::Config;
use structure_maker::maker::StructureMaker;
use structure_maker::providers::NoDelay;
use tempfile::TempDir;

/// Config writing under `root`, with no pauses and strict rendering.
fn config(root: &Path) -> Config {
    Config {
        root_segment: root.join("client"),
        base_path: root.join("api"),
        pause_ms: 0,
        strict_placeholders: true,
        stubs_dir: None,
    }
}

/// Runs a scripted wizard session through the library.
fn run_session(root: &Path, lines: &[&str]) -> Result<(Vec<std::path::PathBuf>, String)> {
    let mut input = Cursor::new(lines.join("\n") + "\n");
    let mut output = Vec::new();
    let written = StructureMaker::with_delay(config(root), Box::new(NoDelay)).run_with_io(&mut input, &mut output)?;
    Ok((written, String::from_utf8(output)?))
}

/// Helper to run the binary with piped stdin and an isolated home directory
fn run_binary(root: &Path, args: &[&str], stdin: &str) -> Result<Output> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_make-structure"))
        .args(["--no-pause", "--strict", "--root-segment"])
        .arg(root.join("client"))
        .arg("--base-path")
        .arg(root.join("api"))
        .args(args)
        .env("HOME", root)
        .env_remove("STRUCTURE_MAKER_ROOT_SEGMENT")
        .env_remove("STRUCTURE_MAKER_BASE_PATH")
        .env_remove("STRUCTURE_MAKER_STRICT")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    if let Some(mut pipe) = child.stdin.take() {
        pipe.write_all(stdin.as_bytes())?;
    }

    Ok(child.wait_with_output()?)
}

#[test]
fn test_model_only_writes_single_template() -> Result<()> {
    let dir = TempDir::new()?;

    let (written, output) = run_session(dir.path(), &["Model", "yes", "invoice", "", "Generate"])?;

    let template = dir.path().join("client/Forms/Templates/invoice.json");
    assert_eq!(written, vec![template.clone()]);
    assert!(fs::read_to_string(&template)?.contains("\"routePrefix\": \"administration.models\""));
    assert!(!dir.path().join("api").exists(), "No back-end files without Files");
    assert!(output.contains("The new structure is created, you can start playing"));

    Ok(())
}

#[test]
fn test_full_structure_generation() -> Result<()> {
    let dir = TempDir::new()?;
    let lines = [
        // Model: name, namespace
        "0", "yes", "invoiceLine", "App\\Models",
        // Permission group
        "1", "yes", "sales.invoiceLines",
        // Permissions: every default except show
        "2", "yes", "", "", "", "", "", "", "", "", "", "", "",
        // Menu: name, icon, parentMenu, orderIndex, hasChildren
        "3", "yes", "Invoice Lines", "receipt", "", "20", "",
        // Files: model, migration, seeder, policy
        "4", "yes", "", "", "yes", "no",
        "5",
    ];

    let (written, output) = run_session(dir.path(), &lines)?;

    let api = dir.path().join("api");
    assert_eq!(
        written,
        vec![
            dir.path().join("client/Forms/Templates/invoiceLine.json"),
            api.join("app/InvoiceLine.php"),
            api.join("database/migrations/create_invoice_lines_table.php"),
            api.join("database/seeds/InvoiceLineSeeder.php"),
            api.join("database/migrations/create_structure_for_invoice_lines.php"),
        ]
    );

    let model = fs::read_to_string(api.join("app/InvoiceLine.php"))?;
    assert!(model.contains("namespace App\\Models;"));
    assert!(model.contains("class InvoiceLine extends Model"));
    assert!(model.contains("protected $table = 'invoice_lines';"));

    let structure = fs::read_to_string(api.join("database/migrations/create_structure_for_invoice_lines.php"))?;
    assert!(structure.contains("'sales.invoiceLines.index'"));
    assert!(structure.contains("'name' => 'Invoice Lines',"));
    assert!(structure.contains("'order_index' => 20,"));

    assert!(!api.join("app/Policies").exists());
    assert!(output.contains("->prefix('api/sales/invoiceLines')"));
    assert!(output.contains("Route::get('{invoiceLine}/edit', 'Edit')->name('edit');"));

    Ok(())
}

#[test]
fn test_generation_overwrites_existing_files() -> Result<()> {
    let dir = TempDir::new()?;
    let template = dir.path().join("client/Forms/Templates/order.json");
    fs::create_dir_all(template.parent().unwrap())?;
    fs::write(&template, "old content")?;

    run_session(dir.path(), &["0", "y", "order", "", "5"])?;

    let content = fs::read_to_string(&template)?;
    assert!(!content.contains("old content"));
    assert!(content.contains("routePrefix"));

    Ok(())
}

#[test]
fn test_stub_override_directory() -> Result<()> {
    let dir = TempDir::new()?;
    let stubs = dir.path().join("stubs");
    fs::create_dir_all(&stubs)?;
    fs::write(stubs.join("template.stub"), "{\"group\": \"${permissionGroup}\"}")?;

    let config = Config {
        stubs_dir: Some(stubs),
        ..config(dir.path())
    };
    let mut output = Vec::new();
    StructureMaker::with_delay(config, Box::new(NoDelay))
        .replay(r#"{ "model": { "name": "ticket" } }"#, &mut output)?;

    let content = fs::read_to_string(dir.path().join("client/Forms/Templates/ticket.json"))?;
    assert_eq!(content, "{\"group\": \"administration.models\"}");

    Ok(())
}

#[test]
fn test_binary_interactive_session() -> Result<()> {
    let dir = TempDir::new()?;

    let output = run_binary(dir.path(), &[], "Generate\n0\nyes\norder\n\n5\n")?;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("There is nothing configured yet!"));
    assert!(stdout.contains("The new structure is created"));
    assert!(dir.path().join("client/Forms/Templates/order.json").exists());

    Ok(())
}

#[test]
fn test_binary_fails_when_input_ends_early() -> Result<()> {
    let dir = TempDir::new()?;

    let output = run_binary(dir.path(), &[], "0\nyes\n")?;

    assert!(!output.status.success());
    assert!(!dir.path().join("client").exists());

    Ok(())
}

#[test]
fn test_binary_replay() -> Result<()> {
    let dir = TempDir::new()?;
    let replay = dir.path().join("replay.json");
    fs::write(
        &replay,
        r#"{ "model": { "name": "product" }, "files": { "migration": true, "model": false, "policy": false } }"#,
    )?;

    let output = run_binary(dir.path(), &["--replay", replay.to_str().unwrap()], "")?;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(dir.path().join("client/Forms/Templates/product.json").exists());
    assert!(dir.path().join("api/database/migrations/create_products_table.php").exists());
    assert!(!dir.path().join("api/app").exists());

    Ok(())
}
