use crate::docx::Document;
use crate::*;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

pub fn handle_setup_commands(cli: &Cli, catalog: &Catalog) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::List => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&JsonOut {
                        ok: true,
                        data: catalog.infos()
                    })?
                );
            } else {
                println!("{}", catalog.listing());
            }
            Ok(true)
        }
        Commands::Init {
            contract_type,
            intent,
            template,
            templates_dir,
            state,
        } => {
            init_session(
                cli,
                catalog,
                contract_type.as_deref(),
                intent.as_deref(),
                template.as_deref(),
                templates_dir,
                state,
            )?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// An explicit `--type` wins and is validated against the catalog.
/// Otherwise the intent is routed; anything short of a single confident
/// match is an error that reprints the catalog.
fn resolve_variant_key(
    catalog: &Catalog,
    contract_type: Option<&str>,
    intent: Option<&str>,
) -> anyhow::Result<String> {
    if let Some(key) = contract_type {
        return Ok(catalog.variant(key)?.key.clone());
    }
    let Some(intent) = intent else {
        anyhow::bail!("pass --type or --intent\n\n{}", catalog.listing());
    };
    let report = route(intent, catalog);
    match report.selected {
        Some(key) => Ok(key),
        None if report.ambiguous => anyhow::bail!(
            "the intent matches more than one contract type, pass --type to choose\n\n{}",
            catalog.listing()
        ),
        None => anyhow::bail!(
            "cannot detect a contract type from the intent, pass --type\n\n{}",
            catalog.listing()
        ),
    }
}

fn init_session(
    cli: &Cli,
    catalog: &Catalog,
    contract_type: Option<&str>,
    intent: Option<&str>,
    template: Option<&Path>,
    templates_dir: &Path,
    state_path: &Path,
) -> anyhow::Result<()> {
    let key = resolve_variant_key(catalog, contract_type, intent)?;
    let variant = catalog.variant(&key)?;

    let template_path: PathBuf = match template {
        Some(p) => p.to_path_buf(),
        None => templates_dir.join(format!("{}.docx", key)),
    };
    if !template_path.exists() {
        anyhow::bail!("template not found: {}", template_path.display());
    }

    let doc = Document::open(&template_path)?;
    let placeholders = extract_placeholders(&doc);
    let checkbox_count = placeholders
        .iter()
        .filter(|p| field_kind(p) == FieldKind::Checkbox)
        .count();
    let text_count = placeholders.len() - checkbox_count;

    // Keep only the template's actual placeholders in each group, in
    // the order the variant config declares them.
    let present: HashSet<&String> = placeholders.iter().collect();
    let mut groups = BTreeMap::new();
    let mut grouped: HashSet<String> = HashSet::new();
    for (name, spec) in &variant.groups {
        let fields: Vec<String> = spec
            .fields
            .iter()
            .filter(|f| present.contains(f))
            .cloned()
            .collect();
        if fields.is_empty() {
            continue;
        }
        grouped.extend(fields.iter().cloned());
        groups.insert(
            name.clone(),
            GroupSpec {
                description: spec.description.clone(),
                priority: spec.priority,
                ask: spec.ask.clone(),
                fields,
            },
        );
    }
    let ungrouped: Vec<String> = placeholders
        .iter()
        .filter(|p| !grouped.contains(*p))
        .cloned()
        .collect();

    let stored_template =
        std::fs::canonicalize(&template_path).unwrap_or_else(|_| template_path.clone());

    let session = ContractState {
        contract_type: key.clone(),
        contract_name: variant.name.clone(),
        contract_code: variant.code.clone(),
        template_path: stored_template.display().to_string(),
        total_placeholders: placeholders.len(),
        checkbox_count,
        text_count,
        all_placeholders: placeholders,
        groups,
        ungrouped,
        field_values: FieldValues::new(),
    };
    save_state(state_path, &session)?;
    audit(
        state_path,
        "init",
        serde_json::json!({"type": key, "placeholders": session.total_placeholders}),
    );

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut {
                ok: true,
                data: &session
            })?
        );
    } else {
        println!(
            "contract: {}（{}）",
            session.contract_name, session.contract_code
        );
        println!("template: {}", session.template_path);
        println!(
            "placeholders: {} ({} checkbox / {} text)",
            session.total_placeholders, session.checkbox_count, session.text_count
        );
        for (name, g) in sorted_groups(&session.groups) {
            println!("  [{}] {} ({} fields)", g.priority, name, g.fields.len());
        }
        if !session.ungrouped.is_empty() {
            println!("ungrouped: {}", session.ungrouped.join("、"));
        }
        if let Some((_, g)) = sorted_groups(&session.groups).first() {
            println!("next: {}", g.ask);
        }
        println!("state written to {}", state_path.display());
    }
    Ok(())
}
