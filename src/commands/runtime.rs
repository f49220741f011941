use crate::docx::Document;
use crate::*;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub fn handle_runtime_commands(cli: &Cli, catalog: &Catalog) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Update {
            state,
            field,
            value,
            batch,
            delete,
        } => {
            let mut session = load_state(state)?;

            if !delete.is_empty() {
                let mut deleted = Vec::new();
                let mut missing = Vec::new();
                for name in delete {
                    if session.field_values.remove(name).is_some() {
                        deleted.push(name.clone());
                    } else {
                        missing.push(name.clone());
                    }
                }
                save_state(state, &session)?;
                audit(
                    state,
                    "delete",
                    serde_json::json!({"deleted": deleted, "missing": missing}),
                );
                let outcome = DeleteOutcome { deleted, missing };
                print_one(cli.json, &outcome, |o| {
                    format!(
                        "deleted {} fields ({} were not set)",
                        o.deleted.len(),
                        o.missing.len()
                    )
                })?;
                return Ok(());
            }

            let updates = collect_updates(field.as_deref(), value.as_deref(), batch.as_deref())?;
            if updates.is_empty() {
                anyhow::bail!("pass --field/--value or --batch");
            }

            let resolution = canonicalize_updates(&updates, &session.all_placeholders);
            if !resolution.unknown.is_empty() {
                let mut msg = String::from("unknown fields:");
                for name in &resolution.unknown {
                    msg.push_str(&format!("\n  {}", name));
                    if let Some(similar) = resolution.suggestions.get(name) {
                        msg.push_str(&format!("（did you mean: {}）", similar.join("、")));
                    }
                }
                anyhow::bail!(msg);
            }

            let updated = resolution.resolved.len();
            session.field_values.extend(resolution.resolved);
            save_state(state, &session)?;
            audit(state, "update", serde_json::json!({"updated": updated}));

            let outcome = UpdateOutcome {
                updated,
                progress: progress(&session.field_values, &session.groups),
                unfilled_count: unfilled_fields(&session.field_values, &session.groups, None)
                    .len(),
                next_group: next_group_report(&session.field_values, &session.groups),
            };
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&JsonOut {
                        ok: true,
                        data: outcome
                    })?
                );
            } else {
                println!("recorded {} fields", outcome.updated);
                println!(
                    "progress: {}/{} ({}%)",
                    outcome.progress.filled, outcome.progress.total, outcome.progress.percentage
                );
                match &outcome.next_group {
                    Some(next) => {
                        println!("next [{}]: {}", next.name, next.ask);
                        for f in &next.unfilled {
                            println!("  - {}", f);
                        }
                    }
                    None => println!("all required fields filled"),
                }
            }
        }
        Commands::Status { state } => {
            let session = load_state(state)?;
            let report = StatusReport {
                contract_name: session.contract_name.clone(),
                progress: progress(&session.field_values, &session.groups),
                unfilled: unfilled_fields(&session.field_values, &session.groups, None),
                next_group: next_group_report(&session.field_values, &session.groups),
            };
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&JsonOut {
                        ok: true,
                        data: report
                    })?
                );
            } else {
                println!("{}（{}）", session.contract_name, session.contract_code);
                println!(
                    "progress: {}/{} ({}%)",
                    report.progress.filled, report.progress.total, report.progress.percentage
                );
                for (name, g) in sorted_groups(&session.groups) {
                    if let Some(gp) = report.progress.groups.get(name) {
                        let mark = if gp.complete { "[x]" } else { "[ ]" };
                        println!(
                            "  {} [{}] {} {}/{}",
                            mark, g.priority, name, gp.filled, gp.total
                        );
                    }
                }
                match &report.next_group {
                    Some(next) => {
                        println!("next [{}]: {}", next.name, next.ask);
                        for f in &next.unfilled {
                            println!("  - {}", f);
                        }
                    }
                    None => println!("all required fields filled"),
                }
            }
        }
        Commands::Fill {
            state,
            template,
            output,
            force,
            check,
        } => {
            let session = load_state(state)?;
            let variant = catalog.variant(&session.contract_type)?;
            let template_path: PathBuf = match template {
                Some(p) => p.clone(),
                None => PathBuf::from(&session.template_path),
            };
            if !template_path.exists() {
                anyhow::bail!("template not found: {}", template_path.display());
            }

            let mut values = apply_aliases(&session.field_values, &variant.aliases);
            apply_amount_words(&mut values, &variant.amount_words)?;
            let unfilled = unfilled_fields(&values, &session.groups, None);
            let complete = unfilled.is_empty();

            if *check {
                let report = CheckReport { complete, unfilled };
                print_one(cli.json, &report, |r| {
                    if r.complete {
                        "ready to render".to_string()
                    } else {
                        format!(
                            "{} required fields unfilled:\n  {}",
                            r.unfilled.len(),
                            r.unfilled.join("\n  ")
                        )
                    }
                })?;
                if !complete {
                    anyhow::bail!("session is not complete");
                }
                return Ok(());
            }

            if !complete && !*force {
                anyhow::bail!(
                    "{} required fields unfilled (pass --force to render anyway):\n  {}",
                    unfilled.len(),
                    unfilled.join("\n  ")
                );
            }
            let output = output
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--output is required unless --check"))?;

            let mut doc = Document::open(&template_path)?;
            let rendered = render_document(&mut doc, &values);
            doc.save(output)?;
            audit(
                state,
                "fill",
                serde_json::json!({
                    "output": output.display().to_string(),
                    "replaced": rendered.replaced,
                    "forced": force
                }),
            );
            let report = FillReport {
                output: output.display().to_string(),
                replaced: rendered.replaced,
                unresolved: rendered.unresolved,
                forced: *force,
            };
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&JsonOut {
                        ok: true,
                        data: report
                    })?
                );
            } else {
                println!("written {}", report.output);
                println!("replaced {} tokens", report.replaced);
                if !report.unresolved.is_empty() {
                    println!("unresolved: {}", report.unresolved.join("、"));
                }
            }
        }
        Commands::Amount { value } => {
            let words = amount_to_words(value);
            if !is_money_phrase(&words) {
                anyhow::bail!("cannot convert {:?} to an uppercase amount", value);
            }
            print_one(cli.json, &words, |w| w.clone())?;
        }
        Commands::List | Commands::Init { .. } => {
            unreachable!("handled before runtime dispatch")
        }
    }

    Ok(())
}

/// Merge `--field/--value` and `--batch` into one update map. Batch
/// values may be strings, booleans or numbers; anything else is
/// rejected naming the offending field.
fn collect_updates(
    field: Option<&str>,
    value: Option<&str>,
    batch: Option<&str>,
) -> anyhow::Result<FieldValues> {
    let mut updates = FieldValues::new();
    if let (Some(f), Some(v)) = (field, value) {
        updates.insert(f.to_string(), FieldValue::Text(v.to_string()));
    }
    if let Some(raw) = batch {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw)
            .map_err(|e| anyhow::anyhow!("--batch is not a JSON object: {}", e))?;
        for (name, v) in object {
            let value = match v {
                serde_json::Value::Bool(b) => FieldValue::Flag(b),
                serde_json::Value::String(s) => FieldValue::Text(s),
                serde_json::Value::Number(n) => FieldValue::Text(n.to_string()),
                other => anyhow::bail!("unsupported value for {}: {}", name, other),
            };
            updates.insert(name, value);
        }
    }
    Ok(updates)
}

fn next_group_report(
    values: &FieldValues,
    groups: &BTreeMap<String, GroupSpec>,
) -> Option<NextGroup> {
    let name = next_unfilled_group(values, groups)?;
    let spec = groups.get(&name)?;
    let unfilled = unfilled_fields(values, groups, Some(&name));
    Some(NextGroup {
        name,
        ask: spec.ask.clone(),
        unfilled,
    })
}
