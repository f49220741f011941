use crate::domain::models::ContractState;
use std::path::{Path, PathBuf};

/// Append an audit event next to the state file. Best-effort: the audit
/// trail never fails the command that produced it.
pub fn audit(state_path: &Path, action: &str, data: serde_json::Value) {
    let path = audit_path(state_path);
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let event = serde_json::json!({
        "ts": unix_now(),
        "action": action,
        "data": data
    });
    let line = format!("{}\n", event);
    let _ = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| std::io::Write::write_all(&mut f, line.as_bytes()));
}

fn audit_path(state_path: &Path) -> PathBuf {
    let mut name = state_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "state.json".to_string());
    name.push_str(".audit.jsonl");
    state_path.with_file_name(name)
}

fn unix_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    ts.to_string()
}

pub fn load_state(path: &Path) -> anyhow::Result<ContractState> {
    if !path.exists() {
        anyhow::bail!("state file not found: {}", path.display());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Write the snapshot all-or-nothing: temp sibling plus rename, so a
/// crash mid-write never leaves a corrupt state file.
pub fn save_state(path: &Path, state: &ContractState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, serde_json::to_string_pretty(state)?)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::FieldValue;

    fn sample_state() -> ContractState {
        ContractState {
            contract_type: "tigong".into(),
            contract_name: "数据提供合同".into(),
            contract_code: "GF-2025-2615".into(),
            template_path: "/tmp/template.docx".into(),
            total_placeholders: 1,
            checkbox_count: 0,
            text_count: 1,
            all_placeholders: vec!["甲方名称".into()],
            groups: Default::default(),
            ungrouped: vec!["甲方名称".into()],
            field_values: Default::default(),
        }
    }

    #[test]
    fn state_round_trips_with_mixed_value_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut state = sample_state();
        state
            .field_values
            .insert("甲方名称".into(), FieldValue::Text("公司A".into()));
        state
            .field_values
            .insert("☐含个人信息".into(), FieldValue::Flag(true));

        save_state(&path, &state).unwrap();
        let loaded = load_state(&path).unwrap();
        assert_eq!(
            loaded.field_values["甲方名称"],
            FieldValue::Text("公司A".into())
        );
        assert_eq!(loaded.field_values["☐含个人信息"], FieldValue::Flag(true));
        // No temp file may survive a successful save.
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn missing_state_is_a_named_error() {
        let err = load_state(Path::new("/nonexistent/state.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/state.json"));
    }

    #[test]
    fn audit_appends_jsonl_next_to_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        audit(&path, "update", serde_json::json!({"fields": 2}));
        audit(&path, "fill", serde_json::json!({"output": "out.docx"}));
        let raw = std::fs::read_to_string(dir.path().join("state.json.audit.jsonl")).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["action"], "update");
    }
}
