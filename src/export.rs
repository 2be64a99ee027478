use crate::models::RecordTable;
use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Export a record table to a file
pub fn export_results(table: &RecordTable, format: ExportFormat, path: &Path) -> Result<String> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    match format {
        ExportFormat::Csv => export_to_csv(table, path),
        ExportFormat::Json => export_to_json(table, path),
    }
}

fn export_to_csv(table: &RecordTable, path: &Path) -> Result<String> {
    let mut file = File::create(path)?;

    let header: Vec<String> = table.columns().iter().map(|c| csv_field(c)).collect();
    writeln!(file, "{}", header.join(","))?;

    for row in table.rows() {
        let line: Vec<String> = row.iter().map(|v| csv_field(&cell_text(v))).collect();
        writeln!(file, "{}", line.join(","))?;
    }

    Ok(path.to_string_lossy().to_string())
}

fn export_to_json(table: &RecordTable, path: &Path) -> Result<String> {
    let mut file = File::create(path)?;

    let json = serde_json::to_string_pretty(&table.to_records())?;
    file.write_all(json.as_bytes())?;

    Ok(path.to_string_lossy().to_string())
}

/// Plain text for a cell; nested values keep their JSON form
fn cell_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn csv_field(text: &str) -> String {
    if text.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Dataset;
    use serde_json::json;

    fn sample() -> RecordTable {
        RecordTable::from_json(
            &json!({
                "HousingAssistanceOwners": [
                    {"county": "San Juan (Municipio)", "zipCode": "00901", "approved": 12},
                    {"county": "Dallas, TX", "note": "say \"hi\""}
                ]
            }),
            Dataset::HousingAssistanceOwners,
        )
        .unwrap()
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_export_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.csv");

        export_results(&sample(), ExportFormat::Csv, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "county,zipCode,approved,note");
        assert_eq!(lines[1], "San Juan (Municipio),00901,12,");
        assert_eq!(lines[2], "\"Dallas, TX\",,,\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_export_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        export_results(&sample(), ExportFormat::Json, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: JsonValue = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed[0]["zipCode"], json!("00901"));
        assert_eq!(parsed[1]["approved"], JsonValue::Null);
    }
}
