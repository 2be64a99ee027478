//! Tabular view of openFEMA records

use serde_json::{Map, Value as JsonValue};

use super::dataset::Dataset;
use crate::error::{Error, Result};

/// Records as a table: ordered columns and one row of cells per record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Vec<JsonValue>>,
}

impl RecordTable {
    /// Create from a response body, reading the array under the dataset's key.
    ///
    /// Nested objects are flattened into `parent.child` columns. Columns are
    /// ordered by first appearance; cells missing from a record are `Null`.
    pub fn from_json(json: &JsonValue, dataset: Dataset) -> Result<Self> {
        let key = dataset.record_key();
        let records = match json.get(key) {
            Some(JsonValue::Array(arr)) => arr,
            _ => return Err(Error::MissingField(key.to_string())),
        };

        let flat: Vec<Map<String, JsonValue>> = records
            .iter()
            .filter_map(|record| match record {
                JsonValue::Object(obj) => {
                    let mut out = Map::new();
                    flatten_into(&mut out, None, obj);
                    Some(out)
                }
                _ => None,
            })
            .collect();

        let mut table = RecordTable::default();
        for record in &flat {
            for key in record.keys() {
                table.add_column(key);
            }
        }

        table.rows = flat
            .iter()
            .map(|record| {
                table
                    .columns
                    .iter()
                    .map(|col| record.get(col).cloned().unwrap_or(JsonValue::Null))
                    .collect()
            })
            .collect();

        Ok(table)
    }

    /// Stack tables vertically, keeping row order and taking the union of columns
    pub fn concat<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = RecordTable>,
    {
        let tables: Vec<RecordTable> = tables.into_iter().collect();

        let mut out = RecordTable::default();
        for table in &tables {
            for col in &table.columns {
                out.add_column(col);
            }
        }

        for table in tables {
            let positions: Vec<Option<usize>> = out
                .columns
                .iter()
                .map(|col| table.columns.iter().position(|c| c == col))
                .collect();

            for row in table.rows {
                let new_row = positions
                    .iter()
                    .map(|pos| pos.and_then(|i| row.get(i).cloned()).unwrap_or(JsonValue::Null))
                    .collect();
                out.rows.push(new_row);
            }
        }

        out
    }

    fn add_column(&mut self, name: &str) {
        if !self.columns.iter().any(|c| c == name) {
            self.columns.push(name.to_string());
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<JsonValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All cells of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&JsonValue>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Rows as JSON objects keyed by column name
    pub fn to_records(&self) -> Vec<JsonValue> {
        self.rows
            .iter()
            .map(|row| {
                let obj: Map<String, JsonValue> = self
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect();
                JsonValue::Object(obj)
            })
            .collect()
    }
}

fn flatten_into(out: &mut Map<String, JsonValue>, prefix: Option<&str>, obj: &Map<String, JsonValue>) {
    for (key, value) in obj {
        let name = match prefix {
            Some(p) => format!("{}.{}", p, key),
            None => key.clone(),
        };
        match value {
            JsonValue::Object(inner) if !inner.is_empty() => flatten_into(out, Some(&name), inner),
            other => {
                out.insert(name, other.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_extracts_dataset_records() {
        let body = json!({
            "metadata": {"count": 2},
            "HousingAssistanceOwners": [
                {"id": "a", "state": "PR", "approvedForFemaAssistance": 12},
                {"id": "b", "state": "TX", "zipCode": "77001"}
            ]
        });

        let table = RecordTable::from_json(&body, Dataset::HousingAssistanceOwners).unwrap();

        assert_eq!(table.columns(), ["id", "state", "approvedForFemaAssistance", "zipCode"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][3], JsonValue::Null);
        assert_eq!(table.rows()[1][2], JsonValue::Null);
        assert_eq!(table.rows()[1][3], json!("77001"));
    }

    #[test]
    fn test_from_json_flattens_nested_objects() {
        let body = json!({
            "HousingAssistanceRenters": [
                {"id": 1, "location": {"county": "Harris", "geo": {"lat": 29.7}}, "tags": [1, 2]}
            ]
        });

        let table = RecordTable::from_json(&body, Dataset::HousingAssistanceRenters).unwrap();

        assert_eq!(table.columns(), ["id", "location.county", "location.geo.lat", "tags"]);
        assert_eq!(table.column("location.geo.lat").unwrap(), vec![&json!(29.7)]);
        assert_eq!(table.column("tags").unwrap(), vec![&json!([1, 2])]);
    }

    #[test]
    fn test_from_json_missing_key() {
        let body = json!({"metadata": {"count": 0}, "HousingAssistanceRenters": []});
        let err = RecordTable::from_json(&body, Dataset::HousingAssistanceOwners).unwrap_err();
        assert!(matches!(err, Error::MissingField(ref k) if k == "HousingAssistanceOwners"));
    }

    #[test]
    fn test_from_json_empty_array() {
        let body = json!({"HousingAssistanceOwners": []});
        let table = RecordTable::from_json(&body, Dataset::HousingAssistanceOwners).unwrap();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn test_concat_unions_columns_and_keeps_order() {
        let key = Dataset::HousingAssistanceOwners;
        let first = RecordTable::from_json(
            &json!({"HousingAssistanceOwners": [{"id": 1, "a": "x"}, {"id": 2, "a": "y"}]}),
            key,
        )
        .unwrap();
        let second = RecordTable::from_json(
            &json!({"HousingAssistanceOwners": [{"b": true, "id": 3}]}),
            key,
        )
        .unwrap();

        let table = RecordTable::concat([first, RecordTable::default(), second]);

        assert_eq!(table.columns(), ["id", "a", "b"]);
        assert_eq!(
            table.column("id").unwrap(),
            vec![&json!(1), &json!(2), &json!(3)]
        );
        assert_eq!(table.rows()[2], vec![json!(3), JsonValue::Null, json!(true)]);
        assert_eq!(table.rows()[0], vec![json!(1), json!("x"), JsonValue::Null]);
    }

    #[test]
    fn test_to_records() {
        let table = RecordTable::from_json(
            &json!({"HousingAssistanceOwners": [{"id": 1}, {"state": "PR"}]}),
            Dataset::HousingAssistanceOwners,
        )
        .unwrap();

        assert_eq!(
            table.to_records(),
            vec![json!({"id": 1, "state": null}), json!({"id": null, "state": "PR"})]
        );
    }
}
