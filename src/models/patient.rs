use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::{as_text, into_row, non_blank, parse_key, pick};

/// Department bucket for patients with a missing or blank department.
pub const UNKNOWN_DEPARTMENT: &str = "Unknown";

/// A registered patient. Every registered patient appears in every view,
/// with or without clinical records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Patient {
    /// Empty when the upstream row carried no usable id; such rows are skipped.
    pub id: String,
    pub name: Option<String>,
    pub department: String,
}

impl Patient {
    pub fn new(id: impl Into<String>, name: Option<&str>, department: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: non_blank(name),
            department: normalize_department(department),
        }
    }

    /// Name for display, falling back to the patient id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Trim a department label; blank or missing becomes `"Unknown"`.
pub fn normalize_department(raw: Option<&str>) -> String {
    non_blank(raw).unwrap_or_else(|| UNKNOWN_DEPARTMENT.to_string())
}

const ID_KEYS: &[&str] = &["id", "patient_id", "patientId"];
const NAME_KEYS: &[&str] = &["name", "full_name", "fullName"];
const FIRST_NAME_KEYS: &[&str] = &["first_name", "firstName"];
const LAST_NAME_KEYS: &[&str] = &["last_name", "lastName"];

impl From<Value> for Patient {
    fn from(value: Value) -> Self {
        let row = into_row(value);
        let name = non_blank(as_text(pick(&row, NAME_KEYS))).or_else(|| {
            let parts: Vec<String> = [FIRST_NAME_KEYS, LAST_NAME_KEYS]
                .into_iter()
                .filter_map(|keys| non_blank(as_text(pick(&row, keys))))
                .collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        });

        Self {
            id: parse_key(pick(&row, ID_KEYS)).unwrap_or_default(),
            name,
            department: normalize_department(as_text(pick(&row, &["department"]))),
        }
    }
}
