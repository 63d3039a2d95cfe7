// models/src/medical/counseling.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ValidationResult;
use crate::form::{optional, required};
use crate::identifiers::new_resource_id;

/// A counseling service listed on the contact page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounselingResource {
    #[serde(default = "new_resource_id")]
    pub resource_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CounselingDraft {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub description: Option<String>,
}

impl CounselingDraft {
    pub fn into_resource(self) -> ValidationResult<CounselingResource> {
        let name = required(self.name, "Name")?;
        let mut details = Map::new();
        if let Some(description) = optional(self.description) {
            details.insert("description".to_string(), Value::String(description));
        }
        Ok(CounselingResource {
            resource_id: new_resource_id(),
            name,
            contact: optional(self.contact),
            details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_entry_without_id_gets_one() {
        let resource: CounselingResource =
            serde_json::from_str(r#"{"name":"Helpline","hours":"24/7"}"#).unwrap();
        assert!(resource.resource_id.starts_with("CR"));
        assert_eq!(resource.details["hours"], "24/7");
    }

    #[test]
    fn draft_keeps_description() {
        let resource = CounselingDraft {
            name: Some("Grief support".into()),
            contact: Some(" ".into()),
            description: Some("Weekly group".into()),
        }
        .into_resource()
        .unwrap();
        assert!(resource.contact.is_none());
        assert_eq!(resource.details["description"], "Weekly group");
    }
}
