use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const PDF_MIME: &str = "application/pdf";

/// A SOW document selected in the upload step. Lives only in the session.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type.trim().eq_ignore_ascii_case(PDF_MIME)
    }
}

/// Raw field mapping returned by the extraction service.
///
/// Values arrive noisy and loosely typed. Scalars may be strings, numbers or
/// missing. `Technology` is only honoured when it is an array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    #[serde(rename = "Project Name", default, deserialize_with = "lenient_text")]
    pub project_name: Option<String>,
    #[serde(rename = "Practice", default, deserialize_with = "lenient_text")]
    pub practice: Option<String>,
    #[serde(rename = "Technology", default, deserialize_with = "lenient_list")]
    pub technology: Vec<String>,
    #[serde(rename = "Category", default, deserialize_with = "lenient_text")]
    pub category: Option<String>,
    #[serde(rename = "Manager", default, deserialize_with = "lenient_text")]
    pub manager: Option<String>,
    #[serde(rename = "Client", default, deserialize_with = "lenient_text")]
    pub client: Option<String>,
    #[serde(rename = "Partner", default, deserialize_with = "lenient_text")]
    pub partner: Option<String>,
    #[serde(rename = "Billing Type", default, deserialize_with = "lenient_text")]
    pub billing_type: Option<String>,
    #[serde(rename = "Status", default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(rename = "Budgeted Hours", default, deserialize_with = "lenient_text")]
    pub budgeted_hours: Option<String>,
    #[serde(rename = "Start date", default, deserialize_with = "lenient_text")]
    pub start_date: Option<String>,
    #[serde(rename = "End Date", default, deserialize_with = "lenient_text")]
    pub end_date: Option<String>,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_checks_mime_type() {
        let pdf = UploadedFile::new("sow.pdf", "application/pdf", Bytes::from_static(b"%PDF"));
        let docx = UploadedFile::new(
            "sow.docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Bytes::new(),
        );
        let renamed = UploadedFile::new("sow.pdf", "text/plain", Bytes::new());
        assert!(pdf.is_pdf());
        assert!(!docx.is_pdf());
        assert!(!renamed.is_pdf());
    }

    #[test]
    fn test_record_deserializes_service_keys() {
        let json = r#"{
            "Project Name": "Intranet Refresh",
            "Practice": "Modern Workplace",
            "Technology": ["SharePoint", "Power Automate"],
            "Category": "Project",
            "Manager": "based on the rules given: Manager: Jane Doe",
            "Client": "Client: Contoso",
            "Partner": "Fabrikam",
            "Billing Type": "Fixed Price",
            "Status": "Active",
            "Budgeted Hours": "320 Budgeted Hours",
            "Start date": "1/15/2025",
            "End Date": "2025-06-30"
        }"#;
        let record: ExtractedRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.project_name.as_deref(), Some("Intranet Refresh"));
        assert_eq!(record.technology, vec!["SharePoint", "Power Automate"]);
        assert_eq!(record.start_date.as_deref(), Some("1/15/2025"));
        assert_eq!(record.end_date.as_deref(), Some("2025-06-30"));
    }

    #[test]
    fn test_record_tolerates_missing_and_loose_values() {
        let json = r#"{
            "Project Name": null,
            "Technology": "Rust",
            "Budgeted Hours": 120,
            "Unrelated": {"nested": true}
        }"#;
        let record: ExtractedRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.project_name, None);
        assert!(record.technology.is_empty());
        assert_eq!(record.budgeted_hours.as_deref(), Some("120"));
        assert_eq!(record.client, None);
    }

    #[test]
    fn test_record_drops_non_string_technology_items() {
        let json = r#"{"Technology": ["Rust", 3, null, "Go"]}"#;
        let record: ExtractedRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.technology, vec!["Rust", "Go"]);
    }
}
