use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One acquired image and everything the pipeline learned about it.
///
/// Serialized with camelCase keys so records written by earlier clients load
/// unchanged. `processing` only exists in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageItem {
    #[serde(default)]
    pub id: String,
    pub url: String,
    #[serde(default = "Utc::now", with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(skip)]
    pub processing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Pending,
    Processing,
    Done,
    Failed,
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Processing => "processing",
            ItemStatus::Done => "done",
            ItemStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

impl ImageItem {
    /// Creates a freshly acquired item with a time-ordered id.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: new_item_id(),
            url: url.into(),
            timestamp: Utc::now(),
            extracted_text: None,
            processing: false,
            error: None,
            analysis: None,
        }
    }

    pub fn status(&self) -> ItemStatus {
        if self.processing {
            ItemStatus::Processing
        } else if self.error.is_some() {
            ItemStatus::Failed
        } else if self.extracted_text.is_some() {
            ItemStatus::Done
        } else {
            ItemStatus::Pending
        }
    }

    /// True when the item still waits for OCR.
    pub fn needs_text(&self) -> bool {
        self.extracted_text.is_none() && self.error.is_none()
    }

    /// Text eligible for analysis, if any.
    pub fn analyzable_text(&self) -> Option<&str> {
        match (&self.extracted_text, &self.error) {
            (Some(text), None) => Some(text.as_str()),
            _ => None,
        }
    }
}

pub fn new_item_id() -> String {
    Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_follows_item_fields() {
        let mut item = ImageItem::new("http://cdn/a.jpg");
        assert_eq!(item.status(), ItemStatus::Pending);
        assert!(item.needs_text());

        item.processing = true;
        assert_eq!(item.status(), ItemStatus::Processing);

        item.processing = false;
        item.extracted_text = Some("hola".into());
        assert_eq!(item.status(), ItemStatus::Done);
        assert_eq!(item.analyzable_text(), Some("hola"));

        item.extracted_text = None;
        item.error = Some("boom".into());
        assert_eq!(item.status(), ItemStatus::Failed);
        assert!(!item.needs_text());
        assert_eq!(item.analyzable_text(), None);
    }

    #[test]
    fn serializes_camel_case_without_processing() {
        let mut item = ImageItem::new("http://cdn/a.jpg");
        item.extracted_text = Some("text".into());
        item.processing = true;

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["extractedText"], "text");
        assert!(value.get("processing").is_none());
        assert!(value.get("error").is_none());
        assert_eq!(value["timestamp"], item.timestamp.timestamp_millis());
    }

    #[test]
    fn legacy_record_loads_with_defaults() {
        let value = json!({
            "id": "1717800000000",
            "url": "http://localhost:5000/download/tmp1.jpg",
            "timestamp": 1717800000000i64,
            "processing": true
        });
        let item: ImageItem = serde_json::from_value(value).unwrap();
        assert_eq!(item.id, "1717800000000");
        assert!(!item.processing);
        assert_eq!(item.timestamp.timestamp_millis(), 1717800000000);
        assert_eq!(item.status(), ItemStatus::Pending);

        let bare: ImageItem = serde_json::from_value(json!({ "url": "http://x/y.jpg" })).unwrap();
        assert!(bare.id.is_empty());
    }

    #[test]
    fn new_ids_are_unique() {
        let a = ImageItem::new("u");
        let b = ImageItem::new("u");
        assert_ne!(a.id, b.id);
    }
}
