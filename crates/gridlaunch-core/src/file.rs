// ABOUTME: Defines FileRecord, the binary payload plus metadata kept by the blob store.
// ABOUTME: The MIME type serializes as "type" to match the stored record layout.

use serde::{Deserialize, Serialize};

/// A stored file: raw bytes plus the metadata recorded when it was saved.
/// `timestamp` is milliseconds since the Unix epoch at save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub key: String,
    pub data: Vec<u8>,
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub timestamp: i64,
}

impl FileRecord {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_serializes_as_type() {
        let record = FileRecord {
            key: "icon-1".to_string(),
            data: vec![0x89, 0x50, 0x4e, 0x47],
            name: "a.png".to_string(),
            mime_type: "image/png".to_string(),
            timestamp: 1_700_000_000_000,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "image/png");
        assert!(json.get("mime_type").is_none());
        assert_eq!(record.size(), 4);
    }
}
