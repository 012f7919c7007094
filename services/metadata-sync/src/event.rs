use serde::{Deserialize, Serialize};
use std::fmt;

/// `detail-type` tag of an object creation notification
pub const OBJECT_CREATED: &str = "Object Created";
/// `detail-type` tag of an object deletion notification
pub const OBJECT_DELETED: &str = "Object Deleted";

/// S3 object notification as delivered by EventBridge
///
/// Only the fields the synchronizer needs are modelled; the rest of the
/// envelope (`id`, `source`, `time`, `region`, ...) is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageEvent {
    /// Event-type tag, e.g. `Object Created`
    #[serde(rename = "detail-type")]
    pub detail_type: String,
    /// Event payload
    pub detail: EventDetail,
}

/// Payload of an S3 object notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDetail {
    pub bucket: BucketRef,
    pub object: ObjectRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectRef {
    pub key: String,
}

/// Kind of change an event reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A content object was written
    ObjectCreated,
    /// A content object was removed
    ObjectDeleted,
    /// Any other `detail-type`
    Unsupported(String),
}

impl EventKind {
    /// Classify a `detail-type` tag
    pub fn from_detail_type(detail_type: &str) -> Self {
        match detail_type {
            OBJECT_CREATED => EventKind::ObjectCreated,
            OBJECT_DELETED => EventKind::ObjectDeleted,
            other => EventKind::Unsupported(other.to_string()),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::ObjectCreated => f.write_str(OBJECT_CREATED),
            EventKind::ObjectDeleted => f.write_str(OBJECT_DELETED),
            EventKind::Unsupported(tag) => write!(f, "unsupported({tag})"),
        }
    }
}

impl StorageEvent {
    /// Parse an event from a raw invocation payload
    pub fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    pub fn kind(&self) -> EventKind {
        EventKind::from_detail_type(&self.detail_type)
    }

    pub fn bucket(&self) -> &str {
        &self.detail.bucket.name
    }

    pub fn object_key(&self) -> &str {
        &self.detail.object.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_eventbridge_notification() {
        let json = r#"{
            "version": "0",
            "id": "17793124-05d4-b198-2fde-7ededc63b103",
            "detail-type": "Object Created",
            "source": "aws.s3",
            "account": "111122223333",
            "time": "2021-11-12T00:00:00Z",
            "region": "us-east-1",
            "resources": ["arn:aws:s3:::docs-111122223333"],
            "detail": {
                "version": "0",
                "bucket": { "name": "docs-111122223333" },
                "object": {
                    "key": "well-architected/serverless-lens.pdf",
                    "size": 5,
                    "etag": "b1946ac92492d2347c6235b4d2611184"
                },
                "request-id": "N4N7GDK58NMKJ12R",
                "reason": "PutObject"
            }
        }"#;

        let event: StorageEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind(), EventKind::ObjectCreated);
        assert_eq!(event.bucket(), "docs-111122223333");
        assert_eq!(event.object_key(), "well-architected/serverless-lens.pdf");
    }

    #[test]
    fn test_event_kind_classification() {
        assert_eq!(EventKind::from_detail_type("Object Created"), EventKind::ObjectCreated);
        assert_eq!(EventKind::from_detail_type("Object Deleted"), EventKind::ObjectDeleted);
        assert_eq!(
            EventKind::from_detail_type("Object Restore Completed"),
            EventKind::Unsupported("Object Restore Completed".to_string())
        );
        // Tags are matched exactly
        assert!(matches!(
            EventKind::from_detail_type("object created"),
            EventKind::Unsupported(_)
        ));
    }

    #[test]
    fn test_missing_fields_fail_to_parse() {
        let no_key = json!({
            "detail-type": "Object Created",
            "detail": { "bucket": { "name": "b" }, "object": {} }
        });
        assert!(StorageEvent::from_value(no_key).is_err());

        let no_detail = json!({ "detail-type": "Object Deleted" });
        assert!(StorageEvent::from_value(no_detail).is_err());
    }
}
