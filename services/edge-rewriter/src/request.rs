use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur while reading an edge event
#[derive(Error, Debug)]
pub enum EdgeError {
    #[error("CloudFront event contains no records")]
    NoRecords,
}

/// Lambda@Edge event as delivered by CloudFront
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudFrontEvent {
    #[serde(rename = "Records")]
    pub records: Vec<CloudFrontRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudFrontRecord {
    pub cf: CloudFrontPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudFrontPayload {
    /// Distribution and event metadata, passed through as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    pub request: CloudFrontRequest,
}

/// Request descriptor handed back to CloudFront
///
/// Only `uri` is interpreted; every other field (`method`, `querystring`,
/// `headers`, `origin`, `clientIp`, ...) is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudFrontRequest {
    pub uri: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl CloudFrontEvent {
    /// Take the request of the first record; CloudFront sends exactly one
    pub fn into_request(self) -> Result<CloudFrontRequest, EdgeError> {
        self.records
            .into_iter()
            .next()
            .map(|record| record.cf.request)
            .ok_or(EdgeError::NoRecords)
    }
}
