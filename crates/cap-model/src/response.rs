//! Wire-level error envelope
//!
//! Every failed request carries one of the fixed code classes plus a human
//! readable message and structured arguments naming the offending resource.

use serde::{Deserialize, Serialize};

/// Code classes carried by error responses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MessageId {
    ResourceNotFound,
    #[serde(rename = "MalformedJSON")]
    MalformedJson,
    PropertyMissing,
    ResourceAlreadyExists,
    ResourceCannotBeDeleted,
    GeneralError,
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageId::ResourceNotFound => write!(f, "ResourceNotFound"),
            MessageId::MalformedJson => write!(f, "MalformedJSON"),
            MessageId::PropertyMissing => write!(f, "PropertyMissing"),
            MessageId::ResourceAlreadyExists => write!(f, "ResourceAlreadyExists"),
            MessageId::ResourceCannotBeDeleted => write!(f, "ResourceCannotBeDeleted"),
            MessageId::GeneralError => write!(f, "GeneralError"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "MessageId")]
    pub message_id: MessageId,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "MessageArgs", default, skip_serializing_if = "Vec::is_empty")]
    pub message_args: Vec<String>,
}

/// Envelope returned on every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl ErrorResponse {
    pub fn new(message_id: MessageId, message: impl Into<String>, message_args: Vec<String>) -> Self {
        Self {
            error: ErrorBody {
                message_id,
                message: message.into(),
                message_args,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_code_class_and_args() {
        let response = ErrorResponse::new(
            MessageId::ResourceNotFound,
            "Zone data for uri /z not found",
            vec!["Zone".to_string(), "/z".to_string()],
        );
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["error"]["MessageId"], "ResourceNotFound");
        assert_eq!(value["error"]["MessageArgs"][0], "Zone");
    }

    #[test]
    fn malformed_json_code_uses_upper_case_suffix() {
        let value = serde_json::to_value(MessageId::MalformedJson).unwrap();
        assert_eq!(value, "MalformedJSON");
    }
}
