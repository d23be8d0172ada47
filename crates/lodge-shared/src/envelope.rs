//! Response envelopes.
//!
//! Every API route answers with `success` plus either `data` or `message`.
//! Two routes deviate from the generic shape and get their own structs:
//! the auth routes carry the user under `user`, and the image upload
//! carries the asset host's answer under `result`.

use serde::{Deserialize, Serialize};

use crate::types::UserInfo;

/// The uniform `{success, message?, data?}` response shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Successful response carrying a payload.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Successful response carrying only a message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Failed response with a descriptive message.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Response shape of the `/api/auth/*` routes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
}

impl AuthResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            user: None,
        }
    }

    pub fn user(user: UserInfo, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            user: Some(user),
        }
    }
}

/// Asset-host answer embedded in [`UploadResponse`]. The field name
/// follows the upstream host's convention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadResult {
    pub secure_url: String,
}

/// Response shape of the `upload-image` routes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<UploadResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_envelope_omits_message() {
        let env = Envelope::data(vec![1, 2, 3]);
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"][2], 3);
        assert!(value.get("message").is_none());
    }

    #[test]
    fn error_envelope_omits_data() {
        let env: Envelope<()> = Envelope::err("Event not found");
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["message"], "Event not found");
        assert!(value.get("data").is_none());
    }

    #[test]
    fn envelope_deserializes_with_absent_fields() {
        let env: Envelope<String> = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(env.success);
        assert!(env.message.is_none());
        assert!(env.data.is_none());
    }

    #[test]
    fn upload_response_uses_secure_url() {
        let response = UploadResponse {
            success: true,
            message: None,
            result: Some(UploadResult {
                secure_url: "https://assets.example/x.png".into(),
            }),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["result"]["secure_url"], "https://assets.example/x.png");
    }
}
