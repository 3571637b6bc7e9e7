//! JSON bodies for the faucet endpoint.

use serde::{Deserialize, Serialize};

/// Route of the funding endpoint.
pub const FAUCET_PATH: &str = "/api/faucet";

/// Body of `POST /api/faucet`.
///
/// `address` is optional at the serde level so that a missing field reaches
/// the handler and is reported as a validation error instead of a parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaucetRequest {
    #[serde(default)]
    pub address: Option<String>,
}

impl FaucetRequest {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
        }
    }
}

/// Body of every `POST /api/faucet` answer, successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaucetResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FaucetResponse {
    pub fn funded(message: impl Into<String>, tx_hash: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            tx_hash: Some(tx_hash.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            tx_hash: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_body_shape() {
        let body = FaucetResponse::funded("Successfully sent 0.1 0G", "0xdead");
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(
            value,
            json!({
                "success": true,
                "message": "Successfully sent 0.1 0G",
                "txHash": "0xdead"
            })
        );
    }

    #[test]
    fn test_error_body_shape() {
        let body = FaucetResponse::failed("invalid address format");
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value, json!({ "success": false, "error": "invalid address format" }));
    }

    #[test]
    fn test_request_without_address() {
        let request: FaucetRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.address, None);

        let request: FaucetRequest = serde_json::from_str(r#"{"address": null}"#).unwrap();
        assert_eq!(request.address, None);
    }

    #[test]
    fn test_request_ignores_unknown_fields() {
        let request: FaucetRequest =
            serde_json::from_str(r#"{"address": "0xabc", "captcha": "x"}"#).unwrap();
        assert_eq!(request, FaucetRequest::new("0xabc"));
    }

    #[test]
    fn test_error_body_without_message_field() {
        let response: FaucetResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!response.success);
        assert_eq!(response.error, None);
    }
}
