/// Success-envelope helpers shared by all handlers.
use serde::Serialize;

/// Standard response envelope: `{"status": "success", "message": ..., "data"?: ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            status: "success",
            message: message.to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Success envelope with no data payload.
    pub fn message(message: &str) -> Self {
        Self {
            status: "success",
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_includes_data() {
        let response = ApiResponse::success("Fetched", serde_json::json!({"count": 3}));
        let json = serde_json::to_value(&response).expect("serializes");
        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "Fetched");
        assert_eq!(json["data"]["count"], 3);
    }

    #[test]
    fn message_envelope_omits_data() {
        let response = ApiResponse::message("Logged out successfully");
        let json = serde_json::to_value(&response).expect("serializes");
        assert_eq!(json["status"], "success");
        assert!(json.get("data").is_none());
    }
}
