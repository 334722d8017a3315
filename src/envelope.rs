use reqwest::StatusCode;
use serde_json::{Map, Value};

use crate::error::DispatchError;
use crate::DispatchResult;

/// The envelope wrapping every response of the Dispatch API.
///
/// The body is kept exactly as parsed, so the caller can get the whole envelope back
/// unchanged. Callers branch on `success`, never on the HTTP status alone.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    raw: Map<String, Value>,
}

/// What a checked request hands back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extract {
    /// Only the `data` field.
    #[default]
    Data,
    /// The whole envelope, for calls where confirming success is enough.
    Envelope,
}

impl ApiResponse {
    /// Validates a raw HTTP exchange against the two-layer success contract.
    ///
    /// A non-2xx status is a system failure no matter what the body holds. A body
    /// that is not a JSON object with a boolean `success` is a system failure as well.
    /// A well-formed envelope with `success == false` is an application failure
    /// carrying the server's `error` text.
    pub fn check(status: StatusCode, body: &str) -> DispatchResult<Self> {
        if !status.is_success() {
            return Err(DispatchError::SystemFailure {
                status: status.as_u16(),
                body: body.to_string(),
            });
        }

        let malformed = |reason: String| DispatchError::MalformedResponse {
            reason,
            body: body.to_string(),
        };

        let raw = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(raw)) => raw,
            Ok(_) => return Err(malformed("not a JSON object".to_string())),
            Err(e) => return Err(malformed(e.to_string())),
        };
        let response = ApiResponse { raw };

        match response.raw.get("success") {
            Some(Value::Bool(true)) => Ok(response),
            Some(Value::Bool(false)) => Err(DispatchError::ApplicationFailure {
                message: response.error_message(),
            }),
            _ => Err(malformed("missing boolean `success` field".to_string())),
        }
    }

    /// Whether the requested operation succeeded.
    pub fn success(&self) -> bool {
        matches!(self.raw.get("success"), Some(Value::Bool(true)))
    }

    /// The payload, if present and not `null`.
    pub fn data(&self) -> Option<&Value> {
        self.raw.get("data").filter(|data| !data.is_null())
    }

    /// The `error` field rendered as text; empty when absent or `null`.
    pub fn error_message(&self) -> String {
        match self.raw.get("error") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(message)) => message.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Returns the `data` field.
    ///
    /// A successful envelope without `data`, or with `data: null`, is treated as a
    /// malformed response.
    pub fn into_data(mut self) -> DispatchResult<Value> {
        match self.raw.remove("data") {
            None | Some(Value::Null) => Err(DispatchError::MissingData),
            Some(data) => Ok(data),
        }
    }

    /// Returns the envelope exactly as the server sent it.
    pub fn into_value(self) -> Value {
        Value::Object(self.raw)
    }

    /// Returns the envelope or its `data`, depending on `extract`.
    pub fn extract(self, extract: Extract) -> DispatchResult<Value> {
        match extract {
            Extract::Data => self.into_data(),
            Extract::Envelope => Ok(self.into_value()),
        }
    }
}

/// Reads a transport response and enforces the success contract on it.
pub async fn checked_response(
    response: reqwest::Response,
    extract: Extract,
) -> DispatchResult<Value> {
    let status = response.status();
    let body = response.text().await?;
    tracing::trace!(status = status.as_u16(), body = %body, "received response");
    ApiResponse::check(status, &body)?.extract(extract)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_2xx_is_a_system_failure_regardless_of_body() {
        for (status, body) in [
            (StatusCode::UNAUTHORIZED, r#"{"success": true, "data": []}"#),
            (StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            (StatusCode::NOT_FOUND, ""),
        ] {
            match ApiResponse::check(status, body) {
                Err(DispatchError::SystemFailure { status: s, body: b }) => {
                    assert_eq!(s, status.as_u16());
                    assert_eq!(b, body);
                }
                other => panic!("unexpected result: {:?}", other),
            }
        }
    }

    #[test]
    fn unparseable_body_is_a_system_failure() {
        let err = ApiResponse::check(StatusCode::OK, "not json").unwrap_err();
        assert!(matches!(err, DispatchError::MalformedResponse { .. }));
        assert!(err.is_system_failure());
    }

    #[test]
    fn success_false_is_an_application_failure() {
        let err = ApiResponse::check(
            StatusCode::OK,
            r#"{"success": false, "error": "Invalid linecode"}"#,
        )
        .unwrap_err();
        match err {
            DispatchError::ApplicationFailure { ref message } => {
                assert_eq!(message, "Invalid linecode")
            }
            ref other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.is_application_failure());
        assert!(!err.is_system_failure());
    }

    #[test]
    fn success_returns_data_or_envelope() {
        let body = r#"{"success": true, "data": [{"id": 1}, {"id": 2}]}"#;

        let data = ApiResponse::check(StatusCode::OK, body)
            .unwrap()
            .extract(Extract::Data)
            .unwrap();
        assert_eq!(data, json!([{"id": 1}, {"id": 2}]));

        let envelope = ApiResponse::check(StatusCode::OK, body)
            .unwrap()
            .extract(Extract::Envelope)
            .unwrap();
        assert_eq!(envelope, json!({"success": true, "data": [{"id": 1}, {"id": 2}]}));

        let body = r#"{"success": true, "data": null, "error": null}"#;
        let envelope = ApiResponse::check(StatusCode::OK, body)
            .unwrap()
            .extract(Extract::Envelope)
            .unwrap();
        assert_eq!(envelope, json!({"success": true, "data": null, "error": null}));

        let err = ApiResponse::check(StatusCode::OK, body)
            .unwrap()
            .extract(Extract::Data)
            .unwrap_err();
        assert!(matches!(err, DispatchError::MissingData));
    }

    #[test]
    fn success_without_data() {
        let body = r#"{"success": true}"#;
        let err = ApiResponse::check(StatusCode::OK, body)
            .unwrap()
            .extract(Extract::Data)
            .unwrap_err();
        assert!(matches!(err, DispatchError::MissingData));

        let envelope = ApiResponse::check(StatusCode::OK, body)
            .unwrap()
            .extract(Extract::Envelope)
            .unwrap();
        assert_eq!(envelope, json!({"success": true}));
    }

    #[test]
    fn envelope_keeps_extra_fields() {
        let body = r#"{"success": true, "data": 5, "warnings": ["slow"]}"#;
        let envelope = ApiResponse::check(StatusCode::OK, body)
            .unwrap()
            .extract(Extract::Envelope)
            .unwrap();
        assert_eq!(envelope, json!({"success": true, "data": 5, "warnings": ["slow"]}));
    }

    #[test]
    fn missing_success_flag_is_malformed() {
        let err = ApiResponse::check(StatusCode::OK, r#"{"data": []}"#).unwrap_err();
        assert!(matches!(err, DispatchError::MalformedResponse { .. }));
    }

    #[test]
    fn non_object_body_is_malformed() {
        for body in ["[]", "true", r#"{"success": "yes"}"#] {
            let err = ApiResponse::check(StatusCode::OK, body).unwrap_err();
            assert!(matches!(err, DispatchError::MalformedResponse { .. }), "{}", body);
        }
    }

    #[test]
    fn failure_without_error_text() {
        let err = ApiResponse::check(StatusCode::OK, r#"{"success": false, "error": null}"#)
            .unwrap_err();
        assert!(matches!(err, DispatchError::ApplicationFailure { ref message } if message.is_empty()));
    }

    #[test]
    fn empty_object_data_is_kept() {
        let data = ApiResponse::check(StatusCode::CREATED, r#"{"success": true, "data": {}}"#)
            .unwrap()
            .into_data()
            .unwrap();
        assert_eq!(data, json!({}));
    }
}
