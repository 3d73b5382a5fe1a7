use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::ApiError;
use crate::store::{KEY_ATTRIBUTE, PutOutcome, Record};

pub const SUCCESS: &str = "SUCCESS";

/// Write operation reported back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Create,
    Save,
    Update,
    Delete,
}

impl From<PutOutcome> for Operation {
    fn from(outcome: PutOutcome) -> Self {
        match outcome {
            PutOutcome::Created => Operation::Create,
            PutOutcome::Replaced => Operation::Save,
        }
    }
}

/// Response type for GET /students
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StudentListResponse {
    #[schema(value_type = Vec<Object>)]
    pub student: Vec<Record>,
}

/// Response type for POST /student
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateResponse {
    #[serde(rename = "Operation")]
    pub operation: Operation,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Item")]
    #[schema(value_type = Object)]
    pub item: Record,
}

/// Response type for PATCH /student
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateResponse {
    #[serde(rename = "Operation")]
    pub operation: Operation,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "UpdatedAttributes")]
    #[schema(value_type = Object)]
    pub updated_attributes: Record,
}

/// Response type for DELETE /student
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeleteResponse {
    #[serde(rename = "Operation")]
    pub operation: Operation,
    #[serde(rename = "Message")]
    pub message: String,
    /// Prior value of the record, `null` if there was none
    #[serde(rename = "deletedItem")]
    #[schema(value_type = Option<Object>)]
    pub deleted_item: Option<Record>,
}

/// Body of PATCH /student
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub student_id: String,
    pub update_key: String,
    pub update_value: JsonValue,
}

impl UpdateRequest {
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        let mut fields = parse_object(body)?;
        let student_id = required_str(&fields, KEY_ATTRIBUTE)?;
        let update_key = required_str(&fields, "updateKey")?;
        // `null` is a legitimate new value, only absence is rejected
        let update_value = fields
            .remove("updateValue")
            .ok_or_else(|| ApiError::BadRequest("Missing required field: updateValue".to_string()))?;

        if update_key == KEY_ATTRIBUTE {
            return Err(ApiError::BadRequest(format!(
                "{} cannot be updated",
                KEY_ATTRIBUTE
            )));
        }

        Ok(Self {
            student_id,
            update_key,
            update_value,
        })
    }
}

/// Body of DELETE /student
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteRequest {
    pub student_id: String,
}

impl DeleteRequest {
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        let fields = parse_object(body)?;
        Ok(Self {
            student_id: required_str(&fields, KEY_ATTRIBUTE)?,
        })
    }
}

/// Parse the body of POST /student: a full record carrying its key
pub fn record_from_body(body: &[u8]) -> Result<Record, ApiError> {
    let record = parse_object(body)?;
    required_str(&record, KEY_ATTRIBUTE)?;
    Ok(record)
}

fn parse_object(body: &[u8]) -> Result<Record, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::BadRequest("Request body is required".to_string()));
    }
    match serde_json::from_slice::<JsonValue>(body)? {
        JsonValue::Object(map) => Ok(map),
        _ => Err(ApiError::BadRequest(
            "Request body must be a JSON object".to_string(),
        )),
    }
}

fn required_str(fields: &Record, name: &str) -> Result<String, ApiError> {
    match fields.get(name) {
        Some(JsonValue::String(value)) if value.is_empty() => Err(ApiError::BadRequest(
            format!("Field {} must not be empty", name),
        )),
        Some(JsonValue::String(value)) => Ok(value.clone()),
        Some(_) => Err(ApiError::BadRequest(format!("Field {} must be a string", name))),
        None => Err(ApiError::BadRequest(format!("Missing required field: {}", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_request_accepts_null_value() {
        let body = br#"{"studentId": "1", "updateKey": "nickname", "updateValue": null}"#;

        let request = UpdateRequest::from_body(body).unwrap();

        assert_eq!(request.student_id, "1");
        assert_eq!(request.update_key, "nickname");
        assert_eq!(request.update_value, JsonValue::Null);
    }

    #[test]
    fn test_update_request_requires_value() {
        let body = br#"{"studentId": "1", "updateKey": "name"}"#;

        let err = UpdateRequest::from_body(body).unwrap_err();

        assert!(matches!(err, ApiError::BadRequest(msg) if msg.contains("updateValue")));
    }

    #[test]
    fn test_update_request_rejects_key_attribute() {
        let body = br#"{"studentId": "1", "updateKey": "studentId", "updateValue": "2"}"#;

        assert!(matches!(
            UpdateRequest::from_body(body),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_record_requires_string_key() {
        let err = record_from_body(br#"{"studentId": 5}"#).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg.contains("must be a string")));

        let err = record_from_body(br#"{"name": "Alice"}"#).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg.contains("studentId")));
    }

    #[test]
    fn test_empty_strings_rejected() {
        let err = record_from_body(br#"{"studentId": ""}"#).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg.contains("must not be empty")));

        let body = br#"{"studentId": "1", "updateKey": "", "updateValue": 1}"#;
        let err = UpdateRequest::from_body(body).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg.contains("updateKey")));
    }

    #[test]
    fn test_empty_and_malformed_bodies() {
        assert!(matches!(
            DeleteRequest::from_body(b""),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            DeleteRequest::from_body(b"{not json"),
            Err(ApiError::JsonError(_))
        ));
        assert!(matches!(
            DeleteRequest::from_body(b"[1, 2]"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_operation_serializes_uppercase() {
        let response = DeleteResponse {
            operation: Operation::Delete,
            message: SUCCESS.to_string(),
            deleted_item: None,
        };

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"Operation": "DELETE", "Message": "SUCCESS", "deletedItem": null})
        );
        assert_eq!(Operation::from(PutOutcome::Replaced), Operation::Save);
    }
}
