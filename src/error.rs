use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecryptionError {
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("ciphertext length {0} is not a positive multiple of 16 bytes")]
    BlockLength(usize),

    #[error("decrypted payload is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("report is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("report must be a JSON object")]
    NotAnObject,

    #[error("report has no team_number")]
    MissingTeamNumber,

    #[error("team_number {0} is not a usable team identifier")]
    InvalidTeamNumber(String),

    #[error("field {field} is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Everything that can reject a report at the ingest boundary.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("decryption failed: {0}")]
    Decrypt(#[from] DecryptionError),

    #[error("malformed report: {0}")]
    Parse(#[from] ParseError),
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingest_errors_map_to_bad_request() {
        let resp = IngestError::from(ParseError::MissingTeamNumber).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = IngestError::from(DecryptionError::BlockLength(5)).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn messages_name_the_cause() {
        let err = IngestError::from(DecryptionError::BlockLength(5));
        assert_eq!(
            err.to_string(),
            "decryption failed: ciphertext length 5 is not a positive multiple of 16 bytes"
        );
    }
}
