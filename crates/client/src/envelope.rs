//! The `{success, data, message}` response envelope shared by both backends.

use serde::{Deserialize, Serialize};

use crate::transport::TransportError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }

    /// Success without a payload (deletes).
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Unwrap the payload; `success: false` and a missing payload are errors.
    pub fn into_data(self) -> Result<T, BackendError> {
        if !self.success {
            return Err(BackendError::rejected(self.message));
        }
        self.data.ok_or(BackendError::MissingData)
    }

    /// Accept a payload-less success and return the server message, if any.
    pub fn into_outcome(self) -> Result<Option<String>, BackendError> {
        if self.success {
            Ok(self.message)
        } else {
            Err(BackendError::rejected(self.message))
        }
    }
}

pub const DEFAULT_REJECTION_MESSAGE: &str = "The request was not accepted";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("response carried no data")]
    MissingData,
}

impl BackendError {
    fn rejected(message: Option<String>) -> Self {
        BackendError::Rejected(
            message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string()),
        )
    }

    /// One line suitable for an error banner.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Transport(err) => err.user_message(),
            BackendError::Rejected(message) => message.clone(),
            BackendError::MissingData => "The server sent an unexpected response".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_with_data_unwraps() {
        let env: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"success":true,"data":[1,2,3]}"#).unwrap();
        assert_eq!(env.into_data().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn failure_envelope_becomes_rejection_with_server_message() {
        let env: Envelope<u32> =
            serde_json::from_str(r#"{"success":false,"message":"Obat tidak ditemukan"}"#).unwrap();
        assert_eq!(
            env.into_data().unwrap_err(),
            BackendError::Rejected("Obat tidak ditemukan".into())
        );
    }

    #[test]
    fn failure_without_message_uses_default() {
        let env: Envelope<u32> = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert_eq!(
            env.into_outcome().unwrap_err().user_message(),
            DEFAULT_REJECTION_MESSAGE
        );
    }

    #[test]
    fn success_without_data() {
        let env: Envelope<()> =
            serde_json::from_str(r#"{"success":true,"message":"Obat berhasil dihapus"}"#).unwrap();
        assert_eq!(env.clone().into_outcome().unwrap().as_deref(), Some("Obat berhasil dihapus"));
        assert_eq!(env.into_data().unwrap_err(), BackendError::MissingData);
    }

    #[test]
    fn serializes_without_absent_fields() {
        let json = serde_json::to_value(Envelope::<()>::done("ok")).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "message": "ok"}));
    }
}
