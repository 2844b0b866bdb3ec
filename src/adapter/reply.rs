//! Transport envelope for operation outcomes.
//!
//! ```json
//! {"ok": true, "kind": "invoice_create_success", "payload": {...}}
//! {"ok": false, "code": "init_channel_manager", "message": "channel_manager is not initialized"}
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::application::SuccessKind;
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Success {
        ok: bool,
        kind: &'static str,
        payload: Value,
    },
    Failure {
        ok: bool,
        code: &'static str,
        message: String,
    },
}

impl Reply {
    pub fn success(kind: SuccessKind, payload: impl Serialize) -> Self {
        match serde_json::to_value(payload) {
            Ok(payload) => Reply::Success {
                ok: true,
                kind: kind.as_str(),
                payload,
            },
            Err(e) => Reply::Failure {
                ok: false,
                code: "unknown_error",
                message: format!("failed to serialize {kind} payload: {e}"),
            },
        }
    }

    #[must_use]
    pub fn failure(err: &Error) -> Self {
        Reply::Failure {
            ok: false,
            code: err.code(),
            message: err.to_string(),
        }
    }

    /// Wrap an operation result; `kind` tags it on success.
    pub fn from_result<T: Serialize>(kind: SuccessKind, result: Result<T, Error>) -> Self {
        match result {
            Ok(payload) => Reply::success(kind, payload),
            Err(e) => Reply::failure(&e),
        }
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Reply::Success { .. })
    }

    /// JSON text of the envelope.
    #[must_use]
    pub fn to_json(&self) -> String {
        // A Reply holds only strings, bools and a Value, which always serialize.
        serde_json::to_string(self).unwrap_or_default()
    }
}
