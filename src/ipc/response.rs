use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BridgeError;
use crate::{info, warn};

/// Named failure carried in an error reply.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReplyError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Terminal outcome of one method invocation: success with a payload,
/// a coded failure, or not-implemented for method names the bridge does
/// not know. Exactly one outcome is ever reported per call.
#[derive(Debug, Serialize, Deserialize)]
pub struct MethodReply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ReplyError>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub not_implemented: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl MethodReply {
    pub fn ok(data: Value) -> Self {
        info!("Reply created: ok=true");
        Self {
            ok: true,
            data: Some(data),
            error: None,
            not_implemented: false,
        }
    }

    pub fn err(err: &BridgeError) -> Self {
        warn!("Reply created: ok=false, code='{}', message='{err}'", err.code());
        Self {
            ok: false,
            data: None,
            error: Some(ReplyError {
                code: err.code().to_string(),
                message: err.to_string(),
                detail: err.detail().map(str::to_string),
            }),
            not_implemented: false,
        }
    }

    pub fn not_implemented() -> Self {
        info!("Reply created: not implemented");
        Self {
            ok: false,
            data: None,
            error: None,
            not_implemented: true,
        }
    }

    pub fn from_result(result: Result<Value, BridgeError>) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(e) => Self::err(&e),
        }
    }
}
