//! Request identifiers.

use std::fmt;

use salvo::{http::header::HeaderValue, prelude::Response};
use tracing::warn;
use uuid::Uuid;

pub(super) const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_INBOUND_LEN: usize = 128;

/// Correlates a request's log lines, spans and response.
///
/// A caller-supplied id is reused when it is short printable ASCII; anything else is
/// replaced with a fresh UUIDv7 so ids stay safe to echo back and to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RequestId(String);

impl RequestId {
    pub(super) fn resolve(inbound: Option<String>) -> Self {
        match inbound {
            Some(id) if is_acceptable(&id) => Self(id),
            _ => Self(Uuid::now_v7().to_string()),
        }
    }

    pub(super) fn write_header(&self, res: &mut Response) {
        match HeaderValue::from_str(&self.0) {
            Ok(value) => {
                res.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
            Err(source) => warn!(request_id = %self, "request id is not a valid header: {source}"),
        }
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_acceptable(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_INBOUND_LEN && id.bytes().all(|b| b.is_ascii_graphic())
}
