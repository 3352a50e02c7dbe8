//! Correlation types for request tracking
//!
//! A governance proposal is evaluated inside the caller's unit of work. The
//! request identifier travels with it into log events and audit details so
//! that a decision can be traced back to the request that produced it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! correlation_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Fresh UUIDv7, so ids sort by creation time
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        /// Wraps an id issued by the transport layer
        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

correlation_id!(
    /// Identifier of one request or proposal
    RequestId
);

correlation_id!(
    /// Trace identifier propagated from an upstream caller
    TraceId
);

/// Correlation context carried through an engine call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub trace_id: Option<TraceId>,
}

impl RequestContext {
    /// Context with a fresh RequestId and no trace
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_id(request_id: impl Into<RequestId>) -> Self {
        Self {
            request_id: request_id.into(),
            trace_id: None,
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}
