//! Error handling types for backend-api.
//!
//! Two kinds of failure reach error handlers:
//! - communication errors, raised by the transport with a native reason code
//!   (`"error"`, `"timeout"`, `"parsererror"`, `"abort"`);
//! - business errors, raised when a result processor rejects an otherwise
//!   successful response. These carry the [`BUSINESS_ERROR`] marker.
//!
//! # Example
//!
//! ```rust,ignore
//! use backend_api::error::{BUSINESS_ERROR, DispatchError};
//!
//! let err = DispatchError::business(serde_json::json!({"status": 1}));
//! assert_eq!(err.reason(), BUSINESS_ERROR);
//! assert!(err.is_business());
//! ```

mod conversions;
pub mod types;

pub use types::*;
