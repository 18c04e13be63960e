//! GPlay Dispatch - action routing between front ends and the Play Store service.
//!
//! Front ends hand this crate an action name plus loosely-typed string
//! parameters and get back a transport-neutral envelope. In between:
//!
//! ```text
//! Request → Normalizer → Handler.validate → one service call → Outcome → Envelope
//!                                  ↓ (missing identifier)
//!                           InvalidInput, no call
//! ```
//!
//! # Features
//!
//! - **Parameter Normalization**: Defaults for absent or invalid values, never an error
//! - **Action Routing**: Selective vs full-analysis calls chosen by the field list
//! - **Failure Classification**: Input, service and internal failures kept apart
//! - **Execution Bridge**: Background runs delivered back to a single presentation context
//!
//! # Example
//!
//! ```rust
//! use gplay_dispatch::{to_envelope, ActionRouter, PlayStoreService, Request, StatusClass};
//! use std::sync::Arc;
//!
//! # async fn example(service: Arc<dyn PlayStoreService>) {
//! let router = ActionRouter::new(service);
//!
//! let request = Request::from_pairs([("query", "productivity"), ("count", "3")]);
//! let envelope = to_envelope(router.dispatch("search", &request).await);
//!
//! if envelope.status == StatusClass::Ok {
//!     println!("{}", envelope.body_pretty());
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod bridge;
pub mod envelope;
pub mod handlers;
pub mod outcome;
pub mod params;
pub mod router;
pub mod service;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use bridge::{Delivery, ExecutionBridge, PresentationQueue, RunHandle, RunId, RunState};
pub use envelope::{to_envelope, Envelope, EnvelopeBody, StatusClass, INTERNAL_ERROR_MESSAGE};
pub use handlers::{ActionHandler, CallKind, Selection};
pub use outcome::{FailureKind, Outcome};
pub use params::{ParamDefaults, ParamError, Request};
pub use router::ActionRouter;
pub use service::{Locale, PlayStoreService, ServiceError, ServiceResult};
