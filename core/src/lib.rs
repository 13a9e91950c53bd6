//! Contact synchronization and validation layer.
//!
//! # Overview
//! Validates contact form input, decides per operation whether to talk to
//! the remote contacts API or fall back to a local in-memory list, and
//! merges results back into that list.
//!
//! # Design
//! - `ContactClient` is stateless and sans-IO: `build_*` produces an
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse`.
//! - A `Transport` executes the round-trip; `ReqwestTransport` is the
//!   default, tests plug in scripted transports.
//! - `ContactStore` is an explicitly constructed value owned by the host,
//!   never a global. It re-probes availability before every mutation.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod notify;
pub mod probe;
pub mod schema;
pub mod seed;
pub mod store;
pub mod transport;
pub mod types;
pub mod validation;

pub use client::ContactClient;
pub use config::Config;
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use notify::{Level, Notification, Notifier, RecordingNotifier, TracingNotifier};
pub use probe::AvailabilityProbe;
pub use schema::{ContactSchema, FieldErrors, ValidationResult};
pub use store::{ContactStore, OperationReport, StoreBuilder, StoreOutcome};
pub use transport::{ReqwestTransport, Transport};
pub use types::{Contact, ContactFormData, ContactId, ContactPatch, NewContact};
pub use validation::{
    format_phone_number, name_helper_text, phone_helper_text, validate_field, Field,
};
