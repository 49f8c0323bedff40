//! Quote Session
//!
//! One user's editing session over a quote: a small state machine around
//! the document's change buffer, committed only when the preview opens.
//!
//! # Core Concepts
//!
//! - [`SessionState`]: `NEW → LOADING/READY → SAVING → PREVIEW`, with
//!   `FAILED` terminal after a refused load
//! - [`QuoteSession`]: create/load, buffered edits, commit-on-preview, back
//! - [`QuotePreview`]: formatted view model of the quote
//! - [`QuoteConfig`]: VAT rate and preview options
//!
//! # Example
//!
//! ```rust
//! use quote_document::{CompanyInfo, MemoryStore, OwnerId};
//! use quote_session::{PreviewOutcome, QuoteConfig, QuoteSession, SessionState};
//! use std::sync::Arc;
//!
//! # tokio_test_block(async {
//! let session = QuoteSession::new(
//!     Arc::new(MemoryStore::new()),
//!     OwnerId::new("u1"),
//!     QuoteConfig::default(),
//! );
//! let info = CompanyInfo::new("Acme Ltd", "123456789", "0501234567", "Globex");
//! session.create_document(info, None).await.unwrap();
//!
//! session.edit_table(|t| t.add_row()).unwrap();
//! assert_eq!(session.request_preview().await.unwrap(), PreviewOutcome::Saved);
//! assert_eq!(session.state(), SessionState::Preview);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod controller;
pub mod error;
pub mod preview;
pub mod state_machine;

pub use config::QuoteConfig;
pub use controller::{PreviewOutcome, QuoteSession};
pub use error::SessionError;
pub use preview::{build_preview, PreviewColumn, PreviewRow, PreviewTotals, QuotePreview};
pub use state_machine::{allowed_transitions, validate_transition, SessionState};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
