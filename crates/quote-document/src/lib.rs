//! Quote Document
//!
//! The persisted quote: company details, logo, terms, remarks and the
//! services table, plus the gateways it is stored and owned through.
//!
//! # Core Concepts
//!
//! - [`QuoteDraft`]: validated company info awaiting its store id
//! - [`QuoteDocument`]: persisted quote with exactly one owner
//! - [`TrackedQuote`]: last-persisted document plus a local change buffer
//!   that is only written on [`TrackedQuote::commit`]
//! - [`DocumentStore`]: async persistence gateway ([`MemoryStore`] in process)
//! - [`IdentityProvider`]: who is signed in
//!
//! # Example
//!
//! ```rust
//! use quote_document::{CompanyInfo, OwnerId, QuoteDraft};
//!
//! let info = CompanyInfo::new("Acme Ltd", "12345", "0501234567", "Globex");
//! let err = QuoteDraft::create(OwnerId::new("u1"), info, None).unwrap_err();
//! assert_eq!(err.to_string(), "companyId: companyIdFormat");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod clauses;
pub mod company;
pub mod document;
pub mod error;
pub mod identity;
pub mod patch;
pub mod store;
pub mod tracked;

pub use clauses::ClauseList;
pub use company::CompanyInfo;
pub use document::{DocumentId, OwnerId, QuoteDocument, QuoteDraft};
pub use error::{CompanyField, DocumentError, FieldIssue, StoreError, ValidationError};
pub use identity::{IdentityProvider, StaticIdentity, UserIdentity};
pub use patch::QuotePatch;
pub use store::{DocumentStore, MemoryStore};
pub use tracked::{CommitOutcome, PendingCommit, TrackedQuote};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
