//! Quota-guarded pulls from the college stats API.
//!
//! Every executed request reserves a call in a monthly [`UsageLedger`]
//! before it is dispatched; a dry run only reports what would be sent.

pub mod client;
pub mod dataset;
pub mod error;
pub mod ledger;

pub use client::{
    API_KEY_VAR, ApiClient, DEFAULT_BASE_URL, DEFAULT_MAX_CALLS, FetchMode, FetchOutcome, PROVIDER,
    save_payload,
};
pub use dataset::{Dataset, FetchRequest};
pub use error::{FetchError, Result};
pub use ledger::{UsageEntry, UsageLedger, UsageState, UsageStatus, month_key, usage_path};
