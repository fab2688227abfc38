pub mod audit;
pub mod checker;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod output;
pub mod pacing;
pub mod report;

pub use audit::{audit_export, AuditProgress, AuditReport, Auditor};
pub use checker::{BreachChecker, PwnedPasswordsApi, RangeSource};
pub use config::Config;
pub use error::{Error, Result};
pub use model::{Credential, Item, LookupResult, ReportRow};
