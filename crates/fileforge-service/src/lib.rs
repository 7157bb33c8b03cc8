//! # fileforge-service
//!
//! The validation half of the FileForge pipeline: magic-byte content
//! sniffing, the category policy table, and the upload validator that
//! gates every payload before conversion is attempted.

pub mod policy;
pub mod sniffer;
pub mod validator;

pub use policy::CategoryPolicy;
pub use sniffer::ContentSniffer;
pub use validator::{UploadValidator, ValidationError};
