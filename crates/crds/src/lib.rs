//! Application Stacks CRD Definitions
//!
//! The `RuntimeComponent` custom resource together with the logic that runs
//! against it on every reconciliation pass:
//! - spec defaulting ([`RuntimeComponentSpec::normalize`])
//! - status condition bookkeeping ([`RuntimeComponentStatus::set_condition`])
//! - the consumes-namespace encoding ([`ConsumesNamespace`])

pub mod certificate;
pub mod condition;
pub mod config;
pub mod defaults;
pub mod error;
pub mod namespace;
pub mod references;
pub mod route;
pub mod runtime_component;
pub mod service;

pub use certificate::*;
pub use condition::*;
pub use config::*;
pub use defaults::*;
pub use error::*;
pub use namespace::*;
pub use references::*;
pub use route::*;
pub use runtime_component::*;
pub use service::*;
