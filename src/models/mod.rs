//! Resource model layer
//!
//! Structure:
//! - `resource_kind.rs` - The kind tag shared by the loader, graph and renderer
//! - `object.rs` - Payload enum wrapping every listed resource
//! - `openshift.rs` - Serde types for the OpenShift API groups

pub mod object;
pub mod openshift;
pub mod resource_kind;

pub use object::{ResourceObject, creation_time, to_utc};
pub use resource_kind::ResourceKind;
