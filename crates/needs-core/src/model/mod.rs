//! Wire-compatible records served by the catalog backend. Field names
//! serialize in camelCase to match the JSON the API speaks.

pub mod need;
pub mod reference;

pub use need::Need;
pub use reference::{Entity, SuperGroup, UserGroup, WorkflowPhase};
