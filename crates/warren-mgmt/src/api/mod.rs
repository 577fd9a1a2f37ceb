//! Typed operations, grouped by management-API entity.
//!
//! Each submodule contributes wire types plus an inherent `impl` block on
//! [`crate::MgmtClient`]. Paths are assembled with [`crate::path::api_path`]
//! so names and vhosts (including the default `/`) survive URL encoding.

pub mod bindings;
pub mod exchanges;
pub mod federation;
pub mod limits;
pub mod overview;
pub mod parameters;
pub mod permissions;
pub mod policies;
pub mod publish;
pub mod queues;
pub mod shovels;
pub mod users;
pub mod vhosts;
