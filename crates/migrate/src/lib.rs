//! One-shot migration from a legacy zentao (`zt_*`) store into the project
//! hub's target store.
//!
//! The [`driver`] runs one migrator per entity kind in dependency order.
//! Each migrator reads its legacy rows, upserts them by natural key and
//! records the legacy-to-target id correspondence in the shared
//! [`resolver::Resolver`] for the migrators after it.

pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod migrators;
pub mod resolver;
pub mod stats;
