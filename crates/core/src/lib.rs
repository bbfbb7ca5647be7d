//! Domain logic for the project hub that needs no I/O: legacy value
//! mappers, natural-key slugs, tree ordering, migration correspondence
//! tables, snapshot diffing and audit display labels.

pub mod actor;
pub mod audit;
pub mod changes;
pub mod display;
pub mod error;
pub mod id_map;
pub mod mapping;
pub mod password;
pub mod slug;
pub mod topo;
pub mod types;
