//! Workspace for the build script: data structures and code generators.
pub mod conf;
pub mod domain;
pub mod errors;
pub mod gen_field_types;
pub mod gen_lookups;
pub mod gen_pgns;
pub mod name_helpers;
pub mod repetitive_fields;
pub mod type_helpers;
