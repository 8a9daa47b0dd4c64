//! Core logic - seeding, purging and the tree queries over reference data.

/// Category list, tree and single-node queries
pub mod categories;
/// Location list, tree, job-count and single-node queries
pub mod locations;
/// Id-or-slug key parsing for single-node lookups
pub mod lookup;
/// Foreign-key-safe deletion of all job-board data
pub mod purge;
/// Idempotent seeding of tenants, categories and locations
pub mod seeder;
/// Tenant lookups
pub mod tenants;
/// Fixed-depth tree assembly
pub mod tree;
