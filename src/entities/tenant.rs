//! Tenant entity - An isolated customer/region context of the job board.
//!
//! Each tenant owns its own location tree, organizations and jobs. Tenants are
//! created first by the seeder and matched to location seed buckets by `code`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tenant database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    /// Unique identifier for the tenant
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Short upper-case code (e.g. `"HR"`, `"SI"`)
    #[sea_orm(unique)]
    pub code: String,
    /// Display name of the tenant
    pub name: String,
    /// Public domain the tenant's job site is served from
    pub domain: String,
    /// Language used when a request does not name one
    pub default_language: String,
    /// Comma-separated list of supported language codes
    pub supported_languages: String,
    /// ISO 4217 currency code
    pub currency: String,
    /// IANA timezone name
    pub timezone: String,
    /// Whether the tenant is currently serving traffic
    pub is_active: bool,
    /// When the tenant was created
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Splits the stored language list into individual codes.
    #[must_use]
    pub fn languages(&self) -> Vec<&str> {
        self.supported_languages
            .split(',')
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .collect()
    }
}

/// Defines relationships between Tenant and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One tenant has many locations
    #[sea_orm(has_many = "super::location::Entity")]
    Locations,
    /// One tenant may own tenant-specific categories
    #[sea_orm(has_many = "super::category::Entity")]
    Categories,
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Locations.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
