//! Location entity - Per-tenant geography tree (country, region, city).
//!
//! The `type` hierarchy runs strictly COUNTRY → REGION → CITY top-down. The
//! schema does not enforce it; seed data validation does.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Level of a location inside its tenant's tree
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    /// Top-level location
    #[sea_orm(string_value = "COUNTRY")]
    Country,
    /// Second level, below a country
    #[sea_orm(string_value = "REGION")]
    Region,
    /// Third level, below a region
    #[sea_orm(string_value = "CITY")]
    City,
}

impl LocationType {
    /// Depth of this type in a well-formed tree, countries being 0.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Country => 0,
            Self::Region => 1,
            Self::City => 2,
        }
    }
}

impl std::str::FromStr for LocationType {
    type Err = crate::errors::Error;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "COUNTRY" => Ok(Self::Country),
            "REGION" => Ok(Self::Region),
            "CITY" => Ok(Self::City),
            other => Err(crate::errors::Error::Config {
                message: format!("Unknown location type: {other}"),
            }),
        }
    }
}

/// Location database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    /// Unique identifier for the location
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning tenant
    pub tenant_id: Uuid,
    /// Level in the tree
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub location_type: LocationType,
    /// URL-safe identifier
    pub slug: String,
    /// Display name
    pub name: String,
    /// Parent location, `None` for countries
    pub parent_id: Option<Uuid>,
    /// When the location was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Location and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each location may belong to one parent location
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id"
    )]
    Parent,
    /// Each location belongs to one tenant
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id"
    )]
    Tenant,
    /// One location has many jobs
    #[sea_orm(has_many = "super::job::Entity")]
    Jobs,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl Related<super::job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jobs.def()
    }
}

/// Self-join from a location to its immediate parent
#[derive(Debug)]
pub struct ParentLink;

impl Linked for ParentLink {
    type FromEntity = Entity;
    type ToEntity = Entity;

    fn link(&self) -> Vec<RelationDef> {
        vec![Relation::Parent.def()]
    }
}

impl ActiveModelBehavior for ActiveModel {}
