//! Job entity - A job posting published by an organization.
//!
//! Only the columns the reference-data queries read are modelled here: the
//! location a job is posted in, its status and its expiry.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Publication state of a job posting
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Not yet published
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Published and visible on the job site
    #[sea_orm(string_value = "active")]
    Active,
    /// Temporarily hidden by the employer
    #[sea_orm(string_value = "paused")]
    Paused,
    /// Past its expiry date
    #[sea_orm(string_value = "expired")]
    Expired,
    /// Filled or withdrawn
    #[sea_orm(string_value = "closed")]
    Closed,
}

/// Job database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    /// Unique identifier for the job
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Tenant the job is published in
    pub tenant_id: Uuid,
    /// Employer publishing the job
    pub organization_id: Uuid,
    /// Where the job is located, if anywhere
    pub location_id: Option<Uuid>,
    /// Category the job is filed under
    pub category_id: Option<Uuid>,
    /// Job title
    pub title: String,
    /// URL-safe identifier
    pub slug: String,
    /// Current publication state
    pub status: JobStatus,
    /// When the posting stops being shown; `None` means it never expires
    pub expires_at: Option<DateTimeUtc>,
    /// When the job was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Job and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organization::Entity",
        from = "Column::OrganizationId",
        to = "super::organization::Column::Id"
    )]
    Organization,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id"
    )]
    Location,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id"
    )]
    Tenant,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
