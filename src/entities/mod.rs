//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod category_translation;
pub mod job;
pub mod location;
pub mod organization;
pub mod tenant;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use category_translation::{
    Column as CategoryTranslationColumn, Entity as CategoryTranslation,
    Model as CategoryTranslationModel,
};
pub use job::{Column as JobColumn, Entity as Job, JobStatus, Model as JobModel};
pub use location::{
    Column as LocationColumn, Entity as Location, LocationType, Model as LocationModel,
};
pub use organization::{
    Column as OrganizationColumn, Entity as Organization, Model as OrganizationModel,
};
pub use tenant::{Column as TenantColumn, Entity as Tenant, Model as TenantModel};
