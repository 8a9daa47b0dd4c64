//! Shared test utilities.
//!
//! This module provides helpers for setting up in-memory test databases and
//! creating rows with sensible defaults, bypassing the seeder.

use crate::{
    entities::{
        JobStatus, LocationType, category, category_translation, job, location, organization,
        tenant,
    },
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = crate::config::database::create_connection("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a tenant with the given code.
///
/// # Defaults
/// * languages: `"en"` only
/// * currency: `"EUR"`, timezone: `"UTC"`
pub async fn create_test_tenant(db: &DatabaseConnection, code: &str) -> Result<tenant::Model> {
    let lower = code.to_lowercase();
    tenant::ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(code.to_string()),
        name: Set(format!("Tenant {code}")),
        domain: Set(format!("jobs.{lower}")),
        default_language: Set("en".to_string()),
        supported_languages: Set("en".to_string()),
        currency: Set("EUR".to_string()),
        timezone: Set("UTC".to_string()),
        is_active: Set(true),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates an organization owned by `tenant_id`.
pub async fn create_test_organization(
    db: &DatabaseConnection,
    tenant_id: Uuid,
) -> Result<organization::Model> {
    organization::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        name: Set("Test Employer".to_string()),
        slug: Set("test-employer".to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a location whose name is its slug.
pub async fn create_test_location(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    slug: &str,
    location_type: LocationType,
    parent: Option<&location::Model>,
) -> Result<location::Model> {
    location::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        location_type: Set(location_type),
        slug: Set(slug.to_string()),
        name: Set(slug.to_string()),
        parent_id: Set(parent.map(|p| p.id)),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a category with the given `(language, name)` translations.
pub async fn create_test_category(
    db: &DatabaseConnection,
    slug: &str,
    tenant_id: Option<Uuid>,
    parent_id: Option<Uuid>,
    translations: &[(&str, &str)],
) -> Result<category::Model> {
    let row = category::ActiveModel {
        id: Set(Uuid::new_v4()),
        slug: Set(slug.to_string()),
        tenant_id: Set(tenant_id),
        parent_id: Set(parent_id),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;

    for (language, name) in translations {
        category_translation::ActiveModel {
            id: Set(Uuid::new_v4()),
            category_id: Set(row.id),
            language: Set((*language).to_string()),
            name: Set((*name).to_string()),
        }
        .insert(db)
        .await?;
    }
    Ok(row)
}

/// Creates a job posted by `organization`, in its tenant.
pub async fn create_test_job(
    db: &DatabaseConnection,
    organization: &organization::Model,
    location_id: Option<Uuid>,
    status: JobStatus,
    expires_at: Option<DateTime<Utc>>,
) -> Result<job::Model> {
    let id = Uuid::new_v4();
    job::ActiveModel {
        id: Set(id),
        tenant_id: Set(organization.tenant_id),
        organization_id: Set(organization.id),
        location_id: Set(location_id),
        category_id: Set(None),
        title: Set("Test Job".to_string()),
        slug: Set(format!("test-job-{}", id.simple())),
        status: Set(status),
        expires_at: Set(expires_at),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
