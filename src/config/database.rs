//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written DDL.

use crate::entities::{Category, CategoryTranslation, Job, Location, Organization, Tenant};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};

/// Fallback used when neither the environment nor the config file names a database.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://jobboard.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, or `fallback`.
#[must_use]
pub fn get_database_url(fallback: &str) -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| fallback.to_string())
}

/// Establishes a connection to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    tracing::debug!("Connecting to database at {database_url}");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions, skipping ones that already exist.
///
/// Tables are created parents first: tenants, organizations, categories,
/// category translations, locations, then jobs.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    create_table(db, Tenant).await?;
    create_table(db, Organization).await?;
    create_table(db, Category).await?;
    create_table(db, CategoryTranslation).await?;
    create_table(db, Location).await?;
    create_table(db, Job).await?;
    Ok(())
}

async fn create_table<C, E>(db: &C, entity: E) -> Result<()>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();

    db.execute(builder.build(&statement)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        CategoryModel, CategoryTranslationModel, JobModel, LocationModel, TenantModel,
    };
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<TenantModel> = Tenant::find().limit(1).all(&db).await?;
        let _: Vec<CategoryModel> = Category::find().limit(1).all(&db).await?;
        let _: Vec<CategoryTranslationModel> =
            CategoryTranslation::find().limit(1).all(&db).await?;
        let _: Vec<LocationModel> = Location::find().limit(1).all(&db).await?;
        let _: Vec<JobModel> = Job::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_twice_is_harmless() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
