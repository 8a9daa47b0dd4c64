//! Tenant lookups shared by the seeder and the query layer.

use crate::{
    entities::{Tenant, tenant},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, prelude::*};

/// Retrieves every tenant, ordered by code.
pub async fn get_all_tenants<C>(db: &C) -> Result<Vec<tenant::Model>>
where
    C: ConnectionTrait,
{
    Tenant::find()
        .order_by_asc(tenant::Column::Code)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a tenant by its code. Codes are stored upper-case, so `"hr"` finds `"HR"`.
pub async fn get_tenant_by_code<C>(db: &C, code: &str) -> Result<Option<tenant::Model>>
where
    C: ConnectionTrait,
{
    Tenant::find()
        .filter(tenant::Column::Code.eq(code.trim().to_uppercase()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_tenant_by_code`], but a missing tenant is an error.
pub async fn require_tenant<C>(db: &C, code: &str) -> Result<tenant::Model>
where
    C: ConnectionTrait,
{
    get_tenant_by_code(db, code)
        .await?
        .ok_or_else(|| Error::TenantNotFound {
            code: code.to_string(),
        })
}
