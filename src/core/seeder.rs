//! Reference-data seeding.
//!
//! Seeds tenants, global categories (with translations) and per-tenant
//! location trees from [`SeedData`]. Every entity type is guarded by an
//! emptiness check: when any row of that type exists the seeder skips it and
//! returns the existing rows. The guard is all-or-nothing and does not repair
//! a partially seeded table.
//!
//! Inserts are not wrapped in a transaction. If an insert fails mid-tree the
//! rows already written stay in place.

use crate::{
    core::{purge, tenants},
    entities::{
        Category, CategoryTranslation, Location, Tenant, category, category_translation,
        location, tenant,
    },
    errors::{Error, Result},
    seed_data::{CategorySeed, LocationSeed, SeedData, SeedNode, TenantSeed, normalize_code},
};
use chrono::Utc;
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

/// Writes one node of a seed tree and reports the id assigned to it.
pub(crate) trait NodeWriter<N: SeedNode> {
    type Row;

    async fn write(&mut self, node: &N, parent_id: Option<Uuid>) -> Result<Self::Row>;

    fn row_id(row: &Self::Row) -> Uuid;
}

/// Inserts `root` and all of its descendants, parents before children.
///
/// The walk is depth-first over an explicit worklist of `(node, parent_id)`
/// pairs, so every child is written with the id its parent was just given.
/// Returns the root row.
pub(crate) async fn seed_tree<N, W>(
    writer: &mut W,
    root: &N,
    parent_id: Option<Uuid>,
) -> Result<W::Row>
where
    N: SeedNode,
    W: NodeWriter<N>,
{
    let root_row = writer.write(root, parent_id).await?;
    let root_id = <W as NodeWriter<N>>::row_id(&root_row);

    // Reversed so siblings pop off the stack in definition order.
    let mut pending: Vec<(&N, Uuid)> = root
        .children()
        .iter()
        .rev()
        .map(|child| (child, root_id))
        .collect();

    while let Some((node, parent)) = pending.pop() {
        let row = writer.write(node, Some(parent)).await?;
        let id = <W as NodeWriter<N>>::row_id(&row);
        pending.extend(node.children().iter().rev().map(|child| (child, id)));
    }

    Ok(root_row)
}

struct CategoryWriter<'a, C> {
    db: &'a C,
    tenant_id: Option<Uuid>,
    created: Vec<category::Model>,
    translations: usize,
}

impl<C: ConnectionTrait> NodeWriter<CategorySeed> for CategoryWriter<'_, C> {
    type Row = category::Model;

    async fn write(&mut self, node: &CategorySeed, parent_id: Option<Uuid>) -> Result<Self::Row> {
        let row = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            slug: Set(node.slug.clone()),
            tenant_id: Set(self.tenant_id),
            parent_id: Set(parent_id),
            created_at: Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        for (language, name) in &node.translations {
            category_translation::ActiveModel {
                id: Set(Uuid::new_v4()),
                category_id: Set(row.id),
                language: Set(language.clone()),
                name: Set(name.clone()),
            }
            .insert(self.db)
            .await?;
            self.translations += 1;
        }

        debug!("Seeded category {} ({} translations)", row.slug, node.translations.len());
        self.created.push(row.clone());
        Ok(row)
    }

    fn row_id(row: &Self::Row) -> Uuid {
        row.id
    }
}

struct LocationWriter<'a, C> {
    db: &'a C,
    tenant_id: Uuid,
    created: Vec<location::Model>,
}

impl<C: ConnectionTrait> NodeWriter<LocationSeed> for LocationWriter<'_, C> {
    type Row = location::Model;

    async fn write(&mut self, node: &LocationSeed, parent_id: Option<Uuid>) -> Result<Self::Row> {
        let row = location::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(self.tenant_id),
            location_type: Set(node.location_type),
            slug: Set(node.slug.clone()),
            name: Set(node.name.clone()),
            parent_id: Set(parent_id),
            created_at: Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        self.created.push(row.clone());
        Ok(row)
    }

    fn row_id(row: &Self::Row) -> Uuid {
        row.id
    }
}

/// Rows of one entity type after a seed step.
#[derive(Debug, Clone)]
pub struct SeedOutcome<M> {
    /// Rows inserted by this run, or the existing rows when the step was skipped
    pub rows: Vec<M>,
    /// `false` when the table already had rows and nothing was inserted
    pub seeded: bool,
}

impl<M> SeedOutcome<M> {
    const fn skipped(rows: Vec<M>) -> Self {
        Self {
            rows,
            seeded: false,
        }
    }

    const fn seeded(rows: Vec<M>) -> Self {
        Self {
            rows,
            seeded: true,
        }
    }
}

/// Which reference table a targeted seed run should populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedTarget {
    /// The `tenants` table
    Tenants,
    /// `categories` with their translations
    Categories,
    /// Per-tenant `locations` trees
    Locations,
}

impl fmt::Display for SeedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tenants => "tenants",
            Self::Categories => "categories",
            Self::Locations => "locations",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for SeedTarget {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tenants" => Ok(Self::Tenants),
            "categories" => Ok(Self::Categories),
            "locations" => Ok(Self::Locations),
            other => Err(Error::Config {
                message: format!(
                    "Unknown seed target '{other}' (expected tenants, categories or locations)"
                ),
            }),
        }
    }
}

/// Short description of one seed step, for logs and CLI output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    /// Table the step populated
    pub target: String,
    /// Rows inserted, or rows already present when skipped
    pub rows: usize,
    /// `false` when the step was skipped
    pub seeded: bool,
}

impl SeedSummary {
    fn new<M>(target: SeedTarget, outcome: &SeedOutcome<M>) -> Self {
        Self {
            target: target.to_string(),
            rows: outcome.rows.len(),
            seeded: outcome.seeded,
        }
    }
}

/// Result of a full seed run.
#[derive(Debug, Clone)]
pub struct SeedReport {
    /// Tenant step
    pub tenants: SeedOutcome<tenant::Model>,
    /// Category step (translations are not listed)
    pub categories: SeedOutcome<category::Model>,
    /// Location step, all tenants together
    pub locations: SeedOutcome<location::Model>,
}

impl SeedReport {
    #[must_use]
    pub fn summaries(&self) -> Vec<SeedSummary> {
        vec![
            SeedSummary::new(SeedTarget::Tenants, &self.tenants),
            SeedSummary::new(SeedTarget::Categories, &self.categories),
            SeedSummary::new(SeedTarget::Locations, &self.locations),
        ]
    }
}

/// Row counts of the reference tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedStatus {
    /// Rows in `tenants`
    pub tenants: u64,
    /// Rows in `categories`
    pub categories: u64,
    /// Rows in `category_translations`
    pub category_translations: u64,
    /// Rows in `locations`
    pub locations: u64,
}

impl SeedStatus {
    /// `true` when every reference table is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tenants == 0
            && self.categories == 0
            && self.category_translations == 0
            && self.locations == 0
    }

    /// `true` when at least one reference table has not been seeded yet.
    #[must_use]
    pub const fn needs_seeding(&self) -> bool {
        self.tenants == 0 || self.categories == 0 || self.locations == 0
    }
}

/// Counts the rows of every reference table.
pub async fn status<C>(db: &C) -> Result<SeedStatus>
where
    C: ConnectionTrait,
{
    Ok(SeedStatus {
        tenants: Tenant::find().count(db).await?,
        categories: Category::find().count(db).await?,
        category_translations: CategoryTranslation::find().count(db).await?,
        locations: Location::find().count(db).await?,
    })
}

/// Inserts the seed tenants unless the tenants table already has rows.
pub async fn seed_tenants<C>(db: &C, seeds: &[TenantSeed]) -> Result<SeedOutcome<tenant::Model>>
where
    C: ConnectionTrait,
{
    let existing = Tenant::find().count(db).await?;
    if existing > 0 {
        info!("Tenants already seeded ({existing} rows), skipping");
        return Ok(SeedOutcome::skipped(tenants::get_all_tenants(db).await?));
    }

    let mut created = Vec::with_capacity(seeds.len());
    for seed in seeds {
        let row = tenant::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(normalize_code(&seed.code)),
            name: Set(seed.name.clone()),
            domain: Set(seed.domain.clone()),
            default_language: Set(seed.default_language.clone()),
            supported_languages: Set(seed.supported_languages.join(",")),
            currency: Set(seed.currency.clone()),
            timezone: Set(seed.timezone.clone()),
            is_active: Set(seed.is_active),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;
        created.push(row);
    }

    info!("Seeded {} tenants", created.len());
    Ok(SeedOutcome::seeded(created))
}

/// Inserts the global category trees unless the categories table already has rows.
pub async fn seed_categories<C>(
    db: &C,
    roots: &[CategorySeed],
) -> Result<SeedOutcome<category::Model>>
where
    C: ConnectionTrait,
{
    let existing = Category::find().count(db).await?;
    if existing > 0 {
        info!("Categories already seeded ({existing} rows), skipping");
        let rows = Category::find()
            .order_by_asc(category::Column::Slug)
            .all(db)
            .await?;
        return Ok(SeedOutcome::skipped(rows));
    }

    let mut writer = CategoryWriter {
        db,
        tenant_id: None,
        created: Vec::new(),
        translations: 0,
    };
    for root in roots {
        seed_tree(&mut writer, root, None).await?;
    }

    info!(
        "Seeded {} categories with {} translations",
        writer.created.len(),
        writer.translations
    );
    Ok(SeedOutcome::seeded(writer.created))
}

/// Inserts each tenant's location trees unless the locations table already has rows.
///
/// Tenants are visited in code order; a tenant without a matching bucket in
/// `data` is skipped with a warning.
pub async fn seed_locations<C>(db: &C, data: &SeedData) -> Result<SeedOutcome<location::Model>>
where
    C: ConnectionTrait,
{
    let existing = Location::find().count(db).await?;
    if existing > 0 {
        info!("Locations already seeded ({existing} rows), skipping");
        let rows = Location::find()
            .order_by_asc(location::Column::Name)
            .all(db)
            .await?;
        return Ok(SeedOutcome::skipped(rows));
    }

    let all_tenants = tenants::get_all_tenants(db).await?;
    if all_tenants.is_empty() {
        warn!("No tenants found, locations were not seeded");
    }

    let mut created = Vec::new();
    for tenant in all_tenants {
        let Some(trees) = data.locations_for(&tenant.code) else {
            warn!("No location seed data for tenant {}, skipping", tenant.code);
            continue;
        };

        let mut writer = LocationWriter {
            db,
            tenant_id: tenant.id,
            created: Vec::new(),
        };
        for root in trees {
            seed_tree(&mut writer, root, None).await?;
        }

        info!("Seeded {} locations for tenant {}", writer.created.len(), tenant.code);
        created.append(&mut writer.created);
    }

    Ok(SeedOutcome::seeded(created))
}

/// Seeds tenants, then categories, then locations.
pub async fn seed_all<C>(db: &C, data: &SeedData) -> Result<SeedReport>
where
    C: ConnectionTrait,
{
    let tenants = seed_tenants(db, &data.tenants).await?;
    let categories = seed_categories(db, &data.categories).await?;
    let locations = seed_locations(db, data).await?;

    Ok(SeedReport {
        tenants,
        categories,
        locations,
    })
}

/// Seeds a single reference table.
pub async fn seed_only<C>(db: &C, data: &SeedData, target: SeedTarget) -> Result<SeedSummary>
where
    C: ConnectionTrait,
{
    let summary = match target {
        SeedTarget::Tenants => SeedSummary::new(target, &seed_tenants(db, &data.tenants).await?),
        SeedTarget::Categories => {
            SeedSummary::new(target, &seed_categories(db, &data.categories).await?)
        }
        SeedTarget::Locations => SeedSummary::new(target, &seed_locations(db, data).await?),
    };
    Ok(summary)
}

/// Purges `tables` and seeds everything again.
pub async fn reset(
    db: &DatabaseConnection,
    data: &SeedData,
    tables: &[String],
) -> Result<(purge::PurgeReport, SeedReport)> {
    let purged = purge::purge_tables(db, tables).await?;

    let after_purge = status(db).await?;
    if !after_purge.is_empty() {
        warn!("Reference tables not empty after purge: {after_purge:?}");
    }

    let seeded = seed_all(db, data).await?;
    Ok((purged, seeded))
}
