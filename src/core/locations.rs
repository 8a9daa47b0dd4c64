//! Location read queries.
//!
//! Each tenant owns a disjoint COUNTRY → REGION → CITY tree stored flat with
//! `parent_id` links. The queries here serve the flat list (with parent
//! summaries), the fixed-depth tree, the list with active job counts, and
//! single-node lookups by id or slug.

use crate::{
    core::{
        lookup::NodeKey,
        tree::{TREE_DEPTH, TreeNode, assemble_levels},
    },
    entities::{Job, JobStatus, Location, LocationType, job, location},
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, QuerySelect, prelude::*};
use serde::Serialize;
use std::collections::HashMap;

/// Identifying fields of a related location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationSummary {
    /// Location id
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Location slug
    pub slug: String,
    /// Tree level
    #[serde(rename = "type")]
    pub location_type: LocationType,
}

impl From<&location::Model> for LocationSummary {
    fn from(model: &location::Model) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
            slug: model.slug.clone(),
            location_type: model.location_type,
        }
    }
}

/// A row of the flat location list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationView {
    /// The location row
    #[serde(flatten)]
    pub location: location::Model,
    /// Immediate parent, `None` for countries
    pub parent: Option<LocationSummary>,
}

/// A location list row with the number of live jobs posted there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationWithJobCount {
    /// The list row
    #[serde(flatten)]
    pub location: LocationView,
    /// Active, unexpired jobs at this location
    pub job_count: u64,
}

/// A single location with one level of context in each direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationDetail {
    /// The location row
    #[serde(flatten)]
    pub location: location::Model,
    /// Immediate parent, `None` for countries
    pub parent: Option<LocationSummary>,
    /// Direct children, sorted by name
    pub children: Vec<LocationSummary>,
}

fn scoped(tenant_id: Option<Uuid>) -> sea_orm::Select<Location> {
    let query = Location::find();
    match tenant_id {
        Some(id) => query.filter(location::Column::TenantId.eq(id)),
        None => query,
    }
}

/// Lists locations sorted by name, optionally narrowed to one tenant and one type.
///
/// Each row carries its immediate parent's summary; deeper ancestry is not resolved.
pub async fn list_locations<C>(
    db: &C,
    tenant_id: Option<Uuid>,
    location_type: Option<LocationType>,
) -> Result<Vec<LocationView>>
where
    C: ConnectionTrait,
{
    let mut query = scoped(tenant_id);
    if let Some(location_type) = location_type {
        query = query.filter(location::Column::LocationType.eq(location_type));
    }

    let rows = query
        .find_also_linked(location::ParentLink)
        .order_by_asc(location::Column::Name)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(location, parent)| LocationView {
            parent: parent.as_ref().map(LocationSummary::from),
            location,
        })
        .collect())
}

/// Builds the location tree: top-level locations and two levels below them.
///
/// Locations deeper than that are not loaded and do not appear.
pub async fn location_tree<C>(
    db: &C,
    tenant_id: Option<Uuid>,
) -> Result<Vec<TreeNode<location::Model>>>
where
    C: ConnectionTrait,
{
    let roots = scoped(tenant_id)
        .filter(location::Column::ParentId.is_null())
        .order_by_asc(location::Column::Name)
        .all(db)
        .await?;

    let mut levels = vec![roots];
    while levels.len() < TREE_DEPTH {
        let parent_ids: Vec<Uuid> = levels
            .last()
            .map(|level| level.iter().map(|l| l.id).collect())
            .unwrap_or_default();
        if parent_ids.is_empty() {
            break;
        }

        let level = scoped(tenant_id)
            .filter(location::Column::ParentId.is_in(parent_ids))
            .order_by_asc(location::Column::Name)
            .all(db)
            .await?;
        levels.push(level);
    }

    Ok(assemble_levels(
        levels,
        |l: &location::Model| l.id,
        |l| l.parent_id,
    ))
}

/// Lists locations with the number of active, unexpired jobs in each.
pub async fn locations_with_job_counts<C>(
    db: &C,
    tenant_id: Option<Uuid>,
    location_type: Option<LocationType>,
) -> Result<Vec<LocationWithJobCount>>
where
    C: ConnectionTrait,
{
    locations_with_job_counts_at(db, tenant_id, location_type, Utc::now()).await
}

/// Like [`locations_with_job_counts`], treating `now` as the current time.
///
/// A job counts when its status is `active` and it expires after `now`.
/// Locations without such jobs report zero.
pub async fn locations_with_job_counts_at<C>(
    db: &C,
    tenant_id: Option<Uuid>,
    location_type: Option<LocationType>,
    now: DateTime<Utc>,
) -> Result<Vec<LocationWithJobCount>>
where
    C: ConnectionTrait,
{
    let mut counts_query = Job::find()
        .select_only()
        .column(job::Column::LocationId)
        .column_as(job::Column::Id.count(), "job_count")
        .filter(job::Column::LocationId.is_not_null())
        .filter(job::Column::Status.eq(JobStatus::Active))
        .filter(job::Column::ExpiresAt.gt(now));
    if let Some(id) = tenant_id {
        counts_query = counts_query.filter(job::Column::TenantId.eq(id));
    }

    let counts: HashMap<Uuid, i64> = counts_query
        .group_by(job::Column::LocationId)
        .into_tuple::<(Uuid, i64)>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let locations = list_locations(db, tenant_id, location_type).await?;
    Ok(locations
        .into_iter()
        .map(|location| {
            let job_count = counts
                .get(&location.location.id)
                .map_or(0, |&count| u64::try_from(count).unwrap_or(0));
            LocationWithJobCount {
                location,
                job_count,
            }
        })
        .collect())
}

/// Finds one location by id or slug, with its direct parent and children.
///
/// Returns `None` when nothing matches.
pub async fn find_location<C>(
    db: &C,
    tenant_id: Option<Uuid>,
    key: &NodeKey,
) -> Result<Option<LocationDetail>>
where
    C: ConnectionTrait,
{
    let lookup = match key {
        NodeKey::Id(id) => location::Column::Id.eq(*id),
        NodeKey::Slug(slug) => location::Column::Slug.eq(slug.as_str()),
    };
    let Some(found) = scoped(tenant_id).filter(lookup).one(db).await? else {
        return Ok(None);
    };

    let parent = match found.parent_id {
        Some(parent_id) => Location::find_by_id(parent_id).one(db).await?,
        None => None,
    };
    let children = Location::find()
        .filter(location::Column::ParentId.eq(found.id))
        .order_by_asc(location::Column::Name)
        .all(db)
        .await?;

    Ok(Some(LocationDetail {
        parent: parent.as_ref().map(LocationSummary::from),
        children: children.iter().map(LocationSummary::from).collect(),
        location: found,
    }))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{seeder, tenants};
    use crate::seed_data::SeedData;
    use crate::test_utils::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_list_locations_filters_by_tenant_and_type() -> Result<()> {
        let db = setup_test_db().await?;
        seeder::seed_all(&db, &SeedData::builtin()?).await?;
        let croatia = tenants::require_tenant(&db, "HR").await?;

        let all = list_locations(&db, Some(croatia.id), None).await?;
        assert_eq!(all.len(), 11);
        assert!(all.iter().all(|l| l.location.tenant_id == croatia.id));

        let cities = list_locations(&db, Some(croatia.id), Some(LocationType::City)).await?;
        let names: Vec<&str> = cities.iter().map(|c| c.location.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Makarska", "Opatija", "Osijek", "Rijeka", "Split", "Zagreb"]
        );

        let split = cities.iter().find(|c| c.location.slug == "split").unwrap();
        let parent = split.parent.as_ref().unwrap();
        assert_eq!(parent.slug, "splitsko-dalmatinska");
        assert_eq!(parent.location_type, LocationType::Region);

        let everywhere = list_locations(&db, None, Some(LocationType::Country)).await?;
        assert_eq!(everywhere.len(), 3);
        assert!(everywhere.iter().all(|c| c.parent.is_none()));
        Ok(())
    }

    #[tokio::test]
    async fn test_location_tree_shows_exactly_two_nested_levels() -> Result<()> {
        let db = setup_test_db().await?;
        let tenant = create_test_tenant(&db, "HR").await?;
        let country =
            create_test_location(&db, tenant.id, "croatia", LocationType::Country, None).await?;
        let region = create_test_location(
            &db,
            tenant.id,
            "grad-zagreb",
            LocationType::Region,
            Some(&country),
        )
        .await?;
        let city =
            create_test_location(&db, tenant.id, "zagreb", LocationType::City, Some(&region))
                .await?;
        // A fourth level that the tree must not show.
        create_test_location(&db, tenant.id, "tresnjevka", LocationType::City, Some(&city))
            .await?;

        let tree = location_tree(&db, Some(tenant.id)).await?;
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].node.slug, "croatia");
        assert_eq!(tree[0].depth(), 3);

        let zagreb = &tree[0].children[0].children[0];
        assert_eq!(zagreb.node.slug, "zagreb");
        assert!(zagreb.children.is_empty());

        let json = serde_json::to_value(&tree)?;
        assert_eq!(json[0]["children"][0]["children"][0]["type"], "CITY");
        Ok(())
    }

    #[tokio::test]
    async fn test_location_tree_is_per_tenant() -> Result<()> {
        let db = setup_test_db().await?;
        seeder::seed_all(&db, &SeedData::builtin()?).await?;
        let slovenia = tenants::require_tenant(&db, "SI").await?;

        let tree = location_tree(&db, Some(slovenia.id)).await?;
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].node.slug, "slovenia");
        let regions: Vec<&str> = tree[0].children.iter().map(|r| r.node.name.as_str()).collect();
        assert_eq!(regions, vec!["Obalno-kraška", "Osrednjeslovenska", "Podravska"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_job_counts_only_include_active_unexpired_jobs() -> Result<()> {
        let db = setup_test_db().await?;
        let tenant = create_test_tenant(&db, "HR").await?;
        let organization = create_test_organization(&db, tenant.id).await?;
        let zagreb =
            create_test_location(&db, tenant.id, "zagreb", LocationType::City, None).await?;
        create_test_location(&db, tenant.id, "split", LocationType::City, None).await?;

        let now = Utc::now();
        let next_week = Some(now + Duration::days(7));
        let yesterday = Some(now - Duration::days(1));
        create_test_job(&db, &organization, Some(zagreb.id), JobStatus::Active, next_week).await?;
        create_test_job(&db, &organization, Some(zagreb.id), JobStatus::Active, next_week).await?;
        create_test_job(&db, &organization, Some(zagreb.id), JobStatus::Active, yesterday).await?;
        create_test_job(&db, &organization, Some(zagreb.id), JobStatus::Draft, next_week).await?;
        create_test_job(&db, &organization, None, JobStatus::Active, next_week).await?;

        let counts = locations_with_job_counts_at(&db, Some(tenant.id), None, now).await?;
        let by_slug: HashMap<&str, u64> = counts
            .iter()
            .map(|c| (c.location.location.slug.as_str(), c.job_count))
            .collect();

        assert_eq!(counts.len(), 2);
        assert_eq!(by_slug["zagreb"], 2);
        assert_eq!(by_slug["split"], 0);

        let json = serde_json::to_value(&counts)?;
        assert!(json.as_array().unwrap().iter().all(|row| row["job_count"].is_u64()));
        Ok(())
    }

    #[tokio::test]
    async fn test_find_location_by_id_or_slug() -> Result<()> {
        let db = setup_test_db().await?;
        seeder::seed_all(&db, &SeedData::builtin()?).await?;
        let croatia = tenants::require_tenant(&db, "HR").await?;

        let region = find_location(&db, Some(croatia.id), &NodeKey::parse("primorsko-goranska"))
            .await?
            .unwrap();
        assert_eq!(region.location.location_type, LocationType::Region);
        assert_eq!(region.parent.as_ref().map(|p| p.slug.as_str()), Some("croatia"));
        let cities: Vec<&str> = region.children.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(cities, vec!["opatija", "rijeka"]);

        let by_id = find_location(&db, None, &NodeKey::parse(&region.location.id.to_string()))
            .await?
            .unwrap();
        assert_eq!(by_id.location.slug, "primorsko-goranska");

        assert!(
            find_location(&db, Some(croatia.id), &NodeKey::parse("atlantis"))
                .await?
                .is_none()
        );
        // Slovenian slug is not visible under the Croatian tenant
        assert!(
            find_location(&db, Some(croatia.id), &NodeKey::parse("ljubljana"))
                .await?
                .is_none()
        );
        Ok(())
    }
}
