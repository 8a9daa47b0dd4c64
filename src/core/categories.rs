//! Category read queries.
//!
//! Categories are stored flat with a `parent_id` link and a separate
//! translation table. These functions rebuild the shapes the read API serves:
//! a flat list with parent summaries, a fixed-depth tree, and a single node
//! with its direct parent and children. Display names are resolved per
//! language with [`resolve_name`].

use crate::{
    core::{
        lookup::NodeKey,
        tree::{TREE_DEPTH, TreeNode, assemble_levels},
    },
    entities::{Category, CategoryTranslation, category, category_translation},
    errors::Result,
};
use sea_orm::{Condition, QueryOrder, prelude::*};
use serde::Serialize;
use std::collections::HashMap;

/// Language tried after the requested one.
pub const FALLBACK_LANGUAGE: &str = "en";

type NameStrategy = for<'a> fn(&'a [category_translation::Model], &str) -> Option<&'a str>;

/// Lookup strategies tried in order; the slug is the final fallback.
const NAME_STRATEGIES: [NameStrategy; 3] = [exact_language, fallback_language, first_available];

fn exact_language<'a>(
    translations: &'a [category_translation::Model],
    language: &str,
) -> Option<&'a str> {
    translations
        .iter()
        .find(|t| t.language == language)
        .map(|t| t.name.as_str())
}

fn fallback_language<'a>(
    translations: &'a [category_translation::Model],
    _language: &str,
) -> Option<&'a str> {
    exact_language(translations, FALLBACK_LANGUAGE)
}

fn first_available<'a>(
    translations: &'a [category_translation::Model],
    _language: &str,
) -> Option<&'a str> {
    translations.first().map(|t| t.name.as_str())
}

/// Picks the display name of a category for `language`.
///
/// Exact language match, then English, then the first translation, then the
/// slug for categories without any translation.
#[must_use]
pub fn resolve_name(
    translations: &[category_translation::Model],
    language: &str,
    slug: &str,
) -> String {
    NAME_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(translations, language))
        .unwrap_or(slug)
        .to_string()
}

/// Identifying fields of a related category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    /// Category id
    pub id: Uuid,
    /// Category slug
    pub slug: String,
    /// Name resolved for the requested language
    pub name: String,
}

/// A category with its resolved name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryNode {
    /// Category id
    pub id: Uuid,
    /// Category slug
    pub slug: String,
    /// Name resolved for the requested language
    pub name: String,
    /// Owning tenant, `None` for global categories
    pub tenant_id: Option<Uuid>,
    /// Parent category, `None` for top-level ones
    pub parent_id: Option<Uuid>,
}

/// A row of the flat category list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryView {
    /// The category itself
    #[serde(flatten)]
    pub category: CategoryNode,
    /// Immediate parent, if any
    pub parent: Option<CategorySummary>,
}

/// A single category with one level of context in each direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDetail {
    /// The category itself
    #[serde(flatten)]
    pub category: CategoryNode,
    /// Immediate parent, if any
    pub parent: Option<CategorySummary>,
    /// Direct children, sorted by slug
    pub children: Vec<CategorySummary>,
}

/// Translations of the given categories, grouped by category and ordered by language.
struct Names {
    by_category: HashMap<Uuid, Vec<category_translation::Model>>,
    language: String,
}

impl Names {
    async fn load<C>(db: &C, ids: Vec<Uuid>, language: &str) -> Result<Self>
    where
        C: ConnectionTrait,
    {
        let mut by_category: HashMap<Uuid, Vec<category_translation::Model>> = HashMap::new();
        if !ids.is_empty() {
            let rows = CategoryTranslation::find()
                .filter(category_translation::Column::CategoryId.is_in(ids))
                .order_by_asc(category_translation::Column::Language)
                .all(db)
                .await?;
            for row in rows {
                by_category.entry(row.category_id).or_default().push(row);
            }
        }

        Ok(Self {
            by_category,
            language: language.to_string(),
        })
    }

    fn name(&self, category: &category::Model) -> String {
        let translations = self
            .by_category
            .get(&category.id)
            .map_or(&[][..], Vec::as_slice);
        resolve_name(translations, &self.language, &category.slug)
    }

    fn node(&self, category: &category::Model) -> CategoryNode {
        CategoryNode {
            id: category.id,
            slug: category.slug.clone(),
            name: self.name(category),
            tenant_id: category.tenant_id,
            parent_id: category.parent_id,
        }
    }

    fn summary(&self, category: &category::Model) -> CategorySummary {
        CategorySummary {
            id: category.id,
            slug: category.slug.clone(),
            name: self.name(category),
        }
    }
}

/// Global categories, plus the tenant's own when `tenant_id` is given.
fn tenant_scope(tenant_id: Option<Uuid>) -> Condition {
    let global = category::Column::TenantId.is_null();
    match tenant_id {
        Some(id) => Condition::any()
            .add(global)
            .add(category::Column::TenantId.eq(id)),
        None => Condition::all().add(global),
    }
}

/// Lists categories sorted by slug, each with its immediate parent's summary.
pub async fn list_categories<C>(
    db: &C,
    tenant_id: Option<Uuid>,
    language: &str,
) -> Result<Vec<CategoryView>>
where
    C: ConnectionTrait,
{
    let rows = Category::find()
        .filter(tenant_scope(tenant_id))
        .find_also_linked(category::ParentLink)
        .order_by_asc(category::Column::Slug)
        .all(db)
        .await?;

    let ids = rows
        .iter()
        .flat_map(|(row, parent)| std::iter::once(row.id).chain(parent.as_ref().map(|p| p.id)))
        .collect();
    let names = Names::load(db, ids, language).await?;

    Ok(rows
        .iter()
        .map(|(row, parent)| CategoryView {
            category: names.node(row),
            parent: parent.as_ref().map(|p| names.summary(p)),
        })
        .collect())
}

/// Builds the category tree: top-level categories and two levels below them.
///
/// Rows deeper than that are not loaded and do not appear.
pub async fn category_tree<C>(
    db: &C,
    tenant_id: Option<Uuid>,
    language: &str,
) -> Result<Vec<TreeNode<CategoryNode>>>
where
    C: ConnectionTrait,
{
    let roots = Category::find()
        .filter(tenant_scope(tenant_id))
        .filter(category::Column::ParentId.is_null())
        .order_by_asc(category::Column::Slug)
        .all(db)
        .await?;

    let mut levels = vec![roots];
    while levels.len() < TREE_DEPTH {
        let parent_ids: Vec<Uuid> = levels
            .last()
            .map(|level| level.iter().map(|c| c.id).collect())
            .unwrap_or_default();
        if parent_ids.is_empty() {
            break;
        }

        let level = Category::find()
            .filter(tenant_scope(tenant_id))
            .filter(category::Column::ParentId.is_in(parent_ids))
            .order_by_asc(category::Column::Slug)
            .all(db)
            .await?;
        levels.push(level);
    }

    let ids = levels.iter().flatten().map(|c| c.id).collect();
    let names = Names::load(db, ids, language).await?;

    let nodes: Vec<Vec<CategoryNode>> = levels
        .iter()
        .map(|level| level.iter().map(|c| names.node(c)).collect())
        .collect();
    Ok(assemble_levels(nodes, |n: &CategoryNode| n.id, |n| n.parent_id))
}

/// Finds one category by id or slug, with its direct parent and children.
///
/// Returns `None` when nothing matches.
pub async fn find_category<C>(
    db: &C,
    tenant_id: Option<Uuid>,
    key: &NodeKey,
    language: &str,
) -> Result<Option<CategoryDetail>>
where
    C: ConnectionTrait,
{
    let lookup = match key {
        NodeKey::Id(id) => category::Column::Id.eq(*id),
        NodeKey::Slug(slug) => category::Column::Slug.eq(slug.as_str()),
    };
    let Some(found) = Category::find()
        .filter(tenant_scope(tenant_id))
        .filter(lookup)
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let parent = match found.parent_id {
        Some(parent_id) => Category::find_by_id(parent_id).one(db).await?,
        None => None,
    };
    let children = Category::find()
        .filter(category::Column::ParentId.eq(found.id))
        .order_by_asc(category::Column::Slug)
        .all(db)
        .await?;

    let ids = std::iter::once(found.id)
        .chain(parent.iter().map(|p| p.id))
        .chain(children.iter().map(|c| c.id))
        .collect();
    let names = Names::load(db, ids, language).await?;

    Ok(Some(CategoryDetail {
        category: names.node(&found),
        parent: parent.as_ref().map(|p| names.summary(p)),
        children: children.iter().map(|c| names.summary(c)).collect(),
    }))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::seeder;
    use crate::seed_data::SeedData;
    use crate::test_utils::*;

    fn translation(language: &str, name: &str) -> category_translation::Model {
        category_translation::Model {
            id: Uuid::new_v4(),
            category_id: Uuid::nil(),
            language: language.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_resolve_name_fallback_chain() {
        let both = vec![translation("en", "Tech"), translation("hr", "Tehnologija")];
        assert_eq!(resolve_name(&both, "hr", "tech"), "Tehnologija");
        assert_eq!(resolve_name(&both, "sl", "tech"), "Tech");

        let croatian_only = vec![translation("hr", "Tehnologija")];
        assert_eq!(resolve_name(&croatian_only, "fr", "tech"), "Tehnologija");

        assert_eq!(resolve_name(&[], "fr", "tech"), "tech");
    }

    #[tokio::test]
    async fn test_list_categories_attaches_parent_summary() -> Result<()> {
        let db = setup_test_db().await?;
        seeder::seed_all(&db, &SeedData::builtin()?).await?;

        let list = list_categories(&db, None, "hr").await?;
        assert_eq!(list.len(), 16);

        let slugs: Vec<&str> = list.iter().map(|c| c.category.slug.as_str()).collect();
        let mut sorted = slugs.clone();
        sorted.sort_unstable();
        assert_eq!(slugs, sorted);

        let banking = list.iter().find(|c| c.category.slug == "banking").unwrap();
        assert_eq!(banking.category.name, "Bankarstvo");
        let parent = banking.parent.as_ref().unwrap();
        assert_eq!(parent.slug, "finance");
        assert_eq!(parent.name, "Financije i računovodstvo");

        let finance = list.iter().find(|c| c.category.slug == "finance").unwrap();
        assert!(finance.parent.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_tenant_categories_only_visible_to_their_tenant() -> Result<()> {
        let db = setup_test_db().await?;
        let croatia = create_test_tenant(&db, "HR").await?;
        let slovenia = create_test_tenant(&db, "SI").await?;
        create_test_category(&db, "global", None, None, &[("en", "Global")]).await?;
        create_test_category(&db, "local", Some(croatia.id), None, &[]).await?;

        let global_only = list_categories(&db, None, "en").await?;
        assert_eq!(global_only.len(), 1);

        let for_croatia = list_categories(&db, Some(croatia.id), "en").await?;
        let names: Vec<&str> = for_croatia.iter().map(|c| c.category.name.as_str()).collect();
        assert_eq!(names, vec!["Global", "local"]);

        let for_slovenia = list_categories(&db, Some(slovenia.id), "en").await?;
        assert_eq!(for_slovenia.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_category_tree_is_limited_to_three_levels() -> Result<()> {
        let db = setup_test_db().await?;
        let root = create_test_category(&db, "tech", None, None, &[("en", "Tech")]).await?;
        let child = create_test_category(&db, "software", None, Some(root.id), &[]).await?;
        let grandchild = create_test_category(&db, "backend", None, Some(child.id), &[]).await?;
        create_test_category(&db, "rust", None, Some(grandchild.id), &[]).await?;

        let tree = category_tree(&db, None, "en").await?;
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].node.name, "Tech");
        assert_eq!(tree[0].depth(), 3);

        let leaf = &tree[0].children[0].children[0];
        assert_eq!(leaf.node.slug, "backend");
        assert!(leaf.children.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_find_category_by_slug_and_id() -> Result<()> {
        let db = setup_test_db().await?;
        seeder::seed_all(&db, &SeedData::builtin()?).await?;

        let by_slug = find_category(&db, None, &NodeKey::parse("finance"), "sl")
            .await?
            .unwrap();
        assert_eq!(by_slug.category.name, "Finance in računovodstvo");
        assert!(by_slug.parent.is_none());
        let children: Vec<&str> = by_slug.children.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(children, vec!["accounting", "banking"]);

        let child_id = by_slug.children[0].id;
        let by_id = find_category(&db, None, &NodeKey::parse(&child_id.to_string()), "en")
            .await?
            .unwrap();
        assert_eq!(by_id.category.slug, "accounting");
        assert_eq!(by_id.parent.map(|p| p.slug), Some("finance".to_string()));
        assert!(by_id.children.is_empty());

        assert!(
            find_category(&db, None, &NodeKey::parse("no-such-category"), "en")
                .await?
                .is_none()
        );
        Ok(())
    }
}
