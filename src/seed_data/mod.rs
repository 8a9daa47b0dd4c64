//! Seed data definitions for the reference tables.
//!
//! The built-in definitions are TOML documents compiled into the binary. A
//! directory with the same three files (`tenants.toml`, `categories.toml`,
//! `locations.toml`) can replace them at runtime via the `seed_dir` setting.

mod validate;

use crate::entities::LocationType;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const TENANTS_TOML: &str = include_str!("../../seed/tenants.toml");
const CATEGORIES_TOML: &str = include_str!("../../seed/categories.toml");
const LOCATIONS_TOML: &str = include_str!("../../seed/locations.toml");

/// A node of a nested seed definition.
pub trait SeedNode: Sized {
    /// Direct children of this node, in insertion order.
    fn children(&self) -> &[Self];
}

/// Seed definition for a tenant
#[derive(Debug, Clone, Deserialize)]
pub struct TenantSeed {
    /// Tenant code, also the key of the tenant's location bucket.
    /// Normalised with [`normalize_code`] when parsed.
    pub code: String,
    /// Display name
    pub name: String,
    /// Host name the tenant's site is served on
    pub domain: String,
    /// Language used when a request names none
    pub default_language: String,
    /// Languages the tenant's site offers
    pub supported_languages: Vec<String>,
    /// ISO 4217 currency code
    pub currency: String,
    /// IANA time zone name
    pub timezone: String,
    /// Defaults to `true`
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

/// Seed definition for a category and its subcategories
#[derive(Debug, Clone, Deserialize)]
pub struct CategorySeed {
    /// URL-safe identifier, unique among siblings
    pub slug: String,
    /// Display name per language code
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
    /// Subcategories
    #[serde(default)]
    pub children: Vec<CategorySeed>,
}

impl SeedNode for CategorySeed {
    fn children(&self) -> &[Self] {
        &self.children
    }
}

/// Seed definition for a location and the locations below it
#[derive(Debug, Clone, Deserialize)]
pub struct LocationSeed {
    /// URL-safe identifier, unique among siblings
    pub slug: String,
    /// Display name
    pub name: String,
    /// Level in the tree, one below the parent's
    #[serde(rename = "type")]
    pub location_type: LocationType,
    /// Locations one level below
    #[serde(default)]
    pub children: Vec<LocationSeed>,
}

impl SeedNode for LocationSeed {
    fn children(&self) -> &[Self] {
        &self.children
    }
}

#[derive(Debug, Deserialize)]
struct TenantsFile {
    tenants: Vec<TenantSeed>,
}

#[derive(Debug, Deserialize)]
struct CategoriesFile {
    categories: Vec<CategorySeed>,
}

/// The complete set of reference data the seeder inserts.
#[derive(Debug, Clone)]
pub struct SeedData {
    /// Tenants, in insertion order
    pub tenants: Vec<TenantSeed>,
    /// Global category trees
    pub categories: Vec<CategorySeed>,
    /// Location trees keyed by tenant code
    pub locations: BTreeMap<String, Vec<LocationSeed>>,
}

impl SeedData {
    /// Parses the definitions compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::parse(TENANTS_TOML, CATEGORIES_TOML, LOCATIONS_TOML)
    }

    /// Reads `tenants.toml`, `categories.toml` and `locations.toml` from `dir`.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path).map_err(|e| Error::SeedData {
                message: format!("Failed to read {path:?}: {e}"),
            })
        };
        Self::parse(
            &read("tenants.toml")?,
            &read("categories.toml")?,
            &read("locations.toml")?,
        )
    }

    /// Parses and validates the three seed documents.
    pub fn parse(tenants: &str, categories: &str, locations: &str) -> Result<Self> {
        let tenants: TenantsFile = parse_document("tenants", tenants)?;
        let categories: CategoriesFile = parse_document("categories", categories)?;
        let raw_locations: BTreeMap<String, Vec<LocationSeed>> =
            parse_document("locations", locations)?;

        let mut locations = BTreeMap::new();
        for (key, trees) in raw_locations {
            let code = normalize_code(&key);
            if locations.insert(code.clone(), trees).is_some() {
                return Err(Error::SeedData {
                    message: format!("Duplicate location bucket for tenant {code}"),
                });
            }
        }

        let mut tenants = tenants.tenants;
        for tenant in &mut tenants {
            tenant.code = normalize_code(&tenant.code);
        }

        let data = Self {
            tenants,
            categories: categories.categories,
            locations,
        };
        data.validate()?;
        Ok(data)
    }

    /// Checks the structural rules the database schema does not enforce.
    pub fn validate(&self) -> Result<()> {
        validate::tenants(&self.tenants)?;
        validate::categories(&self.categories)?;
        for (code, trees) in &self.locations {
            validate::locations(code, trees)?;
        }
        Ok(())
    }

    /// The location trees seeded for the tenant with `code`, if any.
    #[must_use]
    pub fn locations_for(&self, code: &str) -> Option<&[LocationSeed]> {
        self.locations.get(&normalize_code(code)).map(Vec::as_slice)
    }
}

/// Canonical form of a tenant code: trimmed and upper-case.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

fn parse_document<T: serde::de::DeserializeOwned>(name: &str, contents: &str) -> Result<T> {
    toml::from_str(contents).map_err(|e| Error::SeedData {
        message: format!("Failed to parse {name} seed data: {e}"),
    })
}

/// Counts every node in a forest of seed trees.
#[must_use]
pub fn count_nodes<N: SeedNode>(roots: &[N]) -> usize {
    roots
        .iter()
        .map(|root| 1 + count_nodes(root.children()))
        .sum()
}
