//! Structural checks on seed definitions, run before anything is inserted.

use super::{CategorySeed, LocationSeed, SeedNode, TenantSeed, normalize_code};
use crate::entities::LocationType;
use crate::errors::{Error, Result};
use std::collections::HashSet;

fn invalid(message: String) -> Error {
    Error::SeedData { message }
}

pub(super) fn tenants(tenants: &[TenantSeed]) -> Result<()> {
    let mut codes = HashSet::new();
    for tenant in tenants {
        if tenant.code.trim().is_empty() {
            return Err(invalid(format!("Tenant {:?} has an empty code", tenant.name)));
        }
        if !codes.insert(normalize_code(&tenant.code)) {
            return Err(invalid(format!("Duplicate tenant code {}", tenant.code)));
        }
    }
    Ok(())
}

pub(super) fn categories(roots: &[CategorySeed]) -> Result<()> {
    unique_slugs("categories", roots, |c| &c.slug)
}

pub(super) fn locations(code: &str, roots: &[LocationSeed]) -> Result<()> {
    unique_slugs(code, roots, |l| &l.slug)?;

    if let Some(root) = roots
        .iter()
        .find(|root| root.location_type != LocationType::Country)
    {
        return Err(invalid(format!(
            "{code}: top-level location {} must be a COUNTRY, not {:?}",
            root.slug, root.location_type
        )));
    }

    // Each child must sit strictly one level below its parent.
    let mut stack: Vec<&LocationSeed> = roots.iter().collect();
    while let Some(node) = stack.pop() {
        for child in &node.children {
            if child.location_type.rank() != node.location_type.rank() + 1 {
                return Err(invalid(format!(
                    "{code}: location {} ({:?}) cannot be placed under {} ({:?})",
                    child.slug, child.location_type, node.slug, node.location_type
                )));
            }
            stack.push(child);
        }
    }
    Ok(())
}

/// Rejects empty slugs anywhere in the forest and duplicate slugs among siblings.
fn unique_slugs<N, F>(scope: &str, siblings: &[N], slug: F) -> Result<()>
where
    N: SeedNode,
    F: Fn(&N) -> &String + Copy,
{
    let mut seen = HashSet::new();
    for node in siblings {
        let value = slug(node);
        if value.trim().is_empty() {
            return Err(invalid(format!("{scope}: empty slug")));
        }
        if !seen.insert(value.as_str()) {
            return Err(invalid(format!("{scope}: duplicate slug {value}")));
        }
        unique_slugs(scope, node.children(), slug)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn location(slug: &str, location_type: LocationType, children: Vec<LocationSeed>) -> LocationSeed {
        LocationSeed {
            slug: slug.to_string(),
            name: slug.to_string(),
            location_type,
            children,
        }
    }

    #[test]
    fn test_location_hierarchy_must_descend_one_level() {
        let skip_region = vec![location(
            "croatia",
            LocationType::Country,
            vec![location("zagreb", LocationType::City, vec![])],
        )];
        assert!(locations("HR", &skip_region).is_err());

        let well_formed = vec![location(
            "croatia",
            LocationType::Country,
            vec![location(
                "grad-zagreb",
                LocationType::Region,
                vec![location("zagreb", LocationType::City, vec![])],
            )],
        )];
        assert!(locations("HR", &well_formed).is_ok());
    }

    #[test]
    fn test_location_roots_must_be_countries() {
        let city_root = vec![location("zagreb", LocationType::City, vec![])];
        assert!(locations("HR", &city_root).is_err());

        let region_root = vec![location(
            "grad-zagreb",
            LocationType::Region,
            vec![location("zagreb", LocationType::City, vec![])],
        )];
        assert!(locations("HR", &region_root).is_err());
    }

    #[test]
    fn test_duplicate_sibling_slugs_are_rejected() {
        let seed = |slug: &str| CategorySeed {
            slug: slug.to_string(),
            translations: BTreeMap::new(),
            children: vec![],
        };
        assert!(categories(&[seed("finance"), seed("finance")]).is_err());
        assert!(categories(&[seed("finance"), seed("")]).is_err());
        assert!(categories(&[seed("finance"), seed("healthcare")]).is_ok());
    }

    #[test]
    fn test_duplicate_tenant_codes_are_rejected() {
        let tenant = |code: &str| TenantSeed {
            code: code.to_string(),
            name: code.to_string(),
            domain: "example.test".to_string(),
            default_language: "en".to_string(),
            supported_languages: vec!["en".to_string()],
            currency: "EUR".to_string(),
            timezone: "UTC".to_string(),
            is_active: true,
        };
        assert!(tenants(&[tenant("HR"), tenant("HR")]).is_err());
        assert!(tenants(&[tenant("hr"), tenant("HR")]).is_err());
        assert!(tenants(&[tenant(" si"), tenant("SI ")]).is_err());
        assert!(tenants(&[tenant("HR"), tenant("SI")]).is_ok());
    }
}
