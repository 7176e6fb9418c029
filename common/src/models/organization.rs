use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    /// Display name
    pub name: String,
    /// Human-readable identifier. Not guaranteed unique across time if regenerated.
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationCreateRequest {
    pub name: String,
    pub slug: String,
    /// The provider would otherwise activate the new organization in the
    /// server session as a side effect. Activation is handled explicitly.
    pub keep_current_active_organization: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveOrganizationRequest {
    pub organization_id: String,
}

/// Derive a slug from a display name: lowercased, whitespace runs become a
/// single dash, anything else outside `[a-z0-9_-]` is dropped.
///
/// "Acme Inc" -> "acme-inc"
pub fn derive_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            slug.push(c);
        }
    }
    slug
}

/// Keep exactly one entry per organization id, preserving first-seen order.
/// The provider has been observed returning the same organization twice.
pub fn dedup_organizations(organizations: Vec<Organization>) -> Vec<Organization> {
    let mut seen = HashSet::new();
    organizations
        .into_iter()
        .filter(|org| seen.insert(org.id.clone()))
        .collect()
}
