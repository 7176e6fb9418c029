use anyhow::{bail, Result};
use propdeck_common::models::organization::{derive_slug, Organization};
use tracing::debug;

use crate::context::OrgContext;
use crate::facade::OrgApi;

/// Fetch the organization list into the context and reconcile the active
/// selection against it.
pub async fn refresh_organizations(api: &dyn OrgApi, ctx: &mut OrgContext) -> Result<()> {
    let organizations = api.list_organizations().await?;
    ctx.set_organizations(organizations);
    reconcile_active(ctx);
    Ok(())
}

/// Clear a persisted selection that no longer matches any fetched
/// organization.
///
/// An empty list is not treated as evidence of staleness: it is what a
/// failed or not-yet-run fetch looks like, and clearing on it would wipe a
/// valid selection.
pub fn reconcile_active(ctx: &mut OrgContext) {
    if ctx.organizations().is_empty() {
        return;
    }
    let Some(active_id) = ctx.active_org_id() else {
        return;
    };
    if !ctx.organizations().iter().any(|org| org.id == active_id) {
        debug!(%active_id, "persisted organization no longer listed, clearing selection");
        ctx.clear_organization();
    }
}

/// Switch the session to an organization from the fetched list.
///
/// Deliberately does not touch the server-side session: activation is lazy,
/// and whoever next runs a role- or member-scoped fetch re-asserts the
/// active organization just in time.
pub fn switch_to(ctx: &mut OrgContext, org_id: &str) -> Result<()> {
    let Some(org) = ctx.organizations().iter().find(|org| org.id == org_id) else {
        bail!("no organization with id '{org_id}' in your organization list");
    };
    let (id, name) = (org.id.clone(), org.name.clone());

    ctx.switch_organization(id, name);
    Ok(())
}

/// Create an organization and make it the active one. When no slug is given
/// one is derived from the name.
pub async fn create_and_activate(
    api: &dyn OrgApi,
    ctx: &mut OrgContext,
    name: &str,
    slug: Option<&str>,
) -> Result<Organization> {
    let derived;
    let slug = match slug {
        Some(slug) => slug,
        None => {
            derived = derive_slug(name);
            derived.as_str()
        }
    };
    if slug.is_empty() {
        bail!("cannot derive a slug from '{name}', pass one explicitly");
    }

    let created = api.create_organization(name, slug).await?;

    let mut organizations = ctx.organizations().to_vec();
    organizations.push(created.clone());
    ctx.set_organizations(organizations);
    ctx.switch_organization(created.id.clone(), created.name.clone());

    Ok(created)
}
