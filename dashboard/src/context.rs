use propdeck_common::models::organization::Organization;

use crate::config::Selector;

/// Session-wide organization state: which organizations the user can see and
/// which one is active. Changes to the active selection flow through the
/// [`Selector`] so they survive restarts.
pub struct OrgContext {
    selector: Selector,
    active_org_id: Option<String>,
    active_org_name: Option<String>,
    organizations: Vec<Organization>,
}

impl OrgContext {
    /// Adopts whatever selection the selector carried. The list of
    /// organizations starts empty until the first refresh.
    pub fn new(selector: Selector) -> Self {
        let active_org_id = selector.active_org_id().map(str::to_string);
        let active_org_name = selector.active_org_name().map(str::to_string);
        Self {
            selector,
            active_org_id,
            active_org_name,
            organizations: Vec::new(),
        }
    }

    pub fn active_org_id(&self) -> Option<&str> {
        self.active_org_id.as_deref()
    }

    pub fn active_org_name(&self) -> Option<&str> {
        self.active_org_name.as_deref()
    }

    pub fn organizations(&self) -> &[Organization] {
        &self.organizations
    }

    pub fn set_organizations(&mut self, organizations: Vec<Organization>) {
        self.organizations = organizations;
    }

    /// Update the active id on its own. `None` clears the persisted slot.
    /// Callers changing both id and name should use
    /// [`switch_organization`](Self::switch_organization), which keeps them
    /// consistent.
    pub fn set_active_org_id(&mut self, id: Option<String>) {
        self.active_org_id = id.clone();
        self.selector.set_active_org_id(id);
    }

    /// Update the active display name on its own. `None` clears the
    /// persisted slot.
    pub fn set_active_org_name(&mut self, name: Option<String>) {
        self.active_org_name = name.clone();
        self.selector.set_active_org_name(name);
    }

    /// Make an organization active, remembering it for future sessions
    pub fn switch_organization(&mut self, id: String, name: String) {
        self.active_org_id = Some(id.clone());
        self.active_org_name = Some(name.clone());
        self.selector.remember(id, name);
    }

    /// Drop the active selection, both in memory and in the selector
    pub fn clear_organization(&mut self) {
        self.active_org_id = None;
        self.active_org_name = None;
        self.selector.clear();
    }

    /// Display name for the active organization. Prefers the fetched list
    /// over the cached name, since the list is fresher.
    pub fn active_org_display_name(&self) -> Option<&str> {
        let id = self.active_org_id.as_deref()?;
        self.organizations
            .iter()
            .find(|org| org.id == id)
            .map(|org| org.name.as_str())
            .or(self.active_org_name.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn org(id: &str, name: &str) -> Organization {
        Organization {
            id: id.to_string(),
            name: name.to_string(),
            slug: name.to_lowercase(),
        }
    }

    #[test]
    fn adopts_persisted_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut selector = Selector::at_dir(dir.path());
        selector.remember("org_1".to_string(), "Acme Inc".to_string());

        let ctx = OrgContext::new(Selector::at_dir(dir.path()));
        assert_eq!(ctx.active_org_id(), Some("org_1"));
        assert_eq!(ctx.active_org_name(), Some("Acme Inc"));
    }

    #[test]
    fn switch_persists_and_clear_erases() {
        let dir = tempfile::tempdir().unwrap();

        let mut ctx = OrgContext::new(Selector::at_dir(dir.path()));
        ctx.switch_organization("org_2".to_string(), "Beta".to_string());
        assert_eq!(
            OrgContext::new(Selector::at_dir(dir.path())).active_org_id(),
            Some("org_2")
        );

        ctx.clear_organization();
        assert_eq!(
            OrgContext::new(Selector::at_dir(dir.path())).active_org_id(),
            None
        );
    }

    #[test]
    fn display_name_prefers_the_fetched_list() {
        let mut ctx = OrgContext::new(Selector::in_memory());
        ctx.switch_organization("org_1".to_string(), "Old Name".to_string());
        ctx.set_organizations(vec![org("org_1", "New Name")]);

        assert_eq!(ctx.active_org_display_name(), Some("New Name"));
    }
}
