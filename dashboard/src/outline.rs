use anyhow::{bail, Result};
use propdeck_common::models::outline::{
    ColumnVisibility, Outline, OutlineCreateRequest, OutlineUpdateRequest,
};

use crate::context::OrgContext;
use crate::facade::OrgApi;

/// Columns of the outline table that can be toggled
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum OutlineColumn {
    SectionType,
    Status,
    Target,
    Limit,
    Reviewer,
}

/// Controller for the outline table of the active organization.
///
/// Row order and column visibility are view state: they live here for the
/// session and are never written back to the backend.
#[derive(Default)]
pub struct OutlineTable {
    pub outlines: Vec<Outline>,
    pub columns: ColumnVisibility,
    pub loading: bool,
    /// Set when the user has no organization at all. The view shows an
    /// empty-state prompt instead of a table, and nothing is fetched.
    pub needs_organization: bool,
}

impl OutlineTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the outlines for the active organization.
    ///
    /// With no active selection but a non-empty organization list, the first
    /// organization is adopted. With no organizations at all the table goes
    /// into the needs-organization state without issuing a fetch.
    pub async fn activate(&mut self, api: &dyn OrgApi, ctx: &mut OrgContext) -> Result<()> {
        if ctx.active_org_id().is_none() {
            match ctx.organizations().first() {
                Some(first) => {
                    let (id, name) = (first.id.clone(), first.name.clone());
                    ctx.switch_organization(id, name);
                }
                None => {
                    self.needs_organization = true;
                    self.outlines.clear();
                    return Ok(());
                }
            }
        }
        self.needs_organization = false;

        let org_id = ctx
            .active_org_id()
            .map(str::to_string)
            .unwrap_or_default();

        self.loading = true;
        let outlines = api.list_outlines(&org_id).await;
        self.loading = false;
        self.outlines = outlines?;
        Ok(())
    }

    pub async fn create(
        &mut self,
        api: &dyn OrgApi,
        ctx: &OrgContext,
        req: OutlineCreateRequest,
    ) -> Result<&Outline> {
        let org_id = Self::active_org_id(ctx)?;

        let created = api.create_outline(&org_id, req).await?;
        self.outlines.push(created);
        Ok(self.outlines.last().unwrap())
    }

    /// Patch an outline on the backend and merge the confirmed change into
    /// the local row.
    pub async fn update(
        &mut self,
        api: &dyn OrgApi,
        ctx: &OrgContext,
        outline_id: &str,
        patch: OutlineUpdateRequest,
    ) -> Result<()> {
        let org_id = Self::active_org_id(ctx)?;
        let Some(index) = self
            .outlines
            .iter()
            .position(|outline| outline.id == outline_id)
        else {
            bail!("no outline with id '{outline_id}'");
        };

        api.update_outline(&org_id, outline_id, patch.clone()).await?;
        self.outlines[index].apply(&patch);
        Ok(())
    }

    pub async fn delete(
        &mut self,
        api: &dyn OrgApi,
        ctx: &OrgContext,
        outline_id: &str,
    ) -> Result<()> {
        let org_id = Self::active_org_id(ctx)?;

        api.delete_outline(&org_id, outline_id).await?;
        self.outlines.retain(|outline| outline.id != outline_id);
        Ok(())
    }

    /// Move the row at `from` so it sits at `to`, shifting the rows in
    /// between. Indices are zero-based positions in the current order.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.outlines.len();
        if from >= len || to >= len {
            bail!("row position out of range, the table has {len} rows");
        }
        if from == to {
            return Ok(());
        }

        let row = self.outlines.remove(from);
        self.outlines.insert(to, row);
        Ok(())
    }

    /// Flip a column's visibility, returning the new state
    pub fn toggle_column(&mut self, column: OutlineColumn) -> bool {
        let flag = match column {
            OutlineColumn::SectionType => &mut self.columns.section_type,
            OutlineColumn::Status => &mut self.columns.status,
            OutlineColumn::Target => &mut self.columns.target,
            OutlineColumn::Limit => &mut self.columns.limit,
            OutlineColumn::Reviewer => &mut self.columns.reviewer,
        };
        *flag = !*flag;
        *flag
    }

    fn active_org_id(ctx: &OrgContext) -> Result<String> {
        match ctx.active_org_id() {
            Some(id) => Ok(id.to_string()),
            None => bail!("no active organization"),
        }
    }
}

#[cfg(test)]
mod tests {
    use propdeck_common::models::outline::{OutlineStatus, SectionType};

    use super::*;

    fn outline(id: &str) -> Outline {
        Outline {
            id: id.to_string(),
            header: format!("Section {id}"),
            section_type: SectionType::Design,
            status: OutlineStatus::Pending,
            target: 3,
            limit: 6,
            reviewer: "Assim".to_string(),
            order: None,
        }
    }

    fn table_with(ids: &[&str]) -> OutlineTable {
        OutlineTable {
            outlines: ids.iter().map(|id| outline(id)).collect(),
            ..Default::default()
        }
    }

    fn order(table: &OutlineTable) -> Vec<&str> {
        table.outlines.iter().map(|o| o.id.as_str()).collect()
    }

    #[test]
    fn reorder_moves_a_row_and_shifts_the_rest() {
        let mut table = table_with(&["a", "b", "c", "d"]);

        table.reorder(0, 2).unwrap();
        assert_eq!(order(&table), vec!["b", "c", "a", "d"]);

        table.reorder(3, 0).unwrap();
        assert_eq!(order(&table), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn reorder_to_same_position_is_a_noop() {
        let mut table = table_with(&["a", "b", "c"]);
        table.reorder(1, 1).unwrap();
        assert_eq!(order(&table), vec!["a", "b", "c"]);
    }

    #[test]
    fn reorder_rejects_out_of_range_positions() {
        let mut table = table_with(&["a", "b"]);
        assert!(table.reorder(0, 2).is_err());
        assert!(table.reorder(5, 0).is_err());
        assert_eq!(order(&table), vec!["a", "b"]);
    }

    #[test]
    fn column_toggle_flips_and_reports_state() {
        let mut table = OutlineTable::new();
        // limit starts hidden, everything else visible
        assert!(!table.columns.limit);

        assert!(table.toggle_column(OutlineColumn::Limit));
        assert!(table.columns.limit);

        assert!(!table.toggle_column(OutlineColumn::Reviewer));
        assert!(!table.columns.reviewer);
    }

    #[test]
    fn column_names_parse_from_kebab_case() {
        assert_eq!(
            "section-type".parse::<OutlineColumn>().unwrap(),
            OutlineColumn::SectionType
        );
        assert!("sectiontype".parse::<OutlineColumn>().is_err());
    }
}
