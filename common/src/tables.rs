use chrono::{DateTime, Local, SecondsFormat};
use comfy_table::{
    presets::{NOTHING, UTF8_BORDERS_ONLY},
    Attribute, Cell, Color, ContentArrangement, Table,
};

use crate::models::{
    invitation::Invitation,
    member::Member,
    organization::Organization,
    outline::{ColumnVisibility, Outline, OutlineStatus},
};

fn base_table(raw: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(if raw { NOTHING } else { UTF8_BORDERS_ONLY })
        .set_content_arrangement(ContentArrangement::Disabled);
    table
}

fn date_cell(timestamp: &DateTime<chrono::Utc>) -> Cell {
    let local: DateTime<Local> = DateTime::from(*timestamp);
    Cell::new(local.to_rfc3339_opts(SecondsFormat::Secs, false))
}

pub fn organizations_table(organizations: &[Organization], active_id: Option<&str>, raw: bool) -> String {
    let mut table = base_table(raw);
    table.set_header(vec!["Organization ID", "Name", "Slug", ""]);

    for org in organizations {
        let marker = if active_id == Some(org.id.as_str()) {
            "active"
        } else {
            ""
        };
        table.add_row(vec![
            Cell::new(&org.id).add_attribute(Attribute::Bold),
            Cell::new(&org.name),
            Cell::new(&org.slug),
            Cell::new(marker).fg(Color::Green),
        ]);
    }

    table.to_string()
}

pub fn members_table(members: &[Member], raw: bool) -> String {
    let mut table = base_table(raw);
    table.set_header(vec!["User ID", "Name", "Email", "Role"]);

    for member in members {
        table.add_row(vec![
            Cell::new(&member.user_id).add_attribute(Attribute::Bold),
            Cell::new(&member.name),
            Cell::new(&member.email),
            Cell::new(member.role),
        ]);
    }

    table.to_string()
}

pub fn invitations_table(invitations: &[Invitation], received: bool, raw: bool) -> String {
    let mut table = base_table(raw);
    if received {
        table.set_header(vec!["Invitation ID", "Organization", "Role", "Sent"]);
    } else {
        table.set_header(vec!["Invitation ID", "Email", "Role", "Sent"]);
    }

    for invitation in invitations {
        let second = if received {
            invitation
                .organization_name
                .clone()
                .unwrap_or_else(|| invitation.organization_id.clone())
        } else {
            invitation.email.clone()
        };
        table.add_row(vec![
            Cell::new(&invitation.id).add_attribute(Attribute::Bold),
            Cell::new(second),
            Cell::new(&invitation.role),
            date_cell(&invitation.created_at),
        ]);
    }

    table.to_string()
}

pub fn outlines_table(outlines: &[Outline], columns: &ColumnVisibility, raw: bool) -> String {
    let mut table = base_table(raw);

    let mut header = vec!["#", "Header"];
    if columns.section_type {
        header.push("Type");
    }
    if columns.status {
        header.push("Status");
    }
    if columns.target {
        header.push("Target");
    }
    if columns.limit {
        header.push("Limit");
    }
    if columns.reviewer {
        header.push("Reviewer");
    }
    table.set_header(header);

    for (position, outline) in outlines.iter().enumerate() {
        let mut row = vec![
            Cell::new(position + 1),
            Cell::new(&outline.header).add_attribute(Attribute::Bold),
        ];
        if columns.section_type {
            row.push(Cell::new(outline.section_type));
        }
        if columns.status {
            let color = match outline.status {
                OutlineStatus::Completed => Color::Green,
                OutlineStatus::InProgress => Color::Yellow,
                OutlineStatus::Pending => Color::Grey,
            };
            row.push(Cell::new(outline.status).fg(color));
        }
        if columns.target {
            row.push(Cell::new(outline.target));
        }
        if columns.limit {
            row.push(Cell::new(outline.limit));
        }
        if columns.reviewer {
            row.push(Cell::new(&outline.reviewer));
        }
        table.add_row(row);
    }

    table.to_string()
}
