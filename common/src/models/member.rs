use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Admin,
    #[default]
    Member,
}

impl MemberRole {
    /// Whether this role may invite, remove, or change roles of members
    pub fn can_manage_members(&self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }

    /// Permission ordering: owner > admin > member
    pub fn outranks(&self, other: &Self) -> bool {
        self.rank() > other.rank()
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Owner => 2,
            Self::Admin => 1,
            Self::Member => 0,
        }
    }
}

/// Canonical member shape, after boundary normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub role: MemberRole,
}

/// Raw wire shape of a member entry. The provider represents the user id
/// under `userId` or `id` depending on the endpoint, and may nest email and
/// name under a `user` sub-object.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMember {
    user_id: Option<String>,
    id: Option<String>,
    role: Option<String>,
    email: Option<String>,
    name: Option<String>,
    user: Option<RawMemberUser>,
}

#[derive(Debug, Deserialize)]
struct RawMemberUser {
    email: Option<String>,
    name: Option<String>,
}

impl RawMember {
    /// An entry lacking both a string id and a string role is malformed and
    /// dropped. Unknown role strings default to `member`.
    fn canonicalize(self) -> Option<Member> {
        let user_id = self.user_id.or(self.id)?;
        let role_str = self.role?;
        let role = role_str.parse().unwrap_or_default();

        let nested_email = self.user.as_ref().and_then(|u| u.email.clone());
        let nested_name = self.user.as_ref().and_then(|u| u.name.clone());
        let email = self.email.or_else(|| nested_email.clone()).unwrap_or_default();
        let name = self
            .name
            .or(nested_name)
            .or(nested_email)
            .unwrap_or_else(|| "Unknown Member".to_string());

        Some(Member {
            user_id,
            email,
            name,
            role,
        })
    }
}

/// Decode a raw member-list response into canonical members.
///
/// Accepts either a bare array or an object with a `members` array.
/// Individual unparseable entries are dropped rather than failing the list,
/// and the result is deduplicated by `user_id` (first seen wins).
pub fn parse_member_list(value: serde_json::Value) -> Vec<Member> {
    let raw_entries = match value {
        serde_json::Value::Array(entries) => entries,
        serde_json::Value::Object(mut map) => match map.remove("members") {
            Some(serde_json::Value::Array(entries)) => entries,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    let mut seen = HashSet::new();
    raw_entries
        .into_iter()
        .filter_map(|entry| {
            let member = serde_json::from_value::<RawMember>(entry)
                .ok()
                .and_then(RawMember::canonicalize);
            if member.is_none() {
                debug!("dropping malformed member entry");
            }
            member
        })
        .filter(|member| seen.insert(member.user_id.clone()))
        .collect()
}

/// Decode the active-member-role response. The provider has been observed
/// returning `{"role": "..."}` as well as a bare role string.
pub fn parse_active_role(value: &serde_json::Value) -> Option<MemberRole> {
    let role = match value {
        serde_json::Value::String(role) => role.as_str(),
        serde_json::Value::Object(map) => map.get("role")?.as_str()?,
        _ => return None,
    };
    role.parse().ok()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveMemberRequest {
    /// The provider resolves the target by email at this boundary
    pub member_id_or_email: String,
    pub organization_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveOrganizationRequest {
    pub organization_id: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn role_ordering() {
        assert!(MemberRole::Owner.outranks(&MemberRole::Admin));
        assert!(MemberRole::Admin.outranks(&MemberRole::Member));
        assert!(!MemberRole::Member.outranks(&MemberRole::Member));
        assert!(MemberRole::Admin.can_manage_members());
        assert!(!MemberRole::Member.can_manage_members());
    }

    #[test]
    fn normalizes_field_name_variants() {
        let members = parse_member_list(json!([
            { "userId": "u1", "role": "owner", "email": "a@x.io", "name": "A" },
            { "id": "u2", "role": "member", "user": { "email": "b@x.io", "name": "B" } },
            { "id": "u3", "role": "member", "user": { "email": "c@x.io" } },
        ]));

        assert_eq!(members.len(), 3);
        assert_eq!(members[0].user_id, "u1");
        assert_eq!(members[0].role, MemberRole::Owner);
        assert_eq!(members[1].email, "b@x.io");
        assert_eq!(members[1].name, "B");
        // name falls back to the nested email
        assert_eq!(members[2].name, "c@x.io");
    }

    #[test]
    fn malformed_entries_are_dropped_not_fatal() {
        let members = parse_member_list(json!([
            { "userId": "u1", "role": "member" },
            { "email": "no-id@x.io" },
            { "userId": "u2" },
            42,
            { "userId": "u3", "role": "chief", "email": "c@x.io" },
        ]));

        assert_eq!(members.len(), 2);
        assert_eq!(members[0].user_id, "u1");
        // unknown role string defaults to member
        assert_eq!(members[1].role, MemberRole::Member);
        assert_eq!(members[0].name, "Unknown Member");
    }

    #[test]
    fn dedups_by_user_id_and_accepts_wrapped_lists() {
        let members = parse_member_list(json!({ "members": [
            { "userId": "u1", "role": "member", "email": "first@x.io" },
            { "userId": "u1", "role": "admin", "email": "dup@x.io" },
        ]}));

        assert_eq!(members.len(), 1);
        assert_eq!(members[0].email, "first@x.io");
    }

    #[test]
    fn active_role_shapes() {
        assert_eq!(
            parse_active_role(&json!({ "role": "admin" })),
            Some(MemberRole::Admin)
        );
        assert_eq!(parse_active_role(&json!("owner")), Some(MemberRole::Owner));
        assert_eq!(parse_active_role(&json!({ "user": {} })), None);
    }
}
