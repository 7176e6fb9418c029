use anyhow::{bail, Result};
use propdeck_common::models::{
    invitation::{pending_only, Invitation},
    member::{Member, MemberRole},
};
use tracing::warn;

use crate::context::OrgContext;
use crate::facade::OrgApi;
use crate::notify::Notifier;

/// Everything the team view shows for the active organization
#[derive(Debug, Default, Clone)]
pub struct TeamState {
    pub organization_name: Option<String>,
    /// The signed-in user's role in the active organization. `None` until an
    /// activation resolves it, and role-gated mutations stay denied while it
    /// is unknown.
    pub current_role: Option<MemberRole>,
    pub members: Vec<Member>,
    /// Pending invitations sent by the organization
    pub sent_invitations: Vec<Invitation>,
    /// Pending invitations received by the current user, across organizations
    pub received_invitations: Vec<Invitation>,
    pub loading: bool,
}

/// Keeps [`TeamState`] in sync with the active organization and applies
/// membership mutations, enforcing the role gates before anything reaches
/// the backend.
pub struct TeamReconciler<'a> {
    api: &'a dyn OrgApi,
    notifier: &'a dyn Notifier,
    current_user_id: String,
    pub state: TeamState,
}

impl<'a> TeamReconciler<'a> {
    pub fn new(api: &'a dyn OrgApi, notifier: &'a dyn Notifier, current_user_id: String) -> Self {
        Self {
            api,
            notifier,
            current_user_id,
            state: TeamState::default(),
        }
    }

    /// Rebuild the team state for the context's active organization.
    ///
    /// Activations take `&mut self`, so they run one at a time and each one
    /// replaces the whole state. Each fetch fails in isolation, a broken
    /// sibling never blanks the others.
    pub async fn activate(&mut self, ctx: &OrgContext) -> Result<()> {
        let Some(org_id) = ctx.active_org_id().map(str::to_string) else {
            self.state = TeamState::default();
            return Ok(());
        };

        self.state.loading = true;

        // Role and member queries are scoped to the server session's active
        // organization, so align it before fetching.
        if let Err(error) = self.api.set_active_organization(&org_id).await {
            warn!(%error, "could not update the server-side active organization");
        }

        let (role, members, sent, received) = tokio::join!(
            self.api.get_active_member_role(),
            self.api.list_members(&org_id),
            self.api.list_invitations(&org_id),
            self.api.list_user_invitations(),
        );

        self.state.current_role = match role {
            Ok(role) => Some(role),
            Err(error) => {
                warn!(%error, "could not resolve the current member role");
                None
            }
        };

        self.state.members = match members {
            Ok(members) => members,
            Err(error) => {
                warn!(%error, "member list fetch failed");
                self.notifier.error("Failed to load members");
                Vec::new()
            }
        };

        self.state.sent_invitations = match sent {
            Ok(invitations) => pending_only(&invitations),
            Err(error) => {
                warn!(%error, "sent-invitation fetch failed");
                Vec::new()
            }
        };

        self.state.received_invitations = match received {
            Ok(invitations) => pending_only(&invitations),
            Err(error) => {
                warn!(%error, "received-invitation fetch failed");
                Vec::new()
            }
        };

        self.state.organization_name = ctx.active_org_display_name().map(str::to_string);
        self.state.loading = false;

        Ok(())
    }

    fn manage_role(&self) -> Result<MemberRole> {
        match self.state.current_role {
            Some(role) if role.can_manage_members() => Ok(role),
            _ => bail!("only owners and admins can manage members"),
        }
    }

    fn active_org_id(ctx: &OrgContext) -> Result<String> {
        match ctx.active_org_id() {
            Some(id) => Ok(id.to_string()),
            None => bail!("no active organization"),
        }
    }

    /// Re-assert the server-side active organization right before a
    /// mutation. A concurrent session may have switched it since activation.
    async fn reassert_active(&self, org_id: &str) {
        if let Err(error) = self.api.set_active_organization(org_id).await {
            warn!(%error, "could not re-assert the active organization");
        }
    }

    pub async fn invite(&mut self, ctx: &OrgContext, email: &str, role: MemberRole) -> Result<()> {
        let current = self.manage_role()?;
        if role == MemberRole::Owner && current != MemberRole::Owner {
            bail!("only the owner can grant the owner role");
        }
        let org_id = Self::active_org_id(ctx)?;
        self.reassert_active(&org_id).await;

        let invitation = self.api.invite_member(&org_id, email, role).await?;
        self.state.sent_invitations.push(invitation);
        self.notifier.success(&format!("Invitation sent to {email}"));
        Ok(())
    }

    pub async fn cancel_invitation(&mut self, ctx: &OrgContext, invitation_id: &str) -> Result<()> {
        self.manage_role()?;
        let org_id = Self::active_org_id(ctx)?;
        self.reassert_active(&org_id).await;

        self.api.cancel_invitation(invitation_id).await?;
        self.state
            .sent_invitations
            .retain(|invitation| invitation.id != invitation_id);
        self.notifier.success("Invitation cancelled");
        Ok(())
    }

    /// Remove a member, identified by user id. The gates mirror what the
    /// backend enforces so a denied action never leaves the client.
    pub async fn remove_member(&mut self, ctx: &OrgContext, user_id: &str) -> Result<()> {
        let current = self.manage_role()?;

        let Some(target) = self
            .state
            .members
            .iter()
            .find(|member| member.user_id == user_id)
        else {
            bail!("no member with user id '{user_id}' in this organization");
        };

        if target.user_id == self.current_user_id {
            bail!("you cannot remove yourself, leave the organization instead");
        }
        if target.role == MemberRole::Owner {
            bail!("the owner cannot be removed");
        }
        if !current.outranks(&target.role) {
            bail!("your role does not allow removing a {}", target.role);
        }

        let org_id = Self::active_org_id(ctx)?;
        let email = target.email.clone();
        self.reassert_active(&org_id).await;

        self.api.remove_member(&email, &org_id).await?;
        self.state.members.retain(|member| member.user_id != user_id);
        self.notifier.success(&format!("Removed {email}"));
        Ok(())
    }

    /// Change a member's displayed role.
    ///
    /// The provider's update endpoint does not apply role changes under this
    /// auth configuration, so the change is reflected locally and lasts
    /// until the next activation.
    pub fn update_role(&mut self, user_id: &str, role: MemberRole) -> Result<()> {
        let current = self.manage_role()?;
        if role == MemberRole::Owner && current != MemberRole::Owner {
            bail!("only the owner can grant the owner role");
        }

        let Some(target) = self
            .state
            .members
            .iter_mut()
            .find(|member| member.user_id == user_id)
        else {
            bail!("no member with user id '{user_id}' in this organization");
        };
        if target.user_id == self.current_user_id {
            bail!("you cannot change your own role");
        }
        if target.role == MemberRole::Owner {
            bail!("the owner's role cannot be changed");
        }
        if !current.outranks(&target.role) {
            bail!("your role does not allow changing a {}'s role", target.role);
        }

        target.role = role;
        self.notifier
            .success(&format!("Role for {} set to {role}", target.email));
        Ok(())
    }

    /// Accept a received invitation and switch the session into its
    /// organization. The caller is expected to re-activate afterwards so the
    /// whole view reloads against the new organization.
    pub async fn accept_invitation(
        &mut self,
        ctx: &mut OrgContext,
        invitation_id: &str,
    ) -> Result<()> {
        let Some(invitation) = self
            .state
            .received_invitations
            .iter()
            .find(|invitation| invitation.id == invitation_id)
            .cloned()
        else {
            bail!("no pending invitation with id '{invitation_id}'");
        };

        self.api.accept_invitation(invitation_id).await?;

        let name = invitation
            .organization_name
            .clone()
            .unwrap_or_else(|| invitation.organization_id.clone());
        ctx.switch_organization(invitation.organization_id.clone(), name.clone());

        self.state
            .received_invitations
            .retain(|invitation| invitation.id != invitation_id);
        self.notifier.success(&format!("Joined {name}"));
        Ok(())
    }

    pub async fn reject_invitation(&mut self, invitation_id: &str) -> Result<()> {
        if !self
            .state
            .received_invitations
            .iter()
            .any(|invitation| invitation.id == invitation_id)
        {
            bail!("no pending invitation with id '{invitation_id}'");
        }

        self.api.reject_invitation(invitation_id).await?;
        self.state
            .received_invitations
            .retain(|invitation| invitation.id != invitation_id);
        self.notifier.success("Invitation declined");
        Ok(())
    }
}
