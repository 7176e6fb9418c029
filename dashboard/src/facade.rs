use anyhow::Result;
use async_trait::async_trait;
use propdeck_api_client::PropdeckApiClient;
use propdeck_common::models::{
    invitation::Invitation,
    member::{Member, MemberRole},
    organization::Organization,
    outline::{Outline, OutlineCreateRequest, OutlineUpdateRequest},
};

/// The slice of the backend the dashboard controllers talk to.
///
/// Controllers take `&dyn OrgApi` so that tests can substitute a scripted
/// backend without a network in the loop.
#[async_trait]
pub trait OrgApi: Send + Sync {
    async fn list_organizations(&self) -> Result<Vec<Organization>>;
    async fn create_organization(&self, name: &str, slug: &str) -> Result<Organization>;
    async fn set_active_organization(&self, organization_id: &str) -> Result<()>;
    async fn leave_organization(&self, organization_id: &str) -> Result<()>;

    async fn get_active_member_role(&self) -> Result<MemberRole>;
    async fn list_members(&self, organization_id: &str) -> Result<Vec<Member>>;
    async fn remove_member(&self, email: &str, organization_id: &str) -> Result<()>;

    async fn invite_member(
        &self,
        organization_id: &str,
        email: &str,
        role: MemberRole,
    ) -> Result<Invitation>;
    async fn list_invitations(&self, organization_id: &str) -> Result<Vec<Invitation>>;
    async fn list_user_invitations(&self) -> Result<Vec<Invitation>>;
    async fn accept_invitation(&self, invitation_id: &str) -> Result<()>;
    async fn reject_invitation(&self, invitation_id: &str) -> Result<()>;
    async fn cancel_invitation(&self, invitation_id: &str) -> Result<()>;
    /// Invitation details by opaque token, for the invite-landing flow
    async fn get_invitation(&self, token: &str) -> Result<Invitation>;

    async fn list_outlines(&self, organization_id: &str) -> Result<Vec<Outline>>;
    async fn create_outline(
        &self,
        organization_id: &str,
        req: OutlineCreateRequest,
    ) -> Result<Outline>;
    async fn update_outline(
        &self,
        organization_id: &str,
        outline_id: &str,
        req: OutlineUpdateRequest,
    ) -> Result<Outline>;
    async fn delete_outline(&self, organization_id: &str, outline_id: &str) -> Result<()>;
}

#[async_trait]
impl OrgApi for PropdeckApiClient {
    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        PropdeckApiClient::list_organizations(self).await
    }

    async fn create_organization(&self, name: &str, slug: &str) -> Result<Organization> {
        Ok(PropdeckApiClient::create_organization(self, name, slug)
            .await?
            .into_inner())
    }

    async fn set_active_organization(&self, organization_id: &str) -> Result<()> {
        PropdeckApiClient::set_active_organization(self, organization_id).await
    }

    async fn leave_organization(&self, organization_id: &str) -> Result<()> {
        PropdeckApiClient::leave_organization(self, organization_id).await
    }

    async fn get_active_member_role(&self) -> Result<MemberRole> {
        PropdeckApiClient::get_active_member_role(self).await
    }

    async fn list_members(&self, organization_id: &str) -> Result<Vec<Member>> {
        PropdeckApiClient::list_members(self, organization_id).await
    }

    async fn remove_member(&self, email: &str, organization_id: &str) -> Result<()> {
        PropdeckApiClient::remove_member(self, email, organization_id).await
    }

    async fn invite_member(
        &self,
        organization_id: &str,
        email: &str,
        role: MemberRole,
    ) -> Result<Invitation> {
        Ok(
            PropdeckApiClient::invite_member(self, organization_id, email, role)
                .await?
                .into_inner(),
        )
    }

    async fn list_invitations(&self, organization_id: &str) -> Result<Vec<Invitation>> {
        PropdeckApiClient::list_invitations(self, organization_id).await
    }

    async fn list_user_invitations(&self) -> Result<Vec<Invitation>> {
        PropdeckApiClient::list_user_invitations(self).await
    }

    async fn accept_invitation(&self, invitation_id: &str) -> Result<()> {
        PropdeckApiClient::accept_invitation(self, invitation_id).await
    }

    async fn reject_invitation(&self, invitation_id: &str) -> Result<()> {
        PropdeckApiClient::reject_invitation(self, invitation_id).await
    }

    async fn cancel_invitation(&self, invitation_id: &str) -> Result<()> {
        PropdeckApiClient::cancel_invitation(self, invitation_id).await
    }

    async fn get_invitation(&self, token: &str) -> Result<Invitation> {
        Ok(PropdeckApiClient::get_invitation(self, token)
            .await?
            .into_inner())
    }

    async fn list_outlines(&self, organization_id: &str) -> Result<Vec<Outline>> {
        Ok(PropdeckApiClient::list_outlines(self, organization_id)
            .await?
            .into_inner())
    }

    async fn create_outline(
        &self,
        organization_id: &str,
        req: OutlineCreateRequest,
    ) -> Result<Outline> {
        Ok(PropdeckApiClient::create_outline(self, organization_id, req)
            .await?
            .into_inner())
    }

    async fn update_outline(
        &self,
        organization_id: &str,
        outline_id: &str,
        req: OutlineUpdateRequest,
    ) -> Result<Outline> {
        Ok(
            PropdeckApiClient::update_outline(self, organization_id, outline_id, req)
                .await?
                .into_inner(),
        )
    }

    async fn delete_outline(&self, organization_id: &str, outline_id: &str) -> Result<()> {
        PropdeckApiClient::delete_outline(self, organization_id, outline_id).await
    }
}
