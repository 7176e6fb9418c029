use std::time::Duration;

use anyhow::{Context, Result};
use propdeck_common::models::{
    invitation::{
        parse_invitation_list, Invitation, InvitationIdRequest, InviteMemberRequest,
    },
    member::{
        parse_active_role, parse_member_list, LeaveOrganizationRequest, Member, MemberRole,
        RemoveMemberRequest,
    },
    organization::{
        dedup_organizations, Organization, OrganizationCreateRequest,
        SetActiveOrganizationRequest,
    },
    outline::{Outline, OutlineCreateRequest, OutlineUpdateRequest},
    user::{
        AuthResponse, ChangePasswordRequest, SessionResponse, SignInRequest, SignUpRequest,
    },
};
use reqwest::Response;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
mod middleware;
#[cfg(feature = "tracing")]
use crate::middleware::LoggingMiddleware;

pub mod util;
use util::{ParsedJson, ToBodyContent};

/// Client for the auth/organization provider and the outline backend.
///
/// Session identification is cookie-based: the underlying cookie store picks
/// up the session cookie on sign-in and includes it on every subsequent
/// request. No bearer-token scheme is used.
#[derive(Clone)]
pub struct PropdeckApiClient {
    pub client: ClientWithMiddleware,
    pub api_url: String,
}

impl PropdeckApiClient {
    pub fn new(api_url: String, timeout: Option<u64>) -> Self {
        let mut builder = reqwest::Client::builder().cookie_store(true);

        if let Ok(proxy) = std::env::var("HTTP_PROXY") {
            builder = builder.proxy(reqwest::Proxy::http(proxy).unwrap());
        }

        if let Ok(proxy) = std::env::var("HTTPS_PROXY") {
            builder = builder.proxy(reqwest::Proxy::https(proxy).unwrap());
        }

        let client = builder
            .timeout(Duration::from_secs(timeout.unwrap_or(60)))
            .build()
            .unwrap();

        let builder = reqwest_middleware::ClientBuilder::new(client);

        #[cfg(feature = "tracing")]
        let builder = builder.with(LoggingMiddleware);

        let client = builder.build();

        Self { client, api_url }
    }

    // ==== auth provider: session ====

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<ParsedJson<AuthResponse>> {
        self.post_json(
            "/api/auth/sign-up/email",
            Some(SignUpRequest {
                email: email.to_string(),
                password: password.to_string(),
                name: name.to_string(),
            }),
        )
        .await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<ParsedJson<AuthResponse>> {
        self.post_json(
            "/api/auth/sign-in/email",
            Some(SignInRequest {
                email: email.to_string(),
                password: password.to_string(),
            }),
        )
        .await
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.post("/api/auth/sign-out", Option::<()>::None)
            .await?
            .to_empty()
            .await
    }

    /// Returns `None` when no session is established (the provider responds
    /// with a JSON null body)
    pub async fn get_session(&self) -> Result<ParsedJson<Option<SessionResponse>>> {
        self.get_json("/api/auth/get-session").await
    }

    pub async fn change_password(&self, current: &str, new: &str) -> Result<()> {
        self.post(
            "/api/auth/change-password",
            Some(ChangePasswordRequest {
                current_password: current.to_string(),
                new_password: new.to_string(),
                revoke_other_sessions: true,
            }),
        )
        .await?
        .to_empty()
        .await
    }

    // ==== auth provider: organizations ====

    pub async fn create_organization(
        &self,
        name: &str,
        slug: &str,
    ) -> Result<ParsedJson<Organization>> {
        self.post_json(
            "/api/auth/organization/create",
            Some(OrganizationCreateRequest {
                name: name.to_string(),
                slug: slug.to_string(),
                keep_current_active_organization: true,
            }),
        )
        .await
    }

    /// List the organizations the current user can access, deduplicated by id
    pub async fn list_organizations(&self) -> Result<Vec<Organization>> {
        let organizations: ParsedJson<Vec<Organization>> =
            self.get_json("/api/auth/organization/list").await?;

        Ok(dedup_organizations(organizations.into_inner()))
    }

    /// Update the *server-side* session's active organization. Role and
    /// member queries are scoped to it, so this must be issued before them.
    pub async fn set_active_organization(&self, organization_id: &str) -> Result<()> {
        self.post(
            "/api/auth/organization/set-active",
            Some(SetActiveOrganizationRequest {
                organization_id: organization_id.to_string(),
            }),
        )
        .await?
        .to_empty()
        .await
    }

    pub async fn leave_organization(&self, organization_id: &str) -> Result<()> {
        self.post(
            "/api/auth/organization/leave",
            Some(LeaveOrganizationRequest {
                organization_id: organization_id.to_string(),
            }),
        )
        .await?
        .to_empty()
        .await
    }

    // ==== auth provider: members ====

    /// Fetch and normalize the member list of an organization.
    ///
    /// The raw response shape varies between provider versions, so it is
    /// decoded defensively: unparseable entries are dropped and the result
    /// is deduplicated by user id.
    pub async fn list_members(&self, organization_id: &str) -> Result<Vec<Member>> {
        let raw: ParsedJson<serde_json::Value> = self
            .get_json(format!(
                "/api/auth/organization/list-members?organizationId={organization_id}"
            ))
            .await?;

        Ok(parse_member_list(raw.into_inner()))
    }

    /// The current user's role in the server session's active organization
    pub async fn get_active_member_role(&self) -> Result<MemberRole> {
        let raw: ParsedJson<serde_json::Value> = self
            .get_json("/api/auth/organization/get-active-member-role")
            .await?;

        parse_active_role(raw.as_ref()).context("no role in active-member-role response")
    }

    /// The target is identified by email at this boundary, not by user id
    pub async fn remove_member(&self, email: &str, organization_id: &str) -> Result<()> {
        self.post(
            "/api/auth/organization/remove-member",
            Some(RemoveMemberRequest {
                member_id_or_email: email.to_string(),
                organization_id: organization_id.to_string(),
            }),
        )
        .await?
        .to_empty()
        .await
    }

    // ==== auth provider: invitations ====

    pub async fn invite_member(
        &self,
        organization_id: &str,
        email: &str,
        role: MemberRole,
    ) -> Result<ParsedJson<Invitation>> {
        self.post_json(
            "/api/auth/organization/invite-member",
            Some(InviteMemberRequest {
                email: email.to_string(),
                role,
                organization_id: organization_id.to_string(),
            }),
        )
        .await
    }

    /// Invitations sent by the given organization (all statuses)
    pub async fn list_invitations(&self, organization_id: &str) -> Result<Vec<Invitation>> {
        let raw: ParsedJson<serde_json::Value> = self
            .get_json(format!(
                "/api/auth/organization/list-invitations?organizationId={organization_id}"
            ))
            .await?;

        Ok(parse_invitation_list(raw.into_inner()))
    }

    /// Invitations received by the current user across all organizations
    pub async fn list_user_invitations(&self) -> Result<Vec<Invitation>> {
        let raw: ParsedJson<serde_json::Value> = self
            .get_json("/api/auth/organization/list-user-invitations")
            .await?;

        Ok(parse_invitation_list(raw.into_inner()))
    }

    pub async fn accept_invitation(&self, invitation_id: &str) -> Result<()> {
        self.invitation_action("accept-invitation", invitation_id)
            .await
    }

    pub async fn reject_invitation(&self, invitation_id: &str) -> Result<()> {
        self.invitation_action("reject-invitation", invitation_id)
            .await
    }

    pub async fn cancel_invitation(&self, invitation_id: &str) -> Result<()> {
        self.invitation_action("cancel-invitation", invitation_id)
            .await
    }

    async fn invitation_action(&self, action: &str, invitation_id: &str) -> Result<()> {
        self.post(
            format!("/api/auth/organization/{action}"),
            Some(InvitationIdRequest {
                invitation_id: invitation_id.to_string(),
            }),
        )
        .await?
        .to_empty()
        .await
    }

    /// Fetch invitation details by opaque token, for the invite-landing flow
    pub async fn get_invitation(&self, token: &str) -> Result<ParsedJson<Invitation>> {
        self.get_json(format!("/api/organization/invitation/{token}"))
            .await
    }

    // ==== outline backend ====

    pub async fn create_outline(
        &self,
        organization_id: &str,
        req: OutlineCreateRequest,
    ) -> Result<ParsedJson<Outline>> {
        self.post_json(format!("/api/org/{organization_id}/outlines"), Some(req))
            .await
    }

    pub async fn list_outlines(&self, organization_id: &str) -> Result<ParsedJson<Vec<Outline>>> {
        self.get_json(format!("/api/org/{organization_id}/outlines"))
            .await
    }

    pub async fn get_outline(
        &self,
        organization_id: &str,
        outline_id: &str,
    ) -> Result<ParsedJson<Outline>> {
        self.get_json(format!("/api/org/{organization_id}/outlines/{outline_id}"))
            .await
    }

    pub async fn update_outline(
        &self,
        organization_id: &str,
        outline_id: &str,
        req: OutlineUpdateRequest,
    ) -> Result<ParsedJson<Outline>> {
        self.patch_json(
            format!("/api/org/{organization_id}/outlines/{outline_id}"),
            Some(req),
        )
        .await
    }

    pub async fn delete_outline(&self, organization_id: &str, outline_id: &str) -> Result<()> {
        self.delete(
            format!("/api/org/{organization_id}/outlines/{outline_id}"),
            Option::<()>::None,
        )
        .await?
        .to_empty()
        .await
    }

    // ==== request plumbing ====

    pub async fn get(&self, path: impl AsRef<str>) -> Result<Response> {
        let url = format!("{}{}", self.api_url, path.as_ref());

        Ok(self.client.get(url).send().await?)
    }

    pub async fn get_json<R>(&self, path: impl AsRef<str>) -> Result<ParsedJson<R>>
    where
        R: for<'de> Deserialize<'de>,
    {
        self.get(path).await?.to_json().await
    }

    pub async fn post<T: Serialize>(
        &self,
        path: impl AsRef<str>,
        body: Option<T>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.api_url, path.as_ref());

        let mut builder = self.client.post(url);

        if let Some(body) = body {
            let body = serde_json::to_string(&body)?;
            #[cfg(feature = "tracing")]
            tracing::debug!("Outgoing body: {}", body);
            builder = builder.body(body);
            builder = builder.header("Content-Type", "application/json");
        }

        Ok(builder.send().await?)
    }

    pub async fn post_json<T: Serialize, R>(
        &self,
        path: impl AsRef<str>,
        body: Option<T>,
    ) -> Result<ParsedJson<R>>
    where
        R: for<'de> Deserialize<'de>,
    {
        self.post(path, body).await?.to_json().await
    }

    pub async fn patch<T: Serialize>(
        &self,
        path: impl AsRef<str>,
        body: Option<T>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.api_url, path.as_ref());

        let mut builder = self.client.patch(url);

        if let Some(body) = body {
            let body = serde_json::to_string(&body)?;
            #[cfg(feature = "tracing")]
            tracing::debug!("Outgoing body: {}", body);
            builder = builder.body(body);
            builder = builder.header("Content-Type", "application/json");
        }

        Ok(builder.send().await?)
    }

    pub async fn patch_json<T: Serialize, R>(
        &self,
        path: impl AsRef<str>,
        body: Option<T>,
    ) -> Result<ParsedJson<R>>
    where
        R: for<'de> Deserialize<'de>,
    {
        self.patch(path, body).await?.to_json().await
    }

    pub async fn delete<T: Serialize>(
        &self,
        path: impl AsRef<str>,
        body: Option<T>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.api_url, path.as_ref());

        let mut builder = self.client.delete(url);

        if let Some(body) = body {
            let body = serde_json::to_string(&body)?;
            #[cfg(feature = "tracing")]
            tracing::debug!("Outgoing body: {}", body);
            builder = builder.body(body);
            builder = builder.header("Content-Type", "application/json");
        }

        Ok(builder.send().await?)
    }
}
