pub mod args;
pub mod config;
pub mod context;
pub mod facade;
pub mod notify;
pub mod outline;
pub mod switcher;
pub mod team;

use anyhow::{bail, Result};
use crossterm::style::Stylize;
use propdeck_api_client::PropdeckApiClient;
use propdeck_common::constants::{ENV_API_URL, PROPDECK_API_URL};
use propdeck_common::models::invitation::pending_only;
use propdeck_common::models::outline::{
    validate_reviewer, OutlineCreateRequest, OutlineUpdateRequest,
};
use propdeck_common::models::user::SessionUser;
use propdeck_common::tables;
use tracing_subscriber::EnvFilter;

use crate::args::{Command, OrgCommand, OutlineCommand, PropdeckArgs, TeamCommand};
use crate::config::Selector;
use crate::context::OrgContext;
use crate::notify::TerminalNotifier;
use crate::outline::OutlineTable;
use crate::team::TeamReconciler;

pub fn init_tracing(debug: bool) {
    let default_directive = if debug {
        "info,propdeck=trace,propdeck_api_client=trace,propdeck_common=trace"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .init();
}

pub struct Propdeck {
    client: PropdeckApiClient,
    ctx: OrgContext,
    notifier: TerminalNotifier,
    raw: bool,
}

impl Propdeck {
    pub fn new(args: &PropdeckArgs) -> Self {
        let api_url = args
            .api_url
            .clone()
            .or_else(|| std::env::var(ENV_API_URL).ok())
            .unwrap_or_else(|| PROPDECK_API_URL.to_string());

        Self {
            client: PropdeckApiClient::new(api_url, None),
            ctx: OrgContext::new(Selector::load()),
            notifier: TerminalNotifier,
            raw: args.raw,
        }
    }

    pub async fn run(mut self, args: PropdeckArgs) -> Result<()> {
        match args.cmd {
            Command::Signup(signup_args) => {
                let name = signup_args.name.unwrap_or_else(|| {
                    signup_args
                        .email
                        .split('@')
                        .next()
                        .unwrap_or_default()
                        .to_string()
                });
                let password = match signup_args.password {
                    Some(password) => password,
                    None => prompt_password("Password")?,
                };
                let auth = self
                    .client
                    .sign_up(&signup_args.email, &password, &name)
                    .await?
                    .into_inner();
                println!("Account created for {}", auth.user.email.as_str().bold());
            }
            Command::Login(login_args) => {
                let password = match login_args.password {
                    Some(password) => password,
                    None => prompt_password("Password")?,
                };
                let auth = self
                    .client
                    .sign_in(&login_args.email, &password)
                    .await?
                    .into_inner();
                println!("Signed in as {}", auth.user.name.as_str().bold());
            }
            Command::Logout => {
                self.client.sign_out().await?;
                println!("Signed out");
            }
            Command::Account => {
                let user = self.current_user().await?;
                println!("{} <{}>", user.name.as_str().bold(), user.email);
                switcher::refresh_organizations(&self.client, &mut self.ctx).await?;
                match self.ctx.active_org_display_name() {
                    Some(name) => println!("Active organization: {name}"),
                    None => println!("No active organization"),
                }
            }
            Command::ChangePassword => {
                let current = prompt_password("Current password")?;
                let new = prompt_password("New password")?;
                self.client.change_password(&current, &new).await?;
                println!("Password changed, other sessions were signed out");
            }
            Command::Org(cmd) => self.run_org(cmd).await?,
            Command::Team(cmd) => self.run_team(cmd).await?,
            Command::Outline(cmd) => self.run_outline(cmd).await?,
        }

        Ok(())
    }

    async fn run_org(&mut self, cmd: OrgCommand) -> Result<()> {
        match cmd {
            OrgCommand::List => {
                switcher::refresh_organizations(&self.client, &mut self.ctx).await?;
                println!(
                    "{}",
                    tables::organizations_table(
                        self.ctx.organizations(),
                        self.ctx.active_org_id(),
                        self.raw
                    )
                );
            }
            OrgCommand::Create { name, slug } => {
                switcher::refresh_organizations(&self.client, &mut self.ctx).await?;
                let created = switcher::create_and_activate(
                    &self.client,
                    &mut self.ctx,
                    &name,
                    slug.as_deref(),
                )
                .await?;
                println!(
                    "Created {} ({}) and made it active",
                    created.name.as_str().bold(),
                    created.slug
                );
            }
            OrgCommand::Switch { organization_id } => {
                switcher::refresh_organizations(&self.client, &mut self.ctx).await?;
                switcher::switch_to(&mut self.ctx, &organization_id)?;
                println!(
                    "Switched to {}",
                    self.ctx.active_org_display_name().unwrap_or("?").bold()
                );
            }
            OrgCommand::Leave => {
                let Some(org_id) = self.ctx.active_org_id().map(str::to_string) else {
                    bail!("no active organization to leave");
                };
                let name = self
                    .ctx
                    .active_org_display_name()
                    .unwrap_or(&org_id)
                    .to_string();
                self.client.leave_organization(&org_id).await?;
                self.ctx.clear_organization();
                println!("Left {name}");
            }
        }

        Ok(())
    }

    async fn run_team(&mut self, cmd: TeamCommand) -> Result<()> {
        let user = self.current_user().await?;

        // The received-invitation commands work without an active
        // organization, everything else is scoped to one.
        match cmd {
            TeamCommand::Invitations => {
                let received = pending_only(&self.client.list_user_invitations().await?);
                println!("{}", tables::invitations_table(&received, true, self.raw));
                return Ok(());
            }
            TeamCommand::Invitation { ref token } => {
                let invitation = self.client.get_invitation(token).await?.into_inner();
                let organization = invitation
                    .organization_name
                    .clone()
                    .unwrap_or_else(|| invitation.organization_id.clone());
                println!(
                    "{} invited {} to {} as {} ({})",
                    invitation.id,
                    invitation.email.as_str().bold(),
                    organization.as_str().bold(),
                    invitation.role,
                    invitation.status
                );
                return Ok(());
            }
            TeamCommand::Accept { ref invitation_id } => {
                let mut reconciler =
                    TeamReconciler::new(&self.client, &self.notifier, user.id.clone());
                reconciler.state.received_invitations =
                    pending_only(&self.client.list_user_invitations().await?);
                reconciler
                    .accept_invitation(&mut self.ctx, invitation_id)
                    .await?;
                return Ok(());
            }
            TeamCommand::Reject { ref invitation_id } => {
                let mut reconciler =
                    TeamReconciler::new(&self.client, &self.notifier, user.id.clone());
                reconciler.state.received_invitations =
                    pending_only(&self.client.list_user_invitations().await?);
                reconciler.reject_invitation(invitation_id).await?;
                return Ok(());
            }
            _ => {}
        }

        switcher::refresh_organizations(&self.client, &mut self.ctx).await?;
        if self.ctx.active_org_id().is_none() {
            bail!("no active organization, run 'propdeck org switch' first");
        }

        let mut reconciler = TeamReconciler::new(&self.client, &self.notifier, user.id);
        reconciler.activate(&self.ctx).await?;

        match cmd {
            TeamCommand::Status => {
                if let Some(name) = &reconciler.state.organization_name {
                    println!("{}", name.as_str().bold());
                }
                if let Some(role) = reconciler.state.current_role {
                    println!("Your role: {role}");
                }
                println!(
                    "{}",
                    tables::members_table(&reconciler.state.members, self.raw)
                );
                if !reconciler.state.sent_invitations.is_empty() {
                    println!("{}", "Pending invitations".bold());
                    println!(
                        "{}",
                        tables::invitations_table(
                            &reconciler.state.sent_invitations,
                            false,
                            self.raw
                        )
                    );
                }
            }
            TeamCommand::Invite { email, role } => {
                reconciler.invite(&self.ctx, &email, role).await?;
            }
            TeamCommand::CancelInvite { invitation_id } => {
                reconciler.cancel_invitation(&self.ctx, &invitation_id).await?;
            }
            TeamCommand::Remove { user_id } => {
                reconciler.remove_member(&self.ctx, &user_id).await?;
            }
            TeamCommand::SetRole { user_id, role } => {
                reconciler.update_role(&user_id, role)?;
            }
            TeamCommand::Invitations
            | TeamCommand::Invitation { .. }
            | TeamCommand::Accept { .. }
            | TeamCommand::Reject { .. } => {
                unreachable!("handled above")
            }
        }

        Ok(())
    }

    async fn run_outline(&mut self, cmd: OutlineCommand) -> Result<()> {
        switcher::refresh_organizations(&self.client, &mut self.ctx).await?;

        let mut table = OutlineTable::new();
        table.activate(&self.client, &mut self.ctx).await?;

        if table.needs_organization {
            bail!("you have no organization yet, create one with 'propdeck org create <name>'");
        }

        match cmd {
            OutlineCommand::List { toggle } => {
                for column in toggle {
                    table.toggle_column(column);
                }
                println!(
                    "{}",
                    tables::outlines_table(&table.outlines, &table.columns, self.raw)
                );
            }
            OutlineCommand::Add {
                header,
                section_type,
                status,
                target,
                limit,
                reviewer,
            } => {
                validate_reviewer(&reviewer)?;
                let created = table
                    .create(
                        &self.client,
                        &self.ctx,
                        OutlineCreateRequest {
                            header,
                            section_type,
                            status,
                            target,
                            limit,
                            reviewer,
                        },
                    )
                    .await?;
                println!("Added {} ({})", created.header.as_str().bold(), created.id);
            }
            OutlineCommand::Edit {
                outline_id,
                header,
                section_type,
                status,
                target,
                limit,
                reviewer,
            } => {
                if let Some(reviewer) = &reviewer {
                    validate_reviewer(reviewer)?;
                }
                let patch = OutlineUpdateRequest {
                    header,
                    section_type,
                    status,
                    target,
                    limit,
                    reviewer,
                };
                if patch == OutlineUpdateRequest::default() {
                    bail!("nothing to change, pass at least one field");
                }
                table
                    .update(&self.client, &self.ctx, &outline_id, patch)
                    .await?;
                println!("Updated {outline_id}");
            }
            OutlineCommand::Delete { outline_id } => {
                table.delete(&self.client, &self.ctx, &outline_id).await?;
                println!("Deleted {outline_id}");
            }
            OutlineCommand::Move { from, to } => {
                if from == 0 || to == 0 {
                    bail!("row positions are 1-based");
                }
                table.reorder(from - 1, to - 1)?;
                println!(
                    "{}",
                    tables::outlines_table(&table.outlines, &table.columns, self.raw)
                );
            }
        }

        Ok(())
    }

    async fn current_user(&self) -> Result<SessionUser> {
        let session = self.client.get_session().await?.into_inner();
        match session {
            Some(session) => Ok(session.user),
            None => bail!("not signed in, run 'propdeck login <email>' first"),
        }
    }
}

fn prompt_password(prompt: &str) -> Result<String> {
    Ok(dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()?)
}
