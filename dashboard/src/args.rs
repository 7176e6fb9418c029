use clap::{Args, Parser, Subcommand};
use propdeck_common::models::{
    member::MemberRole,
    outline::{OutlineStatus, SectionType},
};

use crate::outline::OutlineColumn;

#[derive(Parser)]
#[command(version, about, next_help_heading = "Global options")]
pub struct PropdeckArgs {
    /// URL of the propdeck backend to target
    #[arg(global = true, long, env = "PROPDECK_API")]
    pub api_url: Option<String>,
    /// Turn on tracing output
    #[arg(global = true, long, env = "PROPDECK_DEBUG")]
    pub debug: bool,
    /// Print tables without borders
    #[arg(global = true, long)]
    pub raw: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an account
    Signup(SignupArgs),
    /// Sign in and store the session
    Login(LoginArgs),
    /// Sign out of the current session
    Logout,
    /// Show the signed-in account and its active organization
    Account,
    /// Change the account password, signing out other devices
    ChangePassword,
    /// Manage organizations
    #[command(subcommand)]
    Org(OrgCommand),
    /// Manage the team of the active organization
    #[command(subcommand)]
    Team(TeamCommand),
    /// Manage the outline table of the active organization
    #[command(subcommand)]
    Outline(OutlineCommand),
}

#[derive(Args)]
pub struct SignupArgs {
    pub email: String,
    /// Display name. Defaults to the part of the email before '@'.
    #[arg(long)]
    pub name: Option<String>,
    /// Read from a prompt when not given
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct LoginArgs {
    pub email: String,
    /// Read from a prompt when not given
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Subcommand)]
pub enum OrgCommand {
    /// List your organizations, marking the active one
    List,
    /// Create an organization and make it active
    Create {
        name: String,
        /// Derived from the name when not given
        #[arg(long)]
        slug: Option<String>,
    },
    /// Make an organization active
    Switch { organization_id: String },
    /// Leave the active organization
    Leave,
}

#[derive(Subcommand)]
pub enum TeamCommand {
    /// Show members and pending invitations
    Status,
    /// Invite someone by email
    Invite {
        email: String,
        #[arg(long, default_value = "member")]
        role: MemberRole,
    },
    /// Cancel a sent invitation
    CancelInvite { invitation_id: String },
    /// Remove a member by user id
    Remove { user_id: String },
    /// Change a member's role
    SetRole {
        user_id: String,
        role: MemberRole,
    },
    /// List invitations you have received
    Invitations,
    /// Look up an invitation by its opaque token
    Invitation { token: String },
    /// Accept a received invitation and switch to its organization
    Accept { invitation_id: String },
    /// Decline a received invitation
    Reject { invitation_id: String },
}

#[derive(Subcommand)]
pub enum OutlineCommand {
    /// Print the outline table
    List {
        /// Columns to toggle away from their defaults
        #[arg(long, value_delimiter = ',')]
        toggle: Vec<OutlineColumn>,
    },
    /// Add a row
    Add {
        header: String,
        #[arg(long = "type")]
        section_type: SectionType,
        #[arg(long, default_value = "Pending")]
        status: OutlineStatus,
        #[arg(long, default_value_t = 0)]
        target: i64,
        #[arg(long, default_value_t = 0)]
        limit: i64,
        #[arg(long)]
        reviewer: String,
    },
    /// Edit fields of a row
    Edit {
        outline_id: String,
        #[arg(long)]
        header: Option<String>,
        #[arg(long = "type")]
        section_type: Option<SectionType>,
        #[arg(long)]
        status: Option<OutlineStatus>,
        #[arg(long)]
        target: Option<i64>,
        #[arg(long)]
        limit: Option<i64>,
        #[arg(long)]
        reviewer: Option<String>,
    },
    /// Delete a row
    Delete { outline_id: String },
    /// Move a row to another position (1-based)
    Move { from: usize, to: usize },
}
