pub mod error;
pub mod invitation;
pub mod member;
pub mod organization;
pub mod outline;
pub mod user;
