/// Default base URL for the backend (auth provider and outline API share it)
pub const PROPDECK_API_URL: &str = "http://localhost:3000";

/// Name of the directory under the OS config dir holding the global config file
pub const CONFIG_DIR_NAME: &str = "propdeck";
/// File holding the persisted active-organization selection
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Env var overriding the API base URL
pub const ENV_API_URL: &str = "PROPDECK_API";

/// Reviewer names offered by the outline edit form.
/// The backend does not validate this list, the client does.
pub const REVIEWERS: &[&str] = &["Assim", "Bini", "Mami"];
