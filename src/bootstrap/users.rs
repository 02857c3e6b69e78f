//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use std::collections::BTreeMap;
use std::path::Path;

//-------------------------------------------------------------------------------------------------------------------

/// Sign-in fields of one user, sent as query parameters.
pub type UserRecord = BTreeMap<String, String>;

/// Parse a JSON array of users.
pub fn parse_users(json: &str) -> Result<Vec<UserRecord>, BootstrapError>
{
    serde_json::from_str(json).map_err(|err| BootstrapError::UserList(format!("invalid user list: {}", err)))
}

/// Load a JSON array of users from a file.
pub fn load_users(path: &Path) -> Result<Vec<UserRecord>, BootstrapError>
{
    let json = std::fs::read_to_string(path)
        .map_err(|err| BootstrapError::UserList(format!("failed reading {}: {}", path.display(), err)))?;

    parse_users(&json)
}

//-------------------------------------------------------------------------------------------------------------------
