// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run-as identity resolution
//!
//! Names are resolved against the platform user/group databases once, at
//! configuration time. The core only ever hands numeric ids to the spawn
//! collaborator; it never touches OS impersonation mechanics itself.

use nix::unistd::{Group, User};
use thiserror::Error;

/// Numeric identity a spawned process should run under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunAs {
    pub uid: Option<u32>,
    pub gid: Option<u32>,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("unknown user: {0}")]
    UnknownUser(String),
    #[error("unknown group: {0}")]
    UnknownGroup(String),
    #[error("user database lookup failed for {name}: {source}")]
    Lookup { name: String, source: nix::Error },
}

/// Resolve a user name (or numeric uid string) to a uid.
pub fn resolve_user(name: &str) -> Result<u32, IdentityError> {
    if let Ok(uid) = name.parse::<u32>() {
        return Ok(uid);
    }
    match User::from_name(name) {
        Ok(Some(user)) => Ok(user.uid.as_raw()),
        Ok(None) => Err(IdentityError::UnknownUser(name.to_string())),
        Err(source) => Err(IdentityError::Lookup {
            name: name.to_string(),
            source,
        }),
    }
}

/// Resolve a group name (or numeric gid string) to a gid.
pub fn resolve_group(name: &str) -> Result<u32, IdentityError> {
    if let Ok(gid) = name.parse::<u32>() {
        return Ok(gid);
    }
    match Group::from_name(name) {
        Ok(Some(group)) => Ok(group.gid.as_raw()),
        Ok(None) => Err(IdentityError::UnknownGroup(name.to_string())),
        Err(source) => Err(IdentityError::Lookup {
            name: name.to_string(),
            source,
        }),
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
