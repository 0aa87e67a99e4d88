//! Secret reference parsing
//!
//! Managed accounts split on the first `/` (`system/account`). Secrets split on
//! the last `/`, so the folder path keeps its own separators
//! (`folder/sub/title`). Escaped separators are not recognised.

use crate::error::{Result, SafeError};
use crate::models::{FolderTitleRef, RetrievalType, SecretReference, SystemAccountRef};

pub const SEPARATOR: char = '/';

/// Parse `reference` according to `mode`.
pub fn parse(reference: &str, mode: RetrievalType) -> Result<SecretReference> {
    match mode {
        RetrievalType::ManagedAccount => {
            parse_system_account(reference).map(SecretReference::SystemAccount)
        }
        RetrievalType::Secret => parse_folder_title(reference).map(SecretReference::FolderTitle),
    }
}

pub fn parse_system_account(reference: &str) -> Result<SystemAccountRef> {
    let trimmed = reference.trim();
    let invalid = || SafeError::InvalidPath {
        kind: "managed account",
        reference: reference.to_string(),
        halves: "system and account",
    };

    let (system, account) = trimmed.split_once(SEPARATOR).ok_or_else(invalid)?;
    if system.is_empty() || account.is_empty() {
        return Err(invalid());
    }

    Ok(SystemAccountRef {
        system_name: system.to_string(),
        account_name: account.to_string(),
    })
}

pub fn parse_folder_title(reference: &str) -> Result<FolderTitleRef> {
    let trimmed = reference.trim();
    let invalid = || SafeError::InvalidPath {
        kind: "secret",
        reference: reference.to_string(),
        halves: "path and title",
    };

    let (folder, title) = trimmed.rsplit_once(SEPARATOR).ok_or_else(invalid)?;
    if title.is_empty() {
        return Err(invalid());
    }

    Ok(FolderTitleRef {
        folder_path: folder.split(SEPARATOR).map(str::to_string).collect(),
        title: title.to_string(),
    })
}
