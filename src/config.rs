//! Configuration helpers
//!
//! `.env` discovery for local runs and parsing of the comma-separated secret
//! list. Command-line flags and their environment fallbacks live in `main.rs`.

use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_API_URL: &str = "SECRETS_SAFE_API_URL";
pub const ENV_CLIENT_ID: &str = "SECRETS_SAFE_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "SECRETS_SAFE_CLIENT_SECRET";
pub const ENV_RETRIEVAL_TYPE: &str = "SECRETS_SAFE_RETRIEVAL_TYPE";
pub const ENV_SECRET_LIST: &str = "SECRETS_SAFE_SECRET_LIST";
pub const ENV_REQUEST_DURATION: &str = "SECRETS_SAFE_REQUEST_DURATION";
pub const ENV_REQUEST_REASON: &str = "SECRETS_SAFE_REQUEST_REASON";

const ENV_FILE: &str = ".env";
const MAX_PARENT_HOPS: usize = 6;

/// Split `a/b, c/d` into trimmed, non-empty references.
pub fn parse_secret_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_valid_env_key(key: &str) -> bool {
    if key.is_empty() {
        return false;
    }
    key.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// `KEY=VALUE` pairs from a loosely formatted env file.
///
/// Comments, code fences, blank lines and malformed lines are skipped; an
/// `export ` prefix and matching outer quotes are stripped.
pub fn parse_env_lines(text: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("```") {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line).trim();
        let Some((k, v)) = line.split_once('=') else {
            continue;
        };
        let key = k.trim();
        if !is_valid_env_key(key) {
            continue;
        }

        let mut value = v.trim().to_string();
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            value = value[1..value.len() - 1].to_string();
        }

        pairs.push((key.to_string(), value));
    }

    pairs
}

/// Load `path` without the strict parser, never overriding a non-empty variable.
fn load_env_lenient(path: &Path) -> std::io::Result<usize> {
    let text = std::fs::read_to_string(path)?;
    let mut loaded = 0usize;

    for (key, value) in parse_env_lines(&text) {
        if let Ok(existing) = std::env::var(&key) {
            if !existing.trim().is_empty() {
                continue;
            }
        }
        std::env::set_var(&key, value);
        loaded += 1;
    }

    Ok(loaded)
}

fn find_upwards(start: PathBuf, filename: &str, max_hops: usize) -> Option<PathBuf> {
    let mut cur = start;
    for _ in 0..=max_hops {
        let candidate = cur.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }
        if !cur.pop() {
            break;
        }
    }
    None
}

/// Load the nearest `.env` above the current directory, if any.
///
/// Returns the file that was loaded. Missing files are not an error.
pub fn load_env_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let path = find_upwards(cwd, ENV_FILE, MAX_PARENT_HOPS)?;

    if dotenvy::from_path(&path).is_ok() {
        debug!(path = %path.display(), "loaded env file");
        return Some(path);
    }
    match load_env_lenient(&path) {
        Ok(loaded) if loaded > 0 => {
            debug!(path = %path.display(), loaded, "loaded env file leniently");
            Some(path)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn secret_list_is_split_and_trimmed() {
        assert_eq!(
            parse_secret_list("system_01/account_1, path/title ,,"),
            vec!["system_01/account_1", "path/title"]
        );
        assert!(parse_secret_list(" , ").is_empty());
    }

    #[test]
    fn env_lines_skip_noise_and_strip_quotes() {
        let text = "# vault settings\n\
                    ```\n\
                    export SECRETS_SAFE_API_URL=\"https://vault.example.com/BeyondTrust/api/public/v3/\"\n\
                    lowercase=ignored\n\
                    SECRETS_SAFE_CLIENT_ID = 'abc'\n\
                    not a pair\n";
        assert_eq!(
            parse_env_lines(text),
            vec![
                (
                    "SECRETS_SAFE_API_URL".to_string(),
                    "https://vault.example.com/BeyondTrust/api/public/v3/".to_string()
                ),
                ("SECRETS_SAFE_CLIENT_ID".to_string(), "abc".to_string()),
            ]
        );
    }

    #[test]
    fn single_quote_character_is_kept() {
        assert_eq!(
            parse_env_lines("KEY=\""),
            vec![("KEY".to_string(), "\"".to_string())]
        );
    }

    #[test]
    fn find_upwards_walks_parents() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(".env"), "KEY=value\n").unwrap();

        let found = find_upwards(nested, ".env", 4).unwrap();
        assert_eq!(found, dir.path().join(".env"));
    }

    #[test]
    fn find_upwards_respects_hop_limit() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("c");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("marker.env"), "").unwrap();

        assert!(find_upwards(nested, "marker.env", 1).is_none());
    }

    #[test]
    fn lenient_loader_keeps_existing_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "```\nSECRETS_SAFE_TEST_LENIENT_NEW=fresh\nSECRETS_SAFE_TEST_LENIENT_SET=fresh\n",
        )
        .unwrap();
        std::env::set_var("SECRETS_SAFE_TEST_LENIENT_SET", "kept");

        let loaded = load_env_lenient(&path).unwrap();
        assert_eq!(loaded, 1);
        assert_eq!(std::env::var("SECRETS_SAFE_TEST_LENIENT_NEW").unwrap(), "fresh");
        assert_eq!(std::env::var("SECRETS_SAFE_TEST_LENIENT_SET").unwrap(), "kept");
    }
}
