use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, Result};

/// Organization/user configuration repositories, accepted as-is.
const RESERVED_NAMES: [&str; 2] = [".github", ".github-private"];

const MAX_NAME_LEN: usize = 100;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?$").expect("static pattern compiles")
});

/// Check a repository name against the naming policy.
///
/// Names must start and end with an ASCII letter or digit, use only letters,
/// digits, `.`, `-` and `_` in between, and be at most 100 characters long.
pub fn validate_repo_name(name: &str) -> Result<()> {
    if RESERVED_NAMES.contains(&name) {
        return Ok(());
    }

    if name.trim().is_empty() || name.len() > MAX_NAME_LEN || !NAME_PATTERN.is_match(name) {
        return Err(AppError::InvalidName);
    }

    Ok(())
}
