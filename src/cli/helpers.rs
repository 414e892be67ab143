//! Shared helper functions for CLI commands

use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::identity::EntityId;
use crate::core::workspace::Workspace;
use crate::core::Config;

/// Open the workspace named by --workspace, or discover it by walking
/// up from the current directory
pub fn open_workspace(global: &GlobalOpts) -> Result<Workspace> {
    let result = match &global.workspace {
        Some(path) => Workspace::discover_from(path),
        None => Workspace::discover(),
    };
    result.map_err(|e| miette::miette!("{}", e))
}

/// Load layered configuration for a workspace
pub fn load_config(ws: &Workspace) -> Config {
    Config::load(Some(&ws.fitq_dir()))
}

/// Format an EntityId for display, truncating if too long
///
/// IDs longer than 16 characters are truncated to 13 chars with "..."
/// suffix so table columns stay aligned.
pub fn format_short_id(id: &EntityId) -> String {
    let s = id.to_string();
    if s.len() > 16 {
        format!("{}...", &s[..13])
    } else {
        s
    }
}

/// Truncate a string to max_len, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

/// Prompt for confirmation before a destructive action, unless --yes
/// was given. Non-interactive callers always pass --yes.
pub fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| miette::miette!("prompt failed: {}", e))
}

/// Parse KEY=VALUE pairs from repeated --param flags
pub fn parse_param(input: &str) -> Result<(String, f64)> {
    let (key, value) = input.split_once('=').ok_or_else(|| {
        miette::miette!(
            "Invalid parameter '{}'. Expected KEY=VALUE, e.g. SHELF_COUNT=3",
            input
        )
    })?;
    let value: f64 = value
        .parse()
        .map_err(|_| miette::miette!("Invalid numeric value '{}' for parameter '{}'", value, key))?;
    Ok((key.trim().to_string(), value))
}
