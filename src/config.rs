use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use cross_xdg::BaseDirs;

use crate::io::OutputEncoding;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "TAPEBF_CONFIG";
pub const OUTPUT_ENV: &str = "TAPEBF_OUTPUT";
pub const DEBUG_ENV: &str = "TAPEBF_DEBUG";

/// Run settings that can come from the config file or the environment.
/// Command-line flags are applied on top by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    pub output: OutputEncoding,
    pub debug: bool,
}

impl Settings {
    /// Defaults, then the config file, then the environment.
    ///
    /// Problems are returned as messages rather than failing, since logging
    /// may not be set up yet when settings are loaded.
    pub fn load() -> (Self, Vec<String>) {
        let mut settings = Settings::default();
        let mut warnings = Vec::new();

        if let Some(path) = config_path() {
            match fs::read_to_string(&path) {
                Ok(content) => {
                    for w in settings.apply_file(&content) {
                        warnings.push(format!("{}: {w}", path.display()));
                    }
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warnings.push(format!("{}: could not read config: {e}", path.display())),
            }
        }

        warnings.extend(settings.apply_env(|key| std::env::var(key).ok()));
        (settings, warnings)
    }

    /// Apply the `[interpreter]` section of a config file.
    ///
    /// Only a small TOML subset is understood: `[section]` headers,
    /// `key = value` pairs with optional double quotes and `#` comment lines.
    pub fn apply_file(&mut self, content: &str) -> Vec<String> {
        let mut in_interpreter = false;
        let mut map: HashMap<String, String> = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') { continue; }
            if line.starts_with('[') && line.ends_with(']') {
                in_interpreter = line[1..line.len() - 1].trim() == "interpreter";
                continue;
            }
            if !in_interpreter { continue; }
            if let Some((key, val_raw)) = line.split_once('=') {
                let val_raw = val_raw.trim();
                let val = val_raw
                    .strip_prefix('"')
                    .and_then(|v| v.strip_suffix('"'))
                    .unwrap_or(val_raw);
                map.insert(key.trim().to_string(), val.to_string());
            }
        }

        let mut warnings = Vec::new();
        if let Some(v) = map.get("output") {
            match v.parse() {
                Ok(enc) => self.output = enc,
                Err(e) => warnings.push(format!("output: {e}")),
            }
        }
        if let Some(v) = map.get("debug") {
            match parse_bool(v) {
                Some(b) => self.debug = b,
                None => warnings.push(format!("debug: expected true or false, got '{v}'")),
            }
        }
        warnings
    }

    /// Apply `TAPEBF_OUTPUT` and `TAPEBF_DEBUG` as returned by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();
        if let Some(v) = lookup(OUTPUT_ENV) {
            match v.parse() {
                Ok(enc) => self.output = enc,
                Err(e) => warnings.push(format!("{OUTPUT_ENV}: {e}")),
            }
        }
        if let Some(v) = lookup(DEBUG_ENV) {
            match parse_bool(&v) {
                Some(b) => self.debug = b,
                None => warnings.push(format!("{DEBUG_ENV}: expected 1/0 or true/false, got '{v}'")),
            }
        }
        warnings
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(explicit));
    }

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("tapebf.toml");
    Some(path)
}
