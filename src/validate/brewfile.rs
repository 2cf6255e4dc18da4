//! Brewfile parsing.
//!
//! A Brewfile is a Ruby DSL, but the dashboard only needs the package
//! inventory, so this reads it as a line-oriented list: `tap`, `brew`,
//! and `cask` directives with a quoted first argument. Options after the
//! name (`args:`, `restart_service:`) and every other directive
//! (`mas`, `vscode`) are ignored.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

static DIRECTIVE_REGEX: OnceLock<Regex> = OnceLock::new();

/// `tap "name"`, `brew 'name'`, `cask "name"` at line start; captures the
/// directive and the quoted name.
fn directive_regex() -> &'static Regex {
    DIRECTIVE_REGEX.get_or_init(|| {
        Regex::new(r#"^(tap|brew|cask)\s+["']([^"']+)["']"#).expect("directive regex is valid")
    })
}

/// One named package, however minimal; the wire shape is `{"name": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageName {
    pub name: String,
}

/// Packages declared in a Brewfile, bucketed by directive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BrewfilePackages {
    pub taps: Vec<PackageName>,
    pub formulae: Vec<PackageName>,
    pub casks: Vec<PackageName>,
}

impl BrewfilePackages {
    /// Bucket by its API category name, `None` for unknown categories.
    pub fn category(&self, name: &str) -> Option<&[PackageName]> {
        match name {
            "taps" => Some(&self.taps),
            "formulae" => Some(&self.formulae),
            "casks" => Some(&self.casks),
            _ => None,
        }
    }
}

/// Parse a Brewfile, silently skipping lines that are not recognized
/// package directives.
pub fn parse(content: &str) -> BrewfilePackages {
    let mut packages = BrewfilePackages::default();

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some(captures) = directive_regex().captures(line) else {
            continue;
        };
        let package = PackageName {
            name: captures[2].to_string(),
        };
        match &captures[1] {
            "tap" => packages.taps.push(package),
            "brew" => packages.formulae.push(package),
            "cask" => packages.casks.push(package),
            _ => {}
        }
    }

    packages
}
