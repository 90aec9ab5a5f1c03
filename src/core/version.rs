//! Numeric tool versions parsed from `--version` output.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"version\s*([\d.]+)").expect("valid version regex"));

/// A dotted numeric version such as `3.16.3`.
///
/// Comparison is component-wise and numeric; missing trailing components
/// count as zero, so `3.1` == `3.1.0`.
#[derive(Debug, Clone)]
pub struct ToolVersion {
    components: Vec<u64>,
}

impl ToolVersion {
    pub fn new(components: impl Into<Vec<u64>>) -> Self {
        ToolVersion {
            components: components.into(),
        }
    }

    /// Extract the version from a probe such as `cmake version 3.16.3`.
    pub fn from_probe_output(output: &str) -> Option<Self> {
        let captures = VERSION_RE.captures(output)?;
        captures.get(1)?.as_str().parse().ok()
    }

    fn component(&self, i: usize) -> u64 {
        self.components.get(i).copied().unwrap_or(0)
    }
}

impl FromStr for ToolVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components = s
            .split('.')
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| format!("invalid version component '{}' in '{}'", part, s))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if components.is_empty() {
            return Err(format!("invalid version '{}'", s));
        }

        Ok(ToolVersion { components })
    }
}

impl Ord for ToolVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for ToolVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ToolVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ToolVersion {}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components.iter().map(u64::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}
