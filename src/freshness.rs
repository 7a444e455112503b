//! Freshness policies for tool outputs.

use std::{
    fmt, fs,
    io::ErrorKind,
    path::Path,
    time::{Duration, SystemTime},
};

use tracing::debug;

/// Seconds in one hour.
const HOUR: u64 = 60 * 60;

/// Named maximum-age rule for a tool output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Regenerate after 24 hours.
    Daily,
    /// Regenerate after 7 days.
    Weekly,
    /// Regenerate after 30 days.
    Monthly,
    /// Never stale once the output exists.
    Manual,
}

impl Policy {
    /// All policies, in increasing maximum age.
    pub const ALL: [Self; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Manual];

    /// Look up a policy by its tag name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|policy| policy.name() == name)
    }

    /// Resolve a tag name, falling back to [`Policy::Manual`] for unknown names.
    pub fn from_name_or_manual(name: &str) -> Self {
        Self::from_name(name).unwrap_or(Self::Manual)
    }

    /// Tag name of the policy.
    pub fn name(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Manual => "manual",
        }
    }

    /// Maximum age before an output is stale.
    pub fn max_age(self) -> Duration {
        let hours = match self {
            Self::Daily => 24,
            Self::Weekly => 7 * 24,
            Self::Monthly => 30 * 24,
            // About a century: effectively never stale.
            Self::Manual => 100 * 365 * 24,
        };
        Duration::from_secs(hours * HOUR)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of checking an output against a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Freshness {
    /// Whether the output is present and younger than the policy allows.
    pub fresh: bool,
    /// Human-readable status, e.g. `fresh (3h ago)` or `missing`.
    pub message: String,
}

impl Freshness {
    /// Return true when the output does not exist.
    pub fn is_missing(&self) -> bool {
        self.message == "missing"
    }
}

/// Check whether the file at `path` satisfies the named policy right now.
pub fn check(path: &Path, policy: &str) -> Freshness {
    check_at(path, policy, SystemTime::now())
}

/// Check whether the file at `path` satisfies the named policy at `now`.
pub fn check_at(path: &Path, policy: &str, now: SystemTime) -> Freshness {
    let modified = match fs::metadata(path).and_then(|metadata| metadata.modified()) {
        Ok(modified) => modified,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            return Freshness {
                fresh: false,
                message: "missing".to_string(),
            };
        }
        Err(error) => {
            return Freshness {
                fresh: false,
                message: format!("error: {error}"),
            };
        }
    };

    // A modification time in the future counts as age zero.
    let age = now.duration_since(modified).unwrap_or_default();
    let max_age = Policy::from_name_or_manual(policy).max_age();
    let fresh = age < max_age;
    debug!(path = %path.display(), policy, ?age, fresh, "checked freshness");

    let prefix = if fresh { "fresh" } else { "stale" };
    Freshness {
        fresh,
        message: format!("{prefix} ({} ago)", format_age(age)),
    }
}

/// Render an age as whole minutes, hours, or days.
pub fn format_age(age: Duration) -> String {
    let hours = age.as_secs() / HOUR;
    let days = hours / 24;
    if days > 0 {
        format!("{days}d")
    } else if hours > 0 {
        format!("{hours}h")
    } else {
        format!("{}m", age.as_secs() / 60)
    }
}
