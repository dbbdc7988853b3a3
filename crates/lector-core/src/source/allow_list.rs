use std::collections::HashSet;
use std::sync::Arc;

/// Immutable set of hosts that remote images may be fetched from.
///
/// Hosts are compared case-insensitively and must match exactly; there is
/// no subdomain or wildcard matching. Cloning is cheap.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    hosts: Arc<HashSet<String>>,
}

impl AllowList {
    /// The host allowed when nothing else is configured.
    pub const DEFAULT_HOST: &'static str = "discord.mx";

    /// Creates an allow-list from host names. Blank entries are ignored.
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hosts = hosts
            .into_iter()
            .map(|host| host.as_ref().trim().to_ascii_lowercase())
            .filter(|host| !host.is_empty())
            .collect();

        Self {
            hosts: Arc::new(hosts),
        }
    }

    /// Returns `true` if remote images may be fetched from `host`.
    pub fn contains(&self, host: &str) -> bool {
        self.hosts.contains(&host.to_ascii_lowercase())
    }

    /// Returns `true` if no host is allowed.
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Returns the allowed hosts in sorted order.
    pub fn hosts(&self) -> Vec<&str> {
        let mut hosts: Vec<&str> = self.hosts.iter().map(String::as_str).collect();
        hosts.sort_unstable();
        hosts
    }
}
