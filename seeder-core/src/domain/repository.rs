//! Repository domain types

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Default topic that opts a repository into management
pub const DEFAULT_TOPIC: &str = "ci-gocd";

/// A source-control repository as seen during one reconciliation cycle
///
/// The `name` is the join key with GoCD config repo registrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    pub name: String,
    pub clone_url: String,
    #[serde(default)]
    pub topics: BTreeSet<String>,
}

impl RepositoryDescriptor {
    pub fn new(
        name: impl Into<String>,
        clone_url: impl Into<String>,
        topics: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            clone_url: clone_url.into(),
            topics: topics.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact, case-sensitive topic match
    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.contains(topic)
    }
}

/// Keeps only the repositories carrying `topic`
///
/// Input order is preserved. Repositories repeating an already-seen name are
/// dropped so the result never holds two entries with the same join key.
pub fn filter_by_topic(
    repos: impl IntoIterator<Item = RepositoryDescriptor>,
    topic: &str,
) -> Vec<RepositoryDescriptor> {
    let mut seen = HashSet::new();

    repos
        .into_iter()
        .filter(|repo| repo.has_topic(topic))
        .filter(|repo| seen.insert(repo.name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(name: &str, topics: &[&str]) -> RepositoryDescriptor {
        RepositoryDescriptor::new(
            name,
            format!("https://github.com/acme/{name}.git"),
            topics.iter().copied(),
        )
    }

    #[test]
    fn test_has_topic_is_exact() {
        let r = repo("svc", &["ci-gocd-legacy", "CI-GOCD"]);
        assert!(!r.has_topic("ci-gocd"));
        assert!(r.has_topic("CI-GOCD"));
    }

    #[test]
    fn test_filter_by_topic() {
        let repos = vec![
            repo("a", &["ci-gocd"]),
            repo("b", &[]),
            repo("c", &["rust", "ci-gocd"]),
            repo("d", &["ci"]),
        ];

        let names: Vec<_> = filter_by_topic(repos, DEFAULT_TOPIC)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_filter_by_topic_drops_duplicate_names() {
        let repos = vec![repo("a", &["ci-gocd"]), repo("a", &["ci-gocd"])];
        assert_eq!(filter_by_topic(repos, DEFAULT_TOPIC).len(), 1);
    }

    #[test]
    fn test_missing_topics_deserialize_as_empty() {
        let r: RepositoryDescriptor =
            serde_json::from_str(r#"{"name":"a","clone_url":"https://x/a.git"}"#).unwrap();
        assert!(r.topics.is_empty());
    }
}
