use regex::Regex;
use std::sync::OnceLock;

/// Branch name reserved for test fixtures; never deleted.
pub const RESERVED_BRANCH: &str = "test";

fn task_prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([0-9]{5})").expect("static regex"))
}

/// Extract the five-digit task ID at the start of a branch name.
///
/// `12345-fix-login` yields `Some(12345)`; `fix-12345` and `1234-x` yield `None`.
pub fn task_id(branch: &str) -> Option<u32> {
    task_prefix_pattern()
        .captures(branch)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Names that can never be deleted: the default branch, the reserved fixture
/// branch, and any configured extras.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedBranches {
    names: Vec<String>,
}

impl ProtectedBranches {
    pub fn new(default_branch: impl Into<String>, extra: &[String]) -> Self {
        let mut names = vec![default_branch.into(), RESERVED_BRANCH.to_string()];
        for name in extra {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        ProtectedBranches { names }
    }

    pub fn contains(&self, branch: &str) -> bool {
        self.names.iter().any(|n| n == branch)
    }
}
