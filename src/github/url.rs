//! Repository link parsing
//!
//! Handles SSH (`git@github.com:owner/repo.git`), HTTPS
//! (`https://github.com/owner/repo`, optionally with `.git` or a trailing
//! `/tree/<branch>` path), scheme-less (`github.com/owner/repo`) and bare
//! `owner/repo` forms.

use thiserror::Error;

const GITHUB_HOST: &str = "github.com";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlParseError {
    #[error("Enter a repository link")]
    Empty,

    #[error("Only GitHub repositories are supported (got host '{0}')")]
    UnsupportedHost(String),

    #[error("Link must point at a repository (owner/repo)")]
    MissingRepository,

    #[error("'{0}' is not a valid GitHub name")]
    InvalidName(String),
}

/// Owner and repository name parsed from a link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Parse owner/repo from a repository link
pub fn parse_repo_url(input: &str) -> Result<RepoRef, UrlParseError> {
    let url = input.trim();
    if url.is_empty() {
        return Err(UrlParseError::Empty);
    }

    // SSH format: git@github.com:owner/repo.git
    if let Some(rest) = url.strip_prefix("git@") {
        let (host, path) = rest.split_once(':').ok_or(UrlParseError::MissingRepository)?;
        check_host(host)?;
        return split_path(path);
    }

    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .or_else(|| url.strip_prefix("ssh://git@"));

    match without_scheme {
        Some(rest) => {
            let (host, path) = rest.split_once('/').ok_or(UrlParseError::MissingRepository)?;
            check_host(host)?;
            split_path(path)
        }
        None => {
            // Scheme-less: github.com/owner/repo, or just owner/repo
            let first = url.split('/').next().unwrap_or_default();
            if first.eq_ignore_ascii_case(GITHUB_HOST) || first.eq_ignore_ascii_case("www.github.com") {
                let (_, path) = url.split_once('/').ok_or(UrlParseError::MissingRepository)?;
                split_path(path)
            } else if first.contains('.') && url.matches('/').count() >= 2 {
                Err(UrlParseError::UnsupportedHost(first.to_string()))
            } else {
                split_path(url)
            }
        }
    }
}

fn check_host(host: &str) -> Result<(), UrlParseError> {
    let host = host.split(':').next().unwrap_or(host).to_lowercase();
    if host == GITHUB_HOST || host == "www.github.com" {
        Ok(())
    } else {
        Err(UrlParseError::UnsupportedHost(host))
    }
}

fn split_path(path: &str) -> Result<RepoRef, UrlParseError> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let owner = segments.next().ok_or(UrlParseError::MissingRepository)?;
    let repo = segments.next().ok_or(UrlParseError::MissingRepository)?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    validate_name(owner)?;
    validate_name(repo)?;

    Ok(RepoRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

fn validate_name(name: &str) -> Result<(), UrlParseError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(UrlParseError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(owner: &str, repo: &str) -> Result<RepoRef, UrlParseError> {
        Ok(RepoRef {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    #[test]
    fn test_parse_repo_from_ssh_url() {
        assert_eq!(parse_repo_url("git@github.com:owner/my-repo.git"), parsed("owner", "my-repo"));
    }

    #[test]
    fn test_parse_repo_from_https_url() {
        assert_eq!(parse_repo_url("https://github.com/owner/my-repo.git"), parsed("owner", "my-repo"));
        assert_eq!(parse_repo_url("https://github.com/acme/widget"), parsed("acme", "widget"));
        assert_eq!(parse_repo_url("  https://github.com/acme/widget/  "), parsed("acme", "widget"));
    }

    #[test]
    fn test_parse_repo_with_tree_path() {
        assert_eq!(
            parse_repo_url("https://github.com/acme/widget/tree/dev"),
            parsed("acme", "widget")
        );
        assert_eq!(parse_repo_url("https://github.com/acme/widget?tab=readme"), parsed("acme", "widget"));
    }

    #[test]
    fn test_parse_repo_without_scheme() {
        assert_eq!(parse_repo_url("github.com/acme/widget"), parsed("acme", "widget"));
        assert_eq!(parse_repo_url("foo/bar"), parsed("foo", "bar"));
    }

    #[test]
    fn test_parse_repo_rejects_other_hosts() {
        assert_eq!(
            parse_repo_url("https://gitlab.com/acme/widget"),
            Err(UrlParseError::UnsupportedHost("gitlab.com".into()))
        );
        assert_eq!(
            parse_repo_url("gitlab.com/acme/widget"),
            Err(UrlParseError::UnsupportedHost("gitlab.com".into()))
        );
    }

    #[test]
    fn test_parse_repo_incomplete() {
        assert_eq!(parse_repo_url(""), Err(UrlParseError::Empty));
        assert_eq!(parse_repo_url("https://github.com/acme"), Err(UrlParseError::MissingRepository));
        assert_eq!(parse_repo_url("acme"), Err(UrlParseError::MissingRepository));
        assert_eq!(
            parse_repo_url("https://github.com/acme/wid get"),
            Err(UrlParseError::InvalidName("wid get".into()))
        );
    }
}
