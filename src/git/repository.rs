use crate::error::{GitTidyError, Result};
use git2::{
    AutotagOption, BranchType, Cred, CredentialType, Direction, ErrorCode, FetchOptions,
    FetchPrune, PushOptions, RemoteCallbacks, Repository as Git2Repo,
};
use log::{debug, info};
use std::cell::RefCell;
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn find_remote(&self, remote: &str) -> Result<git2::Remote<'_>> {
        self.repo
            .find_remote(remote)
            .map_err(|e| GitTidyError::remote(format!("Cannot find remote '{}': {}", remote, e)))
    }

    /// Push a single refspec, surfacing per-ref rejections as errors.
    fn push_refspec(&self, remote_name: &str, refspec: &str) -> Result<()> {
        let mut remote = self.find_remote(remote_name)?;

        let rejection: RefCell<Option<String>> = RefCell::new(None);
        let mut callbacks = credential_callbacks();
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                *rejection.borrow_mut() = Some(format!("{}: {}", refname, status));
            }
            Ok(())
        });

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(callbacks);

        remote
            .push(&[refspec], Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    GitTidyError::remote(format!("Network error during push: {}", e))
                } else {
                    GitTidyError::remote(format!("Push of '{}' failed: {}", refspec, e))
                }
            })?;

        let rejected = rejection.borrow_mut().take();
        match rejected {
            Some(reason) => Err(GitTidyError::remote(format!(
                "Remote rejected update: {}",
                reason
            ))),
            None => Ok(()),
        }
    }

    fn peel_commit(&self, refname: &str) -> Result<git2::Commit<'_>> {
        let object = self.repo.revparse_single(refname)?;
        Ok(object.peel_to_commit()?)
    }
}

/// SSH key, agent, and default credential lookup for remote operations.
fn credential_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }

            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }
        }

        Cred::default()
    });
    callbacks
}

impl super::RefSource for Git2Repository {
    fn fetch_and_prune(&self, remote_name: &str) -> Result<()> {
        let mut remote = self.find_remote(remote_name)?;

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(credential_callbacks());
        fetch_options.prune(FetchPrune::On);
        fetch_options.download_tags(AutotagOption::Auto);

        let refspec_heads = format!("+refs/heads/*:refs/remotes/{}/*", remote_name);
        remote
            .fetch(&[refspec_heads.as_str()], Some(&mut fetch_options), None)
            .map_err(|e| {
                GitTidyError::remote(format!(
                    "Failed to fetch from remote '{}': {}",
                    remote_name, e
                ))
            })?;

        info!("fetched and pruned remote '{}'", remote_name);
        Ok(())
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn list_remote_branches(&self, remote: &str) -> Result<Vec<String>> {
        let prefix = format!("{}/", remote);
        let mut names = Vec::new();

        for entry in self.repo.branches(Some(BranchType::Remote))? {
            let (branch, _) = entry?;
            if branch.get().symbolic_target().is_some() {
                continue;
            }
            let Some(name) = branch.name()? else {
                continue;
            };
            if let Some(short) = name.strip_prefix(&prefix) {
                if short != "HEAD" {
                    names.push(short.to_string());
                }
            }
        }

        Ok(names)
    }

    fn resolve_default_branch(&self, remote_name: &str) -> Result<String> {
        let head_ref = format!("refs/remotes/{}/HEAD", remote_name);
        let prefix = format!("refs/remotes/{}/", remote_name);

        match self.repo.find_reference(&head_ref) {
            Ok(reference) => {
                if let Some(target) = reference.symbolic_target() {
                    if let Some(name) = target.strip_prefix(&prefix) {
                        return Ok(name.to_string());
                    }
                }
            }
            Err(e) if e.code() == ErrorCode::NotFound => {
                debug!("{} not set, asking the remote", head_ref);
            }
            Err(e) => return Err(e.into()),
        }

        let mut remote = self.find_remote(remote_name)?;
        let connection = remote
            .connect_auth(Direction::Fetch, Some(credential_callbacks()), None)
            .map_err(|e| {
                GitTidyError::default_branch(format!(
                    "cannot connect to remote '{}': {}",
                    remote_name, e
                ))
            })?;
        let advertised = connection.default_branch().map_err(|e| {
            GitTidyError::default_branch(format!(
                "remote '{}' does not advertise a default branch: {}",
                remote_name, e
            ))
        })?;
        let advertised = advertised.as_str().ok_or_else(|| {
            GitTidyError::default_branch("default branch name is not valid UTF-8")
        })?;

        advertised
            .strip_prefix("refs/heads/")
            .map(|s| s.to_string())
            .ok_or_else(|| {
                GitTidyError::default_branch(format!(
                    "unexpected default branch ref '{}'",
                    advertised
                ))
            })
    }

    fn commit_timestamp(&self, refname: &str) -> Result<i64> {
        let commit = self.peel_commit(refname)?;
        Ok(commit.time().seconds())
    }

    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        let ancestor_oid = self.peel_commit(ancestor)?.id();
        let descendant_oid = self.peel_commit(descendant)?.id();

        if ancestor_oid == descendant_oid {
            return Ok(true);
        }

        Ok(self.repo.graph_descendant_of(descendant_oid, ancestor_oid)?)
    }

    fn delete_remote_branch(&self, remote: &str, name: &str) -> Result<()> {
        self.push_refspec(remote, &format!(":refs/heads/{}", name))?;

        // The push does not always update the tracking ref; drop it so the
        // branch does not reappear before the next fetch.
        match self
            .repo
            .find_reference(&format!("refs/remotes/{}/{}", remote, name))
        {
            Ok(mut reference) => reference.delete()?,
            Err(e) if e.code() == ErrorCode::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.repo.tag_delete(name)?;
        Ok(())
    }

    fn delete_remote_tag_ref(&self, remote: &str, name: &str) -> Result<()> {
        self.push_refspec(remote, &format!(":refs/tags/{}", name))
    }
}
