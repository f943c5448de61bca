// tests/git2_repository_test.rs
//
// Exercises the git2 adapter against a real working repository whose
// "origin" is a bare repository on disk.
use git2::{Oid, Repository, Signature, Time};
use git_tidy::git::{remote_branch_ref, Git2Repository, RefSource};
use git_tidy::GitTidyError;
use tempfile::TempDir;

struct Fixture {
    dirs: (TempDir, TempDir),
    bare_path: std::path::PathBuf,
    adapter: Git2Repository,
    c1_time: i64,
}

fn commit(repo: &Repository, refname: &str, parents: &[Oid], seconds: i64, message: &str) -> Oid {
    let sig = Signature::new("Test User", "test@example.com", &Time::new(seconds, 0))
        .expect("Could not create signature");
    let tree_id = repo
        .treebuilder(None)
        .and_then(|b| b.write())
        .expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let parents: Vec<git2::Commit> = parents
        .iter()
        .map(|oid| repo.find_commit(*oid).expect("Could not find parent"))
        .collect();
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
    repo.commit(Some(refname), &sig, &sig, message, &tree, &parent_refs)
        .expect("Could not create commit")
}

fn setup() -> Fixture {
    let bare_dir = TempDir::new().expect("Could not create temp dir");
    let work_dir = TempDir::new().expect("Could not create temp dir");

    let bare = Repository::init_bare(bare_dir.path()).expect("Could not init bare repo");
    let work = Repository::init(work_dir.path()).expect("Could not init git repo");

    let c1_time = 1_600_000_000;
    let c1 = commit(&work, "refs/heads/main", &[], c1_time, "initial");
    let _c2 = commit(&work, "refs/heads/main", &[c1], c1_time + 100, "second");
    commit(&work, "refs/heads/feature-open", &[c1], c1_time + 200, "diverged");
    work.reference("refs/heads/feature-merged", c1, true, "fixture")
        .expect("Could not create branch");

    {
        let tagger =
            Signature::new("Tagger", "t@example.com", &Time::new(c1_time + 9_999, 0)).unwrap();
        let c1_obj = work.find_object(c1, None).unwrap();
        work.tag("0001", &c1_obj, &tagger, "annotated", false)
            .expect("Could not create annotated tag");
        let main_obj = work.revparse_single("refs/heads/main").unwrap();
        work.tag_lightweight("0002", &main_obj, false)
            .expect("Could not create tag");

        let mut origin = work
            .remote("origin", bare_dir.path().to_str().unwrap())
            .expect("Could not add remote");
        origin
            .push(
                &[
                    "refs/heads/main:refs/heads/main",
                    "refs/heads/feature-open:refs/heads/feature-open",
                    "refs/heads/feature-merged:refs/heads/feature-merged",
                    "refs/tags/0001:refs/tags/0001",
                    "refs/tags/0002:refs/tags/0002",
                ],
                None,
            )
            .expect("Could not push fixture refs");
    }
    bare.set_head("refs/heads/main").expect("Could not set bare HEAD");

    let bare_path = bare_dir.path().to_path_buf();
    let adapter = Git2Repository::from_git2(work);
    adapter.fetch_and_prune("origin").expect("fetch should succeed");

    Fixture {
        dirs: (bare_dir, work_dir),
        bare_path,
        adapter,
        c1_time,
    }
}

fn set_origin_head(fixture: &Fixture) {
    let work = Repository::open(fixture.dirs.1.path()).unwrap();
    work.reference_symbolic(
        "refs/remotes/origin/HEAD",
        "refs/remotes/origin/main",
        true,
        "fixture",
    )
    .expect("Could not set origin/HEAD");
}

fn clear_origin_head(fixture: &Fixture) {
    let work = Repository::open(fixture.dirs.1.path()).unwrap();
    if let Ok(mut head) = work.find_reference("refs/remotes/origin/HEAD") {
        head.delete().expect("Could not delete origin/HEAD");
    };
}

fn sorted(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names
}

#[test]
fn test_list_remote_branches_excludes_head_alias() {
    let fixture = setup();
    set_origin_head(&fixture);

    let branches = sorted(fixture.adapter.list_remote_branches("origin").unwrap());
    assert_eq!(branches, vec!["feature-merged", "feature-open", "main"]);
}

#[test]
fn test_resolve_default_branch_from_origin_head() {
    let fixture = setup();
    set_origin_head(&fixture);

    assert_eq!(
        fixture.adapter.resolve_default_branch("origin").unwrap(),
        "main"
    );
}

#[test]
fn test_resolve_default_branch_asks_remote_without_origin_head() {
    let fixture = setup();
    clear_origin_head(&fixture);

    assert_eq!(
        fixture.adapter.resolve_default_branch("origin").unwrap(),
        "main"
    );
}

#[test]
fn test_resolve_default_branch_fails_when_remote_has_none() {
    let fixture = setup();
    clear_origin_head(&fixture);

    // HEAD on an unborn branch is not advertised by the remote.
    let bare = Repository::open_bare(&fixture.bare_path).unwrap();
    bare.set_head("refs/heads/unborn")
        .expect("Could not point bare HEAD at unborn branch");

    let err = fixture
        .adapter
        .resolve_default_branch("origin")
        .unwrap_err();
    assert!(matches!(err, GitTidyError::DefaultBranch(_)));
}

#[test]
fn test_ancestry_between_remote_branches() {
    let fixture = setup();

    let main = remote_branch_ref("origin", "main");

    assert!(fixture
        .adapter
        .is_ancestor(&remote_branch_ref("origin", "feature-merged"), &main)
        .unwrap());
    assert!(!fixture
        .adapter
        .is_ancestor(&remote_branch_ref("origin", "feature-open"), &main)
        .unwrap());
    assert!(fixture
        .adapter
        .is_ancestor(&remote_branch_ref("origin", "ghost"), &main)
        .is_err());
}

#[test]
fn test_ancestry_ignores_local_branch_shadowing_tracking_ref() {
    let fixture = setup();

    // A local branch literally named "origin/feature-open" pointing at a
    // commit that is merged into main.
    let work = Repository::open(fixture.dirs.1.path()).unwrap();
    let root = work
        .revparse_single("refs/heads/feature-merged")
        .unwrap()
        .id();
    work.reference("refs/heads/origin/feature-open", root, true, "shadow")
        .expect("Could not create shadowing branch");

    assert!(!fixture
        .adapter
        .is_ancestor(
            &remote_branch_ref("origin", "feature-open"),
            &remote_branch_ref("origin", "main"),
        )
        .unwrap());
}

#[test]
fn test_commit_timestamp_dereferences_annotated_tag() {
    let fixture = setup();

    assert_eq!(
        fixture.adapter.commit_timestamp("refs/tags/0001").unwrap(),
        fixture.c1_time
    );
    assert_eq!(
        fixture.adapter.commit_timestamp("refs/tags/0002").unwrap(),
        fixture.c1_time + 100
    );
    assert!(fixture.adapter.commit_timestamp("refs/tags/9999").is_err());
}

#[test]
fn test_delete_remote_branch() {
    let fixture = setup();

    fixture
        .adapter
        .delete_remote_branch("origin", "feature-merged")
        .unwrap();

    let bare = Repository::open_bare(&fixture.bare_path).unwrap();
    assert!(bare.find_reference("refs/heads/feature-merged").is_err());
    let branches = fixture.adapter.list_remote_branches("origin").unwrap();
    assert!(!branches.contains(&"feature-merged".to_string()));
}

#[test]
fn test_fetch_prunes_deleted_remote_branches() {
    let fixture = setup();

    let bare = Repository::open_bare(&fixture.bare_path).unwrap();
    bare.find_reference("refs/heads/feature-open")
        .unwrap()
        .delete()
        .unwrap();

    fixture.adapter.fetch_and_prune("origin").unwrap();
    let branches = fixture.adapter.list_remote_branches("origin").unwrap();
    assert!(!branches.contains(&"feature-open".to_string()));
}

#[test]
fn test_delete_tag_local_and_remote() {
    let fixture = setup();

    fixture.adapter.delete_tag("0002").unwrap();
    fixture
        .adapter
        .delete_remote_tag_ref("origin", "0002")
        .unwrap();

    let tags = fixture.adapter.list_tags().unwrap();
    assert_eq!(tags, vec!["0001"]);
    let bare = Repository::open_bare(&fixture.bare_path).unwrap();
    assert!(bare.find_reference("refs/tags/0002").is_err());
}

#[test]
fn test_missing_remote_is_an_error() {
    let fixture = setup();
    assert!(fixture.adapter.fetch_and_prune("upstream").is_err());
}
