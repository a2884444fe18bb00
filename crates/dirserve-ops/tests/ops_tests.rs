use dirserve_core::{PathGuard, Root, ServeError};
use dirserve_ops::{Mutation, MutationExecutor, MutationOutcome, UploadedFile};
use std::fs;
use tempfile::TempDir;

fn executor(writes: bool) -> (TempDir, MutationExecutor) {
    let temp = TempDir::new().unwrap();
    let root = Root::resolve(temp.path().join("root")).unwrap();
    let executor = MutationExecutor::new(PathGuard::new(root)).with_writes(writes);
    (temp, executor)
}

fn entries(dir: &std::path::Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

#[tokio::test]
async fn test_stub_mode_never_touches_disk() {
    let (temp, executor) = executor(false);
    let root = temp.path().join("root");
    assert!(!executor.writes_enabled());

    let report = executor
        .execute(Mutation::create_folder("new-folder"))
        .await
        .unwrap();
    assert_eq!(report.outcome, MutationOutcome::Accepted);
    assert_eq!(report.path, "new-folder");

    let report = executor
        .execute(Mutation::replace("file.txt", b"content".to_vec()))
        .await
        .unwrap();
    assert_eq!(report.outcome, MutationOutcome::Accepted);

    let report = executor
        .execute(Mutation::upload(
            "",
            vec![UploadedFile::new("up.txt", b"up".to_vec())],
        ))
        .await
        .unwrap();
    assert_eq!(report.outcome, MutationOutcome::Accepted);

    assert_eq!(entries(&root), 0);
}

#[tokio::test]
async fn test_stub_mode_still_validates_paths() {
    let (temp, executor) = executor(false);

    for mutation in [
        Mutation::create_folder("../escape"),
        Mutation::replace("../../etc/passwd", b"x".to_vec()),
        Mutation::upload("missing", Vec::new()),
    ] {
        assert!(matches!(
            executor.execute(mutation).await,
            Err(ServeError::BadRequest { .. })
        ));
    }

    let root = temp.path().join("root");
    fs::write(root.join("plain"), b"p").unwrap();

    assert!(matches!(
        executor
            .execute(Mutation::upload(
                "plain",
                vec![UploadedFile::new("a.txt", b"a".to_vec())],
            ))
            .await,
        Err(ServeError::NotFound { .. })
    ));
    assert!(matches!(
        executor
            .execute(Mutation::upload(
                "",
                vec![UploadedFile::new("../evil", b"evil".to_vec())],
            ))
            .await,
        Err(ServeError::BadRequest { .. })
    ));
    assert!(matches!(
        executor
            .execute(Mutation::upload("", Vec::new()))
            .await,
        Err(ServeError::BadRequest { .. })
    ));
    assert!(!temp.path().join("evil").exists());
}

#[tokio::test]
async fn test_write_mode_applies_mutations() {
    let (temp, executor) = executor(true);
    let root = temp.path().join("root");

    let report = executor
        .execute(Mutation::create_folder("docs"))
        .await
        .unwrap();
    assert_eq!(report.outcome, MutationOutcome::Created);
    assert!(root.join("docs").is_dir());

    let report = executor
        .execute(Mutation::replace("docs/readme.md", b"# v1".to_vec()))
        .await
        .unwrap();
    assert_eq!(report.outcome, MutationOutcome::Created);
    assert_eq!(report.path, "docs/readme.md");

    let report = executor
        .execute(Mutation::replace("docs/readme.md", b"# v2".to_vec()))
        .await
        .unwrap();
    assert_eq!(report.outcome, MutationOutcome::Replaced);
    assert_eq!(fs::read(root.join("docs").join("readme.md")).unwrap(), b"# v2");

    let report = executor
        .execute(Mutation::upload(
            "docs",
            vec![UploadedFile::new("photo.jpg", vec![0xff, 0xd8])],
        ))
        .await
        .unwrap();
    assert_eq!(
        report.outcome,
        MutationOutcome::Uploaded {
            files: vec!["photo.jpg".to_string()]
        }
    );
    assert_eq!(entries(&root.join("docs")), 2);
}

#[tokio::test]
async fn test_write_mode_rejects_escape() {
    let (temp, executor) = executor(true);

    assert!(matches!(
        executor.execute(Mutation::create_folder("../sibling")).await,
        Err(ServeError::BadRequest { .. })
    ));
    assert!(!temp.path().join("sibling").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_write_through_escaping_symlink_parent_is_rejected() {
    use std::os::unix::fs::symlink;

    let (temp, executor) = executor(true);
    let outside = temp.path().join("outside");
    fs::create_dir(&outside).unwrap();
    symlink(&outside, temp.path().join("root").join("link")).unwrap();

    assert!(matches!(
        executor
            .execute(Mutation::replace("link/planted.txt", b"x".to_vec()))
            .await,
        Err(ServeError::BadRequest { .. })
    ));
    assert!(!outside.join("planted.txt").exists());
}
