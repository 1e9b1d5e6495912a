/// Security-focused integration tests
///
/// These tests verify security boundaries: symlinks, path traversal, caller-supplied names
mod common;

use claude_viewer::{SearchEngine, ViewerError};
use common::{ConversationFileBuilder, ProjectsDirBuilder, RecordBuilder, catalog_for};

#[test]
#[cfg(unix)] // Symlinks work differently on Windows
fn test_security_symlink_project_directory_rejected() {
    use std::os::unix::fs::symlink;

    let outside = ProjectsDirBuilder::new()
        .with_project(
            "sensitive",
            &[ConversationFileBuilder::new("secret.jsonl")
                .with_record(RecordBuilder::user().text("secret data"))],
        )
        .build();
    let root = ProjectsDirBuilder::new().build();
    symlink(outside.path().join("sensitive"), root.path().join("-Users-test-malicious")).unwrap();

    let catalog = catalog_for(root.path());
    assert!(catalog.list_projects().is_empty(), "Symlinked project must be skipped");
    assert!(catalog.list_conversations("-Users-test-malicious").is_empty());
    assert!(matches!(
        catalog.read_conversation("-Users-test-malicious", "secret.jsonl"),
        Err(ViewerError::InvalidInput(_))
    ));
    assert!(SearchEngine::new(&catalog).search("secret").unwrap().results.is_empty());
}

#[test]
#[cfg(unix)]
fn test_security_symlink_conversation_file_rejected() {
    use std::os::unix::fs::symlink;

    let outside = tempfile::TempDir::new().unwrap();
    let target = outside.path().join("secret.jsonl");
    std::fs::write(&target, r#"{"type":"user","message":{"content":"secret data"}}"#).unwrap();

    let root = ProjectsDirBuilder::new()
        .with_project(
            "-srv-app",
            &[ConversationFileBuilder::new("real.jsonl")
                .with_record(RecordBuilder::user().text("public data"))],
        )
        .build();
    symlink(&target, root.path().join("-srv-app").join("linked.jsonl")).unwrap();

    let catalog = catalog_for(root.path());

    let conversations = catalog.list_conversations("-srv-app");
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].filename, "real.jsonl");
    assert_eq!(catalog.list_projects()[0].stats.conversation_count, 1);

    assert!(matches!(
        catalog.read_conversation("-srv-app", "linked.jsonl"),
        Err(ViewerError::InvalidInput(_))
    ));
    assert!(SearchEngine::new(&catalog).search("secret").unwrap().results.is_empty());
}

#[test]
fn test_security_project_id_traversal_rejected() {
    let root = ProjectsDirBuilder::new()
        .with_project(
            "-srv-app",
            &[ConversationFileBuilder::new("a.jsonl").with_record(RecordBuilder::user().text("hi"))],
        )
        .build();
    let catalog = catalog_for(root.path());

    for id in ["..", ".", "../-srv-app", "-srv-app/..", "a\\b", "", "x\0y"] {
        assert!(
            matches!(catalog.read_conversation(id, "a.jsonl"), Err(ViewerError::InvalidInput(_))),
            "id {:?} must be rejected",
            id
        );
        assert!(catalog.list_conversations(id).is_empty());
    }
}

#[test]
fn test_security_filename_traversal_rejected() {
    let root = ProjectsDirBuilder::new()
        .with_project(
            "-srv-app",
            &[ConversationFileBuilder::new("a.jsonl").with_record(RecordBuilder::user().text("hi"))],
        )
        .build();
    let catalog = catalog_for(root.path());

    for filename in ["../a.jsonl", "../../etc/passwd", "sub/a.jsonl", "a.json", "..jsonl", ""] {
        assert!(
            matches!(
                catalog.read_conversation("-srv-app", filename),
                Err(ViewerError::InvalidInput(_))
            ),
            "filename {:?} must be rejected",
            filename
        );
    }
}

#[test]
fn test_security_directory_named_like_conversation_not_read() {
    let root = ProjectsDirBuilder::new()
        .with_project(
            "-srv-app",
            &[ConversationFileBuilder::new("a.jsonl").with_record(RecordBuilder::user().text("hi"))],
        )
        .build();
    std::fs::create_dir(root.path().join("-srv-app").join("dir.jsonl")).unwrap();
    let catalog = catalog_for(root.path());

    assert_eq!(catalog.list_conversations("-srv-app").len(), 1);
    assert!(matches!(
        catalog.read_conversation("-srv-app", "dir.jsonl"),
        Err(ViewerError::NotFound(_))
    ));
}

#[test]
fn test_security_overlong_query_rejected() {
    let root = ProjectsDirBuilder::new().build();
    let catalog = catalog_for(root.path());

    // 201 multi-byte characters is still measured in characters
    let query = "ü".repeat(201);
    assert!(matches!(
        SearchEngine::new(&catalog).search(&query),
        Err(ViewerError::InvalidInput(_))
    ));
    assert!(SearchEngine::new(&catalog).search(&"ü".repeat(200)).is_ok());
}
