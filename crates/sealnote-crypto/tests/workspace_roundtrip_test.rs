//! Integration tests for the full zero-knowledge cycle: register a user,
//! encrypt a workspace the way the client would before upload, then log
//! in from a fresh session and decrypt the tree the server handed back.

use secrecy::SecretString;

use sealnote_core::{FolderNode, FolderTree, Note, Tag, TagRef};
use sealnote_crypto::{decrypt_tag_tree, encrypt_field, KdfParams, Session};

fn fast_session() -> Session {
    // Production default is 100k PBKDF2 iterations; tests lower it.
    Session::with_params(KdfParams { iterations: 10 })
}

fn encrypted_note(
    id: i64,
    title: &str,
    content: &str,
    folder_id: Option<i64>,
    session: &Session,
) -> Note {
    Note {
        id,
        title: session.encrypt_field(title).unwrap(),
        content: session.encrypt_field(content).unwrap(),
        folder_id,
        tags: Vec::new(),
        created_at: "2026-02-01T09:00:00Z".into(),
        updated_at: "2026-02-01T09:30:00Z".into(),
    }
}

#[tokio::test]
async fn full_workspace_roundtrip_across_sessions() {
    let password = SecretString::from("a perfectly adequate password");

    // Registration: fresh master key, wrapped for the server.
    let mut session = fast_session();
    let reg = session.register(&password).await.unwrap();

    // The client encrypts a workspace: folder "Work" with one note, a
    // child folder "Archive", and an "urgent" tag on the note.
    let urgent = TagRef {
        id: 31,
        name: session.encrypt_field("urgent").unwrap(),
    };
    let mut plan = encrypted_note(10, "Plan", "Draft v1", Some(1), &session);
    plan.tags = vec![urgent];

    let stored_tree = FolderTree {
        folders: vec![FolderNode {
            id: 1,
            name: "Work".into(),
            notes: vec![plan],
            children: vec![FolderNode {
                id: 2,
                name: "Archive".into(),
                notes: vec![],
                children: vec![],
            }],
        }],
        orphaned_notes: vec![encrypted_note(11, "Scratch", "loose thought", None, &session)],
    };

    // Simulate a later login on another device: only the salt and the
    // wrapped master key came from the server.
    let mut later = fast_session();
    later
        .unlock(&password, &reg.salt, &reg.wrapped_master_key)
        .await
        .unwrap();

    let result = later.decrypt_folder_tree(stored_tree).await.unwrap();
    assert!(result.failures.is_empty());

    let work = &result.tree.folders[0];
    assert_eq!(work.id, 1);
    assert_eq!(work.name, "Work");
    assert_eq!(work.notes[0].title, "Plan");
    assert_eq!(work.notes[0].content, "Draft v1");
    assert_eq!(work.notes[0].tags[0].name, "urgent");
    assert_eq!(work.children[0].name, "Archive");
    assert!(work.children[0].notes.is_empty());

    let orphan = &result.tree.orphaned_notes[0];
    assert_eq!(orphan.id, 11);
    assert_eq!(orphan.title, "Scratch");
    assert_eq!(orphan.content, "loose thought");
}

#[tokio::test]
async fn tag_tree_roundtrip_via_json_wire_shape() {
    let mut session = fast_session();
    session
        .register(&SecretString::from("password"))
        .await
        .unwrap();
    let mk = session.master_key().unwrap();

    let flat = vec![
        Tag {
            id: 1,
            name: encrypt_field("reading", &mk).unwrap(),
            parent_id: None,
            created_at: "2026-02-01T00:00:00Z".into(),
        },
        Tag {
            id: 2,
            name: encrypt_field("papers", &mk).unwrap(),
            parent_id: Some(1),
            created_at: "2026-02-01T00:00:00Z".into(),
        },
    ];

    // Through the JSON shape the transport layer would deliver.
    let wire = serde_json::to_string(&flat).unwrap();
    let parsed: Vec<Tag> = serde_json::from_str(&wire).unwrap();

    let result = decrypt_tag_tree(parsed, &mk).await;
    assert!(result.failures.is_empty());
    assert_eq!(result.tags[0].name, "reading");
    assert_eq!(result.tags[0].children[0].name, "papers");
    assert_eq!(result.tags[0].children[0].parent_path, "reading");
}

#[tokio::test]
async fn logout_blocks_tree_decryption() {
    let mut session = fast_session();
    session
        .register(&SecretString::from("password"))
        .await
        .unwrap();

    let tree = FolderTree {
        folders: vec![],
        orphaned_notes: vec![encrypted_note(1, "t", "c", None, &session)],
    };

    session.lock();
    let result = session.decrypt_folder_tree(tree).await;
    assert!(matches!(
        result,
        Err(sealnote_core::CryptoError::NotAuthenticated)
    ));
}

#[tokio::test]
async fn wrong_master_key_yields_per_field_failures_not_garbage() {
    let mut alice = fast_session();
    alice
        .register(&SecretString::from("alice's password"))
        .await
        .unwrap();

    let mut mallory = fast_session();
    mallory
        .register(&SecretString::from("mallory's password"))
        .await
        .unwrap();

    let tree = FolderTree {
        folders: vec![],
        orphaned_notes: vec![encrypted_note(1, "private", "contents", None, &alice)],
    };

    // Every field fails the tag check under the wrong key; nothing is
    // silently rendered as corrupted plaintext.
    let result = mallory.decrypt_folder_tree(tree).await.unwrap();
    assert_eq!(result.failures.len(), 2);
    assert_eq!(result.tree.orphaned_notes[0].title, "");
    assert_eq!(result.tree.orphaned_notes[0].content, "");
}
