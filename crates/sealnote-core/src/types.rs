use serde::{Deserialize, Serialize};

/// A note as the server stores and returns it.
///
/// `title` and `content` are opaque cipher blobs at rest and in transit;
/// they hold plaintext only inside a decrypted in-memory tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub folder_id: Option<i64>,
    /// Tags attached to this note; `name` is a cipher blob at rest.
    #[serde(default)]
    pub tags: Vec<TagRef>,
    pub created_at: String,
    pub updated_at: String,
}

/// A tag reference embedded in a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub id: i64,
    pub name: String,
}

/// One folder in the nested tree response.
///
/// Folder names travel in plaintext; only note and tag text is encrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    pub id: i64,
    pub name: String,
    pub notes: Vec<Note>,
    pub children: Vec<FolderNode>,
}

/// The full workspace tree: root folders plus notes with no folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderTree {
    pub folders: Vec<FolderNode>,
    pub orphaned_notes: Vec<Note>,
}

/// A tag row as the server returns it: a flat record linked by `parent_id`.
/// The hierarchy is assembled client-side after decryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub created_at: String,
}

/// A tag with its children resolved and its ancestor path computed.
///
/// `parent_path` concatenates decrypted ancestor names from the root down
/// to this tag's parent. It can only be computed after decryption, since
/// cipher blobs cannot be meaningfully joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagNode {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub created_at: String,
    pub children: Vec<TagNode>,
    pub parent_path: String,
}

/// Payload for creating a note. Sent with `title`/`content` encrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteCreate {
    pub title: String,
    pub content: String,
    pub folder_id: Option<i64>,
}

/// Partial note update. Absent fields are not transmitted and must not be
/// re-encrypted; the server leaves them untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// `Some(None)` moves the note out of its folder; `None` leaves the
    /// assignment alone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<Option<i64>>,
}

/// Payload for creating a tag. Sent with `name` encrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCreate {
    pub name: String,
    pub parent_id: Option<i64>,
}

/// Partial tag update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Option<i64>>,
}

/// Payload for creating a folder. Folder names are not encrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderCreate {
    pub name: String,
    pub parent_id: Option<i64>,
}

/// Key material produced at registration, destined for the user record.
/// The salt is public; the master key appears only in wrapped form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationKeys {
    pub salt: String,
    pub wrapped_master_key: String,
}
