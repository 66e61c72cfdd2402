//! Recursive tree codec: decrypt whole workspace trees, encrypt outgoing
//! partial payloads
//!
//! The server returns folder and tag trees whose note titles, note bodies,
//! and tag names are cipher blobs. The decrypt pass walks every node and
//! produces a plaintext-equivalent tree for rendering; sibling fields fan
//! out concurrently and the pass completes only when every field has
//! resolved.
//!
//! One corrupted record must not block the rest of the workspace: a field
//! that fails to decrypt is replaced by an empty string and reported as a
//! [`FieldFailure`], and the caller decides whether to abort the render or
//! mark the single item.

use futures::future::{join_all, BoxFuture, FutureExt};
use tracing::warn;

use sealnote_core::{
    CryptoError, FolderNode, FolderTree, Note, NoteCreate, NoteUpdate, Result, Tag, TagCreate,
    TagNode, TagUpdate,
};

use crate::field::{decrypt_field, encrypt_field};
use crate::keys::MasterKey;

/// Separator between ancestor names in a tag's `parent_path`.
pub const PATH_SEPARATOR: &str = " › ";

/// Which kind of record a failed field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Note,
    Tag,
}

/// One field that could not be decrypted, identified precisely enough for
/// the UI to put an error marker on the affected item.
#[derive(Debug)]
pub struct FieldFailure {
    pub entity: EntityKind,
    pub id: i64,
    pub field: &'static str,
    pub error: CryptoError,
}

/// A decrypted folder tree plus whatever fields failed along the way.
#[derive(Debug)]
pub struct DecryptedFolderTree {
    pub tree: FolderTree,
    pub failures: Vec<FieldFailure>,
}

/// Decrypted tags assembled into their hierarchy.
#[derive(Debug)]
pub struct DecryptedTags {
    pub tags: Vec<TagNode>,
    pub failures: Vec<FieldFailure>,
}

fn decrypt_or_flag(
    blob: &str,
    mk: &MasterKey,
    entity: EntityKind,
    id: i64,
    field: &'static str,
    failures: &mut Vec<FieldFailure>,
) -> String {
    match decrypt_field(blob, mk) {
        Ok(plaintext) => plaintext,
        Err(error) => {
            warn!(?entity, id, field, %error, "field failed to decrypt, substituting placeholder");
            failures.push(FieldFailure {
                entity,
                id,
                field,
                error,
            });
            String::new()
        }
    }
}

async fn decrypt_note(mut note: Note, mk: &MasterKey) -> (Note, Vec<FieldFailure>) {
    let mut failures = Vec::new();

    note.title = decrypt_or_flag(&note.title, mk, EntityKind::Note, note.id, "title", &mut failures);
    note.content = decrypt_or_flag(
        &note.content,
        mk,
        EntityKind::Note,
        note.id,
        "content",
        &mut failures,
    );
    for tag in &mut note.tags {
        tag.name = decrypt_or_flag(&tag.name, mk, EntityKind::Tag, tag.id, "name", &mut failures);
    }

    (note, failures)
}

fn decrypt_folder<'a>(
    mut folder: FolderNode,
    mk: &'a MasterKey,
) -> BoxFuture<'a, (FolderNode, Vec<FieldFailure>)> {
    async move {
        // Folder names are not encrypted; only note and tag text is.
        let notes = std::mem::take(&mut folder.notes);
        let children = std::mem::take(&mut folder.children);

        let (notes, children) = futures::join!(
            join_all(notes.into_iter().map(|n| decrypt_note(n, mk))),
            join_all(children.into_iter().map(|c| decrypt_folder(c, mk))),
        );

        let mut failures = Vec::new();
        folder.notes = notes
            .into_iter()
            .map(|(note, f)| {
                failures.extend(f);
                note
            })
            .collect();
        folder.children = children
            .into_iter()
            .map(|(child, f)| {
                failures.extend(f);
                child
            })
            .collect();

        (folder, failures)
    }
    .boxed()
}

/// Decrypt every sensitive field in a folder tree: each note's title,
/// body, and attached tag names, recursively through child folders, plus
/// the flat list of orphaned notes.
///
/// Sibling decryptions are independent and joined wait-for-all; no
/// ordering between them may be assumed.
pub async fn decrypt_folder_tree(tree: FolderTree, mk: &MasterKey) -> DecryptedFolderTree {
    let (folders, orphans) = futures::join!(
        join_all(tree.folders.into_iter().map(|f| decrypt_folder(f, mk))),
        join_all(tree.orphaned_notes.into_iter().map(|n| decrypt_note(n, mk))),
    );

    let mut failures = Vec::new();
    let folders = folders
        .into_iter()
        .map(|(folder, f)| {
            failures.extend(f);
            folder
        })
        .collect();
    let orphaned_notes = orphans
        .into_iter()
        .map(|(note, f)| {
            failures.extend(f);
            note
        })
        .collect();

    DecryptedFolderTree {
        tree: FolderTree {
            folders,
            orphaned_notes,
        },
        failures,
    }
}

/// Decrypt a flat tag list and assemble the hierarchy.
///
/// Names are decrypted first (concurrently), then the tree is built from
/// `parent_id` links and each node's `parent_path` is computed from the
/// decrypted ancestor names — cipher blobs cannot be meaningfully joined,
/// so paths only exist after decryption.
pub async fn decrypt_tag_tree(tags: Vec<Tag>, mk: &MasterKey) -> DecryptedTags {
    let decrypted = join_all(tags.into_iter().map(|mut tag| async move {
        let mut failures = Vec::new();
        tag.name = decrypt_or_flag(&tag.name, mk, EntityKind::Tag, tag.id, "name", &mut failures);
        (tag, failures)
    }))
    .await;

    let mut failures = Vec::new();
    let flat: Vec<Tag> = decrypted
        .into_iter()
        .map(|(tag, f)| {
            failures.extend(f);
            tag
        })
        .collect();

    DecryptedTags {
        tags: build_tag_tree(&flat, None, ""),
        failures,
    }
}

fn build_tag_tree(tags: &[Tag], parent_id: Option<i64>, parent_path: &str) -> Vec<TagNode> {
    let mut result = Vec::new();
    for tag in tags.iter().filter(|t| t.parent_id == parent_id) {
        let current_path = if parent_path.is_empty() {
            tag.name.clone()
        } else {
            format!("{parent_path}{PATH_SEPARATOR}{}", tag.name)
        };

        result.push(TagNode {
            id: tag.id,
            name: tag.name.clone(),
            parent_id: tag.parent_id,
            created_at: tag.created_at.clone(),
            children: build_tag_tree(tags, Some(tag.id), &current_path),
            parent_path: parent_path.to_string(),
        });
    }
    result
}

/// Encrypt a note's text fields before creation. Structural fields
/// (`folder_id`) pass through untouched.
pub fn encrypt_note_create(mut note: NoteCreate, mk: &MasterKey) -> Result<NoteCreate> {
    note.title = encrypt_field(&note.title, mk)?;
    note.content = encrypt_field(&note.content, mk)?;
    Ok(note)
}

/// Encrypt a tag's name before creation.
pub fn encrypt_tag_create(mut tag: TagCreate, mk: &MasterKey) -> Result<TagCreate> {
    tag.name = encrypt_field(&tag.name, mk)?;
    Ok(tag)
}

/// Encrypt only the fields present in a partial note update. Absent
/// fields stay absent: an update that only renames a note must not touch,
/// re-encrypt, or re-transmit its content.
pub fn encrypt_note_update(mut update: NoteUpdate, mk: &MasterKey) -> Result<NoteUpdate> {
    if let Some(title) = update.title.as_deref() {
        update.title = Some(encrypt_field(title, mk)?);
    }
    if let Some(content) = update.content.as_deref() {
        update.content = Some(encrypt_field(content, mk)?);
    }
    Ok(update)
}

/// Encrypt only the fields present in a partial tag update.
pub fn encrypt_tag_update(mut update: TagUpdate, mk: &MasterKey) -> Result<TagUpdate> {
    if let Some(name) = update.name.as_deref() {
        update.name = Some(encrypt_field(name, mk)?);
    }
    Ok(update)
}
