pub mod error;
pub mod types;

pub use error::{CryptoError, Result};
pub use types::{
    FolderCreate, FolderNode, FolderTree, Note, NoteCreate, NoteUpdate, RegistrationKeys, Tag,
    TagCreate, TagNode, TagRef, TagUpdate,
};
