//! The read-only view of a mailbox that predicates compile against
//!
//! Compilation only ever looks things up through the `Mailbox` trait. Storage, locking and
//! consistency of the underlying data are the implementor's business.

pub mod memory;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{QueryError, LiteralKind};


pub type AccountId = Uuid;
pub type FolderId = i32;
pub type TagId = i32;


pub const FOLDER_USER_ROOT: FolderId = 1;
pub const FOLDER_INBOX: FolderId = 2;
pub const FOLDER_TRASH: FolderId = 3;
pub const FOLDER_JUNK: FolderId = 4;
pub const FOLDER_SENT: FolderId = 5;
pub const FOLDER_DRAFTS: FolderId = 6;
pub const FOLDER_CONTACTS: FolderId = 7;


/// Maps the folder names users may type without a path to their fixed ids
pub fn well_known_folder(name: &str) -> Option<FolderId> {
    match &name.to_lowercase()[..] {
        "inbox" => Some(FOLDER_INBOX),
        "trash" => Some(FOLDER_TRASH),
        "junk" => Some(FOLDER_JUNK),
        "sent" => Some(FOLDER_SENT),
        "drafts" => Some(FOLDER_DRAFTS),
        "contacts" => Some(FOLDER_CONTACTS),
        _ => None,
    }
}


/// An item id qualified by the account that owns the item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId {
    pub account: AccountId,
    pub id: i32,
}


impl ItemId {
    pub fn new(account: AccountId, id: i32) -> ItemId {
        ItemId {
            account: account,
            id: id,
        }
    }

    /// Parses `account:id` or a bare `id`, which belongs to `default_account`
    pub fn parse(text: &str, default_account: AccountId) -> Result<ItemId, QueryError> {
        let text = text.trim();

        let (account, id) = match text.rfind(':') {
            Some(split) => {
                let account = Uuid::from_str(&text[..split])
                    .map_err(|_| QueryError::invalid(LiteralKind::ItemId, text, "malformed account id"))?;
                (account, &text[split + 1..])
            }
            None => (default_account, text),
        };

        let id = id.parse::<i32>()
            .map_err(|_| QueryError::invalid(LiteralKind::ItemId, text, "expected an integer id"))?;

        Ok(ItemId::new(account, id))
    }

    pub fn belongs_to(&self, account: AccountId) -> bool {
        self.account == account
    }
}


impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.account, self.id)
    }
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderKind {
    Regular,
    Search,
    Mountpoint {
        owner: AccountId,
        remote_id: i32,
    },
}


impl Default for FolderKind {
    fn default() -> FolderKind {
        FolderKind::Regular
    }
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: FolderId,
    pub parent: Option<FolderId>,
    pub name: String,
    pub path: String,
    pub kind: FolderKind,
}


impl Folder {
    pub fn is_mountpoint(&self) -> bool {
        match self.kind {
            FolderKind::Mountpoint { .. } => true,
            _ => false,
        }
    }
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}


/// System flags, stored and searched like tags with fixed negative ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Sent,
    Attached,
    Answered,
    Forwarded,
    Flagged,
    Draft,
    Unread,
    Urgent,
    Bulk,
    Invite,
}


impl Flag {
    pub const ALL: [Flag; 10] = [
        Flag::Sent,
        Flag::Attached,
        Flag::Answered,
        Flag::Forwarded,
        Flag::Flagged,
        Flag::Draft,
        Flag::Unread,
        Flag::Urgent,
        Flag::Bulk,
        Flag::Invite,
    ];

    /// Looks a flag up by its name, with or without the leading backslash
    pub fn from_name(name: &str) -> Option<Flag> {
        let name = name.trim_start_matches('\\');

        Flag::ALL.iter().cloned().find(|flag| flag.name()[1..].eq_ignore_ascii_case(name))
    }

    pub fn id(&self) -> TagId {
        match *self {
            Flag::Sent => -1,
            Flag::Attached => -2,
            Flag::Answered => -3,
            Flag::Forwarded => -4,
            Flag::Flagged => -6,
            Flag::Draft => -7,
            Flag::Unread => -10,
            Flag::Urgent => -11,
            Flag::Bulk => -12,
            Flag::Invite => -16,
        }
    }

    pub fn name(&self) -> &'static str {
        match *self {
            Flag::Sent => "\\Sent",
            Flag::Attached => "\\Attached",
            Flag::Answered => "\\Answered",
            Flag::Forwarded => "\\Forwarded",
            Flag::Flagged => "\\Flagged",
            Flag::Draft => "\\Draft",
            Flag::Unread => "\\Unread",
            Flag::Urgent => "\\Urgent",
            Flag::Bulk => "\\Bulk",
            Flag::Invite => "\\Invite",
        }
    }
}


/// Lookups a predicate may perform while compiling
///
/// Every method may fail with `QueryError::NotFound`; callers propagate the failure rather
/// than treating it as an empty result.
pub trait Mailbox {
    fn account_id(&self) -> AccountId;

    fn account_name(&self) -> String;

    fn account_aliases(&self) -> Result<Vec<String>, QueryError>;

    fn folder_by_id(&self, id: FolderId) -> Result<Folder, QueryError>;

    /// Walks `path` from `root` as far as it resolves
    ///
    /// Returns the deepest folder reached and whatever part of the path is left over.
    fn folder_by_path(&self, root: FolderId, path: &str) -> Result<(Folder, Option<String>), QueryError>;

    /// The folder itself followed by every folder beneath it
    fn subfolder_hierarchy(&self, id: FolderId) -> Result<Vec<Folder>, QueryError>;

    fn tag_by_name(&self, name: &str) -> Result<Tag, QueryError>;
}
