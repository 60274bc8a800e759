use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::error::{QueryError, Reference};
use super::{Mailbox, AccountId, Folder, FolderId, FolderKind, Tag, TagId};
use super::{FOLDER_USER_ROOT, FOLDER_INBOX, FOLDER_TRASH, FOLDER_JUNK, FOLDER_SENT, FOLDER_DRAFTS, FOLDER_CONTACTS};


/// A mailbox held entirely in memory
///
/// Starts out with the root folder and the system folders every mailbox has.
#[derive(Debug, Clone)]
pub struct MemoryMailbox {
    account_id: AccountId,
    account_name: String,
    aliases: Vec<String>,
    folders: BTreeMap<FolderId, Folder>,
    tags: BTreeMap<String, Tag>,
}


impl MemoryMailbox {
    pub fn new(account_id: AccountId, account_name: &str) -> MemoryMailbox {
        let mut mailbox = MemoryMailbox {
            account_id: account_id,
            account_name: account_name.to_owned(),
            aliases: Vec::new(),
            folders: BTreeMap::new(),
            tags: BTreeMap::new(),
        };

        mailbox.folders.insert(FOLDER_USER_ROOT, Folder {
            id: FOLDER_USER_ROOT,
            parent: None,
            name: String::new(),
            path: "/".to_owned(),
            kind: FolderKind::Regular,
        });

        let system_folders = [
            (FOLDER_INBOX, "Inbox"),
            (FOLDER_TRASH, "Trash"),
            (FOLDER_JUNK, "Junk"),
            (FOLDER_SENT, "Sent"),
            (FOLDER_DRAFTS, "Drafts"),
            (FOLDER_CONTACTS, "Contacts"),
        ];

        for &(id, name) in system_folders.iter() {
            mailbox.insert_folder(FOLDER_USER_ROOT, id, name, FolderKind::Regular);
        }

        mailbox
    }

    pub fn add_alias(&mut self, alias: &str) {
        self.aliases.push(alias.to_owned());
    }

    pub fn add_folder(&mut self, parent: FolderId, id: FolderId, name: &str) -> Result<(), QueryError> {
        self.add_folder_of_kind(parent, id, name, FolderKind::Regular)
    }

    pub fn add_search_folder(&mut self, parent: FolderId, id: FolderId, name: &str) -> Result<(), QueryError> {
        self.add_folder_of_kind(parent, id, name, FolderKind::Search)
    }

    /// Adds a folder that aliases `remote_id` in the mailbox of `owner`
    ///
    /// When `owner` is this mailbox's own account the mountpoint is local.
    pub fn add_mountpoint(&mut self, parent: FolderId, id: FolderId, name: &str, owner: AccountId, remote_id: i32) -> Result<(), QueryError> {
        self.add_folder_of_kind(parent, id, name, FolderKind::Mountpoint {
            owner: owner,
            remote_id: remote_id,
        })
    }

    pub fn add_tag(&mut self, id: TagId, name: &str) {
        self.tags.insert(name.to_lowercase(), Tag {
            id: id,
            name: name.to_owned(),
        });
    }

    fn add_folder_of_kind(&mut self, parent: FolderId, id: FolderId, name: &str, kind: FolderKind) -> Result<(), QueryError> {
        if !self.folders.contains_key(&parent) {
            return Err(QueryError::NotFound(Reference::FolderId(parent)));
        }

        self.insert_folder(parent, id, name, kind);
        Ok(())
    }

    fn insert_folder(&mut self, parent: FolderId, id: FolderId, name: &str, kind: FolderKind) {
        let path = match self.folders.get(&parent) {
            Some(parent) if parent.path == "/" => format!("/{}", name),
            Some(parent) => format!("{}/{}", parent.path, name),
            None => format!("/{}", name),
        };

        self.folders.insert(id, Folder {
            id: id,
            parent: Some(parent),
            name: name.to_owned(),
            path: path,
            kind: kind,
        });
    }

    fn child_by_name(&self, parent: FolderId, name: &str) -> Option<&Folder> {
        self.folders.values().find(|folder| {
            folder.parent == Some(parent) && folder.name.eq_ignore_ascii_case(name)
        })
    }

    fn collect_subfolders(&self, id: FolderId, into: &mut Vec<Folder>) {
        let children = self.folders.values()
            .filter(|folder| folder.parent == Some(id))
            .map(|folder| folder.id)
            .collect::<Vec<FolderId>>();

        for child in children {
            if let Some(folder) = self.folders.get(&child) {
                into.push(folder.clone());
            }

            self.collect_subfolders(child, into);
        }
    }

    /// Loads a mailbox from its JSON description
    ///
    /// Folders are created in the order given, so parents must come before their children.
    pub fn from_json_str(json: &str) -> Result<MemoryMailbox, FixtureError> {
        let fixture: MailboxFixture = serde_json::from_str(json)?;
        let mut mailbox = MemoryMailbox::new(fixture.account_id, &fixture.account_name);

        for alias in fixture.aliases.iter() {
            mailbox.add_alias(alias);
        }

        for folder in fixture.folders {
            mailbox.add_folder_of_kind(folder.parent, folder.id, &folder.name, folder.kind)?;
        }

        for tag in fixture.tags.iter() {
            mailbox.add_tag(tag.id, &tag.name);
        }

        Ok(mailbox)
    }
}


impl Mailbox for MemoryMailbox {
    fn account_id(&self) -> AccountId {
        self.account_id
    }

    fn account_name(&self) -> String {
        self.account_name.clone()
    }

    fn account_aliases(&self) -> Result<Vec<String>, QueryError> {
        Ok(self.aliases.clone())
    }

    fn folder_by_id(&self, id: FolderId) -> Result<Folder, QueryError> {
        self.folders.get(&id).cloned().ok_or(QueryError::NotFound(Reference::FolderId(id)))
    }

    fn folder_by_path(&self, root: FolderId, path: &str) -> Result<(Folder, Option<String>), QueryError> {
        let mut current = self.folder_by_id(root)?;
        let components = path.split('/').filter(|component| !component.is_empty()).collect::<Vec<&str>>();

        for (position, component) in components.iter().enumerate() {
            // Anything beneath a mountpoint lives in the mountpoint's target
            let next = if current.is_mountpoint() {
                None
            } else {
                self.child_by_name(current.id, component)
            };

            match next {
                Some(folder) => current = folder.clone(),
                None => return Ok((current, Some(components[position..].join("/")))),
            }
        }

        Ok((current, None))
    }

    fn subfolder_hierarchy(&self, id: FolderId) -> Result<Vec<Folder>, QueryError> {
        let mut folders = vec![self.folder_by_id(id)?];
        self.collect_subfolders(id, &mut folders);
        Ok(folders)
    }

    fn tag_by_name(&self, name: &str) -> Result<Tag, QueryError> {
        self.tags.get(&name.to_lowercase()).cloned().ok_or_else(|| QueryError::NotFound(Reference::Tag(name.to_owned())))
    }
}


#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("malformed mailbox description: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Query(#[from] QueryError),
}


#[derive(Debug, Deserialize)]
struct MailboxFixture {
    account_id: Uuid,
    account_name: String,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    folders: Vec<FolderFixture>,
    #[serde(default)]
    tags: Vec<TagFixture>,
}


#[derive(Debug, Deserialize)]
struct FolderFixture {
    id: FolderId,
    parent: FolderId,
    name: String,
    #[serde(default)]
    kind: FolderKind,
}


#[derive(Debug, Deserialize)]
struct TagFixture {
    id: TagId,
    name: String,
}


#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::error::{QueryError, Reference};
    use crate::mailbox::{Mailbox, FolderKind, FOLDER_USER_ROOT, FOLDER_INBOX};

    use super::MemoryMailbox;

    fn make_mailbox() -> MemoryMailbox {
        let mut mailbox = MemoryMailbox::new(Uuid::nil(), "user@example.com");
        mailbox.add_folder(FOLDER_INBOX, 257, "Work").unwrap();
        mailbox.add_folder(257, 258, "Reports").unwrap();
        mailbox.add_mountpoint(FOLDER_USER_ROOT, 259, "Shared", Uuid::from_u128(0xff), 300).unwrap();
        mailbox.add_tag(64, "Important");
        mailbox
    }

    #[test]
    fn test_system_folders() {
        let mailbox = make_mailbox();

        assert_eq!(mailbox.folder_by_id(FOLDER_INBOX).unwrap().path, "/Inbox");
    }

    #[test]
    fn test_folder_by_path() {
        let mailbox = make_mailbox();
        let (folder, rest) = mailbox.folder_by_path(FOLDER_USER_ROOT, "/inbox/work/Reports").unwrap();

        assert_eq!(folder.id, 258);
        assert_eq!(folder.path, "/Inbox/Work/Reports");
        assert_eq!(rest, None);
    }

    #[test]
    fn test_folder_by_path_longest_match() {
        let mailbox = make_mailbox();
        let (folder, rest) = mailbox.folder_by_path(FOLDER_USER_ROOT, "Inbox/Work/missing/deeper").unwrap();

        assert_eq!(folder.id, 257);
        assert_eq!(rest, Some("missing/deeper".to_owned()));
    }

    #[test]
    fn test_folder_by_path_stops_at_mountpoint() {
        let mailbox = make_mailbox();
        let (folder, rest) = mailbox.folder_by_path(FOLDER_USER_ROOT, "Shared/Projects").unwrap();

        assert_eq!(folder.id, 259);
        assert_eq!(folder.kind, FolderKind::Mountpoint { owner: Uuid::from_u128(0xff), remote_id: 300 });
        assert_eq!(rest, Some("Projects".to_owned()));
    }

    #[test]
    fn test_subfolder_hierarchy() {
        let mailbox = make_mailbox();
        let ids = mailbox.subfolder_hierarchy(FOLDER_INBOX).unwrap().iter().map(|folder| folder.id).collect::<Vec<_>>();

        assert_eq!(ids, vec![FOLDER_INBOX, 257, 258]);
    }

    #[test]
    fn test_tag_by_name() {
        let mailbox = make_mailbox();

        assert_eq!(mailbox.tag_by_name("important").unwrap().id, 64);
        assert_eq!(mailbox.tag_by_name("urgent"), Err(QueryError::NotFound(Reference::Tag("urgent".to_owned()))));
    }

    #[test]
    fn test_add_folder_to_missing_parent() {
        let mut mailbox = make_mailbox();

        assert_eq!(mailbox.add_folder(999, 1000, "Orphan"), Err(QueryError::NotFound(Reference::FolderId(999))));
    }

    #[test]
    fn test_from_json_str() {
        let mailbox = MemoryMailbox::from_json_str("
        {
            \"account_id\": \"00000000-0000-0000-0000-000000000000\",
            \"account_name\": \"user@example.com\",
            \"aliases\": [\"alias@example.com\"],
            \"folders\": [
                {\"id\": 257, \"parent\": 2, \"name\": \"Work\"},
                {\"id\": 258, \"parent\": 1, \"name\": \"Shared\", \"kind\": {\"mountpoint\": {\"owner\": \"ffffffff-ffff-ffff-ffff-ffffffffffff\", \"remote_id\": 2}}}
            ],
            \"tags\": [{\"id\": 64, \"name\": \"Important\"}]
        }
        ").unwrap();

        assert_eq!(mailbox.account_aliases().unwrap(), vec!["alias@example.com".to_owned()]);
        assert_eq!(mailbox.folder_by_id(257).unwrap().path, "/Inbox/Work");
        assert!(mailbox.folder_by_id(258).unwrap().is_mountpoint());
        assert_eq!(mailbox.tag_by_name("Important").unwrap().id, 64);
    }
}
