//! Folder scoping and mountpoint resolution
//!
//! A folder reference resolves to either a local folder or a folder in another account's
//! mailbox. Mountpoints to folders in the same mailbox are followed until a real folder is
//! reached. The first mountpoint into another mailbox ends the walk, and whatever path is
//! left over is passed along for that mailbox to resolve.

use std::collections::HashSet;

use crate::error::{QueryError, Reference};
use crate::mailbox::{Folder, FolderKind, ItemId, AccountId, well_known_folder};
use crate::mailbox::{FOLDER_USER_ROOT, FOLDER_TRASH, FOLDER_JUNK};
use crate::operation::{Operation, DbConstraint};

use super::{BuildContext, CompileContext, any_of, quote};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderScope {
    AnyFolder,
    Local,
    Remote,
    None,
}


impl FolderScope {
    pub fn parse(value: &str) -> Result<FolderScope, QueryError> {
        match &value.trim().to_lowercase()[..] {
            "anywhere" | "any" => Ok(FolderScope::AnyFolder),
            "local" => Ok(FolderScope::Local),
            "remote" => Ok(FolderScope::Remote),
            "none" => Ok(FolderScope::None),
            _ => Err(QueryError::UnknownValue {
                field: "scope",
                value: value.to_owned(),
            }),
        }
    }
}


#[derive(Debug, Clone, PartialEq)]
pub enum FolderTarget {
    /// A path from the root, or the name of a system folder
    Path(String),

    /// A folder id, optionally followed by a path beneath it
    Id {
        item: ItemId,
        subpath: Option<String>,
    },
    Scope(FolderScope),
}


#[derive(Debug, Clone, PartialEq, Eq)]
enum Resolved {
    Local(Folder),
    Remote {
        owner: AccountId,
        folder: i32,
        subpath: Option<String>,
    },
}


#[derive(Debug, Clone, PartialEq)]
pub struct FolderPredicate {
    pub target: FolderTarget,
    pub include_subfolders: bool,
}


impl FolderPredicate {
    fn field_name(include_subfolders: bool, by_id: bool) -> &'static str {
        match (include_subfolders, by_id) {
            (false, false) => "in",
            (true, false) => "under",
            (false, true) => "inid",
            (true, true) => "underid",
        }
    }

    /// `in:path` and `under:path`
    pub fn path(path: &str, include_subfolders: bool) -> Result<FolderPredicate, QueryError> {
        let path = path.trim();
        if path.is_empty() {
            return Err(QueryError::EmptyValue(FolderPredicate::field_name(include_subfolders, false)));
        }

        Ok(FolderPredicate {
            target: FolderTarget::Path(path.to_owned()),
            include_subfolders: include_subfolders,
        })
    }

    /// `inid:id` and `underid:id`, where the id may be followed by `/sub/path`
    pub fn id(ctx: &BuildContext, value: &str, include_subfolders: bool) -> Result<FolderPredicate, QueryError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(QueryError::EmptyValue(FolderPredicate::field_name(include_subfolders, true)));
        }

        let (id, subpath) = match value.find('/') {
            Some(split) => {
                let subpath = value[split + 1..].trim_matches('/');
                (&value[..split], if subpath.is_empty() { None } else { Some(subpath.to_owned()) })
            }
            None => (value, None),
        };

        Ok(FolderPredicate {
            target: FolderTarget::Id {
                item: ItemId::parse(id, ctx.account)?,
                subpath: subpath,
            },
            include_subfolders: include_subfolders,
        })
    }

    pub fn scope(scope: FolderScope) -> FolderPredicate {
        FolderPredicate {
            target: FolderTarget::Scope(scope),
            include_subfolders: false,
        }
    }

    pub fn compile(&self, ctx: &CompileContext, truth: bool) -> Result<Operation, QueryError> {
        let resolved = match self.target {
            FolderTarget::Scope(scope) => return compile_scope(ctx, scope, self.include_subfolders, truth),
            FolderTarget::Path(ref path) => resolve_path(ctx, path)?,
            FolderTarget::Id { ref item, ref subpath } => resolve_id(ctx, item, subpath)?,
        };

        match resolved {
            Resolved::Remote { owner, folder, subpath } => {
                Ok(Operation::db(DbConstraint::InRemoteFolder {
                    owner: owner,
                    folder: folder,
                    subpath: subpath,
                    include_subfolders: self.include_subfolders,
                }, truth))
            }
            Resolved::Local(ref folder) if self.include_subfolders => compile_hierarchy(ctx, folder, truth),
            Resolved::Local(folder) => Ok(Operation::db(DbConstraint::InFolder(folder.id), truth)),
        }
    }

    pub fn dump(&self) -> String {
        match self.target {
            FolderTarget::Path(ref path) => {
                format!("{}:{}", FolderPredicate::field_name(self.include_subfolders, false), quote(path))
            }
            FolderTarget::Id { ref item, ref subpath } => {
                let id = match *subpath {
                    Some(ref subpath) => format!("{}/{}", item, subpath),
                    None => item.to_string(),
                };

                format!("{}:{}", FolderPredicate::field_name(self.include_subfolders, true), quote(&id))
            }
            FolderTarget::Scope(FolderScope::AnyFolder) => "is:anywhere".to_owned(),
            FolderTarget::Scope(FolderScope::Local) => "is:local".to_owned(),
            FolderTarget::Scope(FolderScope::Remote) => "is:remote".to_owned(),
            FolderTarget::Scope(FolderScope::None) => "item:none".to_owned(),
        }
    }
}


fn resolve_path(ctx: &CompileContext, path: &str) -> Result<Resolved, QueryError> {
    let (folder, subpath) = match well_known_folder(path) {
        Some(id) if !path.contains('/') => (ctx.mailbox.folder_by_id(id)?, None),
        _ => ctx.mailbox.folder_by_path(FOLDER_USER_ROOT, path)?,
    };

    follow_mountpoints(ctx, folder, subpath)
}


/// Folder ids owned by another account are not looked up here at all
fn resolve_id(ctx: &CompileContext, item: &ItemId, subpath: &Option<String>) -> Result<Resolved, QueryError> {
    if !item.belongs_to(ctx.mailbox.account_id()) {
        return Ok(Resolved::Remote {
            owner: item.account,
            folder: item.id,
            subpath: subpath.clone(),
        });
    }

    let (folder, subpath) = match *subpath {
        Some(ref subpath) => ctx.mailbox.folder_by_path(item.id, subpath)?,
        None => (ctx.mailbox.folder_by_id(item.id)?, None),
    };

    follow_mountpoints(ctx, folder, subpath)
}


/// Walks same-mailbox mountpoints until a real folder or another mailbox is reached
///
/// Each mountpoint may only be passed once, and the chain is cut off at the configured depth.
fn follow_mountpoints(ctx: &CompileContext, folder: Folder, subpath: Option<String>) -> Result<Resolved, QueryError> {
    let account = ctx.mailbox.account_id();
    let depth_limit = ctx.settings.mountpoint_depth_limit;

    let mut visited = HashSet::new();
    let mut current = folder;
    let mut subpath = subpath;

    loop {
        let (owner, remote_id) = match current.kind {
            FolderKind::Mountpoint { owner, remote_id } => (owner, remote_id),
            FolderKind::Regular | FolderKind::Search => {
                if let Some(rest) = subpath {
                    return Err(QueryError::NotFound(Reference::Folder(format!("{}/{}", current.path.trim_end_matches('/'), rest))));
                }

                return Ok(Resolved::Local(current));
            }
        };

        if owner != account {
            debug!(ctx.log, "mountpoint leads to another mailbox"; "mountpoint" => current.id, "owner" => %owner, "folder" => remote_id);

            return Ok(Resolved::Remote {
                owner: owner,
                folder: remote_id,
                subpath: subpath,
            });
        }

        if !visited.insert(current.id) {
            return Err(QueryError::MountpointCycle(current.id));
        }
        if visited.len() > depth_limit {
            return Err(QueryError::MountpointTooDeep(depth_limit));
        }

        debug!(ctx.log, "following mountpoint"; "mountpoint" => current.id, "target" => remote_id);

        let (next, rest) = match subpath {
            Some(ref subpath) => ctx.mailbox.folder_by_path(remote_id, subpath)?,
            None => (ctx.mailbox.folder_by_id(remote_id)?, None),
        };

        current = next;
        subpath = rest;
    }
}


/// `under:` a local folder
///
/// Remote mountpoints in the hierarchy are searched with their own subfolders. Local
/// mountpoints are not expanded.
fn compile_hierarchy(ctx: &CompileContext, folder: &Folder, truth: bool) -> Result<Operation, QueryError> {
    let account = ctx.mailbox.account_id();
    let mut operations = Vec::new();

    for folder in ctx.mailbox.subfolder_hierarchy(folder.id)? {
        let constraint = match folder.kind {
            FolderKind::Mountpoint { owner, .. } if owner == account => {
                return Err(QueryError::NestedLocalMountpoint(folder.id));
            }
            FolderKind::Mountpoint { owner, remote_id } => DbConstraint::InRemoteFolder {
                owner: owner,
                folder: remote_id,
                subpath: None,
                include_subfolders: true,
            },
            FolderKind::Regular | FolderKind::Search => DbConstraint::InFolder(folder.id),
        };

        operations.push(Operation::db(constraint, truth));
    }

    Ok(any_of(operations, truth))
}


/// The negation of one locality is the other locality
fn compile_scope(ctx: &CompileContext, scope: FolderScope, include_subfolders: bool, truth: bool) -> Result<Operation, QueryError> {
    match (scope, truth) {
        (FolderScope::AnyFolder, true) | (FolderScope::None, false) => Ok(Operation::Unconstrained),
        (FolderScope::AnyFolder, false) | (FolderScope::None, true) => Ok(Operation::NoResults),
        (FolderScope::Local, true) | (FolderScope::Remote, false) => local_folders(ctx),
        (FolderScope::Remote, true) | (FolderScope::Local, false) => remote_folders(ctx, include_subfolders),
    }
}


fn union_or_nothing(operations: Vec<Operation>) -> Operation {
    if operations.is_empty() {
        Operation::NoResults
    } else {
        Operation::Union(operations)
    }
}


/// Every folder that holds this mailbox's own items, except the trash and junk folders
fn local_folders(ctx: &CompileContext) -> Result<Operation, QueryError> {
    let trash = ctx.mailbox.subfolder_hierarchy(FOLDER_TRASH)?
        .into_iter()
        .map(|folder| folder.id)
        .collect::<HashSet<_>>();

    let operations = ctx.mailbox.subfolder_hierarchy(FOLDER_USER_ROOT)?
        .into_iter()
        .filter(|folder| folder.id != FOLDER_USER_ROOT && folder.id != FOLDER_JUNK && !trash.contains(&folder.id))
        .filter(|folder| folder.kind == FolderKind::Regular)
        .map(|folder| Operation::db(DbConstraint::InFolder(folder.id), true))
        .collect();

    Ok(union_or_nothing(operations))
}


/// Every mountpoint into another account's mailbox
fn remote_folders(ctx: &CompileContext, include_subfolders: bool) -> Result<Operation, QueryError> {
    let account = ctx.mailbox.account_id();
    let mut operations = Vec::new();

    for folder in ctx.mailbox.subfolder_hierarchy(FOLDER_USER_ROOT)? {
        if let FolderKind::Mountpoint { owner, remote_id } = folder.kind {
            if owner != account {
                operations.push(Operation::db(DbConstraint::InRemoteFolder {
                    owner: owner,
                    folder: remote_id,
                    subpath: None,
                    include_subfolders: include_subfolders,
                }, true));
            }
        }
    }

    Ok(union_or_nothing(operations))
}
