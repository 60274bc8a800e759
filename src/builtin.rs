//! Canned predicates reached through `is:<name>`

use std::collections::HashMap;

use maplit::hashmap;
use once_cell::sync::Lazy;

use crate::error::{QueryError, Reference};
use crate::mailbox::Flag;
use crate::predicate::{PredicateNode, Predicate};
use crate::predicate::address::{AddressFields, MePredicate};
use crate::predicate::folder::{FolderPredicate, FolderScope};
use crate::predicate::tag::TagPredicate;


type Factory = fn() -> PredicateNode;


fn flag(flag: Flag, truth: bool) -> PredicateNode {
    PredicateNode::new(Predicate::Tag(TagPredicate::flag(flag))).with_truth(truth)
}


fn scope(scope: FolderScope) -> PredicateNode {
    PredicateNode::new(Predicate::Folder(FolderPredicate::scope(scope)))
}


fn me(fields: AddressFields) -> PredicateNode {
    PredicateNode::new(Predicate::Me(MePredicate::new(fields)))
}


static BUILTINS: Lazy<HashMap<&'static str, Factory>> = Lazy::new(|| {
    hashmap! {
        "unread" => (|| flag(Flag::Unread, true)) as Factory,
        "read" => || flag(Flag::Unread, false),
        "flagged" => || flag(Flag::Flagged, true),
        "unflagged" => || flag(Flag::Flagged, false),
        "sent" => || flag(Flag::Sent, true),
        "received" => || flag(Flag::Sent, false),
        "replied" => || flag(Flag::Answered, true),
        "unreplied" => || flag(Flag::Answered, false),
        "forwarded" => || flag(Flag::Forwarded, true),
        "unforwarded" => || flag(Flag::Forwarded, false),
        "draft" => || flag(Flag::Draft, true),
        "invite" => || flag(Flag::Invite, true),
        "anywhere" => || scope(FolderScope::AnyFolder),
        "local" => || scope(FolderScope::Local),
        "remote" => || scope(FolderScope::Remote),
        "tome" => || me(AddressFields::TO),
        "fromme" => || me(AddressFields::FROM),
        "ccme" => || me(AddressFields::CC),
        "tofromme" => || me(AddressFields::TO_FROM),
        "toccme" => || me(AddressFields::TO_CC),
        "fromccme" => || me(AddressFields::FROM_CC),
        "tofromccme" => || me(AddressFields::TO_FROM_CC),
    }
});


/// Builds the predicate registered as `name`
///
/// The node remembers the name it was found under, so it dumps back as `is:<name>`.
pub fn lookup(name: &str) -> Result<PredicateNode, QueryError> {
    let key = name.trim().to_lowercase();

    match BUILTINS.get_key_value(&key[..]) {
        Some((&name, factory)) => {
            let mut node = factory();
            node.builtin = Some(name);
            Ok(node)
        }
        None => Err(QueryError::NotFound(Reference::BuiltIn(name.to_owned()))),
    }
}
