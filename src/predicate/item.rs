use crate::error::QueryError;
use crate::mailbox::ItemId;
use crate::operation::{Operation, DbConstraint};

use super::{BuildContext, PredicateNode, Predicate};


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSet {
    All,
    None,
    Ids(Vec<ItemId>),
}


/// `item:all`, `item:none` or `item:1,2,3`
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPredicate {
    pub items: ItemSet,
}


impl ItemPredicate {
    pub fn new(items: ItemSet) -> ItemPredicate {
        // An empty id list selects nothing, exactly like `none`
        let items = match items {
            ItemSet::Ids(ref ids) if ids.is_empty() => ItemSet::None,
            items => items,
        };

        ItemPredicate {
            items: items,
        }
    }

    pub fn parse(ctx: &BuildContext, value: &str) -> Result<ItemPredicate, QueryError> {
        let value = value.trim();

        if value.eq_ignore_ascii_case("all") {
            return Ok(ItemPredicate::new(ItemSet::All));
        }
        if value.eq_ignore_ascii_case("none") {
            return Ok(ItemPredicate::new(ItemSet::None));
        }

        let mut ids = Vec::new();
        for id in value.split(',').map(|id| id.trim()).filter(|id| !id.is_empty()) {
            ids.push(ItemId::parse(id, ctx.account)?);
        }

        Ok(ItemPredicate::new(ItemSet::Ids(ids)))
    }

    pub fn compile(&self, truth: bool) -> Operation {
        match (&self.items, truth) {
            (&ItemSet::All, true) | (&ItemSet::None, false) => Operation::Unconstrained,
            (&ItemSet::None, true) | (&ItemSet::All, false) => Operation::NoResults,
            (&ItemSet::Ids(ref ids), truth) => Operation::db(DbConstraint::ItemIds(ids.clone()), truth),
        }
    }

    pub fn dump(&self) -> String {
        match self.items {
            ItemSet::All => "item:all".to_owned(),
            ItemSet::None => "item:none".to_owned(),
            ItemSet::Ids(ref ids) => {
                let ids = ids.iter().map(|id| id.to_string()).collect::<Vec<String>>();
                format!("item:{}", ids.join(","))
            }
        }
    }
}


/// Every message in one conversation
///
/// Conversations with negative ids are virtual: they hold a single message and only exist
/// as that message's item.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationPredicate {
    pub id: ItemId,
}


impl ConversationPredicate {
    pub fn new(id: ItemId) -> Result<ConversationPredicate, QueryError> {
        if id.id < 0 {
            return Err(QueryError::VirtualConversation(id));
        }

        Ok(ConversationPredicate {
            id: id,
        })
    }

    pub fn compile(&self, truth: bool) -> Operation {
        Operation::db(DbConstraint::Conversation(self.id), truth)
    }

    pub fn dump(&self) -> String {
        format!("conv:{}", self.id)
    }
}


/// Builds `conv:id`, searching virtual conversations as the single item they contain
pub fn conversation(ctx: &BuildContext, value: &str) -> Result<PredicateNode, QueryError> {
    let id = ItemId::parse(value, ctx.account)?;

    if id.id < 0 {
        let item = ItemId::new(id.account, -id.id);
        return Ok(PredicateNode::new(Predicate::Item(ItemPredicate::new(ItemSet::Ids(vec![item])))));
    }

    ConversationPredicate::new(id).map(|conversation| PredicateNode::new(Predicate::Conversation(conversation)))
}


#[cfg(test)]
mod tests {
    use crate::error::QueryError;
    use crate::mailbox::ItemId;
    use crate::operation::{Operation, DbConstraint};
    use crate::predicate::Predicate;
    use crate::predicate::tests::{build, compile, account};

    use super::{ItemPredicate, ItemSet, ConversationPredicate};

    #[test]
    fn test_all() {
        let node = build("item", "all").unwrap();

        assert_eq!(compile(&node, true), Ok(Operation::Unconstrained));
        assert_eq!(compile(&node, false), Ok(Operation::NoResults));
    }

    #[test]
    fn test_none() {
        let node = build("item", "none").unwrap();

        assert_eq!(compile(&node, true), Ok(Operation::NoResults));
        assert_eq!(compile(&node, false), Ok(Operation::Unconstrained));
    }

    #[test]
    fn test_empty_list_is_none() {
        assert_eq!(ItemPredicate::new(ItemSet::Ids(vec![])), ItemPredicate::new(ItemSet::None));
        assert_eq!(build("item", " , ").unwrap().predicate, Predicate::Item(ItemPredicate::new(ItemSet::None)));
    }

    #[test]
    fn test_id_list() {
        let node = build("item", "257,258").unwrap();
        let ids = vec![ItemId::new(account(), 257), ItemId::new(account(), 258)];

        assert_eq!(compile(&node, true), Ok(Operation::db(DbConstraint::ItemIds(ids.clone()), true)));
        assert_eq!(compile(&node, false), Ok(Operation::db(DbConstraint::ItemIds(ids), false)));
    }

    #[test]
    fn test_conversation() {
        let node = build("conv", "300").unwrap();

        assert_eq!(compile(&node, false), Ok(Operation::db(DbConstraint::Conversation(ItemId::new(account(), 300)), false)));
        assert_eq!(node.dump(), format!("conv:{}:300", account()));
    }

    #[test]
    fn test_virtual_conversation_becomes_item() {
        let node = build("conv", "-300").unwrap();

        assert_eq!(compile(&node, true), Ok(Operation::db(DbConstraint::ItemIds(vec![ItemId::new(account(), 300)]), true)));
    }

    #[test]
    fn test_conversation_rejects_negative_id() {
        let id = ItemId::new(account(), -300);

        assert_eq!(ConversationPredicate::new(id), Err(QueryError::VirtualConversation(id)));
    }
}
