use crate::error::QueryError;
use crate::mailbox::Flag;
use crate::operation::{Operation, DbConstraint};

use super::{CompileContext, quote};


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagTarget {
    /// A user tag, resolved by name when compiled
    Named(String),
    Flag(Flag),
}


#[derive(Debug, Clone, PartialEq)]
pub struct TagPredicate {
    pub target: TagTarget,
}


impl TagPredicate {
    pub fn flag(flag: Flag) -> TagPredicate {
        TagPredicate {
            target: TagTarget::Flag(flag),
        }
    }

    /// `tag:name`, where names starting with a backslash may refer to system flags
    pub fn named(name: &str) -> Result<TagPredicate, QueryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(QueryError::EmptyValue("tag"));
        }

        if name.starts_with('\\') {
            if let Some(flag) = Flag::from_name(name) {
                return Ok(TagPredicate::flag(flag));
            }
        }

        Ok(TagPredicate {
            target: TagTarget::Named(name.to_owned()),
        })
    }

    pub fn priority(value: &str) -> Result<TagPredicate, QueryError> {
        match &value.trim().to_lowercase()[..] {
            "high" => Ok(TagPredicate::flag(Flag::Urgent)),
            "low" => Ok(TagPredicate::flag(Flag::Bulk)),
            _ => Err(QueryError::UnknownValue {
                field: "priority",
                value: value.to_owned(),
            }),
        }
    }

    pub fn compile(&self, ctx: &CompileContext, truth: bool) -> Result<Operation, QueryError> {
        let id = match self.target {
            TagTarget::Flag(flag) => flag.id(),
            TagTarget::Named(ref name) => ctx.mailbox.tag_by_name(name)?.id,
        };

        Ok(Operation::db(DbConstraint::Tag(id), truth))
    }

    pub fn dump(&self) -> String {
        match self.target {
            TagTarget::Flag(Flag::Urgent) => "priority:high".to_owned(),
            TagTarget::Flag(Flag::Bulk) => "priority:low".to_owned(),
            TagTarget::Flag(flag) => format!("tag:{}", flag.name()),
            TagTarget::Named(ref name) => format!("tag:{}", quote(name)),
        }
    }
}


#[cfg(test)]
mod tests {
    use crate::error::{QueryError, Reference};
    use crate::mailbox::Flag;
    use crate::operation::{Operation, DbConstraint};
    use crate::predicate::tests::{build, compile};

    use super::{TagPredicate, TagTarget};

    #[test]
    fn test_user_tag() {
        let node = build("tag", "Important").unwrap();

        assert_eq!(compile(&node, true), Ok(Operation::db(DbConstraint::Tag(64), true)));
        assert_eq!(compile(&node, false), Ok(Operation::db(DbConstraint::Tag(64), false)));
    }

    #[test]
    fn test_unknown_tag() {
        let node = build("tag", "holiday").unwrap();

        assert_eq!(compile(&node, true), Err(QueryError::NotFound(Reference::Tag("holiday".to_owned()))));
    }

    #[test]
    fn test_flag_by_name() {
        assert_eq!(TagPredicate::named("\\Flagged").unwrap().target, TagTarget::Flag(Flag::Flagged));
        assert_eq!(TagPredicate::named("\\Custom").unwrap().target, TagTarget::Named("\\Custom".to_owned()));

        let node = build("tag", "\\unread").unwrap();

        assert_eq!(compile(&node, true), Ok(Operation::db(DbConstraint::Tag(-10), true)));
        assert_eq!(node.dump(), "tag:\\Unread");
    }

    #[test]
    fn test_priority() {
        let node = build("priority", "HIGH").unwrap();

        assert_eq!(compile(&node, false), Ok(Operation::db(DbConstraint::Tag(-11), false)));
        assert_eq!(node.dump(), "priority:high");
        assert_eq!(build("priority", "low").unwrap().dump(), "priority:low");
    }

    #[test]
    fn test_unknown_priority() {
        assert_eq!(build("priority", "medium"), Err(QueryError::UnknownValue {
            field: "priority",
            value: "medium".to_owned(),
        }));
    }
}
