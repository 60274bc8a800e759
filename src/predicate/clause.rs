//! Parenthesised groups of predicates joined by `AND` and `OR`
//!
//! A clause list is data only. Whoever consumes it flattens the groups, rewrites negated
//! groups with De Morgan's laws and compiles each leaf with the truth that results.

use std::fmt;

use super::{PredicateNode, Modifier};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conjunction {
    And,
    Or,
}


impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Conjunction::And => f.write_str("AND"),
            Conjunction::Or => f.write_str("OR"),
        }
    }
}


#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Node(PredicateNode),
    List(ClauseList),
    Conjunction(Conjunction),
}


impl Clause {
    pub fn dump(&self) -> String {
        match *self {
            Clause::Node(ref node) => node.dump(),
            Clause::List(ref list) => list.dump(),
            Clause::Conjunction(conjunction) => conjunction.to_string(),
        }
    }
}


#[derive(Debug, Clone, PartialEq)]
pub struct ClauseList {
    pub modifier: Modifier,
    pub clauses: Vec<Clause>,
}


impl ClauseList {
    pub fn new(clauses: Vec<Clause>) -> ClauseList {
        ClauseList {
            modifier: Modifier::None,
            clauses: clauses,
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> ClauseList {
        self.modifier = modifier;
        self
    }

    /// Every predicate in the list, including those in nested lists, in order
    pub fn leaves(&self) -> Vec<&PredicateNode> {
        let mut leaves = Vec::new();
        let mut stack = vec![self.clauses.iter()];

        while let Some(clauses) = stack.last_mut() {
            match clauses.next() {
                Some(&Clause::Node(ref node)) => leaves.push(node),
                Some(&Clause::List(ref list)) => stack.push(list.clauses.iter()),
                Some(&Clause::Conjunction(_)) => {}
                None => {
                    stack.pop();
                }
            }
        }

        leaves
    }

    pub fn dump(&self) -> String {
        let clauses = self.clauses.iter().map(|clause| clause.dump()).collect::<Vec<String>>();

        format!("{}({})", self.modifier.sign(), clauses.join(" "))
    }
}


#[cfg(test)]
mod tests {
    use crate::predicate::Modifier;
    use crate::predicate::tests::build;

    use super::{ClauseList, Clause, Conjunction};

    fn sample() -> ClauseList {
        ClauseList::new(vec![
            Clause::Node(build("from", "bob").unwrap()),
            Clause::Conjunction(Conjunction::And),
            Clause::List(ClauseList::new(vec![
                Clause::Node(build("tag", "important").unwrap()),
                Clause::Conjunction(Conjunction::Or),
                Clause::Node(build("in", "Inbox").unwrap().with_modifier(Modifier::Exclude)),
            ]).with_modifier(Modifier::Exclude)),
        ])
    }

    #[test]
    fn test_dump() {
        assert_eq!(sample().dump(), "(from:bob AND -(tag:important OR -in:Inbox))");
    }

    #[test]
    fn test_leaves() {
        let list = sample();
        let leaves = list.leaves().into_iter().map(|node| node.dump()).collect::<Vec<String>>();

        assert_eq!(leaves, vec!["from:bob", "tag:important", "-in:Inbox"]);
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(ClauseList::new(vec![]).with_modifier(Modifier::Require).dump(), "+()");
    }
}
