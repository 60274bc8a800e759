mod common;

use mailsearch::error::QueryError;
use mailsearch::operation::Operation;
use mailsearch::predicate::Modifier;
use mailsearch::predicate::clause::{ClauseList, Clause, Conjunction};

use common::{build, compile, read};


fn compile_leaves(list: &ClauseList) -> Result<Vec<Operation>, QueryError> {
    let mut operations = Vec::new();

    for node in list.leaves() {
        operations.push(compile(node, true)?);
    }

    Ok(operations)
}


fn assert_round_trips(tree: &ClauseList) {
    let dumped = tree.dump();
    let reread = read(&dumped).unwrap();

    assert!(compile_leaves(tree).is_ok(), "{}", dumped);
    assert_eq!(compile_leaves(&reread), compile_leaves(tree), "{}", dumped);
    assert_eq!(reread.dump(), format!("({})", dumped));
}


#[test]
fn test_representative_tree() {
    let tree = ClauseList::new(vec![
        Clause::Node(build("tofrom", "bob@example.com").unwrap()),
        Clause::Conjunction(Conjunction::And),
        Clause::Node(build("after", "01/02/2007").unwrap()),
        Clause::Conjunction(Conjunction::And),
        Clause::Node(build("under", "Inbox/Work").unwrap().with_modifier(Modifier::Exclude)),
    ]);

    assert_eq!(tree.dump(), "(tofrom:bob@example.com AND after:01/02/2007 AND -under:Inbox/Work)");
    assert_round_trips(&tree);
}


#[test]
fn test_quoted_and_nested() {
    let tree = ClauseList::new(vec![
        Clause::Node(build("subject", "dinner \"appt\"").unwrap().with_modifier(Modifier::Require)),
        Clause::Conjunction(Conjunction::Or),
        Clause::List(ClauseList::new(vec![
            Clause::Node(build("#score", ">=5").unwrap()),
            Clause::Node(build("size", ">=10kb").unwrap()),
            Clause::Node(build("date", "<=-1d").unwrap()),
        ]).with_modifier(Modifier::Exclude)),
    ]);

    assert_round_trips(&tree);
}


#[test]
fn test_built_in_and_intrinsic_truth() {
    let tree = ClauseList::new(vec![
        Clause::Node(build("is", "read").unwrap()),
        Clause::Node(build("is", "tofromme").unwrap().with_modifier(Modifier::Exclude)),
        Clause::Node(build("tag", "important").unwrap().with_truth(false)),
        Clause::Node(build("tag", "\\Flagged").unwrap()),
        Clause::Node(build("priority", "low").unwrap()),
        Clause::Node(build("scope", "none").unwrap().with_modifier(Modifier::Exclude)),
        Clause::Node(build("tag", "important").unwrap().with_truth(false).with_modifier(Modifier::Exclude)),
        Clause::Node(build("subject", "dinner").unwrap().with_truth(false).with_modifier(Modifier::Require)),
    ]);

    assert_eq!(tree.dump(), "(is:read -is:tofromme -tag:important tag:\\Flagged priority:low -item:none tag:important -subject:dinner)");
    assert_round_trips(&tree);
}


#[test]
fn test_identity_and_folders() {
    let tree = ClauseList::new(vec![
        Clause::Node(build("conv", "300").unwrap()),
        Clause::Node(build("item", "257,258").unwrap()),
        Clause::Node(build("inid", "300/B").unwrap()),
        Clause::Node(build("in", "Partner/Big Projects").unwrap()),
        Clause::Node(build("has", "attachment").unwrap()),
        Clause::Node(build("contact", "jo").unwrap()),
    ]);

    assert_round_trips(&tree);
}
