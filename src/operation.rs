//! Backend operations produced by compiling predicates
//!
//! These are descriptions only. The metadata store executes `Db` operations, the full-text
//! index executes `Index` operations and the optimizer combines the rest.

use std::collections::HashMap;
use std::fmt;
use std::ops::Bound;

use serde::Deserialize;

use crate::mailbox::{AccountId, FolderId, ItemId, TagId};


/// Fields of the full-text index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextField {
    Content,
    Subject,
    From,
    To,
    Cc,
    EnvFrom,
    EnvTo,
    MsgId,
    Filename,
    Author,
    Title,
    Keywords,
    Company,
    Metadata,
    Contact,
    Attachments,
    Type,
    Objects,
    Field,
}


impl TextField {
    /// The search prefix that targets this field
    pub fn prefix(&self) -> &'static str {
        match *self {
            TextField::Content => "content",
            TextField::Subject => "subject",
            TextField::From => "from",
            TextField::To => "to",
            TextField::Cc => "cc",
            TextField::EnvFrom => "envfrom",
            TextField::EnvTo => "envto",
            TextField::MsgId => "msgid",
            TextField::Filename => "filename",
            TextField::Author => "author",
            TextField::Title => "title",
            TextField::Keywords => "keywords",
            TextField::Company => "company",
            TextField::Metadata => "metadata",
            TextField::Contact => "contact",
            TextField::Attachments => "attachment",
            TextField::Type => "type",
            TextField::Objects => "has",
            TextField::Field => "field",
        }
    }

    pub fn is_address(&self) -> bool {
        match *self {
            TextField::From | TextField::To | TextField::Cc | TextField::EnvFrom | TextField::EnvTo => true,
            _ => false,
        }
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    Date,
    ModifiedDate,
    AppointmentStart,
    AppointmentEnd,
    ConversationStart,
    ConversationEnd,
}


/// A range over an ordered column
///
/// `Bound::Unbounded` on either side leaves that side open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeBound<T = i64> {
    pub low: Bound<T>,
    pub high: Bound<T>,
}


impl<T: PartialOrd> RangeBound<T> {
    pub fn new(low: Bound<T>, high: Bound<T>) -> RangeBound<T> {
        RangeBound {
            low: low,
            high: high,
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        let above_low = match self.low {
            Bound::Included(ref low) => value >= low,
            Bound::Excluded(ref low) => value > low,
            Bound::Unbounded => true,
        };

        let below_high = match self.high {
            Bound::Included(ref high) => value <= high,
            Bound::Excluded(ref high) => value < high,
            Bound::Unbounded => true,
        };

        above_low && below_high
    }
}


impl<T: Clone + PartialOrd> RangeBound<T> {
    pub fn exact(value: T) -> RangeBound<T> {
        RangeBound::new(Bound::Included(value.clone()), Bound::Included(value))
    }
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbConstraint {
    Date {
        field: DateField,
        range: RangeBound,
    },
    Size(RangeBound),
    ModSeq(RangeBound),
    ConvCount(RangeBound),
    Tag(TagId),
    InFolder(FolderId),
    InRemoteFolder {
        owner: AccountId,
        folder: i32,
        subpath: Option<String>,
        include_subfolders: bool,
    },
    ItemIds(Vec<ItemId>),
    Conversation(ItemId),
    Sender(RangeBound<String>),
    Subject(RangeBound<String>),
}


/// A single constraint against the metadata store
///
/// `truth` false selects exactly the items the constraint alone would reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbOperation {
    pub constraint: DbConstraint,
    pub truth: bool,
}


/// One term of a phrase
///
/// `offset` counts words from the start of the phrase. Dropped stop words leave gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseTerm {
    pub offset: u32,
    pub term: String,
}


impl PhraseTerm {
    pub fn new(offset: u32, term: &str) -> PhraseTerm {
        PhraseTerm {
            offset: offset,
            term: term.to_owned(),
        }
    }
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexQuery {
    Term(String),

    /// Every term at its offset from where the phrase starts
    Phrase(Vec<PhraseTerm>),

    /// Like `Phrase`, with the final term matched as a prefix against the index vocabulary
    PrefixPhrase {
        leading: Vec<PhraseTerm>,
        prefix: PhraseTerm,
    },

    /// Numeric range over a named structured field
    Range {
        name: String,
        range: RangeBound,
    },
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOperation {
    pub field: TextField,
    pub query: IndexQuery,
    pub truth: bool,
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    NoResults,

    /// Contributes no constraint at all
    Unconstrained,
    Db(DbOperation),
    Index(IndexOperation),
    Union(Vec<Operation>),
    Intersection(Vec<Operation>),
}


impl Operation {
    pub fn db(constraint: DbConstraint, truth: bool) -> Operation {
        Operation::Db(DbOperation {
            constraint: constraint,
            truth: truth,
        })
    }

    pub fn index(field: TextField, query: IndexQuery, truth: bool) -> Operation {
        Operation::Index(IndexOperation {
            field: field,
            query: query,
            truth: truth,
        })
    }

    pub fn kind(&self) -> &'static str {
        match *self {
            Operation::NoResults => "no_results",
            Operation::Unconstrained => "unconstrained",
            Operation::Db(_) => "db",
            Operation::Index(_) => "index",
            Operation::Union(_) => "union",
            Operation::Intersection(_) => "intersection",
        }
    }

    /// Evaluates the operation against the known facts about one item
    pub fn matches(&self, item: &ItemFacts) -> bool {
        match *self {
            Operation::NoResults => false,
            Operation::Unconstrained => true,
            Operation::Db(ref op) => item.satisfies(&op.constraint) == op.truth,
            Operation::Index(ref op) => item.satisfies_index(op.field, &op.query) == op.truth,
            Operation::Union(ref operations) => operations.iter().any(|operation| operation.matches(item)),
            Operation::Intersection(ref operations) => operations.iter().all(|operation| operation.matches(item)),
        }
    }
}


impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Operation::NoResults => f.write_str("NO_RESULTS"),
            Operation::Unconstrained => f.write_str("ANY"),
            Operation::Db(ref op) => {
                if !op.truth {
                    f.write_str("-")?;
                }
                write!(f, "DB({:?})", op.constraint)
            }
            Operation::Index(ref op) => {
                if !op.truth {
                    f.write_str("-")?;
                }
                write!(f, "INDEX({}:{:?})", op.field.prefix(), op.query)
            }
            Operation::Union(ref operations) | Operation::Intersection(ref operations) => {
                let glue = if let Operation::Union(_) = *self { " OR " } else { " AND " };

                f.write_str("(")?;
                for (i, operation) in operations.iter().enumerate() {
                    if i > 0 {
                        f.write_str(glue)?;
                    }
                    write!(f, "{}", operation)?;
                }
                f.write_str(")")
            }
        }
    }
}


/// What the stores know about a single item, for evaluating operations in memory
#[derive(Debug, Clone, Default)]
pub struct ItemFacts {
    pub id: Option<ItemId>,
    pub conversation: Option<ItemId>,
    pub folder: Option<FolderId>,

    /// `(owner, folder)` when the item lives behind a remote mountpoint
    pub remote_folder: Option<(AccountId, i32)>,
    pub tags: Vec<TagId>,
    pub dates: HashMap<DateField, i64>,
    pub size: Option<i64>,
    pub modseq: Option<i64>,
    pub conv_count: Option<i64>,
    pub sender: Option<String>,
    pub subject: Option<String>,
    pub terms: HashMap<TextField, Vec<String>>,
    pub numeric_fields: HashMap<String, i64>,
}


impl ItemFacts {
    fn satisfies(&self, constraint: &DbConstraint) -> bool {
        match *constraint {
            DbConstraint::Date { field, ref range } => self.dates.get(&field).map_or(false, |date| range.contains(date)),
            DbConstraint::Size(ref range) => self.size.map_or(false, |size| range.contains(&size)),
            DbConstraint::ModSeq(ref range) => self.modseq.map_or(false, |modseq| range.contains(&modseq)),
            DbConstraint::ConvCount(ref range) => self.conv_count.map_or(false, |count| range.contains(&count)),
            DbConstraint::Tag(id) => self.tags.contains(&id),
            DbConstraint::InFolder(id) => self.folder == Some(id),
            DbConstraint::InRemoteFolder { owner, folder, .. } => self.remote_folder == Some((owner, folder)),
            DbConstraint::ItemIds(ref ids) => self.id.map_or(false, |id| ids.contains(&id)),
            DbConstraint::Conversation(id) => self.conversation == Some(id),
            DbConstraint::Sender(ref range) => self.sender.as_ref().map_or(false, |sender| range.contains(sender)),
            DbConstraint::Subject(ref range) => self.subject.as_ref().map_or(false, |subject| range.contains(subject)),
        }
    }

    fn satisfies_index(&self, field: TextField, query: &IndexQuery) -> bool {
        if let IndexQuery::Range { ref name, ref range } = *query {
            return self.numeric_fields.get(name).map_or(false, |value| range.contains(value));
        }

        let terms = match self.terms.get(&field) {
            Some(terms) => terms,
            None => return false,
        };

        let term_at = |start: usize, term: &PhraseTerm| terms.get(start + term.offset as usize);
        let phrase_at = |start: usize, phrase: &[PhraseTerm]| {
            phrase.iter().all(|term| term_at(start, term) == Some(&term.term))
        };

        match *query {
            IndexQuery::Term(ref term) => terms.contains(term),
            IndexQuery::Phrase(ref phrase) => {
                !phrase.is_empty() && (0..terms.len()).any(|start| phrase_at(start, phrase))
            }
            IndexQuery::PrefixPhrase { ref leading, ref prefix } => {
                (0..terms.len()).any(|start| {
                    phrase_at(start, leading) && term_at(start, prefix).map_or(false, |term| term.starts_with(&prefix.term[..]))
                })
            }
            IndexQuery::Range { .. } => false,
        }
    }
}
