//! Search predicates and their compilation into backend operations
//!
//! A `PredicateNode` is one constraint of a search, such as `from:alice` or `-in:Trash`.
//! Every node knows how to negate itself: compiling with a requested truth of `false`
//! produces the complement of the node's positive form directly, never a wrapper around it.

pub mod text;
pub mod address;
pub mod tag;
pub mod table;
pub mod range;
pub mod item;
pub mod folder;
pub mod clause;

use slog::Logger;

use crate::analysis::Analyzer;
use crate::builtin;
use crate::error::QueryError;
use crate::mailbox::{Mailbox, AccountId};
use crate::operation::{Operation, DbConstraint, TextField};
use crate::settings::SearchSettings;

use self::text::{TextPredicate, ContactPredicate, DomainPredicate, FieldPredicate};
use self::address::{AddressPredicate, AddressFields, MePredicate};
use self::tag::TagPredicate;
use self::table::TermPredicate;
use self::range::{DatePredicate, DatePrefix, SizePredicate, SizePrefix, IntegerPredicate, StringRangePredicate};
use self::item::{ItemPredicate, ConversationPredicate};
use self::folder::{FolderPredicate, FolderScope};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    None,

    /// `+`, only changes how the node is written back out
    Require,

    /// `-`, negates the node
    Exclude,
}


impl Modifier {
    pub fn apply(&self, truth: bool) -> bool {
        match *self {
            Modifier::Exclude => !truth,
            Modifier::None | Modifier::Require => truth,
        }
    }

    pub fn sign(&self) -> &'static str {
        match *self {
            Modifier::None => "",
            Modifier::Require => "+",
            Modifier::Exclude => "-",
        }
    }
}


impl Default for Modifier {
    fn default() -> Modifier {
        Modifier::None
    }
}


/// What predicates may consult while being built
///
/// Literals are parsed here, so a malformed date or size fails before anything compiles.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub settings: &'a SearchSettings,

    /// Owner of item ids written without an account
    pub account: AccountId,
}


impl<'a> BuildContext<'a> {
    pub fn new(settings: &'a SearchSettings, account: AccountId) -> BuildContext<'a> {
        BuildContext {
            settings: settings,
            account: account,
        }
    }
}


/// The read-only collaborators a predicate compiles against
pub struct CompileContext<'a> {
    pub mailbox: &'a dyn Mailbox,
    pub analyzer: &'a dyn Analyzer,
    pub settings: &'a SearchSettings,
    pub log: Logger,
}


impl<'a> CompileContext<'a> {
    pub fn new(mailbox: &'a dyn Mailbox, analyzer: &'a dyn Analyzer, settings: &'a SearchSettings, log: Logger) -> CompileContext<'a> {
        CompileContext {
            mailbox: mailbox,
            analyzer: analyzer,
            settings: settings,
            log: log,
        }
    }
}


#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Text(TextPredicate),
    Contact(ContactPredicate),
    Domain(DomainPredicate),
    Field(FieldPredicate),
    Address(AddressPredicate),
    Me(MePredicate),
    Tag(TagPredicate),
    Term(TermPredicate),
    Date(DatePredicate),
    Size(SizePredicate),
    ModSeq(IntegerPredicate),
    ConvCount(IntegerPredicate),
    StringRange(StringRangePredicate),
    Folder(FolderPredicate),
    Item(ItemPredicate),
    Conversation(ConversationPredicate),
}


impl Predicate {
    pub fn name(&self) -> &'static str {
        match *self {
            Predicate::Text(_) => "text",
            Predicate::Contact(_) => "contact",
            Predicate::Domain(_) => "domain",
            Predicate::Field(_) => "field",
            Predicate::Address(_) => "address",
            Predicate::Me(_) => "me",
            Predicate::Tag(_) => "tag",
            Predicate::Term(_) => "term",
            Predicate::Date(_) => "date",
            Predicate::Size(_) => "size",
            Predicate::ModSeq(_) => "modseq",
            Predicate::ConvCount(_) => "conv-count",
            Predicate::StringRange(_) => "string-range",
            Predicate::Folder(_) => "folder",
            Predicate::Item(_) => "item",
            Predicate::Conversation(_) => "conversation",
        }
    }

    /// Compiles with the truth already resolved against the node's modifier
    fn compile(&self, ctx: &CompileContext, truth: bool) -> Result<Operation, QueryError> {
        match *self {
            Predicate::Text(ref text) => text.compile(ctx, truth),
            Predicate::Contact(ref contact) => contact.compile(ctx, truth),
            Predicate::Domain(ref domain) => Ok(domain.compile(truth)),
            Predicate::Field(ref field) => field.compile(ctx, truth),
            Predicate::Address(ref address) => address.compile(ctx, truth),
            Predicate::Me(ref me) => me.compile(ctx, truth),
            Predicate::Tag(ref tag) => tag.compile(ctx, truth),
            Predicate::Term(ref term) => Ok(term.compile(truth)),
            Predicate::Date(ref date) => Ok(date.compile(ctx, truth)),
            Predicate::Size(ref size) => Ok(size.compile(truth)),
            Predicate::ModSeq(ref modseq) => Ok(modseq.compile(DbConstraint::ModSeq, truth)),
            Predicate::ConvCount(ref count) => Ok(count.compile(DbConstraint::ConvCount, truth)),
            Predicate::StringRange(ref range) => Ok(range.compile(truth)),
            Predicate::Folder(ref folder) => folder.compile(ctx, truth),
            Predicate::Item(ref item) => Ok(item.compile(truth)),
            Predicate::Conversation(ref conversation) => Ok(conversation.compile(truth)),
        }
    }

    /// `field:value`, without any sign
    fn dump(&self) -> String {
        match *self {
            Predicate::Text(ref text) => text.dump(),
            Predicate::Contact(ref contact) => contact.dump(),
            Predicate::Domain(ref domain) => domain.dump(),
            Predicate::Field(ref field) => field.dump(),
            Predicate::Address(ref address) => address.dump(),
            Predicate::Me(ref me) => me.dump(),
            Predicate::Tag(ref tag) => tag.dump(),
            Predicate::Term(ref term) => term.dump(),
            Predicate::Date(ref date) => date.dump(),
            Predicate::Size(ref size) => size.dump(),
            Predicate::ModSeq(ref modseq) => modseq.dump(),
            Predicate::ConvCount(ref count) => count.dump(),
            Predicate::StringRange(ref range) => range.dump(),
            Predicate::Folder(ref folder) => folder.dump(),
            Predicate::Item(ref item) => item.dump(),
            Predicate::Conversation(ref conversation) => conversation.dump(),
        }
    }
}


#[derive(Debug, Clone, PartialEq)]
pub struct PredicateNode {
    pub modifier: Modifier,

    /// `false` for inherently negative concepts such as `is:read`
    pub truth: bool,

    /// Set on nodes made by the built-in registry, which write themselves back as `is:<name>`
    pub builtin: Option<&'static str>,
    pub predicate: Predicate,
}


impl PredicateNode {
    pub fn new(predicate: Predicate) -> PredicateNode {
        PredicateNode {
            modifier: Modifier::None,
            truth: true,
            builtin: None,
            predicate: predicate,
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> PredicateNode {
        self.modifier = modifier;
        self
    }

    pub fn with_truth(mut self, truth: bool) -> PredicateNode {
        self.truth = truth;
        self
    }

    pub fn effective_truth(&self, requested: bool) -> bool {
        self.modifier.apply(requested) == self.truth
    }

    pub fn compile(&self, ctx: &CompileContext, requested: bool) -> Result<Operation, QueryError> {
        let truth = self.effective_truth(requested);
        let operation = self.predicate.compile(ctx, truth)?;

        debug!(ctx.log, "compiled predicate"; "predicate" => self.predicate.name(), "truth" => truth, "operation" => operation.kind());

        Ok(operation)
    }

    /// Writes the node back out in search syntax
    pub fn dump(&self) -> String {
        if let Some(name) = self.builtin {
            return format!("{}is:{}", self.modifier.sign(), name);
        }

        // Written with the sign of its effective truth, so an excluded negative node is bare
        let sign = if !self.effective_truth(true) {
            "-"
        } else if self.modifier == Modifier::Require {
            "+"
        } else {
            ""
        };

        format!("{}{}", sign, self.predicate.dump())
    }

    /// Builds the node for `field:value`
    ///
    /// Returns `None` when `field` is not a search field. Structured fields are written
    /// `#name` or `field[name]`.
    pub fn build(ctx: &BuildContext, field: &str, value: &str) -> Option<Result<PredicateNode, QueryError>> {
        if let Some(name) = structured_field_name(field) {
            return Some(FieldPredicate::new(name, value).map(|field| PredicateNode::new(Predicate::Field(field))));
        }

        get_field_builder(field).map(|build| build(ctx, value))
    }
}


type FieldBuilder = fn(&BuildContext, &str) -> Result<PredicateNode, QueryError>;


fn structured_field_name(field: &str) -> Option<&str> {
    if let Some(name) = field.strip_prefix('#') {
        return Some(name);
    }

    field.strip_prefix("field[").and_then(|rest| rest.strip_suffix(']'))
}


fn get_field_builder(field: &str) -> Option<FieldBuilder> {
    let builder: FieldBuilder = match field {
        "text" => |ctx, value| text::text_field(ctx.settings.default_text_field, value),
        "content" => |_, value| text::text_field(TextField::Content, value),
        "subject" => |_, value| text::text_field(TextField::Subject, value),
        "from" => |_, value| text::text_field(TextField::From, value),
        "to" => |_, value| text::text_field(TextField::To, value),
        "cc" => |_, value| text::text_field(TextField::Cc, value),
        "envfrom" => |_, value| text::text_field(TextField::EnvFrom, value),
        "envto" => |_, value| text::text_field(TextField::EnvTo, value),
        "msgid" => |_, value| text::text_field(TextField::MsgId, value),
        "filename" => |_, value| text::text_field(TextField::Filename, value),
        "author" => |_, value| text::text_field(TextField::Author, value),
        "title" => |_, value| text::text_field(TextField::Title, value),
        "keywords" => |_, value| text::text_field(TextField::Keywords, value),
        "company" => |_, value| text::text_field(TextField::Company, value),
        "metadata" => |_, value| text::text_field(TextField::Metadata, value),
        "contact" => |_, value| ContactPredicate::new(value).map(|contact| PredicateNode::new(Predicate::Contact(contact))),
        "tofrom" => |_, value| address_field(AddressFields::TO_FROM, value),
        "tocc" => |_, value| address_field(AddressFields::TO_CC, value),
        "fromcc" => |_, value| address_field(AddressFields::FROM_CC, value),
        "tofromcc" => |_, value| address_field(AddressFields::TO_FROM_CC, value),
        "tag" => |_, value| TagPredicate::named(value).map(|tag| PredicateNode::new(Predicate::Tag(tag))),
        "priority" => |_, value| TagPredicate::priority(value).map(|tag| PredicateNode::new(Predicate::Tag(tag))),
        "is" => |_, value| builtin::lookup(value),
        "has" => |_, value| TermPredicate::has(value).map(|term| PredicateNode::new(Predicate::Term(term))),
        "attachment" => |_, value| TermPredicate::attachment(value).map(|term| PredicateNode::new(Predicate::Term(term))),
        "type" => |_, value| TermPredicate::mime_type(value).map(|term| PredicateNode::new(Predicate::Term(term))),
        "date" => |ctx, value| date_field(ctx, DatePrefix::Date, value),
        "day" => |ctx, value| date_field(ctx, DatePrefix::Day, value),
        "week" => |ctx, value| date_field(ctx, DatePrefix::Week, value),
        "month" => |ctx, value| date_field(ctx, DatePrefix::Month, value),
        "year" => |ctx, value| date_field(ctx, DatePrefix::Year, value),
        "after" => |ctx, value| date_field(ctx, DatePrefix::After, value),
        "before" => |ctx, value| date_field(ctx, DatePrefix::Before, value),
        "mdate" => |ctx, value| date_field(ctx, DatePrefix::ModifiedDate, value),
        "appt-start" => |ctx, value| date_field(ctx, DatePrefix::AppointmentStart, value),
        "appt-end" => |ctx, value| date_field(ctx, DatePrefix::AppointmentEnd, value),
        "conv-start" => |ctx, value| date_field(ctx, DatePrefix::ConversationStart, value),
        "conv-end" => |ctx, value| date_field(ctx, DatePrefix::ConversationEnd, value),
        "size" => |_, value| size_field(SizePrefix::Size, value),
        "larger" => |_, value| size_field(SizePrefix::Larger, value),
        "bigger" => |_, value| size_field(SizePrefix::Bigger, value),
        "smaller" => |_, value| size_field(SizePrefix::Smaller, value),
        "modseq" => |_, value| IntegerPredicate::new("modseq", value).map(|modseq| PredicateNode::new(Predicate::ModSeq(modseq))),
        "conv-count" => |_, value| IntegerPredicate::new("conv-count", value).map(|count| PredicateNode::new(Predicate::ConvCount(count))),
        "conv" => |ctx, value| item::conversation(ctx, value),
        "item" => |ctx, value| ItemPredicate::parse(ctx, value).map(|item| PredicateNode::new(Predicate::Item(item))),
        "in" => |_, value| folder_path(value, false),
        "under" => |_, value| folder_path(value, true),
        "inid" => |ctx, value| folder_id(ctx, value, false),
        "underid" => |ctx, value| folder_id(ctx, value, true),
        "scope" => |_, value| FolderScope::parse(value).map(|scope| PredicateNode::new(Predicate::Folder(FolderPredicate::scope(scope)))),
        _ => return None,
    };

    Some(builder)
}


fn address_field(fields: AddressFields, value: &str) -> Result<PredicateNode, QueryError> {
    AddressPredicate::new(fields, value).map(|address| PredicateNode::new(Predicate::Address(address)))
}


fn date_field(ctx: &BuildContext, prefix: DatePrefix, value: &str) -> Result<PredicateNode, QueryError> {
    DatePredicate::new(prefix, value, ctx.settings).map(|date| PredicateNode::new(Predicate::Date(date)))
}


fn size_field(prefix: SizePrefix, value: &str) -> Result<PredicateNode, QueryError> {
    SizePredicate::new(prefix, value).map(|size| PredicateNode::new(Predicate::Size(size)))
}


fn folder_path(value: &str, include_subfolders: bool) -> Result<PredicateNode, QueryError> {
    FolderPredicate::path(value, include_subfolders).map(|folder| PredicateNode::new(Predicate::Folder(folder)))
}


fn folder_id(ctx: &BuildContext, value: &str, include_subfolders: bool) -> Result<PredicateNode, QueryError> {
    FolderPredicate::id(ctx, value, include_subfolders).map(|folder| PredicateNode::new(Predicate::Folder(folder)))
}


/// Double-quotes `value` when it would not survive being written out bare
pub fn quote(value: &str) -> String {
    let bare = !value.is_empty() && !value.chars().any(|c| c.is_whitespace() || c == '"' || c == '(' || c == ')');

    if bare {
        value.to_owned()
    } else {
        quote_always(value)
    }
}


pub fn quote_always(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');

    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }

    quoted.push('"');
    quoted
}


/// Combines one operation per alternative: a union when matching, and the intersection of
/// the negated alternatives otherwise
pub(crate) fn any_of(operations: Vec<Operation>, truth: bool) -> Operation {
    if truth {
        Operation::Union(operations)
    } else {
        Operation::Intersection(operations)
    }
}
