#![allow(dead_code)]

use slog::{Logger, Discard, o};

use mailsearch::analysis::StandardAnalyzer;
use mailsearch::error::QueryError;
use mailsearch::mailbox::Mailbox;
use mailsearch::mailbox::memory::MemoryMailbox;
use mailsearch::operation::Operation;
use mailsearch::predicate::{BuildContext, CompileContext, PredicateNode, Modifier};
use mailsearch::predicate::clause::{ClauseList, Clause, Conjunction};
use mailsearch::settings::SearchSettings;


pub const MAILBOX: &'static str = "
{
    \"account_id\": \"0b7a4c3e-6f0e-4a39-9d8c-1f2a3b4c5d6e\",
    \"account_name\": \"user@example.com\",
    \"aliases\": [\"alias@example.com\"],
    \"folders\": [
        {\"id\": 257, \"parent\": 2, \"name\": \"Work\"},
        {\"id\": 258, \"parent\": 257, \"name\": \"A\"},
        {\"id\": 259, \"parent\": 257, \"name\": \"B\"},
        {\"id\": 260, \"parent\": 257, \"name\": \"C\"},
        {\"id\": 261, \"parent\": 1, \"name\": \"Saved\", \"kind\": \"search\"},
        {\"id\": 300, \"parent\": 1, \"name\": \"Shared\", \"kind\": {\"mountpoint\": {\"owner\": \"0b7a4c3e-6f0e-4a39-9d8c-1f2a3b4c5d6e\", \"remote_id\": 257}}},
        {\"id\": 301, \"parent\": 1, \"name\": \"Partner\", \"kind\": {\"mountpoint\": {\"owner\": \"00000000-0000-0000-0000-0000000000ff\", \"remote_id\": 55}}}
    ],
    \"tags\": [
        {\"id\": 64, \"name\": \"Important\"}
    ]
}
";


pub const SETTINGS: &'static str = "
{
    \"now\": \"2024-03-15T10:30:00Z\"
}
";


pub fn mailbox() -> MemoryMailbox {
    MemoryMailbox::from_json_str(MAILBOX).unwrap()
}


pub fn settings() -> SearchSettings {
    SearchSettings::from_json_str(SETTINGS).unwrap()
}


pub fn build(field: &str, value: &str) -> Result<PredicateNode, QueryError> {
    let settings = settings();
    let ctx = BuildContext::new(&settings, mailbox().account_id());

    PredicateNode::build(&ctx, field, value).expect("unknown search field")
}


pub fn compile(node: &PredicateNode, truth: bool) -> Result<Operation, QueryError> {
    let mailbox = mailbox();
    let settings = settings();
    let analyzer = StandardAnalyzer::new();
    let ctx = CompileContext::new(&mailbox, &analyzer, &settings, Logger::root(Discard, o!()));

    node.compile(&ctx, truth)
}


/// The operation that selects exactly the items `operation` rejects
pub fn complement(operation: &Operation) -> Operation {
    match *operation {
        Operation::NoResults => Operation::Unconstrained,
        Operation::Unconstrained => Operation::NoResults,
        Operation::Db(ref op) => Operation::db(op.constraint.clone(), !op.truth),
        Operation::Index(ref op) => Operation::index(op.field, op.query.clone(), !op.truth),
        Operation::Union(ref operations) => Operation::Intersection(operations.iter().map(complement).collect()),
        Operation::Intersection(ref operations) => Operation::Union(operations.iter().map(complement).collect()),
    }
}


/// Reads search text in the form predicates and clause lists dump themselves as
pub fn read(text: &str) -> Result<ClauseList, String> {
    let settings = settings();
    let ctx = BuildContext::new(&settings, mailbox().account_id());
    let mut reader = Reader {
        chars: text.chars().collect(),
        position: 0,
        ctx: ctx,
    };

    let clauses = reader.read_clauses()?;
    if reader.position < reader.chars.len() {
        return Err(format!("unexpected ')' at {}", reader.position));
    }

    Ok(ClauseList::new(clauses))
}


struct Reader<'a> {
    chars: Vec<char>,
    position: usize,
    ctx: BuildContext<'a>,
}


impl<'a> Reader<'a> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).cloned()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().map_or(false, |c| c.is_whitespace()) {
            self.position += 1;
        }
    }

    /// Reads clauses up to the end of the text or an unmatched `)`, which is left unread
    fn read_clauses(&mut self) -> Result<Vec<Clause>, String> {
        let mut clauses = Vec::new();

        loop {
            self.skip_whitespace();

            match self.peek() {
                None | Some(')') => return Ok(clauses),
                _ => clauses.push(self.read_clause()?),
            }
        }
    }

    fn read_clause(&mut self) -> Result<Clause, String> {
        let modifier = match self.peek() {
            Some('+') => Modifier::Require,
            Some('-') => Modifier::Exclude,
            _ => Modifier::None,
        };
        if modifier != Modifier::None {
            self.position += 1;
        }

        if self.peek() == Some('(') {
            self.position += 1;
            let clauses = self.read_clauses()?;

            if self.peek() != Some(')') {
                return Err("unclosed '('".to_owned());
            }
            self.position += 1;

            return Ok(Clause::List(ClauseList::new(clauses).with_modifier(modifier)));
        }

        let mut field = String::new();
        while let Some(c) = self.peek() {
            if c == ':' || c.is_whitespace() || c == ')' {
                break;
            }
            field.push(c);
            self.position += 1;
        }

        if modifier == Modifier::None && self.peek() != Some(':') {
            match &field[..] {
                "AND" => return Ok(Clause::Conjunction(Conjunction::And)),
                "OR" => return Ok(Clause::Conjunction(Conjunction::Or)),
                _ => {}
            }
        }

        if self.peek() != Some(':') {
            return Err(format!("expected ':' after {:?}", field));
        }
        self.position += 1;

        let value = self.read_value()?;

        match PredicateNode::build(&self.ctx, &field, &value) {
            Some(Ok(node)) => Ok(Clause::Node(node.with_modifier(modifier))),
            Some(Err(error)) => Err(error.to_string()),
            None => Err(format!("unknown field {:?}", field)),
        }
    }

    fn read_value(&mut self) -> Result<String, String> {
        let mut value = String::new();

        if self.peek() != Some('"') {
            while let Some(c) = self.peek() {
                if c.is_whitespace() || c == ')' {
                    break;
                }
                value.push(c);
                self.position += 1;
            }

            return Ok(value);
        }

        self.position += 1;
        loop {
            match self.peek() {
                None => return Err("unterminated quote".to_owned()),
                Some('"') => {
                    self.position += 1;
                    return Ok(value);
                }
                Some('\\') => {
                    self.position += 1;
                    match self.peek() {
                        Some(c) => value.push(c),
                        None => return Err("unterminated escape".to_owned()),
                    }
                }
                Some(c) => value.push(c),
            }
            self.position += 1;
        }
    }
}
