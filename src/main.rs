#[macro_use]
extern crate slog;
extern crate slog_term;
extern crate mailsearch;

use std::env;
use std::fs;
use std::process;
use std::sync::Mutex;

use slog::{Drain, Logger};

use mailsearch::analysis::StandardAnalyzer;
use mailsearch::decode;
use mailsearch::mailbox::Mailbox;
use mailsearch::mailbox::memory::MemoryMailbox;
use mailsearch::predicate::{BuildContext, CompileContext};
use mailsearch::settings::SearchSettings;


const USAGE: &'static str = "usage: mailsearch <mailbox.json> <search.json> [settings.json]";


fn read_file(log: &Logger, path: &str) -> Result<String, String> {
    debug!(log, "reading file"; "path" => path);

    fs::read_to_string(path).map_err(|error| format!("could not read {}: {}", path, error))
}


fn run(log: &Logger, args: &[String]) -> Result<(), String> {
    let (mailbox_path, search_path) = match args {
        [ref mailbox, ref search] | [ref mailbox, ref search, _] => (mailbox, search),
        _ => return Err(USAGE.to_owned()),
    };

    let mailbox = MemoryMailbox::from_json_str(&read_file(log, mailbox_path)?).map_err(|error| error.to_string())?;

    let settings = match args.get(2) {
        Some(path) => SearchSettings::from_json_str(&read_file(log, path)?).map_err(|error| format!("malformed settings: {}", error))?,
        None => SearchSettings::default(),
    };

    let search: serde_json::Value = serde_json::from_str(&read_file(log, search_path)?).map_err(|error| format!("malformed search: {}", error))?;
    let clauses = decode::parse(&BuildContext::new(&settings, mailbox.account_id()), &search).map_err(|error| error.to_string())?;

    info!(log, "decoded search"; "search" => clauses.dump(), "predicates" => clauses.leaves().len());
    println!("{}", clauses.dump());

    // Each predicate is compiled as if it stood alone; combining them is left to the caller
    let analyzer = StandardAnalyzer::new();
    let ctx = CompileContext::new(&mailbox, &analyzer, &settings, log.clone());

    for node in clauses.leaves() {
        let operation = node.compile(&ctx, true).map_err(|error| format!("{}: {}", node.dump(), error))?;
        println!("  {}  =>  {}", node.dump(), operation);
    }

    Ok(())
}


fn main() {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build();
    let log = Logger::root(Mutex::new(drain).fuse(), o!("version" => env!("CARGO_PKG_VERSION")));

    let args = env::args().skip(1).collect::<Vec<String>>();

    if let Err(message) = run(&log, &args) {
        error!(log, "search failed"; "error" => &message);
        eprintln!("{}", message);
        process::exit(1);
    }
}
