//! Parses operator input lines into messages.

use leadops_core::{AppViewModel, Msg};

pub(crate) const HELP: &str = "\
Mission
  kw <text>        add a keyword          kw- <n>    remove keyword n
  loc <text>       add a location         loc- <n>   remove location n
  launch           start the mission      dismiss    clear a finished mission
Leads
  search [text]    filter by text         filter <keyword>|all
  page <n>         go to page n           next | prev | refresh
  toggle <row>     select a row           all | none
  del <row>        delete a row           bulk       delete the selection
  export           write the page to CSV  stats      fetch totals
  y | n            answer a confirmation
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Msg(Msg),
    Help,
    Redraw,
    Quit,
    Invalid(String),
}

/// Row numbers are 1-based and refer to the rows of `view`.
pub(crate) fn parse(line: &str, view: &AppViewModel) -> Command {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let msg = match verb.to_ascii_lowercase().as_str() {
        "" => return Command::Redraw,
        "help" | "?" => return Command::Help,
        "quit" | "exit" | "q" => return Command::Quit,
        "kw" => Msg::KeywordEntered(rest.to_string()),
        "kw-" => match index(rest, view.mission.keywords.len()) {
            Ok(i) => Msg::KeywordRemoved(i),
            Err(reason) => return Command::Invalid(reason),
        },
        "loc" => Msg::LocationEntered(rest.to_string()),
        "loc-" => match index(rest, view.mission.locations.len()) {
            Ok(i) => Msg::LocationRemoved(i),
            Err(reason) => return Command::Invalid(reason),
        },
        "launch" => Msg::LaunchClicked,
        "dismiss" => Msg::DismissClicked,
        "search" => Msg::SearchChanged(rest.to_string()),
        "filter" => match rest {
            "" => return Command::Invalid("usage: filter <keyword>|all".to_string()),
            "all" => Msg::KeywordFilterSelected(None),
            keyword => Msg::KeywordFilterSelected(Some(keyword.to_string())),
        },
        "page" => match rest.parse::<u32>() {
            Ok(page) => Msg::PageRequested(page),
            Err(_) => return Command::Invalid(format!("not a page number: {rest}")),
        },
        "next" => Msg::NextPage,
        "prev" => Msg::PrevPage,
        "refresh" => Msg::RefreshClicked,
        "toggle" | "del" => {
            let row = match index(rest, view.browser.rows.len()) {
                Ok(i) => &view.browser.rows[i],
                Err(reason) => return Command::Invalid(reason),
            };
            if verb.eq_ignore_ascii_case("toggle") {
                Msg::LeadToggled(row.id.clone())
            } else {
                Msg::DeleteLeadClicked(row.id.clone())
            }
        }
        "all" => Msg::SelectAllClicked,
        "none" => Msg::ClearSelectionClicked,
        "bulk" => Msg::BulkDeleteClicked,
        "export" => Msg::ExportClicked,
        "stats" => Msg::StatsRequested,
        "y" | "yes" => Msg::ConfirmationAnswered(true),
        "n" | "no" => Msg::ConfirmationAnswered(false),
        other => return Command::Invalid(format!("unknown command: {other} (try help)")),
    };
    Command::Msg(msg)
}

/// Converts a 1-based position into an index below `len`.
fn index(raw: &str, len: usize) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 && n <= len => Ok(n - 1),
        Ok(n) => Err(format!("no entry {n}; there are {len}")),
        Err(_) => Err(format!("not a number: {raw}")),
    }
}
