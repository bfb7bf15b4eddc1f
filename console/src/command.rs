//! Command parser for the moderator console
//!
//! Parses lines like "approve 2 spam link", "filter status=pending" or
//! "show m-42".

use chrono::{DateTime, NaiveDate, Utc};
use moderation_core::entities::{
    ContentType, ModerationAction, ModerationFilter, ModerationStatus, SortOrder,
};

use crate::error::ParseError;

/// An item addressed either by its row number in the last listing or by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    /// Zero-based row index
    Row(usize),
    Id(String),
}

impl ItemRef {
    fn parse(raw: &str) -> Result<Self, ParseError> {
        let digits = raw.strip_prefix('#').unwrap_or(raw);
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            let n: usize = digits.parse().map_err(|_| {
                ParseError::InvalidArgument(format!("'{}' is not a valid row number", raw))
            })?;
            if n == 0 {
                return Err(ParseError::InvalidArgument(
                    "row numbers start at 1".to_string(),
                ));
            }
            return Ok(ItemRef::Row(n - 1));
        }
        Ok(ItemRef::Id(raw.to_string()))
    }
}

/// One `key=value` change to the active filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Status(Option<ModerationStatus>),
    ContentType(Option<ContentType>),
    Category(Option<String>),
    CreatedFrom(Option<DateTime<Utc>>),
    CreatedTo(Option<DateTime<Utc>>),
    Search(Option<String>),
    Sort(SortOrder),
}

impl FilterChange {
    pub fn apply(self, filter: &mut ModerationFilter) {
        match self {
            FilterChange::Status(v) => filter.status = v,
            FilterChange::ContentType(v) => filter.content_type = v,
            FilterChange::Category(v) => filter.category = v,
            FilterChange::CreatedFrom(v) => filter.created_from = v,
            FilterChange::CreatedTo(v) => filter.created_to = v,
            FilterChange::Search(v) => filter.search = v,
            FilterChange::Sort(v) => filter.sort = v,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the filtered queue
    List,

    /// Open an item in the detail pane
    Show { item: ItemRef },

    /// Close the detail pane
    Back,

    /// Approve, deny or quarantine an item
    Act {
        action: ModerationAction,
        item: ItemRef,
        reason: Option<String>,
    },

    /// Adjust the active filter
    Filter { changes: Vec<FilterChange> },

    /// Reset the filter to show everything
    ClearFilter,

    Stats,
    Refresh,
    Help,
    Quit,
}

/// Parse a console command from text input
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::UnknownCommand("empty input".to_string()));
    }

    let (command, rest) = match input.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (input, ""),
    };
    let command = command.to_lowercase();

    match command.as_str() {
        "list" | "ls" | "queue" => Ok(Command::List),

        "show" | "open" | "details" => {
            let item = rest
                .split_whitespace()
                .next()
                .ok_or_else(|| ParseError::MissingArgument("show".to_string()))?;
            Ok(Command::Show {
                item: ItemRef::parse(item)?,
            })
        }

        "back" | "close" => Ok(Command::Back),

        "approve" | "deny" | "quarantine" => {
            let action: ModerationAction = command
                .parse()
                .map_err(|_| ParseError::UnknownCommand(command.clone()))?;
            let (item, reason) = match rest.split_once(char::is_whitespace) {
                Some((item, reason)) => (item, Some(reason.trim().to_string())),
                None => (rest, None),
            };
            if item.is_empty() {
                return Err(ParseError::MissingArgument(command));
            }
            Ok(Command::Act {
                action,
                item: ItemRef::parse(item)?,
                reason: reason.filter(|r| !r.is_empty()),
            })
        }

        "filter" => {
            if rest.is_empty() {
                return Err(ParseError::MissingArgument("filter".to_string()));
            }
            if rest.eq_ignore_ascii_case("clear") || rest.eq_ignore_ascii_case("reset") {
                return Ok(Command::ClearFilter);
            }
            Ok(Command::Filter {
                changes: parse_filter_args(rest)?,
            })
        }

        "stats" => Ok(Command::Stats),
        "refresh" | "reload" => Ok(Command::Refresh),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),

        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

/// Parse `key=value` pairs. `search=` consumes the rest of the line.
fn parse_filter_args(args: &str) -> Result<Vec<FilterChange>, ParseError> {
    let mut changes = Vec::new();
    let mut remaining = args.trim();

    while !remaining.is_empty() {
        let (pair, rest) = match remaining.split_once(char::is_whitespace) {
            Some((pair, rest)) => (pair, rest.trim_start()),
            None => (remaining, ""),
        };
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            ParseError::InvalidArgument(format!("expected key=value, got '{}'", pair))
        })?;
        let key = key.to_lowercase();

        if key == "search" {
            let term = format!("{} {}", value, rest);
            let term = term.trim();
            changes.push(FilterChange::Search(
                (!term.is_empty()).then(|| term.to_string()),
            ));
            break;
        }

        changes.push(match key.as_str() {
            "status" => FilterChange::Status(parse_or_all(value)?),
            "type" | "contenttype" => FilterChange::ContentType(parse_or_all(value)?),
            "category" => FilterChange::Category(parse_or_all(value)?),
            "from" => FilterChange::CreatedFrom(parse_date(value, false)?),
            "to" => FilterChange::CreatedTo(parse_date(value, true)?),
            "sort" => FilterChange::Sort(
                value
                    .parse()
                    .map_err(|e: String| ParseError::InvalidArgument(e))?,
            ),
            other => {
                return Err(ParseError::InvalidArgument(format!(
                    "unknown filter '{}'",
                    other
                )))
            }
        });
        remaining = rest;
    }

    Ok(changes)
}

fn parse_or_all<T>(value: &str) -> Result<Option<T>, ParseError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|e: T::Err| ParseError::InvalidArgument(e.to_string()))
}

/// RFC 3339 timestamp or a plain date. A plain `to` date covers the whole day.
fn parse_date(value: &str, end_of_day: bool) -> Result<Option<DateTime<Utc>>, ParseError> {
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ParseError::InvalidArgument(format!("'{}' is not a date", value)))?;
    let (h, m, s) = if end_of_day { (23, 59, 59) } else { (0, 0, 0) };
    let at = date
        .and_hms_opt(h, m, s)
        .ok_or_else(|| ParseError::InvalidArgument(format!("'{}' is not a date", value)))?;
    Ok(Some(at.and_utc()))
}

pub fn help_text() -> String {
    r#"Commands
  list                          Show the queue with the active filter
  show N | show <id>            Open row N (or an item id) in the detail pane
  back                          Close the detail pane
  approve N [reason]            Approve a pending item
  deny N [reason]               Deny a pending item
  quarantine N [reason]         Quarantine a pending item
  filter key=value ...          status, type, category, from, to, sort, search
  filter clear                  Show everything again
  stats                         Queue statistics
  refresh                       Reload the queue from the server
  help                          Show this help
  quit                          Leave the console

Row numbers refer to the last listing. Use "all" to clear a single filter."#
        .to_string()
}
