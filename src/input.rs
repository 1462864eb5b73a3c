// Input handling - turns one line typed at the prompt into a request
use crate::app::Frame;
use crate::entry::EntryId;
use crate::error::CommandError;
use crate::io::worker::Request;
use crate::message::{Command, DropRequest, DropTarget, Invocation, Side};

/// What the loop does with a line.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Request(Request),
    /// Step the saved navigation history.
    Back,
    Forward,
    Help,
    Quit,
}

fn usage(text: &str) -> CommandError {
    CommandError::Usage(format!("Usage: {}", text))
}

fn row(word: &str, frame: &Frame) -> Result<usize, CommandError> {
    let count = frame.pane(frame.active).count();
    match word.parse::<usize>() {
        Ok(index) if index < count => Ok(index),
        _ => Err(CommandError::Usage(format!("No row {} in the active pane", word))),
    }
}

fn row_id(word: &str, frame: &Frame) -> Result<EntryId, CommandError> {
    let index = row(word, frame)?;
    Ok(frame.pane(frame.active).entries[index].id.clone())
}

/// Build a drop of the active pane's selection onto `destination`. With a
/// row, the drop lands on that row of the destination pane, either inside
/// it or right after it.
pub fn drop_selection(
    frame: &Frame,
    destination: Side,
    over: Option<(usize, bool)>,
) -> Result<DropRequest, CommandError> {
    let selected = frame.pane(frame.active).selected_entries();
    if selected.is_empty() {
        return Err(CommandError::Usage("Nothing is selected".to_string()));
    }

    let target = match over {
        Some((index, inside)) => {
            let entry = frame.pane(destination).entries.get(index).ok_or_else(|| {
                CommandError::Usage(format!("No row {} in the {} pane", index, destination.as_str()))
            })?;
            DropTarget {
                id: Some(entry.id.clone()),
                kind: Some(entry.kind),
                index: Some(entry.index),
                inside,
            }
        }
        None => DropTarget {
            id: None,
            kind: None,
            index: None,
            inside: false,
        },
    };

    Ok(DropRequest {
        ids: selected.iter().map(|entry| entry.id.clone()).collect(),
        kinds: selected.iter().map(|entry| entry.kind).collect(),
        source: frame.active,
        destination,
        over: target,
    })
}

fn parse_drop(args: &[&str], frame: &Frame) -> Result<Request, CommandError> {
    const USAGE: &str = "drop <left|right> [into|after <row>]";
    let destination: Side = match args.first() {
        Some(side) => side.parse().map_err(|_| usage(USAGE))?,
        None => return Err(usage(USAGE)),
    };
    let over = match &args[1..] {
        [] => None,
        [placement, index] => {
            let inside = match *placement {
                "into" => true,
                "after" => false,
                _ => return Err(usage(USAGE)),
            };
            let index = index.parse::<usize>().map_err(|_| usage(USAGE))?;
            Some((index, inside))
        }
        _ => return Err(usage(USAGE)),
    };
    Ok(Request::Drop(drop_selection(frame, destination, over)?))
}

fn parse_command(name: &str, args: &[&str]) -> Result<Request, CommandError> {
    let mut invocation = Invocation::new(name.parse::<Command>()?);
    let mut rest = Vec::new();
    for arg in args {
        match *arg {
            "--shift" | "-s" => invocation = invocation.shift(),
            "--alt" | "-a" => invocation = invocation.alt(),
            "--ctrl" | "-c" => invocation = invocation.ctrl(),
            word => rest.push(word),
        }
    }
    if invocation.command == Command::Search {
        invocation = invocation.with_query(rest.join(" "));
    } else if let Some(word) = rest.first() {
        return Err(CommandError::Usage(format!(
            "{} takes no argument \"{}\"",
            invocation.command, word
        )));
    }
    Ok(Request::Invoke(invocation))
}

/// Parse one prompt line against the frame currently on screen. Blank
/// lines parse to `None`.
pub fn parse_line(line: &str, frame: &Frame) -> Result<Option<Action>, CommandError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&first, args)) = parts.split_first() else {
        return Ok(None);
    };

    let action = match first {
        "q" | "quit" | "exit" => Action::Quit,
        "?" | "help" => Action::Help,
        "back" => Action::Back,
        "forward" => Action::Forward,
        "ls" | "show" => Action::Request(Request::Show),
        "up" | ".." => Action::Request(Request::Parent),
        "prev" => Action::Request(Request::Previous),
        "focus" => match args {
            [] | ["toggle"] => Action::Request(Request::Focus(None)),
            [side] => Action::Request(Request::Focus(Some(
                side.parse().map_err(|_| usage("focus [left|right|toggle]"))?,
            ))),
            _ => return Err(usage("focus [left|right|toggle]")),
        },
        "select" => match args {
            [] => return Err(usage("select <row>...")),
            [index] => Action::Request(Request::SelectIndex(row(index, frame)?)),
            rows => {
                let ids = rows
                    .iter()
                    .map(|index| row_id(index, frame))
                    .collect::<Result<Vec<_>, _>>()?;
                Action::Request(Request::Select(ids))
            }
        },
        "pick" => match args {
            [index] => Action::Request(Request::Toggle(row_id(index, frame)?)),
            _ => return Err(usage("pick <row>")),
        },
        "drop" => Action::Request(parse_drop(args, frame)?),
        name => Action::Request(parse_command(name, args)?),
    };
    Ok(Some(action))
}
