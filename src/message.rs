use crate::entry::{EntryId, EntryKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CommandError;

/// One of the two panes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl FromStr for Side {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            other => Err(CommandError::Usage(format!("Not a side: {}", other))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Command {
    // Opening
    Open,
    OpenInNewWindow,
    OpenInNewIncognitoWindow,
    OpenInNewTab,
    SelectNext,
    SelectPrevious,

    // Clipboard
    CopyDetails,
    CopyTitle,
    CopyId,
    CopyLink,

    // Structural
    Duplicate,
    ImportTree,
    ExportTree,
    Trash,
    EditTitle,
    EditLink,
    MoveLeft,
    MoveRight,
    NewFile,
    NewDirectory,
    Sync,
    Sort,
    MoveTop,
    MoveUp,
    MoveDown,
    MoveBottom,

    // Pane navigation
    Root,
    Mirror,
    OpenFolder,
    Search,
    First,
    Last,
}

impl Command {
    pub const ALL: [Command; 32] = [
        Command::Open,
        Command::OpenInNewWindow,
        Command::OpenInNewIncognitoWindow,
        Command::OpenInNewTab,
        Command::SelectNext,
        Command::SelectPrevious,
        Command::CopyDetails,
        Command::CopyTitle,
        Command::CopyId,
        Command::CopyLink,
        Command::Duplicate,
        Command::ImportTree,
        Command::ExportTree,
        Command::Trash,
        Command::EditTitle,
        Command::EditLink,
        Command::MoveLeft,
        Command::MoveRight,
        Command::NewFile,
        Command::NewDirectory,
        Command::Sync,
        Command::Sort,
        Command::MoveTop,
        Command::MoveUp,
        Command::MoveDown,
        Command::MoveBottom,
        Command::Root,
        Command::Mirror,
        Command::OpenFolder,
        Command::Search,
        Command::First,
        Command::Last,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Open => "open",
            Command::OpenInNewWindow => "open-in-new-window",
            Command::OpenInNewIncognitoWindow => "open-in-new-incognito-window",
            Command::OpenInNewTab => "open-in-new-tab",
            Command::SelectNext => "select-next",
            Command::SelectPrevious => "select-previous",
            Command::CopyDetails => "copy-details",
            Command::CopyTitle => "copy-title",
            Command::CopyId => "copy-id",
            Command::CopyLink => "copy-link",
            Command::Duplicate => "duplicate",
            Command::ImportTree => "import-tree",
            Command::ExportTree => "export-tree",
            Command::Trash => "trash",
            Command::EditTitle => "edit-title",
            Command::EditLink => "edit-link",
            Command::MoveLeft => "move-left",
            Command::MoveRight => "move-right",
            Command::NewFile => "new-file",
            Command::NewDirectory => "new-directory",
            Command::Sync => "sync",
            Command::Sort => "sort",
            Command::MoveTop => "move-top",
            Command::MoveUp => "move-up",
            Command::MoveDown => "move-down",
            Command::MoveBottom => "move-bottom",
            Command::Root => "root",
            Command::Mirror => "mirror",
            Command::OpenFolder => "open-folder",
            Command::Search => "search",
            Command::First => "first",
            Command::Last => "last",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .iter()
            .copied()
            .find(|command| command.name() == s)
            .ok_or_else(|| CommandError::UnknownCommand(s.to_string()))
    }
}

/// Modifier keys held when the command was issued.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub ctrl: bool,
}

/// A command together with the UI event it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Invocation {
    pub command: Command,
    pub modifiers: Modifiers,
    pub query: Option<String>,
}

impl Invocation {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            modifiers: Modifiers::default(),
            query: None,
        }
    }

    pub fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    pub fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

/// Row under the pointer when a drag ends.
#[derive(Clone, Debug, PartialEq)]
pub struct DropTarget {
    pub id: Option<EntryId>,
    pub kind: Option<EntryKind>,
    pub index: Option<usize>,
    /// Dropped onto the row itself rather than between rows.
    pub inside: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DropRequest {
    pub ids: Vec<EntryId>,
    pub kinds: Vec<EntryKind>,
    pub source: Side,
    pub destination: Side,
    pub over: DropTarget,
}

/// What a finished command leaves behind for the front end.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Outcome {
    #[default]
    Done,
    /// Store mutated; both panes were reloaded.
    Updated,
    /// Only pane navigation happened.
    Navigated(Side),
    Aborted,
}
