// Text rendering of a frame for the terminal front end
use crate::app::Frame;
use crate::message::{Command, Side};
use crate::state::navigator::Toolbar;
use crate::state::pane::PaneState;
use std::fmt::Write;

/// Commands whose availability depends on the selection.
const TOOLBAR: [Command; 16] = [
    Command::Duplicate,
    Command::MoveLeft,
    Command::MoveRight,
    Command::Trash,
    Command::Sort,
    Command::CopyLink,
    Command::EditLink,
    Command::EditTitle,
    Command::NewFile,
    Command::NewDirectory,
    Command::ImportTree,
    Command::Sync,
    Command::MoveTop,
    Command::MoveUp,
    Command::MoveDown,
    Command::MoveBottom,
];

/// One line naming what both panes show.
pub fn window_title(frame: &Frame) -> String {
    format!("{} | {}", frame.left.title, frame.right.title)
}

pub fn prompt(frame: &Frame) -> String {
    format!("{}> ", frame.active.as_str())
}

pub fn toolbar_line(toolbar: &Toolbar) -> String {
    TOOLBAR
        .iter()
        .filter(|command| toolbar.is_enabled(**command))
        .map(|command| command.name())
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_pane(out: &mut String, side: Side, state: &PaneState, active: bool) {
    let marker = if active { '>' } else { ' ' };
    let _ = writeln!(out, "{} {:<5} {}", marker, side.as_str(), state.title);

    if state.parent_link.is_some() {
        let _ = writeln!(out, "        ..");
    }
    if state.entries.is_empty() {
        let _ = writeln!(out, "        (empty)");
    }
    for (row, entry) in state.entries.iter().enumerate() {
        let selected = if state.selection.contains(&entry.id) { '*' } else { ' ' };
        let _ = match &entry.url {
            Some(url) if !entry.is_dir() => {
                writeln!(out, "  {} {:>3}  {}  {}", selected, row, entry.title, url)
            }
            _ => writeln!(out, "  {} {:>3}  {}/", selected, row, entry.title),
        };
    }
}

/// Both panes followed by the commands the current selection allows.
pub fn render(frame: &Frame) -> String {
    let mut out = String::new();
    for side in [Side::Left, Side::Right] {
        render_pane(&mut out, side, frame.pane(side), side == frame.active);
    }
    let _ = writeln!(out, "[{}]", toolbar_line(&frame.toolbar));
    out
}

pub fn help() -> String {
    let mut out = String::from(
        "select <row>...             select rows of the active pane\n\
         pick <row>                  toggle one row\n\
         focus [left|right|toggle]   switch the active pane\n\
         up | prev                   parent directory | previous location\n\
         back | forward              step the saved history\n\
         drop <side> [into|after <row>]  drag the selection onto a pane\n\
         ls | help | quit\n\
         \n\
         commands (flags: --shift --alt --ctrl):\n",
    );
    for chunk in Command::ALL.chunks(4) {
        let names: Vec<&str> = chunk.iter().map(|command| command.name()).collect();
        let _ = writeln!(out, "  {}", names.join("  "));
    }
    out
}
