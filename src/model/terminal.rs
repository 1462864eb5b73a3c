// Terminal host - prompts on stdin, notices on stderr, links via the system opener
use crate::model::{Clipboard, Host, OpenTarget};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Shared line reader over stdin, used by both the command loop and the
/// host's prompts.
pub struct Prompter {
    lines: tokio::sync::Mutex<Lines<BufReader<Stdin>>>,
}

impl Prompter {
    pub fn stdin() -> Self {
        Self {
            lines: tokio::sync::Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Print `prompt` and wait for the next line. `None` on end of input.
    pub async fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        let _ = std::io::stdout().flush();
        match self.lines.lock().await.next_line().await {
            Ok(line) => line,
            Err(e) => {
                log::warn!("Failed to read input: {}", e);
                None
            }
        }
    }
}

fn is_yes(line: Option<&str>) -> bool {
    matches!(
        line.map(|line| line.trim().to_lowercase()).as_deref(),
        Some("y") | Some("yes")
    )
}

/// Blank input takes the default, a number picks a suggestion and a lone
/// "." cancels. Anything else is returned as typed.
fn interpret_answer(line: Option<&str>, default: &str, suggestions: &[&str]) -> Option<String> {
    let line = line?;
    let word = line.trim();
    if word == "." {
        return None;
    }
    if word.is_empty() {
        return Some(default.to_string());
    }
    if let Ok(n) = word.parse::<usize>() {
        if let Some(suggestion) = n.checked_sub(1).and_then(|i| suggestions.get(i)) {
            return Some(suggestion.to_string());
        }
    }
    Some(line.to_string())
}

pub struct TerminalHost {
    prompter: std::sync::Arc<Prompter>,
    clipboard: Mutex<Clipboard>,
    downloads: PathBuf,
}

impl TerminalHost {
    pub fn new(prompter: std::sync::Arc<Prompter>) -> Self {
        let downloads = directories::UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(|dir| dir.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            prompter,
            clipboard: Mutex::new(Clipboard::new()),
            downloads,
        }
    }
}

#[async_trait]
impl Host for TerminalHost {
    async fn confirm(&self, message: &str) -> bool {
        let line = self.prompter.read_line(&format!("{} [y/N] ", message)).await;
        is_yes(line.as_deref())
    }

    async fn ask(&self, title: &str, default: &str, suggestions: &[&str]) -> Option<String> {
        for (n, suggestion) in suggestions.iter().enumerate() {
            println!("  {:>2}) {}", n + 1, suggestion);
        }
        let line = self
            .prompter
            .read_line(&format!("{} [{}] ", title, default))
            .await;
        interpret_answer(line.as_deref(), default, suggestions)
    }

    fn notify(&self, message: &str) {
        eprintln!("! {}", message);
    }

    async fn copy_to_clipboard(&self, text: String) {
        self.clipboard.lock().set(text);
    }

    async fn read_clipboard(&self) -> Option<String> {
        self.clipboard.lock().get()
    }

    async fn download(&self, contents: String, file_name: &str) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.downloads).await?;
        let path = self.downloads.join(file_name);
        tokio::fs::write(&path, contents).await?;
        self.notify(&format!("Saved {}", path.display()));
        Ok(())
    }

    async fn open_url(&self, url: &str, target: OpenTarget) {
        log::debug!("opening {} ({:?})", url, target);
        let owned = url.to_string();
        let result = tokio::task::spawn_blocking(move || open::that(owned)).await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => self.notify(&format!("Could not open {}: {}", url, e)),
            Err(e) => log::warn!("opener task failed: {}", e),
        }
    }
}
