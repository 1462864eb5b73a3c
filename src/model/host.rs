use async_trait::async_trait;

/// Where a link should be opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenTarget {
    CurrentTab,
    BackgroundTab,
    Window { incognito: bool },
}

/// Browser and user facing collaborators the commands rely on: prompts,
/// notices, the clipboard, downloads and tabs.
#[async_trait]
pub trait Host: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;

    /// Text prompt. `None` when the user cancels.
    async fn ask(&self, title: &str, default: &str, suggestions: &[&str]) -> Option<String>;

    /// Transient user-facing notice.
    fn notify(&self, message: &str);

    async fn copy_to_clipboard(&self, text: String);

    async fn read_clipboard(&self) -> Option<String>;

    async fn download(&self, contents: String, file_name: &str) -> std::io::Result<()>;

    async fn open_url(&self, url: &str, target: OpenTarget);
}
