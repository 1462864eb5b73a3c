/// In-process text clipboard for front ends without a system one.
#[derive(Clone, Debug, Default)]
pub struct Clipboard {
    pub text: Option<String>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.as_deref().map_or(true, str::is_empty)
    }

    pub fn set(&mut self, text: String) {
        self.text = Some(text);
    }

    /// The stored text, or `None` when nothing non-empty was copied.
    pub fn get(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        self.text.clone()
    }
}
