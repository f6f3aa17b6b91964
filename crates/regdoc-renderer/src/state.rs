//! Event-tracking state for markdown rendering.

use pulldown_cmark::Alignment;

/// Buffered code block between its start and end events.
#[derive(Default)]
pub struct CodeBlockState {
    /// Set between the fence's start and end events.
    active: bool,
    /// Fence language tag as written, before highlighter aliasing.
    language: Option<String>,
    /// Raw block text, unescaped.
    buffer: String,
}

impl CodeBlockState {
    /// Open a block tagged with `language`, discarding leftover text.
    pub fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// End the current block and return (language, content).
    pub fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// Header flag and column alignments of the table being rendered.
#[derive(Default)]
pub struct TableState {
    /// Cells are `<th>` while set.
    in_head: bool,
    /// One entry per column, from the delimiter row.
    alignments: Vec<Alignment>,
    /// Zero-based column of the cell being rendered.
    cell_index: usize,
}

impl TableState {
    pub fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    /// Enter the header row; cell numbering restarts.
    pub fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub fn end_head(&mut self) {
        self.in_head = false;
    }

    /// Begin a body row at column zero.
    pub fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Inline style attribute for the current cell.
    pub fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Alt text captured between image start and end events.
#[derive(Default)]
pub struct ImageState {
    /// `(src, title)` of the image whose alt text is being captured.
    pending: Option<(String, String)>,
    /// Plain text of the image's inline children.
    alt_text: String,
}

impl ImageState {
    /// Start capturing alt text for an image with `src` and `title`.
    pub fn start(&mut self, src: String, title: String) {
        self.pending = Some((src, title));
        self.alt_text.clear();
    }

    /// End capture and return (src, title, alt).
    pub fn end(&mut self) -> Option<(String, String, String)> {
        let (src, title) = self.pending.take()?;
        Some((src, title, std::mem::take(&mut self.alt_text)))
    }

    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#""quoted""#), "&quot;quoted&quot;");
        assert_eq!(escape_html("it's"), "it&#x27;s");
    }

    #[test]
    fn test_code_block_state() {
        let mut state = CodeBlockState::default();
        assert!(!state.is_active());

        state.start(Some("python".to_owned()));
        assert!(state.is_active());

        state.push_str("print(1)");
        let (lang, content) = state.end();
        assert_eq!(lang.as_deref(), Some("python"));
        assert_eq!(content, "print(1)");
        assert!(!state.is_active());
    }

    #[test]
    fn test_table_state() {
        let mut state = TableState::default();
        state.start(vec![Alignment::Left, Alignment::None, Alignment::Right]);

        state.start_head();
        assert!(state.is_in_head());
        assert_eq!(state.current_alignment_style(), r#" style="text-align:left""#);

        state.next_cell();
        assert_eq!(state.current_alignment_style(), "");

        state.next_cell();
        assert_eq!(state.current_alignment_style(), r#" style="text-align:right""#);

        state.end_head();
        assert!(!state.is_in_head());
    }

    #[test]
    fn test_image_state() {
        let mut state = ImageState::default();
        assert!(!state.is_active());

        state.start("a.png".to_owned(), String::new());
        assert!(state.is_active());
        state.push_str("diagram");

        assert_eq!(
            state.end(),
            Some(("a.png".to_owned(), String::new(), "diagram".to_owned()))
        );
        assert!(!state.is_active());
        assert_eq!(state.end(), None);
    }
}
