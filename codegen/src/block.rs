//! Indented source text builder.

const INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Code { indent: usize, text: String },
    Blank,
}

/// Lines of generated source with their indentation levels.
///
/// Nested blocks are built separately and pushed indented, so emitters never
/// track the current depth themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    lines: Vec<Line>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one line. Embedded newlines are written verbatim.
    pub fn line(&mut self, text: impl Into<String>) {
        self.lines.push(Line::Code {
            indent: 0,
            text: text.into(),
        });
    }

    pub fn blank(&mut self) {
        self.lines.push(Line::Blank);
    }

    pub fn push_block(&mut self, block: Block) {
        self.lines.extend(block.lines);
    }

    /// Appends `block` one level deeper, between `open` and `close` lines.
    pub fn wrap(&mut self, open: impl Into<String>, block: Block, close: impl Into<String>) {
        self.line(open);
        self.push_block(block.indent());
        self.line(close);
    }

    /// Shifts every line one level deeper.
    pub fn indent(mut self) -> Self {
        for line in &mut self.lines {
            if let Line::Code { indent, .. } = line {
                *indent += 1;
            }
        }
        self
    }

    /// Renders the block, every line terminated by `\n`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            if let Line::Code { indent, text } = line {
                out.push_str(&INDENT.repeat(*indent));
                out.push_str(text);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_blocks_indent() {
        let mut body = Block::new();
        body.line("let x = 1;");
        body.blank();
        body.line("x");

        let mut root = Block::new();
        root.wrap("fn f() -> i32 {", body, "}");

        assert_eq!(root.render(), "fn f() -> i32 {\n    let x = 1;\n\n    x\n}\n");
    }

    #[test]
    fn test_double_indent() {
        let mut inner = Block::new();
        inner.line("a");
        let mut root = Block::new();
        root.push_block(inner.indent().indent());
        assert_eq!(root.render(), "        a\n");
    }

    #[test]
    fn test_empty_block_renders_nothing() {
        assert_eq!(Block::new().render(), "");
    }
}
