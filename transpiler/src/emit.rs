use std::fmt;

use crate::indent::Line;

/// How translated lines are spelled in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendering {
    /// Text repeated once per nesting level.
    pub indent: String,
    /// Replaces a leading `def ` on top-level lines.
    pub function_keyword: String,
    /// Member prefix in the source language.
    pub self_prefix: String,
    /// Member prefix it is rewritten to inside blocks.
    pub this_prefix: String,
}

impl Default for Rendering {
    fn default() -> Self {
        Rendering {
            indent: "  ".to_string(),
            function_keyword: "function ".to_string(),
            self_prefix: "self.".to_string(),
            this_prefix: "this.".to_string(),
        }
    }
}

impl Rendering {
    fn pad(&self, level: usize) -> String {
        self.indent.repeat(level)
    }
}

/// One output line of the block emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emitted {
    /// Synthetic `{` at the given nesting level.
    Open(usize),
    /// Synthetic `}` at the given nesting level.
    Close(usize),
    /// A translated source line.
    Code { depth: usize, text: String },
    Blank,
}

const DEF_PREFIX: &str = "def ";

/// Turn depth changes into explicit block delimiters.
///
/// Every increase of one level opens a block and every decrease closes one,
/// and all blocks still open after the last line are closed, so the output is
/// balanced whatever the input indentation looks like.
pub fn emit_blocks(lines: &[Line], rendering: &Rendering) -> Vec<Emitted> {
    let mut out = Vec::with_capacity(lines.len());
    let mut last = 0usize;

    for line in lines {
        while line.depth < last {
            last -= 1;
            out.push(Emitted::Close(last));
        }
        while line.depth > last {
            out.push(Emitted::Open(last));
            last += 1;
        }

        let content = line.content();
        if content.is_empty() {
            out.push(Emitted::Blank);
        } else {
            out.push(Emitted::Code {
                depth: line.depth,
                text: translate(content, line.depth, rendering),
            });
        }
    }

    while last > 0 {
        last -= 1;
        out.push(Emitted::Close(last));
    }
    out
}

fn translate(content: &str, depth: usize, rendering: &Rendering) -> String {
    if depth == 0 {
        match content.strip_prefix(DEF_PREFIX) {
            Some(rest) => format!("{}{}", rendering.function_keyword, rest),
            None => content.to_string(),
        }
    } else {
        // Nested definitions become methods: only the keyword goes, the
        // parameter list is kept as written.
        match content.strip_prefix(DEF_PREFIX) {
            Some(rest) => rest.to_string(),
            None => content.replace(&rendering.self_prefix, &rendering.this_prefix),
        }
    }
}

/// Emitted lines paired with the rendering that spells them.
pub struct Rendered<'a> {
    pub emitted: &'a [Emitted],
    pub rendering: &'a Rendering,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pad = |level: usize| self.rendering.pad(level);
        for item in self.emitted {
            match item {
                Emitted::Open(level) => writeln!(f, "{}{{", pad(*level))?,
                Emitted::Close(level) => writeln!(f, "{}}}", pad(*level))?,
                Emitted::Code { depth, text } => writeln!(f, "{}{}", pad(*depth), text)?,
                Emitted::Blank => writeln!(f)?,
            }
        }
        Ok(())
    }
}

/// Render emitted lines as text, one `\n`-terminated line each.
pub fn render(emitted: &[Emitted], rendering: &Rendering) -> String {
    Rendered { emitted, rendering }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indent::measure;

    fn emit(lines: &[&str]) -> Vec<Emitted> {
        emit_blocks(&measure(lines.iter().copied()), &Rendering::default())
    }

    fn code(depth: usize, text: &str) -> Emitted {
        Emitted::Code {
            depth,
            text: text.to_string(),
        }
    }

    #[test]
    fn flat_input_has_no_braces() {
        assert_eq!(emit(&["a = 1", "b = 2"]), vec![code(0, "a = 1"), code(0, "b = 2")]);
    }

    #[test]
    fn top_level_def_becomes_function() {
        let out = emit(&["def draw():", "    screen.clear()"]);
        assert_eq!(
            out,
            vec![
                code(0, "function draw():"),
                Emitted::Open(0),
                code(1, "screen.clear()"),
                Emitted::Close(0),
            ]
        );
    }

    #[test]
    fn nested_def_becomes_method_and_body_self_is_rewritten() {
        let out = emit(&["class Ship:", "  def move(self):", "    self.x += 1"]);
        assert_eq!(
            out,
            vec![
                code(0, "class Ship:"),
                Emitted::Open(0),
                code(1, "move(self):"),
                Emitted::Open(1),
                code(2, "this.x += 1"),
                Emitted::Close(1),
                Emitted::Close(0),
            ]
        );
    }

    #[test]
    fn nested_def_line_keeps_self_in_its_parameters() {
        let out = emit(&["class S:", "  def f(self, v=self.v):", "    return self.v"]);
        assert_eq!(out[2], code(1, "f(self, v=self.v):"));
        assert_eq!(out[4], code(2, "return this.v"));
    }

    #[test]
    fn top_level_self_is_left_alone() {
        assert_eq!(emit(&["self.x = 1"]), vec![code(0, "self.x = 1")]);
    }

    #[test]
    fn jump_of_several_levels_opens_each() {
        let out = emit(&["a", "   b", "c"]);
        assert_eq!(
            out,
            vec![
                code(0, "a"),
                Emitted::Open(0),
                Emitted::Open(1),
                Emitted::Open(2),
                code(3, "b"),
                Emitted::Close(2),
                Emitted::Close(1),
                Emitted::Close(0),
                code(0, "c"),
            ]
        );
    }

    #[test]
    fn blank_line_inside_block_does_not_close_it() {
        let out = emit(&["a", "", "  b"]);
        assert_eq!(
            out,
            vec![
                code(0, "a"),
                Emitted::Open(0),
                Emitted::Blank,
                code(1, "b"),
                Emitted::Close(0),
            ]
        );
    }

    #[test]
    fn renders_braces_at_their_level() {
        let rendering = Rendering::default();
        let text = render(&emit(&["if a:", "    if b:", "        c()"]), &rendering);
        assert_eq!(text, "if a:\n{\n  if b:\n  {\n    c()\n  }\n}\n");
    }

    #[test]
    fn custom_rendering_is_honored() {
        let rendering = Rendering {
            indent: "\t".to_string(),
            function_keyword: "async function ".to_string(),
            ..Rendering::default()
        };
        let lines = measure(["def go():", "  self.y = 2"]);
        let text = render(&emit_blocks(&lines, &rendering), &rendering);
        assert_eq!(text, "async function go():\n{\n\tthis.y = 2\n}\n");
    }
}
