use std::fmt;

use crate::resources::{Resources, font_format, stem};

const HEAD_TO_TITLE: &str = r#"<!DOCTYPE html>

<html lang="en-US">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>"#;

const TITLE_TO_FONTS: &str = r#"</title>
  <script src="jsgame0.js"></script>
  <style type="text/css" media="screen">
"#;

const STYLE_TO_BODY: &str = r#"body {
  background-color: white;
  color: black;
}
.hidden {
  display: none;
}
#original {
  margin-left: 1em;
}
  </style>
</head>

<body>
"#;

// Leading newline separates the loaders from <main>.
const MAIN_TO_HEADING: &str = r#"
<main>
<h1>"#;

const HEADING_TO_CODE: &str = r#"</h1>

<canvas id="screen">
The game screen appears here if your browser supports the Canvas API.
</canvas>
<section id="controls">
  <button type="button" id="reset">Reset</button>
  <button type="button" id="pause">Pause</button>
</section>

<h2>Original Python code</h2>

<pre id="original"><code>
"#;

const CODE_TO_SCRIPT: &str = r#"
</code></pre>
</main>

<script>
"#;

// Leading newline covers code that does not end with one.
const SCRIPT_TO_END: &str = r#"
window.addEventListener('load', (event) => {
  images.LOAD('#imageLoader img');
  sounds.LOAD('#soundLoader audio');
  music.LOAD('#musicLoader audio');
  reset();
  screen.set_mode('#screen', '#reset', '#pause');
});
</script>
</body>

</html>
"#;

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// `@font-face` rules loading each file from `fonts/`.
pub struct FontFaces<'a>(pub &'a [String]);

impl fmt::Display for FontFaces<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for file in self.0 {
            write!(
                f,
                "@font-face {{\n  font-family: '{}';\n  src: url('fonts/{}') format('{}');\n  font-weight: normal;\n  font-style: normal;\n}}\n",
                stem(file),
                file,
                font_format(file).unwrap_or("None"),
            )?;
        }
        Ok(())
    }
}

/// Hidden `<img>` tags preloading each file from `images/`.
pub struct ImageLoader<'a>(pub &'a [String]);

impl fmt::Display for ImageLoader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        writeln!(f, "<section id=\"imageLoader\" class=\"hidden\">")?;
        for file in self.0 {
            // The name goes in alt as well so it cannot clash with a sound.
            writeln!(
                f,
                "  <img class=\"hidden\" src=\"images/{0}\" alt=\"{1}\" data-name=\"{1}\">",
                file,
                stem(file)
            )?;
        }
        writeln!(f, "</section>")
    }
}

/// Hidden `<audio>` tags preloading each file from `directory`.
pub struct AudioLoader<'a> {
    pub files: &'a [String],
    pub section_id: &'a str,
    pub directory: &'a str,
}

impl fmt::Display for AudioLoader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.files.is_empty() {
            return Ok(());
        }
        writeln!(f, "<section id=\"{}\" class=\"hidden\">", self.section_id)?;
        for file in self.files {
            writeln!(
                f,
                "  <audio class=\"hidden\" controls preload=\"auto\" src=\"{}/{}\" data-name=\"{}\">Your browser does not support the audio element.</audio>",
                self.directory,
                file,
                stem(file)
            )?;
        }
        writeln!(f, "</section>")
    }
}

/// Assemble the page hosting a ported game.
///
/// `source` is the original script shown in the page, `script` the
/// translated code placed in its `<script>` element.
pub fn render_page(title: &str, source: &[String], resources: &Resources, script: &str) -> String {
    let title = escape_html(title);
    let code = source
        .iter()
        .map(|line| escape_html(line))
        .collect::<Vec<_>>()
        .join("\n");

    // Pieces are joined once; text inserted here is never scanned again.
    format!(
        "{HEAD_TO_TITLE}{title}{TITLE_TO_FONTS}{fonts}{STYLE_TO_BODY}{images}{sounds}{music}\
         {MAIN_TO_HEADING}{title}{HEADING_TO_CODE}{code}{CODE_TO_SCRIPT}{script}{SCRIPT_TO_END}",
        fonts = FontFaces(&resources.fonts),
        images = ImageLoader(&resources.images),
        sounds = AudioLoader {
            files: &resources.sounds,
            section_id: "soundLoader",
            directory: "sounds",
        },
        music = AudioLoader {
            files: &resources.music,
            section_id: "musicLoader",
            directory: "music",
        },
    )
}
