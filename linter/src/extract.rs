use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// The parts of a port page that get checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Text of the first `<title>`.
    pub title: Option<String>,
    /// Text of the first `<h1>`.
    pub heading: Option<String>,
    /// Body of every `<script>`, in document order.
    pub scripts: Vec<String>,
}

impl Page {
    /// Whether the heading repeats the title. Missing elements read as empty.
    pub fn heading_matches_title(&self) -> bool {
        self.title.as_deref().unwrap_or("") == self.heading.as_deref().unwrap_or("")
    }
}

/// Parse `html` and pull out the title, heading and scripts.
///
/// Parsing follows the HTML5 error recovery rules, so any input yields a
/// page, possibly an empty one.
pub fn extract(html: &str) -> Page {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    let mut page = Page::default();
    walk(&dom.document, &mut page);
    page
}

fn walk(handle: &Handle, page: &mut Page) {
    if let NodeData::Element { name, .. } = &handle.data {
        match &*name.local {
            "title" => {
                if page.title.is_none() {
                    page.title = Some(text_content(handle));
                }
                return;
            }
            "h1" => {
                if page.heading.is_none() {
                    page.heading = Some(text_content(handle));
                }
                return;
            }
            "script" => {
                page.scripts.push(text_content(handle));
                return;
            }
            _ => {}
        }
    }
    for child in handle.children.borrow().iter() {
        walk(child, page);
    }
}

/// Concatenated text of every descendant text node.
fn text_content(handle: &Handle) -> String {
    let mut out = String::new();
    collect_text(handle, &mut out);
    out
}

fn collect_text(handle: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &handle.data {
        out.push_str(&contents.borrow());
    }
    for child in handle.children.borrow().iter() {
        collect_text(child, out);
    }
}
