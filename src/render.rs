//! View model and HTML markup for the widget

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

/// Classes every widget container starts with; consumer classes follow
pub const BASE_CLASSES: &str = "slideframe relative w-full aspect-video overflow-hidden";
/// Added to the container while fullscreen (platform or simulated)
pub const FULLSCREEN_CLASSES: &str = "slideframe--fullscreen fixed inset-0 z-50 h-screen w-screen";
pub const PLACEHOLDER_CLASSES: &str = "slideframe--invalid flex items-center justify-center";

pub const INVALID_URL_TEXT: &str = "Invalid Google Slides URL";
pub const ENTER_FULLSCREEN_LABEL: &str = "Enter fullscreen";
pub const EXIT_FULLSCREEN_LABEL: &str = "Exit fullscreen";
pub const DEFAULT_FRAME_TITLE: &str = "Google Slides presentation";

/// Marks the widget root so hosts can find it in the document
pub const ROOT_MARKER: &str = "data-slideframe";
/// Marks the fullscreen toggle button
pub const TOGGLE_MARKER: &str = "data-slideframe-toggle";

const FRAME_CLASSES: &str = "slideframe__frame absolute inset-0 h-full w-full border-0";
const TOGGLE_CLASSES: &str = "slideframe__toggle absolute right-2 top-2 rounded bg-black/50 p-1 text-white";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum View {
    Frame(FrameView),
    Placeholder(PlaceholderView),
}

/// The embedded presentation with its overlay toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameView {
    pub class: String,
    pub attributes: BTreeMap<String, String>,
    pub src: String,
    pub title: String,
    pub fullscreen: bool,
    pub toggle: ToggleControl,
}

/// Shown instead of the frame when the URL could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderView {
    pub class: String,
    pub attributes: BTreeMap<String, String>,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleControl {
    pub label: &'static str,
    pub icon: ToggleIcon,
    pub pressed: bool,
}

impl ToggleControl {
    pub fn for_state(fullscreen: bool) -> Self {
        if fullscreen {
            Self { label: EXIT_FULLSCREEN_LABEL, icon: ToggleIcon::Minimize, pressed: true }
        } else {
            Self { label: ENTER_FULLSCREEN_LABEL, icon: ToggleIcon::Maximize, pressed: false }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ToggleIcon {
    Maximize,
    Minimize,
}

impl ToggleIcon {
    /// Inline SVG markup for the icon
    pub fn svg(&self) -> String {
        format!(
            concat!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"20\" height=\"20\" viewBox=\"0 0 24 24\" ",
                "fill=\"none\" stroke=\"currentColor\" stroke-width=\"2\" aria-hidden=\"true\">",
                "<path d=\"{}\"/></svg>"
            ),
            self.path()
        )
    }

    fn path(&self) -> &'static str {
        match self {
            ToggleIcon::Maximize => "M8 3H5a2 2 0 0 0-2 2v3m18 0V5a2 2 0 0 0-2-2h-3m0 18h3a2 2 0 0 0 2-2v-3M3 16v3a2 2 0 0 0 2 2h3",
            ToggleIcon::Minimize => "M8 3v3a2 2 0 0 1-2 2H3m18 0h-3a2 2 0 0 1-2-2V3m0 18v-3a2 2 0 0 1 2-2h3M3 16h3a2 2 0 0 1 2 2v3",
        }
    }
}

/// Merge class lists in order, dropping repeated tokens.
///
/// The widget's own classes come first and consumer classes after, so a
/// utility-first stylesheet lets the consumer's later tokens win.
pub fn merge_classes<'a>(lists: impl IntoIterator<Item = &'a str>) -> String {
    let mut out: Vec<&str> = Vec::new();
    for token in lists.into_iter().flat_map(str::split_whitespace) {
        if !out.contains(&token) {
            out.push(token);
        }
    }
    out.join(" ")
}

/// Escape text for use in HTML content and double-quoted attributes
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a view as HTML markup
pub fn to_html(view: &View) -> String {
    match view {
        View::Frame(frame) => frame_html(frame),
        View::Placeholder(placeholder) => placeholder_html(placeholder),
    }
}

fn attributes_html(attributes: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for (name, value) in attributes {
        let _ = write!(out, " {}=\"{}\"", name, escape_html(value));
    }
    out
}

fn frame_html(frame: &FrameView) -> String {
    let toggle = &frame.toggle;
    format!(
        concat!(
            "<div class=\"{class}\" {root}=\"\" data-fullscreen=\"{fullscreen}\"{attrs}>",
            "<iframe class=\"{frame_class}\" src=\"{src}\" title=\"{title}\" ",
            "allow=\"fullscreen\" allowfullscreen=\"\" loading=\"lazy\"></iframe>",
            "<button type=\"button\" class=\"{toggle_class}\" {toggle_marker}=\"\" ",
            "aria-label=\"{label}\" aria-pressed=\"{pressed}\" title=\"{label}\">",
            "{icon}</button></div>"
        ),
        class = escape_html(&frame.class),
        root = ROOT_MARKER,
        fullscreen = frame.fullscreen,
        attrs = attributes_html(&frame.attributes),
        frame_class = FRAME_CLASSES,
        src = escape_html(&frame.src),
        title = escape_html(&frame.title),
        toggle_class = TOGGLE_CLASSES,
        toggle_marker = TOGGLE_MARKER,
        label = toggle.label,
        pressed = toggle.pressed,
        icon = toggle.icon.svg(),
    )
}

fn placeholder_html(placeholder: &PlaceholderView) -> String {
    format!(
        "<div class=\"{}\" {}=\"\"{}>{}</div>",
        escape_html(&placeholder.class),
        ROOT_MARKER,
        attributes_html(&placeholder.attributes),
        escape_html(placeholder.text),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_order_and_drops_repeats() {
        assert_eq!(merge_classes(["a b", "b  c", "", "a d"]), "a b c d");
        assert_eq!(merge_classes([BASE_CLASSES]), BASE_CLASSES);
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<a href=\"x\">&'</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn toggle_reflects_state() {
        assert_eq!(ToggleControl::for_state(false).label, "Enter fullscreen");
        assert_eq!(ToggleControl::for_state(true).label, "Exit fullscreen");
        assert_eq!(ToggleControl::for_state(true).icon, ToggleIcon::Minimize);
    }

    #[test]
    fn placeholder_markup() {
        let view = View::Placeholder(PlaceholderView {
            class: "x".into(),
            attributes: BTreeMap::from([("data-k".to_string(), "v\"".to_string())]),
            text: INVALID_URL_TEXT,
        });
        assert_eq!(
            to_html(&view),
            "<div class=\"x\" data-slideframe=\"\" data-k=\"v&quot;\">Invalid Google Slides URL</div>"
        );
    }
}
