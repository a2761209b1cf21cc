//! Conversion between Jira wiki markup and markdown.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};
use regex::Regex;
use std::sync::LazyLock;

static HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^h([1-6])\.\s*(.*)$").expect("Invalid heading regex"));

static LIST_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([*#-]+)\s+(.*)$").expect("Invalid list regex"));

static CODE_OPEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{(code|noformat)(?::([^}]*))?\}(.*)$").expect("Invalid code block regex")
});

// Monospace spans and bracketed links are converted as units so their contents keep their characters
static INLINE_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(.+?)\}\}|\[([^\[\]]+)\]").expect("Invalid inline token regex")
});

static COLOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{color(?::[^}]*)?\}").expect("Invalid color regex"));

/// Converts Jira wiki markup (as stored by Jira Server/Data Center) into markdown.
pub fn from_jira_md(markup: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut open_block: Option<&'static str> = None;

    for line in markup.lines() {
        if let Some(tag) = open_block {
            if tag == "quote" {
                if line.trim() == "{quote}" {
                    open_block = None;
                } else {
                    out.push(format!("> {}", convert_line(line)).trim_end().to_string());
                }
                continue;
            }

            let close = format!("{{{tag}}}");
            match line.find(&close) {
                Some(pos) => {
                    if !line[..pos].is_empty() {
                        out.push(line[..pos].to_string());
                    }
                    out.push("```".to_string());
                    open_block = None;
                }
                None => out.push(line.to_string()),
            }
            continue;
        }

        let trimmed = line.trim();
        if let Some(caps) = CODE_OPEN_REGEX.captures(trimmed) {
            let tag: &'static str = if &caps[1] == "code" { "code" } else { "noformat" };
            let language = caps
                .get(2)
                .and_then(|params| params.as_str().split('|').next())
                .filter(|param| !param.contains('='))
                .unwrap_or_default();
            out.push(format!("```{language}"));

            let rest = caps.get(3).map(|m| m.as_str()).unwrap_or_default();
            let close = format!("{{{tag}}}");
            match rest.find(&close) {
                Some(pos) => {
                    if !rest[..pos].is_empty() {
                        out.push(rest[..pos].to_string());
                    }
                    out.push("```".to_string());
                }
                None => {
                    if !rest.is_empty() {
                        out.push(rest.to_string());
                    }
                    open_block = Some(tag);
                }
            }
            continue;
        }

        if trimmed == "{quote}" {
            open_block = Some("quote");
            continue;
        }
        if let Some(inner) = trimmed
            .strip_prefix("{quote}")
            .and_then(|rest| rest.strip_suffix("{quote}"))
        {
            out.push(format!("> {}", convert_inline(inner)));
            continue;
        }

        out.push(convert_line(line));
    }

    out.join("\n")
}

fn convert_line(line: &str) -> String {
    let trimmed = line.trim();

    if let Some(caps) = HEADING_REGEX.captures(trimmed) {
        let level: usize = caps[1].parse().unwrap_or(1);
        return format!("{} {}", "#".repeat(level), convert_inline(&caps[2]));
    }

    if let Some(quote) = trimmed.strip_prefix("bq.") {
        return format!("> {}", convert_inline(quote.trim_start()));
    }

    if trimmed.len() >= 4 && trimmed.chars().all(|c| c == '-') {
        return "---".to_string();
    }

    if let Some(caps) = LIST_REGEX.captures(trimmed) {
        let markers = &caps[1];
        let indent: String = markers
            .chars()
            .take(markers.len() - 1)
            .map(|c| if c == '#' { "   " } else { "  " })
            .collect();
        let marker = if markers.ends_with('#') { "1. " } else { "- " };
        return format!("{indent}{marker}{}", convert_inline(&caps[2]));
    }

    if let Some(header) = trimmed.strip_prefix("||") {
        let cells: Vec<String> = header
            .split("||")
            .filter(|c| !c.trim().is_empty())
            .map(|c| convert_inline(c.trim()))
            .collect();
        return format!(
            "| {} |\n|{}",
            cells.join(" | "),
            " --- |".repeat(cells.len())
        );
    }

    if let Some(row) = trimmed.strip_prefix('|') {
        let cells: Vec<String> = row
            .split('|')
            .filter(|c| !c.trim().is_empty())
            .map(|c| convert_inline(c.trim()))
            .collect();
        return format!("| {} |", cells.join(" | "));
    }

    convert_inline(line)
}

fn convert_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in INLINE_TOKEN_REGEX.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&convert_emphasis(&text[last..whole.start()]));

        if let Some(mono) = caps.get(1) {
            out.push_str(&format!("`{}`", mono.as_str()));
        } else if let Some(link) = caps.get(2) {
            out.push_str(&convert_link(link.as_str()));
        }
        last = whole.end();
    }
    out.push_str(&convert_emphasis(&text[last..]));

    out
}

fn convert_link(inner: &str) -> String {
    if let Some((label, target)) = inner.split_once('|') {
        return format!("[{}]({})", convert_emphasis(label), target.trim());
    }
    if let Some(user) = inner.strip_prefix('~') {
        let user = user.strip_prefix("accountid:").unwrap_or(user);
        return format!("@{user}");
    }
    if let Some(attachment) = inner.strip_prefix('^') {
        return attachment.to_string();
    }
    if ["http://", "https://", "mailto:", "file:"]
        .iter()
        .any(|scheme| inner.starts_with(scheme))
    {
        return format!("<{inner}>");
    }
    format!("[{inner}]")
}

fn convert_emphasis(text: &str) -> String {
    let text = COLOR_REGEX.replace_all(text, "");
    let text = convert_delimited(&text, '*', "**");
    let text = convert_delimited(&text, '_', "*");
    let text = convert_delimited(&text, '-', "~~");
    convert_delimited(&text, '+', "")
}

/// Replaces `{delim}content{delim}` spans that sit on word boundaries.
fn convert_delimited(text: &str, delim: char, replacement: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == delim && opens_at(&chars, i, delim) {
            if let Some(end) = closes_after(&chars, i + 1, delim) {
                out.push_str(replacement);
                out.extend(&chars[i + 1..end]);
                out.push_str(replacement);
                i = end + 1;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }

    out
}

fn opens_at(chars: &[char], i: usize, delim: char) -> bool {
    let before = i == 0 || !(chars[i - 1].is_alphanumeric() || chars[i - 1] == delim);
    let after = chars
        .get(i + 1)
        .is_some_and(|c| !c.is_whitespace() && *c != delim);
    before && after
}

fn closes_after(chars: &[char], start: usize, delim: char) -> Option<usize> {
    (start + 1..chars.len()).find(|&j| {
        chars[j] == delim
            && !chars[j - 1].is_whitespace()
            && chars.get(j + 1).is_none_or(|c| !c.is_alphanumeric())
    })
}

#[derive(Debug)]
enum Frame {
    List { ordered: bool },
    Item,
    Quote,
    CodeBlock,
    Link { url: String, text_start: usize },
    Image,
    TableHead,
    TableRow,
    TableCell,
    Inline(&'static str),
    Other,
}

/// Builds Jira wiki markup from markdown events.
struct MarkupWriter {
    out: String,
    stack: Vec<Frame>,
    at_block_start: bool,
}

impl MarkupWriter {
    fn new() -> Self {
        Self {
            out: String::new(),
            stack: Vec::new(),
            at_block_start: false,
        }
    }

    fn in_item(&self) -> bool {
        self.stack.iter().any(|f| matches!(f, Frame::Item))
    }

    fn in_table_head(&self) -> bool {
        self.stack.iter().any(|f| matches!(f, Frame::TableHead))
    }

    fn top_is(&self, check: fn(&Frame) -> bool) -> bool {
        self.stack.last().is_some_and(check)
    }

    fn block_break(&mut self) {
        if self.at_block_start {
            self.at_block_start = false;
            return;
        }
        if self.out.is_empty() {
            return;
        }
        let target = if self.in_item() { "\n" } else { "\n\n" };
        while !self.out.ends_with(target) {
            self.out.push('\n');
        }
    }

    fn newline(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn start(&mut self, tag: Tag) {
        let frame = match tag {
            Tag::Paragraph => {
                self.block_break();
                Frame::Other
            }
            Tag::Heading { level, .. } => {
                self.block_break();
                self.out.push_str(&format!("h{}. ", level as usize));
                Frame::Other
            }
            Tag::BlockQuote { .. } => {
                self.block_break();
                self.out.push_str("{quote}\n");
                self.at_block_start = true;
                Frame::Quote
            }
            Tag::CodeBlock(kind) => {
                self.block_break();
                match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => {
                        self.out.push_str(&format!("{{code:{lang}}}\n"))
                    }
                    _ => self.out.push_str("{code}\n"),
                }
                Frame::CodeBlock
            }
            Tag::List(start) => {
                self.block_break();
                Frame::List {
                    ordered: start.is_some(),
                }
            }
            Tag::Item => {
                self.newline();
                let markers: String = self
                    .stack
                    .iter()
                    .filter_map(|f| match f {
                        Frame::List { ordered: true } => Some('#'),
                        Frame::List { ordered: false } => Some('*'),
                        _ => None,
                    })
                    .collect();
                self.out.push_str(&markers);
                self.out.push(' ');
                self.at_block_start = true;
                Frame::Item
            }
            Tag::Emphasis => {
                self.out.push('_');
                Frame::Inline("_")
            }
            Tag::Strong => {
                self.out.push('*');
                Frame::Inline("*")
            }
            Tag::Strikethrough => {
                self.out.push('-');
                Frame::Inline("-")
            }
            Tag::Link { dest_url, .. } => {
                self.out.push('[');
                Frame::Link {
                    url: dest_url.to_string(),
                    text_start: self.out.len(),
                }
            }
            Tag::Image { dest_url, .. } => {
                self.out.push_str(&format!("!{dest_url}!"));
                Frame::Image
            }
            Tag::Table(_) => {
                self.block_break();
                Frame::Other
            }
            Tag::TableHead => {
                self.newline();
                Frame::TableHead
            }
            Tag::TableRow => {
                self.newline();
                Frame::TableRow
            }
            Tag::TableCell => {
                self.out
                    .push_str(if self.in_table_head() { "||" } else { "|" });
                Frame::TableCell
            }
            _ => Frame::Other,
        };
        self.stack.push(frame);
    }

    fn end(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame {
            Frame::Quote => {
                self.newline();
                self.out.push_str("{quote}");
            }
            Frame::CodeBlock => {
                self.newline();
                self.out.push_str("{code}");
            }
            Frame::Inline(delim) => self.out.push_str(delim),
            Frame::Link { url, text_start } => {
                if self.out[text_start..] == url {
                    self.out.push(']');
                } else {
                    self.out.push_str(&format!("|{url}]"));
                }
            }
            Frame::TableHead => self.out.push_str("||"),
            Frame::TableRow => self.out.push('|'),
            Frame::List { .. } | Frame::Item | Frame::Image | Frame::TableCell | Frame::Other => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.top_is(|f| matches!(f, Frame::Image)) {
            return;
        }
        self.at_block_start = false;
        self.out.push_str(text);
    }

    fn finish(self) -> String {
        self.out.trim_end().to_string()
    }
}

/// Converts markdown into Jira wiki markup for submission through the v2 API.
pub fn to_jira_md(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut writer = MarkupWriter::new();
    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(tag) => writer.start(tag),
            Event::End(_) => writer.end(),
            Event::Text(text) => writer.text(&text),
            Event::Code(code) => writer.text(&format!("{{{{{code}}}}}")),
            Event::Html(html) | Event::InlineHtml(html) => writer.text(&html),
            Event::SoftBreak | Event::HardBreak => writer.text("\n"),
            Event::Rule => {
                writer.block_break();
                writer.text("----");
            }
            Event::TaskListMarker(checked) => writer.text(if checked { "[x] " } else { "[ ] " }),
            _ => {}
        }
    }
    writer.finish()
}
