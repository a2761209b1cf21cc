//! Atlassian Document Format (ADF) tree and its translation to markdown.

use serde::{Deserialize, Serialize};

/// Root of an ADF document as returned by the v3 REST API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdfDocument {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub content: Vec<AdfNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdfNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<AdfNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub attrs: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Doc,
    Paragraph,
    Text,
    Heading,
    BulletList,
    OrderedList,
    ListItem,
    CodeBlock,
    Blockquote,
    Rule,
    HardBreak,
    Mention,
    Emoji,
    InlineCard,
    Panel,
    Table,
    TableRow,
    TableHeader,
    TableCell,
    MediaSingle,
    MediaGroup,
    Media,
    #[serde(other)]
    Unknown,
}

impl NodeKind {
    fn is_inline(&self) -> bool {
        matches!(
            self,
            NodeKind::Text
                | NodeKind::HardBreak
                | NodeKind::Mention
                | NodeKind::Emoji
                | NodeKind::InlineCard
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    Strong,
    Em,
    Code,
    Strike,
    Underline,
    Link { attrs: LinkAttrs },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkAttrs {
    pub href: String,
}

impl AdfNode {
    fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(|v| v.as_str())
    }

    fn attr_u64(&self, key: &str) -> Option<u64> {
        self.attrs.get(key).and_then(|v| v.as_u64())
    }
}

/// Renders an ADF document as markdown suitable for editing.
pub fn to_markdown(doc: &AdfDocument) -> String {
    render_blocks(&doc.content).trim_end().to_string()
}

fn render_blocks(nodes: &[AdfNode]) -> String {
    nodes
        .iter()
        .map(render_block)
        .filter(|block| !block.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_block(node: &AdfNode) -> String {
    match node.kind {
        NodeKind::Paragraph => render_inline(&node.content),
        NodeKind::Heading => {
            let level = node.attr_u64("level").unwrap_or(1).clamp(1, 6) as usize;
            format!("{} {}", "#".repeat(level), render_inline(&node.content))
        }
        NodeKind::BulletList => render_list(node, None),
        NodeKind::OrderedList => render_list(node, Some(node.attr_u64("order").unwrap_or(1))),
        NodeKind::CodeBlock => {
            let language = node.attr_str("language").unwrap_or_default();
            format!("```{language}\n{}\n```", plain_text(&node.content))
        }
        NodeKind::Blockquote | NodeKind::Panel => prefix_lines(&render_blocks(&node.content), "> "),
        NodeKind::Rule => "---".to_string(),
        NodeKind::Table => render_table(node),
        NodeKind::MediaSingle | NodeKind::MediaGroup | NodeKind::Media => String::new(),
        kind if kind.is_inline() => render_inline(std::slice::from_ref(node)),
        _ => {
            if node.content.first().is_some_and(|c| c.kind.is_inline()) {
                render_inline(&node.content)
            } else if node.content.is_empty() {
                node.text
                    .clone()
                    .or_else(|| node.attr_str("text").map(String::from))
                    .unwrap_or_default()
            } else {
                render_blocks(&node.content)
            }
        }
    }
}

fn render_inline(nodes: &[AdfNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node.kind {
            NodeKind::Text => {
                out.push_str(&render_text(node.text.as_deref().unwrap_or_default(), &node.marks))
            }
            NodeKind::HardBreak => out.push('\n'),
            NodeKind::Mention => {
                let text = node
                    .attr_str("text")
                    .map(String::from)
                    .or_else(|| node.attr_str("id").map(|id| format!("@{id}")))
                    .unwrap_or_default();
                out.push_str(&text);
            }
            NodeKind::Emoji => {
                let text = node
                    .attr_str("text")
                    .or_else(|| node.attr_str("shortName"))
                    .unwrap_or_default();
                out.push_str(text);
            }
            NodeKind::InlineCard => {
                if let Some(url) = node.attr_str("url") {
                    out.push_str(&format!("<{url}>"));
                }
            }
            _ => out.push_str(&render_inline(&node.content)),
        }
    }
    out
}

fn render_text(text: &str, marks: &[Mark]) -> String {
    if text.is_empty() {
        return String::new();
    }

    let has = |wanted: &Mark| marks.iter().any(|m| m == wanted);
    let mut out = text.to_string();
    if has(&Mark::Code) {
        out = format!("`{out}`");
    }
    if has(&Mark::Em) {
        out = format!("*{out}*");
    }
    if has(&Mark::Strong) {
        out = format!("**{out}**");
    }
    if has(&Mark::Strike) {
        out = format!("~~{out}~~");
    }
    for mark in marks {
        if let Mark::Link { attrs } = mark {
            out = format!("[{out}]({})", attrs.href);
        }
    }
    out
}

fn render_list(node: &AdfNode, start: Option<u64>) -> String {
    node.content
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = match start {
                Some(n) => format!("{}. ", n.saturating_add(i as u64)),
                None => "- ".to_string(),
            };
            let indent = " ".repeat(marker.len());
            let body = item
                .content
                .iter()
                .map(render_block)
                .filter(|b| !b.is_empty())
                .collect::<Vec<_>>()
                .join("\n");

            let mut lines = body.lines();
            let mut rendered = format!("{marker}{}", lines.next().unwrap_or_default());
            for line in lines {
                rendered.push('\n');
                if !line.is_empty() {
                    rendered.push_str(&indent);
                    rendered.push_str(line);
                }
            }
            rendered
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_table(node: &AdfNode) -> String {
    let mut lines = Vec::new();
    for (i, row) in node.content.iter().enumerate() {
        let cells: Vec<String> = row
            .content
            .iter()
            .map(|cell| {
                render_blocks(&cell.content)
                    .replace('\n', " ")
                    .replace('|', "\\|")
            })
            .collect();
        lines.push(format!("| {} |", cells.join(" | ")));
        if i == 0 {
            lines.push(format!("|{}", " --- |".repeat(cells.len())));
        }
    }
    lines.join("\n")
}

fn plain_text(nodes: &[AdfNode]) -> String {
    nodes
        .iter()
        .map(|n| match n.kind {
            NodeKind::HardBreak => "\n".to_string(),
            _ => n.text.clone().unwrap_or_else(|| plain_text(&n.content)),
        })
        .collect()
}

fn prefix_lines(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{prefix}{line}").trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
