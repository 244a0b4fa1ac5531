//! Tagged textual report of a suffix tree and its parser
//!
//! ```text
//! <output>
//! <units>1</units>
//! <nodes>4</nodes>
//! <node id="0" label="" children="3">
//!   <leaf id="1" label="ab$" doc="0" offset="0"/>
//!   <leaf id="2" label="b$" doc="0" offset="1"/>
//!   <leaf id="3" label="$" doc="0" offset="2"/>
//! </node>
//! </output>
//! ```

use crate::error::{CoreError, Result};
use crate::suffix_tree::{LeafTag, NodeId, SuffixTree};
use crate::symbol::render;
use crate::walker::{TreeListener, TreeWalker, Visit};
use std::collections::BTreeMap;

/// One node as recorded in a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// Arena id of the node
    pub id: NodeId,
    /// Rendered label of the incoming edge
    pub label: String,
    /// Number of children
    pub children: usize,
    /// Suffix tag, for leaves
    pub leaf: Option<LeafTag>,
}

/// Structure recovered from a report, without the text store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportProfile {
    /// Number of unit types of the indexed corpus
    pub units: usize,
    /// Declared total node count
    pub nodes: usize,
    /// Entries in walk order
    pub entries: Vec<ReportEntry>,
}

impl ReportProfile {
    /// Profile of `tree` as its report would describe it
    pub fn from_tree(tree: &SuffixTree, units: usize) -> Self {
        let mut listener = ProfileListener::default();
        TreeWalker::walk(tree.root(), tree, &mut listener);
        Self {
            units,
            nodes: tree.node_count(),
            entries: listener.into_entries(),
        }
    }

    /// Ids of nodes with more than one child
    pub fn branching_nodes(&self) -> Vec<NodeId> {
        self.entries
            .iter()
            .filter(|entry| entry.children > 1)
            .map(|entry| entry.id)
            .collect()
    }
}

/// Writes every visited node as a tagged line
#[derive(Debug, Default)]
pub struct ReportListener {
    out: String,
}

impl ReportListener {
    /// Create an empty listener
    pub fn new() -> Self {
        Self::default()
    }

    /// Node lines written so far
    pub fn into_string(self) -> String {
        self.out
    }
}

impl TreeListener for ReportListener {
    fn enter(&mut self, tree: &SuffixTree, visit: &Visit<'_>) {
        let label = escape(&render(visit.label, tree.terminator()));
        let indent = visit.depth * 2;
        let line = match tree.node(visit.node).leaf_tag() {
            Some(tag) => format!(
                "{:indent$}<leaf id=\"{}\" label=\"{label}\" doc=\"{}\" offset=\"{}\"/>\n",
                "", visit.node, tag.doc, tag.offset
            ),
            None => format!(
                "{:indent$}<node id=\"{}\" label=\"{label}\" children=\"{}\">\n",
                "", visit.node, visit.children
            ),
        };
        self.out.push_str(&line);
    }

    fn exit(&mut self, tree: &SuffixTree, visit: &Visit<'_>) {
        if tree.node(visit.node).leaf_tag().is_none() {
            let line = format!("{:indent$}</node>\n", "", indent = visit.depth * 2);
            self.out.push_str(&line);
        }
    }
}

/// Collects [`ReportEntry`] values straight from a walk
#[derive(Debug, Default)]
pub struct ProfileListener {
    entries: Vec<ReportEntry>,
}

impl ProfileListener {
    /// Entries collected so far
    pub fn into_entries(self) -> Vec<ReportEntry> {
        self.entries
    }
}

impl TreeListener for ProfileListener {
    fn enter(&mut self, tree: &SuffixTree, visit: &Visit<'_>) {
        self.entries.push(ReportEntry {
            id: visit.node,
            label: render(visit.label, tree.terminator()),
            children: visit.children,
            leaf: tree.node(visit.node).leaf_tag(),
        });
    }

    fn exit(&mut self, _tree: &SuffixTree, _visit: &Visit<'_>) {}
}

/// Full report of `tree` for a corpus of `units` types
pub fn write_report(tree: &SuffixTree, units: usize) -> String {
    let mut listener = ReportListener::new();
    TreeWalker::walk(tree.root(), tree, &mut listener);

    let mut out = String::new();
    out.push_str("<output>\n");
    out.push_str(&format!("<units>{units}</units>\n"));
    out.push_str(&format!("<nodes>{}</nodes>\n", tree.node_count()));
    out.push_str(&listener.into_string());
    out.push_str("</output>\n");
    out
}

struct Open {
    entry: usize,
    seen: usize,
}

/// Recover the node profile from a report
pub fn parse_report(report: &str) -> Result<ReportProfile> {
    let mut lines = report
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    expect_line(lines.next(), "<output>")?;
    let units = scalar(lines.next(), "units")?;
    let nodes = scalar(lines.next(), "nodes")?;

    let mut profile = ReportProfile {
        units,
        nodes,
        entries: Vec::with_capacity(nodes),
    };
    let mut open: Vec<Open> = Vec::new();
    let mut closed = false;

    for (number, line) in lines.by_ref() {
        if line == "</output>" {
            closed = true;
            break;
        }
        if line == "</node>" {
            let Some(top) = open.pop() else {
                return Err(malformed(number, "unbalanced </node>"));
            };
            let declared = profile.entries[top.entry].children;
            if declared != top.seen {
                return Err(malformed(
                    number,
                    format!("node declares {declared} children but lists {}", top.seen),
                ));
            }
            continue;
        }

        let (leaf, body) = if let Some(body) = line.strip_prefix("<leaf ").and_then(|b| b.strip_suffix("/>")) {
            (true, body)
        } else if let Some(body) = line.strip_prefix("<node ").and_then(|b| b.strip_suffix('>')) {
            (false, body)
        } else {
            return Err(malformed(number, format!("unexpected line '{line}'")));
        };

        if let Some(parent) = open.last_mut() {
            parent.seen += 1;
        } else if !profile.entries.is_empty() {
            return Err(malformed(number, "more than one top-level node"));
        }

        let attrs = attributes(body, number)?;
        let id = number_attr(&attrs, "id", number)?;
        let label = attrs
            .get("label")
            .cloned()
            .ok_or_else(|| malformed(number, "missing attribute 'label'"))?;
        let entry = if leaf {
            ReportEntry {
                id,
                label,
                children: 0,
                leaf: Some(LeafTag {
                    doc: number_attr(&attrs, "doc", number)?,
                    offset: number_attr(&attrs, "offset", number)?,
                }),
            }
        } else {
            ReportEntry {
                id,
                label,
                children: number_attr(&attrs, "children", number)?,
                leaf: None,
            }
        };
        profile.entries.push(entry);
        if !leaf {
            open.push(Open {
                entry: profile.entries.len() - 1,
                seen: 0,
            });
        }
    }

    let last = report.lines().count();
    if !closed {
        return Err(malformed(last, "missing </output>"));
    }
    if !open.is_empty() {
        return Err(malformed(last, format!("{} unclosed node(s)", open.len())));
    }
    if let Some((number, line)) = lines.next() {
        return Err(malformed(number, format!("trailing content '{line}'")));
    }
    if profile.entries.len() != profile.nodes {
        return Err(malformed(
            last,
            format!(
                "header declares {} nodes but {} are listed",
                profile.nodes,
                profile.entries.len()
            ),
        ));
    }
    Ok(profile)
}

fn malformed(line: usize, reason: impl Into<String>) -> CoreError {
    CoreError::MalformedReport {
        line,
        reason: reason.into(),
    }
}

fn expect_line(line: Option<(usize, &str)>, expected: &str) -> Result<()> {
    match line {
        Some((_, found)) if found == expected => Ok(()),
        Some((number, found)) => Err(malformed(number, format!("expected '{expected}', found '{found}'"))),
        None => Err(malformed(0, format!("expected '{expected}', found end of report"))),
    }
}

fn scalar(line: Option<(usize, &str)>, tag: &str) -> Result<usize> {
    let (number, found) = line.ok_or_else(|| malformed(0, format!("missing <{tag}>")))?;
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    found
        .strip_prefix(open.as_str())
        .and_then(|rest| rest.strip_suffix(close.as_str()))
        .and_then(|value| value.parse().ok())
        .ok_or_else(|| malformed(number, format!("expected <{tag}>N</{tag}>, found '{found}'")))
}

fn attributes(mut body: &str, line: usize) -> Result<BTreeMap<&str, String>> {
    let mut attrs = BTreeMap::new();
    loop {
        body = body.trim_start();
        if body.is_empty() {
            return Ok(attrs);
        }
        let (key, rest) = body
            .split_once("=\"")
            .ok_or_else(|| malformed(line, format!("bad attribute near '{body}'")))?;
        let (value, rest) = rest
            .split_once('"')
            .ok_or_else(|| malformed(line, format!("unterminated value for '{key}'")))?;
        attrs.insert(key.trim(), unescape(value));
        body = rest;
    }
}

fn number_attr(attrs: &BTreeMap<&str, String>, key: &str, line: usize) -> Result<usize> {
    let value = attrs
        .get(key)
        .ok_or_else(|| malformed(line, format!("missing attribute '{key}'")))?;
    value
        .parse()
        .map_err(|_| malformed(line, format!("attribute '{key}' is not a number: '{value}'")))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    text.replace("&#10;", "\n")
        .replace("&quot;", "\"")
        .replace("&gt;", ">")
        .replace("&lt;", "<")
        .replace("&amp;", "&")
}
