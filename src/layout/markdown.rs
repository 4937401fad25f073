//! Markdown composition
//!
//! Classified lines are first flattened into a sequence of entries with
//! explicit paragraph break markers, then consecutive body entries are merged
//! into paragraphs. Every block is separated by exactly one blank line.

use super::headings::{ClassifiedLine, LineKind};
use std::collections::BTreeSet;

/// Flat, unmerged output of the composer
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Break,
    Heading { level: u8, text: String },
    Body(String),
}

/// A finished Markdown block
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
}

impl Block {
    pub fn render(&self) -> String {
        match self {
            Block::Heading { level, text } => {
                format!("{} {}", "#".repeat(usize::from(*level)), text)
            }
            Block::Paragraph(text) => text.clone(),
        }
    }
}

/// Flatten lines into entries, inserting a break before every index in `breaks`
pub fn to_entries(lines: &[ClassifiedLine], breaks: &BTreeSet<usize>) -> Vec<Entry> {
    let mut entries = Vec::with_capacity(lines.len() + breaks.len());

    for (i, line) in lines.iter().enumerate() {
        if breaks.contains(&i) {
            entries.push(Entry::Break);
        }
        entries.push(match line.kind {
            LineKind::Heading1 => Entry::Heading {
                level: 1,
                text: line.text.clone(),
            },
            LineKind::Heading2 => Entry::Heading {
                level: 2,
                text: line.text.clone(),
            },
            LineKind::Body => Entry::Body(line.text.clone()),
        });
    }

    entries
}

/// Merge runs of body entries into paragraphs.
///
/// Breaks and headings end the current paragraph. Breaks produce no block of
/// their own, so leading, trailing and repeated breaks vanish.
pub fn merge_entries(entries: Vec<Entry>) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<String> = Vec::new();

    let flush = |paragraph: &mut Vec<String>, blocks: &mut Vec<Block>| {
        if !paragraph.is_empty() {
            blocks.push(Block::Paragraph(paragraph.join(" ")));
            paragraph.clear();
        }
    };

    for entry in entries {
        match entry {
            Entry::Break => flush(&mut paragraph, &mut blocks),
            Entry::Heading { level, text } => {
                flush(&mut paragraph, &mut blocks);
                blocks.push(Block::Heading { level, text });
            }
            Entry::Body(text) => {
                // Blank recognizer output would only add stray spaces
                if !text.trim().is_empty() {
                    paragraph.push(text);
                }
            }
        }
    }
    flush(&mut paragraph, &mut blocks);

    blocks
}

/// Join blocks with a single blank line
pub fn render_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::render)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Compose the final document from classified lines and paragraph breaks
pub fn compose(lines: &[ClassifiedLine], breaks: &BTreeSet<usize>) -> (Vec<Block>, String) {
    let blocks = merge_entries(to_entries(lines, breaks));
    let markdown = render_blocks(&blocks);
    (blocks, markdown)
}
