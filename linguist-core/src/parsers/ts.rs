use std::collections::HashMap;

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::CatalogError;
use crate::model::catalog::{Catalog, CatalogBuilder};
use crate::model::entry::{EntryStatus, Location, TranslationEntry};

pub fn parse(text: &str) -> Result<Catalog, CatalogError> {
    // .ts files carry `<!DOCTYPE TS>`, which roxmltree refuses unless told otherwise.
    let opts = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, opts)?;

    let root = doc.root_element();
    if !root.has_tag_name("TS") {
        return Err(CatalogError::schema(
            position(&doc, root),
            format!("expected <TS> root element, found <{}>", root.tag_name().name()),
        ));
    }

    let mut builder = CatalogBuilder::new(text);
    builder.header(
        root.attribute("version"),
        root.attribute("language"),
        root.attribute("sourcelanguage"),
    );

    let mut lines = LineTracker::default();

    for context in elements(root, "context") {
        let name = match child(context, "name") {
            Some(n) => collect_text(n),
            None => {
                return Err(CatalogError::schema(
                    position(&doc, context),
                    "<context> without <name>",
                ))
            }
        };

        for message in elements(context, "message") {
            let entry = parse_message(&doc, &name, message, &mut lines)?;
            builder.push(entry);
        }
    }

    let duplicates = builder.duplicates();
    let catalog = builder.finish();

    tracing::debug!(
        language = catalog.language().unwrap_or(""),
        entries = catalog.len(),
        duplicates,
        "parsed catalog"
    );

    Ok(catalog)
}

fn parse_message(
    doc: &Document,
    context: &str,
    message: Node,
    lines: &mut LineTracker,
) -> Result<TranslationEntry, CatalogError> {
    let source = child(message, "source").ok_or_else(|| {
        CatalogError::schema(
            format!("{} in context {context:?}", position(doc, message)),
            "<message> without <source>",
        )
    })?;

    let disambiguation = child(message, "comment")
        .map(collect_text)
        .filter(|c| !c.is_empty());

    let mut locations = Vec::new();
    for loc in elements(message, "location") {
        locations.push(lines.resolve(loc.attribute("filename"), loc.attribute("line")));
    }

    let numerus = message.attribute("numerus") == Some("yes");

    let (translation, numerus_forms, status) = match child(message, "translation") {
        // No <translation> at all: nothing has been attempted yet.
        None => (String::new(), Vec::new(), EntryStatus::Unfinished),
        Some(t) => {
            let status = match t.attribute("type") {
                None => EntryStatus::Finished,
                Some("unfinished") => EntryStatus::Unfinished,
                Some("vanished") => EntryStatus::Vanished,
                Some("obsolete") => EntryStatus::Obsolete,
                Some(other) => {
                    return Err(CatalogError::schema(
                        position(doc, t),
                        format!("unknown translation type {other:?}"),
                    ))
                }
            };

            let forms: Vec<String> = if numerus {
                elements(t, "numerusform").map(translation_text).collect()
            } else {
                Vec::new()
            };

            let text = match forms.first() {
                Some(first) => first.clone(),
                None => translation_text(t),
            };

            (text, forms, status)
        }
    };

    Ok(TranslationEntry {
        context: context.to_string(),
        source_text: collect_text(source),
        translation,
        status,
        disambiguation,
        numerus_forms,
        extra_comment: child(message, "extracomment").map(collect_text),
        translator_comment: child(message, "translatorcomment").map(collect_text),
        locations,
    })
}

/// Text of a `<translation>` or `<numerusform>`, taking the longest
/// length variant when the translator supplied several.
fn translation_text(node: Node) -> String {
    match elements(node, "lengthvariant").next() {
        Some(first) => collect_text(first),
        None => collect_text(node),
    }
}

/// Concatenates text children, expanding legacy `<byte value="x1b"/>` escapes.
fn collect_text(node: Node) -> String {
    let mut out = String::new();
    for c in node.children() {
        if c.is_text() {
            out.push_str(c.text().unwrap_or_default());
        } else if c.has_tag_name("byte") {
            if let Some(ch) = c.attribute("value").and_then(byte_value) {
                out.push(ch);
            }
        }
    }
    out
}

fn byte_value(v: &str) -> Option<char> {
    let n = match v.strip_prefix('x').or_else(|| v.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => v.parse::<u32>().ok()?,
    };
    char::from_u32(n)
}

fn elements<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    parent.children().filter(move |n| n.has_tag_name(tag))
}

fn child<'a, 'input: 'a>(parent: Node<'a, 'input>, tag: &'static str) -> Option<Node<'a, 'input>> {
    elements(parent, tag).next()
}

fn position(doc: &Document, node: Node) -> String {
    let pos = doc.text_pos_at(node.range().start);
    format!("line {}", pos.row)
}

/// Qt writes `line="+N"` relative to the previous location in the same
/// file, and may omit `filename` when it repeats.
#[derive(Default)]
struct LineTracker {
    last_file: String,
    last_line: HashMap<String, i64>,
}

impl LineTracker {
    fn resolve(&mut self, filename: Option<&str>, line: Option<&str>) -> Location {
        if let Some(f) = filename {
            self.last_file = f.to_string();
        }
        let file = self.last_file.clone();

        let line = line.and_then(|raw| {
            let raw = raw.trim();
            let value = if raw.starts_with('+') || raw.starts_with('-') {
                let delta: i64 = raw.parse().ok()?;
                self.last_line.get(&file).copied().unwrap_or(0) + delta
            } else {
                raw.parse().ok()?
            };
            self.last_line.insert(file.clone(), value);
            u32::try_from(value).ok()
        });

        Location {
            filename: file,
            line,
        }
    }
}
