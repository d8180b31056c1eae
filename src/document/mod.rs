//! Card documents: SVG templates whose labelled text nodes receive profile values
//!
//! Each value element (`id="os"`) has a decorative sibling (`id="prefix_os"`)
//! filled with dots. Updating a value resizes its prefix so the pair keeps the
//! same visible width. Only the text of addressed elements is rewritten; every
//! other byte of the file is carried over as-is.

pub mod index;
pub mod padding;

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{CardError, Diagnostic};
use crate::profile::{Binding, Profile};

pub use index::{text_slot, NodeIndex, TextSlot};
pub use padding::{prefix_for, Prefix, DEFAULT_FILL};

/// Declaration written when a document does not carry one
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Options for updating card documents
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    /// Character repeated inside prefix elements
    pub fill: char,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self { fill: DEFAULT_FILL }
    }
}

impl UpdateConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prefix fill character
    pub fn with_fill(mut self, fill: char) -> Self {
        self.fill = fill;
        self
    }
}

/// Outcome of one binding applied to a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    pub key: String,
    pub previous: String,
    pub value: String,
    pub prefix: String,
    /// The value did not fit the previous width and the fill was clamped
    pub overflow: bool,
}

/// A card document held in memory between reading and writing
#[derive(Debug, Clone)]
pub struct TemplateDocument {
    path: PathBuf,
    source: String,
}

/// Replacement of a byte range in the source
struct Edit {
    range: Range<usize>,
    text: String,
}

impl TemplateDocument {
    /// Read a card document from disk
    pub fn read(path: impl Into<PathBuf>) -> Result<Self, CardError> {
        let path = path.into();
        let source = fs::read_to_string(&path).map_err(|e| CardError::io(&path, e))?;
        Ok(Self { path, source })
    }

    /// Wrap document text that came from somewhere other than `read`
    pub fn from_string(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Apply every binding in order.
    ///
    /// All lookups and prefix computations happen before the text is touched:
    /// if any binding fails, the document is left exactly as it was.
    pub fn apply(
        &mut self,
        bindings: &[Binding],
        fill: char,
    ) -> Result<Vec<FieldUpdate>, CardError> {
        let (edits, updates) = self.plan(bindings, fill)?;

        let mut output = self.source.clone();
        for edit in edits.iter().rev() {
            output.replace_range(edit.range.clone(), &edit.text);
        }
        if !has_declaration(&output) {
            output.insert_str(0, &format!("{}\n", XML_DECLARATION));
        }

        self.source = output;
        Ok(updates)
    }

    /// Resolve every binding against a fresh parse and collect the edits, sorted by offset
    fn plan(
        &self,
        bindings: &[Binding],
        fill: char,
    ) -> Result<(Vec<Edit>, Vec<FieldUpdate>), CardError> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(&self.source, options)
            .map_err(|e| CardError::parse(&self.path, Diagnostic::from(&e)))?;
        let index = NodeIndex::build(&doc);
        debug!(path = %self.path.display(), ids = index.len(), "indexed document");

        let mut edits = Vec::with_capacity(bindings.len() * 2);
        let mut updates = Vec::with_capacity(bindings.len());

        for binding in bindings {
            let prefix_id = format!("prefix_{}", binding.key);
            let value_node = index.require(binding.key, &self.path)?;
            let prefix_node = index.require(&prefix_id, &self.path)?;

            let (old_value, value_slot) = text_slot(value_node, &self.source);
            let (old_prefix, prefix_slot) = text_slot(prefix_node, &self.source);

            let total = old_prefix.chars().count() + old_value.chars().count();
            let prefix = prefix_for(total, binding.value.chars().count(), fill);
            if prefix.overflow {
                warn!(
                    path = %self.path.display(),
                    key = binding.key,
                    width = total,
                    value = %binding.value,
                    "value does not fit the card layout; prefix fill clamped to zero"
                );
            }
            debug!(key = binding.key, old = %old_value, new = %binding.value, "update field");

            edits.extend(edit_for(value_slot, &binding.value));
            edits.extend(edit_for(prefix_slot, &prefix.text));

            updates.push(FieldUpdate {
                key: binding.key.to_string(),
                previous: old_value,
                value: binding.value.clone(),
                prefix: prefix.text,
                overflow: prefix.overflow,
            });
        }

        edits.sort_by_key(|edit| edit.range.start);
        Ok((edits, updates))
    }

    /// Write the document back to the path it was read from
    pub fn write(&self) -> Result<(), CardError> {
        fs::write(&self.path, &self.source).map_err(|e| CardError::io(&self.path, e))?;
        info!(path = %self.path.display(), "wrote card");
        Ok(())
    }
}

/// Update one card file in place with every value from `profile`
pub fn apply(
    path: impl AsRef<Path>,
    profile: &Profile,
    config: &UpdateConfig,
) -> Result<Vec<FieldUpdate>, CardError> {
    let mut document = TemplateDocument::read(path.as_ref())?;
    let updates = document.apply(&profile.bindings(), config.fill)?;
    document.write()?;
    Ok(updates)
}

fn edit_for(slot: TextSlot, text: &str) -> Option<Edit> {
    let escaped = escape_text(text);
    match slot {
        TextSlot::Text(range) => Some(Edit {
            range,
            text: escaped,
        }),
        TextSlot::Insert(_) if text.is_empty() => None,
        TextSlot::Insert(at) => Some(Edit {
            range: at..at,
            text: escaped,
        }),
        TextSlot::SelfClosing { .. } if text.is_empty() => None,
        TextSlot::SelfClosing { range, name } => Some(Edit {
            range,
            text: format!(">{}</{}>", escaped, name),
        }),
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn has_declaration(source: &str) -> bool {
    source.trim_start_matches('\u{feff}').starts_with("<?xml")
}
