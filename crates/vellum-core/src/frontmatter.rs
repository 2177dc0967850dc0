//! Frontmatter parsing for post files.
//!
//! The parser only separates the metadata block from the body and turns the
//! block into a key/value mapping. It does not check field types; that is the
//! job of [`crate::normalize`].

use std::{collections::BTreeMap, path::Path};

use serde_yaml::Value;

use crate::error::{CoreError, Result};

/// Raw front-matter fields keyed by name.
pub type Metadata = BTreeMap<String, Value>;

/// A document split into its metadata and body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    /// Parsed metadata fields. Empty when the document has no block.
    pub data: Metadata,

    /// Document text after the metadata block.
    pub body: String,
}

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML frontmatter delimited by `---`.
    Yaml,
    /// TOML frontmatter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into frontmatter and body.
///
/// Both delimiters must sit on their own line, so a `---` horizontal rule
/// inside the body never closes the block early.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let content = content.trim_start_matches(['\n', '\r']);

    let format = if content.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return None;
    };

    let delimiter = format.delimiter();
    let (first_line, rest) = content.split_once('\n').unwrap_or((content, ""));
    if first_line.trim_end() != delimiter {
        return None;
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == delimiter {
            let frontmatter = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((format, frontmatter, body.trim_start_matches(['\n', '\r'])));
        }
        offset += line.len();
    }

    None
}

/// Parse frontmatter from a string.
///
/// A document without a block yields empty metadata and the whole text as
/// body. A block that is not a mapping is an error.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<FrontMatter> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        return Ok(FrontMatter {
            data: Metadata::new(),
            body: content.to_string(),
        });
    };

    let data = if fm_str.trim().is_empty() {
        Metadata::new()
    } else {
        match format {
            FrontmatterFormat::Yaml => parse_yaml_block(fm_str, path)?,
            FrontmatterFormat::Toml => parse_toml_block(fm_str, path)?,
        }
    };

    Ok(FrontMatter {
        data,
        body: body.to_string(),
    })
}

fn parse_yaml_block(block: &str, path: &Path) -> Result<Metadata> {
    let value: Value =
        serde_yaml::from_str(block).map_err(|e| CoreError::frontmatter(path, e.to_string()))?;

    match value {
        Value::Mapping(mapping) => Ok(mapping
            .into_iter()
            .filter_map(|(key, value)| yaml_key(key).map(|k| (k, value)))
            .collect()),
        Value::Null => Ok(Metadata::new()),
        _ => Err(CoreError::frontmatter(path, "frontmatter is not a mapping")),
    }
}

fn parse_toml_block(block: &str, path: &Path) -> Result<Metadata> {
    let table: toml::Table =
        toml::from_str(block).map_err(|e| CoreError::frontmatter(path, e.to_string()))?;

    Ok(table
        .into_iter()
        .map(|(key, value)| (key, toml_to_yaml(value)))
        .collect())
}

fn yaml_key(key: Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Map TOML values onto the YAML value model. Datetimes become strings.
fn toml_to_yaml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Value::Number(f.into()),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(toml_to_yaml).collect()),
        toml::Value::Table(table) => Value::Mapping(
            table
                .into_iter()
                .map(|(k, v)| (Value::String(k), toml_to_yaml(v)))
                .collect(),
        ),
    }
}
