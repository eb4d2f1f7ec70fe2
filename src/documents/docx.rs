// src/documents/docx.rs
use crate::documents::placeholders::{hoist_block_tags, join_split_tags, unescape_tag_bodies};
use crate::errors::AttestError;
use handlebars::Handlebars;
use serde::Serialize;
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const BODY_PART: &str = "word/document.xml";

enum Part {
    /// Registered with Handlebars under the part name.
    Template,
    Verbatim(Vec<u8>),
}

/// A Word document with Handlebars tags in its body, headers and footers.
/// Tag syntax is checked when the template is loaded.
pub struct DocxTemplate {
    parts: Vec<(String, Part)>,
    handlebars: Handlebars<'static>,
}

fn incompatible(msg: impl std::fmt::Display) -> AttestError {
    AttestError::RenderIncompatibility(msg.to_string())
}

fn is_template_part(name: &str) -> bool {
    if name == BODY_PART {
        return true;
    }
    name.strip_prefix("word/")
        .filter(|rest| !rest.contains('/'))
        .map(|rest| {
            (rest.starts_with("header") || rest.starts_with("footer")) && rest.ends_with(".xml")
        })
        .unwrap_or(false)
}

/// Word XML with split tags joined and `{{tr ..}}`/`{{p ..}}` hoisted.
fn prepare_part(name: &str, content: &[u8]) -> Result<String, AttestError> {
    let xml = std::str::from_utf8(content)
        .map_err(|e| incompatible(format!("{name} is not UTF-8: {e}")))?;
    hoist_block_tags(&unescape_tag_bodies(&join_split_tags(xml)))
}

impl DocxTemplate {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AttestError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            AttestError::RenderIncompatibility(format!("cannot read template {}: {e}", path.display()))
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AttestError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| incompatible(format!("template is not a .docx package: {e}")))?;

        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::html_escape);

        let mut parts = Vec::new();
        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| incompatible(format!("unreadable template entry: {e}")))?;
            if file.is_dir() {
                continue;
            }

            let name = file.name().to_string();
            let mut content = Vec::new();
            file.read_to_end(&mut content)?;

            if is_template_part(&name) {
                let template = prepare_part(&name, &content)?;
                handlebars
                    .register_template_string(&name, template)
                    .map_err(|e| incompatible(format!("{name}: {e}")))?;
                parts.push((name, Part::Template));
            } else {
                parts.push((name, Part::Verbatim(content)));
            }
        }

        if !parts.iter().any(|(name, _)| name == BODY_PART) {
            return Err(incompatible(format!("template has no {BODY_PART}")));
        }

        Ok(Self { parts, handlebars })
    }

    /// Renders every template part against `context` and returns the
    /// finished .docx bytes. Nothing is returned unless every part renders.
    pub fn render<T: Serialize>(&self, context: &T) -> Result<Vec<u8>, AttestError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, part) in &self.parts {
            writer
                .start_file(name.as_str(), options)
                .map_err(|e| AttestError::RenderIncompatibility(format!("write {name}: {e}")))?;

            match part {
                Part::Template => {
                    debug!(part = %name, "rendering template part");
                    let rendered = self
                        .handlebars
                        .render(name, context)
                        .map_err(|e| incompatible(format!("{name}: {e}")))?;
                    writer.write_all(rendered.as_bytes())?;
                }
                Part::Verbatim(content) => writer.write_all(content)?,
            }
        }

        let cursor = writer
            .finish()
            .map_err(|e| AttestError::RenderIncompatibility(format!("finish .docx: {e}")))?;
        Ok(cursor.into_inner())
    }
}
