//! Page and master descriptor parsing.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use tracing::debug;

use crate::error::{DiagramError, DiagramResult};
use crate::namespace::ExpandedName;

/// Master names containing any of these substrings are never resolved.
pub const EXCLUDED_MASTER_NAMES: &[&str] = &["Rack Frame", "Dynamic connector"];

/// A shape placed on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub id: String,
    pub master_ref: String,
}

/// A stencil master that survived the exclusion filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Master {
    pub id: String,
    /// Display name with whitespace removed
    pub display_name: String,
}

/// Case-sensitive substring filter over raw master names.
#[derive(Debug, Clone)]
pub struct MasterFilter {
    excluded: Vec<String>,
}

impl Default for MasterFilter {
    fn default() -> Self {
        Self {
            excluded: EXCLUDED_MASTER_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl MasterFilter {
    /// Filter that excludes nothing.
    pub fn none() -> Self {
        Self { excluded: Vec::new() }
    }

    pub fn exclude(mut self, fragment: impl Into<String>) -> Self {
        self.excluded.push(fragment.into());
        self
    }

    pub fn is_excluded(&self, raw_name: &str) -> bool {
        self.excluded.iter().any(|fragment| raw_name.contains(fragment.as_str()))
    }
}

/// Remove every whitespace character from a display name.
pub fn strip_whitespace(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Collect shapes that carry both an `ID` and a `Master` attribute.
pub fn parse_shapes(xml: &str, source: &Path, element: &ExpandedName) -> DiagramResult<Vec<Shape>> {
    let mut shapes = Vec::new();
    scan_elements(xml, source, element, |start| {
        let id = attribute(start, "ID", source)?;
        let master_ref = attribute(start, "Master", source)?;
        if let (Some(id), Some(master_ref)) = (id, master_ref) {
            shapes.push(Shape { id, master_ref });
        }
        Ok(())
    })?;

    debug!("Parsed {} shapes from {:?}", shapes.len(), source);
    Ok(shapes)
}

/// Collect masters carrying an `ID` and a `Name`, dropping excluded names.
///
/// The filter sees the raw name; whitespace is stripped afterwards and a
/// name left empty by stripping is dropped too.
pub fn parse_masters(
    xml: &str,
    source: &Path,
    element: &ExpandedName,
    filter: &MasterFilter,
) -> DiagramResult<Vec<Master>> {
    let mut masters = Vec::new();
    let mut excluded = 0usize;
    scan_elements(xml, source, element, |start| {
        let id = attribute(start, "ID", source)?;
        let name = attribute(start, "Name", source)?;
        let (Some(id), Some(name)) = (id, name) else {
            return Ok(());
        };

        if filter.is_excluded(&name) {
            excluded += 1;
            return Ok(());
        }

        let display_name = strip_whitespace(&name);
        if display_name.is_empty() {
            excluded += 1;
            return Ok(());
        }

        masters.push(Master { id, display_name });
        Ok(())
    })?;

    debug!(
        "Parsed {} masters from {:?} ({} excluded)",
        masters.len(),
        source,
        excluded
    );
    Ok(masters)
}

/// Visit every element (at any depth below the root) whose expanded name
/// matches `element`.
fn scan_elements<F>(xml: &str, source: &Path, element: &ExpandedName, mut visit: F) -> DiagramResult<()>
where
    F: FnMut(&BytesStart<'_>) -> DiagramResult<()>,
{
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = NsReader::from_str(xml);
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        let (resolved, event) = match reader.read_resolved_event() {
            Ok(pair) => pair,
            Err(e) => return Err(DiagramError::malformed(source, e)),
        };

        match event {
            Event::Start(ref start) | Event::Empty(ref start) => {
                if depth == 0 {
                    if saw_root {
                        return Err(DiagramError::malformed(source, "multiple root elements"));
                    }
                    saw_root = true;
                }

                match resolved {
                    ResolveResult::Unknown(prefix) => {
                        return Err(DiagramError::malformed(
                            source,
                            format!("unbound prefix {}", String::from_utf8_lossy(&prefix)),
                        ));
                    }
                    ResolveResult::Bound(namespace) if depth > 0 => {
                        if element.matches(namespace.as_ref(), start.local_name().as_ref()) {
                            visit(start)?;
                        }
                    }
                    _ => {}
                }

                if matches!(event, Event::Start(_)) {
                    depth += 1;
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(DiagramError::malformed(source, "no root element"));
    }
    if depth != 0 {
        return Err(DiagramError::malformed(source, "unexpected end of document"));
    }
    Ok(())
}

fn attribute(start: &BytesStart<'_>, key: &str, source: &Path) -> DiagramResult<Option<String>> {
    let attr = start
        .try_get_attribute(key)
        .map_err(|e| DiagramError::malformed(source, e))?;

    match attr {
        Some(attr) => {
            let value = attr
                .unescape_value()
                .map_err(|e| DiagramError::malformed(source, e))?;
            Ok(Some(value.into_owned()).filter(|v| !v.is_empty()))
        }
        None => Ok(None),
    }
}
