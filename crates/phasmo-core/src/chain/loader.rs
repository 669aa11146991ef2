//! Cheat table loader.
//!
//! Pointer chains are read from a Cheat Engine table:
//!
//! ```text
//! <CheatTable>
//!   <CheatEntries>
//!     <CheatEntry>
//!       <Address>"GameAssembly.dll"+03F4E1A8</Address>
//!       <Offsets>
//!         <Offset>18</Offset>   <!-- applied last -->
//!         <Offset>B8</Offset>
//!         <Offset>0</Offset>    <!-- applied first -->
//!       </Offsets>
//!     </CheatEntry>
//!   </CheatEntries>
//! </CheatTable>
//! ```
//!
//! Cheat Engine lists offsets outermost-first, so the parsed list is reversed
//! into resolution order.

use std::fs;
use std::path::Path;

use roxmltree::{Document, Node};
use tracing::{debug, info};

use super::definition::{PointerChainDefinition, parse_address_spec, parse_offset};
use crate::error::{Error, Result};

/// Load pointer chain definitions from a cheat table file.
pub fn load_definitions<P: AsRef<Path>>(path: P) -> Result<Vec<PointerChainDefinition>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let definitions = parse_definitions(&content)?;
    info!(
        "Loaded {} pointer chains from {}",
        definitions.len(),
        path.display()
    );
    Ok(definitions)
}

/// Parse pointer chain definitions from cheat table XML.
///
/// Every `CheatEntry` in the document is considered, in document order.
/// Entries without an `Address` are skipped; a malformed address or offset
/// is an error.
pub fn parse_definitions(xml: &str) -> Result<Vec<PointerChainDefinition>> {
    let doc = Document::parse(xml).map_err(|e| Error::Load(e.to_string()))?;

    let mut definitions = Vec::new();
    for entry in doc
        .descendants()
        .filter(|n| n.is_element() && n.has_tag_name("CheatEntry"))
    {
        let Some(spec) = child_text(entry, "Address") else {
            debug!("Skipping cheat entry without address");
            continue;
        };

        let (module_name, base_offset) = parse_address_spec(spec)?;
        let mut offsets = match child_element(entry, "Offsets") {
            Some(node) => parse_offsets(node)?,
            None => Vec::new(),
        };
        offsets.reverse();

        definitions.push(PointerChainDefinition {
            module_name,
            base_offset,
            offsets,
        });
    }

    Ok(definitions)
}

fn parse_offsets(offsets_node: Node<'_, '_>) -> Result<Vec<u64>> {
    let mut offsets = Vec::new();
    for node in offsets_node
        .children()
        .filter(|n| n.is_element() && n.has_tag_name("Offset"))
    {
        if let Some(offset) = parse_offset(node.text().unwrap_or(""))? {
            offsets.push(offset);
        }
    }
    Ok(offsets)
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.has_tag_name(name))
}

fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    child_element(node, name)?
        .text()
        .filter(|text| !text.trim().is_empty())
}
