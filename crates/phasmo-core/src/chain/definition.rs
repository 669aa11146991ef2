use std::fmt;

use crate::error::{Error, Result};

/// One multi-level pointer path to the watched value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerChainDefinition {
    pub module_name: String,
    pub base_offset: u64,
    /// Offsets in resolution order (reverse of their order in the cheat table)
    pub offsets: Vec<u64>,
}

impl fmt::Display for PointerChainDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{:#x} -> [", self.module_name, self.base_offset)?;
        for (i, offset) in self.offsets.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:#x}", offset)?;
        }
        write!(f, "]")
    }
}

/// Parse an address specification such as `"GameAssembly.dll"+01A2B3C4`.
///
/// Quotes and surrounding whitespace are ignored and the `0x` prefix on the
/// offset is optional.
pub fn parse_address_spec(spec: &str) -> Result<(String, u64)> {
    let cleaned = spec.trim().replace('"', "");
    let (module, offset) = cleaned
        .split_once('+')
        .ok_or_else(|| Error::Parse(format!("missing '+' in address spec {:?}", spec)))?;

    let module = module.trim();
    if module.is_empty() {
        return Err(Error::Parse(format!(
            "missing module name in address spec {:?}",
            spec
        )));
    }

    Ok((module.to_string(), parse_hex(offset)?))
}

/// Parse one offset node's text. Blank text yields `None`.
pub fn parse_offset(text: &str) -> Result<Option<u64>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_hex(text).map(Some)
}

fn parse_hex(text: &str) -> Result<u64> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    u64::from_str_radix(digits, 16)
        .map_err(|e| Error::Parse(format!("invalid hex value {:?}: {}", text, e)))
}
