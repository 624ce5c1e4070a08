// Tue Jan 13 2026 - Alex

use itertools::Itertools;
use serde::Serializer;

/// `14 ED 00` style rendering.
pub fn to_hex_spaced(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02X}", b)).join(" ")
}

/// `14ED` style rendering.
pub fn to_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02X}", b)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Element,
    Wildcard,
}

/// Splits a captured window back into its element and wildcard groups.
/// A group cut short by the end of the capture is returned partially.
pub fn split_groups(data: &[u8], element_width: usize, wildcard_width: usize) -> Vec<(GroupKind, &[u8])> {
    let mut groups = Vec::new();
    let mut pos = 0;
    let mut kind = GroupKind::Element;

    while pos < data.len() {
        let width = match kind {
            GroupKind::Element => element_width,
            GroupKind::Wildcard => wildcard_width,
        };
        if width > 0 {
            let end = (pos + width).min(data.len());
            groups.push((kind, &data[pos..end]));
            pos = end;
        } else if element_width == 0 {
            break;
        }
        kind = match kind {
            GroupKind::Element => GroupKind::Wildcard,
            GroupKind::Wildcard => GroupKind::Element,
        };
    }

    groups
}

pub fn serialize_bytes<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_hex_spaced(bytes))
}
