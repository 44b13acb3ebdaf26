//! Resolves which instance a send goes to

use crate::{Error, Instance, Result};

/// Outcome of resolving a send target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Send to this instance without asking
    Resolved(Instance),
    /// Several candidates and no explicit pick; the user must choose
    Ambiguous {
        candidates: Vec<Instance>,
        /// Position of the default instance, offered as the pre-filled pick
        suggested: usize,
    },
}

/// Interactive resolution.
///
/// An explicit id that matches wins. Otherwise an empty registry fails,
/// a single instance is used directly and several instances are ambiguous.
/// A stale explicit id is treated as absent.
pub fn select(instances: &[Instance], explicit: Option<&str>) -> Result<Selection> {
    if let Some(found) = find_explicit(instances, explicit) {
        return Ok(Selection::Resolved(found.clone()));
    }

    match instances {
        [] => Err(Error::NoInstancesConfigured),
        [only] => Ok(Selection::Resolved(only.clone())),
        _ => Ok(Selection::Ambiguous {
            candidates: instances.to_vec(),
            suggested: instances.iter().position(|i| i.default).unwrap_or(0),
        }),
    }
}

/// Programmatic resolution: explicit id, then the default, then the first
/// instance. Never ambiguous.
pub fn select_auto(instances: &[Instance], explicit: Option<&str>) -> Result<Instance> {
    find_explicit(instances, explicit)
        .or_else(|| instances.iter().find(|i| i.default))
        .or_else(|| instances.first())
        .cloned()
        .ok_or(Error::NoInstancesConfigured)
}

fn find_explicit<'a>(instances: &'a [Instance], explicit: Option<&str>) -> Option<&'a Instance> {
    let id = explicit?;
    instances.iter().find(|i| i.id == id)
}

/// Numbered list shown by the picker
pub fn picker_prompt(instances: &[Instance]) -> String {
    let mut prompt = String::from("Send to which OctoPrint?\n");
    for (i, instance) in instances.iter().enumerate() {
        prompt.push_str(&format!("{}. {} ({})\n", i + 1, instance.name, instance.url));
    }
    prompt.push_str("Enter number:");
    prompt
}

/// Parse a 1-based pick into a 0-based index clamped to `len`.
///
/// Leading digits, after an optional `+`, are used; anything unparsable
/// picks the first entry.
pub fn parse_pick(input: &str, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    let trimmed = input.trim();
    let digits: String = trimmed
        .strip_prefix('+')
        .unwrap_or(trimmed)
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    let pick = if digits.is_empty() {
        1
    } else {
        digits.parse::<usize>().unwrap_or(len)
    };

    pick.clamp(1, len) - 1
}
