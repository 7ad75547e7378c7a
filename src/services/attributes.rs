//! Attribute parsing for raw tag text.
//!
//! Works on the text between a tag name and its closing `>`. Never fails:
//! fragments that do not look like attributes are skipped.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::LazyLock;

use regex::Regex;

/// `name`, optionally followed by `= "v"`, `= 'v'` or `= v`.
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"([A-Za-z_:@][-\w:.@]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#,
    )
    .expect("valid attribute pattern")
});

/// Parse an attribute string into a lower-cased name → raw value map.
///
/// Valued attributes keep the first value seen for a name. Bare names
/// (`disabled`, `required`) map to `""` and never displace a value.
pub fn parse_attributes(raw: &str) -> HashMap<String, String> {
    let mut attrs: HashMap<String, String> = HashMap::new();
    let mut valued: Vec<String> = Vec::new();

    for caps in ATTRIBUTE.captures_iter(raw) {
        let Some(name) = caps.get(1) else { continue };
        let name = name.as_str().to_lowercase();
        let value = caps.get(2).or(caps.get(3)).or(caps.get(4));

        match (attrs.entry(name.clone()), value) {
            (Entry::Vacant(slot), Some(v)) => {
                slot.insert(v.as_str().to_string());
                valued.push(name);
            }
            (Entry::Vacant(slot), None) => {
                slot.insert(String::new());
            }
            (Entry::Occupied(mut slot), Some(v)) if !valued.contains(&name) => {
                slot.insert(v.as_str().to_string());
                valued.push(name);
            }
            (Entry::Occupied(_), _) => {}
        }
    }

    attrs
}
