use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::doc::OpenApiDocument;
use crate::error::Error;

/// Options forwarded to the scanner alongside the source locations.
#[derive(Clone, Debug, Default)]
pub struct ScanOptions {
    /// short name -> expansion, applied to `$ref` values
    pub aliases: HashMap<String, String>,
}

/// Produces an OpenAPI document from a set of source locations.
///
/// Implementations own the extraction strategy entirely; the assembler only
/// sees the finished document or a scan error.
pub trait ApiScanner: Send + Sync {
    fn scan(&self, paths: &[PathBuf], options: &ScanOptions) -> Result<OpenApiDocument, Error>;
}

/// Scanner that assembles a document from pregenerated `.json` fragments.
///
/// Each fragment is a partial document (a `paths` subtree, a `definitions`
/// block, ...). Fragments are merged in sorted path order, later files
/// overriding earlier ones key by key. `$ref` values starting with a
/// registered alias and a colon get the alias expanded.
pub struct FragmentScanner;

impl ApiScanner for FragmentScanner {
    fn scan(&self, paths: &[PathBuf], options: &ScanOptions) -> Result<OpenApiDocument, Error> {
        let mut files = Vec::new();
        for path in paths {
            collect_fragments(path, &mut files)?;
        }
        files.sort();

        let mut merged = Value::Object(Map::new());
        for file in &files {
            debug!("merging document fragment {}", file.display());
            let raw = fs::read_to_string(file)
                .map_err(|err| Error::Scan(format!("{}: {err}", file.display())))?;
            let mut fragment: Value = serde_json::from_str(&raw)
                .map_err(|err| Error::Scan(format!("{}: {err}", file.display())))?;
            expand_aliases(&mut fragment, &options.aliases);
            merge_value(&mut merged, fragment);
        }

        serde_json::from_value(merged)
            .map_err(|err| Error::Scan(format!("merged fragments do not form a document: {err}")))
    }
}

fn collect_fragments(path: &Path, files: &mut Vec<PathBuf>) -> Result<(), Error> {
    if path.is_file() {
        files.push(path.to_path_buf());
        return Ok(());
    }
    let entries =
        fs::read_dir(path).map_err(|err| Error::Scan(format!("{}: {err}", path.display())))?;
    for entry in entries {
        let entry = entry.map_err(|err| Error::Scan(format!("{}: {err}", path.display())))?;
        let entry_path = entry.path();
        if entry_path.is_dir() {
            collect_fragments(&entry_path, files)?;
        } else if entry_path.extension().is_some_and(|ext| ext == "json") {
            files.push(entry_path);
        }
    }
    Ok(())
}

/// Objects merge recursively, anything else is replaced by the newer value.
fn merge_value(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Object(target), Value::Object(incoming)) => {
            for (key, value) in incoming {
                merge_value(target.entry(key).or_insert(Value::Null), value);
            }
        }
        (target, incoming) => *target = incoming,
    }
}

fn expand_aliases(value: &mut Value, aliases: &HashMap<String, String>) {
    if aliases.is_empty() {
        return;
    }
    match value {
        Value::Object(map) => {
            for (key, value) in map.iter_mut() {
                if key == "$ref" {
                    if let Value::String(target) = value {
                        if let Some((short, rest)) = target.split_once(':') {
                            if let Some(expansion) = aliases.get(short) {
                                *target = format!("{expansion}{rest}");
                            }
                        }
                    }
                } else {
                    expand_aliases(value, aliases);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                expand_aliases(item, aliases);
            }
        }
        _ => {}
    }
}
