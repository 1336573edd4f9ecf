// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Complete the header entry of a PO file before it is parsed.
//!
//! The catalog parser insists on a fixed set of header fields, while
//! templates written by documentation builders often leave out fields
//! such as `Language` or `Plural-Forms`. Missing fields are added with
//! an empty value, and `Plural-Forms` falls back to a single form.

use polib::metadata::CatalogMetadata;

const REQUIRED_FIELDS: [&str; 8] = [
    "Project-Id-Version",
    "POT-Creation-Date",
    "PO-Revision-Date",
    "Language-Team",
    "MIME-Version",
    "Content-Type",
    "Content-Transfer-Encoding",
    "Language",
];

const PLURAL_FORMS: &str = "Plural-Forms";
const DEFAULT_PLURAL_FORMS: &str = "nplurals=1; plural=0;";

/// The `msgstr` of the header entry, split into its lines.
struct Header {
    /// Index of the `msgstr ""` line.
    start: usize,
    /// Index of the first line after the entry's `msgstr`.
    end: usize,
    /// Escaped `Key: value` lines, without the trailing `\n`.
    fields: Vec<String>,
}

impl Header {
    /// Find the header entry at the top of `lines`.
    ///
    /// Returns `None` when the first entry is not a header or its
    /// `msgstr` is empty. Such files are left to the parser to reject.
    fn find(lines: &[&str]) -> Option<Header> {
        let msgid = lines
            .iter()
            .position(|line| !line.trim().is_empty() && !line.starts_with('#'))?;
        if lines[msgid].trim_end() != r#"msgid """# {
            return None;
        }
        let start = msgid + 1;
        let first = unquote(lines.get(start)?.strip_prefix("msgstr ")?)?;
        let mut value = String::from(first);
        let mut end = start + 1;
        while let Some(piece) = lines.get(end).and_then(|line| unquote(line)) {
            value.push_str(piece);
            end += 1;
        }
        if value.is_empty() {
            return None;
        }
        let fields = value
            .split(r"\n")
            .filter(|field| !field.trim().is_empty())
            .map(String::from)
            .collect();
        Some(Header { start, end, fields })
    }

    fn value(&self, key: &str) -> Option<&str> {
        self.fields.iter().find_map(|field| {
            let (name, value) = field.split_once(':')?;
            (name.trim() == key).then(|| value.trim())
        })
    }
}

fn unquote(text: &str) -> Option<&str> {
    text.trim().strip_prefix('"')?.strip_suffix('"')
}

/// The parser has no public entry point for plural rules other than
/// the whole metadata block.
fn is_valid_plural_forms(value: &str) -> bool {
    let mut metadata = REQUIRED_FIELDS
        .iter()
        .map(|key| format!("{key}: \n"))
        .collect::<String>();
    metadata.push_str(&format!("{PLURAL_FORMS}: {value}\n"));
    CatalogMetadata::parse(&metadata).is_ok()
}

/// Return `text` with the missing header fields filled in, or `None`
/// if the header can be parsed as it is.
pub(crate) fn complete_header(text: &str) -> Option<String> {
    let lines = text.lines().collect::<Vec<_>>();
    let mut header = Header::find(&lines)?;

    let mut changed = false;
    for key in REQUIRED_FIELDS {
        if header.value(key).is_none() {
            header.fields.push(format!("{key}: "));
            changed = true;
        }
    }
    match header.value(PLURAL_FORMS) {
        Some(value) if is_valid_plural_forms(value) => {}
        Some(_) => {
            header.fields.retain(|field| {
                field.split_once(':').map(|(name, _)| name.trim()) != Some(PLURAL_FORMS)
            });
            header.fields.push(format!("{PLURAL_FORMS}: {DEFAULT_PLURAL_FORMS}"));
            changed = true;
        }
        None => {
            header.fields.push(format!("{PLURAL_FORMS}: {DEFAULT_PLURAL_FORMS}"));
            changed = true;
        }
    }
    if !changed {
        return None;
    }

    let mut completed = Vec::with_capacity(lines.len() + header.fields.len());
    completed.extend(lines[..header.start].iter().map(|line| line.to_string()));
    completed.push(String::from(r#"msgstr """#));
    completed.extend(header.fields.iter().map(|field| format!(r#""{field}\n""#)));
    completed.extend(lines[header.end..].iter().map(|line| line.to_string()));
    let mut completed = completed.join("\n");
    completed.push('\n');
    Some(completed)
}
