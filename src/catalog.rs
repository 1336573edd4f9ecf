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

//! Keep the PO files of each language in sync with the POT templates
//! and compile them for the documentation build.
//!
//! The locale directory uses the usual Gettext layout:
//!
//! ```text
//! locale/
//!   pot/index.pot                  <- templates from the gettext builder
//!   de/LC_MESSAGES/index.po        <- one catalog per language
//!   de/LC_MESSAGES/index.mo
//! ```

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use polib::catalog::Catalog;
use polib::message::{Message, MessageMutView, MessageView};
use polib::metadata::CatalogMetadata;
use polib::po_file;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::compiler::CatalogCompiler;
use crate::error::{Error, Result};
use crate::header::complete_header;

/// Name of the directory inside the locale directory holding the
/// templates, unless another pot directory is given.
pub const POT_DIR_NAME: &str = "pot";

/// What happened to a PO file during [`update`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogChange {
    Created,
    Updated { added: usize, removed: usize },
    Unchanged,
}

/// Identity of a message within a catalog.
type MessageKey = (String, String, String);

fn message_key(message: &dyn MessageView) -> MessageKey {
    (
        String::from(message.msgctxt()),
        String::from(message.msgid()),
        String::from(message.msgid_plural().unwrap_or_default()),
    )
}

fn message_keys(catalog: &Catalog) -> HashSet<MessageKey> {
    catalog.messages().map(message_key).collect()
}

/// Look up the message in `catalog` with the same identity as `message`.
fn find_message<'a>(
    catalog: &'a Catalog,
    message: &dyn MessageView,
) -> Option<&'a dyn MessageView> {
    let msgctxt = Some(message.msgctxt()).filter(|msgctxt| !msgctxt.is_empty());
    catalog.find_message(msgctxt, message.msgid(), message.msgid_plural().ok())
}

/// Build a new message from `template`, taking the translation and
/// fuzzy flag from `translation`.
///
/// Source references and comments always come from `template`.
fn build_message(template: &dyn MessageView, translation: &dyn MessageView) -> Message {
    let mut message = if template.is_plural() {
        let msgstr_plural = match translation.msgstr_plural() {
            Ok(msgstr_plural) => msgstr_plural.to_vec(),
            Err(_) => template.msgstr_plural().map(|m| m.to_vec()).unwrap_or_default(),
        };
        Message::build_plural()
            .with_comments(String::from(template.comments()))
            .with_source(String::from(template.source()))
            .with_msgctxt(String::from(template.msgctxt()))
            .with_msgid(String::from(template.msgid()))
            .with_msgid_plural(String::from(template.msgid_plural().unwrap_or_default()))
            .with_msgstr_plural(msgstr_plural)
            .done()
    } else {
        Message::build_singular()
            .with_comments(String::from(template.comments()))
            .with_source(String::from(template.source()))
            .with_msgctxt(String::from(template.msgctxt()))
            .with_msgid(String::from(template.msgid()))
            .with_msgstr(String::from(translation.msgstr().unwrap_or_default()))
            .done()
    };
    if translation.is_fuzzy() {
        message.flags_mut().add_flag("fuzzy");
    }
    message
}

/// `CatalogMetadata` is not `Clone`, so copy it field by field.
fn copy_metadata(metadata: &CatalogMetadata) -> CatalogMetadata {
    let mut copy = CatalogMetadata {
        project_id_version: metadata.project_id_version.clone(),
        pot_creation_date: metadata.pot_creation_date.clone(),
        po_revision_date: metadata.po_revision_date.clone(),
        last_translator: metadata.last_translator.clone(),
        language_team: metadata.language_team.clone(),
        mime_version: metadata.mime_version.clone(),
        content_type: metadata.content_type.clone(),
        content_transfer_encoding: metadata.content_transfer_encoding.clone(),
        language: metadata.language.clone(),
        ..CatalogMetadata::default()
    };
    copy.plural_rules.nplurals = metadata.plural_rules.nplurals;
    copy.plural_rules.expr = metadata.plural_rules.expr.clone();
    copy
}

/// Merge the messages of the template `pot` into the translations `po`.
///
/// The result has the messages of `pot` in the same order. Existing
/// translations are kept, messages which are no longer in `pot` are
/// dropped.
pub fn merge(po: &Catalog, pot: &Catalog) -> Catalog {
    let mut metadata = copy_metadata(&po.metadata);
    metadata.pot_creation_date = pot.metadata.pot_creation_date.clone();
    let mut merged = Catalog::new(metadata);
    for template in pot.messages() {
        let message = match find_message(po, template) {
            Some(translation) => build_message(template, translation),
            None => build_message(template, template),
        };
        merged.append_or_update(message);
    }
    merged
}

/// Create the catalog for `language` from the template `pot`.
fn create(pot: &Catalog, language: &str) -> Catalog {
    let mut metadata = copy_metadata(&pot.metadata);
    metadata.language = String::from(language);
    let mut catalog = Catalog::new(metadata);
    for template in pot.messages() {
        catalog.append_or_update(build_message(template, template));
    }
    catalog
}

/// Parse the PO or POT file at `path`.
///
/// Header fields the parser requires but the file leaves out are
/// filled in on a temporary copy first.
pub(crate) fn parse_catalog(path: &Path) -> Result<Catalog> {
    let text = fs::read_to_string(path).map_err(Error::io(path))?;
    let parsed = match complete_header(&text) {
        Some(completed) => {
            debug!("Completing the header of {}", path.display());
            let mut copy = NamedTempFile::new().map_err(Error::io(path))?;
            copy.write_all(completed.as_bytes())
                .map_err(Error::io(copy.path()))?;
            po_file::parse(copy.path())
        }
        None => po_file::parse(path),
    };
    parsed.map_err(|err| Error::Catalog {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

fn write_catalog(catalog: &Catalog, path: &Path) -> Result<()> {
    po_file::write(catalog, path).map_err(Error::io(path))
}

/// Return `languages`, or the language directories in `locale_dir`
/// when no language is given.
///
/// The template directory and hidden directories are not languages.
pub fn language_dirs(locale_dir: &Path, languages: &[String]) -> Result<Vec<String>> {
    if !languages.is_empty() {
        return Ok(languages.to_vec());
    }
    let mut found = Vec::new();
    for entry in fs::read_dir(locale_dir).map_err(Error::io(locale_dir))? {
        let entry = entry.map_err(Error::io(locale_dir))?;
        if !entry.path().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(String::from) else {
            continue;
        };
        if name != POT_DIR_NAME && !name.starts_with('.') {
            found.push(name);
        }
    }
    found.sort();
    Ok(found)
}

/// Find all files below `dir` with the given extension, sorted by path.
fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Find the PO files below `dir`. A missing directory has none.
pub(crate) fn po_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        warn!("{} does not exist, skipped", dir.display());
        return Ok(Vec::new());
    }
    files_with_extension(dir, "po")
}

/// Find the POT files below `pot_dir`.
///
/// Each file is returned with its path relative to `pot_dir`, without
/// extension and with `/` as separator, e.g. `usage/quickstart`.
pub(crate) fn pot_files(pot_dir: &Path) -> Result<Vec<(PathBuf, String)>> {
    let mut pot_files = Vec::new();
    for path in files_with_extension(pot_dir, "pot")? {
        let relative = path
            .strip_prefix(pot_dir)
            .unwrap_or(&path)
            .with_extension("")
            .iter()
            .map(|component| component.to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        pot_files.push((path, relative));
    }
    Ok(pot_files)
}

fn revision_date() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M%z").to_string()
}

/// Update the PO file at `po_path` from the template `pot`.
fn update_po_file(pot: &Catalog, po_path: &Path, language: &str) -> Result<CatalogChange> {
    if let Some(parent) = po_path.parent() {
        fs::create_dir_all(parent).map_err(Error::io(parent))?;
    }

    if !po_path.exists() {
        write_catalog(&create(pot, language), po_path)?;
        info!("Create: {}", po_path.display());
        return Ok(CatalogChange::Created);
    }

    let po = parse_catalog(po_path)?;
    let mut merged = merge(&po, pot);
    let old_keys = message_keys(&po);
    let new_keys = message_keys(&merged);
    if old_keys == new_keys {
        info!("Not Changed: {}", po_path.display());
        return Ok(CatalogChange::Unchanged);
    }

    let added = new_keys.difference(&old_keys).count();
    let removed = old_keys.difference(&new_keys).count();
    merged.metadata.po_revision_date = revision_date();
    write_catalog(&merged, po_path)?;
    info!("Update: {} +{added}, -{removed}", po_path.display());
    Ok(CatalogChange::Updated { added, removed })
}

/// Update the PO files of `languages` from the POT files in `pot_dir`.
///
/// `pot_dir` defaults to `<locale_dir>/pot`. For a template
/// `<pot_dir>/a/b.pot` the catalog of language `de` is
/// `<locale_dir>/de/LC_MESSAGES/a/b.po`.
pub fn update(
    locale_dir: &Path,
    pot_dir: Option<&Path>,
    languages: &[String],
) -> Result<Vec<(PathBuf, CatalogChange)>> {
    let pot_dir = match pot_dir {
        Some(pot_dir) => pot_dir.to_path_buf(),
        None => locale_dir.join(POT_DIR_NAME),
    };
    if !pot_dir.is_dir() {
        return Err(Error::PotDirNotFound(pot_dir));
    }

    let languages = if locale_dir.is_dir() {
        language_dirs(locale_dir, languages)?
    } else {
        languages.to_vec()
    };
    if languages.is_empty() {
        warn!(
            "No languages found in {}. Pass them with -l/--language or create \
             one directory per language there",
            locale_dir.display()
        );
        return Ok(Vec::new());
    }

    let mut changes = Vec::new();
    for (pot_path, relative) in pot_files(&pot_dir)? {
        let pot = parse_catalog(&pot_path)?;
        for language in &languages {
            let po_path = locale_dir
                .join(language)
                .join("LC_MESSAGES")
                .join(format!("{relative}.po"));
            let change = update_po_file(&pot, &po_path, language)?;
            changes.push((po_path, change));
        }
    }
    Ok(changes)
}

/// Copy `catalog` without its fuzzy messages.
pub(crate) fn without_fuzzy(catalog: &Catalog) -> Catalog {
    let mut result = Catalog::new(copy_metadata(&catalog.metadata));
    for message in catalog.messages().filter(|message| !message.is_fuzzy()) {
        result.append_or_update(build_message(message, message));
    }
    result
}

/// Compile the PO files of `languages` into MO files next to them.
///
/// Returns the paths of the MO files written.
pub fn build(
    locale_dir: &Path,
    languages: &[String],
    compiler: &dyn CatalogCompiler,
) -> Result<Vec<PathBuf>> {
    let languages = language_dirs(locale_dir, languages)?;
    let mut mo_files = Vec::new();
    for language in &languages {
        for po_path in po_files(&locale_dir.join(language))? {
            let mo_path = po_path.with_extension("mo");
            info!("Build: {}", mo_path.display());
            compiler.compile(&po_path, &mo_path)?;
            mo_files.push(mo_path);
        }
    }
    Ok(mo_files)
}
