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

//! Configuration files for the Transifex command line client `tx`.
//!
//! The client reads the credentials from `~/.transifexrc` and the
//! project layout from `.tx/config`, an INI file with a `[main]`
//! section and one section per resource.

use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::info;
use regex::Regex;
use tera::{Context, Tera};

use crate::catalog::{parse_catalog, pot_files, POT_DIR_NAME};
use crate::error::{Error, Result};

const TRANSIFEXRC_TEMPLATE: &str = include_str!("../templates/transifexrc");
const TXCONFIG_TEMPLATE: &str = include_str!("../templates/txconfig");

pub const TRANSIFEX_HOST: &str = "https://www.transifex.com";

/// Source language of the documentation.
const SOURCE_LANG: &str = "en";

static INVALID_PROJECT_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\-_\w]").unwrap());

/// Outcome of creating a config file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileStatus {
    Created,
    /// The file existed already and was left alone.
    Skipped,
}

fn write_new_file(path: &Path, contents: &str) -> Result<FileStatus> {
    if path.exists() {
        info!("{} already exists, skipped.", path.display());
        return Ok(FileStatus::Skipped);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(Error::io(parent))?;
    }
    fs::write(path, contents).map_err(Error::io(path))?;
    info!("Create: {}", path.display());
    Ok(FileStatus::Created)
}

/// Create `<home>/.transifexrc` with the given credentials.
pub fn create_transifexrc(
    home: &Path,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<(PathBuf, FileStatus)> {
    let target = home.join(".transifexrc");
    if target.exists() {
        info!("{} already exists, skipped.", target.display());
        return Ok((target, FileStatus::Skipped));
    }
    let (Some(username), Some(password)) = (
        username.filter(|u| !u.is_empty()),
        password.filter(|p| !p.is_empty()),
    ) else {
        return Err(Error::MissingCredentials);
    };

    let mut context = Context::new();
    context.insert("host", TRANSIFEX_HOST);
    context.insert("username", username);
    context.insert("password", password);
    let contents = Tera::one_off(TRANSIFEXRC_TEMPLATE, &context, false)?;
    let status = write_new_file(&target, &contents)?;
    Ok((target, status))
}

/// Create `<root>/.tx/config` with only the `[main]` section.
pub fn create_txconfig(root: &Path) -> Result<(PathBuf, FileStatus)> {
    let target = root.join(".tx").join("config");
    let mut context = Context::new();
    context.insert("host", TRANSIFEX_HOST);
    let contents = Tera::one_off(TXCONFIG_TEMPLATE, &context, false)?;
    let status = write_new_file(&target, &contents)?;
    Ok((target, status))
}

/// Turn a project name into the slug used by Transifex.
pub fn normalize_project_name(name: &str) -> String {
    INVALID_PROJECT_CHARS
        .replace_all(&name.replace(' ', "-"), "")
        .into_owned()
}

/// Resource slug for a POT file, e.g. `usage--quickstart` for
/// `usage/quickstart.pot`.
pub fn resource_name(relative_path: &str) -> String {
    relative_path.replace('/', "--").replace('.', "_")
}

/// Show `path` relative to `root` with `/` separators, as `tx` expects.
fn display_relative(root: &Path, path: &Path) -> String {
    let path = path.strip_prefix(root).unwrap_or(path);
    if path.is_absolute() {
        return path.display().to_string();
    }
    path.iter()
        .map(|component| component.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// One `[name]` section of an INI file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Section {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn with_entry(mut self, key: &str, value: impl Into<String>) -> Self {
        self.entries.push((String::from(key), value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// The contents of a `.tx/config` file.
///
/// Comments are not preserved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxConfig {
    sections: Vec<Section>,
}

impl TxConfig {
    pub fn parse(text: &str) -> Self {
        let mut config = TxConfig::default();
        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                config.sections.push(Section::new(name.trim()));
                continue;
            }
            match (line.split_once('='), config.sections.last_mut()) {
                (Some((key, value)), Some(section)) => section
                    .entries
                    .push((String::from(key.trim()), String::from(value.trim()))),
                _ => log::warn!("Ignoring line outside of a section: {line:?}"),
            }
        }
        config
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    /// Replace the section with the same name, or append it.
    pub fn set_section(&mut self, section: Section) {
        match self.sections.iter_mut().find(|s| s.name == section.name) {
            Some(existing) => *existing = section,
            None => self.sections.push(section),
        }
    }
}

impl Display for TxConfig {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for (idx, section) in self.sections.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in &section.entries {
                if value.is_empty() {
                    writeln!(f, "{key} =")?;
                } else {
                    writeln!(f, "{key} = {value}")?;
                }
            }
        }
        Ok(())
    }
}

/// Register every non-empty POT file as a resource in `<root>/.tx/config`.
///
/// `locale_dir` and `pot_dir` are written to the config relative to
/// `root`. Returns the names of the sections written.
pub fn update_txconfig_resources(
    root: &Path,
    project_name: &str,
    locale_dir: &Path,
    pot_dir: Option<&Path>,
) -> Result<Vec<String>> {
    let tx_path = root.join(".tx").join("config");
    if !tx_path.is_file() {
        return Err(Error::MissingTxConfig(tx_path));
    }
    let locale_dir = root.join(locale_dir);
    let pot_dir = match pot_dir {
        Some(pot_dir) => root.join(pot_dir),
        None => locale_dir.join(POT_DIR_NAME),
    };
    if !pot_dir.is_dir() {
        return Err(Error::PotDirNotFound(pot_dir));
    }

    let text = fs::read_to_string(&tx_path).map_err(Error::io(&tx_path))?;
    let mut config = TxConfig::parse(&text);
    let project = normalize_project_name(project_name);
    let locale_display = display_relative(root, &locale_dir);
    let pot_display = display_relative(root, &pot_dir);

    let mut names = Vec::new();
    for (pot_path, relative) in pot_files(&pot_dir)? {
        if parse_catalog(&pot_path)?.count() == 0 {
            info!("{} is empty, skipped", pot_path.display());
            continue;
        }
        let name = format!("{project}.{}", resource_name(&relative));
        config.set_section(
            Section::new(name.as_str())
                .with_entry(
                    "file_filter",
                    format!("{locale_display}/<lang>/LC_MESSAGES/{relative}.po"),
                )
                .with_entry("source_file", format!("{pot_display}/{relative}.pot"))
                .with_entry("source_lang", SOURCE_LANG)
                .with_entry("type", "PO"),
        );
        info!("Set resource: {name}");
        names.push(name);
    }

    fs::write(&tx_path, config.to_string()).map_err(Error::io(&tx_path))?;
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polib::catalog::Catalog;
    use polib::message::Message;
    use polib::metadata::CatalogMetadata;
    use pretty_assertions::assert_eq;

    fn write_pot_file(path: &Path, msgids: &[&str]) -> anyhow::Result<()> {
        let mut catalog = Catalog::new(CatalogMetadata::new());
        for msgid in msgids {
            catalog.append_or_update(
                Message::build_singular()
                    .with_msgid(String::from(*msgid))
                    .done(),
            );
        }
        fs::create_dir_all(path.parent().unwrap())?;
        polib::po_file::write(&catalog, path)?;
        Ok(())
    }

    #[test]
    fn test_create_transifexrc() -> anyhow::Result<()> {
        let home = tempfile::tempdir()?;
        let (path, status) = create_transifexrc(home.path(), Some("spam-id"), Some("egg-pw"))?;
        assert_eq!(status, FileStatus::Created);
        assert_eq!(path, home.path().join(".transifexrc"));
        assert_eq!(
            fs::read_to_string(&path)?.lines().collect::<Vec<_>>(),
            vec![
                "[https://www.transifex.com]",
                "hostname = https://www.transifex.com",
                "password = egg-pw",
                "username = spam-id",
                "token =",
            ]
        );

        let (_, status) = create_transifexrc(home.path(), Some("other"), Some("other"))?;
        assert_eq!(status, FileStatus::Skipped);
        assert!(fs::read_to_string(&path)?.contains("spam-id"));
        Ok(())
    }

    #[test]
    fn test_create_transifexrc_without_credentials() -> anyhow::Result<()> {
        let home = tempfile::tempdir()?;
        let result = create_transifexrc(home.path(), Some("spam-id"), None);
        assert!(matches!(result, Err(Error::MissingCredentials)));
        let result = create_transifexrc(home.path(), Some(""), Some("egg-pw"));
        assert!(matches!(result, Err(Error::MissingCredentials)));
        assert!(!home.path().join(".transifexrc").exists());
        Ok(())
    }

    #[test]
    fn test_create_txconfig() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let (path, status) = create_txconfig(root.path())?;
        assert_eq!(status, FileStatus::Created);
        assert_eq!(
            fs::read_to_string(&path)?.lines().collect::<Vec<_>>(),
            vec!["[main]", "host = https://www.transifex.com"]
        );
        assert_eq!(create_txconfig(root.path())?.1, FileStatus::Skipped);
        Ok(())
    }

    #[test]
    fn test_normalize_project_name() {
        assert_eq!(normalize_project_name("ham project"), "ham-project");
        assert_eq!(normalize_project_name("Spam & Eggs!"), "Spam--Eggs");
        assert_eq!(normalize_project_name("docs_v1.2"), "docs_v12");
    }

    #[test]
    fn test_resource_name() {
        assert_eq!(resource_name("index"), "index");
        assert_eq!(resource_name("usage/quickstart"), "usage--quickstart");
        assert_eq!(resource_name("api/v1.0"), "api--v1_0");
    }

    #[test]
    fn test_txconfig_round_trip_keeps_sections() {
        let text = "# managed by tx\n[main]\nhost = https://www.transifex.com\n\n\
                    [ham.index]\nfile_filter = locale/<lang>/LC_MESSAGES/index.po\n";
        let mut config = TxConfig::parse(text);
        assert_eq!(config.sections().len(), 2);
        assert_eq!(
            config.section("main").and_then(|s| s.get("host")),
            Some(TRANSIFEX_HOST)
        );

        config.set_section(Section::new("ham.index").with_entry("type", "PO"));
        config.set_section(Section::new("ham.faq").with_entry("type", "PO"));
        assert_eq!(
            config.to_string(),
            "[main]\nhost = https://www.transifex.com\n\n\
             [ham.index]\ntype = PO\n\n\
             [ham.faq]\ntype = PO\n"
        );
    }

    #[test]
    fn test_update_txconfig_resources() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        create_txconfig(root.path())?;
        let pot_dir = root.path().join("locale/pot");
        write_pot_file(&pot_dir.join("index.pot"), &["Welcome"])?;
        write_pot_file(&pot_dir.join("usage/quickstart.pot"), &["Install"])?;
        write_pot_file(&pot_dir.join("empty.pot"), &[])?;

        let names =
            update_txconfig_resources(root.path(), "ham project", Path::new("locale"), None)?;
        assert_eq!(names, vec!["ham-project.index", "ham-project.usage--quickstart"]);

        let config = TxConfig::parse(&fs::read_to_string(root.path().join(".tx/config"))?);
        assert!(config.section("main").is_some());
        assert!(config.section("ham-project.empty").is_none());
        assert_eq!(
            config.section("ham-project.usage--quickstart"),
            Some(
                &Section::new("ham-project.usage--quickstart")
                    .with_entry(
                        "file_filter",
                        "locale/<lang>/LC_MESSAGES/usage/quickstart.po"
                    )
                    .with_entry("source_file", "locale/pot/usage/quickstart.pot")
                    .with_entry("source_lang", "en")
                    .with_entry("type", "PO")
            )
        );

        // Running again replaces the sections instead of duplicating them.
        update_txconfig_resources(root.path(), "ham project", Path::new("locale"), None)?;
        let config = TxConfig::parse(&fs::read_to_string(root.path().join(".tx/config"))?);
        assert_eq!(config.sections().len(), 3);
        Ok(())
    }

    #[test]
    fn test_update_txconfig_resources_with_pot_dir() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        create_txconfig(root.path())?;
        write_pot_file(&root.path().join("_build/locale/index.pot"), &["Welcome"])?;
        update_txconfig_resources(
            root.path(),
            "ham",
            Path::new("locale"),
            Some(Path::new("_build/locale")),
        )?;
        let config = TxConfig::parse(&fs::read_to_string(root.path().join(".tx/config"))?);
        assert_eq!(
            config.section("ham.index").and_then(|s| s.get("source_file")),
            Some("_build/locale/index.pot")
        );
        Ok(())
    }

    #[test]
    fn test_update_txconfig_resources_needs_txconfig() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let result = update_txconfig_resources(root.path(), "ham", Path::new("locale"), None);
        assert!(matches!(result, Err(Error::MissingTxConfig(_))));
        Ok(())
    }

    #[test]
    fn test_update_txconfig_resources_partial_header() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        create_txconfig(root.path())?;
        fs::create_dir_all(root.path().join("locale/pot"))?;
        fs::write(
            root.path().join("locale/pot/index.pot"),
            "msgid \"\"\nmsgstr \"\"\n\"Content-Type: text/plain; charset=UTF-8\\n\"\n\n\
             msgid \"Welcome\"\nmsgstr \"\"\n",
        )?;
        let names = update_txconfig_resources(root.path(), "ham", Path::new("locale"), None)?;
        assert_eq!(names, vec![String::from("ham.index")]);
        Ok(())
    }

    #[test]
    fn test_update_txconfig_resources_without_header() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        create_txconfig(root.path())?;
        fs::create_dir_all(root.path().join("locale/pot"))?;
        fs::write(
            root.path().join("locale/pot/index.pot"),
            "msgid \"\"\nmsgstr \"\"\n\nmsgid \"Welcome\"\nmsgstr \"\"\n",
        )?;
        let result = update_txconfig_resources(root.path(), "ham", Path::new("locale"), None);
        assert!(matches!(result, Err(Error::Catalog { .. })));
        // The config is left untouched.
        let config = TxConfig::parse(&fs::read_to_string(root.path().join(".tx/config"))?);
        assert_eq!(config.sections().len(), 1);
        Ok(())
    }
}
