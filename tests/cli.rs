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

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use assert_cmd::Command;
use tempfile::TempDir;

const POT_FILE: &str = r#"msgid ""
msgstr ""
"Project-Id-Version: Spam\n"
"MIME-Version: 1.0\n"
"Content-Type: text/plain; charset=UTF-8\n"
"Content-Transfer-Encoding: 8bit\n"

#: ../../index.rst:3
msgid "Welcome"
msgstr ""

#: ../../index.rst:5
msgid "Contents"
msgstr ""
"#;

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Result<Self> {
        Ok(Project {
            dir: TempDir::new()?,
        })
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let path = self.root().join(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))
    }

    fn command(&self) -> Result<Command> {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("docs-intl");
        cmd.current_dir(self.root());
        cmd.env_clear();
        cmd.env("HOME", self.root().join("home"));
        Ok(cmd)
    }
}

#[test]
fn test_command_not_found() -> Result<()> {
    let project = Project::new()?;
    project
        .command()?
        .arg("some-command")
        .assert()
        .failure()
        .code(2);
    Ok(())
}

#[test]
fn test_missing_locale_dir() -> Result<()> {
    let project = Project::new()?;
    project.write_file("conf.py", "project = 'Spam'\n")?;
    let output = project.command()?.arg("update").output()?;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("locale_dirs"), "{stderr}");
    Ok(())
}

#[test]
fn test_update_pot_not_found() -> Result<()> {
    let project = Project::new()?;
    project.write_file("conf.py", "locale_dirs = ['locale']\n")?;
    project.command()?.arg("update").assert().failure().code(1);
    Ok(())
}

#[test]
fn test_translation_workflow() -> Result<()> {
    let project = Project::new()?;
    project.write_file("source/conf.py", "locale_dirs = ['locale/']\n")?;
    project.write_file("_build/locale/index.pot", POT_FILE)?;

    project
        .command()?
        .args(["update", "-p", "_build/locale", "-l", "ja,de"])
        .assert()
        .success();
    for language in ["de", "ja"] {
        let po_file = project
            .root()
            .join(format!("locale/{language}/LC_MESSAGES/index.po"));
        assert!(po_file.is_file(), "{} is missing", po_file.display());
    }

    project.command()?.arg("build").assert().success();
    assert!(project.root().join("locale/ja/LC_MESSAGES/index.mo").is_file());

    let output = project.command()?.args(["stat", "-l", "de"]).output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.ends_with("index.po: 0 translated, 0 fuzzy, 2 untranslated.\n"),
        "{stdout}"
    );
    Ok(())
}

#[test]
fn test_transifex_files() -> Result<()> {
    let project = Project::new()?;
    project.write_file("locale/pot/index.pot", POT_FILE)?;

    project
        .command()?
        .arg("create-transifexrc")
        .env("DOCS_INTL_TRANSIFEX_USERNAME", "spam-id")
        .env("DOCS_INTL_TRANSIFEX_PASSWORD", "egg-pw")
        .assert()
        .success();
    let transifexrc = fs::read_to_string(project.root().join("home/.transifexrc"))?;
    assert!(transifexrc.contains("username = spam-id"), "{transifexrc}");

    project
        .command()?
        .arg("create-transifexrc")
        .assert()
        .success();

    project.command()?.arg("create-txconfig").assert().success();
    project
        .command()?
        .args([
            "-d",
            "locale",
            "update-txconfig-resources",
            "--transifex-project-name",
            "ham project",
        ])
        .assert()
        .success();
    let config = fs::read_to_string(project.root().join(".tx/config"))?;
    assert!(config.contains("[ham-project.index]"), "{config}");
    assert!(
        config.contains("source_file = locale/pot/index.pot"),
        "{config}"
    );
    Ok(())
}
