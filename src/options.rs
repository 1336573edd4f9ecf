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

//! Command line parsing and resolution of the locale directory.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config;
use crate::error::{Error, Result};

/// Name used for the program in usage messages.
pub const BIN_NAME: &str = "docs-intl";

/// Manage the Gettext catalogs of a documentation project.
#[derive(Clone, Debug, Parser)]
#[command(name = BIN_NAME, version)]
struct Cli {
    /// Read configurations from this config file. Defaults to conf.py,
    /// or source/conf.py if that is where the config lives.
    #[arg(short, long, global = true, env = "DOCS_INTL_CONFIG")]
    config: Option<PathBuf>,
    /// Locale directory holding the translations. Defaults to the first
    /// entry of `locale_dirs` in the config file.
    #[arg(short = 'd', long, global = true, env = "DOCS_INTL_LOCALE_DIR")]
    locale_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

/// The operations supported by `docs-intl`.
#[derive(Clone, Debug, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Update the po files of each language from the pot files.
    Update {
        /// Directory with the pot files generated by the gettext builder.
        /// Defaults to <locale_dir>/pot.
        #[arg(short, long, env = "DOCS_INTL_POT_DIR")]
        pot_dir: Option<PathBuf>,
        /// Languages to update. Defaults to the languages found in the
        /// locale directory.
        #[arg(short = 'l', long = "language", value_delimiter = ',', env = "DOCS_INTL_LANGUAGE")]
        languages: Vec<String>,
    },
    /// Compile the po files of each language into mo files.
    Build {
        #[arg(short = 'l', long = "language", value_delimiter = ',', env = "DOCS_INTL_LANGUAGE")]
        languages: Vec<String>,
        /// Compile with this external msgfmt program instead of the
        /// built-in compiler.
        #[arg(long, value_name = "PROGRAM")]
        msgfmt: Option<PathBuf>,
    },
    /// Print translation statistics for each po file.
    Stat {
        #[arg(short = 'l', long = "language", value_delimiter = ',', env = "DOCS_INTL_LANGUAGE")]
        languages: Vec<String>,
    },
    /// Create `$HOME/.transifexrc` with your Transifex credentials.
    CreateTransifexrc {
        #[arg(long, env = "DOCS_INTL_TRANSIFEX_USERNAME")]
        transifex_username: Option<String>,
        #[arg(long, env = "DOCS_INTL_TRANSIFEX_PASSWORD", hide_env_values = true)]
        transifex_password: Option<String>,
    },
    /// Create `./.tx/config` for the Transifex client.
    CreateTxconfig,
    /// Register one Transifex resource per pot file in `./.tx/config`.
    UpdateTxconfigResources {
        #[arg(long, env = "DOCS_INTL_TRANSIFEX_PROJECT_NAME")]
        transifex_project_name: String,
        #[arg(short, long, env = "DOCS_INTL_POT_DIR")]
        pot_dir: Option<PathBuf>,
    },
}

impl Command {
    /// Whether the command operates on the locale directory.
    pub fn needs_locale_dir(&self) -> bool {
        !matches!(
            self,
            Command::CreateTransifexrc { .. } | Command::CreateTxconfig
        )
    }
}

/// A parsed command line, before the locale directory is resolved.
#[derive(Clone, Debug)]
pub struct Invocation {
    pub command: Command,
    config: Option<PathBuf>,
    locale_dir: Option<PathBuf>,
}

/// The locale directory and config file of an invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedOptions {
    /// Never empty.
    pub locale_dir: PathBuf,
    /// The config file that was or would have been consulted.
    pub config_path: PathBuf,
}

impl Invocation {
    /// Parse `args`, where the first element is the command name.
    ///
    /// Nothing is read from the file system here, so an unknown
    /// command fails before any config file is looked at.
    pub fn parse_from<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args =
            std::iter::once(OsString::from(BIN_NAME)).chain(args.into_iter().map(Into::into));
        let cli = Cli::try_parse_from(args)?;
        Ok(Invocation {
            command: cli.command,
            config: cli.config,
            locale_dir: cli.locale_dir,
        })
    }

    /// Find the config file for a project rooted at `root`.
    ///
    /// An explicit `-c` wins. Otherwise `conf.py` is used, falling back
    /// to `source/conf.py` when only the latter exists (the layout of
    /// `sphinx-quickstart` with separate source and build directories).
    pub fn config_path(&self, root: &Path) -> PathBuf {
        if let Some(config) = &self.config {
            return root.join(config);
        }
        let default = root.join("conf.py");
        let nested = root.join("source").join("conf.py");
        if !default.exists() && nested.exists() {
            nested
        } else {
            default
        }
    }

    /// Resolve the locale directory: `-d` first, then the first entry
    /// of `locale_dirs` in the config file.
    pub fn resolve(&self, root: &Path) -> Result<ResolvedOptions> {
        let config_path = self.config_path(root);
        if let Some(locale_dir) = &self.locale_dir {
            return Ok(ResolvedOptions {
                locale_dir: locale_dir.clone(),
                config_path,
            });
        }

        if !config_path.is_file() {
            log::debug!("No config file at {}", config_path.display());
            return Err(Error::MissingLocaleDir {
                config: config_path,
            });
        }
        let locale_dir = config::read_locale_dirs(&config_path)?
            .and_then(|dirs| dirs.into_iter().next())
            .filter(|dir| !dir.is_empty());
        match locale_dir {
            Some(locale_dir) => Ok(ResolvedOptions {
                locale_dir: PathBuf::from(locale_dir),
                config_path,
            }),
            None => Err(Error::MissingLocaleDir {
                config: config_path,
            }),
        }
    }
}

/// Parse `args` and resolve the locale directory against `root`.
pub fn parse_options<I, T>(args: I, root: &Path) -> Result<(ResolvedOptions, Command)>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let invocation = Invocation::parse_from(args)?;
    let options = invocation.resolve(root)?;
    Ok((options, invocation.command))
}
