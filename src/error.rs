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

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The command line could not be parsed, e.g. an unknown command.
    #[error(transparent)]
    Usage(#[from] clap::Error),
    #[error(
        "No locale directory: pass -d/--locale-dir or declare `locale_dirs` in {}",
        config.display()
    )]
    MissingLocaleDir { config: PathBuf },
    #[error("{}:{line}: {message}", path.display())]
    ConfigSyntax {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error("Could not parse {} as TOML: {source}", path.display())]
    ConfigToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(
        "{} does not exist. Pass the pot directory with -p/--pot-dir or generate \
         your pot files there",
        .0.display()
    )]
    PotDirNotFound(PathBuf),
    #[error("Could not parse {} as PO file: {message}", path.display())]
    Catalog { path: PathBuf, message: String },
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not walk directory: {0}")]
    WalkDir(#[from] walkdir::Error),
    #[error("Could not run {}: {source}", program.display())]
    CompilerSpawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} failed on {} with {status}", program.display(), po_file.display())]
    CompilerFailed {
        program: PathBuf,
        po_file: PathBuf,
        status: ExitStatus,
    },
    #[error(
        "Transifex username and password are required: pass --transifex-username and \
         --transifex-password or set DOCS_INTL_TRANSIFEX_USERNAME and \
         DOCS_INTL_TRANSIFEX_PASSWORD"
    )]
    MissingCredentials,
    #[error("{} not found, run `create-txconfig` first", .0.display())]
    MissingTxConfig(PathBuf),
    #[error("Error rendering template: {0}")]
    Template(#[from] tera::Error),
}

impl Error {
    /// Wrap an IO error with the path it happened on.
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Error {
        let path = path.into();
        move |source| Error::Io { path, source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
