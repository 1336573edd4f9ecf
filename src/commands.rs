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

//! Run a parsed [`Invocation`].

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::catalog::{build, update};
use crate::compiler::{CatalogCompiler, MsgfmtCompiler, NativeCompiler};
use crate::error::{Error, Result};
use crate::options::{Command, Invocation};
use crate::stats::stat;
use crate::transifex::{create_transifexrc, create_txconfig, update_txconfig_resources};

/// Where a command runs.
#[derive(Clone, Debug)]
pub struct Environment {
    /// Project directory, against which relative paths are resolved.
    pub root: PathBuf,
    /// Home directory receiving `.transifexrc`.
    pub home: Option<PathBuf>,
}

/// Run `invocation`, writing command output such as statistics to `out`.
pub fn run(invocation: &Invocation, env: &Environment, out: &mut dyn Write) -> Result<()> {
    let locale_dir = if invocation.command.needs_locale_dir() {
        let options = invocation.resolve(&env.root)?;
        log::debug!(
            "Using locale directory {} (config {})",
            options.locale_dir.display(),
            options.config_path.display()
        );
        env.root.join(options.locale_dir)
    } else {
        PathBuf::new()
    };
    let rooted = |path: &Option<PathBuf>| path.as_ref().map(|path| env.root.join(path));

    match &invocation.command {
        Command::Update { pot_dir, languages } => {
            update(&locale_dir, rooted(pot_dir).as_deref(), languages)?;
        }
        Command::Build { languages, msgfmt } => {
            let compiler: Box<dyn CatalogCompiler> = match msgfmt {
                Some(program) => Box::new(MsgfmtCompiler::new(program)),
                None => Box::new(NativeCompiler),
            };
            build(&locale_dir, languages, compiler.as_ref())?;
        }
        Command::Stat { languages } => {
            for (po_file, stats) in stat(&locale_dir, languages)? {
                let po_file = po_file.strip_prefix(&env.root).unwrap_or(&po_file);
                writeln!(out, "{}: {stats}", po_file.display()).map_err(stdout_error)?;
            }
        }
        Command::CreateTransifexrc {
            transifex_username,
            transifex_password,
        } => {
            let home = env.home.as_deref().ok_or_else(|| Error::Io {
                path: PathBuf::from("~"),
                source: io::Error::new(io::ErrorKind::NotFound, "home directory not found"),
            })?;
            create_transifexrc(
                home,
                transifex_username.as_deref(),
                transifex_password.as_deref(),
            )?;
        }
        Command::CreateTxconfig => {
            create_txconfig(&env.root)?;
        }
        Command::UpdateTxconfigResources {
            transifex_project_name,
            pot_dir,
        } => {
            let locale_dir = locale_dir.strip_prefix(&env.root).unwrap_or(&locale_dir);
            update_txconfig_resources(
                &env.root,
                transifex_project_name,
                locale_dir,
                pot_dir.as_deref(),
            )?;
        }
    }
    Ok(())
}

fn stdout_error(source: io::Error) -> Error {
    Error::Io {
        path: Path::new("<stdout>").to_path_buf(),
        source,
    }
}
