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

//! Compilation of PO files into binary MO files.

use std::path::{Path, PathBuf};
use std::process::Command;

use polib::mo_file;

use crate::catalog::{parse_catalog, without_fuzzy};
use crate::error::{Error, Result};

/// Turns a PO file into an MO file.
pub trait CatalogCompiler {
    fn compile(&self, po_file: &Path, mo_file: &Path) -> Result<()>;
}

/// Compiles with `polib`. Fuzzy messages are not compiled, like with
/// `msgfmt` when `--use-fuzzy` is not given.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeCompiler;

impl CatalogCompiler for NativeCompiler {
    fn compile(&self, po_file: &Path, mo_file: &Path) -> Result<()> {
        let catalog = without_fuzzy(&parse_catalog(po_file)?);
        mo_file::write(&catalog, mo_file).map_err(Error::io(mo_file))
    }
}

/// Runs an external `msgfmt` program.
#[derive(Debug, Clone)]
pub struct MsgfmtCompiler {
    program: PathBuf,
}

impl MsgfmtCompiler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        MsgfmtCompiler {
            program: program.into(),
        }
    }
}

impl CatalogCompiler for MsgfmtCompiler {
    fn compile(&self, po_file: &Path, mo_file: &Path) -> Result<()> {
        let output = Command::new(&self.program)
            .arg("-o")
            .arg(mo_file)
            .arg(po_file)
            .output()
            .map_err(|source| Error::CompilerSpawn {
                program: self.program.clone(),
                source,
            })?;
        if !output.status.success() {
            log::error!("{}", String::from_utf8_lossy(&output.stderr).trim_end());
            return Err(Error::CompilerFailed {
                program: self.program.clone(),
                po_file: po_file.to_path_buf(),
                status: output.status,
            });
        }
        Ok(())
    }
}
