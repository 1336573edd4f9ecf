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

//! Helpers for translating documentation with Gettext.
//!
//! A documentation builder such as Sphinx extracts the translatable
//! text into POT templates. The functions here keep one PO catalog per
//! language up to date with those templates, compile the catalogs into
//! MO files for the build, and write the configuration used by the
//! Transifex client to sync the catalogs with the translation platform.
//!
//! The locale directory is taken from `-d/--locale-dir` or from the
//! `locale_dirs` setting in the project's `conf.py`:
//!
//! ```
//! use docs_intl::options::parse_options;
//!
//! let tmpdir = tempfile::tempdir().unwrap();
//! std::fs::write(tmpdir.path().join("conf.py"), "locale_dirs = ['locale/']\n").unwrap();
//! let (options, _command) = parse_options(["update"], tmpdir.path()).unwrap();
//! assert_eq!(options.locale_dir, std::path::PathBuf::from("locale/"));
//! ```

pub mod catalog;
pub mod commands;
pub mod compiler;
pub mod config;
pub mod error;
mod header;
pub mod options;
pub mod stats;
pub mod transifex;

pub use error::{Error, Result};
