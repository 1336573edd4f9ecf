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

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

use polib::catalog::Catalog;

use crate::catalog::{language_dirs, parse_catalog, po_files};
use crate::error::Result;

/// Counts of translation message statuses.
///
/// A fuzzy message counts as fuzzy whether or not it has a
/// translation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MessageStats {
    pub translated: u32,
    pub fuzzy: u32,
    pub untranslated: u32,
}

impl MessageStats {
    /// Returns the total number of messages.
    pub fn total(&self) -> u32 {
        self.translated + self.fuzzy + self.untranslated
    }

    /// Returns counts of messages statuses in the given catalog.
    pub fn for_catalog(catalog: &Catalog) -> Self {
        let mut stats = Self::default();
        for message in catalog.messages() {
            if message.is_fuzzy() {
                stats.fuzzy += 1;
            } else if message.is_translated() {
                stats.translated += 1;
            } else {
                stats.untranslated += 1;
            }
        }
        stats
    }
}

impl Display for MessageStats {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{} translated, {} fuzzy, {} untranslated.",
            self.translated, self.fuzzy, self.untranslated,
        )
    }
}

/// Collect the stats of every PO file of the given languages.
///
/// With no `languages`, all languages found in `locale_dir` are used.
pub fn stat(locale_dir: &Path, languages: &[String]) -> Result<Vec<(PathBuf, MessageStats)>> {
    let languages = language_dirs(locale_dir, languages)?;
    let mut all_stats = Vec::new();
    for language in &languages {
        for po_file in po_files(&locale_dir.join(language))? {
            let catalog = parse_catalog(&po_file)?;
            all_stats.push((po_file, MessageStats::for_catalog(&catalog)));
        }
    }
    Ok(all_stats)
}
