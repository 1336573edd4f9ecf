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

//! `docs-intl` keeps the Gettext catalogs of a documentation project
//! in sync with its POT templates and with Transifex.

use std::env;
use std::io;

use anyhow::Context;
use docs_intl::commands::{run, Environment};
use docs_intl::options::Invocation;
use docs_intl::Error;

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));

    let invocation = match Invocation::parse_from(env::args_os().skip(1)) {
        Ok(invocation) => invocation,
        // Prints the usage message and exits with status 2, or 0 for
        // --help and --version.
        Err(Error::Usage(err)) => err.exit(),
        Err(err) => return Err(err.into()),
    };
    let env = Environment {
        root: env::current_dir().context("Could not determine the current directory")?,
        home: dirs::home_dir(),
    };
    run(&invocation, &env, &mut io::stdout().lock())?;

    Ok(())
}
