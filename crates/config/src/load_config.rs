// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use path_clean::clean;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "electora.config.yaml";

pub type FindInParent = fn(&Path, &str) -> Option<PathBuf>;

/// Walk up from `start` looking for `filename`
pub fn find_in_parent(start: &Path, filename: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(filename))
        .find(|candidate| candidate.exists())
}

/// Decide which configuration file to read.
///
/// Precedence: an explicit cli path (relative paths resolve against `cwd`), then the first
/// `electora.config.yaml` found walking up from `cwd`, then the file in `default_config_dir`.
pub fn resolve_config_path(
    search: FindInParent,
    cwd: &Path,
    default_config_dir: &Path,
    cli_file: Option<&Path>,
) -> PathBuf {
    if let Some(cli_file) = cli_file {
        if cli_file.is_absolute() {
            return cli_file.to_path_buf();
        }
        return clean(cwd.join(cli_file));
    }

    search(cwd, DEFAULT_CONFIG_NAME)
        .unwrap_or_else(|| clean(default_config_dir.join(DEFAULT_CONFIG_NAME)))
}
