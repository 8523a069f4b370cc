//! Compiler flags for editor completion.
//!
//! Flags come either from a [`CompilationDatabase`] or from
//! [`DEFAULT_FLAGS`]. In both cases include-path flags are rewritten to
//! absolute paths so the completion engine can run from any directory.
//!
//! # Key Functions
//!
//! - [`flags_for_file`]: Flags for one source file
//! - [`make_relative_paths_absolute`]: Include-path normalization
//! - [`prepare_clang_flags`]: Strip the parts of a recorded compile command
//!   that are not flags

use crate::compdb::{CompdbError, CompilationDatabase, normalize_lexically};
use std::path::Path;

/// Flags whose argument is a path, either attached (`-Iinclude`) or as the
/// next flag (`-isystem include`). Checked in this order.
pub const PATH_FLAGS: &[&str] = &["-isystem", "-I", "-iquote", "--sysroot="];

/// Removed from database flags; the completion engine ships its own libc++.
pub const STDLIB_LIBCXX_FLAG: &str = "-stdlib=libc++";

/// Used when no compilation database is configured.
pub const DEFAULT_FLAGS: &[&str] = &[
    "-Wall",
    "-Wextra",
    "-Werror",
    "-Wc++98-compat",
    "-Wno-long-long",
    "-Wno-variadic-macros",
    "-DUSE_CLANG_COMPLETER",
    "-std=c++11",
    "-x",
    "c++",
    "-I/opt/kde/build/core/libs/kactivities/src",
    "-I/opt/kde/src/core/libs/kactivities/src",
    "-I/opt/kde/usr/kde/include",
    "-I/opt/kde/usr/kde/include/KDE",
    "-I/usr/include",
    "-I/usr/include/qt4",
    "-I/usr/include/qt4/Qt",
    "-I/usr/include/qt4/Qt3Support",
    "-I/usr/include/qt4/QtCore",
    "-I/usr/include/qt4/QtDBus",
    "-I/usr/include/qt4/QtDeclarative",
    "-I/usr/include/qt4/QtDesigner",
    "-I/usr/include/qt4/QtDesigner",
    "-I/usr/include/qt4/QtGui",
    "-I/usr/include/qt4/QtHelp",
    "-I/usr/include/qt4/QtNetwork",
    "-I/usr/include/qt4/QtOpenGL",
    "-I/usr/include/qt4/QtScript",
    "-I/usr/include/qt4/QtScriptTools",
    "-I/usr/include/qt4/QtSql",
    "-I/usr/include/qt4/QtSvg",
    "-I/usr/include/qt4/QtTest",
    "-I/usr/include/qt4/QtUiTools",
    "-I/usr/include/qt4/QtWebKit",
    "-I/usr/include/qt4/QtXml",
    "-I/usr/include/qt4/QtXmlPatterns",
    "-I/usr/share/qt4/mkspecs/default",
    "-D_BSD_SOURCE",
    "-DQT_NO_DEBUG_OUTPUT",
    "-DQT_USE_FAST_CONCATENATION",
    "-DQT_USE_FAST_OPERATOR_PLUS",
    "-D_XOPEN_SOURCE=500",
    "-D_BSD_SOURCE",
    "-DQT_NO_STL",
    "-DQT_NO_CAST_TO_ASCII",
    "-D_REENTRANT",
    "-DKDE_DEPRECATED_WARNINGS",
    "-DKDE4_CMAKE_TOPLEVEL_DIR_LENGTH=22",
];

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FlagsResponse {
    pub flags: Vec<String>,
    pub do_cache: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum FlagsError {
    #[error("compilation database error: {source}")]
    Compdb { source: CompdbError },
}

impl From<CompdbError> for FlagsError {
    fn from(source: CompdbError) -> Self {
        Self::Compdb { source }
    }
}

/// Rewrite include-path flags relative to `working_dir`.
///
/// Absolute paths are kept as they are and empty flags are dropped. An empty
/// `working_dir` returns the flags untouched.
pub fn make_relative_paths_absolute<S: AsRef<str>>(flags: &[S], working_dir: &Path) -> Vec<String> {
    if working_dir.as_os_str().is_empty() {
        return flags.iter().map(|flag| flag.as_ref().to_string()).collect();
    }

    let mut new_flags = Vec::with_capacity(flags.len());
    let mut make_next_absolute = false;

    for flag in flags {
        let flag = flag.as_ref();
        let mut new_flag = flag.to_string();

        if make_next_absolute {
            make_next_absolute = false;
            if !flag.starts_with('/') {
                new_flag = join(working_dir, flag);
            }
        }

        for path_flag in PATH_FLAGS {
            if flag == *path_flag {
                make_next_absolute = true;
                break;
            }
            if let Some(path) = flag.strip_prefix(path_flag) {
                new_flag = format!("{path_flag}{}", join(working_dir, path));
                break;
            }
        }

        if !new_flag.is_empty() {
            new_flags.push(new_flag);
        }
    }

    new_flags
}

fn join(working_dir: &Path, path: &str) -> String {
    working_dir.join(path).to_string_lossy().into_owned()
}

/// Drop the compiler executable, `-c`, `-o <output>` and the source file
/// itself from a recorded compile command.
pub fn prepare_clang_flags(flags: Vec<String>, source_file: &Path, working_dir: &Path) -> Vec<String> {
    let mut flags = flags.into_iter().peekable();
    if flags.peek().is_some_and(|first| !first.starts_with('-')) {
        flags.next();
    }

    let mut prepared = Vec::new();
    while let Some(flag) = flags.next() {
        if flag == "-c" {
            continue;
        }
        if flag == "-o" {
            flags.next();
            continue;
        }
        if !flag.starts_with('-')
            && !source_file.as_os_str().is_empty()
            && normalize_lexically(&working_dir.join(&flag)) == source_file
        {
            continue;
        }
        prepared.push(flag);
    }
    prepared
}

/// Flags for `filename`, from `database` when one is configured.
///
/// Without a database the default flags are resolved against `base_dir`.
pub fn flags_for_file(
    filename: &Path,
    database: Option<&CompilationDatabase>,
    base_dir: &Path,
) -> Result<FlagsResponse, FlagsError> {
    let flags = match database {
        Some(database) => {
            let info = database.compilation_info_for_file(filename)?;
            let mut flags = prepare_clang_flags(
                make_relative_paths_absolute(info.compiler_flags.as_slice(), &info.working_dir),
                &info.source_file,
                &info.working_dir,
            );
            if let Some(pos) = flags.iter().position(|flag| flag == STDLIB_LIBCXX_FLAG) {
                flags.remove(pos);
            }
            flags
        }
        None => make_relative_paths_absolute(DEFAULT_FLAGS, base_dir),
    };

    tracing::debug!(file = %filename.display(), count = flags.len(), "resolved flags");

    Ok(FlagsResponse {
        flags,
        do_cache: true,
    })
}
