//! JSON compilation database (`compile_commands.json`) loading and lookup.
//!
//! # Key Types
//!
//! - [`CompilationDatabase`]: All compile commands of a build directory
//! - [`CompilationInfo`]: Flags and working directory for one source file
//!
//! Entries may carry either an `arguments` array or a single shell-quoted
//! `command` string; the latter is split with [`split_command`].

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

pub const COMPDB_FILE_NAME: &str = "compile_commands.json";

#[derive(Debug, thiserror::Error)]
pub enum CompdbError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid compilation database {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("unterminated quote in command: {command}")]
    UnterminatedQuote { command: String },
    #[error("trailing backslash in command: {command}")]
    TrailingBackslash { command: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileCommand {
    pub directory: String,
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl CompileCommand {
    /// Full argv of the compiler invocation, compiler executable included.
    pub fn argv(&self) -> Result<Vec<String>, CompdbError> {
        if let Some(arguments) = &self.arguments {
            return Ok(arguments.clone());
        }
        match &self.command {
            Some(command) => split_command(command),
            None => Ok(Vec::new()),
        }
    }

    pub fn resolved_file(&self) -> PathBuf {
        normalize_lexically(&Path::new(&self.directory).join(&self.file))
    }
}

/// Compile flags for a single file. All fields are empty when the file has
/// no entry in the database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilationInfo {
    pub compiler_flags: Vec<String>,
    pub working_dir: PathBuf,
    pub source_file: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct CompilationDatabase {
    commands: Vec<CompileCommand>,
}

impl CompilationDatabase {
    /// Load `compile_commands.json` from the given build directory.
    pub fn open(dir: &Path) -> Result<Self, CompdbError> {
        let path = dir.join(COMPDB_FILE_NAME);
        let raw = std::fs::read_to_string(&path).map_err(|source| CompdbError::Io {
            path: path.clone(),
            source,
        })?;
        let commands: Vec<CompileCommand> =
            serde_json::from_str(&raw).map_err(|source| CompdbError::Json {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), entries = commands.len(), "loaded compilation database");
        Ok(Self { commands })
    }

    pub fn from_commands(commands: Vec<CompileCommand>) -> Self {
        Self { commands }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn compilation_info_for_file(&self, file: &Path) -> Result<CompilationInfo, CompdbError> {
        let wanted = if file.is_absolute() {
            normalize_lexically(file)
        } else {
            let cwd = std::env::current_dir().map_err(|source| CompdbError::Io {
                path: file.to_path_buf(),
                source,
            })?;
            normalize_lexically(&cwd.join(file))
        };

        // Later entries override earlier ones for the same file.
        let Some(entry) = self
            .commands
            .iter()
            .rev()
            .find(|entry| entry.resolved_file() == wanted)
        else {
            tracing::warn!(file = %wanted.display(), "no compilation database entry");
            return Ok(CompilationInfo::default());
        };

        Ok(CompilationInfo {
            compiler_flags: entry.argv()?,
            working_dir: PathBuf::from(&entry.directory),
            source_file: wanted,
        })
    }
}

/// Split a shell command line into words.
///
/// Supports whitespace separation, literal single quotes, double quotes with
/// `\"` and `\\` escapes, and backslash escapes outside quotes. A backslash
/// with nothing after it is an error, like an unbalanced quote.
pub fn split_command(command: &str) -> Result<Vec<String>, CompdbError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = command.chars();

    while let Some(ch) = chars.next() {
        match ch {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(unterminated(command)),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\' | '$' | '`')) => current.push(c),
                            Some(c) => {
                                current.push('\\');
                                current.push(c);
                            }
                            None => return Err(unterminated(command)),
                        },
                        Some(c) => current.push(c),
                        None => return Err(unterminated(command)),
                    }
                }
            }
            '\\' => {
                in_word = true;
                match chars.next() {
                    Some(c) => current.push(c),
                    None => {
                        return Err(CompdbError::TrailingBackslash {
                            command: command.to_string(),
                        });
                    }
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }

    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn unterminated(command: &str) -> CompdbError {
    CompdbError::UnterminatedQuote {
        command: command.to_string(),
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
