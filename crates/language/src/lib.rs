//! Languages understood by the editor, with their starter templates and file extensions.
mod templates;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Language of an open file
///
/// Selects the starter template, the file extension and the execution strategy. `Plaintext`
/// is never offered when creating a file; it is what an unknown extension maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    JavaScript,
    TypeScript,
    Python,
    Cpp,
    C,
    Html,
    Css,
    Java,
    Php,
    Plaintext,
}

impl LanguageId {
    /// Languages a new file can be created with, in menu order
    pub const SELECTABLE: [LanguageId; 9] = [
        LanguageId::JavaScript,
        LanguageId::TypeScript,
        LanguageId::Python,
        LanguageId::Cpp,
        LanguageId::C,
        LanguageId::Html,
        LanguageId::Css,
        LanguageId::Java,
        LanguageId::Php,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageId::JavaScript => "javascript",
            LanguageId::TypeScript => "typescript",
            LanguageId::Python => "python",
            LanguageId::Cpp => "cpp",
            LanguageId::C => "c",
            LanguageId::Html => "html",
            LanguageId::Css => "css",
            LanguageId::Java => "java",
            LanguageId::Php => "php",
            LanguageId::Plaintext => "plaintext",
        }
    }

    /// Human readable name, as shown in the language picker
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageId::JavaScript => "JavaScript",
            LanguageId::TypeScript => "TypeScript",
            LanguageId::Python => "Python",
            LanguageId::Cpp => "C++",
            LanguageId::C => "C",
            LanguageId::Html => "HTML",
            LanguageId::Css => "CSS",
            LanguageId::Java => "Java",
            LanguageId::Php => "PHP",
            LanguageId::Plaintext => "Plain Text",
        }
    }

    /// Starter source for a freshly created file
    pub fn template(&self) -> &'static str {
        templates::template(*self)
    }

    /// Conventional file suffix, including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            LanguageId::JavaScript => ".js",
            LanguageId::TypeScript => ".ts",
            LanguageId::Python => ".py",
            LanguageId::Cpp => ".cpp",
            LanguageId::C => ".c",
            LanguageId::Html => ".html",
            LanguageId::Css => ".css",
            LanguageId::Java => ".java",
            LanguageId::Php => ".php",
            LanguageId::Plaintext => ".txt",
        }
    }

    /// Look up a language from a file suffix, with or without the leading dot
    pub fn from_extension(ext: &str) -> LanguageId {
        let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "js" | "jsx" | "mjs" | "cjs" => LanguageId::JavaScript,
            "ts" | "tsx" => LanguageId::TypeScript,
            "py" => LanguageId::Python,
            "cpp" | "cc" | "cxx" | "hpp" => LanguageId::Cpp,
            "c" | "h" => LanguageId::C,
            "html" | "htm" => LanguageId::Html,
            "css" => LanguageId::Css,
            "java" => LanguageId::Java,
            "php" => LanguageId::Php,
            _ => LanguageId::Plaintext,
        }
    }

    /// Language of a file, judged by the suffix after its last dot
    pub fn from_file_name(name: &str) -> LanguageId {
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => LanguageId::from_extension(ext),
            _ => LanguageId::Plaintext,
        }
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageId {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "javascript" | "js" => Ok(Self::JavaScript),
            "typescript" | "ts" => Ok(Self::TypeScript),
            "python" | "py" => Ok(Self::Python),
            "cpp" | "c++" => Ok(Self::Cpp),
            "c" => Ok(Self::C),
            "html" => Ok(Self::Html),
            "css" => Ok(Self::Css),
            "java" => Ok(Self::Java),
            "php" => Ok(Self::Php),
            "plaintext" | "text" => Ok(Self::Plaintext),
            other => Err(eyre::eyre!("invalid language {other}")),
        }
    }
}
