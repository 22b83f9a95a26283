//! Static table of supported languages and their comment syntax.

use std::path::Path;

/// Open/close delimiter pair, used for block comments and markup region tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub open: &'static str,
    pub close: &'static str,
}

impl Delimiters {
    const fn new(open: &'static str, close: &'static str) -> Self {
        Self { open, close }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct LanguageSyntax {
    pub name: &'static str,
    /// Lowercase, including the leading dot.
    pub extensions: &'static [&'static str],
    pub single_line: &'static [&'static str],
    pub block_comment: Option<Delimiters>,
    /// Region tag pairs for markup files that embed several sub-languages.
    /// Empty for plain languages.
    pub region_tags: &'static [Delimiters],
}

const C_BLOCK: Option<Delimiters> = Some(Delimiters::new("/*", "*/"));

pub static LANGUAGES: &[LanguageSyntax] = &[
    LanguageSyntax {
        name: "Python",
        extensions: &[".py"],
        single_line: &["#"],
        block_comment: None,
        region_tags: &[],
    },
    LanguageSyntax {
        name: "JavaScript",
        extensions: &[".js"],
        single_line: &["//"],
        block_comment: C_BLOCK,
        region_tags: &[],
    },
    LanguageSyntax {
        name: "TypeScript",
        extensions: &[".ts", ".tsx"],
        single_line: &["//"],
        block_comment: C_BLOCK,
        region_tags: &[],
    },
    LanguageSyntax {
        name: "Java",
        extensions: &[".java"],
        single_line: &["//"],
        block_comment: C_BLOCK,
        region_tags: &[],
    },
    LanguageSyntax {
        name: "C/C++",
        extensions: &[".c", ".h", ".cpp", ".hpp", ".cc"],
        single_line: &["//"],
        block_comment: C_BLOCK,
        region_tags: &[],
    },
    LanguageSyntax {
        name: "Solidity",
        extensions: &[".sol"],
        single_line: &["//"],
        block_comment: C_BLOCK,
        region_tags: &[],
    },
    LanguageSyntax {
        name: "Vue",
        extensions: &[".vue"],
        single_line: &["//"],
        block_comment: C_BLOCK,
        region_tags: &[
            Delimiters::new("<template>", "</template>"),
            Delimiters::new("<script>", "</script>"),
            Delimiters::new("<style>", "</style>"),
        ],
    },
];

/// Look up a language by dotted extension (`".py"`), ignoring case.
/// Returns `None` for anything unregistered, including an undotted extension.
pub fn resolve(extension: &str) -> Option<&'static LanguageSyntax> {
    if !extension.starts_with('.') {
        return None;
    }
    let lower = extension.to_lowercase();
    LANGUAGES
        .iter()
        .find(|lang| lang.extensions.iter().any(|ext| *ext == lower))
}

/// Resolve the language of a path from the extension of its final component.
pub fn resolve_path(path: &Path) -> Option<&'static LanguageSyntax> {
    let ext = path.extension()?.to_str()?;
    resolve(&format!(".{ext}"))
}
