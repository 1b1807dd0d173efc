/// Editor language for a file name, by extension. Unknown extensions are
/// plain text.
pub fn language_for(file_name: &str) -> &'static str {
    let ext = match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return "plaintext",
    };
    match ext.as_str() {
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "py" => "python",
        "go" => "go",
        "html" => "html",
        "css" => "css",
        "scss" => "scss",
        "less" => "less",
        "json" => "json",
        "md" => "markdown",
        "txt" => "plaintext",
        "xml" => "xml",
        "yaml" | "yml" => "yaml",
        "sql" => "sql",
        "sh" | "bash" => "shell",
        "java" => "java",
        "c" | "h" => "c",
        "cpp" | "hpp" => "cpp",
        "rs" => "rust",
        "rb" => "ruby",
        "php" => "php",
        _ => "plaintext",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn lang(value: &'static str, label: &'static str) -> LanguageOption {
    LanguageOption { value, label }
}

/// Languages selectable from the status bar.
pub const LANGUAGES: &[LanguageOption] = &[
    lang("plaintext", "Plain Text"),
    lang("javascript", "JavaScript"),
    lang("typescript", "TypeScript"),
    lang("python", "Python"),
    lang("go", "Go"),
    lang("rust", "Rust"),
    lang("java", "Java"),
    lang("c", "C"),
    lang("cpp", "C++"),
    lang("csharp", "C#"),
    lang("php", "PHP"),
    lang("ruby", "Ruby"),
    lang("swift", "Swift"),
    lang("kotlin", "Kotlin"),
    lang("html", "HTML"),
    lang("css", "CSS"),
    lang("scss", "SCSS"),
    lang("less", "Less"),
    lang("json", "JSON"),
    lang("xml", "XML"),
    lang("markdown", "Markdown"),
    lang("yaml", "YAML"),
    lang("sql", "SQL"),
    lang("shell", "Shell"),
    lang("dockerfile", "Dockerfile"),
];

pub fn language_label(value: &str) -> Option<&'static str> {
    LANGUAGES.iter().find(|l| l.value == value).map(|l| l.label)
}
