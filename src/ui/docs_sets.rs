// Display names for docs-set project badges

const DOCS_SET_DISPLAY_NAMES: &[(&str, &str)] = &[
    ("atlas", "Atlas"),
    ("atlas-cli", "Atlas CLI"),
    ("c", "C Driver"),
    ("cpp-driver", "C++ Driver"),
    ("csharp", "C#/.NET Driver"),
    ("docs", "MongoDB Server"),
    ("golang", "Go Driver"),
    ("java", "Java Sync Driver"),
    ("java-rs", "Java Reactive Streams Driver"),
    ("kotlin", "Kotlin Coroutine Driver"),
    ("kotlin-sync", "Kotlin Sync Driver"),
    ("laravel-mongodb", "Laravel MongoDB"),
    ("mongoid", "Mongoid"),
    ("node", "Node.js Driver"),
    ("php-library", "PHP Library"),
    ("pymongo", "PyMongo"),
    ("pymongo-arrow", "PyMongoArrow"),
    ("ruby-driver", "Ruby Driver"),
    ("rust", "Rust Driver"),
    ("scala", "Scala Driver"),
];

/// Badge text for a project name, case-insensitive, falling back to the name itself.
pub fn display_name(project: &str) -> &str {
    DOCS_SET_DISPLAY_NAMES
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(project))
        .map_or(project, |&(_, name)| name)
}

/// Language tag used for code display; placeholder tags fall back to javascript.
pub fn display_language(language: &str) -> &str {
    match language {
        "undefined" | "text" => "javascript",
        other => other,
    }
}
