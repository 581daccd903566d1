//! Generate canonical `apierrors` values from an error catalog.
//!
//! Each catalog value becomes a lazily built canonical error, an accessor
//! returning a copy of it, an `is_*` matcher, and one line in a `register`
//! function that fills an `apierrors::Registry`.

pub mod config;

use std::collections::HashSet;
use std::fmt::Write;
use std::path::Path;

use anyhow::{Result, bail};

use config::Catalog;

/// A resolved catalog value, ready to render.
#[derive(Debug, Clone)]
pub struct ErrorEntry {
    pub enum_name: String,
    /// The reason key; the catalog value name, verbatim.
    pub reason: String,
    pub number: Option<i32>,
    pub code: i32,
    pub pretty: String,
    pub message: String,
    pub comment: Option<String>,
    pub fn_name: String,
    pub static_name: String,
}

/// Options that shape the rendered module.
#[derive(Debug, Clone)]
pub struct GenOptions {
    /// Path of the runtime crate in the generated code.
    pub crate_path: String,
    /// Catalog name shown in the header.
    pub source: Option<String>,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            crate_path: "apierrors".to_string(),
            source: None,
        }
    }
}

/// All entries of a catalog, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct ErrorSet {
    pub entries: Vec<ErrorEntry>,
}

impl ErrorSet {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the set as a Rust module.
    pub fn render(&self, opts: &GenOptions) -> String {
        let mut out = String::new();
        out.push_str("// Code generated by apierrors-gen. DO NOT EDIT.\n");
        if let Some(source) = &opts.source {
            let _ = writeln!(out, "// source: {source}");
        }
        out.push('\n');
        out.push_str("use std::sync::LazyLock;\n\n");
        let _ = writeln!(out, "use {}::{{Error, Registry}};", opts.crate_path);

        let mut current_enum: Option<&str> = None;
        for entry in &self.entries {
            if current_enum != Some(entry.enum_name.as_str()) {
                let _ = writeln!(out, "\n// {}", entry.enum_name);
                current_enum = Some(&entry.enum_name);
            }
            render_static(&mut out, entry);
        }

        for entry in &self.entries {
            out.push('\n');
            render_accessors(&mut out, entry);
        }

        out.push('\n');
        out.push_str("/// Register every canonical error of this catalog.\n");
        out.push_str("pub fn register(registry: &mut Registry) {\n");
        for entry in &self.entries {
            let _ = writeln!(out, "    registry.register({}());", entry.fn_name);
        }
        out.push_str("}\n");
        out
    }
}

fn render_static(out: &mut String, entry: &ErrorEntry) {
    let _ = writeln!(
        out,
        "static {}: LazyLock<Error> = LazyLock::new(|| {{\n    Error::new({}, {:?}, {:?}, {:?})\n}});",
        entry.static_name, entry.code, entry.reason, entry.message, entry.pretty
    );
}

fn render_accessors(out: &mut String, entry: &ErrorEntry) {
    if let Some(comment) = &entry.comment {
        for line in comment.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                out.push_str("///\n");
            } else {
                let _ = writeln!(out, "/// {line}");
            }
        }
    }
    let _ = writeln!(
        out,
        "pub fn {}() -> Error {{\n    {}.clone()\n}}\n",
        entry.fn_name, entry.static_name
    );
    let _ = writeln!(out, "/// Whether `err` is, or wraps, a `{}` error.", entry.reason);
    let _ = writeln!(
        out,
        "pub fn is_{}(err: &(dyn std::error::Error + 'static)) -> bool {{\n    {}.is(err)\n}}",
        entry.fn_name.trim_end_matches('_'),
        entry.static_name
    );
}

/// Resolve and validate a catalog.
pub fn generate(catalog: &Catalog) -> Result<ErrorSet> {
    let mut set = ErrorSet::default();
    let mut idents: HashSet<String> = HashSet::from(["register".to_string()]);

    for owner in &catalog.enums {
        let default_code = owner.default_code()?;
        for value in &owner.values {
            let Some(entry) = value.to_entry(owner, default_code)? else {
                tracing::warn!(
                    value = %format!("{}.{}", owner.name, value.name),
                    "no code and no default_code, skipped"
                );
                continue;
            };

            let matcher = format!("is_{}", entry.fn_name.trim_end_matches('_'));
            for ident in [&entry.fn_name, &matcher] {
                if !idents.insert(ident.clone()) {
                    bail!(
                        "{}.{}: generated name '{}' is already taken",
                        owner.name,
                        value.name,
                        ident
                    );
                }
            }
            tracing::debug!(reason = %entry.reason, code = entry.code, "error entry");
            set.entries.push(entry);
        }
    }

    Ok(set)
}

/// Generate a module from a catalog file. `None` when the catalog yields
/// no errors.
pub fn generate_errors(catalog_path: &Path, opts: &GenOptions) -> Result<Option<String>> {
    let catalog = Catalog::from_path(catalog_path)?;
    let set = generate(&catalog)?;
    if set.is_empty() {
        return Ok(None);
    }
    Ok(Some(set.render(opts)))
}

/// Generate a module from catalog TOML text.
pub fn generate_errors_from_str(catalog_toml: &str, opts: &GenOptions) -> Result<Option<String>> {
    let catalog = Catalog::from_toml_str(catalog_toml)?;
    let set = generate(&catalog)?;
    if set.is_empty() {
        return Ok(None);
    }
    Ok(Some(set.render(opts)))
}

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// `USER_NOT_FOUND`, `UserNotFound` and `user-not-found` all become
/// `user_not_found`. Keywords get a trailing underscore.
pub(crate) fn to_snake_case(name: &str) -> Result<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_ascii_alphanumeric() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if ch.is_ascii_uppercase() && i > 0 && !out.ends_with('_') {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_ascii_lowercase());
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.push(ch.to_ascii_lowercase());
    }

    let mut ident = out.trim_end_matches('_').to_string();
    if ident.is_empty() {
        bail!("'{name}' has no ASCII letters or digits");
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert_str(0, "e_");
    }
    if KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    }
    Ok(ident)
}
