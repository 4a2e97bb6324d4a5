//! Identifier and path conventions shared by the builder and the emitter.

/// Public interface name for a message or service (`Item` → `IItem`).
pub fn interface_name(name: &str) -> String {
    format!("I{name}")
}

/// JSON-shape interface name for a message (`Item` → `IItemJSON`).
pub fn json_interface_name(name: &str) -> String {
    format!("I{name}JSON")
}

/// Accessor name for a field: `_` separates words, the first word is kept
/// as-is and each later word gets an upper-case first letter.
pub fn camel_case(name: &str) -> String {
    let mut parts = name.split('_');
    let mut out = parts.next().unwrap_or_default().to_string();
    for part in parts {
        out.push_str(&upper_first(part));
    }
    out
}

/// Client method name for an RPC (`GetItem` → `getItem`).
pub fn method_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Fully-qualified schema name for `local` declared in `package`.
///
/// `local` may itself be dotted for nested declarations (`Order.Status`).
pub fn qualify(package: &str, local: &str) -> String {
    if package.is_empty() {
        format!(".{local}")
    } else {
        format!(".{package}.{local}")
    }
}

/// Output identifier for a schema-local path: nested segments are joined
/// with `_` (`Order.Status` → `Order_Status`).
pub fn flatten_local(local: &str) -> String {
    local.replace('.', "_")
}

/// Best-effort output identifier for a fully-qualified name whose package is
/// unknown. Package segments are assumed to start with a lower-case letter.
pub fn guess_local_name(fq_name: &str) -> String {
    let segments: Vec<&str> = fq_name
        .trim_start_matches('.')
        .split('.')
        .filter(|s| !s.is_empty())
        .collect();
    let first_type = segments
        .iter()
        .position(|s| !s.starts_with(|c: char| c.is_ascii_lowercase()));
    match first_type {
        Some(i) => segments[i..].join("_"),
        None => segments.last().copied().unwrap_or_default().to_string(),
    }
}

/// Output directory for a package (`shop.v1` → `shop/v1`, empty for none).
pub fn package_dir(package: &str) -> String {
    package
        .split('.')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Base name of a schema file without directory or extension.
pub fn file_stem(file_name: &str) -> &str {
    let base = file_name.rsplit('/').next().unwrap_or(file_name);
    match base.rfind('.') {
        Some(i) if i > 0 => &base[..i],
        _ => base,
    }
}

/// Output path for a schema file (`shop/v1/item.ts`).
pub fn output_path(package: &str, file_name: &str, extension: &str) -> String {
    let dir = package_dir(package);
    let file = format!("{}.{}", file_stem(file_name), extension);
    if dir.is_empty() {
        file
    } else {
        format!("{dir}/{file}")
    }
}

/// Prefix that reaches the output root from a package directory
/// (`shop.v1` → `../../`, no package → `./`).
pub fn relative_import_base(package: &str) -> String {
    let depth = package.split('.').filter(|s| !s.is_empty()).count();
    if depth == 0 {
        "./".to_string()
    } else {
        "../".repeat(depth)
    }
}

/// Module specifier that imports `to` from `from`, both output paths.
///
/// The extension of `to` is dropped (`shop/v1/item.ts` importing
/// `common/money.ts` gives `../../common/money`).
pub fn relative_module(from: &str, to: &str) -> String {
    let from_dir: Vec<&str> = match from.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    let to_parts: Vec<&str> = to.split('/').collect();
    let (to_dir, to_file) = to_parts.split_at(to_parts.len() - 1);

    let common = from_dir
        .iter()
        .zip(to_dir)
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = if from_dir.len() == common {
        "./".to_string()
    } else {
        "../".repeat(from_dir.len() - common)
    };
    for part in &to_dir[common..] {
        out.push_str(part);
        out.push('/');
    }
    out.push_str(file_stem(to_file[0]));
    out
}
