//! Path templates: `$$name$$` placeholder expansion and path normalization.
//!
//! A template such as `$$profile$$/Cache/` is first expanded against a
//! [`VariableSet`] (one output per combination of values), then each result is
//! normalized into an absolute path with [`normalize`].

use std::env;
use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf};
use tracing::debug;

const PLACEHOLDER_DELIMITER: &str = "$$";

/// Ordered mapping of variable name to candidate values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSet {
    vars: Vec<(String, Vec<String>)>,
}

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `values`, replacing any earlier definition in place.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<String>) {
        let name = name.into();
        if let Some(slot) = self.vars.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = values;
        } else {
            self.vars.push((name, values));
        }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.insert(name, values);
        self
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.vars
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.vars
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

fn placeholder(name: &str) -> String {
    format!("{PLACEHOLDER_DELIMITER}{name}{PLACEHOLDER_DELIMITER}")
}

/// Expands every `$$name$$` placeholder in `template` that names a variable in
/// `vars`, producing one string per combination of the referenced values.
///
/// Variables are combined in the set's own order. Placeholders for unknown
/// names are left untouched. If a referenced variable has no values the
/// template produces nothing.
pub fn expand(template: &str, vars: &VariableSet) -> Vec<String> {
    if vars.is_empty() || !template.contains(PLACEHOLDER_DELIMITER) {
        return vec![template.to_string()];
    }

    let used: Vec<(String, &[String])> = vars
        .iter()
        .map(|(name, values)| (placeholder(name), values))
        .filter(|(token, _)| template.contains(token.as_str()))
        .collect();

    if used.is_empty() {
        return vec![template.to_string()];
    }
    if used.iter().any(|(_, values)| values.is_empty()) {
        return Vec::new();
    }

    // Odometer over the value lists; the last variable varies fastest.
    let mut indices = vec![0usize; used.len()];
    let mut result = Vec::new();
    loop {
        let expanded = used
            .iter()
            .zip(&indices)
            .fold(template.to_string(), |acc, ((token, values), &i)| {
                acc.replace(token.as_str(), &values[i])
            });
        result.push(expanded);

        let mut j = used.len();
        loop {
            if j == 0 {
                return result;
            }
            j -= 1;
            if indices[j] + 1 < used[j].1.len() {
                indices[j] += 1;
                break;
            }
            indices[j] = 0;
        }
    }
}

/// Expands environment references in `input`: a leading `~`, `%NAME%`,
/// `$NAME` and `${NAME}`. Unset variables are left as written, and so is
/// anything inside a leftover `$$name$$` placeholder.
pub fn expand_env(input: &str) -> String {
    let mut rest = input;
    let mut out = String::with_capacity(input.len());

    if let Some(stripped) = rest.strip_prefix('~')
        && (stripped.is_empty() || stripped.starts_with(['/', '\\']))
        && let Some(home) = dirs::home_dir()
    {
        out.push_str(&home.to_string_lossy());
        rest = stripped;
    }

    while let Some(pos) = rest.find(['%', '$']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if tail.starts_with(PLACEHOLDER_DELIMITER) {
            // Copy the whole placeholder so its name is never read as `$NAME`.
            let end = tail[2..]
                .find(PLACEHOLDER_DELIMITER)
                .map_or(2, |close| close + 4);
            out.push_str(&tail[..end]);
            rest = &tail[end..];
            continue;
        }
        match expand_reference(tail) {
            Some((value, consumed)) => {
                out.push_str(&value);
                rest = &tail[consumed..];
            }
            None => {
                out.push_str(&tail[..1]);
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Resolves the reference at the start of `tail`, returning the value and the
/// number of bytes it spanned.
fn expand_reference(tail: &str) -> Option<(String, usize)> {
    let is_name_char = |c: char| c.is_ascii_alphanumeric() || c == '_';

    if let Some(body) = tail.strip_prefix('%') {
        let end = body.find('%')?;
        let name = &body[..end];
        if name.is_empty() || !name.chars().all(|c| is_name_char(c) || "()".contains(c)) {
            return None;
        }
        return env::var(name).ok().map(|v| (v, end + 2));
    }

    let body = tail.strip_prefix('$')?;
    if let Some(braced) = body.strip_prefix('{') {
        let end = braced.find('}')?;
        let name = &braced[..end];
        if name.is_empty() || !name.chars().all(is_name_char) {
            return None;
        }
        return env::var(name).ok().map(|v| (v, end + 3));
    }

    let end = body.find(|c: char| !is_name_char(c)).unwrap_or(body.len());
    let name = &body[..end];
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    env::var(name).ok().map(|v| (v, end + 1))
}

/// Turns a substituted template into an absolute, separator-normalized path.
///
/// `.` and `..` are folded lexically; nothing on disk is consulted except the
/// current directory for relative input. Returns `None` when the input is
/// empty or cannot be made absolute.
pub fn normalize(input: &str) -> Option<PathBuf> {
    let expanded = expand_env(input);
    if expanded.trim().is_empty() {
        return None;
    }

    let separated = expanded.replace('/', &MAIN_SEPARATOR.to_string());
    let absolute = match std::path::absolute(Path::new(&separated)) {
        Ok(path) => path,
        Err(err) => {
            debug!(path = %separated, %err, "dropping unresolvable path");
            return None;
        }
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never climb above the root.
                if normalized.parent().is_some() {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized.is_absolute().then_some(normalized)
}

/// Expands `template` against `vars` and normalizes every result, dropping
/// candidates that fail to normalize.
pub fn resolve(template: &str, vars: &VariableSet) -> Vec<PathBuf> {
    expand(template, vars)
        .iter()
        .filter_map(|candidate| normalize(candidate))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn template_without_known_placeholders_is_unchanged() {
        let vars = VariableSet::new().with("base", values(&["/b"]));

        assert_eq!(expand("/plain/path", &vars), vec!["/plain/path"]);
        assert_eq!(expand("$$other$$/x", &vars), vec!["$$other$$/x"]);
        assert_eq!(
            expand("$$base$$/x", &VariableSet::new()),
            vec!["$$base$$/x"]
        );
    }

    #[test]
    fn empty_value_list_yields_nothing() {
        let vars = VariableSet::new()
            .with("base", values(&["/b"]))
            .with("profile", Vec::new());

        assert!(expand("$$profile$$/Cache", &vars).is_empty());
        assert!(expand("$$base$$/$$profile$$", &vars).is_empty());
        // An unreferenced empty variable does not matter.
        assert_eq!(expand("$$base$$/x", &vars), vec!["/b/x"]);
    }

    #[test]
    fn cartesian_cardinality_and_substitution() {
        let vars = VariableSet::new()
            .with("a", values(&["1", "2"]))
            .with("b", values(&["x", "y", "z"]))
            .with("unused", values(&["u1", "u2"]));

        let out = expand("$$b$$-$$a$$-$$a$$", &vars);
        assert_eq!(out.len(), 6);
        assert!(out.iter().all(|s| !s.contains("$$")));
        // Set order: `a` varies slowest.
        assert_eq!(
            out,
            vec!["x-1-1", "y-1-1", "z-1-1", "x-2-2", "y-2-2", "z-2-2"]
        );
    }

    #[test]
    fn variable_insert_replaces_in_place() {
        let mut vars = VariableSet::new()
            .with("base", values(&["one"]))
            .with("profile", values(&["p"]));
        vars.insert("base", values(&["two"]));

        let names: Vec<&str> = vars.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["base", "profile"]);
        assert_eq!(vars.get("base"), Some(values(&["two"]).as_slice()));
    }

    #[test]
    fn env_references_expand() {
        let path = env::var("PATH").expect("PATH is set in test environments");

        assert_eq!(expand_env("%PATH%/a"), format!("{path}/a"));
        assert_eq!(expand_env("$PATH/a"), format!("{path}/a"));
        assert_eq!(expand_env("${PATH}x"), format!("{path}x"));
        assert_eq!(
            expand_env("%CACHESWEEP_SURELY_UNSET_VAR%/a"),
            "%CACHESWEEP_SURELY_UNSET_VAR%/a"
        );
        assert_eq!(expand_env("$$profile$$"), "$$profile$$");
        // A leftover placeholder naming a set variable stays intact.
        assert_eq!(expand_env("$$PATH$$/x"), "$$PATH$$/x");
        assert_eq!(expand_env("$$PATH$$/$PATH"), format!("$$PATH$$/{path}"));
        assert_eq!(expand_env("100% done"), "100% done");
    }

    #[test]
    fn normalize_folds_dots_and_is_absolute() {
        let root = std::env::temp_dir();
        let input = format!("{}/a/./b/../c/", root.display());

        let normalized = normalize(&input).expect("absolute path");
        assert!(normalized.is_absolute());
        assert_eq!(normalized, root.join("a").join("c"));
    }

    #[test]
    fn normalize_rejects_empty() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   "), None);
    }

    #[test]
    fn normalize_makes_relative_absolute() {
        let normalized = normalize("relative/dir").expect("cwd available");
        assert!(normalized.is_absolute());
        assert!(normalized.ends_with(Path::new("relative").join("dir")));
    }
}
