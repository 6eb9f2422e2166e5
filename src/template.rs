//! `{{placeholder}}` substitution for templated file content.

/// Values substituted into templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vars {
    /// `{{date}}`, formatted `YYYY-MM-DD`.
    pub date: String,
    /// `{{home}}`, the home directory.
    pub home: String,
    /// `{{version}}`, the owning inventory's version.
    pub version: String,
}

impl Vars {
    fn lookup(&self, key: &str) -> Option<&str> {
        match key {
            "date" => Some(&self.date),
            "home" => Some(&self.home),
            "version" => Some(&self.version),
            _ => None,
        }
    }
}

/// Replace every known `{{key}}` in `template` with its value.
///
/// Unknown placeholders and unbalanced braces are copied through verbatim,
/// so a rendered file may itself carry placeholders for other tools.
#[must_use]
pub fn render(template: &str, vars: &Vars) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let (before, after_open) = rest.split_at(start);
        out.push_str(before);
        let Some(end) = after_open.find("}}") else {
            out.push_str(after_open);
            return out;
        };
        let key = after_open.get(2..end).unwrap_or_default();
        match vars.lookup(key.trim()) {
            Some(value) => out.push_str(value),
            None => out.push_str(after_open.get(..end + 2).unwrap_or_default()),
        }
        rest = after_open.get(end + 2..).unwrap_or_default();
    }
    out.push_str(rest);
    out
}
