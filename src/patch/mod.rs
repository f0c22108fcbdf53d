//! Patch directive builder.
//!
//! Converts resolved dependency specs and their located directories
//! into grouped `[patch."<url>"]` blocks with literal TOML formatting.
//!
//! Grouping is keyed by the raw source URL string as written in the
//! manifest, not by the `(url, branch)` materialization identity. Two
//! specs sharing a URL but pinned to different branches therefore
//! collapse into one output group even though they were resolved from
//! two distinct clones. Downstream consumers rely on this grouping, so
//! it is preserved as-is.
//!
//! Order is first-discovery order throughout: across groups and within
//! a group.

use std::path::Path;

use crate::manifest::GitDependency;

/// One output group: a raw source URL and its override lines.
#[derive(Debug)]
struct PatchGroup {
    url: String,
    lines: Vec<String>,
}

/// The terminal, write-once output of a run: grouped override
/// directives, built in discovery order and rendered as literal TOML.
#[derive(Debug, Default)]
pub struct PatchSet {
    groups: Vec<PatchGroup>,
}

impl PatchSet {
    /// Create an empty patch set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the override line for one resolved dependency.
    ///
    /// The line's first field is always the local path; every extra
    /// field of the original entry follows in document order, rendered
    /// with type-preserving literal formatting.
    pub fn insert(&mut self, dep: &GitDependency, local_dir: &Path) {
        let line = render_line(dep, local_dir);

        match self.groups.iter_mut().find(|group| group.url == dep.url) {
            Some(group) => group.lines.push(line),
            None => self.groups.push(PatchGroup {
                url: dep.url.clone(),
                lines: vec![line],
            }),
        }
    }

    /// Whether any override line has been added.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of `[patch]` groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Render the final patch text: one `[patch."<url>"]` block per
    /// group, a blank line after each block.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for group in &self.groups {
            out.push_str(&format!("[patch.\"{}\"]\n", group.url));
            for line in &group.lines {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }
}

/// Render one override line: `name = { path = "...", extras... }`.
fn render_line(dep: &GitDependency, local_dir: &Path) -> String {
    let mut fields = vec![format!("path = \"{}\"", local_dir.display())];
    for (key, value) in &dep.extra {
        fields.push(format!("{key} = {value}"));
    }
    format!("{} = {{ {} }}", dep.name, fields.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Scalar;
    use std::path::PathBuf;

    fn dep(name: &str, url: &str, branch: &str) -> GitDependency {
        GitDependency {
            name: name.to_string(),
            url: url.to_string(),
            branch: branch.to_string(),
            package: None,
            extra: Vec::new(),
        }
    }

    #[test]
    fn test_single_dependency_block() {
        let mut patch = PatchSet::new();
        let mut spec = dep("pallet-foo", "https://example.com/x/y", "dev");
        spec.package = Some("foo-crate".to_string());
        patch.insert(&spec, &PathBuf::from("/cache/example_com_x_y_dev/crates/foo-crate"));

        assert_eq!(
            patch.render(),
            "[patch.\"https://example.com/x/y\"]\n\
             pallet-foo = { path = \"/cache/example_com_x_y_dev/crates/foo-crate\" }\n\n"
        );
    }

    #[test]
    fn test_extra_fields_render_with_literal_types() {
        let mut spec = dep("dep", "https://example.com/x", "master");
        spec.extra = vec![
            ("registry".to_string(), Scalar::Str("foo".to_string())),
            ("default-features".to_string(), Scalar::Bool(false)),
            ("priority".to_string(), Scalar::Int(3)),
        ];

        let mut patch = PatchSet::new();
        patch.insert(&spec, &PathBuf::from("/p"));

        let text = patch.render();
        assert!(text.contains(
            "dep = { path = \"/p\", registry = \"foo\", default-features = false, priority = 3 }"
        ));
    }

    #[test]
    fn test_groups_keyed_by_raw_url_across_branches() {
        // Same URL, different branches: distinct materializations, but
        // one output group - the historical grouping key is the raw URL.
        let mut patch = PatchSet::new();
        patch.insert(&dep("a", "https://example.com/x", "dev"), &PathBuf::from("/p/a"));
        patch.insert(&dep("b", "https://example.com/x", "stable"), &PathBuf::from("/p/b"));

        assert_eq!(patch.group_count(), 1);
        let text = patch.render();
        assert_eq!(text.matches("[patch.").count(), 1);
        assert!(text.contains("a = { path = \"/p/a\" }\nb = { path = \"/p/b\" }"));
    }

    #[test]
    fn test_first_discovery_order_preserved() {
        let mut patch = PatchSet::new();
        patch.insert(&dep("z-dep", "https://example.com/second", "master"), &PathBuf::from("/z"));
        patch.insert(&dep("a-dep", "https://example.com/first", "master"), &PathBuf::from("/a"));
        patch.insert(&dep("m-dep", "https://example.com/second", "master"), &PathBuf::from("/m"));

        let text = patch.render();
        let second_pos = text.find("example.com/second").unwrap();
        let first_pos = text.find("example.com/first").unwrap();
        assert!(second_pos < first_pos, "groups must keep first-discovery order");

        let z_pos = text.find("z-dep").unwrap();
        let m_pos = text.find("m-dep").unwrap();
        assert!(z_pos < m_pos, "lines within a group must keep discovery order");
    }

    #[test]
    fn test_empty_patch_set_renders_nothing() {
        assert!(PatchSet::new().is_empty());
        assert_eq!(PatchSet::new().render(), "");
    }
}
