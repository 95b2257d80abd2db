//! The path matcher trie.
//!
//! A [`PathMatcher`] aggregates path patterns in a prefix tree keyed by path components. Each
//! edge is a literal name, a glob [`Pattern`](crate::Pattern) or the ellipsis component `...`
//! which stands for any number of components. A node flagged as terminal marks the end of one
//! registered pattern; interior nodes exist only while something below them is terminal.

use std::collections::BTreeMap;
use std::fmt;

use bitflags::bitflags;

use crate::pattern::{contains_wildcards, Pattern};

/// The component matching any number of components, including none.
pub const ELLIPSIS: &str = "...";

bitflags! {
    /// The result of matching a path against a [`PathMatcher`].
    ///
    /// Several flags can be set at once: with the patterns `/a` and `/a/b/c` registered, the path
    /// `/a/b` is below one match and above another, so it reports both `ANCESTOR_MATCH` and
    /// `DESCENDANT_MATCH`.
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub struct MatchResult: u8 {
        /// A registered pattern matches this very path.
        const EXACT_MATCH      = 0x01;

        /// A registered pattern matches a path strictly below this one.
        const DESCENDANT_MATCH = 0x02;

        /// A registered pattern matches a strict ancestor of this path.
        const ANCESTOR_MATCH   = 0x04;
    }
}

impl MatchResult {
    /// The empty result: no registered pattern relates to the path at all.
    pub const NO_MATCH: Self = Self::empty();

    pub fn is_no_match(self) -> bool {
        self.is_empty()
    }
}

/// Split a path string into its components.
///
/// Splitting is the tokenizing kind: empty components collapse, so `/a//b` equals `/a/b` and a
/// missing leading slash is tolerated. `/` yields no components (the root). The empty string is
/// not a path at all and yields `None`.
fn components(path: &str) -> Option<Vec<&str>> {
    if path.is_empty() {
        return None;
    }
    Some(path.split('/').filter(|c| !c.is_empty()).collect())
}

/// Join components back into a path string. No components is the root, `/`.
fn path_string(components: &[&str]) -> String {
    if components.is_empty() {
        return String::from("/");
    }
    let mut out = String::new();
    for component in components {
        out.push('/');
        out.push_str(component);
    }
    out
}

/// One node of the pattern trie.
///
/// Children are stored per edge kind, in the canonical enumeration order: literals first, then
/// wildcard patterns, then the ellipsis, each group ordered by token text. This keeps `paths()`
/// deterministic and lets both literal and wildcard children be looked up by `&str` without
/// allocating.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Node {
    terminal: bool,
    literals: BTreeMap<String, Node>,
    wildcards: BTreeMap<Pattern, Node>,
    ellipsis: Option<Box<Node>>,
}

impl Node {
    fn has_children(&self) -> bool {
        !self.literals.is_empty() || !self.wildcards.is_empty() || self.ellipsis.is_some()
    }

    /// A node which is not terminal and has no children carries no information and must not
    /// persist in the trie.
    fn is_dead(&self) -> bool {
        !self.terminal && !self.has_children()
    }

    /// Look up the child for a component by structural identity (not by glob matching).
    fn child_mut(&mut self, component: &str) -> Option<&mut Node> {
        if component == ELLIPSIS {
            self.ellipsis.as_deref_mut()
        } else if contains_wildcards(component) {
            self.wildcards.get_mut(component)
        } else {
            self.literals.get_mut(component)
        }
    }

    fn child(&self, component: &str) -> Option<&Node> {
        if component == ELLIPSIS {
            self.ellipsis.as_deref()
        } else if contains_wildcards(component) {
            self.wildcards.get(component)
        } else {
            self.literals.get(component)
        }
    }

    /// Get or create the child for a component, classifying the component into its edge kind.
    fn make_child(&mut self, component: &str) -> &mut Node {
        if component == ELLIPSIS {
            self.ellipsis.get_or_insert_with(Default::default)
        } else if contains_wildcards(component) {
            self.wildcards
                .entry(Pattern::lossy(component))
                .or_default()
        } else {
            self.literals.entry(component.to_owned()).or_default()
        }
    }

    /// Remove the child for a component along with its whole subtree. Returns whether a child
    /// existed there.
    fn remove_child(&mut self, component: &str) -> bool {
        if component == ELLIPSIS {
            self.ellipsis.take().is_some()
        } else if contains_wildcards(component) {
            self.wildcards.remove(component).is_some()
        } else {
            self.literals.remove(component).is_some()
        }
    }
}

const ALL_MATCHES: MatchResult = MatchResult::all();

/// Accumulate match flags for `path` over every trie branch which can apply at each depth: the
/// literal child, every wildcard child whose glob matches the component, and the ellipsis child
/// matched against every suffix of the remaining path (consuming zero components up to all of
/// them). Different branches contribute different flags, so the search only stops early once
/// every flag has been found.
fn match_walk(node: &Node, path: &[&str], result: &mut MatchResult) {
    let Some((head, rest)) = path.split_first() else {
        // We've matched to the end of the path.
        if node.terminal {
            *result |= MatchResult::EXACT_MATCH;
        }
        if node.has_children() {
            *result |= MatchResult::DESCENDANT_MATCH;
        }
        if let Some(ellipsis) = &node.ellipsis {
            if ellipsis.terminal {
                // A trailing `...` also matches the path it is anchored to.
                *result |= MatchResult::EXACT_MATCH;
            }
        }
        return;
    };

    // There are path components left to match, so a pattern ending here matches an ancestor.
    if node.terminal {
        *result |= MatchResult::ANCESTOR_MATCH;
    }

    if let Some(child) = node.literals.get(*head) {
        match_walk(child, rest, result);
        if *result == ALL_MATCHES {
            return;
        }
    }

    for (pattern, child) in &node.wildcards {
        if pattern.matches(head) {
            match_walk(child, rest, result);
            if *result == ALL_MATCHES {
                return;
            }
        }
    }

    if let Some(ellipsis) = &node.ellipsis {
        // The ellipsis matches arbitrary components, so registered patterns exist below every
        // path passing through here; if it is itself terminal it matches this whole path and all
        // of its ancestors back to its anchor as well.
        *result |= MatchResult::DESCENDANT_MATCH;
        if ellipsis.terminal {
            *result |= MatchResult::EXACT_MATCH | MatchResult::ANCESTOR_MATCH;
        }

        let mut remainder = path;
        loop {
            match_walk(ellipsis, remainder, result);
            if *result == ALL_MATCHES {
                return;
            }
            match remainder.split_first() {
                Some((_, rest)) => remainder = rest,
                None => break,
            }
        }
    }
}

/// Merge `src` into `dst` in lockstep. Returns whether `dst` changed.
fn merge_from(dst: &mut Node, src: &Node) -> bool {
    let mut changed = src.terminal && !dst.terminal;
    dst.terminal |= src.terminal;

    for (name, src_child) in &src.literals {
        let dst_child = dst.literals.entry(name.clone()).or_default();
        changed |= merge_from(dst_child, src_child);
    }
    for (pattern, src_child) in &src.wildcards {
        let dst_child = dst.wildcards.entry(pattern.clone()).or_default();
        changed |= merge_from(dst_child, src_child);
    }
    if let Some(src_child) = &src.ellipsis {
        let dst_child = dst.ellipsis.get_or_insert_with(Default::default);
        changed |= merge_from(dst_child, src_child);
    }

    changed
}

/// Remove every pattern of `src` from `dst` in lockstep, pruning nodes which die in the process.
/// Returns whether anything was removed.
fn unmerge_from(dst: &mut Node, src: &Node) -> bool {
    let mut removed = src.terminal && dst.terminal;
    if src.terminal {
        dst.terminal = false;
    }

    for (name, src_child) in &src.literals {
        if let Some(dst_child) = dst.literals.get_mut(name) {
            removed |= unmerge_from(dst_child, src_child);
            if dst_child.is_dead() {
                dst.literals.remove(name);
            }
        }
    }
    for (pattern, src_child) in &src.wildcards {
        if let Some(dst_child) = dst.wildcards.get_mut(pattern) {
            removed |= unmerge_from(dst_child, src_child);
            if dst_child.is_dead() {
                dst.wildcards.remove(pattern);
            }
        }
    }
    if let Some(src_child) = &src.ellipsis {
        if let Some(dst_child) = &mut dst.ellipsis {
            removed |= unmerge_from(dst_child, src_child);
            if dst_child.is_dead() {
                dst.ellipsis = None;
            }
        }
    }

    removed
}

fn collect_paths<'a>(node: &'a Node, prefix: &mut Vec<&'a str>, out: &mut Vec<String>) {
    if node.terminal {
        out.push(path_string(prefix));
    }
    for (name, child) in &node.literals {
        prefix.push(name);
        collect_paths(child, prefix, out);
        prefix.pop();
    }
    for (pattern, child) in &node.wildcards {
        prefix.push(pattern.text());
        collect_paths(child, prefix, out);
        prefix.pop();
    }
    if let Some(child) = &node.ellipsis {
        prefix.push(ELLIPSIS);
        collect_paths(child, prefix, out);
        prefix.pop();
    }
}

/// A set of path patterns aggregated in a trie for matching against concrete paths.
///
/// Paths are `/`-separated strings of opaque, case-sensitive components. A pattern component may
/// be a glob (`*`, `?`, `[...]`, see [`Pattern`](crate::Pattern)) matching a single component, or
/// the ellipsis `...` matching any number of components. [`matches`](PathMatcher::matches)
/// classifies a concrete path against the whole set at once as a [`MatchResult`] flag set.
///
/// Cloning is deep: a clone and its source can be mutated independently.
///
/// Two matchers compare equal when they hold exactly the same pattern set, independent of
/// insertion order. Equality is over pattern text, not match behavior: `/a` and `/[a]` match the
/// same paths but are different patterns.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct PathMatcher {
    root: Node,
}

impl PathMatcher {
    /// Create an empty matcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether no pattern at all is registered.
    pub fn is_empty(&self) -> bool {
        // Interior nodes only exist while a terminal lives below them, so an empty matcher is
        // exactly a bare, non-terminal root.
        self.root.is_dead()
    }

    /// Remove all patterns, resetting to the empty matcher.
    pub fn clear(&mut self) {
        self.root = Node::default();
    }

    /// Add a pattern path. Returns `true` if it is new, `false` if it was already registered or
    /// the path is the empty string. Adding `/` marks the root itself.
    pub fn add_path(&mut self, path: &str) -> bool {
        let Some(components) = components(path) else {
            return false;
        };

        let mut node = &mut self.root;
        for component in &components {
            node = node.make_child(component);
        }
        let added = !node.terminal;
        node.terminal = true;
        added
    }

    /// Remove a single pattern path, leaving any patterns registered below it in place. Returns
    /// `true` if the pattern was registered. Nodes which no longer carry anything are pruned on
    /// the way back out, up to (but never including) the root.
    pub fn remove_path(&mut self, path: &str) -> bool {
        let Some(components) = components(path) else {
            return false;
        };
        remove_walk(&mut self.root, &components)
    }

    /// Remove the node at `path` together with its entire subtree, dropping every pattern at or
    /// below it. Returns `true` if anything existed there. Pruning `/` clears the matcher and
    /// returns `true` if it held any pattern.
    pub fn prune(&mut self, path: &str) -> bool {
        let Some(components) = components(path) else {
            return false;
        };

        if components.is_empty() {
            let had_paths = !self.is_empty();
            self.clear();
            return had_paths;
        }

        prune_walk(&mut self.root, &components)
    }

    /// Merge every pattern of `other` into this matcher. Returns `true` if any of them was new.
    ///
    /// This walks both tries in lockstep rather than re-inserting path by path, so merging large
    /// matchers with shared structure stays proportional to the structure actually visited.
    pub fn add_paths(&mut self, other: &PathMatcher) -> bool {
        merge_from(&mut self.root, &other.root)
    }

    /// Like [`add_paths`](Self::add_paths), with every pattern of `other` re-rooted under
    /// `prefix`. `other`'s root pattern `/` becomes `prefix` itself.
    pub fn add_paths_with_prefix(&mut self, other: &PathMatcher, prefix: &str) -> bool {
        let Some(prefix_components) = components(prefix) else {
            return false;
        };

        // Only materialize the prefix chain when there is something to put beneath it.
        if other.is_empty() {
            return false;
        }

        let mut node = &mut self.root;
        for component in &prefix_components {
            node = node.make_child(component);
        }
        merge_from(node, &other.root)
    }

    /// Remove every pattern of `other` from this matcher. Returns `true` if any was registered.
    pub fn remove_paths(&mut self, other: &PathMatcher) -> bool {
        unmerge_from(&mut self.root, &other.root)
    }

    /// Classify `path` against the registered pattern set.
    ///
    /// All flags applying to the path accumulate into the result; see [`MatchResult`]. The empty
    /// string is not a path and reports [`MatchResult::NO_MATCH`].
    ///
    /// A terminal root (the registered pattern `/`) contributes `ANCESTOR_MATCH` to every query,
    /// including `/` itself, and never `EXACT_MATCH` — the root denotes the scene above all
    /// locations rather than a location of its own.
    pub fn matches(&self, path: &str) -> MatchResult {
        let Some(components) = components(path) else {
            return MatchResult::NO_MATCH;
        };

        let mut result = MatchResult::NO_MATCH;

        if components.is_empty() {
            if self.root.terminal {
                result |= MatchResult::ANCESTOR_MATCH;
            }
            if self.root.has_children() {
                result |= MatchResult::DESCENDANT_MATCH;
            }
            if let Some(ellipsis) = &self.root.ellipsis {
                if ellipsis.terminal {
                    result |= MatchResult::EXACT_MATCH;
                }
            }
            return result;
        }

        match_walk(&self.root, &components, &mut result);
        result
    }

    /// Extract the patterns at or below `path` as a new matcher rooted there, with `path`
    /// stripped as a prefix. A pattern ending exactly at `path` becomes the new matcher's root
    /// pattern `/`. Yields an empty matcher if no node exists at `path`.
    pub fn sub_tree(&self, path: &str) -> PathMatcher {
        let Some(components) = components(path) else {
            return PathMatcher::new();
        };

        let mut node = &self.root;
        for component in &components {
            match node.child(component) {
                Some(child) => node = child,
                None => return PathMatcher::new(),
            }
        }

        PathMatcher { root: node.clone() }
    }

    /// List every registered pattern as a path string, in depth-first order with literal children
    /// before wildcards before the ellipsis and each node's own pattern before its descendants.
    /// The root pattern, when registered, is listed first as `/`.
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut prefix = Vec::new();
        collect_paths(&self.root, &mut prefix, &mut out);
        out
    }
}

fn remove_walk(node: &mut Node, components: &[&str]) -> bool {
    let Some((head, rest)) = components.split_first() else {
        let was_terminal = node.terminal;
        node.terminal = false;
        return was_terminal;
    };

    let Some(child) = node.child_mut(head) else {
        return false;
    };
    let removed = remove_walk(child, rest);
    let child_died = child.is_dead();
    if removed && child_died {
        node.remove_child(head);
    }
    removed
}

fn prune_walk(node: &mut Node, components: &[&str]) -> bool {
    let (head, rest) = match components.split_first() {
        Some(split) => split,
        None => unreachable!("prune of the root is handled by the caller"),
    };

    if rest.is_empty() {
        return node.remove_child(head);
    }

    let Some(child) = node.child_mut(head) else {
        return false;
    };
    let pruned = prune_walk(child, rest);
    let child_died = child.is_dead();
    if pruned && child_died {
        node.remove_child(head);
    }
    pruned
}

impl fmt::Debug for PathMatcher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("PathMatcher").field(&self.paths()).finish()
    }
}

impl<S: AsRef<str>> Extend<S> for PathMatcher {
    fn extend<I: IntoIterator<Item = S>>(&mut self, paths: I) {
        for path in paths {
            self.add_path(path.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for PathMatcher {
    fn from_iter<I: IntoIterator<Item = S>>(paths: I) -> Self {
        let mut matcher = PathMatcher::new();
        matcher.extend(paths);
        matcher
    }
}

// A matcher's serialized form is its path list, so any serde format doubles as the
// re-parseable textual representation: deserializing what was serialized yields an equal
// matcher.

impl serde::Serialize for PathMatcher {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.paths(), serializer)
    }
}

impl<'de> serde::Deserialize<'de> for PathMatcher {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let paths = <Vec<String> as serde::Deserialize<'de>>::deserialize(deserializer)?;
        Ok(paths.iter().collect())
    }
}

#[cfg(test)]
fn matcher<I: IntoIterator<Item = &'static str>>(paths: I) -> PathMatcher {
    paths.into_iter().collect()
}

#[test]
fn test_match() {
    let m = matcher(["/a", "/red", "/b/c/d"]);

    for (path, result) in [
        ("/a", MatchResult::EXACT_MATCH),
        ("/red", MatchResult::EXACT_MATCH),
        ("/re", MatchResult::NO_MATCH),
        ("/redThing", MatchResult::NO_MATCH),
        ("/b/c/d", MatchResult::EXACT_MATCH),
        ("/c", MatchResult::NO_MATCH),
        ("/a/b", MatchResult::ANCESTOR_MATCH),
        ("/blue", MatchResult::NO_MATCH),
        ("/b/c", MatchResult::DESCENDANT_MATCH),
    ] {
        assert_eq!(m.matches(path), result, "path {:?}", path);
    }
}

#[test]
fn test_default_matcher() {
    let m = PathMatcher::new();
    assert_eq!(m.matches("/"), MatchResult::NO_MATCH);
    assert!(m.is_empty());
}

#[test]
fn test_wildcards() {
    let m = matcher([
        "/a",
        "/red*",
        "/green*Bloke*",
        "/somewhere/over/the/*",
        "/somewhere/over/the/*/skies/are/blue",
    ]);

    for (path, result) in [
        ("/a", MatchResult::EXACT_MATCH),
        ("/redBoots", MatchResult::EXACT_MATCH),
        ("/red", MatchResult::EXACT_MATCH),
        ("/redWellies", MatchResult::EXACT_MATCH),
        ("/redWellies/in/puddles", MatchResult::ANCESTOR_MATCH),
        ("/greenFatBloke", MatchResult::EXACT_MATCH),
        ("/greenBloke", MatchResult::EXACT_MATCH),
        ("/greenBlokes", MatchResult::EXACT_MATCH),
        (
            "/somewhere/over/the/rainbow",
            MatchResult::EXACT_MATCH | MatchResult::DESCENDANT_MATCH,
        ),
        ("/somewhere/over/the", MatchResult::DESCENDANT_MATCH),
        ("/somewhere/over", MatchResult::DESCENDANT_MATCH),
        ("/somewhere", MatchResult::DESCENDANT_MATCH),
        (
            "/somewhere/over/the/rainbow/skies/are/blue",
            MatchResult::EXACT_MATCH | MatchResult::ANCESTOR_MATCH,
        ),
        (
            "/somewhere/over/the/rainbow/skies/are",
            MatchResult::DESCENDANT_MATCH | MatchResult::ANCESTOR_MATCH,
        ),
        (
            "/somewhere/over/the/astonExpressway/skies/are",
            MatchResult::DESCENDANT_MATCH | MatchResult::ANCESTOR_MATCH,
        ),
        (
            "/somewhere/over/the/astonExpressway/skies/are/blue",
            MatchResult::EXACT_MATCH | MatchResult::ANCESTOR_MATCH,
        ),
        (
            "/somewhere/over/the/astonExpressway/skies/are/grey",
            MatchResult::ANCESTOR_MATCH,
        ),
    ] {
        assert_eq!(m.matches(path), result, "path {:?}", path);
    }
}

#[test]
fn test_wildcards_with_siblings() {
    let m = matcher(["/a/*/b", "/a/a*/c"]);

    assert_eq!(m.matches("/a/aThing/c"), MatchResult::EXACT_MATCH);
    assert_eq!(m.matches("/a/aThing/b"), MatchResult::EXACT_MATCH);
}

#[test]
fn test_repeated_wildcards() {
    let m = matcher(["/a/**s"]);
    assert_eq!(m.matches("/a/s"), MatchResult::EXACT_MATCH);
}

#[test]
fn test_ellipsis() {
    let m = matcher(["/a/.../b*", "/a/c"]);

    for (path, result) in [
        (
            "/a/ball",
            MatchResult::EXACT_MATCH | MatchResult::DESCENDANT_MATCH,
        ),
        (
            "/a/red/ball",
            MatchResult::EXACT_MATCH | MatchResult::DESCENDANT_MATCH,
        ),
        ("/a/red/car", MatchResult::DESCENDANT_MATCH),
        (
            "/a/big/red/ball",
            MatchResult::EXACT_MATCH | MatchResult::DESCENDANT_MATCH | MatchResult::ANCESTOR_MATCH,
        ),
        (
            "/a/lovely/shiny/bicycle",
            MatchResult::EXACT_MATCH | MatchResult::DESCENDANT_MATCH,
        ),
        (
            "/a/c",
            MatchResult::EXACT_MATCH | MatchResult::DESCENDANT_MATCH,
        ),
        ("/a/d", MatchResult::DESCENDANT_MATCH),
        ("/a/anything", MatchResult::DESCENDANT_MATCH),
        ("/a/anything/really", MatchResult::DESCENDANT_MATCH),
        ("/a/anything/at/all", MatchResult::DESCENDANT_MATCH),
        ("/b/anything/at/all", MatchResult::NO_MATCH),
    ] {
        assert_eq!(m.matches(path), result, "path {:?}", path);
    }
}

#[test]
fn test_ellipsis_with_multiple_branches() {
    let m = matcher(["/a/.../b*", "/a/.../c*"]);

    for (path, result) in [
        (
            "/a/ball",
            MatchResult::EXACT_MATCH | MatchResult::DESCENDANT_MATCH,
        ),
        (
            "/a/red/car",
            MatchResult::EXACT_MATCH | MatchResult::DESCENDANT_MATCH,
        ),
        (
            "/a/big/red/ball",
            MatchResult::EXACT_MATCH | MatchResult::DESCENDANT_MATCH | MatchResult::ANCESTOR_MATCH,
        ),
        (
            "/a/c",
            MatchResult::EXACT_MATCH | MatchResult::DESCENDANT_MATCH,
        ),
        ("/a/d", MatchResult::DESCENDANT_MATCH),
        ("/b/anything/at/all", MatchResult::NO_MATCH),
    ] {
        assert_eq!(m.matches(path), result, "path {:?}", path);
    }
}

#[test]
fn test_ellipsis_as_terminator() {
    let m = matcher(["/a/..."]);

    assert_eq!(
        m.matches("/a"),
        MatchResult::EXACT_MATCH | MatchResult::DESCENDANT_MATCH
    );
    for path in [
        "/a/ball",
        "/a/red/car",
        "/a/red/car/rolls",
        "/a/terminating/ellipsis/matches/everything/below/it",
    ] {
        assert_eq!(m.matches(path), MatchResult::all(), "path {:?}", path);
    }
}

#[test]
fn test_clone_is_deep() {
    let mut m = matcher(["/a"]);
    assert_eq!(m.matches("/a"), MatchResult::EXACT_MATCH);

    let m2 = m.clone();
    assert_eq!(m2.matches("/a"), MatchResult::EXACT_MATCH);

    m.clear();
    assert_eq!(m.matches("/a"), MatchResult::NO_MATCH);
    assert_eq!(m2.matches("/a"), MatchResult::EXACT_MATCH);
}

#[test]
fn test_add_and_remove_paths() {
    let mut m = PathMatcher::new();
    m.add_path("/a");
    m.add_path("/a/b");

    assert_eq!(
        m.matches("/a"),
        MatchResult::EXACT_MATCH | MatchResult::DESCENDANT_MATCH
    );
    assert_eq!(
        m.matches("/a/b"),
        MatchResult::EXACT_MATCH | MatchResult::ANCESTOR_MATCH
    );

    m.remove_path("/a");
    assert_eq!(m.matches("/a"), MatchResult::DESCENDANT_MATCH);
    assert_eq!(m.matches("/a/b"), MatchResult::EXACT_MATCH);

    m.remove_path("/a/b");
    assert_eq!(m.matches("/a"), MatchResult::NO_MATCH);
    assert_eq!(m.matches("/a/b"), MatchResult::NO_MATCH);
}

#[test]
fn test_remove_path_prunes_intermediate_nodes() {
    let mut m = PathMatcher::new();
    m.add_path("/a/b/c");

    assert_eq!(m.matches("/a"), MatchResult::DESCENDANT_MATCH);
    assert_eq!(m.matches("/a/b"), MatchResult::DESCENDANT_MATCH);
    assert_eq!(m.matches("/a/b/c"), MatchResult::EXACT_MATCH);

    m.remove_path("/a/b/c");

    assert_eq!(m.matches("/a"), MatchResult::NO_MATCH);
    assert_eq!(m.matches("/a/b"), MatchResult::NO_MATCH);
    assert_eq!(m.matches("/a/b/c"), MatchResult::NO_MATCH);
    assert!(m.is_empty());
}

#[test]
fn test_remove_ellipsis() {
    let mut m = PathMatcher::new();
    m.add_path("/a/.../b");

    assert_eq!(m.matches("/a"), MatchResult::DESCENDANT_MATCH);
    assert_eq!(m.matches("/a/c"), MatchResult::DESCENDANT_MATCH);
    assert_eq!(
        m.matches("/a/c/b"),
        MatchResult::EXACT_MATCH | MatchResult::DESCENDANT_MATCH
    );

    m.remove_path("/a/.../b");

    assert_eq!(m.matches("/a"), MatchResult::NO_MATCH);
    assert_eq!(m.matches("/a/c"), MatchResult::NO_MATCH);
    assert_eq!(m.matches("/a/c/b"), MatchResult::NO_MATCH);
}

#[test]
fn test_add_path_return_value() {
    let mut m = PathMatcher::new();
    assert_eq!(m.add_path("/"), true);
    assert_eq!(m.add_path("/a/b"), true);
    assert_eq!(m.add_path("/a/b"), false);
    assert_eq!(m.add_path("/a"), true);
    assert_eq!(m.add_path("/"), false);

    let mut m = PathMatcher::new();
    assert_eq!(m.add_path("/a/b/c"), true);
    assert_eq!(m.add_path("/a/b/c"), false);
    assert_eq!(m.add_path("/"), true);
    assert_eq!(m.add_path("/*"), true);
    assert_eq!(m.add_path("/*"), false);
    assert_eq!(m.add_path("/..."), true);
    assert_eq!(m.add_path("/..."), false);

    assert_eq!(m.add_path("/a/b/c/d"), true);
    assert_eq!(m.add_path("/a/b/c/d"), false);
    m.remove_path("/a/b/c/d");
    assert_eq!(m.add_path("/a/b/c/d"), true);
    assert_eq!(m.add_path("/a/b/c/d"), false);
}

#[test]
fn test_remove_path_return_value() {
    let mut m = PathMatcher::new();

    assert_eq!(m.remove_path("/"), false);
    m.add_path("/");
    assert_eq!(m.remove_path("/"), true);
    assert_eq!(m.remove_path("/"), false);

    assert_eq!(m.remove_path("/a/b/c"), false);
    m.add_path("/a/b/c");
    assert_eq!(m.remove_path("/a/b/c"), true);
    assert_eq!(m.remove_path("/a/b/c"), false);
}

#[test]
fn test_equality() {
    let mut m1 = PathMatcher::new();
    let mut m2 = PathMatcher::new();

    assert_eq!(m1, m2);

    m1.add_path("/a");
    assert_ne!(m1, m2);

    m2.add_path("/a");
    assert_eq!(m1, m2);

    m2.add_path("/a/b");
    assert_ne!(m1, m2);

    m1.add_path("/a/b");
    assert_eq!(m1, m2);

    m1.add_path("/a/b/.../c");
    assert_ne!(m1, m2);

    m2.add_path("/a/b/.../c");
    assert_eq!(m1, m2);

    m2.add_path("/c*");
    assert_ne!(m1, m2);

    m1.add_path("/c*");
    assert_eq!(m1, m2);

    // equality is over pattern text, not over the set of matched paths:
    assert_ne!(matcher(["/a"]), matcher(["/[a]"]));
}

#[test]
fn test_paths() {
    let mut m = PathMatcher::new();
    assert_eq!(m.paths(), Vec::<String>::new());

    m.add_path("/a/b");
    assert_eq!(m.paths(), ["/a/b"]);

    m.add_path("/a/.../b");
    assert_eq!(m.paths(), ["/a/b", "/a/.../b"]);

    m.remove_path("/a/.../b");
    assert_eq!(m.paths(), ["/a/b"]);

    m.add_path("/a/b/c*d*");
    assert_eq!(m.paths(), ["/a/b", "/a/b/c*d*"]);

    m.clear();
    assert_eq!(m.paths(), Vec::<String>::new());
}

#[test]
fn test_paths_ordering() {
    // literals first, then wildcards, then the ellipsis, lexicographic within each group:
    let m = matcher(["/a/...", "/a/z*", "/a/b*", "/a/zoo", "/a/apple"]);
    assert_eq!(
        m.paths(),
        ["/a/apple", "/a/zoo", "/a/b*", "/a/z*", "/a/..."]
    );
}

#[test]
fn test_multiple_match_types() {
    let m = matcher(["/a", "/a/b", "/a/b/c"]);

    for (path, result) in [
        (
            "/a",
            MatchResult::EXACT_MATCH | MatchResult::DESCENDANT_MATCH,
        ),
        ("/a/b", MatchResult::all()),
        (
            "/a/b/c",
            MatchResult::EXACT_MATCH | MatchResult::ANCESTOR_MATCH,
        ),
        ("/a/b/d", MatchResult::ANCESTOR_MATCH),
    ] {
        assert_eq!(m.matches(path), result, "path {:?}", path);
    }
}

#[test]
fn test_ancestor_match() {
    let m = matcher(["/a"]);

    assert_eq!(m.matches("/a/b"), MatchResult::ANCESTOR_MATCH);
    assert_eq!(m.matches("/a/b/c"), MatchResult::ANCESTOR_MATCH);
    assert_eq!(m.matches("/a/b/d"), MatchResult::ANCESTOR_MATCH);
    assert_eq!(m.matches("/b/d"), MatchResult::NO_MATCH);
}

#[test]
fn test_wildcard_ancestor_match() {
    let m = matcher(["/a*"]);

    assert_eq!(m.matches("/armadillo/brunches"), MatchResult::ANCESTOR_MATCH);
    assert_eq!(m.matches("/a/b/c"), MatchResult::ANCESTOR_MATCH);
    assert_eq!(m.matches("/a/b/d"), MatchResult::ANCESTOR_MATCH);
    assert_eq!(m.matches("/b/d"), MatchResult::NO_MATCH);
    assert_eq!(m.matches("/armadillo"), MatchResult::EXACT_MATCH);
}

#[test]
fn test_root_ancestor_match() {
    let m = matcher(["/"]);

    for path in ["/armadillo/brunches", "/a/b/c", "/a/b/d", "/b/d", "/armadillo"] {
        assert_eq!(m.matches(path), MatchResult::ANCESTOR_MATCH, "path {:?}", path);
    }

    // the documented root rule: the root pattern ancestor-matches even the root query itself,
    // and is never an exact match.
    assert_eq!(m.matches("/"), MatchResult::ANCESTOR_MATCH);
}

#[test]
fn test_root_query() {
    // the root is a strict ancestor of any registered pattern below it:
    let m = matcher(["/a"]);
    assert_eq!(m.matches("/"), MatchResult::DESCENDANT_MATCH);

    let m = matcher(["/", "/a"]);
    assert_eq!(
        m.matches("/"),
        MatchResult::ANCESTOR_MATCH | MatchResult::DESCENDANT_MATCH
    );

    // a terminating ellipsis directly below the root matches the root itself, like `/a/...`
    // matches `/a`:
    let m = matcher(["/..."]);
    assert_eq!(
        m.matches("/"),
        MatchResult::EXACT_MATCH | MatchResult::DESCENDANT_MATCH
    );
    assert_eq!(m.matches("/x"), MatchResult::all());
    assert_eq!(m.matches("/x/y"), MatchResult::all());
}

#[test]
fn test_strict_ordering_of_literal_and_wildcard_lookup() {
    let m = matcher(["/c", "/*b"]);
    assert_eq!(m.matches("/b"), MatchResult::EXACT_MATCH);
}

#[test]
fn test_prune() {
    let mut m = matcher([
        "/a/b/c",
        "/a/.../c",
        "/a/b/c/d",
        "/a/b/...",
        "/a",
        "/c/d",
    ]);

    assert_eq!(m.prune("/a/b"), true);
    let mut paths = m.paths();
    paths.sort();
    assert_eq!(paths, ["/a", "/a/.../c", "/c/d"]);
    assert_eq!(m.prune("/a/b"), false);

    assert_eq!(m.prune("/a"), true);
    assert_eq!(m.paths(), ["/c/d"]);
    assert_eq!(m.prune("/a"), false);

    assert_eq!(m.prune("/c/d/e"), false);
    assert_eq!(m.paths(), ["/c/d"]);
    assert_eq!(m.prune("/c/d"), true);
    assert_eq!(m.paths(), Vec::<String>::new());
    assert!(m.is_empty());
    assert_eq!(m.prune("/c/d"), false);
}

#[test]
fn test_prune_root() {
    let mut m = matcher(["/a/b", "/a", "/.../c", "/..."]);

    assert_eq!(m.prune("/"), true);
    assert_eq!(m.paths(), Vec::<String>::new());
    assert!(m.is_empty());
    assert_eq!(m.prune("/"), false);

    // and again with a single pattern which happens to be the root:
    let mut m = PathMatcher::new();
    m.add_path("/");
    assert_eq!(m.paths(), ["/"]);

    assert!(m.prune("/"));
    assert_eq!(m.paths(), Vec::<String>::new());
    assert!(m.is_empty());
}

#[test]
fn test_is_empty() {
    let mut m = PathMatcher::new();
    assert!(m.is_empty());

    m.add_path("/a");
    assert!(!m.is_empty());

    m.remove_path("/a");
    assert!(m.is_empty());

    m.add_path("/...");
    assert!(!m.is_empty());

    m.remove_path("/...");
    assert!(m.is_empty());

    m.add_path("/");
    assert!(!m.is_empty());

    m.remove_path("/");
    assert!(m.is_empty());
}

#[test]
fn test_add_paths() {
    let m1 = matcher(["/a", "/a/../b", "/b", "/b/c/d"]);
    let m2 = matcher([
        "/a/b",
        "/a/../c",
        "/b/e",
        "/b/c/d/e/f",
        "/b/c/d/e/f/...",
        "/b/c/d/e/f/.../g",
    ]);

    let mut m = PathMatcher::new();
    assert_eq!(m.add_paths(&m1), true);
    assert_eq!(m.paths(), m1.paths());
    assert_eq!(m.add_paths(&m1), false);

    assert_eq!(m.add_paths(&m2), true);
    let mut expected: Vec<String> = m1.paths();
    expected.extend(m2.paths());
    expected.sort();
    let mut actual = m.paths();
    actual.sort();
    assert_eq!(actual, expected);
    assert_eq!(m.add_paths(&m2), false);

    let m3 = matcher(["/b/e/..."]);
    assert_eq!(m.add_paths(&m3), true);
    assert_eq!(m.add_paths(&m3), false);

    let m4 = matcher(["/b/e/f/g"]);
    assert_eq!(m.add_paths(&m4), true);
    assert_eq!(m.add_paths(&m4), false);

    let mut expected: Vec<String> = m1.paths();
    expected.extend(m2.paths());
    expected.extend(m3.paths());
    expected.extend(m4.paths());
    expected.sort();
    let mut actual = m.paths();
    actual.sort();
    assert_eq!(actual, expected);
}

#[test]
fn test_remove_paths() {
    let m1 = matcher(["/a", "/a/../b", "/b", "/b/c/d"]);
    let m2 = matcher([
        "/a/b",
        "/a/../c",
        "/b/e",
        "/b/c/d/e/f",
        "/b/c/d/e/f/...",
        "/b/c/d/e/f/.../g",
    ]);

    let mut m = PathMatcher::new();
    m.add_paths(&m1);
    m.add_paths(&m2);
    assert!(!m.is_empty());

    assert_eq!(m.remove_paths(&m1), true);
    assert_eq!(m.paths(), m2.paths());
    assert_eq!(m.remove_paths(&m1), false);
    assert!(!m.is_empty());

    assert_eq!(m.remove_paths(&m2), true);
    assert_eq!(m.paths(), Vec::<String>::new());
    assert_eq!(m.remove_paths(&m2), false);
    assert!(m.is_empty());
}

#[test]
fn test_clone_and_add_paths() {
    let initial_paths = ["/a/b/c/d", "/a/b", "/e/f"];
    let additional_paths = ["/a/b/c/d/e", "/a/b/c/e", "/a/b/e", "/e", "/g"];

    let mut m1 = matcher(initial_paths);
    let m2 = m1.clone();

    for path in additional_paths {
        m1.add_path(path);
    }

    let mut expected: Vec<String> = initial_paths
        .iter()
        .chain(&additional_paths)
        .map(|p| p.to_string())
        .collect();
    expected.sort();
    let mut actual = m1.paths();
    actual.sort();
    assert_eq!(actual, expected);
    assert_eq!(m2, matcher(initial_paths));

    // the same, but merging a matcher rather than adding individual paths:
    let mut m1 = matcher(initial_paths);
    let m2 = m1.clone();

    m1.add_paths(&matcher(additional_paths));

    let mut actual = m1.paths();
    actual.sort();
    assert_eq!(actual, expected);
    assert_eq!(m2, matcher(initial_paths));
}

#[test]
fn test_clone_and_add_root() {
    let m1 = PathMatcher::new();
    let mut m2 = m1.clone();

    m2.add_path("/");
    assert_eq!(m1.paths(), Vec::<String>::new());
    assert_eq!(m2.paths(), ["/"]);
}

#[test]
fn test_clone_and_remove_path() {
    let initial_paths = ["/a/b/c/d/e", "/a/b", "/e/f", "/e/f/g", "/g"];
    let paths_to_remove = ["/a/b", "/e/f/g", "/g"];

    let mut m1 = matcher(initial_paths);
    let m2 = m1.clone();

    for path in paths_to_remove {
        m1.remove_path(path);
    }

    let mut actual = m1.paths();
    actual.sort();
    assert_eq!(actual, ["/a/b/c/d/e", "/e/f"]);
    assert_eq!(m2, matcher(initial_paths));

    // the same via remove_paths:
    let mut m1 = matcher(initial_paths);
    let m2 = m1.clone();

    m1.remove_paths(&matcher(paths_to_remove));

    let mut actual = m1.paths();
    actual.sort();
    assert_eq!(actual, ["/a/b/c/d/e", "/e/f"]);
    assert_eq!(m2, matcher(initial_paths));
}

#[test]
fn test_clone_and_prune_path() {
    let initial_paths = ["/a/b/c/d/e", "/a/b", "/e/f", "/e/f/g", "/g"];
    let paths_to_prune = ["/a/b", "/e/f/g", "/g"];

    let mut m1 = matcher(initial_paths);
    let m2 = m1.clone();

    for path in paths_to_prune {
        m1.prune(path);
    }

    assert_eq!(m1.paths(), ["/e/f"]);
    assert_eq!(m2, matcher(initial_paths));
}

#[test]
fn test_sub_tree() {
    let paths = ["/a/b/c/d/e", "/d/b/c/d", "/a", "/a/b/c"];
    let mut m1 = matcher(paths);

    let mut m2 = m1.sub_tree("/a/b/c");
    assert_eq!(m1, matcher(paths));
    assert_eq!(m2.paths(), ["/", "/d/e"]);

    // the extracted matcher is fully independent of its source:
    m1.add_path("/a/b/c/d/f");
    assert_eq!(m2.paths(), ["/", "/d/e"]);

    m2.add_path("/d/e/g");
    assert!(!m1.paths().contains(&String::from("/a/b/c/d/e/g")));
    assert_eq!(m2.paths(), ["/", "/d/e", "/d/e/g"]);
}

#[test]
fn test_nonexistent_sub_tree() {
    let m1 = matcher(["/a/b"]);
    let m2 = m1.sub_tree("/wot?");
    assert_eq!(m2.paths(), Vec::<String>::new());
    assert!(m2.is_empty());
}

#[test]
fn test_sub_tree_with_non_terminal_root() {
    let m1 = matcher(["/a/b/c/d"]);
    let m2 = m1.sub_tree("/a");
    assert_eq!(m2.paths(), ["/b/c/d"]);
}

#[test]
fn test_sub_tree_of_root() {
    let m1 = matcher(["/a/b", "/c"]);
    let mut m2 = m1.sub_tree("/");
    assert_eq!(m1, m2);

    m2.clear();
    assert_eq!(m1, matcher(["/a/b", "/c"]));
}

#[test]
fn test_add_paths_with_prefix() {
    let paths = ["/a/b", "/e/d", "/"];
    let prefixed_paths = ["/x/y/z", "/x/y/z/a/b", "/x/y/z/e/d"];

    let mut m1 = matcher(paths);
    let mut m2 = PathMatcher::new();
    assert!(m2.add_paths_with_prefix(&m1, "/x/y/z"));
    assert!(!m2.add_paths_with_prefix(&m1, "/x/y/z"));

    assert_eq!(m1, matcher(paths));
    let mut actual = m2.paths();
    actual.sort();
    assert_eq!(actual, prefixed_paths);

    // the source stays independent of the destination:
    assert!(m1.add_path("/b/c"));
    let mut actual = m2.paths();
    actual.sort();
    assert_eq!(actual, prefixed_paths);
}

#[test]
fn test_add_empty_paths_with_prefix() {
    let mut m = PathMatcher::new();
    assert!(!m.add_paths_with_prefix(&PathMatcher::new(), "/x/y/z"));
    assert_eq!(m.paths(), Vec::<String>::new());
    assert!(m.is_empty());
}

#[test]
fn test_prefix_is_not_added_by_itself() {
    let mut m = PathMatcher::new();
    m.add_paths_with_prefix(&matcher(["/a"]), "/prefix");
    assert_eq!(m.paths(), ["/prefix/a"]);
}

#[test]
fn test_empty_string_is_not_a_path() {
    let mut m = PathMatcher::new();
    assert!(!m.add_path(""));
    assert!(m.is_empty());
    assert_eq!(m.paths(), Vec::<String>::new());

    m.add_path("/");
    assert_eq!(m.paths(), ["/"]);
    assert!(!m.remove_path(""));
    assert!(!m.is_empty());
    assert_eq!(m.paths(), ["/"]);

    m.add_path("/a");
    assert_eq!(m.paths(), ["/", "/a"]);
    assert!(!m.prune(""));
    assert_eq!(m.paths(), ["/", "/a"]);

    assert_eq!(m.matches(""), MatchResult::NO_MATCH);

    let s = m.sub_tree("");
    assert!(s.is_empty());

    assert!(!m.add_paths_with_prefix(&matcher(["/a"]), ""));
    assert_eq!(m.paths(), ["/", "/a"]);
}

#[test]
fn test_path_normalization() {
    // empty components collapse, so these are all the same pattern:
    let mut m = PathMatcher::new();
    assert!(m.add_path("/a//b"));
    assert!(!m.add_path("/a/b/"));
    assert!(!m.add_path("a/b"));
    assert_eq!(m.paths(), ["/a/b"]);
    assert_eq!(m.matches("/a/b"), MatchResult::EXACT_MATCH);
}

#[test]
fn test_add_then_remove_leaves_empty() {
    for path in ["/a", "/a/b/c", "/a/*/b", "/a/.../b", "/..."] {
        let mut m = PathMatcher::new();
        assert!(m.add_path(path));
        assert!(m.remove_path(path));
        assert!(m.is_empty(), "path {:?}", path);
        assert_eq!(m.matches(path), MatchResult::NO_MATCH, "path {:?}", path);
    }
}

#[test]
fn test_serde_round_trip() {
    for m in [
        PathMatcher::new(),
        matcher(["/a/b", "/a/*"]),
        matcher(["/", "/a/.../b*", "/a/[bc]d", "/w?t"]),
    ] {
        let repr = serde_json::to_string(&m).unwrap();
        let parsed: PathMatcher = serde_json::from_str(&repr).unwrap();
        assert_eq!(parsed, m, "repr {}", repr);
    }

    let m: PathMatcher = serde_json::from_str(r#"["/a/b", "/c"]"#).unwrap();
    assert_eq!(m.paths(), ["/a/b", "/c"]);
}

#[test]
fn test_debug_is_the_path_list() {
    let m = matcher(["/a/b", "/a/*"]);
    assert_eq!(format!("{:?}", m), r#"PathMatcher(["/a/b", "/a/*"])"#);
}

#[cfg(test)]
mod scaling {
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    use super::{matcher, MatchResult, PathMatcher};

    const NOUNS: &[&str] = &[
        "Anchor", "Beacon", "Crate", "Dome", "Fence", "Girder", "Hatch", "Lantern", "Mast",
        "Panel", "Pillar", "Ramp", "Spire", "Turbine", "Valve",
    ];

    const ADJECTIVES: &[&str] = &[
        "old", "bent", "bright", "dim", "inner", "outer", "spare", "tall", "worn", "painted",
    ];

    /// Build a random hierarchy of paths, including every intermediate location.
    fn generate_paths(
        seed: u64,
        depth_range: (usize, usize),
        children_range: (usize, usize),
    ) -> Vec<String> {
        fn build_walk(
            rng: &mut StdRng,
            depth_range: (usize, usize),
            children_range: (usize, usize),
            parent: &str,
            depth: usize,
            paths: &mut Vec<String>,
        ) {
            if depth > rng.gen_range(depth_range.0..=depth_range.1) {
                return;
            }
            for i in 0..rng.gen_range(children_range.0..=children_range.1) {
                let path = format!(
                    "{}/{}{}{}",
                    parent,
                    ADJECTIVES.choose(rng).unwrap(),
                    NOUNS.choose(rng).unwrap(),
                    i
                );
                paths.push(path.clone());
                build_walk(rng, depth_range, children_range, &path, depth + 1, paths);
            }
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut paths = Vec::new();
        build_walk(&mut rng, depth_range, children_range, "", 1, &mut paths);
        paths
    }

    // Every path of a hierarchy exact-matches the matcher built from the full hierarchy, for a
    // deep hierarchy with few children per branch point and a shallow one with many.
    #[test]
    fn test_lookup_scaling() {
        for (depth_range, children_range) in [((3, 7), (2, 3)), ((2, 2), (40, 80))] {
            let paths = generate_paths(10, depth_range, children_range);
            assert!(!paths.is_empty());

            let m: PathMatcher = paths.iter().collect();
            for path in &paths {
                assert!(
                    m.matches(path).contains(MatchResult::EXACT_MATCH),
                    "path {:?}",
                    path
                );
            }
        }
    }

    // Removing every path again leaves the matcher empty, whatever order the removals happen in.
    #[test]
    fn test_removal_scaling() {
        let mut paths = generate_paths(11, (3, 6), (2, 3));
        let mut m: PathMatcher = paths.iter().collect();

        let mut rng = StdRng::seed_from_u64(12);
        paths.shuffle(&mut rng);
        for path in &paths {
            assert!(m.remove_path(path), "path {:?}", path);
        }
        assert!(m.is_empty());
        assert_eq!(m, matcher([]));
    }
}
