//! Hierarchical path matching.
//!
//! This implements a [`PathMatcher`] aggregating slash-delimited path patterns in a trie, and a
//! query classifying an arbitrary concrete path against the whole set at once: is it matched
//! exactly, is it inside a matched subtree, is something matched below it, or any combination of
//! those. Pattern components may be glob wildcards (`*`, `?`, `[...]`) matching a single
//! component, or the ellipsis `...` matching any number of components.
//!
//! Here's a rather long matching example:
//!
//! ```
//! # use pathmatcher::*;
//! let mut selection: PathMatcher = [
//!     "/world/buildings/tower",
//!     "/world/vehicles/.../wheel*",
//!     "/world/lights/?ey",
//! ]
//! .into_iter()
//! .collect();
//!
//! // the registered locations themselves match exactly:
//! assert_eq!(
//!     selection.matches("/world/buildings/tower"),
//!     MatchResult::EXACT_MATCH
//! );
//! assert_eq!(
//!     selection.matches("/world/lights/key"),
//!     MatchResult::EXACT_MATCH
//! );
//!
//! // locations above them only know that something below is selected:
//! assert_eq!(
//!     selection.matches("/world/buildings"),
//!     MatchResult::DESCENDANT_MATCH
//! );
//!
//! // locations below them are inside a selected subtree:
//! assert_eq!(
//!     selection.matches("/world/buildings/tower/door"),
//!     MatchResult::ANCESTOR_MATCH
//! );
//!
//! // the ellipsis matches any number of components, including none, so a wheel at any depth
//! // under /world/vehicles is selected, and deeper wheels may exist too:
//! assert_eq!(
//!     selection.matches("/world/vehicles/cart/wheelFront"),
//!     MatchResult::EXACT_MATCH | MatchResult::DESCENDANT_MATCH
//! );
//! assert_eq!(
//!     selection.matches("/world/vehicles/train/engine/wheel2"),
//!     MatchResult::EXACT_MATCH | MatchResult::DESCENDANT_MATCH
//! );
//! assert_eq!(selection.matches("/world/plants"), MatchResult::NO_MATCH);
//!
//! // mutation is incremental; removing a pattern leaves the rest in place:
//! assert!(selection.remove_path("/world/buildings/tower"));
//! assert_eq!(
//!     selection.matches("/world/buildings/tower"),
//!     MatchResult::NO_MATCH
//! );
//! assert!(!selection.is_empty());
//!
//! // whole branches can be extracted relative to a new root ...
//! let vehicles = selection.sub_tree("/world/vehicles");
//! assert_eq!(vehicles.paths(), ["/.../wheel*"]);
//!
//! // ... and merged into another matcher under a prefix:
//! let mut merged = PathMatcher::new();
//! merged.add_paths_with_prefix(&vehicles, "/backup");
//! assert_eq!(merged.paths(), ["/backup/.../wheel*"]);
//! ```

mod matcher;
mod pattern;

#[doc(inline)]
pub use matcher::{ELLIPSIS, MatchResult, PathMatcher};

#[doc(inline)]
pub use pattern::{ParseError, Pattern};
