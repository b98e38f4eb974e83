// ── Path consolidation ──
//
// Recursive purges invalidate whole directories, so a path and any of its
// descendants collapse into the shorter one. The tree is rebuilt by value on
// every insertion; there is no in-place mutation to reason about.

use std::collections::BTreeMap;

/// One level of the consolidated directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathNode {
    /// Invalidate everything at and below this path.
    Leaf,
    /// Only the listed sub-directories are invalidated.
    Branch(BTreeMap<String, PathNode>),
}

impl PathNode {
    fn empty_branch() -> Self {
        Self::Branch(BTreeMap::new())
    }

    fn insert<S: AsRef<str>>(self, segments: &[S]) -> Self {
        match (self, segments.split_first()) {
            // An ancestor already covers the whole subtree.
            (Self::Leaf, _) => Self::Leaf,
            // The new path ends here: it absorbs every deeper path.
            (Self::Branch(_), None) => Self::Leaf,
            (Self::Branch(mut children), Some((head, rest))) => {
                let head = head.as_ref();
                let child = children.remove(head).unwrap_or_else(Self::empty_branch);
                children.insert(head.to_owned(), child.insert(rest));
                Self::Branch(children)
            }
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf)
    }

    /// Child nodes in segment order; empty for a leaf.
    pub fn children(&self) -> impl Iterator<Item = (&str, &PathNode)> {
        let children = match self {
            Self::Leaf => None,
            Self::Branch(children) => Some(children),
        };
        children
            .into_iter()
            .flatten()
            .map(|(segment, node)| (segment.as_str(), node))
    }

    fn depth(&self) -> usize {
        match self {
            Self::Leaf => 0,
            Self::Branch(children) => children
                .values()
                .map(|child| child.depth() + 1)
                .max()
                .unwrap_or(0),
        }
    }

    fn collect_leaves(&self, prefix: &mut Vec<String>, out: &mut Vec<String>) {
        match self {
            Self::Leaf => out.push(prefix.join("/")),
            Self::Branch(children) => {
                for (segment, child) in children {
                    prefix.push(segment.clone());
                    child.collect_leaves(prefix, out);
                    prefix.pop();
                }
            }
        }
    }
}

/// Minimal set of directory prefixes covering every inserted path.
///
/// No leaf ever has a descendant in the tree: whichever of an ancestor and
/// a descendant arrives, the ancestor wins, regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTree {
    root: PathNode,
}

impl Default for PathTree {
    fn default() -> Self {
        Self {
            root: PathNode::empty_branch(),
        }
    }
}

impl PathTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a sequence of segment lists.
    pub fn from_paths<I, P, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[S]>,
        S: AsRef<str>,
    {
        paths
            .into_iter()
            .fold(Self::new(), |tree, path| tree.insert(path.as_ref()))
    }

    /// Insert one path given as its segments. An empty slice covers the whole host.
    #[must_use]
    pub fn insert<S: AsRef<str>>(self, segments: &[S]) -> Self {
        Self {
            root: self.root.insert(segments),
        }
    }

    pub fn root(&self) -> &PathNode {
        &self.root
    }

    /// `true` until the first path is inserted.
    pub fn is_empty(&self) -> bool {
        matches!(&self.root, PathNode::Branch(children) if children.is_empty())
    }

    /// Number of segment levels along the deepest branch.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Every surviving prefix, `/`-joined. The whole-host leaf is `""`.
    pub fn leaves(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.root.collect_leaves(&mut Vec::new(), &mut out);
        out
    }

    /// Whether a path is invalidated by this tree.
    pub fn covers<S: AsRef<str>>(&self, segments: &[S]) -> bool {
        let mut node = &self.root;
        let mut rest = segments;
        loop {
            match node {
                PathNode::Leaf => return true,
                PathNode::Branch(children) => {
                    let Some((head, tail)) = rest.split_first() else {
                        return false;
                    };
                    let Some(child) = children.get(head.as_ref()) else {
                        return false;
                    };
                    node = child;
                    rest = tail;
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn segs(path: &str) -> Vec<&str> {
        path.split('/').filter(|s| !s.is_empty()).collect()
    }

    fn tree(paths: &[&str]) -> PathTree {
        PathTree::from_paths(paths.iter().map(|p| segs(p)))
    }

    fn branch<const N: usize>(children: [(&str, PathNode); N]) -> PathNode {
        PathNode::Branch(
            children
                .into_iter()
                .map(|(segment, node)| (segment.to_owned(), node))
                .collect(),
        )
    }

    #[test]
    fn descendant_after_ancestor_is_pruned() {
        let t = tree(&["/a/b/", "/a/b/c/"]);
        assert_eq!(t.root(), &branch([("a", branch([("b", PathNode::Leaf)]))]));
        assert_eq!(t.leaves(), vec!["a/b"]);
    }

    #[test]
    fn ancestor_after_descendant_replaces_it() {
        let t = tree(&["/a/b/c/d", "/a/b/c/e", "/a/b"]);
        assert_eq!(t.root(), &branch([("a", branch([("b", PathNode::Leaf)]))]));
    }

    #[test]
    fn siblings_are_kept_as_separate_branches() {
        let t = tree(&["/a/b/", "/a/c/"]);
        assert_eq!(
            t.root(),
            &branch([("a", branch([("b", PathNode::Leaf), ("c", PathNode::Leaf)]))])
        );
        assert_eq!(t.depth(), 2);
    }

    #[test]
    fn mixed_scenario_consolidates_to_two_leaves() {
        let t = tree(&["/a/b", "/a/b/c", "/a/d"]);
        assert_eq!(
            t.root(),
            &branch([("a", branch([("b", PathNode::Leaf), ("d", PathNode::Leaf)]))])
        );
        assert_eq!(t.leaves(), vec!["a/b", "a/d"]);
    }

    #[test]
    fn duplicate_paths_collapse() {
        let t = tree(&["/x/y", "/x/y/", "x/y"]);
        assert_eq!(t.leaves(), vec!["x/y"]);
    }

    #[test]
    fn root_path_covers_whole_host() {
        let t = tree(&["/a/b", "/", "/c"]);
        assert_eq!(t.root(), &PathNode::Leaf);
        assert_eq!(t.leaves(), vec![""]);
        assert!(t.covers(&segs("/anything/at/all")));
    }

    #[test]
    fn every_input_is_covered() {
        let inputs = [
            "/static/js/app.js",
            "/static/css",
            "/static/css/site.css",
            "/img/logo.png",
            "/img",
            "/docs/v1/intro",
            "/docs/v2/intro",
        ];
        let t = tree(&inputs);
        for input in inputs {
            assert!(t.covers(&segs(input)), "{input} not covered");
        }
        assert_eq!(
            t.leaves(),
            vec![
                "docs/v1/intro",
                "docs/v2/intro",
                "img",
                "static/css",
                "static/js/app.js"
            ]
        );
    }

    #[test]
    fn no_leaf_is_prefix_of_another() {
        let t = tree(&["/a", "/a/b", "/ab", "/ab/c", "/b/c", "/b"]);
        let leaves = t.leaves();
        for outer in &leaves {
            for inner in &leaves {
                if outer != inner {
                    assert!(!inner.starts_with(&format!("{outer}/")), "{outer} covers {inner}");
                }
            }
        }
        assert_eq!(leaves, vec!["a", "ab", "b"]);
    }

    #[test]
    fn uncovered_paths() {
        let t = tree(&["/a/b"]);
        assert!(!t.covers(&segs("/a")));
        assert!(!t.covers(&segs("/a/c")));
        assert!(!PathTree::new().covers(&segs("/a")));
    }

    #[test]
    fn empty_tree() {
        let t = PathTree::new();
        assert!(t.is_empty());
        assert_eq!(t.depth(), 0);
        assert!(t.leaves().is_empty());
        assert!(!tree(&["/a"]).is_empty());
    }
}
