use super::Position;

/// One clickable ancestry segment.
#[derive(Clone, Debug)]
pub struct Crumb {
    pub label: String,
    pub target: Position,
}

/// Ordered ancestry for the current position.
///
/// Inside a repository the first segment is `owner/repository` (the root)
/// and each further segment one path component; selecting segment `k` lands
/// exactly where `go_to_ancestor(k)` would. On the repository list the
/// trail is the single account segment.
pub fn breadcrumbs(position: &Position) -> Vec<Crumb> {
    let Some(tree) = position.tree() else {
        return vec![Crumb {
            label: position.account().to_string(),
            target: position.clone(),
        }];
    };

    let mut crumbs = Vec::with_capacity(tree.depth() + 1);
    for depth in 0..=tree.depth() {
        let mut target = position.clone();
        if let Some(t) = target.tree_mut() {
            t.go_to_ancestor(depth);
        }
        let label = if depth == 0 {
            format!("{}/{}", tree.owner, tree.repository)
        } else {
            tree.segments()[depth - 1].clone()
        };
        crumbs.push(Crumb { label, target });
    }
    crumbs
}
