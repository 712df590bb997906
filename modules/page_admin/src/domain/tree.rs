//! Tree structure helpers shared by the page repositories

use crate::contract::{Page, PageId, TreePosition};

/// Safety limit for ancestor walks
pub const MAX_DEPTH: usize = 100;

/// Error type for tree operations
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("Page not found: {0}")]
    PageNotFound(PageId),

    #[error("Cannot move page {page} next to or under page {target}: target is inside the moved subtree")]
    TargetInSubtree { page: PageId, target: PageId },

    #[error("Invalid tree structure: {0}")]
    InvalidHierarchy(String),
}

/// Walk from a page up to its root
///
/// `parent_of` returns None for an unknown page and Some(None) for a root.
/// Returns the ancestors ordered from parent to root, excluding the page.
pub fn ancestor_path<F>(page_id: PageId, parent_of: F) -> Result<Vec<PageId>, TreeError>
where
    F: Fn(PageId) -> Option<Option<PageId>>,
{
    let mut path = Vec::new();
    let mut current = parent_of(page_id).ok_or(TreeError::PageNotFound(page_id))?;

    while let Some(parent_id) = current {
        if parent_id == page_id || path.contains(&parent_id) {
            return Err(TreeError::InvalidHierarchy(format!(
                "Circular reference detected at page {}",
                parent_id
            )));
        }
        path.push(parent_id);
        if path.len() > MAX_DEPTH {
            return Err(TreeError::InvalidHierarchy(format!(
                "Hierarchy depth exceeds maximum ({} levels)",
                MAX_DEPTH
            )));
        }
        current = parent_of(parent_id).ok_or(TreeError::PageNotFound(parent_id))?;
    }

    Ok(path)
}

/// Reject moves that would make a page its own ancestor
pub fn check_move(
    page_id: PageId,
    target_id: PageId,
    target_ancestors: &[PageId],
) -> Result<(), TreeError> {
    if page_id == target_id || target_ancestors.contains(&page_id) {
        return Err(TreeError::TargetInSubtree {
            page: page_id,
            target: target_id,
        });
    }
    Ok(())
}

/// New parent, level and sibling ordering produced by a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    pub parent_id: Option<PageId>,
    pub level: i32,
    /// Level change applied to every descendant
    pub level_delta: i32,
    /// (page, position) for the destination siblings, the moved page included
    pub new_siblings: Vec<(PageId, i32)>,
    /// (page, position) for the remaining siblings at the old location
    pub old_siblings: Vec<(PageId, i32)>,
}

/// Compute the result of a move
///
/// `destination` lists the current children of the new parent in order,
/// `origin` the current siblings of the page (both may contain the page).
pub fn plan_move(
    page: &Page,
    target: &Page,
    position: TreePosition,
    destination: &[PageId],
    origin: &[PageId],
) -> MovePlan {
    let parent_id = position.new_parent(target);
    let level = match position {
        TreePosition::FirstChild | TreePosition::LastChild => target.level + 1,
        TreePosition::Left | TreePosition::Right => target.level,
    };

    let mut siblings: Vec<PageId> = destination
        .iter()
        .copied()
        .filter(|id| *id != page.id)
        .collect();
    let index = match position {
        TreePosition::FirstChild => 0,
        TreePosition::LastChild => siblings.len(),
        TreePosition::Left | TreePosition::Right => {
            let at = siblings
                .iter()
                .position(|id| *id == target.id)
                .unwrap_or(siblings.len());
            if position == TreePosition::Right {
                (at + 1).min(siblings.len())
            } else {
                at
            }
        }
    };
    siblings.insert(index, page.id);

    let old_siblings = if parent_id == page.parent_id {
        Vec::new()
    } else {
        number(origin.iter().copied().filter(|id| *id != page.id))
    };

    MovePlan {
        parent_id,
        level,
        level_delta: level - page.level,
        new_siblings: number(siblings.into_iter()),
        old_siblings,
    }
}

fn number(ids: impl Iterator<Item = PageId>) -> Vec<(PageId, i32)> {
    ids.enumerate().map(|(i, id)| (id, i as i32)).collect()
}
