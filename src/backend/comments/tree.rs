//! Tree Assembler
//!
//! Rebuilds the comment forest of a post from a flat set of live comments.
//!
//! # Ordering
//!
//! - children at every depth: oldest first, ties by ascending id
//! - roots: newest first, ties by descending id
//!
//! # Fallbacks
//!
//! A comment whose parent is absent from the input (deleted, or never
//! loaded) becomes a root. Comments that can only be reached through a
//! corrupt parent cycle are promoted to roots as well, oldest first, so no
//! input comment is ever dropped. Duplicate ids keep their first occurrence.
//!
//! # Depth
//!
//! Threads nest at most [`MAX_DISPLAY_DEPTH`] levels below their root. Replies
//! deeper than that are listed under their ancestor at the last displayed
//! level, in the same oldest-first order; their `parent_id` still names the
//! comment they answered. This keeps the serialized forest within the
//! nesting limits of JSON parsers, however long a reply chain grows.
//!
//! Construction is iterative.

use std::cmp::Ordering;
use std::collections::HashMap;

use uuid::Uuid;

use crate::shared::{Comment, CommentNode};

/// Deepest nesting level in an assembled forest; roots are level 0
pub const MAX_DISPLAY_DEPTH: usize = 32;

fn oldest_first(a: &Comment, b: &Comment) -> Ordering {
    a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id))
}

/// Assemble the ordered forest from live comments
pub fn assemble_forest(comments: Vec<Comment>) -> Vec<CommentNode> {
    let mut index: HashMap<Uuid, usize> = HashMap::with_capacity(comments.len());
    let mut slots: Vec<Option<Comment>> = Vec::with_capacity(comments.len());
    for comment in comments {
        if index.contains_key(&comment.id) {
            tracing::warn!("Duplicate comment {} in tree input; keeping first", comment.id);
            continue;
        }
        index.insert(comment.id, slots.len());
        slots.push(Some(comment));
    }

    let count = slots.len();
    let mut keys = Vec::with_capacity(count);
    let mut parent_of: Vec<Option<usize>> = Vec::with_capacity(count);
    for (i, comment) in slots.iter().flatten().enumerate() {
        keys.push(comment);
        let parent = comment
            .parent_id
            .and_then(|parent_id| index.get(&parent_id).copied())
            .filter(|&p| p != i);
        parent_of.push(parent);
    }

    let by_age = |a: &usize, b: &usize| oldest_first(keys[*a], keys[*b]);

    // Anything not reachable from a parentless node hangs off a cycle.
    let mut reached = vec![false; count];
    let mut children = children_lists(&parent_of);
    let mut stack: Vec<usize> = (0..count).filter(|&i| parent_of[i].is_none()).collect();
    mark_reached(&mut stack, &children, &mut reached);

    let mut stranded: Vec<usize> = (0..count).filter(|&i| !reached[i]).collect();
    if !stranded.is_empty() {
        stranded.sort_by(by_age);
        for i in stranded {
            if reached[i] {
                continue;
            }
            tracing::warn!("Comment {} is caught in a parent cycle; promoting to root", keys[i].id);
            parent_of[i] = None;
            stack.push(i);
            mark_reached(&mut stack, &children, &mut reached);
        }
        children = children_lists(&parent_of);
    }

    let mut roots: Vec<usize> = (0..count).filter(|&i| parent_of[i].is_none()).collect();
    roots.sort_by(|a, b| by_age(b, a));

    let shown = cap_depth(&roots, &children, &parent_of);
    if shown != parent_of {
        children = children_lists(&shown);
    }
    for list in children.iter_mut() {
        list.sort_by(by_age);
    }

    // Pre-order walk; building in reverse guarantees children exist first.
    let mut order = Vec::with_capacity(count);
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(i) = stack.pop() {
        order.push(i);
        stack.extend(children[i].iter().rev().copied());
    }

    let mut built: Vec<Option<CommentNode>> = (0..count).map(|_| None).collect();
    for &i in order.iter().rev() {
        let kids = children[i]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        if let Some(comment) = slots[i].take() {
            built[i] = Some(CommentNode {
                comment,
                children: kids,
            });
        }
    }

    roots.into_iter().filter_map(|i| built[i].take()).collect()
}

fn children_lists(parent_of: &[Option<usize>]) -> Vec<Vec<usize>> {
    let mut children = vec![Vec::new(); parent_of.len()];
    for (i, parent) in parent_of.iter().enumerate() {
        if let Some(p) = parent {
            children[*p].push(i);
        }
    }
    children
}

/// Display parent of every node, re-hanging anything below the deepest
/// displayed level onto its ancestor at the level above
fn cap_depth(
    roots: &[usize],
    children: &[Vec<usize>],
    parent_of: &[Option<usize>],
) -> Vec<Option<usize>> {
    let mut shown = parent_of.to_vec();
    let mut stack: Vec<(usize, usize)> = roots.iter().map(|&root| (root, 0)).collect();
    while let Some((i, depth)) = stack.pop() {
        for &child in &children[i] {
            if depth < MAX_DISPLAY_DEPTH {
                stack.push((child, depth + 1));
            } else {
                shown[child] = shown[i];
                stack.push((child, depth));
            }
        }
    }
    shown
}

fn mark_reached(stack: &mut Vec<usize>, children: &[Vec<usize>], reached: &mut [bool]) {
    while let Some(i) = stack.pop() {
        if reached[i] {
            continue;
        }
        reached[i] = true;
        stack.extend(children[i].iter().copied().filter(|&c| !reached[c]));
    }
}
