//! Water-filling space distribution shared by every stack-like node.
//!
//! `stack_layout` seeds each item with its minimum, then repeatedly splits the
//! leftover evenly among items that can still grow. Range items stop at their
//! max and drop out; whatever they could not take is split again on the next
//! round. Iteration always runs in item order, so results are reproducible.

use crate::Sizing;

/// Leftover below this is considered distributed.
pub const LAYOUT_EPSILON: f32 = 0.01;

/// Allocates `space` among `items`, returning one extent per item.
///
/// Space at or below the sum of minimums (including zero or negative space)
/// yields the minimums: fixed items get their value, ranges their `min`,
/// flexible items zero.
pub fn stack_layout(space: f32, items: &[Sizing]) -> Vec<f32> {
    let mut allocations: Vec<f32> = items.iter().map(Sizing::min).collect();
    let mut allocated: f32 = allocations.iter().sum();
    let mut expandable: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_expandable())
        .map(|(i, _)| i)
        .collect();

    // Every productive round either saturates a range item or hands out the
    // whole remainder, so this bound only trips on float drift at huge extents.
    let max_rounds = items.len() + 1;
    let mut rounds = 0;

    while !expandable.is_empty() && rounds < max_rounds {
        let remaining = space - allocated;
        if remaining <= LAYOUT_EPSILON {
            break;
        }
        rounds += 1;

        let per_item = remaining / expandable.len() as f32;
        expandable.retain(|&i| match items[i] {
            Sizing::Flexible => {
                allocations[i] += per_item;
                allocated += per_item;
                true
            }
            Sizing::Range { max, .. } => {
                let share = (max - allocations[i]).min(per_item);
                allocations[i] += share;
                allocated += share;
                allocations[i] < max
            }
            Sizing::Fixed(_) => false,
        });
    }

    if rounds == max_rounds && space - allocated > LAYOUT_EPSILON {
        log::trace!(
            "stack_layout: stopped after {rounds} rounds with {} left",
            space - allocated
        );
    }

    allocations
}

/// Start offsets for consecutive allocations separated by `spacing`.
pub fn stack_offsets(allocations: &[f32], spacing: f32) -> Vec<f32> {
    let mut cursor = 0.0;
    allocations
        .iter()
        .map(|a| {
            let at = cursor;
            cursor += a + spacing;
            at
        })
        .collect()
}
