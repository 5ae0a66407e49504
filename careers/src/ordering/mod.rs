//! Section ordering.
//!
//! A company's sections are displayed in ascending `order_index`. Indices are not required to be
//! unique or contiguous in storage; reads break ties by `created_at` then `id`. A client that wants
//! a new order computes it locally with [`move_item`], numbers the result with
//! [`assign_positions`] (giving contiguous `0..N`), and commits it as one bulk reorder.
//!
//! The server side of the bulk reorder lives in
//! [`Sections::reorder`](crate::db::handlers::Sections::reorder); the client side is the
//! [`draft::SectionDraft`] buffer committed through a [`client::SectionsApi`].

use std::collections::HashMap;

use thiserror::Error;

use crate::api::models::sections::SectionOrder;
use crate::types::SectionId;

pub mod client;
pub mod draft;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderingError {
    #[error("position {position} is out of range for {len} sections")]
    OutOfRange { position: usize, len: usize },

    #[error("section {0} is not in the list")]
    UnknownSection(SectionId),

    #[error("{len} sections cannot be numbered with 32-bit indices")]
    TooManySections { len: usize },
}

/// Remove the item at `from` and reinsert it at `to`.
///
/// Items strictly between the two positions shift one place toward `from`. `from == to` leaves the
/// list untouched. Both positions must be `< items.len()`.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), OrderingError> {
    let len = items.len();
    for position in [from, to] {
        if position >= len {
            return Err(OrderingError::OutOfRange { position, len });
        }
    }

    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    Ok(())
}

/// Number ids by their position: the first gets `order_index` 0, the next 1, and so on.
pub fn assign_positions<I>(ids: I) -> Result<Vec<SectionOrder>, OrderingError>
where
    I: IntoIterator<Item = SectionId>,
{
    ids.into_iter()
        .enumerate()
        .map(|(position, id)| {
            let order_index = i32::try_from(position).map_err(|_| OrderingError::TooManySections { len: position + 1 })?;
            Ok(SectionOrder { id, order_index })
        })
        .collect()
}

/// Collapse repeated ids so each appears once, carrying the `order_index` of its last occurrence.
///
/// The result keeps ids in the order of their last occurrence.
pub fn dedupe_last_wins(pairs: &[SectionOrder]) -> Vec<SectionOrder> {
    let last_seen: HashMap<SectionId, usize> = pairs.iter().enumerate().map(|(i, pair)| (pair.id, i)).collect();

    pairs
        .iter()
        .enumerate()
        .filter(|(i, pair)| last_seen.get(&pair.id) == Some(i))
        .map(|(_, pair)| *pair)
        .collect()
}
