use crate::page::DomRow;
use lecture_dates_curriculum::{normalize_title, CurriculumItem};

/// How many API entries past the cursor are searched for a row that does
/// not match the cursor entry. Drift larger than this never resynchronizes.
pub const LOOKAHEAD_WINDOW: usize = 10;

/// A rendered row and the API item it was aligned with.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedPair<'a, E> {
    pub element: E,
    pub item: &'a CurriculumItem,
}

/// Aligns rendered rows with API items in one forward pass.
///
/// `items` must already be in visual order (descending `sort_order`) with
/// chapters removed. For each row, the item under the cursor and then up to
/// [`LOOKAHEAD_WINDOW`] items after it are compared by normalized title; the
/// first hit is paired and the cursor moves past it, skipping API-only
/// entries. A row with no hit inside the window is dropped and the cursor
/// stays put. Once the cursor runs off the end, remaining rows are dropped.
///
/// Duplicate titles resolve positionally to the first one in reach.
pub fn match_rows<'a, E: Clone>(
    rows: &[DomRow<E>],
    items: &'a [CurriculumItem],
) -> Vec<MatchedPair<'a, E>> {
    let keys: Vec<String> = items.iter().map(|item| normalize_title(&item.title)).collect();
    let mut pairs = Vec::with_capacity(rows.len().min(items.len()));
    let mut api_index = 0usize;

    for row in rows {
        if api_index >= items.len() {
            break;
        }

        let key = normalize_title(&row.title);
        let window_end = (api_index + LOOKAHEAD_WINDOW).min(items.len() - 1);
        match (api_index..=window_end).find(|&idx| keys[idx] == key) {
            Some(idx) => {
                if idx != api_index {
                    log::trace!(
                        "row {:?} resynchronized by skipping {} api item(s)",
                        row.title,
                        idx - api_index
                    );
                }
                pairs.push(MatchedPair {
                    element: row.element.clone(),
                    item: &items[idx],
                });
                api_index = idx + 1;
            }
            None => log::trace!("row {:?} has no api counterpart in reach", row.title),
        }
    }

    pairs
}
