use crate::{try_execute_concurrently, Card, Outcome};
use std::ops::RangeInclusive;
use std::time::Duration;

/// Splits card numbers `1..=total` into consecutive runs of at most `size` cards.  A `size` of
/// zero is treated as one.
pub fn batches(total: usize, size: usize) -> Vec<RangeInclusive<usize>> {
    let size = size.max(1);
    (0..total)
        .step_by(size)
        .map(|start| (start + 1)..=(start + size).min(total))
        .collect()
}

/// Paints `total` cards one at a time on the caller's thread, sleeping `delay` per card to stand
/// in for layout work.
#[tracing::instrument]
pub fn update_cards_synchronously(total: usize, delay: Duration) -> Vec<Card> {
    let mut rng = rand::thread_rng();
    let mut cards = Vec::with_capacity(total);
    for i in 1..=total {
        std::thread::sleep(delay);
        cards.push(Card::numbered(i, &mut rng));
    }
    cards
}

/// Paints the same cards in batches of `batch` that run concurrently, each card suspending for
/// `delay` instead of blocking.  Batches are stitched back together in card order.
#[tracing::instrument]
pub async fn update_cards_asynchronously(
    total: usize,
    batch: usize,
    delay: Duration,
) -> Outcome<Vec<Card>> {
    let units = batches(total, batch).into_iter().map(|range| async move {
        let mut cards = Vec::with_capacity(range.clone().count());
        for i in range {
            tokio::time::sleep(delay).await;
            cards.push(Card::numbered(i, &mut rand::thread_rng()));
        }
        Ok(cards)
    });
    let cards = try_execute_concurrently(units)
        .await?
        .into_iter()
        .flatten()
        .collect::<Vec<Card>>();
    tracing::trace!("Painted {} cards.", cards.len());
    Ok(cards)
}
