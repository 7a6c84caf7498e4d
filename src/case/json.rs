use crate::{Dispatcher, Items, Lane, Outcome};

fn generate_and_parse(count: usize) -> Outcome<Items> {
    let bytes = Items::generate_json(count)?;
    Items::from_json(&bytes)
}

/// Generates and parses a JSON payload of `count` items on the caller's thread.
#[tracing::instrument]
pub fn bad_json_decode(count: usize) -> Outcome<Items> {
    let items = generate_and_parse(count)?;
    tracing::trace!("Parsed {} items while blocking.", items.len());
    Ok(items)
}

/// Generates and parses the same payload on the background lane's blocking pool.
#[tracing::instrument(skip(dispatcher))]
pub async fn good_json_decode(dispatcher: &Dispatcher, count: usize) -> Outcome<Items> {
    let items = dispatcher
        .spawn_blocking(Lane::Background, move || generate_and_parse(count))
        .await??;
    tracing::trace!("Parsed {} items in the background.", items.len());
    Ok(items)
}
