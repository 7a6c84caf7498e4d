use crate::Outcome;
use std::time::Duration;

fn read_lines(lines: usize, delay: Duration) -> String {
    let mut content = String::new();
    for i in 1..=lines {
        content.push_str(&format!("This is the content of line {i}\n"));
        std::thread::sleep(delay);
    }
    content
}

/// Reads `lines` lines of a make-believe slow file, pausing `delay` per line, right here on the
/// caller's thread.  Nothing else scheduled on this thread moves until it is done.
#[tracing::instrument]
pub fn bad_load_file(lines: usize, delay: Duration) -> String {
    let content = read_lines(lines, delay);
    tracing::trace!("Read {} bytes while blocking.", content.len());
    content
}

/// The same slow read, moved to the blocking pool.  The caller awaits the result and is free to
/// serve other tasks in the meantime.
#[tracing::instrument]
pub async fn good_load_file(lines: usize, delay: Duration) -> Outcome<String> {
    let content = tokio::task::spawn_blocking(move || read_lines(lines, delay)).await?;
    tracing::trace!("Read {} bytes off the caller's thread.", content.len());
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_read_returns_every_line() {
        let content = bad_load_file(3, Duration::ZERO);
        assert_eq!(
            content,
            "This is the content of line 1\nThis is the content of line 2\nThis is the content of line 3\n"
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn good_read_leaves_the_caller_free() -> Outcome<()> {
        let ticks = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = {
            let ticks = std::sync::Arc::clone(&ticks);
            tokio::spawn(async move {
                loop {
                    ticks.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            })
        };
        let content = good_load_file(4, Duration::from_millis(25)).await?;
        counter.abort();
        assert_eq!(content.lines().count(), 4);
        // the single caller thread kept ticking while the file was read
        assert!(ticks.load(std::sync::atomic::Ordering::SeqCst) > 3);
        Ok(())
    }
}
