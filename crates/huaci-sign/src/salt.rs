use std::sync::atomic::{AtomicI64, Ordering};

/// Unix-millisecond salts, strictly increasing within one process.
///
/// Two calls landing in the same millisecond still get distinct salts.
#[derive(Debug, Default)]
pub struct SaltSource {
    last: AtomicI64,
}

impl SaltSource {
    pub const fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    pub fn next(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);

        now.max(previous + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salts_never_repeat() {
        let source = SaltSource::new();
        let mut previous = source.next();
        for _ in 0..1000 {
            let salt = source.next();
            assert!(salt > previous, "{salt} <= {previous}");
            previous = salt;
        }
    }

    #[test]
    fn salt_tracks_wall_clock() {
        let before = chrono::Utc::now().timestamp_millis();
        let salt = SaltSource::new().next();
        assert!(salt >= before);
    }
}
