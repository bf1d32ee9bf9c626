//! Timestamp helper

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as Unix nanoseconds
pub fn unix_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_nanos() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_nanos_monotone_enough() {
        let a = unix_nanos();
        let b = unix_nanos();
        assert!(a > 0);
        assert!(b >= a);
    }
}
