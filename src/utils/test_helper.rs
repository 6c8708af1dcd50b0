//! various helper functions used to simplify unit tests.
//!
//! **Note**: This module is only compiled and used during testing.

#[cfg(test)]
pub mod test_helper {
    use log::Level;

    /// Compare all captured log messages of the given `level` with the expected messages (in order).
    pub fn check_logs(level: Level, expected_messages: &[&str]) {
        testing_logger::validate(|captured_logs| {
            let captured_logs: Vec<_> = captured_logs
                .iter()
                .filter(|l| l.level == level)
                .collect();
            assert_eq!(
                captured_logs.len(),
                expected_messages.len(),
                "captured: {:?}",
                captured_logs.iter().map(|l| &l.body).collect::<Vec<_>>()
            );
            for (log, expected) in captured_logs.iter().zip(expected_messages) {
                assert_eq!(log.body, *expected);
            }
        });
    }
    pub fn check_warnings(expected_warnings: &[&str]) {
        check_logs(Level::Warn, expected_warnings);
    }
}
