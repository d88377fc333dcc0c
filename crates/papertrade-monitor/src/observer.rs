//! Ledger observer that reports published snapshots through `tracing`.

use papertrade_core::traits::LedgerObserver;
use papertrade_core::types::AccountSnapshot;

/// Emits one structured event per published snapshot.
#[derive(Debug, Clone)]
pub struct LoggingObserver {
    account_id: String,
}

impl LoggingObserver {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
        }
    }
}

impl LedgerObserver for LoggingObserver {
    fn on_snapshot(&self, snapshot: &AccountSnapshot, version: u64) {
        tracing::info!(
            target: "papertrade::ledger",
            account = %self.account_id,
            version,
            cash = %snapshot.cash(),
            equity = %snapshot.equity(),
            positions = snapshot.position_count(),
            orders = snapshot.orders().len(),
            "Snapshot published"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use papertrade_core::types::AccountSnapshot;
    use rust_decimal_macros::dec;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_logging_observer_emits_event() {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            LoggingObserver::new("portfolio").on_snapshot(&AccountSnapshot::new(dec!(250)), 7);
        });

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Snapshot published"));
        assert!(output.contains("\"version\":7"));
        assert!(output.contains("\"equity\":\"250\""));
        assert!(output.contains("papertrade::ledger"));
    }
}
