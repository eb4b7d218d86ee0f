//! SQLite database for the Quartermaster ledger.

quartermaster_core::define_database!(LedgerDatabase, "Ledger database migrations complete");
