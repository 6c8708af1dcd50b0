//! Module for additional helpers (unit macros, test helpers)
pub mod test_helper;
pub mod uom_macros;
