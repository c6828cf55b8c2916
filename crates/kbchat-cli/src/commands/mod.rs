pub mod ask;
pub mod diagnostics;
pub mod health;
