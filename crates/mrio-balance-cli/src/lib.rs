pub mod balance;
pub mod cli;
pub mod util;
