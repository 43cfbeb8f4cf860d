pub mod help;
pub mod pagetest;
pub mod ping;
pub mod poll;
pub mod reactpage;
