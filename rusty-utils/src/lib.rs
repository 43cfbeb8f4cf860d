/// Generic embed builders shared across commands.
pub mod embed;
/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';
/// Page math and page-sequence builders.
pub mod pages;
/// Typed argument converters and pure parser helpers.
pub mod parse;
/// Message and interaction response helpers.
pub mod respond;
/// Discord message surface for pagination sessions.
pub mod surface;
