//! Vocabulary shared between the console logger and the engine side of the console.

pub mod color;
pub mod console;
pub mod log;
