//! Script generation: fixed AutoIt blocks, subtask fragments and assembly.

mod assembler;
mod subtasks;
pub mod template;

pub use assembler::{AssembleOptions, CompiledScript, assemble};
pub use subtasks::{SubtaskLease, SubtaskRegistry};
