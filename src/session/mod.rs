pub mod input;
pub mod reorder;
pub mod result;
pub mod typing;

pub use input::{Key, KeyInput, Modifiers};
pub use reorder::ReorderSession;
pub use result::{Session, TestStats};
pub use typing::{Phase, ScoringConfig, Transition, TypingSession};
