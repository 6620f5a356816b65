pub mod card;
pub mod input;
pub mod round;

pub use card::{InputSession, Phase, Solve};
pub use input::{Digit, KeypadEvent};
pub use round::Round;
