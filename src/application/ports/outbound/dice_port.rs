//! Dice port - injectable source of d20 rolls

/// Source of d20 results for saving throws
pub trait DiceRoller {
    /// A value in `1..=20`
    fn roll_d20(&mut self) -> i32;
}

impl<F> DiceRoller for F
where
    F: FnMut() -> i32,
{
    fn roll_d20(&mut self) -> i32 {
        self()
    }
}
