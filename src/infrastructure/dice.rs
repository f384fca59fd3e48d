//! Dice adapter backed by the thread-local RNG

use rand::Rng;

use crate::application::ports::outbound::DiceRoller;

/// Rolls a fair d20 with `rand::thread_rng`
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngRoller;

impl DiceRoller for ThreadRngRoller {
    fn roll_d20(&mut self) -> i32 {
        rand::thread_rng().gen_range(1..=20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolls_stay_on_the_die() {
        let mut roller = ThreadRngRoller;
        for _ in 0..200 {
            let roll = roller.roll_d20();
            assert!((1..=20).contains(&roll));
        }
    }
}
