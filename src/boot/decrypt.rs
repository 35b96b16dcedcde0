//! Decrypt reveal: text resolves from random symbols, left to right.
//!
//! Each element owns its own `Decrypt` state. A tick advances the
//! iteration by 1/3; the first `floor(iteration)` glyphs show the original
//! text and every other glyph is redrawn from `SYMBOLS` on every frame.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::surface::DecryptTarget;

pub const SYMBOLS: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S',
    'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '@', '#',
    '$', '%', '&', '*',
];

/// Ticks per revealed glyph.
const TICKS_PER_GLYPH: usize = 3;

#[derive(Debug, Clone)]
pub struct Decrypt {
    original: Vec<char>,
    /// Iteration in thirds, kept integral so it never drifts.
    ticks: usize,
    finished: bool,
}

impl Decrypt {
    pub fn new(original: &str) -> Self {
        let original: Vec<char> = original.chars().collect();
        let finished = original.is_empty();
        Decrypt {
            original,
            ticks: 0,
            finished,
        }
    }

    pub fn iteration(&self) -> f64 {
        self.ticks as f64 / TICKS_PER_GLYPH as f64
    }

    /// Glyphs currently showing their true value.
    pub fn revealed(&self) -> usize {
        (self.ticks / TICKS_PER_GLYPH).min(self.original.len())
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn original(&self) -> String {
        self.original.iter().collect()
    }

    /// The text for the current iteration, with fresh random glyphs.
    pub fn frame<R: Rng>(&self, rng: &mut R) -> String {
        if self.finished {
            return self.original();
        }
        let revealed = self.revealed();
        self.original
            .iter()
            .enumerate()
            .map(|(i, &ch)| {
                if i < revealed {
                    ch
                } else {
                    SYMBOLS[rng.random_range(0..SYMBOLS.len())]
                }
            })
            .collect()
    }

    /// Advance one animation frame. Returns the text to display, or `None`
    /// once the animation has already completed.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> Option<String> {
        if self.finished {
            return None;
        }
        self.ticks += 1;
        if self.ticks >= self.original.len() * TICKS_PER_GLYPH {
            self.finished = true;
            return Some(self.original());
        }
        Some(self.frame(rng))
    }
}

/// The running reveal for every designated element. The host calls
/// `tick` once per animation frame until it returns `false`.
pub struct DecryptReveal {
    animations: Vec<(Box<dyn DecryptTarget>, Decrypt)>,
    rng: SmallRng,
}

impl DecryptReveal {
    /// Scramble every target and prepare its animation.
    pub fn start(targets: Vec<Box<dyn DecryptTarget>>, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let animations = targets
            .into_iter()
            .map(|mut target| {
                let decrypt = Decrypt::new(&target.original_text());
                target.set_text(&decrypt.frame(&mut rng));
                target.mark_decrypting();
                (target, decrypt)
            })
            .collect();
        DecryptReveal { animations, rng }
    }

    pub fn empty() -> Self {
        DecryptReveal::start(Vec::new(), 0)
    }

    /// Advance every unfinished animation by one frame. Returns whether
    /// any animation still needs frames.
    pub fn tick(&mut self) -> bool {
        let mut running = false;
        for (target, decrypt) in self.animations.iter_mut() {
            if let Some(text) = decrypt.tick(&mut self.rng) {
                target.set_text(&text);
            }
            running |= !decrypt.is_finished();
        }
        running
    }

    pub fn is_finished(&self) -> bool {
        self.animations.iter().all(|(_, d)| d.is_finished())
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

impl std::fmt::Debug for DecryptReveal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptReveal")
            .field("targets", &self.animations.len())
            .field("finished", &self.is_finished())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boot::mock::MockDecryptTarget;
    use proptest::prelude::*;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    #[test]
    fn converges_after_three_ticks_per_glyph() {
        let mut rng = rng();
        let mut d = Decrypt::new("HELLO");
        let mut last = None;
        for _ in 0..15 {
            last = d.tick(&mut rng);
        }
        assert_eq!(last.as_deref(), Some("HELLO"));
        assert!(d.is_finished());
        assert_eq!(d.tick(&mut rng), None);
    }

    #[test]
    fn still_running_one_tick_early() {
        let mut rng = rng();
        let mut d = Decrypt::new("HELLO");
        for _ in 0..14 {
            d.tick(&mut rng);
        }
        assert!(!d.is_finished());
        assert_eq!(d.revealed(), 4);
    }

    #[test]
    fn iteration_moves_in_thirds() {
        let mut rng = rng();
        let mut d = Decrypt::new("AB");
        d.tick(&mut rng);
        assert!((d.iteration() - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(d.revealed(), 0);
        d.tick(&mut rng);
        d.tick(&mut rng);
        assert_eq!(d.revealed(), 1);
    }

    #[test]
    fn scrambled_glyphs_come_from_the_alphabet() {
        let mut rng = rng();
        let d = Decrypt::new("portfolio");
        let frame = d.frame(&mut rng);
        assert_eq!(frame.chars().count(), 9);
        assert!(frame.chars().all(|c| SYMBOLS.contains(&c)));
    }

    #[test]
    fn empty_text_is_already_done() {
        let mut d = Decrypt::new("");
        assert!(d.is_finished());
        assert_eq!(d.tick(&mut rng()), None);
    }

    #[test]
    fn reveal_animates_targets_independently() {
        let short = MockDecryptTarget::new("JM");
        let long = MockDecryptTarget::new("PORTAFOLIO");
        let targets: Vec<Box<dyn DecryptTarget>> =
            vec![Box::new(short.clone()), Box::new(long.clone())];
        let mut reveal = DecryptReveal::start(targets, 7);
        assert_eq!(short.text().chars().count(), 2);
        assert!(short.is_decrypting());

        for _ in 0..6 {
            assert!(reveal.tick());
        }
        assert_eq!(short.text(), "JM");
        assert!(long.text().starts_with("PO"));
        assert_ne!(long.text(), "PORTAFOLIO");

        let mut ticks = 6;
        loop {
            ticks += 1;
            if !reveal.tick() {
                break;
            }
        }
        assert_eq!(ticks, 30);
        assert_eq!(long.text(), "PORTAFOLIO");
        assert!(reveal.is_finished());
    }

    proptest! {
        #[test]
        fn revealed_prefix_matches_original(text in "[a-z ]{1,24}", ticks in 0usize..80, seed in any::<u64>()) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut d = Decrypt::new(&text);
            let mut shown = d.frame(&mut rng);
            for _ in 0..ticks {
                match d.tick(&mut rng) {
                    Some(frame) => shown = frame,
                    None => break,
                }
            }
            let k = d.revealed();
            let original: Vec<char> = text.chars().collect();
            let shown: Vec<char> = shown.chars().collect();
            prop_assert_eq!(shown.len(), original.len());
            prop_assert_eq!(&shown[..k], &original[..k]);
            if d.is_finished() {
                prop_assert_eq!(&shown, &original);
            } else {
                prop_assert!(shown[k..].iter().all(|c| SYMBOLS.contains(c)));
            }
        }
    }
}
