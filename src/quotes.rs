use rand::Rng;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

pub const QUOTES: [Quote; 10] = [
    Quote {
        text: "Your mind is a powerful thing. When you fill it with positive thoughts, your life will start to change.",
        author: "Unknown",
    },
    Quote {
        text: "The only way to do great work is to love what you do.",
        author: "Steve Jobs",
    },
    Quote {
        text: "In the midst of winter, I found there was, within me, an invincible summer.",
        author: "Albert Camus",
    },
    Quote {
        text: "The greatest glory in living lies not in never falling, but in rising every time we fall.",
        author: "Nelson Mandela",
    },
    Quote {
        text: "Your present circumstances don't determine where you can go; they merely determine where you start.",
        author: "Nido Qubein",
    },
    Quote {
        text: "You are never too old to set another goal or to dream a new dream.",
        author: "C.S. Lewis",
    },
    Quote {
        text: "The future belongs to those who believe in the beauty of their dreams.",
        author: "Eleanor Roosevelt",
    },
    Quote {
        text: "Peace is the result of retraining your mind to process life as it is, rather than as you think it should be.",
        author: "Wayne W. Dyer",
    },
    Quote {
        text: "Nothing is impossible. The word itself says 'I'm possible!'",
        author: "Audrey Hepburn",
    },
    Quote {
        text: "Your task is not to seek for love, but merely to seek and find all the barriers within yourself that you have built against it.",
        author: "Rumi",
    },
];

/// Quote of the day panel state. Starts on a random quote and reshuffles
/// every `interval`.
pub struct QuoteRotator {
    index: usize,
    interval: Duration,
    last_change: Instant,
}

impl QuoteRotator {
    pub fn new(interval: Duration) -> Self {
        QuoteRotator {
            index: rand::thread_rng().gen_range(0..QUOTES.len()),
            interval,
            last_change: Instant::now(),
        }
    }

    pub fn current(&self) -> Quote {
        QUOTES[self.index]
    }

    pub fn advance(&mut self) {
        self.index = (self.index + 1) % QUOTES.len();
        self.last_change = Instant::now();
    }

    /// Jumps to a random quote other than the current one.
    pub fn shuffle(&mut self) {
        let candidate = rand::thread_rng().gen_range(0..QUOTES.len());
        self.index = if candidate != self.index {
            candidate
        } else {
            (self.index + 1) % QUOTES.len()
        };
        self.last_change = Instant::now();
    }

    /// Shuffles if the interval has passed. Returns whether the quote changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last_change) >= self.interval {
            self.shuffle();
            true
        } else {
            false
        }
    }

    /// Time left before the next automatic change.
    pub fn until_next(&self, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.duration_since(self.last_change))
    }
}
