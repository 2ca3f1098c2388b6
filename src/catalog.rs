//! Built-in puzzle content: the quotes to sort and the four phase titles,
//! each tagged with the phase it belongs to.

use crate::types::{Item, ItemKind, Phase};

const QUOTES: &[(&str, &str, &str, Phase)] = &[
    ("prep-1", "Chance favors only the prepared mind.", "Louis Pasteur", Phase::Preparation),
    ("prep-2", "Research is formalized curiosity. It is poking and prying with a purpose.", "Zora Neale Hurston", Phase::Preparation),
    ("prep-3", "Give me six hours to chop down a tree and I will spend the first four sharpening the axe.", "Abraham Lincoln", Phase::Preparation),
    ("prep-4", "If I have seen further it is by standing on the shoulders of giants.", "Isaac Newton", Phase::Preparation),
    ("prep-5", "Before anything else, preparation is the key to success.", "Alexander Graham Bell", Phase::Preparation),
    ("prep-6", "I am always doing that which I cannot do, in order that I may learn how to do it.", "Pablo Picasso", Phase::Preparation),
    ("prep-7", "The more I learn, the more I realize how much I don't know.", "Albert Einstein", Phase::Preparation),
    ("inc-1", "Rest is not idleness.", "John Lubbock", Phase::Incubation),
    ("inc-2", "Almost everything will work again if you unplug it for a few minutes, including you.", "Anne Lamott", Phase::Incubation),
    ("inc-3", "Creativity is the residue of time wasted.", "Albert Einstein", Phase::Incubation),
    ("inc-4", "Your mind will answer most questions if you learn to relax and wait for the answer.", "William S. Burroughs", Phase::Incubation),
    ("inc-5", "The time you enjoy wasting is not wasted time.", "Bertrand Russell", Phase::Incubation),
    ("inc-6", "Adopt the pace of nature: her secret is patience.", "Ralph Waldo Emerson", Phase::Incubation),
    ("inc-7", "Never go to sleep without a request to your subconscious.", "Thomas Edison", Phase::Incubation),
    ("illu-1", "Eureka!", "Archimedes", Phase::Illumination),
    ("illu-2", "Creativity is just connecting things.", "Steve Jobs", Phase::Illumination),
    ("illu-3", "A moment's insight is sometimes worth a life's experience.", "Oliver Wendell Holmes Sr.", Phase::Illumination),
    ("illu-4", "Discovery consists of seeing what everybody has seen and thinking what nobody has thought.", "Albert Szent-Gyorgyi", Phase::Illumination),
    ("illu-5", "Inspiration exists, but it has to find you working.", "Pablo Picasso", Phase::Illumination),
    ("illu-6", "Intuition is the whisper of the soul.", "Jiddu Krishnamurti", Phase::Illumination),
    ("illu-7", "Everything you can imagine is real.", "Pablo Picasso", Phase::Illumination),
    ("ver-1", "Genius is one percent inspiration and ninety-nine percent perspiration.", "Thomas Edison", Phase::Verification),
    ("ver-2", "I have not failed. I've just found 10,000 ways that won't work.", "Thomas Edison", Phase::Verification),
    ("ver-3", "In God we trust; all others must bring data.", "W. Edwards Deming", Phase::Verification),
    ("ver-4", "The first principle is that you must not fool yourself, and you are the easiest person to fool.", "Richard Feynman", Phase::Verification),
    ("ver-5", "Trust, but verify.", "Russian proverb", Phase::Verification),
    ("ver-6", "Ideas are easy. Implementation is hard.", "Guy Kawasaki", Phase::Verification),
];

const TITLES: &[(&str, &str, Phase)] = &[
    ("title-preparation", "Preparation", Phase::Preparation),
    ("title-incubation", "Incubation", Phase::Incubation),
    ("title-illumination", "Illumination", Phase::Illumination),
    ("title-verification", "Verification", Phase::Verification),
];

/// Immutable item inventory with its answer key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    quotes: Vec<Item>,
    titles: Vec<Item>,
}

impl Catalog {
    /// Build a catalog from explicit lists. Kinds are normalized so that
    /// `quotes` only holds quotes and `titles` only holds titles.
    pub fn new(quotes: Vec<Item>, titles: Vec<Item>) -> Self {
        let quotes = quotes
            .into_iter()
            .map(|mut q| {
                q.kind = ItemKind::Quote;
                q
            })
            .collect();
        let titles = titles
            .into_iter()
            .map(|mut t| {
                t.kind = ItemKind::Title;
                t
            })
            .collect();
        Self { quotes, titles }
    }

    pub fn builtin() -> Self {
        Self {
            quotes: QUOTES
                .iter()
                .map(|(id, text, author, phase)| Item::quote(id, text, author, *phase))
                .collect(),
            titles: TITLES
                .iter()
                .map(|(id, text, phase)| Item::title(id, text, *phase))
                .collect(),
        }
    }

    pub fn quotes(&self) -> &[Item] {
        &self.quotes
    }

    pub fn titles(&self) -> &[Item] {
        &self.titles
    }

    pub fn quote(&self, id: &str) -> Option<&Item> {
        self.quotes.iter().find(|q| q.id == id)
    }

    pub fn title(&self, id: &str) -> Option<&Item> {
        self.titles.iter().find(|t| t.id == id)
    }

    /// Number of catalog pieces (a user entry adds one more per round)
    pub fn piece_count(&self) -> usize {
        self.quotes.len() + self.titles.len()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
