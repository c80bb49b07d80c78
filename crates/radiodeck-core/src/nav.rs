//! Category tabs, region visibility, description blocks and the slide menu.

use crate::feeds::Feed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    All,
    Feed(Feed),
}

impl Category {
    /// Tab order.
    pub const ALL: [Category; 6] = [
        Category::All,
        Category::Feed(Feed::Top),
        Category::Feed(Feed::Trending),
        Category::Feed(Feed::Voted),
        Category::Feed(Feed::Recent),
        Category::Feed(Feed::Podcast),
    ];

    pub const ALL_KEY: &'static str = "all";

    pub fn key(self) -> &'static str {
        match self {
            Category::All => Self::ALL_KEY,
            Category::Feed(f) => f.region_id(),
        }
    }

    pub fn from_key(key: &str) -> Option<Category> {
        if key == Self::ALL_KEY {
            Some(Category::All)
        } else {
            Feed::from_region_id(key).map(Category::Feed)
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Feed(Feed::Top) => "Top",
            Category::Feed(Feed::Trending) => "Trending",
            Category::Feed(Feed::Voted) => "Voted",
            Category::Feed(Feed::Recent) => "New",
            Category::Feed(Feed::Podcast) => "Podcasts",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    pub fn next(self) -> Category {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Category {
        let len = Self::ALL.len();
        Self::ALL[(self.position() + len - 1) % len]
    }
}

/// How cards are laid out inside visible regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardLayout {
    /// Several regions at once, each a short horizontal strip.
    Compact,
    /// One region as a full-height single-column list.
    Expanded,
}

/// A descriptive text block, keyed in parallel with the categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Description {
    pub key: &'static str,
    pub text: &'static str,
}

pub const DESCRIPTIONS: &[Description] = &[
    Description {
        key: "all",
        text: "Thousands of stations from around the world, free to play.",
    },
    Description {
        key: "top",
        text: "The stations listeners click on the most.",
    },
    Description {
        key: "trending",
        text: "What people started listening to a moment ago.",
    },
    Description {
        key: "voted",
        text: "Stations with the most votes from the community.",
    },
    Description {
        key: "added",
        text: "Stations that were added or updated most recently.",
    },
    Description {
        key: "podcast",
        text: "Talk, stories and shows tagged as podcasts.",
    },
];

#[derive(Debug, Clone)]
pub struct NavController {
    active: Category,
    layout: CardLayout,
    region_visible: [bool; 5],
    description_visible: Vec<bool>,
    menu_open: bool,
}

impl NavController {
    pub fn new(initial: Category) -> Self {
        let mut nav = Self {
            active: Category::All,
            layout: CardLayout::Compact,
            region_visible: [true; 5],
            description_visible: vec![false; DESCRIPTIONS.len()],
            menu_open: false,
        };
        nav.select(initial);
        nav
    }

    pub fn active(&self) -> Category {
        self.active
    }

    pub fn is_active(&self, category: Category) -> bool {
        self.active == category
    }

    pub fn layout(&self) -> CardLayout {
        self.layout
    }

    /// Activate one tab, deactivating its siblings.
    pub fn select(&mut self, category: Category) {
        self.active = category;
        match category {
            Category::All => {
                self.region_visible = [true; 5];
                self.layout = CardLayout::Compact;
            }
            Category::Feed(selected) => {
                for feed in Feed::ALL {
                    self.region_visible[feed_slot(feed)] = feed == selected;
                }
                self.layout = CardLayout::Expanded;
            }
        }
        let key = category.key();
        for (visible, desc) in self.description_visible.iter_mut().zip(DESCRIPTIONS) {
            *visible = desc.key == key;
        }
    }

    pub fn region_visible(&self, feed: Feed) -> bool {
        self.region_visible[feed_slot(feed)]
    }

    pub fn visible_regions(&self) -> Vec<Feed> {
        Feed::ALL
            .into_iter()
            .filter(|f| self.region_visible(*f))
            .collect()
    }

    /// Show every feed region; the active tab and layout are untouched.
    pub fn show_all_regions(&mut self) {
        self.region_visible = [true; 5];
    }

    pub fn hide_all_regions(&mut self) {
        self.region_visible = [false; 5];
    }

    pub fn description_visible(&self, key: &str) -> bool {
        DESCRIPTIONS
            .iter()
            .zip(&self.description_visible)
            .any(|(d, visible)| *visible && d.key == key)
    }

    pub fn visible_description(&self) -> Option<&'static str> {
        DESCRIPTIONS
            .iter()
            .zip(&self.description_visible)
            .find(|(_, visible)| **visible)
            .map(|(d, _)| d.text)
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn open_menu(&mut self) {
        self.menu_open = true;
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    /// A link inside the slide menu was chosen: select it and close.
    pub fn follow_menu_link(&mut self, category: Category) {
        self.select(category);
        self.close_menu();
    }
}

impl Default for NavController {
    fn default() -> Self {
        Self::new(Category::All)
    }
}

fn feed_slot(feed: Feed) -> usize {
    Feed::ALL.iter().position(|f| *f == feed).unwrap_or(0)
}
