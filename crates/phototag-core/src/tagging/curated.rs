//! Hand-maintained category phrases for zero-shot tagging.
//!
//! Order is significant: flattening the groups in declaration order gives the
//! category index order. Phrases are rendered through the configured prompt
//! template ("a photo of {}") before encoding, so they read as noun phrases.

/// A named group of related category phrases.
#[derive(Debug, Clone, Copy)]
pub struct CategoryGroup {
    pub name: &'static str,
    pub phrases: &'static [&'static str],
}

pub const CURATED_GROUPS: &[CategoryGroup] = &[
    CategoryGroup {
        name: "people",
        phrases: &[
            "portrait",
            "selfie",
            "group of people",
            "family",
            "child",
            "baby",
            "couple",
            "crowd",
            "smiling person",
            "elderly person",
        ],
    },
    CategoryGroup {
        name: "nature",
        phrases: &[
            "landscape",
            "mountain",
            "beach",
            "ocean",
            "lake",
            "river",
            "forest",
            "waterfall",
            "desert",
            "snow",
            "flowers",
            "sky",
            "clouds",
        ],
    },
    CategoryGroup {
        name: "urban",
        phrases: &[
            "city",
            "street",
            "skyline",
            "building",
            "architecture",
            "bridge",
            "night city",
            "graffiti",
            "market",
        ],
    },
    CategoryGroup {
        name: "animals",
        phrases: &[
            "dog",
            "cat",
            "bird",
            "horse",
            "fish",
            "insect",
            "wildlife",
            "pet",
            "farm animals",
        ],
    },
    CategoryGroup {
        name: "food",
        phrases: &[
            "food",
            "meal",
            "dessert",
            "coffee",
            "drinks",
            "fruit",
            "vegetables",
            "restaurant",
            "cooking",
            "baked goods",
        ],
    },
    CategoryGroup {
        name: "indoor/outdoor",
        phrases: &[
            "indoor scene",
            "outdoor scene",
            "living room",
            "kitchen",
            "bedroom",
            "office",
            "garden",
            "park",
        ],
    },
    CategoryGroup {
        name: "events",
        phrases: &[
            "wedding",
            "birthday party",
            "concert",
            "festival",
            "graduation",
            "holiday celebration",
            "fireworks",
            "meeting",
        ],
    },
    CategoryGroup {
        name: "sports",
        phrases: &[
            "sports",
            "soccer",
            "basketball",
            "running",
            "cycling",
            "swimming",
            "hiking",
            "skiing",
            "surfing",
            "gym workout",
        ],
    },
    CategoryGroup {
        name: "transport",
        phrases: &[
            "car",
            "bicycle",
            "motorcycle",
            "bus",
            "train",
            "airplane",
            "boat",
            "road",
            "airport",
        ],
    },
    CategoryGroup {
        name: "art",
        phrases: &[
            "painting",
            "drawing",
            "sculpture",
            "museum",
            "street art",
            "black and white photo",
            "abstract art",
            "music instrument",
        ],
    },
    CategoryGroup {
        name: "technology",
        phrases: &[
            "computer",
            "smartphone",
            "screenshot",
            "electronics",
            "robot",
            "document",
            "text",
        ],
    },
    CategoryGroup {
        name: "lighting",
        phrases: &[
            "sunset",
            "sunrise",
            "night",
            "golden hour",
            "silhouette",
            "bright daylight",
            "dark scene",
            "neon lights",
        ],
    },
    CategoryGroup {
        name: "travel",
        phrases: &[
            "travel",
            "landmark",
            "vacation",
            "hotel",
            "tourist attraction",
            "camping",
            "road trip",
            "cruise",
        ],
    },
];

/// All curated phrases flattened in category index order.
pub fn curated_phrases() -> impl Iterator<Item = &'static str> {
    CURATED_GROUPS
        .iter()
        .flat_map(|group| group.phrases.iter().copied())
}

/// Group name a curated phrase belongs to.
pub fn group_of(phrase: &str) -> Option<&'static str> {
    CURATED_GROUPS
        .iter()
        .find(|group| group.phrases.contains(&phrase))
        .map(|group| group.name)
}
