//! Built-in topic catalogue.
//!
//! `context` is the model-facing description inserted into quiz prompts;
//! the remaining fields are what the frontend shows on topic cards.

use serde::Serialize;

#[derive(Clone, Copy, Debug, Serialize)]
pub struct Topic {
  pub id: &'static str,
  pub title: &'static str,
  pub icon: &'static str,
  pub description: &'static str,
  #[serde(skip)]
  pub context: &'static str,
}

pub const TOPICS: &[Topic] = &[
  Topic {
    id: "solar-system",
    title: "Solar System",
    icon: "🪐",
    description: "Explore the 8 planets and our amazing Sun!",
    context: "planets, moons, asteroids, and the structure of our solar system",
  },
  Topic {
    id: "moon",
    title: "The Moon",
    icon: "🌙",
    description: "Learn about Earth's closest neighbor in space",
    context: "Earth's moon, phases, lunar surface, moon landing",
  },
  Topic {
    id: "mars",
    title: "Mars",
    icon: "🔴",
    description: "Discover the Red Planet and its mysteries",
    context: "Mars planet, rovers, Martian atmosphere and geology",
  },
  Topic {
    id: "stars",
    title: "Stars",
    icon: "⭐",
    description: "Find out how stars are born and shine",
    context: "star formation, life cycles, types of stars, constellations",
  },
  Topic {
    id: "galaxies",
    title: "Galaxies",
    icon: "🌌",
    description: "Journey through the Milky Way and beyond",
    context: "types of galaxies, Milky Way, galaxy formation and structure",
  },
  Topic {
    id: "black-holes",
    title: "Black Holes",
    icon: "🕳️",
    description: "Explore the most mysterious objects in space",
    context: "black holes, event horizons, gravitational pull, space-time",
  },
  Topic {
    id: "space-exploration",
    title: "Space Exploration",
    icon: "🚀",
    description: "Learn about astronauts, rockets, and missions",
    context: "spacecraft, astronauts, missions, ISS",
  },
  Topic {
    id: "astronomy-basics",
    title: "Astronomy Basics",
    icon: "🔭",
    description: "Start stargazing with telescopes and sky maps",
    context: "telescopes, observing space, basic astronomy concepts",
  },
];

pub fn find_topic(id: &str) -> Option<&'static Topic> {
  TOPICS.iter().find(|t| t.id == id)
}

/// Model-facing description; unknown topics are used verbatim.
pub fn topic_description(topic: &str) -> &str {
  find_topic(topic).map(|t| t.context).unwrap_or(topic)
}

/// Display title; unknown topics are used verbatim.
pub fn topic_title(topic: &str) -> &str {
  find_topic(topic).map(|t| t.title).unwrap_or(topic)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_topic_resolves_to_description() {
    assert_eq!(topic_description("mars"), "Mars planet, rovers, Martian atmosphere and geology");
    assert_eq!(topic_title("black-holes"), "Black Holes");
  }

  #[test]
  fn unknown_topic_passes_through() {
    assert_eq!(topic_description("comets and meteors"), "comets and meteors");
    assert_eq!(topic_title("comets"), "comets");
  }

  #[test]
  fn topic_ids_are_unique() {
    let mut ids: Vec<_> = TOPICS.iter().map(|t| t.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), TOPICS.len());
  }
}
