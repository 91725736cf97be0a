//! Built-in fallback content.
//!
//! Served whenever the model is unavailable or its output cannot be used, so
//! everything here must satisfy the quiz and lesson invariants on its own.

use crate::domain::{Lesson, LessonSection, QuizQuestion};
use crate::topics::topic_title;

fn question(q: &str, options: [&str; 4], answer: &str, explanation: &str) -> QuizQuestion {
  QuizQuestion {
    question: q.into(),
    options: options.iter().map(|o| o.to_string()).collect(),
    correct_answer: answer.into(),
    explanation: explanation.into(),
  }
}

fn section(heading: &str, content: &str, emoji: &str) -> LessonSection {
  LessonSection { heading: heading.into(), content: content.into(), emoji: emoji.into() }
}

/// Topic-independent five-question quiz. Also the source for top-ups.
pub fn fallback_quiz() -> Vec<QuizQuestion> {
  vec![
    question(
      "How many planets are in our solar system?",
      ["7", "8", "9", "10"],
      "8",
      "There are 8 planets: Mercury, Venus, Earth, Mars, Jupiter, Saturn, Uranus, and Neptune!",
    ),
    question(
      "Which planet is known as the Red Planet?",
      ["Venus", "Mars", "Jupiter", "Saturn"],
      "Mars",
      "Mars looks red because of rusty iron in its soil!",
    ),
    question(
      "Which planet is closest to the Sun?",
      ["Venus", "Earth", "Mercury", "Mars"],
      "Mercury",
      "Mercury is the closest planet to the Sun and also the smallest planet!",
    ),
    question(
      "What is the largest planet in our solar system?",
      ["Saturn", "Neptune", "Jupiter", "Uranus"],
      "Jupiter",
      "Jupiter is so big that over 1,300 Earths could fit inside it!",
    ),
    question(
      "Which planet has beautiful rings around it?",
      ["Mars", "Jupiter", "Saturn", "Neptune"],
      "Saturn",
      "Saturn has the most spectacular rings made of ice and rock!",
    ),
  ]
}

/// Hand-written lesson for the topic if one exists, otherwise the generic template.
pub fn fallback_lesson(topic: &str) -> Lesson {
  match topic {
    "moon" => Lesson {
      title: "Our Amazing Moon".into(),
      sections: vec![
        section(
          "Earth's Closest Neighbor",
          "The Moon is about 384,000 km away from Earth. It travels all the way around us about once every 27 days!",
          "🌙",
        ),
        section(
          "Why the Moon Changes Shape",
          "The Moon does not make its own light. We see the part lit by the Sun, and as the Moon moves around Earth that lit part grows and shrinks. These are called phases.",
          "🌓",
        ),
        section(
          "Footprints on the Moon",
          "In 1969 Neil Armstrong became the first person to walk on the Moon. There is no wind there, so astronaut footprints can last for millions of years!",
          "👣",
        ),
      ],
    },
    "mars" => Lesson {
      title: "Mars: The Red Planet".into(),
      sections: vec![
        section(
          "Why Mars Is Red",
          "Mars is covered in dust full of iron. When iron rusts it turns reddish, and that rusty dust makes the whole planet glow red in the sky.",
          "🔴",
        ),
        section(
          "Giant Mountains",
          "Mars has Olympus Mons, the tallest volcano in the solar system. It is almost three times taller than Mount Everest!",
          "🌋",
        ),
        section(
          "Robot Explorers",
          "Rovers like Curiosity and Perseverance drive across Mars taking pictures and studying rocks to learn if tiny life ever lived there.",
          "🤖",
        ),
      ],
    },
    _ => generic_lesson(topic),
  }
}

fn generic_lesson(topic: &str) -> Lesson {
  let name = topic_title(topic);
  Lesson {
    title: format!("Learning about {name}"),
    sections: vec![
      section(
        "Introduction",
        &format!("Let's explore the fascinating world of {name}! Space is full of wonders and exciting discoveries."),
        "🌌",
      ),
      section(
        "Why It Matters",
        &format!("{name} helps us understand how the universe works and our place in it."),
        "🚀",
      ),
      section(
        "Fun Fact",
        &format!("Scientists are still discovering new things about {name} every year!"),
        "✨",
      ),
    ],
  }
}
