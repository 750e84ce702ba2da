//! The clues players work through, one per level.

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Solved by scanning the badge of one of the listed players.
    UsernameList { answers: Vec<String> },
    /// Any badge solves it.
    AnyPerson,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub id: i64,
    pub html: String,
    pub kind: QuestionKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuestionSet {
    pub questions: Vec<Question>,
}

const BUILTIN_CLUES: [&str; 19] = [
    "Find someone who has a pet that is not a cat or a dog.",
    "Find someone who was born in a different country than you.",
    "Find someone who can say hello in at least three languages.",
    "Find someone who has run a marathon, or at least thought about it.",
    "Find someone who plays a musical instrument.",
    "Find someone whose first job was in a restaurant.",
    "Find someone who has the same favourite season as you.",
    "Find someone who has climbed a mountain.",
    "Find someone who reads more than ten books a year.",
    "Find someone who has never seen snow.",
    "Find someone who can juggle.",
    "Find someone who has met a famous person.",
    "Find someone who grows their own vegetables.",
    "Find someone who has been to more than five countries.",
    "Find someone who knows how to knit.",
    "Find someone who has the same birth month as you.",
    "Find someone who speaks the same first language as you.",
    "Find someone who can name all the planets in order.",
    "Find someone you have never talked to before.",
];

impl QuestionSet {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// A playable set for when no question file is configured. Every regular
    /// level accepts any badge, the metal hunt and the cauldron follow.
    pub fn builtin() -> Self {
        let mut questions: Vec<Question> = BUILTIN_CLUES
            .iter()
            .enumerate()
            .map(|(idx, clue)| Question {
                id: idx as i64 + crate::STARTING_LEVEL,
                html: format!("<p>{clue}</p><p>Scan their badge once you found them.</p>"),
                kind: QuestionKind::AnyPerson,
            })
            .collect();

        questions.push(Question {
            id: crate::METAL_GRAB_LEVEL,
            html: "<p>Time to make bronze! Scan other players to grab the metals you are still missing.</p>".to_owned(),
            kind: QuestionKind::AnyPerson,
        });
        questions.push(Question {
            id: crate::METAL_GRAB_LEVEL + 1,
            html: "<p>You have all four metals. Bring them to the cauldron and scan it.</p>".to_owned(),
            kind: QuestionKind::UsernameList {
                answers: vec!["cauldron".to_owned()],
            },
        });
        questions.push(Question {
            id: crate::VICTORY_LEVEL,
            html: "<p>You won! Enjoy the rest of the party.</p>".to_owned(),
            kind: QuestionKind::AnyPerson,
        });

        Self { questions }
    }

    pub fn get(&self, level: i64) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == level)
    }

    pub fn clue_html(&self, level: i64) -> Option<&str> {
        self.get(level).map(|q| q.html.as_str())
    }
}
