//! Closed taxonomy of contributor roles and the phrases that select them
//!
//! Plain authorship is not a role: a contributor without a role is an author.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-authorial function of a contributor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Translator,
    Afterword,
    Foreword,
    Introduction,
    Annotator,
    Commentator,
    Holder,
    Compiler,
    Founder,
    Collaborator,
    Organizer,
    CastMember,
    Composer,
    Producer,
    ExecutiveProducer,
    Writer,
    Cinematography,
    Director,
    Illustrator,
    Narrator,
}

use Role::*;

/// Context phrases mapped to roles, matched case-insensitively on the
/// whole (trimmed, colon-stripped) context tag
pub const ROLE_PHRASES: &[(&str, Role)] = &[
    ("translated by", Translator),
    ("translation by", Translator),
    ("translator", Translator),
    ("trans.", Translator),
    ("afterword by", Afterword),
    ("afterword", Afterword),
    ("foreword by", Foreword),
    ("foreword", Foreword),
    ("introduction by", Introduction),
    ("introduced by", Introduction),
    ("introduction", Introduction),
    ("annotated by", Annotator),
    ("annotations by", Annotator),
    ("annotator", Annotator),
    ("commentary by", Commentator),
    ("commentator", Commentator),
    ("held by", Holder),
    ("holder", Holder),
    ("assignee", Holder),
    ("compiled by", Compiler),
    ("compiler", Compiler),
    ("founded by", Founder),
    ("founder", Founder),
    ("in collaboration with", Collaborator),
    ("collaborator", Collaborator),
    ("organized by", Organizer),
    ("organised by", Organizer),
    ("organizer", Organizer),
    ("performed by", CastMember),
    ("starring", CastMember),
    ("actor", CastMember),
    ("cast member", CastMember),
    ("composed by", Composer),
    ("music by", Composer),
    ("composer", Composer),
    ("executive produced by", ExecutiveProducer),
    ("executive producer", ExecutiveProducer),
    ("produced by", Producer),
    ("producer", Producer),
    ("written by", Writer),
    ("screenplay by", Writer),
    ("writer", Writer),
    ("cinematography by", Cinematography),
    ("director of photography", Cinematography),
    ("cinematographer", Cinematography),
    ("directed by", Director),
    ("director", Director),
    ("illustrated by", Illustrator),
    ("illustrations by", Illustrator),
    ("illustrator", Illustrator),
    ("narrated by", Narrator),
    ("read by", Narrator),
    ("narrator", Narrator),
];

impl Role {
    pub const ALL: [Role; 20] = [
        Translator,
        Afterword,
        Foreword,
        Introduction,
        Annotator,
        Commentator,
        Holder,
        Compiler,
        Founder,
        Collaborator,
        Organizer,
        CastMember,
        Composer,
        Producer,
        ExecutiveProducer,
        Writer,
        Cinematography,
        Director,
        Illustrator,
        Narrator,
    ];

    /// Stable label used in serialized output
    pub fn label(self) -> &'static str {
        match self {
            Translator => "translator",
            Afterword => "afterword",
            Foreword => "foreword",
            Introduction => "introduction",
            Annotator => "annotator",
            Commentator => "commentator",
            Holder => "holder",
            Compiler => "compiler",
            Founder => "founder",
            Collaborator => "collaborator",
            Organizer => "organizer",
            CastMember => "cast-member",
            Composer => "composer",
            Producer => "producer",
            ExecutiveProducer => "executive-producer",
            Writer => "writer",
            Cinematography => "cinematography",
            Director => "director",
            Illustrator => "illustrator",
            Narrator => "narrator",
        }
    }

    /// Look up the role selected by a contributor context tag
    pub fn from_phrase(context: &str) -> Option<Role> {
        let normalized = normalize_phrase(context);
        if normalized.is_empty() {
            return None;
        }
        ROLE_PHRASES
            .iter()
            .find(|(phrase, _)| *phrase == normalized)
            .map(|(_, role)| *role)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn normalize_phrase(context: &str) -> String {
    context
        .trim()
        .trim_end_matches(':')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
