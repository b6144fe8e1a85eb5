use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Qualitative competency band selected for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "Débutant")]
    Beginner,
    #[serde(rename = "Intermédiaire")]
    Intermediate,
    #[serde(rename = "Avancé")]
    Advanced,
    #[serde(rename = "Expert")]
    Expert,
}

impl Level {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Beginner,
            Self::Intermediate,
            Self::Advanced,
            Self::Expert,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Débutant",
            Self::Intermediate => "Intermédiaire",
            Self::Advanced => "Avancé",
            Self::Expert => "Expert",
        }
    }

    /// Numeric score attached to a level.
    pub const fn score(self) -> f64 {
        match self {
            Self::Beginner => 25.0,
            Self::Intermediate => 50.0,
            Self::Advanced => 75.0,
            Self::Expert => 100.0,
        }
    }

    /// Bands a score back into a level.
    ///
    /// Upper bounds are inclusive, so `25.0` stays `Beginner` and anything below it
    /// (including an empty cell's `0.0`) does too. This is not the inverse of
    /// [`Level::score`] for values between the bands.
    pub fn from_score(score: f64) -> Self {
        if score <= 25.0 {
            Self::Beginner
        } else if score <= 50.0 {
            Self::Intermediate
        } else if score <= 75.0 {
            Self::Advanced
        } else {
            Self::Expert
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Beginner => "Niveau initial - Connaissances de base",
            Self::Intermediate => "Niveau fonctionnel - Capacité à utiliser les outils",
            Self::Advanced => "Niveau opérationnel - Maîtrise des concepts et outils",
            Self::Expert => "Niveau stratégique - Leadership et innovation",
        }
    }
}

/// Competency domain covered by the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Universe {
    #[serde(rename = "Transformation Digitale")]
    DigitalTransformation,
    #[serde(rename = "Agilité")]
    Agility,
    #[serde(rename = "Innovation")]
    Innovation,
    #[serde(rename = "Expérience Client")]
    CustomerExperience,
    #[serde(rename = "Technologie")]
    Technology,
    #[serde(rename = "Data")]
    Data,
}

impl Universe {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::DigitalTransformation,
            Self::Agility,
            Self::Innovation,
            Self::CustomerExperience,
            Self::Technology,
            Self::Data,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DigitalTransformation => "Transformation Digitale",
            Self::Agility => "Agilité",
            Self::Innovation => "Innovation",
            Self::CustomerExperience => "Expérience Client",
            Self::Technology => "Technologie",
            Self::Data => "Data",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::DigitalTransformation => {
                "Capacité à piloter et accompagner la transformation digitale de l'organisation"
            }
            Self::Agility => {
                "Capacité à s'adapter rapidement aux changements et à innover en continu"
            }
            Self::Innovation => {
                "Capacité à générer et implémenter des idées nouvelles et créatives"
            }
            Self::CustomerExperience => {
                "Capacité à comprendre et améliorer l'expérience client à travers le digital"
            }
            Self::Technology => {
                "Capacité à comprendre et utiliser les technologies digitales pertinentes"
            }
            Self::Data => {
                "Capacité à collecter, analyser et exploiter les données pour la prise de décision"
            }
        }
    }
}

/// Organizational role a question is asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Profile {
    #[serde(rename = "Leaders")]
    Leaders,
    #[serde(rename = "Managers")]
    Managers,
    #[serde(rename = "Équipes Spécialisées")]
    SpecializedTeams,
    #[serde(rename = "Collaborateurs (Tous)")]
    Employees,
}

impl Profile {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Leaders,
            Self::Managers,
            Self::SpecializedTeams,
            Self::Employees,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Leaders => "Leaders",
            Self::Managers => "Managers",
            Self::SpecializedTeams => "Équipes Spécialisées",
            Self::Employees => "Collaborateurs (Tous)",
        }
    }
}

/// Contact and context details supplied before the questionnaire starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub sector: String,
}

impl CompanyInfo {
    /// Name and email are required before anything is persisted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }

        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        if !email.contains('@') {
            return Err(ValidationError::InvalidEmail(email.to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("company name is required")]
    MissingName,
    #[error("contact email is required")]
    MissingEmail,
    #[error("'{0}' is not a valid contact email")]
    InvalidEmail(String),
}

/// One recorded answer. The score is always derived from the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AnswerInput")]
pub struct Answer {
    pub universe: Universe,
    pub profile: Profile,
    pub level: Level,
    score: f64,
}

impl Answer {
    pub fn new(universe: Universe, profile: Profile, level: Level) -> Self {
        Self {
            universe,
            profile,
            level,
            score: level.score(),
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

// Any score sent along with an answer is ignored.
#[derive(Deserialize)]
struct AnswerInput {
    universe: Universe,
    profile: Profile,
    level: Level,
}

impl From<AnswerInput> for Answer {
    fn from(input: AnswerInput) -> Self {
        Self::new(input.universe, input.profile, input.level)
    }
}

/// Answers keyed by `(universe, profile)`; recording a pair twice keeps the latest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerSet {
    answers: BTreeMap<(Universe, Profile), Answer>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage key used when the set is serialized.
    pub fn key(universe: Universe, profile: Profile) -> String {
        format!("{}|{}", universe.label(), profile.label())
    }

    /// Upserts the answer, returning the one it replaced.
    pub fn record(&mut self, answer: Answer) -> Option<Answer> {
        self.answers.insert((answer.universe, answer.profile), answer)
    }

    pub fn get(&self, universe: Universe, profile: Profile) -> Option<&Answer> {
        self.answers.get(&(universe, profile))
    }

    pub fn remove(&mut self, universe: Universe, profile: Profile) -> Option<Answer> {
        self.answers.remove(&(universe, profile))
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Answer> {
        self.answers.values()
    }
}

impl FromIterator<Answer> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = Answer>>(iter: I) -> Self {
        let mut set = Self::new();
        for answer in iter {
            set.record(answer);
        }
        set
    }
}

impl<'a> IntoIterator for &'a AnswerSet {
    type Item = &'a Answer;
    type IntoIter = std::collections::btree_map::Values<'a, (Universe, Profile), Answer>;

    fn into_iter(self) -> Self::IntoIter {
        self.answers.values()
    }
}

impl Serialize for AnswerSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.answers.len()))?;
        for answer in self.answers.values() {
            map.serialize_entry(&Self::key(answer.universe, answer.profile), answer)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AnswerSet {
    // Keys are informational only; legacy documents used `universe-profile`.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Answer>::deserialize(deserializer)?;
        Ok(raw.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn level_scores_follow_the_fixed_table() {
        let scores: Vec<f64> = Level::ordered().into_iter().map(Level::score).collect();
        assert_eq!(scores, vec![25.0, 50.0, 75.0, 100.0]);
    }

    #[test]
    fn banding_keeps_upper_bounds_in_the_lower_band() {
        assert_eq!(Level::from_score(0.0), Level::Beginner);
        assert_eq!(Level::from_score(25.0), Level::Beginner);
        assert_eq!(Level::from_score(26.0), Level::Intermediate);
        assert_eq!(Level::from_score(50.0), Level::Intermediate);
        assert_eq!(Level::from_score(75.0), Level::Advanced);
        assert_eq!(Level::from_score(76.0), Level::Expert);
        assert_eq!(Level::from_score(100.0), Level::Expert);
    }

    #[test]
    fn scores_round_trip_through_banding() {
        for level in Level::ordered() {
            assert_eq!(Level::from_score(level.score()), level);
        }
    }

    #[test]
    fn answer_ignores_client_supplied_score() {
        let answer: Answer = serde_json::from_value(json!({
            "universe": "Data",
            "profile": "Leaders",
            "level": "Expert",
            "score": 0
        }))
        .expect("answer parses");

        assert_eq!(answer.score(), 100.0);
        assert_eq!(answer.universe, Universe::Data);
    }

    #[test]
    fn answer_set_keeps_last_write_per_pair() {
        let mut answers = AnswerSet::new();
        answers.record(Answer::new(Universe::Agility, Profile::Managers, Level::Beginner));
        let replaced =
            answers.record(Answer::new(Universe::Agility, Profile::Managers, Level::Expert));

        assert_eq!(answers.len(), 1);
        assert_eq!(replaced.map(|answer| answer.level), Some(Level::Beginner));
        assert_eq!(
            answers
                .get(Universe::Agility, Profile::Managers)
                .map(|answer| answer.level),
            Some(Level::Expert)
        );
    }

    #[test]
    fn answer_set_serializes_with_pair_keys() {
        let answers: AnswerSet = [Answer::new(
            Universe::CustomerExperience,
            Profile::SpecializedTeams,
            Level::Advanced,
        )]
        .into_iter()
        .collect();

        let value = serde_json::to_value(&answers).expect("serializes");
        let entry = &value["Expérience Client|Équipes Spécialisées"];
        assert_eq!(entry["level"], json!("Avancé"));
        assert_eq!(entry["score"], json!(75.0));

        let parsed: AnswerSet = serde_json::from_value(value).expect("parses back");
        assert_eq!(parsed, answers);
    }

    #[test]
    fn answer_set_accepts_legacy_keys() {
        let parsed: AnswerSet = serde_json::from_value(json!({
            "Data-Managers": { "universe": "Data", "profile": "Managers", "level": "Avancé", "score": 0 }
        }))
        .expect("legacy document parses");

        assert_eq!(
            parsed.get(Universe::Data, Profile::Managers).map(Answer::score),
            Some(75.0)
        );
    }

    #[test]
    fn company_info_requires_name_and_email() {
        let mut company = CompanyInfo {
            name: "Acme".to_string(),
            email: "contact@acme.fr".to_string(),
            size: "11-50".to_string(),
            sector: "tech".to_string(),
        };
        assert!(company.validate().is_ok());

        company.email = "   ".to_string();
        assert_eq!(company.validate(), Err(ValidationError::MissingEmail));

        company.email = "contact".to_string();
        assert!(matches!(
            company.validate(),
            Err(ValidationError::InvalidEmail(_))
        ));

        company.name = String::new();
        assert_eq!(company.validate(), Err(ValidationError::MissingName));
    }
}
