use serde::Serialize;

use super::analysis::{
    compute_gaps, compute_profile_spreads, compute_strengths_and_weaknesses, Gap, ProfileSpread,
    StrengthsAndWeaknesses,
};
use super::domain::{AnswerSet, CompanyInfo, Level, Profile, Universe};
use super::scoring::{
    compute_global_profile, compute_universe_results, overall_score, round_percent,
    UniverseResult,
};

/// Colour family the results screen uses for a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelTone {
    Error,
    Warning,
    Hex,
    Success,
}

impl LevelTone {
    pub const fn for_level(level: Level) -> Self {
        match level {
            Level::Beginner => LevelTone::Error,
            Level::Intermediate => LevelTone::Warning,
            Level::Advanced => LevelTone::Hex,
            Level::Expert => LevelTone::Success,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RadarPoint {
    pub profile: Profile,
    pub profile_label: &'static str,
    pub score: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct RadarSeries {
    pub universe: Universe,
    pub universe_label: &'static str,
    pub points: Vec<RadarPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileCell {
    pub universe: Universe,
    pub universe_label: &'static str,
    pub level: Level,
    pub level_label: &'static str,
    pub score: u8,
    pub tone: LevelTone,
}

/// One profile's scores across every universe.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileRow {
    pub profile: Profile,
    pub profile_label: &'static str,
    pub cells: Vec<ProfileCell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GlobalProfileView {
    pub universe: Universe,
    pub universe_label: &'static str,
    pub description: &'static str,
    pub score: u8,
    pub level: Level,
    pub level_label: &'static str,
    pub tone: LevelTone,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultsView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyInfo>,
    pub answered: usize,
    pub overall_score: u8,
    pub radar: Vec<RadarSeries>,
    pub profiles: Vec<ProfileRow>,
    pub global_profile: Vec<GlobalProfileView>,
    pub spreads: Vec<ProfileSpread>,
    pub gaps: Vec<Gap>,
    #[serde(flatten)]
    pub highlights: StrengthsAndWeaknesses,
    pub universe_results: Vec<UniverseResult>,
}

impl ResultsView {
    pub fn build(company: Option<&CompanyInfo>, answers: &AnswerSet) -> Self {
        let results = compute_universe_results(answers);

        let radar = results
            .iter()
            .map(|result| RadarSeries {
                universe: result.universe,
                universe_label: result.universe.label(),
                points: Profile::ordered()
                    .into_iter()
                    .map(|profile| RadarPoint {
                        profile,
                        profile_label: profile.label(),
                        score: round_percent(result.score_for(profile).score),
                    })
                    .collect(),
            })
            .collect();

        let profiles = Profile::ordered()
            .into_iter()
            .map(|profile| ProfileRow {
                profile,
                profile_label: profile.label(),
                cells: results
                    .iter()
                    .map(|result| {
                        let entry = result.score_for(profile);
                        ProfileCell {
                            universe: result.universe,
                            universe_label: result.universe.label(),
                            level: entry.level,
                            level_label: entry.level.label(),
                            score: round_percent(entry.score),
                            tone: LevelTone::for_level(entry.level),
                        }
                    })
                    .collect(),
            })
            .collect();

        let global_profile = compute_global_profile(&results)
            .into_iter()
            .map(|entry| GlobalProfileView {
                universe: entry.universe,
                universe_label: entry.universe.label(),
                description: entry.universe.description(),
                score: round_percent(entry.score),
                level: entry.level,
                level_label: entry.level.label(),
                tone: LevelTone::for_level(entry.level),
            })
            .collect();

        Self {
            company: company.cloned(),
            answered: answers.len(),
            overall_score: round_percent(overall_score(&results)),
            radar,
            profiles,
            global_profile,
            spreads: compute_profile_spreads(&results),
            gaps: compute_gaps(&results),
            highlights: compute_strengths_and_weaknesses(&results),
            universe_results: results,
        }
    }
}
