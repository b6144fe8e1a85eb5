//! Gap, strength and weakness analysis over scored universes.
//!
//! Everything here reads [`UniverseResult`]s produced by the scoring engine; no score is
//! recomputed from answers.

use super::domain::{Profile, Universe};
use super::scoring::{round_percent, UniverseResult};
use serde::Serialize;

/// Spread above which a profile gap is reported.
pub const SIGNIFICANT_GAP: f64 = 20.0;
pub const STRENGTH_THRESHOLD: u8 = 70;
pub const WEAKNESS_THRESHOLD: u8 = 40;
/// Profiles at or below this score are listed for fallback weaknesses.
pub const FALLBACK_PROFILE_THRESHOLD: u8 = 50;
pub const FALLBACK_WEAKNESS_COUNT: usize = 3;
pub const MAX_HIGHLIGHTS: usize = 6;

/// Every profile sharing one extreme score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileGroup {
    pub profiles: Vec<Profile>,
    pub score: f64,
}

impl ProfileGroup {
    fn labels(&self) -> String {
        self.profiles
            .iter()
            .map(|profile| profile.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSpread {
    pub universe: Universe,
    pub magnitude: f64,
    pub highest: ProfileGroup,
    pub lowest: ProfileGroup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gap {
    pub universe: Universe,
    pub magnitude: f64,
    pub highest: ProfileGroup,
    pub lowest: ProfileGroup,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub universe: Universe,
    pub score: u8,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StrengthsAndWeaknesses {
    pub strengths: Vec<Highlight>,
    pub weaknesses: Vec<Highlight>,
}

fn spread_of(result: &UniverseResult) -> Option<ProfileSpread> {
    let scores: Vec<(Profile, f64)> = result
        .scores
        .iter()
        .map(|(profile, entry)| (*profile, entry.score))
        .collect();
    if scores.is_empty() {
        return None;
    }

    let max = scores
        .iter()
        .map(|(_, score)| *score)
        .fold(f64::NEG_INFINITY, f64::max);
    let min = scores
        .iter()
        .map(|(_, score)| *score)
        .fold(f64::INFINITY, f64::min);

    let group = |target: f64| ProfileGroup {
        profiles: scores
            .iter()
            .filter(|(_, score)| *score == target)
            .map(|(profile, _)| *profile)
            .collect(),
        score: target,
    };

    Some(ProfileSpread {
        universe: result.universe,
        magnitude: max - min,
        highest: group(max),
        lowest: group(min),
    })
}

/// Every universe with a non-zero spread between profiles, widest first.
pub fn compute_profile_spreads(results: &[UniverseResult]) -> Vec<ProfileSpread> {
    let mut spreads: Vec<ProfileSpread> = results
        .iter()
        .filter_map(spread_of)
        .filter(|spread| spread.magnitude > 0.0)
        .collect();
    spreads.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));
    spreads
}

/// Universes whose profile spread exceeds [`SIGNIFICANT_GAP`], in catalog order.
pub fn compute_gaps(results: &[UniverseResult]) -> Vec<Gap> {
    results
        .iter()
        .filter_map(spread_of)
        .filter(|spread| spread.magnitude > SIGNIFICANT_GAP)
        .map(|spread| {
            let description = format!(
                "Dans l'univers \"{}\", il existe un écart significatif de {}% entre {} {} ({}%) et {} {} ({}%).",
                spread.universe.label(),
                round_percent(spread.magnitude),
                profile_article(spread.highest.profiles.len()),
                spread.highest.labels(),
                round_percent(spread.highest.score),
                profile_article(spread.lowest.profiles.len()),
                spread.lowest.labels(),
                round_percent(spread.lowest.score),
            );

            Gap {
                universe: spread.universe,
                magnitude: spread.magnitude,
                highest: spread.highest,
                lowest: spread.lowest,
                description,
            }
        })
        .collect()
}

fn profile_article(count: usize) -> &'static str {
    if count > 1 {
        "les profils"
    } else {
        "le profil"
    }
}

struct UniverseAverage<'a> {
    result: &'a UniverseResult,
    score: u8,
}

impl UniverseAverage<'_> {
    fn concerned_profiles(&self, threshold: u8) -> Option<String> {
        let profiles: Vec<String> = self
            .result
            .scores
            .iter()
            .map(|(profile, entry)| (profile, round_percent(entry.score)))
            .filter(|(_, score)| *score <= threshold)
            .map(|(profile, score)| format!("{} ({score}%)", profile.label()))
            .collect();

        if profiles.is_empty() {
            None
        } else {
            Some(format!("Profils concernés : {}.", profiles.join(", ")))
        }
    }
}

fn with_profiles(sentence: String, profiles: Option<String>) -> String {
    match profiles {
        Some(profiles) => format!("{sentence} {profiles}"),
        None => sentence,
    }
}

/// Classifies universes by their rounded average.
///
/// Strengths are listed highest first and weaknesses lowest first. When nothing
/// qualifies as a weakness the three lowest universes are used instead; when nothing
/// qualifies as a strength the single highest universe is.
pub fn compute_strengths_and_weaknesses(results: &[UniverseResult]) -> StrengthsAndWeaknesses {
    let averages: Vec<UniverseAverage<'_>> = results
        .iter()
        .map(|result| UniverseAverage {
            result,
            score: round_percent(result.average()),
        })
        .collect();

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    for average in &averages {
        let label = average.result.universe.label();
        if average.score >= STRENGTH_THRESHOLD {
            strengths.push(Highlight {
                universe: average.result.universe,
                score: average.score,
                description: format!(
                    "L'univers \"{label}\" présente un niveau de maturité élevé avec un score moyen de {}%.",
                    average.score
                ),
            });
        } else if average.score <= WEAKNESS_THRESHOLD {
            weaknesses.push(Highlight {
                universe: average.result.universe,
                score: average.score,
                description: with_profiles(
                    format!(
                        "L'univers \"{label}\" nécessite une attention particulière avec un score moyen de {}%.",
                        average.score
                    ),
                    average.concerned_profiles(WEAKNESS_THRESHOLD),
                ),
            });
        }
    }

    if weaknesses.is_empty() {
        let mut lowest: Vec<&UniverseAverage<'_>> = averages.iter().collect();
        lowest.sort_by_key(|average| average.score);
        weaknesses = lowest
            .into_iter()
            .take(FALLBACK_WEAKNESS_COUNT)
            .map(|average| Highlight {
                universe: average.result.universe,
                score: average.score,
                description: with_profiles(
                    format!(
                        "L'univers \"{}\" présente un score de {}%.",
                        average.result.universe.label(),
                        average.score
                    ),
                    average.concerned_profiles(FALLBACK_PROFILE_THRESHOLD),
                ),
            })
            .collect();
    }

    if strengths.is_empty() {
        let highest = averages.iter().fold(None, |best: Option<&UniverseAverage<'_>>, current| {
            match best {
                Some(best) if current.score <= best.score => Some(best),
                _ => Some(current),
            }
        });

        if let Some(highest) = highest {
            strengths.push(Highlight {
                universe: highest.result.universe,
                score: highest.score,
                description: format!(
                    "L'univers \"{}\" présente le meilleur score avec {}%.",
                    highest.result.universe.label(),
                    highest.score
                ),
            });
        }
    }

    strengths.sort_by(|a, b| b.score.cmp(&a.score));
    weaknesses.sort_by_key(|highlight| highlight.score);
    strengths.truncate(MAX_HIGHLIGHTS);
    weaknesses.truncate(MAX_HIGHLIGHTS);

    StrengthsAndWeaknesses {
        strengths,
        weaknesses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::domain::{Answer, AnswerSet, Level};
    use crate::diagnostic::scoring::compute_universe_results;

    fn answers_for(levels: &[(Universe, [Level; 4])]) -> AnswerSet {
        levels
            .iter()
            .flat_map(|(universe, levels)| {
                Profile::ordered()
                    .into_iter()
                    .zip(levels.iter())
                    .map(|(profile, level)| Answer::new(*universe, profile, *level))
            })
            .collect()
    }

    fn uniform(level: Level) -> [Level; 4] {
        [level; 4]
    }

    #[test]
    fn gap_reports_every_profile_tied_at_the_extremes() {
        let answers = answers_for(&[(
            Universe::Agility,
            [Level::Expert, Level::Expert, Level::Intermediate, Level::Intermediate],
        )]);
        let results = compute_universe_results(&answers);

        let gaps = compute_gaps(&results);
        assert_eq!(gaps.len(), 1);
        let gap = &gaps[0];
        assert_eq!(gap.universe, Universe::Agility);
        assert_eq!(gap.magnitude, 50.0);
        assert_eq!(gap.highest.profiles, vec![Profile::Leaders, Profile::Managers]);
        assert_eq!(
            gap.lowest.profiles,
            vec![Profile::SpecializedTeams, Profile::Employees]
        );
        assert!(gap.description.contains("écart significatif de 50%"));
        assert!(gap.description.contains("les profils Leaders, Managers (100%)"));
    }

    #[test]
    fn gap_of_sixty_between_tied_groups() {
        let mut results = compute_universe_results(&AnswerSet::new());
        let scores = &mut results[0].scores;
        for (profile, score) in Profile::ordered().into_iter().zip([100.0, 100.0, 40.0, 40.0]) {
            if let Some(entry) = scores.get_mut(&profile) {
                entry.score = score;
            }
        }

        let gaps = compute_gaps(&results);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].magnitude, 60.0);
        assert_eq!(gaps[0].highest.profiles.len(), 2);
        assert_eq!(gaps[0].lowest.profiles.len(), 2);
        assert_eq!(gaps[0].lowest.score, 40.0);
    }

    #[test]
    fn spreads_at_or_below_threshold_are_not_gaps() {
        let mut results = compute_universe_results(&AnswerSet::new());
        let data = results
            .iter_mut()
            .find(|result| result.universe == Universe::Data)
            .expect("data universe");
        for (profile, score) in Profile::ordered().into_iter().zip([60.0, 50.0, 40.0, 55.0]) {
            if let Some(entry) = data.scores.get_mut(&profile) {
                entry.score = score;
            }
        }

        assert!(compute_gaps(&results).is_empty());

        let spreads = compute_profile_spreads(&results);
        assert_eq!(spreads.len(), 1);
        assert_eq!(spreads[0].universe, Universe::Data);
        assert_eq!(spreads[0].magnitude, 20.0);
        assert_eq!(spreads[0].lowest.profiles, vec![Profile::SpecializedTeams]);
    }

    #[test]
    fn spreads_are_sorted_widest_first() {
        let answers = answers_for(&[
            (
                Universe::Agility,
                [Level::Advanced, Level::Intermediate, Level::Advanced, Level::Advanced],
            ),
            (
                Universe::Technology,
                [Level::Expert, Level::Beginner, Level::Advanced, Level::Advanced],
            ),
        ]);
        let spreads = compute_profile_spreads(&compute_universe_results(&answers));

        let order: Vec<Universe> = spreads.iter().map(|spread| spread.universe).collect();
        assert_eq!(order, vec![Universe::Technology, Universe::Agility]);
    }

    #[test]
    fn thresholds_classify_strengths_and_weaknesses() {
        let answers = answers_for(&[
            (Universe::DigitalTransformation, uniform(Level::Expert)),
            (Universe::Agility, uniform(Level::Advanced)),
            (Universe::Innovation, uniform(Level::Intermediate)),
            (Universe::CustomerExperience, uniform(Level::Intermediate)),
            (Universe::Technology, uniform(Level::Beginner)),
            (
                Universe::Data,
                [Level::Beginner, Level::Beginner, Level::Intermediate, Level::Advanced],
            ),
        ]);

        let summary = compute_strengths_and_weaknesses(&compute_universe_results(&answers));

        let strengths: Vec<(Universe, u8)> = summary
            .strengths
            .iter()
            .map(|highlight| (highlight.universe, highlight.score))
            .collect();
        assert_eq!(
            strengths,
            vec![(Universe::DigitalTransformation, 100), (Universe::Agility, 75)]
        );

        let weaknesses: Vec<(Universe, u8)> = summary
            .weaknesses
            .iter()
            .map(|highlight| (highlight.universe, highlight.score))
            .collect();
        assert_eq!(weaknesses, vec![(Universe::Technology, 25)]);
        assert!(summary.weaknesses[0]
            .description
            .contains("Profils concernés : Leaders (25%)"));
    }

    #[test]
    fn fallbacks_apply_when_no_universe_crosses_a_threshold() {
        let answers = answers_for(&[
            (
                Universe::DigitalTransformation,
                [Level::Advanced, Level::Intermediate, Level::Intermediate, Level::Intermediate],
            ),
            (Universe::Agility, uniform(Level::Intermediate)),
            (
                Universe::Innovation,
                [Level::Advanced, Level::Advanced, Level::Intermediate, Level::Intermediate],
            ),
            (
                Universe::CustomerExperience,
                [Level::Advanced, Level::Advanced, Level::Advanced, Level::Intermediate],
            ),
            (Universe::Technology, uniform(Level::Intermediate)),
            (
                Universe::Data,
                [Level::Advanced, Level::Intermediate, Level::Intermediate, Level::Intermediate],
            ),
        ]);

        let summary = compute_strengths_and_weaknesses(&compute_universe_results(&answers));

        assert_eq!(summary.strengths.len(), 1);
        assert_eq!(summary.strengths[0].universe, Universe::CustomerExperience);
        assert_eq!(summary.strengths[0].score, 69);

        let weaknesses: Vec<Universe> = summary
            .weaknesses
            .iter()
            .map(|highlight| highlight.universe)
            .collect();
        assert_eq!(
            weaknesses,
            vec![Universe::Agility, Universe::Technology, Universe::DigitalTransformation]
        );
        assert!(summary.weaknesses[0]
            .description
            .contains("Profils concernés : Leaders (50%)"));
    }

    #[test]
    fn fallback_strength_keeps_the_first_of_tied_universes() {
        let answers = answers_for(&[
            (Universe::Innovation, uniform(Level::Intermediate)),
            (Universe::Technology, uniform(Level::Intermediate)),
        ]);

        let summary = compute_strengths_and_weaknesses(&compute_universe_results(&answers));
        assert_eq!(summary.strengths.len(), 1);
        assert_eq!(summary.strengths[0].universe, Universe::Innovation);
    }

    #[test]
    fn empty_results_produce_no_highlights() {
        let summary = compute_strengths_and_weaknesses(&[]);
        assert_eq!(summary, StrengthsAndWeaknesses::default());
    }
}
