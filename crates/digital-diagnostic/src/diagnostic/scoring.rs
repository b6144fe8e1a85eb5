use super::domain::{Answer, Level, Profile, Universe};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileScore {
    pub level: Level,
    pub score: f64,
}

impl ProfileScore {
    fn from_mean(score: f64) -> Self {
        Self {
            level: Level::from_score(score),
            score,
        }
    }
}

/// Per-profile scores for one universe, rebuilt from the full answer set every time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniverseResult {
    pub universe: Universe,
    pub scores: BTreeMap<Profile, ProfileScore>,
}

impl UniverseResult {
    /// Mean of the per-profile scores, 0 when there are none.
    pub fn average(&self) -> f64 {
        mean(self.scores.values().map(|entry| entry.score))
    }

    pub fn score_for(&self, profile: Profile) -> ProfileScore {
        self.scores
            .get(&profile)
            .copied()
            .unwrap_or_else(|| ProfileScore::from_mean(0.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlobalProfileEntry {
    pub universe: Universe,
    pub score: f64,
    pub level: Level,
}

/// Averages answer scores per `(universe, profile)` cell.
///
/// The output always holds every universe in catalog order with all four profiles;
/// cells without answers score 0 at `Beginner`.
pub fn compute_universe_results<'a, I>(answers: I) -> Vec<UniverseResult>
where
    I: IntoIterator<Item = &'a Answer>,
{
    let mut cells: HashMap<(Universe, Profile), (f64, usize)> = HashMap::new();
    for answer in answers {
        let cell = cells
            .entry((answer.universe, answer.profile))
            .or_insert((0.0, 0));
        cell.0 += answer.score();
        cell.1 += 1;
    }

    Universe::ordered()
        .into_iter()
        .map(|universe| {
            let scores = Profile::ordered()
                .into_iter()
                .map(|profile| {
                    let average = match cells.get(&(universe, profile)) {
                        Some(&(total, count)) if count > 0 => total / count as f64,
                        _ => 0.0,
                    };
                    (profile, ProfileScore::from_mean(average))
                })
                .collect();

            UniverseResult { universe, scores }
        })
        .collect()
}

/// One entry per universe: the mean of its profile scores and the level banded from it.
pub fn compute_global_profile(results: &[UniverseResult]) -> Vec<GlobalProfileEntry> {
    results
        .iter()
        .map(|result| {
            let score = result.average();
            GlobalProfileEntry {
                universe: result.universe,
                score,
                level: Level::from_score(score),
            }
        })
        .collect()
}

/// Mean over every `(universe, profile)` cell, not a mean of universe means.
pub fn overall_score(results: &[UniverseResult]) -> f64 {
    mean(
        results
            .iter()
            .flat_map(|result| result.scores.values().map(|entry| entry.score)),
    )
}

/// Round-half-up to a whole percentage, used wherever a score is displayed.
pub fn round_percent(score: f64) -> u8 {
    (score + 0.5).floor().clamp(0.0, 100.0) as u8
}

pub(crate) fn mean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (total, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(total, count), value| (total + value, count + 1));
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::domain::AnswerSet;

    fn single_expert_answer() -> AnswerSet {
        [Answer::new(Universe::Data, Profile::Leaders, Level::Expert)]
            .into_iter()
            .collect()
    }

    #[test]
    fn empty_answers_still_produce_the_full_grid() {
        let results = compute_universe_results(&AnswerSet::new());
        assert_eq!(results.len(), 6);

        for (result, universe) in results.iter().zip(Universe::ordered()) {
            assert_eq!(result.universe, universe);
            assert_eq!(result.scores.len(), 4);
            for entry in result.scores.values() {
                assert_eq!(entry.score, 0.0);
                assert_eq!(entry.level, Level::Beginner);
            }
        }
    }

    #[test]
    fn output_follows_catalog_order_not_insertion_order() {
        let answers = vec![
            Answer::new(Universe::Data, Profile::Employees, Level::Advanced),
            Answer::new(Universe::DigitalTransformation, Profile::Leaders, Level::Beginner),
        ];

        let results = compute_universe_results(&answers);
        let universes: Vec<Universe> = results.iter().map(|result| result.universe).collect();
        assert_eq!(universes, Universe::ordered().to_vec());
        assert_eq!(results[5].score_for(Profile::Employees).score, 75.0);
    }

    #[test]
    fn duplicate_raw_answers_are_averaged_per_cell() {
        let answers = vec![
            Answer::new(Universe::Agility, Profile::Managers, Level::Beginner),
            Answer::new(Universe::Agility, Profile::Managers, Level::Advanced),
        ];

        let results = compute_universe_results(&answers);
        let cell = results[1].score_for(Profile::Managers);
        assert_eq!(cell.score, 50.0);
        assert_eq!(cell.level, Level::Intermediate);
    }

    #[test]
    fn computing_twice_yields_identical_results() {
        let answers: AnswerSet = Universe::ordered()
            .into_iter()
            .zip(Level::ordered().into_iter().cycle())
            .map(|(universe, level)| Answer::new(universe, Profile::Managers, level))
            .collect();

        let first = compute_universe_results(&answers);
        let second = compute_universe_results(&answers);
        assert_eq!(first, second);
    }

    #[test]
    fn overall_score_is_the_mean_of_all_cells() {
        let results = compute_universe_results(&single_expert_answer());
        let overall = overall_score(&results);

        assert!((overall - 100.0 / 24.0).abs() < 1e-9);
        assert_eq!(round_percent(overall), 4);
    }

    #[test]
    fn global_profile_rebands_the_universe_mean() {
        let answers: AnswerSet = [
            Answer::new(Universe::Innovation, Profile::Leaders, Level::Expert),
            Answer::new(Universe::Innovation, Profile::Managers, Level::Expert),
            Answer::new(Universe::Innovation, Profile::SpecializedTeams, Level::Beginner),
            Answer::new(Universe::Innovation, Profile::Employees, Level::Beginner),
        ]
        .into_iter()
        .collect();

        let global = compute_global_profile(&compute_universe_results(&answers));
        assert_eq!(global.len(), 6);

        let innovation = global
            .iter()
            .find(|entry| entry.universe == Universe::Innovation)
            .expect("innovation entry");
        assert_eq!(innovation.score, 62.5);
        assert_eq!(innovation.level, Level::Advanced);

        let data = global.last().expect("data entry");
        assert_eq!(data.score, 0.0);
        assert_eq!(data.level, Level::Beginner);
    }

    #[test]
    fn round_percent_rounds_half_up() {
        assert_eq!(round_percent(4.1666), 4);
        assert_eq!(round_percent(62.5), 63);
        assert_eq!(round_percent(31.25), 31);
        assert_eq!(round_percent(0.0), 0);
        assert_eq!(round_percent(100.0), 100);
    }
}
