use super::domain::{Level, Profile, Universe};
use serde::Serialize;

/// One selectable statement for a question.
#[derive(Debug, Clone, Serialize)]
pub struct Choice {
    pub text: &'static str,
    pub level: Level,
}

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub universe: Universe,
    pub profile: Profile,
    pub prompt: &'static str,
    pub choices: Vec<Choice>,
}

/// Ordered questionnaire: one question per universe and profile.
#[derive(Debug)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    pub fn standard() -> Self {
        Self {
            questions: standard_questions(),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, step: usize) -> Option<&Question> {
        self.questions.get(step)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions_for_universe(&self, universe: Universe) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|question| question.universe == universe)
            .collect()
    }
}

fn standard_questions() -> Vec<Question> {
    vec![
        Question {
            universe: Universe::DigitalTransformation,
            profile: Profile::Leaders,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos leaders à conduire la transformation digitale de l'entreprise ?",
            choices: vec![
                Choice {
                    text: "Nos leaders comprennent les opportunités digitales et inspirent la stratégie de transformation.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Nos leaders initient des projets pilotes digitaux pour expérimenter de nouvelles pistes de transformation.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos leaders développent une feuille de route digitale transformationnelle alignée avec la stratégie globale.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Nos leaders déploient la transformation digitale à grande échelle avec une mesurabilité claire des résultats attendus.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::DigitalTransformation,
            profile: Profile::Managers,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos managers à faciliter la transformation digitale de l'entreprise ?",
            choices: vec![
                Choice {
                    text: "Nos managers sont familiers avec les bonnes pratiques de transformation digitale et facilitent la mise en œuvre des premières initiatives.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les managers organisent leurs équipes pour l'implémentation des initiatives digitales, créant un environnement propice.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos managers alignent les processus numériques avec les objectifs de l'entreprise pour encourager la collaboration transversale.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Les managers gèrent le déploiement à grande échelle des initiatives digitales, en assurant cohérence et alignement entre les départements.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::DigitalTransformation,
            profile: Profile::SpecializedTeams,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos équipes spécialisées à appliquer la transformation digitale dans l'organisation ?",
            choices: vec![
                Choice {
                    text: "Nos équipes adoptent des outils digitaux pour renforcer la collaboration et la gestion de projets.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les équipes savent prototyper et expérimenter des projets pilotes de transformation digitale.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos équipes spécialisées automatisent les processus numériques et les optimisent continuellement.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Nos équipes déploient des solutions numériques avancées, en collaborant avec d'autres départements pour étendre l'automatisation.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::DigitalTransformation,
            profile: Profile::Employees,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos collaborateurs à intégrer les pratiques de transformation digitale dans leur travail quotidien ?",
            choices: vec![
                Choice {
                    text: "Nos collaborateurs sont sensibilisés à l'importance de la transformation digitale pour l'avenir de l'entreprise.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les collaborateurs utilisent des outils digitaux pour collaborer sur les projets.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos collaborateurs contribuent activement à l'optimisation des processus numériques internes.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Les collaborateurs participent à l'amélioration continue des initiatives de transformation digitale en proposant des idées.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::Agility,
            profile: Profile::Leaders,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos leaders à intégrer l'agilité dans la stratégie de transformation de l'entreprise ?",
            choices: vec![
                Choice {
                    text: "Nos leaders comprennent les principes de l'agilité et leur utilité dans la stratégie de transformation.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les leaders pilotent des initiatives agiles et adoptent un leadership favorable à l'agilité.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos leaders développent une stratégie agile globale pour intégrer la culture agile.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Les leaders déploient des pratiques agiles à grande échelle pour maximiser l'efficacité organisationnelle.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::Agility,
            profile: Profile::Managers,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos managers à coordonner les pratiques agiles au sein de l'organisation ?",
            choices: vec![
                Choice {
                    text: "Nos managers sont initiés aux pratiques agiles avec une bonne compréhension des concepts clés.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les managers organisent leurs équipes pour appliquer les pratiques agiles sur les projets.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos managers optimisent les processus agiles pour garantir une transition réussie en interne.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Les managers coordonnent des initiatives agiles multi-équipes, en assurant la cohérence entre les départements.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::Agility,
            profile: Profile::SpecializedTeams,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos équipes spécialisées à appliquer les méthodes agiles dans leurs projets ?",
            choices: vec![
                Choice {
                    text: "Nos équipes connaissent les pratiques agiles et utilisent des frameworks comme Scrum ou Kanban.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Nos équipes appliquent les méthodes agiles dans leurs projets quotidiens.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos équipes spécialisées optimisent les processus agiles grâce à des techniques d'automatisation.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Nos équipes déploient des pratiques agiles standardisées à grande échelle, en collaboration avec d'autres équipes.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::Agility,
            profile: Profile::Employees,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos collaborateurs à adopter les pratiques agiles dans leur quotidien ?",
            choices: vec![
                Choice {
                    text: "Nos collaborateurs comprennent les principes de base de l'agilité et leur impact sur l'entreprise.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les collaborateurs participent à des projets agiles en collaborant avec des équipes spécialisées.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos collaborateurs adoptent les pratiques agiles, participant activement aux rituels agiles.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Les collaborateurs soutiennent la transformation agile de l'entreprise en contribuant à l'amélioration continue.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::Innovation,
            profile: Profile::Leaders,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos leaders à promouvoir l'innovation dans l'entreprise ?",
            choices: vec![
                Choice {
                    text: "Nos leaders comprennent les opportunités d'innovation et encouragent une culture d'innovation.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Nos leaders pilotent des initiatives et programmes d'innovation pour promouvoir l'expérimentation.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos leaders structurent une feuille de route stratégique pour intégrer l'innovation dans la stratégie globale.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Nos leaders orchestrent des initiatives d'innovation à grande échelle en favorisant l'open innovation.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::Innovation,
            profile: Profile::Managers,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos managers à faciliter l'innovation au sein de leurs équipes ?",
            choices: vec![
                Choice {
                    text: "Nos managers supervisent les premières initiatives d'innovation avec efficacité.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les managers organisent des équipes pour expérimenter des pratiques innovantes et encourager le droit à l'erreur.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos managers alignent les processus d'innovation au sein de leurs équipes.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Les managers supervisent l'innovation à grande échelle, assurant l'alignement inter-départemental.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::Innovation,
            profile: Profile::SpecializedTeams,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos équipes spécialisées à contribuer activement à l'innovation ?",
            choices: vec![
                Choice {
                    text: "Nos équipes adoptent des pratiques d'innovation comme le Design Thinking et Lean Startup.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les équipes savent tester et mettre en œuvre des idées innovantes de bout en bout.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos équipes spécialisées optimisent les processus d'innovation pour innover en continu.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Nos équipes déploient des pratiques d'open innovation à grande échelle avec des partenaires externes.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::Innovation,
            profile: Profile::Employees,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos collaborateurs à adopter les pratiques d'innovation dans leur travail quotidien ?",
            choices: vec![
                Choice {
                    text: "Nos collaborateurs sont sensibilisés aux principes de base de l'innovation et à leur impact.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les collaborateurs participent à des initiatives d'innovation avec les outils disponibles.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos collaborateurs contribuent activement aux projets et processus d'innovation.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Les collaborateurs appliquent des pratiques d'innovation structurées dans leurs services et processus.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::CustomerExperience,
            profile: Profile::Leaders,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos leaders à intégrer l'expérience client dans la stratégie de l'entreprise ?",
            choices: vec![
                Choice {
                    text: "Nos leaders comprennent l'importance de l'expérience client et l'intègrent dans la vision globale.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les leaders encouragent des initiatives qui améliorent l'omnicanalité de l'expérience client.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos leaders sont capables de structurer une stratégie de personnalisation alignée à la stratégie d'entreprise.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Les leaders déploient des stratégies d'innovation centrées sur l'expérience client à grande échelle.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::CustomerExperience,
            profile: Profile::Managers,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos managers à gérer les initiatives d'expérience client ?",
            choices: vec![
                Choice {
                    text: "Nos managers pilotent les initiatives d'expérience client cross-canal pour garantir une expérience cohérente.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les managers organisent leurs équipes pour faciliter une expérience omnicanale et l'engagement client.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos managers coordonnent la personnalisation de l'expérience client à l'échelle en optimisant chaque point de contact.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Les managers supervisent la co-création avec des partenaires et clients pour des innovations d'expérience client.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::CustomerExperience,
            profile: Profile::SpecializedTeams,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos équipes spécialisées à optimiser l'expérience client ?",
            choices: vec![
                Choice {
                    text: "Nos équipes synchronisent les canaux digitaux pour offrir une expérience client cross-canal.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les équipes mettent en œuvre des pratiques d'automatisation et de personnalisation omnicanale pour chaque point de contact.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos équipes spécialisées possèdent l'expertise nécessaire pour personnaliser les parcours clients et automatiser les interactions.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Nos équipes collaborent activement avec des partenaires et clients pour co-créer des expériences client innovantes.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::CustomerExperience,
            profile: Profile::Employees,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos collaborateurs à contribuer à l'expérience client ?",
            choices: vec![
                Choice {
                    text: "Nos collaborateurs comprennent l'importance de l'expérience client et son impact.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les collaborateurs utilisent des outils digitaux pour assurer une cohérence omnicanale dans les interactions client.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos collaborateurs exploitent les outils et données dans leurs interactions, contribuant à la stratégie de personnalisation.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Les collaborateurs participent activement à la co-création avec les clients, en proposant des idées pour enrichir l'expérience client.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::Technology,
            profile: Profile::Leaders,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos leaders à guider l'intégration des technologies dans l'entreprise ?",
            choices: vec![
                Choice {
                    text: "Nos leaders comprennent l'impact stratégique des technologies émergentes.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les leaders supervisent des programmes expérimentaux en technologie et suivent leur performance.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos leaders structurent une vision technologique alignée avec la stratégie globale de l'entreprise.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Les leaders déploient des technologies avancées et industrialisent leur adoption à grande échelle.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::Technology,
            profile: Profile::Managers,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos managers à intégrer les technologies dans les processus métiers ?",
            choices: vec![
                Choice {
                    text: "Nos managers mettent en œuvre des solutions technologiques de base.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les managers optimisent l'intégration des technologies dans les processus métiers pour accroître l'efficacité.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos managers supervisent les équipes dans l'utilisation des technologies avancées.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Les managers pilotent la coordination des projets technologiques entre plusieurs départements.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::Technology,
            profile: Profile::SpecializedTeams,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos équipes spécialisées à appliquer et optimiser les technologies ?",
            choices: vec![
                Choice {
                    text: "Nos équipes se familiarisent avec les technologies de base pour améliorer les processus.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les équipes testent et appliquent des technologies avancées pour optimiser l'efficacité.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos équipes spécialisées automatisent les processus grâce aux technologies avancées.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Les équipes standardisent et intègrent les technologies à l'échelle de l'organisation.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::Technology,
            profile: Profile::Employees,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos collaborateurs à adopter et utiliser les technologies dans leur travail quotidien ?",
            choices: vec![
                Choice {
                    text: "Nos collaborateurs sont sensibilisés aux bases des technologies émergentes.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les collaborateurs utilisent des outils technologiques pour améliorer leur productivité quotidienne.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos collaborateurs contribuent activement à l'implémentation des technologies avancées.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Les collaborateurs soutiennent l'adoption des pratiques technologiques avancées dans leurs processus quotidiens.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::Data,
            profile: Profile::Leaders,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos leaders à orienter une stratégie data-driven pour l'entreprise ?",
            choices: vec![
                Choice {
                    text: "Nos leaders comprennent l'importance stratégique des données et les utilisent pour évaluer les performances.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les leaders initient des plans d'investissement pour centraliser et moderniser les données de l'entreprise.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos leaders structurent une stratégie data-driven en intégrant des modèles prédictifs pour soutenir les décisions.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Les leaders déploient des analyses avancées, basées sur l'IA, pour automatiser les décisions stratégiques à grande échelle.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::Data,
            profile: Profile::Managers,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos managers à intégrer l'usage des données dans les projets ?",
            choices: vec![
                Choice {
                    text: "Nos managers utilisent les données pour suivre les performances dans leurs projets.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les managers organisent et centralisent les données dans les processus métiers.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos managers testent des modèles prédictifs pour anticiper les besoins opérationnels.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Les managers coordonnent des opérations de data-driven à l'échelle, intégrant des analyses en temps réel.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::Data,
            profile: Profile::SpecializedTeams,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos équipes spécialisées à exploiter les données pour optimiser les opérations ?",
            choices: vec![
                Choice {
                    text: "Nos équipes se forment aux outils d'analyse pour interpréter des données de base.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les équipes collectent et analysent des données pour améliorer l'efficacité des opérations.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos équipes spécialisées automatisent les processus grâce à des analyses prédictives avancées.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Les équipes utilisent des analyses basées sur l'IA pour optimiser les opérations en temps réel.",
                    level: Level::Expert,
                },
            ],
        },
        Question {
            universe: Universe::Data,
            profile: Profile::Employees,
            prompt: "Quelle affirmation décrit le mieux la capacité de vos collaborateurs à utiliser les données dans leurs tâches quotidiennes ?",
            choices: vec![
                Choice {
                    text: "Nos collaborateurs comprennent l'importance des données et les utilisent pour améliorer leurs performances.",
                    level: Level::Beginner,
                },
                Choice {
                    text: "Les collaborateurs collectent et partagent des données dans leurs projets quotidiens.",
                    level: Level::Intermediate,
                },
                Choice {
                    text: "Nos collaborateurs appliquent des analyses basiques pour guider leurs décisions.",
                    level: Level::Advanced,
                },
                Choice {
                    text: "Les collaborateurs soutiennent l'intégration de données avancées dans les processus quotidiens.",
                    level: Level::Expert,
                },
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn standard_catalog_covers_every_universe_and_profile_once() {
        let catalog = QuestionCatalog::standard();
        assert_eq!(catalog.len(), 24);

        let pairs: HashSet<(Universe, Profile)> = catalog
            .questions()
            .iter()
            .map(|question| (question.universe, question.profile))
            .collect();
        assert_eq!(pairs.len(), 24);

        for universe in Universe::ordered() {
            let profiles: Vec<Profile> = catalog
                .questions_for_universe(universe)
                .into_iter()
                .map(|question| question.profile)
                .collect();
            assert_eq!(profiles, Profile::ordered().to_vec());
        }
    }

    #[test]
    fn catalog_follows_universe_order() {
        let catalog = QuestionCatalog::standard();
        let universes: Vec<Universe> = catalog
            .questions()
            .chunks(4)
            .map(|chunk| chunk[0].universe)
            .collect();
        assert_eq!(universes, Universe::ordered().to_vec());
    }

    #[test]
    fn every_question_offers_each_level_in_order() {
        let catalog = QuestionCatalog::standard();
        for question in catalog.questions() {
            let levels: Vec<Level> = question.choices.iter().map(|choice| choice.level).collect();
            assert_eq!(levels, Level::ordered().to_vec(), "{}", question.prompt);
        }
    }
}
