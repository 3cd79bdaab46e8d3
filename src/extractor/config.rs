use serde::{Deserialize, Serialize};

/// Keyword data driving event recognition and title resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Substring that marks a date as one of the home team's matches (default: "ЦСКА")
    pub home_team: String,

    /// Known opponents, checked in order; the first one found in the context wins
    pub opponents: Vec<String>,

    /// Characters of text inspected on each side of a date match (default: 100)
    pub context_chars: usize,

    /// Title used when the home team is present but no opponent is recognised
    pub generic_title: String,

    /// Title used when the home team is absent from the context
    pub venue_title: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            home_team: "ЦСКА".to_string(),
            opponents: [
                "Акрон",
                "Краснодар",
                "Балтика",
                "Спартак",
                "Крылья Советов",
                "Пари Нижний Новгород",
                "Оренбург",
                "Динамо",
                "Динамо Махачкала",
                "Сочи",
                "Ростов",
                "Зенит",
                "Локомотив",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            context_chars: 100,
            generic_title: "Матч ЦСКА".to_string(),
            venue_title: "Мероприятие на ВЭБ Арене".to_string(),
        }
    }
}
