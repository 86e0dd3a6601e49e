use serde::{Deserialize, Serialize};

use crate::error::EvalFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    pub fn messages(self) -> &'static Messages {
        match self {
            Locale::En => &EN,
            Locale::Ru => &RU,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Messages {
    pub title: &'static str,
    pub invalid_number: &'static str,
    pub calculation_failed: &'static str,
    pub server_side_caption: &'static str,
    pub today_count: &'static str,
    pub evaluating: &'static str,
}

impl Messages {
    pub fn describe(&self, failure: &EvalFailure) -> String {
        match failure {
            EvalFailure::InvalidInput => self.invalid_number.to_string(),
            EvalFailure::Service(message) => message.clone(),
            EvalFailure::Unavailable => self.calculation_failed.to_string(),
        }
    }
}

static EN: Messages = Messages {
    title: "Calculator",
    invalid_number: "Invalid number",
    calculation_failed: "Calculation error",
    server_side_caption: "Server-side computation",
    today_count: "Today",
    evaluating: "Evaluating…",
};

static RU: Messages = Messages {
    title: "Калькулятор",
    invalid_number: "Некорректное число",
    calculation_failed: "Ошибка вычисления",
    server_side_caption: "Серверные вычисления",
    today_count: "Сегодня",
    evaluating: "Вычисление…",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_text_is_shown_verbatim_in_every_locale() {
        let failure = EvalFailure::Service("Division by zero".to_string());
        assert_eq!(Locale::En.messages().describe(&failure), "Division by zero");
        assert_eq!(Locale::Ru.messages().describe(&failure), "Division by zero");
    }

    #[test]
    fn generic_failures_are_localized() {
        assert_eq!(
            Locale::Ru.messages().describe(&EvalFailure::Unavailable),
            "Ошибка вычисления"
        );
        assert_eq!(
            Locale::En.messages().describe(&EvalFailure::InvalidInput),
            "Invalid number"
        );
    }
}
