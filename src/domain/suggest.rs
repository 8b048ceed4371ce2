//! Heuristics turning free text recognized from a receipt into dish-name
//! suggestions.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

pub const MAX_SUGGESTIONS: usize = 15;

const STOP_WORDS: [&str; 11] = [
    "the", "and", "with", "sauce", "total", "subtotal", "tax", "tip", "amount", "price", "cost",
];

const CURRENCY_SYMBOLS: [char; 4] = ['$', '€', '£', '¥'];

static PLAIN_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d{2})?$").expect("valid number pattern"));

fn keep_word(word: &str) -> bool {
    word.chars().count() > 2
        && !PLAIN_NUMBER.is_match(word)
        && !word.starts_with(CURRENCY_SYMBOLS)
        && !STOP_WORDS.contains(&word.to_lowercase().as_str())
}

/// Cleans one line of receipt text, or returns `None` if nothing
/// dish-like survives.
pub fn clean_line(line: &str) -> Option<String> {
    let line = line.trim();
    let len = line.chars().count();
    if len <= 2 || len >= 50 {
        return None;
    }

    let cleaned = line
        .split_whitespace()
        .filter(|w| keep_word(w))
        .collect::<Vec<_>>()
        .join(" ");

    (cleaned.chars().count() > 2).then_some(cleaned)
}

/// Extracts up to [`MAX_SUGGESTIONS`] distinct dish names, in the order
/// they first appear.
pub fn suggest_dish_names(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.lines()
        .filter_map(clean_line)
        .filter(|name| seen.insert(name.clone()))
        .take(MAX_SUGGESTIONS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_lines() {
        let text = "THE BURGER JOINT\n\
                    Cheeseburger 12.50\n\
                    Fries with sauce $4.00\n\
                    Subtotal 16.50\n\
                    Tax 1.32\n\
                    TOTAL 17.82\n";
        let suggestions = suggest_dish_names(text);
        assert_eq!(suggestions, vec!["BURGER JOINT", "Cheeseburger", "Fries"]);
    }

    #[test]
    fn test_short_and_long_lines_dropped() {
        assert_eq!(clean_line("ab"), None);
        assert_eq!(clean_line("   "), None);
        let long = "Grilled ".repeat(7);
        assert!(long.trim().chars().count() >= 50);
        assert_eq!(clean_line(&long), None);
    }

    #[test]
    fn test_numbers_and_currency_dropped() {
        assert_eq!(clean_line("2 x Latte 4.50"), Some("Latte".to_string()));
        assert_eq!(clean_line("Espresso €2.10 ¥300 £1"), Some("Espresso".to_string()));
        // Three decimal places is not a price
        assert_eq!(clean_line("Item 1.234"), Some("Item 1.234".to_string()));
    }

    #[test]
    fn test_stop_words_case_insensitive() {
        assert_eq!(clean_line("Pasta WITH Sauce"), Some("Pasta".to_string()));
        assert_eq!(clean_line("Amount Price Cost"), None);
    }

    #[test]
    fn test_duplicates_collapsed() {
        let text = "Nachos 8.00\nNachos 8.00\nTacos 9.00";
        assert_eq!(suggest_dish_names(text), vec!["Nachos", "Tacos"]);
    }

    #[test]
    fn test_capped_at_fifteen() {
        let text: String = (0..40).map(|i| format!("Dish{i}\n")).collect();
        let suggestions = suggest_dish_names(&text);
        assert_eq!(suggestions.len(), MAX_SUGGESTIONS);
        assert_eq!(suggestions[0], "Dish0");
        assert_eq!(suggestions[14], "Dish14");
    }

    #[test]
    fn test_empty_text() {
        assert!(suggest_dish_names("").is_empty());
    }
}
