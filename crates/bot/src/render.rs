//! Outgoing text. Everything user-visible is built here so the
//! dispatcher stays free of string formatting.

use platey_core::{EngineError, PlateRecord};

pub fn menu_prompt() -> String {
    "Выберите категорию номеров:".to_owned()
}

pub fn digit_prompt() -> String {
    "Введите цифры номера (например, последние цифры):".to_owned()
}

pub fn letter_prompt() -> String {
    "Введите буквы номера (кириллицей или латиницей):".to_owned()
}

pub fn page_size_prompt() -> String {
    "Сколько номеров показывать на странице? (от 1 до 100)".to_owned()
}

pub fn no_more_message() -> String {
    "✅ Все номера уже показаны.".to_owned()
}

pub fn no_matches_message() -> String {
    "😔 Ничего не найдено. Попробуйте другой запрос.".to_owned()
}

pub fn error_message(error: &EngineError) -> String {
    error.user_message().to_owned()
}

/// One record per line: plate and region, then the optional display
/// price and comment.
pub fn record_line(record: &PlateRecord) -> String {
    let mut parts = Vec::with_capacity(4);

    if record.region.is_empty() {
        parts.push(record.plate.clone());
    } else {
        parts.push(format!("{} {}", record.plate, record.region));
    }
    if !record.price.is_empty() {
        parts.push(record.price.clone());
    }
    if let Some(comment) = &record.comment {
        parts.push(comment.clone());
    }

    parts.join(" | ")
}

pub fn page_message(category_label: &str, records: &[PlateRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(format!("{category_label}:"));
    lines.extend(records.iter().map(record_line));
    lines.join("\n")
}

pub fn search_results_message(records: &[&PlateRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(format!("Найдено: {}", records.len()));
    lines.extend(records.iter().map(|record| record_line(record)));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use platey_core::{normalize, RawRow};

    use super::{page_message, record_line, search_results_message};

    #[test]
    fn record_line_skips_empty_fields() {
        let bare = normalize(RawRow::plate_only("А123ВС777")).expect("row");
        assert_eq!(record_line(&bare), "А123ВС777");

        let full = normalize(RawRow {
            plate: "М777МВ".to_owned(),
            region: "77".to_owned(),
            price: "990 000 ₽".to_owned(),
            comment: "торг".to_owned(),
        })
        .expect("row");
        assert_eq!(record_line(&full), "М777МВ 77 | 990 000 ₽ | торг");
    }

    #[test]
    fn page_message_is_label_then_one_line_per_record() {
        let first = normalize(RawRow::plate_only("А111АА")).expect("row");
        let second = normalize(RawRow::plate_only("В222ВВ")).expect("row");

        let text = page_message("🏍 Мото номера", &[first, second]);

        assert_eq!(text, "🏍 Мото номера:\nА111АА\nВ222ВВ");
    }

    #[test]
    fn search_results_lead_with_the_hit_count() {
        let record = normalize(RawRow::plate_only("Х001ХХ")).expect("row");
        let text = search_results_message(&[&record]);
        assert!(text.starts_with("Найдено: 1\n"));
    }
}
