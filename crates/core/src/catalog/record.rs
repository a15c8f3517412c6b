use thiserror::Error;

/// A raw tabular row as handed over by a record source. Fields arrive as
/// plain strings; any of them may be blank or the placeholder token a
/// sheet uses for "no value".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRow {
    pub plate: String,
    pub region: String,
    pub price: String,
    pub comment: String,
}

impl RawRow {
    pub fn plate_only(plate: impl Into<String>) -> Self {
        Self { plate: plate.into(), ..Self::default() }
    }
}

/// An immutable catalog entry with its search keys precomputed at
/// normalize time. The keys are pure functions of `plate`/`region`; they
/// are rebuilt on every reload and never patched in place, which is why
/// they are not public fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlateRecord {
    pub plate: String,
    pub region: String,
    pub price: String,
    pub comment: Option<String>,
    digit_key: String,
    letter_key: String,
    raw_key: String,
}

impl PlateRecord {
    /// Decimal digits of the plate followed by the region string.
    pub fn digit_key(&self) -> &str {
        &self.digit_key
    }

    /// Upper-cased letters of the plate with the look-alike remap applied.
    pub fn letter_key(&self) -> &str {
        &self.letter_key
    }

    /// The un-stripped plate + region haystack used by the substring
    /// digit-search strategy, folded the same way as `letter_key`.
    pub fn raw_key(&self) -> &str {
        &self.raw_key
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("row has no plate value")]
    MissingPlate,
}

/// Turns a raw row into a `PlateRecord`. Only a missing plate is
/// malformed; every other field is optional and a placeholder token is
/// treated as empty, not as literal text.
pub fn normalize(row: RawRow) -> Result<PlateRecord, NormalizeError> {
    let plate = clean_field(&row.plate);
    if plate.is_empty() {
        return Err(NormalizeError::MissingPlate);
    }

    let region = clean_field(&row.region);
    let price = clean_field(&row.price);
    let comment = clean_field(&row.comment);
    let comment = (!comment.is_empty()).then_some(comment);

    let digit_key = format!("{}{}", digits_of(&plate), region);
    let letter_key = fold_letters(&plate);
    let raw_key = fold_text(&format!("{plate}{region}"));

    Ok(PlateRecord { plate, region, price, comment, digit_key, letter_key, raw_key })
}

/// Maps the 12 Cyrillic letters that share a glyph with Latin letters
/// onto their Latin counterparts. Russian plates only ever carry these
/// 12 dual-shape letters, so the remap is deliberately not a full
/// transliteration: any other Cyrillic letter passes through unchanged.
pub fn remap_lookalike(ch: char) -> char {
    match ch {
        'А' => 'A',
        'В' => 'B',
        'Е' => 'E',
        'К' => 'K',
        'М' => 'M',
        'Н' => 'H',
        'О' => 'O',
        'Р' => 'P',
        'С' => 'C',
        'Т' => 'T',
        'У' => 'Y',
        'Х' => 'X',
        other => other,
    }
}

/// Letters only, upper-cased and remapped. Digits and punctuation drop out.
pub(crate) fn fold_letters(input: &str) -> String {
    input
        .chars()
        .filter(|ch| ch.is_alphabetic())
        .flat_map(char::to_uppercase)
        .map(remap_lookalike)
        .collect()
}

/// Every character kept, upper-cased and remapped.
pub(crate) fn fold_text(input: &str) -> String {
    input.chars().flat_map(char::to_uppercase).map(remap_lookalike).collect()
}

fn digits_of(input: &str) -> String {
    input.chars().filter(|ch| ch.is_ascii_digit()).collect()
}

fn clean_field(value: &str) -> String {
    let trimmed = value.trim();
    if matches!(trimmed, "-" | "—") {
        return String::new();
    }
    trimmed.to_owned()
}
