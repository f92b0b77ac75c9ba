//! Classical Abjad (Hisab al-Jummal) letter arithmetic.
//!
//! Assigns each Arabic letter its traditional numeric value and sums a text.
//! Diacritic marks never carry value and are stripped before summing, so the
//! computed value of a vocalized text equals that of its bare-letter form.

/// Abjad sum of the canonical Bismillah.
pub const BISMILLAH_SUM: u32 = 786;

/// Harakat and other combining marks that carry no Abjad value.
const DIACRITICS: &[char] = &[
    '\u{064B}', // fathatan
    '\u{064C}', // dammatan
    '\u{064D}', // kasratan
    '\u{064E}', // fatha
    '\u{064F}', // damma
    '\u{0650}', // kasra
    '\u{0651}', // shadda
    '\u{0652}', // sukun
    '\u{0653}', // maddah
    '\u{0654}', // hamza above
    '\u{0670}', // superscript alef
    '\u{0640}', // tatweel
];

/// Traditional value of a single letter; 0 for anything outside the Abjad set.
fn letter_value(c: char) -> u32 {
    match c {
        'ا' | 'أ' | 'إ' | 'آ' => 1,
        'ب' => 2,
        'ج' => 3,
        'د' => 4,
        'ه' | 'ة' => 5,
        'و' | 'ؤ' => 6,
        'ز' => 7,
        'ح' => 8,
        'ط' => 9,
        'ي' | 'ى' | 'ئ' => 10,
        'ك' => 20,
        'ل' => 30,
        'م' => 40,
        'ن' => 50,
        'س' => 60,
        'ع' => 70,
        'ف' => 80,
        'ص' => 90,
        'ق' => 100,
        'ر' => 200,
        'ش' => 300,
        'ت' => 400,
        'ث' => 500,
        'خ' => 600,
        'ذ' => 700,
        'ض' => 800,
        'ظ' => 900,
        'غ' => 1000,
        _ => 0,
    }
}

/// Strip diacritic marks, leaving bare letters.
pub fn strip_diacritics(text: &str) -> String {
    text.chars()
        .filter(|c| !DIACRITICS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Abjad value of a text.
pub fn value(text: &str) -> u32 {
    strip_diacritics(text).chars().map(letter_value).sum()
}

/// Whether the text is the Bismillah by Abjad sum (786).
pub fn validate_bismillah(text: &str) -> bool {
    value(text) == BISMILLAH_SUM
}
