//! Word splitting for headings and CSS class names derived from column keys.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Upper,
    Lower,
    Digit,
    Separator,
}

fn classify(c: char) -> CharClass {
    if c.is_uppercase() {
        CharClass::Upper
    } else if c.is_numeric() {
        CharClass::Digit
    } else if c.is_alphabetic() {
        CharClass::Lower
    } else {
        CharClass::Separator
    }
}

/// Splits an identifier into words.
///
/// Non-alphanumeric characters separate words, and case or digit changes
/// start new ones: `"firstName"` gives `["first", "Name"]`, `"XMLHttp2"`
/// gives `["XML", "Http", "2"]`.
pub fn words(input: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut words = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &(pos, c)) in chars.iter().enumerate() {
        let class = classify(c);
        if class == CharClass::Separator {
            if let Some(s) = start.take() {
                words.push(&input[s..pos]);
            }
            continue;
        }

        let Some(s) = start else {
            start = Some(pos);
            continue;
        };

        let prev = classify(chars[i - 1].1);
        let next = chars.get(i + 1).map(|&(_, c)| classify(c));
        let boundary = match (prev, class) {
            (CharClass::Lower, CharClass::Upper) => true,
            (CharClass::Digit, CharClass::Upper | CharClass::Lower) => true,
            (CharClass::Upper | CharClass::Lower, CharClass::Digit) => true,
            // End of an acronym: "XMLHttp" splits before the "H".
            (CharClass::Upper, CharClass::Upper) => next == Some(CharClass::Lower),
            _ => false,
        };
        if boundary {
            words.push(&input[s..pos]);
            start = Some(pos);
        }
    }

    if let Some(s) = start {
        words.push(&input[s..]);
    }
    words
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `"firstName"` → `"First Name"`.
pub fn start_case(input: &str) -> String {
    words(input)
        .into_iter()
        .map(upper_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `"firstName"` → `"first-name"`.
pub fn kebab_case(input: &str) -> String {
    words(input)
        .into_iter()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Derives a column heading from its key.
///
/// Each dot-separated segment is start-cased and followed by a space, so
/// `"firstName"` becomes `"First Name "` and `"address.zipCode"` becomes
/// `"Address Zip Code "`.
pub fn heading_from_key(key: &str) -> String {
    key.split('.')
        .map(|segment| format!("{} ", start_case(segment)))
        .collect()
}

/// Turns a column key into a CSS-friendly class suffix: `"address.zipCode"`
/// → `"address-zip-code"`.
pub fn css_friendly(key: &str) -> String {
    key.split('.')
        .map(kebab_case)
        .collect::<Vec<_>>()
        .join("-")
}
