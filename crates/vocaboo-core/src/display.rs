//! Presentation helpers. Never used for comparisons.

/// Capitalize the first letter of every word, keeping spaces and hyphens.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for c in text.chars() {
        if c == '-' || c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            at_word_start = false;
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// "Card 3 / 10"
pub fn card_counter(position: usize, pass_len: usize) -> String {
    if pass_len == 0 {
        return "-".to_string();
    }
    format!("Card {} / {}", position + 1, pass_len)
}
