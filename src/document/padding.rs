//! Prefix filler computation
//!
//! A prefix is `" " + fill * n + " "`, where `n` keeps the combined width of
//! prefix and value equal to what it was before the update.

/// Default filler character
pub const DEFAULT_FILL: char = '.';

/// A computed prefix and whether the value had room for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    pub text: String,
    /// The new value was too long for the old width; the fill was clamped to zero
    pub overflow: bool,
}

/// Build the prefix for a value of `value_len` chars in a slot of `total_len` chars
pub fn prefix_for(total_len: usize, value_len: usize, fill: char) -> Prefix {
    let (repeat, overflow) = match total_len.checked_sub(value_len + 2) {
        Some(n) => (n, false),
        None => (0, true),
    };

    let mut text = String::with_capacity(repeat * fill.len_utf8() + 2);
    text.push(' ');
    text.extend(std::iter::repeat(fill).take(repeat));
    text.push(' ');

    Prefix { text, overflow }
}
