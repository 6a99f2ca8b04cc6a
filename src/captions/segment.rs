// CJK punctuation treated as wrap boundaries. A boundary stays attached to
// the end of the text before it.
const CJK_PUNCTUATION: &str = "\u{3002}\u{ff01}\u{ff1f}\u{ff0c}\u{3001}\u{ff1b}\u{ff1a}\u{2026}\u{2014}\u{00b7}\u{ff5e}\u{2018}\u{2019}\u{201c}\u{201d}\u{300c}\u{300d}\u{300e}\u{300f}\u{ff08}\u{ff09}\u{300a}\u{300b}\u{3008}\u{3009}\u{3010}\u{3011}\u{3014}\u{3015}";

fn is_cjk_punct(c: char) -> bool {
    CJK_PUNCTUATION.contains(c)
}

/// Split a caption into display lines of at most `max_length` characters.
///
/// The language mode is picked from the first character: an ASCII letter
/// selects Latin word wrapping, anything else the CJK punctuation-aware
/// wrap. A single atomic unit (one word, or the text between two
/// punctuation marks) longer than `max_length` is kept whole on its own
/// line rather than split. An empty caption yields no lines; callers treat
/// that as "no subtitle for this interval".
pub fn segment_caption(caption: &str, max_length: usize) -> Vec<String> {
    let Some(first) = caption.chars().next() else {
        return Vec::new();
    };
    if first.is_ascii_alphabetic() {
        segment_latin(caption, max_length)
    } else {
        segment_cjk(caption, max_length)
    }
}

fn segment_latin(caption: &str, max_length: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in caption.split_whitespace() {
        let word_len = word.chars().count();
        let joined_len = if current_len == 0 {
            word_len
        } else {
            current_len + 1 + word_len
        };
        if joined_len <= max_length {
            if current_len > 0 {
                current.push(' ');
            }
            current.push_str(word);
            current_len = joined_len;
        } else {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
            }
            current = word.to_string();
            current_len = word_len;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn segment_cjk(caption: &str, max_length: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for piece in split_keep_separator(caption) {
        let piece_len = piece.chars().count();
        if current_len + piece_len <= max_length {
            current.push_str(&piece);
            current_len += piece_len;
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }

        let mut chars = piece.chars();
        match chars.next() {
            // A line must not open with a dangling punctuation mark; hang
            // it off the previous line instead.
            Some(head) if is_cjk_punct(head) => {
                if let Some(last) = lines.last_mut() {
                    last.push(head);
                }
                current = chars.collect();
                current_len = piece_len - 1;
            }
            _ => {
                current = piece;
                current_len = piece_len;
            }
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        lines.push(trimmed.to_string());
    }
    lines
}

// Split at CJK punctuation, each mark its own piece, text between marks
// kept whole.
fn split_keep_separator(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if is_cjk_punct(c) {
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
            }
            pieces.push(c.to_string());
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

#[cfg(test)]
#[path = "../../tests/unit/captions/segment.rs"]
mod tests;
