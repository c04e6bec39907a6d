//! Bounded snippet extraction (spec §4.2 `snippet`).

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Cut `s` to at most `max_chars`, preferring to land on a sentence
/// boundary above `0.6 * max_chars`, then a word boundary above
/// `0.8 * max_chars`, else a hard cut — always suffixed with an
/// ellipsis when truncation actually occurred.
pub fn snippet(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_chars {
        return s.to_string();
    }

    let sentence_floor = (max_chars as f64 * 0.6).floor() as usize;
    let word_floor = (max_chars as f64 * 0.8).floor() as usize;

    if let Some(cut) = last_sentence_boundary(&chars, max_chars, sentence_floor) {
        let mut out: String = chars[..cut].iter().collect();
        out.push('…');
        return out;
    }

    if let Some(cut) = last_word_boundary(&chars, max_chars, word_floor) {
        let mut out: String = chars[..cut].iter().collect();
        out.push('…');
        return out;
    }

    let mut out: String = chars[..max_chars].iter().collect();
    out.push('…');
    out
}

fn last_sentence_boundary(chars: &[char], max_chars: usize, floor: usize) -> Option<usize> {
    let window = &chars[..max_chars.min(chars.len())];
    for (i, c) in window.iter().enumerate().rev() {
        if SENTENCE_TERMINATORS.contains(c) && i + 1 > floor {
            return Some(i + 1);
        }
    }
    None
}

fn last_word_boundary(chars: &[char], max_chars: usize, floor: usize) -> Option<usize> {
    let window = &chars[..max_chars.min(chars.len())];
    for (i, c) in window.iter().enumerate().rev() {
        if c.is_whitespace() && i > floor {
            return Some(i);
        }
    }
    None
}
