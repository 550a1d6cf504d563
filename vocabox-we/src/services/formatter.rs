//! Translation display formatting
//!
//! Raw translation text arrives as one long line, typically a run of
//! part-of-speech tagged senses ("n. 苹果；v. 吃"). The formatter breaks it
//! into one line per part of speech and bounds each line to a display
//! width, cutting only at word boundaries. Pure and total: any input,
//! including empty, produces a string without error.

/// Maximum displayed characters per line (chars, not bytes, so CJK text
/// is never cut mid-character).
const MAX_DISPLAY_CHARS: usize = 20;

/// Part-of-speech abbreviations recognized in raw translation text.
/// Ordered longest-first so compound tags win over their prefixes
/// ("adj.comb" before "adj", "vt" before "v").
const POS_TAGS: &[&str] = &[
    "adj.comb", "modal", "comb", "prep", "pron", "conj", "adj", "adv", "aux", "art", "int", "num",
    "vt", "vi", "n", "v",
];

/// Characters that end a display cut: ASCII and fullwidth punctuation
/// plus any whitespace (checked separately).
const BOUNDARY_PUNCT: &[char] = &[
    ',', '.', ';', ':', '!', '?', '，', '。', '；', '、', '：', '！', '？',
];

/// A recognized POS tag occurrence inside the raw text.
struct TagMatch {
    tag: &'static str,
    /// Char index of the tag itself.
    tag_start: usize,
    /// Char index just past the tag and its optional trailing period.
    content_start: usize,
}

/// Format a raw translation string into a bounded, per-part-of-speech
/// multi-line display form.
pub fn format_translation(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = trimmed.chars().collect();
    let matches = find_tags(&chars);
    if matches.is_empty() {
        return truncate_display(trimmed);
    }

    let mut lines = Vec::new();
    for (k, m) in matches.iter().enumerate() {
        let content_end = matches
            .get(k + 1)
            .map(|next| next.tag_start)
            .unwrap_or(chars.len());
        let content: String = chars[m.content_start..content_end].iter().collect();
        let content = truncate_display(strip_leading_separators(&content));
        if content.is_empty() {
            continue;
        }
        lines.push(format!("{}. {}", m.tag, content));
    }

    if lines.is_empty() {
        truncate_display(trimmed)
    } else {
        lines.join("\n")
    }
}

/// Scan for POS tags. A tag counts only at string start or directly after
/// whitespace or a semicolon, and a bare tag glued to further Latin text
/// ("n" in "new") is part of a word, not a tag.
fn find_tags(chars: &[char]) -> Vec<TagMatch> {
    let mut matches = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let at_lead = i == 0 || {
            let prev = chars[i - 1];
            prev.is_whitespace() || prev == ';' || prev == '；'
        };
        if at_lead {
            if let Some((tag, content_start)) = match_tag_at(chars, i) {
                matches.push(TagMatch {
                    tag,
                    tag_start: i,
                    content_start,
                });
                i = content_start;
                continue;
            }
        }
        i += 1;
    }
    matches
}

/// Try to match one POS tag starting at `start`, longest tag first.
/// Returns the tag and the char index past it (and its optional period).
fn match_tag_at(chars: &[char], start: usize) -> Option<(&'static str, usize)> {
    for tag in POS_TAGS {
        let tag_len = tag.chars().count();
        let end = start + tag_len;
        if end > chars.len() {
            continue;
        }
        if !tag.chars().eq(chars[start..end].iter().copied()) {
            continue;
        }
        let has_period = chars.get(end) == Some(&'.');
        let after = if has_period { end + 1 } else { end };
        if !has_period {
            if let Some(next) = chars.get(after) {
                if next.is_ascii_alphanumeric() {
                    continue;
                }
            }
        }
        return Some((tag, after));
    }
    None
}

/// Bound `text` to the display width. Cuts at the first boundary character
/// at or after the limit so no word (or CJK character) is split; when no
/// boundary exists the cut is exactly at the limit. Trailing boundary
/// punctuation is stripped from the result.
fn truncate_display(text: &str) -> String {
    let trimmed = text.trim();
    let chars: Vec<char> = trimmed.chars().collect();

    let mut cut = chars.len();
    if chars.len() > MAX_DISPLAY_CHARS {
        cut = MAX_DISPLAY_CHARS;
        for (idx, c) in chars.iter().enumerate().skip(MAX_DISPLAY_CHARS) {
            if is_boundary(*c) {
                cut = idx;
                break;
            }
        }
    }

    let mut out: Vec<char> = chars[..cut].to_vec();
    while let Some(&last) = out.last() {
        if last.is_whitespace() || BOUNDARY_PUNCT.contains(&last) {
            out.pop();
        } else {
            break;
        }
    }
    out.into_iter().collect()
}

fn is_boundary(c: char) -> bool {
    c.is_whitespace() || BOUNDARY_PUNCT.contains(&c)
}

/// Drop separator punctuation and whitespace left over from the split at
/// the front of a content fragment.
fn strip_leading_separators(content: &str) -> &str {
    content.trim_start_matches(|c: char| c.is_whitespace() || BOUNDARY_PUNCT.contains(&c))
}
