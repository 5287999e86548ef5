//! Section segmentation: blank-line paragraphs, falling back to groups of
//! sentences when the text is a single paragraph.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::patterns::SENTENCE_BREAK;
use crate::schema::section::Section;

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("paragraph break pattern is valid"));

/// Fewest sentences per section in the sentence fallback. Sentences are
/// spread evenly, so sections hold four or five wherever the count allows
/// it (6, 7 and 11 sentences do not) and the longer sections come last.
pub const SENTENCES_PER_SECTION: usize = 4;

/// Split text into sections. Never returns an empty list: empty input
/// yields a single empty section at offset 0.
pub fn segment(text: &str) -> Vec<Section<'_>> {
    let paragraphs = split_paragraphs(text);
    if paragraphs.len() > 1 {
        return into_sections(text, &paragraphs);
    }
    let groups = group_sentences(&split_sentences(text));
    if groups.len() > 1 {
        return into_sections(text, &groups);
    }
    vec![Section {
        index: 0,
        text,
        start_offset: 0,
    }]
}

/// Start offset of every section, indexed by section index.
pub fn section_offsets(sections: &[Section<'_>]) -> Vec<usize> {
    sections.iter().map(|s| s.start_offset).collect()
}

fn split_paragraphs(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    for sep in PARAGRAPH_BREAK.find_iter(text) {
        spans.push((start, sep.start()));
        start = sep.end();
    }
    spans.push((start, text.len()));
    spans
}

/// Sentence spans. Terminal punctuation stays with its sentence; the
/// whitespace after it is the separator. A trailing empty sentence
/// (text ending in whitespace) is dropped.
fn split_sentences(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    for brk in SENTENCE_BREAK.find_iter(text) {
        let whitespace = brk.as_str().trim_start_matches(['.', '!', '?']).len();
        spans.push((start, brk.end() - whitespace));
        start = brk.end();
    }
    if start < text.len() {
        spans.push((start, text.len()));
    }
    spans
}

fn group_sentences(sentences: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let count = (sentences.len() / SENTENCES_PER_SECTION).max(1);
    let base = sentences.len() / count;
    let longer = sentences.len() % count;

    let mut groups = Vec::with_capacity(count);
    let mut start = 0;
    for i in 0..count {
        let size = if i >= count - longer { base + 1 } else { base };
        let chunk = &sentences[start..start + size];
        if let (Some(first), Some(last)) = (chunk.first(), chunk.last()) {
            groups.push((first.0, last.1));
        }
        start += size;
    }
    groups
}

fn into_sections<'a>(text: &'a str, spans: &[(usize, usize)]) -> Vec<Section<'a>> {
    spans
        .iter()
        .enumerate()
        .map(|(index, &(start, end))| Section {
            index,
            text: &text[start..end],
            start_offset: start,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sections plus the whitespace between them must rebuild the input.
    fn assert_covers(text: &str, sections: &[Section<'_>]) {
        let mut cursor = 0;
        for section in sections {
            assert!(section.start_offset >= cursor);
            assert!(text[cursor..section.start_offset].trim().is_empty());
            assert_eq!(&text[section.start_offset..section.end_offset()], section.text);
            cursor = section.end_offset();
        }
        assert!(text[cursor..].trim().is_empty());
    }

    #[test]
    fn splits_on_blank_lines() {
        let text = "First paragraph.\n\nSecond one.\n   \nThird.";
        let sections = segment(text);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[1].text, "Second one.");
        assert_eq!(sections[2].text, "Third.");
        assert_covers(text, &sections);
    }

    #[test]
    fn single_paragraph_groups_sentences() {
        let text = "One. Two! Three? Four. Five. Six. Seven. Eight.";
        let sections = segment(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].text, "One. Two! Three? Four.");
        assert_eq!(sections[1].text, "Five. Six. Seven. Eight.");
        assert_covers(text, &sections);
    }

    #[test]
    fn single_leftover_sentence_joins_previous_group() {
        let text = "A one. A two. A three. A four. A five. A six. A seven. A eight. A nine.";
        let sections = segment(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].text, "A five. A six. A seven. A eight. A nine.");
        assert_covers(text, &sections);
    }

    #[test]
    fn groups_stay_between_four_and_five() {
        let text = (1..=14).map(|i| format!("S{i}.")).collect::<Vec<_>>().join(" ");
        let sections = segment(&text);
        let sizes: Vec<usize> = sections
            .iter()
            .map(|s| s.text.split_whitespace().count())
            .collect();
        assert_eq!(sizes, vec![4, 5, 5]);
        assert_covers(&text, &sections);
    }

    #[test]
    fn counts_that_cannot_split_evenly_never_go_below_four() {
        let seven = "A. B. C. D. E. F. G.";
        assert_eq!(segment(seven).len(), 1);

        let eleven = "A. B. C. D. E. F. G. H. I. J. K.";
        let sections = segment(eleven);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].text, "A. B. C. D. E.");
        assert_eq!(sections[1].text, "F. G. H. I. J. K.");
    }

    #[test]
    fn short_text_is_one_section() {
        let text = "Tom ran. Jerry hid.";
        let sections = segment(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].text, text);
    }

    #[test]
    fn empty_input_yields_one_empty_section() {
        let sections = segment("");
        assert_eq!(sections.len(), 1);
        assert!(sections[0].is_empty());
        assert_eq!(sections[0].start_offset, 0);
    }

    #[test]
    fn offsets_are_strictly_increasing() {
        let text = "One. Two. Three. Four. Five. Six. Seven. Eight. Nine. Ten.  ";
        let sections = segment(text);
        let offsets = section_offsets(&sections);
        assert!(offsets.windows(2).all(|w| w[0] < w[1]));
        assert_covers(text, &sections);
    }
}
