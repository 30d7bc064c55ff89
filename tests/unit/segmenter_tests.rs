/*!
 * Tests for transcript line segmentation
 */

use shortcap::captions::segment;

const SAMPLES: [&str; 5] = [
    "the quick brown fox jumps over the lazy dog",
    "So today we're going to talk about why ownership matters and how the borrow checker helps",
    "a bb ccc dddd eeeee ffffff ggggggg hhhhhhhh iiiiiiiii jjjjjjjjjj",
    "antidisestablishmentarianism is long, but pneumonoultramicroscopicsilicovolcanoconiosis is longer",
    "  leading and   trailing\twhitespace\n\n",
];

#[test]
fn test_segment_endToEndExample_shouldWrapGreedily() {
    let lines = segment("the quick brown fox jumps over the lazy dog", 10);
    let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]);
}

#[test]
fn test_segment_anyBudget_shouldRespectMaxLenExceptSingleWords() {
    for text in SAMPLES {
        for max_len in 1..=45 {
            for line in segment(text, max_len) {
                assert!(
                    line.char_len() <= max_len || line.word_count() == 1,
                    "line {:?} exceeds {} for {:?}",
                    line.text,
                    max_len,
                    text
                );
            }
        }
    }
}

#[test]
fn test_segment_anyBudget_shouldPreserveWordSequence() {
    for text in SAMPLES {
        let expected: Vec<&str> = text.split_whitespace().collect();
        for max_len in [1, 5, 10, 40, 500] {
            let lines = segment(text, max_len);
            let joined: Vec<String> = lines
                .iter()
                .flat_map(|l| l.text.split(' ').map(str::to_string).collect::<Vec<_>>())
                .collect();
            assert_eq!(joined, expected, "max_len {} for {:?}", max_len, text);
        }
    }
}

#[test]
fn test_segment_lines_shouldNotCarryStraySpaces() {
    for text in SAMPLES {
        for line in segment(text, 12) {
            assert_eq!(line.text.trim(), line.text);
            assert!(!line.text.contains("  "));
        }
    }
}

#[test]
fn test_segment_sameInput_shouldBeDeterministic() {
    assert_eq!(segment(SAMPLES[1], 17), segment(SAMPLES[1], 17));
}

#[test]
fn test_segment_fitsExactly_shouldStayOnOneLine() {
    let lines = segment("abc def", 7);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].text, "abc def");

    let lines = segment("abc def", 6);
    assert_eq!(lines.len(), 2);
}

#[test]
fn test_segment_indices_shouldBeSequential() {
    let lines = segment(SAMPLES[1], 15);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(line.index, i);
    }
}
