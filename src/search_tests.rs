use crate::error::ExplorerError;
use crate::models::*;
use crate::search::*;
use proptest::prelude::*;

fn found(step: SearchStep<'_>) -> Occurrence<'_> {
    match step {
        SearchStep::Found(occurrence) => occurrence,
        SearchStep::Terminal => panic!("expected an occurrence, got Terminal"),
    }
}

const FATIGUE: &str = "the patient felt very tired and weak every day";

#[test]
fn test_worked_example() {
    let occurrence = found(find_occurrence(Some(FATIGUE), "felt", Window::Bounded(2)).unwrap());
    assert_eq!(occurrence.snippet(), "the patient felt very tired");
    assert_eq!(occurrence.residual, " very tired and weak every day");

    let next = find_occurrence(Some(occurrence.residual), "felt", Window::Bounded(2)).unwrap();
    assert!(next.is_terminal());
}

#[test]
fn test_both_sides_truncated() {
    let occurrence = found(find_occurrence(Some(FATIGUE), "tired", Window::Bounded(2)).unwrap());
    assert_eq!(occurrence.left, vec!["felt", "very"]);
    assert_eq!(occurrence.phrase, vec!["tired"]);
    assert_eq!(occurrence.right, vec!["and", "weak"]);
}

#[test]
fn test_only_left_truncated() {
    let occurrence = found(find_occurrence(Some(FATIGUE), "every", Window::Bounded(3)).unwrap());
    assert_eq!(occurrence.snippet(), "tired and weak every day");
}

#[test]
fn test_multi_word_phrase() {
    let occurrence = found(
        find_occurrence(Some(FATIGUE), "very tired and", Window::Bounded(1)).unwrap(),
    );
    assert_eq!(occurrence.phrase, vec!["very", "tired", "and"]);
    assert_eq!(occurrence.snippet(), "felt very tired and weak");
}

#[test]
fn test_phrase_at_start_and_end() {
    let start = found(find_occurrence(Some(FATIGUE), "the patient", Window::Bounded(5)).unwrap());
    assert!(start.left.is_empty());
    assert_eq!(start.snippet(), "the patient felt very tired and weak");

    let end = found(find_occurrence(Some(FATIGUE), "every day", Window::Bounded(5)).unwrap());
    assert!(end.right.is_empty());
    assert_eq!(end.residual, "");
    assert_eq!(end.snippet(), "felt very tired and weak every day");
}

#[test]
fn test_window_zero_keeps_phrase() {
    let occurrence = found(find_occurrence(Some(FATIGUE), "tired", Window::Bounded(0)).unwrap());
    assert_eq!(occurrence.snippet(), "tired");
}

#[test]
fn test_window_all_never_truncates() {
    let occurrence = found(find_occurrence(Some(FATIGUE), "and", Window::All).unwrap());
    assert_eq!(occurrence.snippet(), FATIGUE);
}

#[test]
fn test_match_inside_word() {
    // Matching is by substring, so a phrase can end inside a longer word.
    let occurrence = found(find_occurrence(Some("feeling tiredness daily"), "tired", Window::Bounded(5)).unwrap());
    assert_eq!(occurrence.snippet(), "feeling tired ness daily");
    assert_eq!(occurrence.residual, "ness daily");
}

#[test]
fn test_terminal_cases() {
    assert!(find_occurrence(None, "tired", Window::All).unwrap().is_terminal());
    assert!(find_occurrence(Some(""), "tired", Window::All).unwrap().is_terminal());
    assert!(find_occurrence(Some(FATIGUE), "breathless", Window::All).unwrap().is_terminal());
    // Matching is case-sensitive against normalized text.
    assert!(find_occurrence(Some(FATIGUE), "Tired", Window::All).unwrap().is_terminal());
}

#[test]
fn test_empty_phrase_rejected() {
    assert!(matches!(
        find_occurrence(Some(FATIGUE), "", Window::All),
        Err(ExplorerError::EmptyQuery)
    ));
    assert!(matches!(
        occurrences(Some(FATIGUE), "", Window::All),
        Err(ExplorerError::EmptyQuery)
    ));
}

#[test]
fn test_whitespace_phrase_rejected() {
    assert!(matches!(
        find_occurrence(Some(FATIGUE), " ", Window::Bounded(5)),
        Err(ExplorerError::EmptyQuery)
    ));
    assert!(matches!(
        occurrences(Some(FATIGUE), "  ", Window::All),
        Err(ExplorerError::EmptyQuery)
    ));
    // Surrounding spaces are part of a non-blank phrase.
    assert!(!find_occurrence(Some(FATIGUE), " very", Window::All)
        .unwrap()
        .is_terminal());
}

#[test]
fn test_occurrences_walks_a_record() {
    let text = "pain pain and more pain";
    let snippets: Vec<String> = occurrences(Some(text), "pain", Window::Bounded(1))
        .unwrap()
        .map(|o| o.snippet())
        .collect();
    assert_eq!(snippets, vec!["pain pain", "pain and", "more pain"]);
}

#[test]
fn test_corpus_search_skips_non_matching_records() {
    let texts = [Some("sleep is poor"), None, Some("no issues"), Some("poor appetite and poor sleep")];
    let records = texts
        .iter()
        .enumerate()
        .map(|(index, text)| Record {
            index,
            raw: text
                .map(|t| FieldValue::Text(t.to_string()))
                .unwrap_or(FieldValue::Missing),
            normalized: text.map(str::to_string),
            metadata: RecordMetadata::default(),
        })
        .collect();
    let corpus = NormalizedCorpus::new("text".to_string(), String::new(), records);
    let query = Query::new("poor", Window::Bounded(10)).unwrap();

    let matches = search_all(&corpus, &query).unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].record.index, 0);
    assert_eq!(matches[0].snippets, vec!["sleep is poor"]);
    assert_eq!(matches[1].record.index, 3);
    assert_eq!(
        matches[1].snippets,
        vec!["poor appetite and poor sleep", "appetite and poor sleep"]
    );

    let mut lazy = search(&corpus, &query).unwrap();
    assert_eq!(lazy.next().map(|m| m.record.index), Some(0));
}

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}".prop_filter("must not contain the phrase", |w| !w.contains("zq"))
}

proptest! {
    #[test]
    fn exact_window_on_both_sides(
        left in prop::collection::vec(word(), 0..12),
        right in prop::collection::vec(word(), 0..12),
        window in 0usize..6,
    ) {
        prop_assume!(left.len() >= window && right.len() >= window);
        let text = left.iter().cloned()
            .chain(std::iter::once("zq".to_string()))
            .chain(right.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");

        let occurrence = match find_occurrence(Some(&text), "zq", Window::Bounded(window)).unwrap() {
            SearchStep::Found(o) => o,
            SearchStep::Terminal => panic!("phrase not found"),
        };
        prop_assert_eq!(occurrence.left.len(), window);
        prop_assert_eq!(occurrence.right.len(), window);
        prop_assert_eq!(&occurrence.left[..], &left[left.len() - window..]);
        prop_assert_eq!(&occurrence.right[..], &right[..window]);
    }

    #[test]
    fn k_occurrences_then_terminal(
        chunks in prop::collection::vec(prop::collection::vec(word(), 0..5), 1..6),
        window in prop_oneof![Just(Window::All), (0usize..4).prop_map(Window::Bounded)],
    ) {
        // k chunks of filler separated by k - 1 phrase occurrences.
        let k = chunks.len() - 1;
        let text = chunks
            .iter()
            .map(|chunk| chunk.join(" "))
            .collect::<Vec<_>>()
            .join(" zq ");

        let mut cursor = Some(text.as_str());
        let mut found_count = 0;
        loop {
            match find_occurrence(cursor, "zq", window).unwrap() {
                SearchStep::Found(o) => {
                    prop_assert!(o.residual.len() < cursor.map_or(0, str::len));
                    cursor = Some(o.residual);
                    found_count += 1;
                    prop_assert!(found_count <= k);
                }
                SearchStep::Terminal => break,
            }
        }
        prop_assert_eq!(found_count, k);
    }

    #[test]
    fn window_all_keeps_every_token(words in prop::collection::vec(word(), 1..20), at in 0usize..20) {
        let at = at % words.len();
        let phrase = words[at].clone();
        let text = words.join(" ");
        let occurrence = match find_occurrence(Some(&text), &phrase, Window::All).unwrap() {
            SearchStep::Found(o) => o,
            SearchStep::Terminal => panic!("phrase not found"),
        };
        let left_text = &text[..text.len() - occurrence.residual.len() - phrase.len()];
        prop_assert_eq!(occurrence.left.len(), left_text.split_whitespace().count());
        prop_assert_eq!(occurrence.right.len(), occurrence.residual.split_whitespace().count());
    }
}
