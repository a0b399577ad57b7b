use chapterize::pipeline::toc::{parse_page_label, roman_to_int, scan_lines};

#[test]
fn roman_numerals() {
    assert_eq!(roman_to_int("XIV"), Some(14));
    assert_eq!(roman_to_int("IX"), Some(9));
    assert_eq!(roman_to_int("MCMXCIX"), Some(1999));
    assert_eq!(roman_to_int("iv"), Some(4));
    assert_eq!(roman_to_int(""), None);
    assert_eq!(roman_to_int("abc"), None);
}

#[test]
fn page_labels_prefer_integers() {
    assert_eq!(parse_page_label("12"), Some(12));
    assert_eq!(parse_page_label("xii"), Some(12));
    assert_eq!(parse_page_label("chapter"), None);
}

#[test]
fn dotted_leader_lines() {
    let entries = scan_lines("1. The First Chapter ............ 9\n");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "1. The First Chapter");
    assert_eq!(entries[0].page, 9);
}

#[test]
fn space_separated_lines_and_roman_labels() {
    let entries = scan_lines("Preface    iv\nIndex ......... 165\n");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].title, "Preface");
    assert_eq!(entries[0].page, 4);
    assert_eq!(entries[1].title, "Index");
    assert_eq!(entries[1].page, 165);
}

#[test]
fn wrapped_title_joins_previous_lines() {
    let text = "The Extremely Long and\nWinding Chapter Title ....... 25\n";
    let entries = scan_lines(text);
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].title,
        "The Extremely Long and Winding Chapter Title"
    );
    assert_eq!(entries[0].page, 25);
}

#[test]
fn buffer_clears_after_match() {
    let text = "Orphan line\nFirst ...... 3\nSecond ...... 7\n";
    let entries = scan_lines(text);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].title, "Orphan line First");
    assert_eq!(entries[1].title, "Second");
}

#[test]
fn non_matching_text_produces_nothing() {
    let entries = scan_lines("Plain prose with no page labels.\nAnother line.\n");
    assert!(entries.is_empty());
}
