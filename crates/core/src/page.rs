/// Zero-based page slice over an ordered sequence. A page past the end is
/// empty with `has_more = false`; the caller renders that as an explicit
/// "no more items" message rather than silence.
pub fn paginate<T>(items: &[T], page_index: usize, page_size: usize) -> (&[T], bool) {
    if page_size == 0 {
        return (&items[..0], false);
    }

    let start = page_index.saturating_mul(page_size);
    if start >= items.len() {
        return (&items[..0], false);
    }

    let end = (start + page_size).min(items.len());
    (&items[start..end], end < items.len())
}

/// Splits one rendered message into ordered transport-sized chunks. The
/// limit is counted in characters, never bytes, so Cyrillic text cannot
/// be split mid-scalar; concatenating the chunks reproduces the input
/// exactly. This is a transport-compatibility concern, orthogonal to
/// pagination: one page of records may still need several chunks.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 {
        return vec![text.to_owned()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }

    chunks.push(current);
    chunks
}

#[cfg(test)]
mod tests {
    use super::{chunk_text, paginate};

    #[test]
    fn pages_over_45_items_with_size_20() {
        let items: Vec<u32> = (0..45).collect();

        let (page, has_more) = paginate(&items, 0, 20);
        assert_eq!(page.len(), 20);
        assert!(has_more);

        let (page, has_more) = paginate(&items, 2, 20);
        assert_eq!(page.len(), 5);
        assert!(!has_more);

        let (page, has_more) = paginate(&items, 3, 20);
        assert!(page.is_empty());
        assert!(!has_more);
    }

    #[test]
    fn exact_multiple_has_no_phantom_page() {
        let items: Vec<u32> = (0..40).collect();

        let (page, has_more) = paginate(&items, 1, 20);
        assert_eq!(page.len(), 20);
        assert!(!has_more);
    }

    #[test]
    fn zero_page_size_yields_an_empty_page() {
        let items = [1, 2, 3];
        let (page, has_more) = paginate(&items, 0, 0);
        assert!(page.is_empty());
        assert!(!has_more);
    }

    #[test]
    fn chunks_9000_chars_into_4000_4000_1000() {
        let text = "x".repeat(9000);

        let chunks = chunk_text(&text, 4000);

        let lengths: Vec<usize> = chunks.iter().map(|chunk| chunk.chars().count()).collect();
        assert_eq!(lengths, vec![4000, 4000, 1000]);
    }

    #[test]
    fn chunk_concatenation_round_trips_exactly() {
        let text = "А123ВС777\n".repeat(37);

        let chunks = chunk_text(&text, 64);

        assert!(chunks.iter().all(|chunk| chunk.chars().count() <= 64));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        // Five two-byte Cyrillic scalars: a byte-counted split would panic
        // or truncate; a char-counted one makes two clean chunks.
        let chunks = chunk_text("ААААА", 3);
        assert_eq!(chunks, vec!["ААА".to_owned(), "АА".to_owned()]);
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        assert_eq!(chunk_text("hi", 4000), vec!["hi".to_owned()]);
    }
}
