/// Splits file content into line-aligned chunks.
///
/// Whole lines accumulate up to `max_chars`; a line is never split, so a
/// single over-budget line forms its own chunk. Joining the chunks with a
/// newline reconstructs the original line sequence.
pub fn split_into_chunks(content: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in content.lines() {
        let added_len = if current.is_empty() {
            line.len()
        } else {
            line.len() + 1
        };

        if !current.is_empty() && current.len() + added_len > max_chars {
            chunks.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::split_into_chunks;

    #[test]
    fn empty_content_yields_no_chunks() {
        assert_eq!(split_into_chunks("", 1000), Vec::<String>::new());
    }

    #[test]
    fn short_content_is_a_single_chunk() {
        assert_eq!(
            split_into_chunks("fn main() {}\n", 1000),
            vec!["fn main() {}"]
        );
    }

    #[test]
    fn chunks_never_exceed_the_budget_unless_one_line_does() {
        let content = (0..50)
            .map(|n| format!("line number {n:03}"))
            .collect::<Vec<_>>()
            .join("\n");

        let chunks = split_into_chunks(&content, 100);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 100);
        }
    }

    #[test]
    fn over_budget_line_forms_its_own_chunk() {
        let long_line = "x".repeat(64);
        let content = format!("short\n{long_line}\nshort again");

        let chunks = split_into_chunks(&content, 32);
        assert_eq!(chunks, vec!["short", long_line.as_str(), "short again"]);
    }

    #[test]
    fn joining_chunks_reconstructs_the_line_sequence() {
        let content = (0..20)
            .map(|n| format!("line {n}"))
            .collect::<Vec<_>>()
            .join("\n");

        let chunks = split_into_chunks(&content, 24);
        assert_eq!(chunks.join("\n"), content);
    }
}
