/// Upper bound on tokens derived from one query.
pub const MAX_TOKENS: usize = 25;

const MIN_SUBSTRING_CHARS: usize = 2;

/// Turns a free-text query into a bounded list of normalized match tokens.
///
/// Tokens are generated in a fixed order, deduplicated by first occurrence and
/// truncated to [`MAX_TOKENS`]:
/// 1. the whole query, lowercased with all whitespace removed;
/// 2. each whitespace-delimited word, lowercased, left to right;
/// 3. for queries containing any non-ASCII character (scripts without natural
///    word boundaries), every contiguous substring of the lowercased query of
///    length >= 2, shortest first, then by start offset.
///
/// Shortest-first keeps bigram coverage when a long CJK query would otherwise
/// blow the cap. Empty or whitespace-only input yields an empty list; this
/// function never fails.
pub fn build_tokens(query: &str) -> Vec<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut tokens: Vec<String> = Vec::new();

    let whole: String = trimmed
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .concat();
    push_unique(&mut tokens, whole);

    for word in trimmed.split_whitespace() {
        if tokens.len() >= MAX_TOKENS {
            break;
        }
        push_unique(&mut tokens, word.to_lowercase());
    }

    if trimmed.chars().any(|c| !c.is_ascii()) {
        let lowered = trimmed.to_lowercase();
        let chars: Vec<char> = lowered.chars().collect();
        'outer: for len in MIN_SUBSTRING_CHARS..=chars.len() {
            for start in 0..=(chars.len() - len) {
                if tokens.len() >= MAX_TOKENS {
                    break 'outer;
                }
                push_unique(&mut tokens, chars[start..start + len].iter().collect());
            }
        }
    }

    tokens.truncate(MAX_TOKENS);
    tokens
}

fn push_unique(tokens: &mut Vec<String>, token: String) {
    if !token.is_empty() && !tokens.iter().any(|t| t == &token) {
        tokens.push(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_no_tokens() {
        assert!(build_tokens("").is_empty());
        assert!(build_tokens("   \t\n").is_empty());
    }

    #[test]
    fn test_ascii_query_tokens() {
        let tokens = build_tokens("Car  Insurance");
        assert_eq!(tokens, vec!["carinsurance", "car", "insurance"]);
    }

    #[test]
    fn test_single_word_is_not_duplicated() {
        let tokens = build_tokens("shopping");
        assert_eq!(tokens, vec!["shopping"]);
    }

    #[test]
    fn test_non_ascii_adds_substrings() {
        let tokens = build_tokens("보험료");
        // whole word first, then bigrams, then the full trigram (dedup).
        assert!(tokens.contains(&"보험료".to_string()));
        assert!(tokens.contains(&"보험".to_string()));
        assert!(tokens.contains(&"험료".to_string()));
    }

    #[test]
    fn test_shortest_substrings_survive_the_cap() {
        let query = "가나다라마바사아자차카타파하거너더러머버서";
        let tokens = build_tokens(query);
        assert_eq!(tokens.len(), MAX_TOKENS);
        // All bigrams of a 21-char query fit below the cap only partially;
        // the ones that made it in must come before any longer substring.
        assert!(tokens.iter().skip(1).take(20).all(|t| t.chars().count() == 2));
    }

    #[test]
    fn test_cap_holds_for_long_input() {
        let long = "동해물과 백두산이 마르고 닳도록 하느님이 보우하사 우리나라 만세";
        assert!(build_tokens(long).len() <= MAX_TOKENS);
    }

    #[test]
    fn test_every_token_is_derived_from_query() {
        let query = "우리나라 만세";
        let lowered = query.to_lowercase();
        let squashed: String = lowered.split_whitespace().collect::<Vec<_>>().concat();
        for token in build_tokens(query) {
            let is_word = lowered.split_whitespace().any(|w| w == token);
            let is_substring = lowered.contains(&token) && token.chars().count() >= 2;
            let is_whole = token == squashed;
            assert!(is_word || is_substring || is_whole, "unexpected token {token}");
        }
    }
}
