//! 文本规整与空格（`___`）定位

/// 空格占位符
pub const BLANK_MARKER: &str = "___";

/// 比较答案所用的规整形式：去除首尾空白并转小写
pub fn normalize_answer(value: &str) -> String {
    value.trim().to_lowercase()
}

/// 两个答案在忽略大小写与首尾空白后是否一致
pub fn answers_match(given: &str, expected: &str) -> bool {
    normalize_answer(given) == normalize_answer(expected)
}

/// 统计文本中不重叠的 `___` 个数
pub fn count_blanks(text: &str) -> usize {
    text.matches(BLANK_MARKER).count()
}

pub fn count_blanks_in(sentences: &[String]) -> usize {
    sentences.iter().map(|s| count_blanks(s)).sum()
}

/// 全局空格序号对应的 (句子序号, 句内序号)
pub fn blank_location(global_index: usize, sentences: &[String]) -> Option<(usize, usize)> {
    let mut seen = 0;
    for (sentence_index, sentence) in sentences.iter().enumerate() {
        let blanks = count_blanks(sentence);
        if global_index < seen + blanks {
            return Some((sentence_index, global_index - seen));
        }
        seen += blanks;
    }
    None
}

const WORD_EDGE_CHARS: &[char] = &[
    '.', ',', '!', '?', ';', ':', '\'', '"', '(', ')', '[', ']', '{', '}', '«', '»',
];

const ELISIONS: &[&str] = &["qu", "l", "d", "n", "m", "t", "s", "c", "j"];

/// 划词题的单词规整：小写，去掉两端标点与开头的省音（l'、qu' 等）
pub fn normalize_word(word: &str) -> String {
    let lowered = word.trim().to_lowercase();
    let mut current = lowered.trim_matches(WORD_EDGE_CHARS);

    let elided = ELISIONS.iter().find_map(|prefix| {
        let rest = current.strip_prefix(*prefix)?;
        let rest = rest
            .strip_prefix('\'')
            .or_else(|| rest.strip_prefix('\u{2019}'))?;
        (!rest.is_empty()).then_some(rest)
    });
    if let Some(rest) = elided {
        current = rest;
    }

    current.trim_matches(WORD_EDGE_CHARS).to_string()
}

/// 听写的句子规整：小写，去掉 ASCII 标点，合并空白
pub fn normalize_sentence(sentence: &str) -> String {
    sentence
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// 按位置逐词比较的相似度（0-100，保留一位小数）
pub fn word_similarity(given: &str, reference: &str) -> f64 {
    let given_words: Vec<&str> = given.split_whitespace().collect();
    let reference_words: Vec<&str> = reference.split_whitespace().collect();

    if reference_words.is_empty() {
        return if given_words.is_empty() { 100.0 } else { 0.0 };
    }

    let matches = given_words
        .iter()
        .zip(&reference_words)
        .filter(|(a, b)| a == b)
        .count();
    let ratio = matches as f64 / reference_words.len() as f64 * 100.0;
    (ratio * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_count_blanks_non_overlapping() {
        assert_eq!(count_blanks("Le ___ mange la ___."), 2);
        assert_eq!(count_blanks("______"), 2);
        assert_eq!(count_blanks("_____"), 1);
        assert_eq!(count_blanks("aucun"), 0);
    }

    #[test]
    fn test_blank_location() {
        let sentences = owned(&["Le ___ et le ___.", "Pas de trou.", "Un ___ ici."]);
        assert_eq!(blank_location(0, &sentences), Some((0, 0)));
        assert_eq!(blank_location(1, &sentences), Some((0, 1)));
        assert_eq!(blank_location(2, &sentences), Some((2, 0)));
        assert_eq!(blank_location(3, &sentences), None);
    }

    #[test]
    fn test_answers_match_ignores_case_and_spaces() {
        assert!(answers_match("  Chat ", "chat"));
        assert!(!answers_match("chats", "chat"));
    }

    #[test]
    fn test_normalize_word_strips_punctuation_and_elision() {
        assert_eq!(normalize_word("Chat,"), "chat");
        assert_eq!(normalize_word("«Bonjour»"), "bonjour");
        assert_eq!(normalize_word("l'arbre"), "arbre");
        assert_eq!(normalize_word("L\u{2019}école."), "école");
        assert_eq!(normalize_word("qu'il"), "il");
        assert_eq!(normalize_word("d'"), "d");
        assert_eq!(normalize_word("maison"), "maison");
    }

    #[test]
    fn test_normalize_sentence() {
        assert_eq!(
            normalize_sentence("  Le chat, dort!  Sur   le lit. "),
            "le chat dort sur le lit"
        );
    }

    #[test]
    fn test_word_similarity() {
        assert_eq!(word_similarity("le chat dort", "le chat dort"), 100.0);
        assert_eq!(word_similarity("le chien dort", "le chat dort"), 66.7);
        assert_eq!(word_similarity("", ""), 100.0);
        assert_eq!(word_similarity("mot", ""), 0.0);
    }
}
