/// A free-text name split into its printable part and any pronoun annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotated {
    pub text: String,
    pub pronouns: String,
}

/// Splits `raw` at its first `(`.
///
/// The part before the parenthesis is the printable text. The parenthesized
/// segment is kept as pronouns only when it has the shape `word/word`; any
/// other annotation ("OOO til 5/11") is dropped. Total over all inputs.
pub fn normalize_annotated(raw: &str) -> Annotated {
    let Some(open) = raw.find('(') else {
        return Annotated {
            text: raw.trim().to_string(),
            pronouns: String::new(),
        };
    };

    let text = raw[..open].trim().to_string();
    let rest = &raw[open + 1..];
    let inner = match rest.find(')') {
        Some(close) => &rest[..close],
        None => rest,
    };

    let pronouns = if is_pronoun_shape(inner) {
        inner.trim().to_string()
    } else {
        String::new()
    };

    Annotated { text, pronouns }
}

/// True when `text` has at least one letter, digit or underscore.
pub fn has_word_content(text: &str) -> bool {
    text.chars().any(is_word_char)
}

fn is_pronoun_shape(segment: &str) -> bool {
    let Some((left, right)) = segment.trim().split_once('/') else {
        return false;
    };
    is_word(left) && is_word(right)
}

fn is_word(token: &str) -> bool {
    !token.is_empty() && token.chars().all(is_word_char)
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::{has_word_content, normalize_annotated, Annotated};

    fn parts(raw: &str) -> (String, String) {
        let annotated = normalize_annotated(raw);
        (annotated.text, annotated.pronouns)
    }

    fn expect(raw: &str, text: &str, pronouns: &str) {
        assert_eq!(
            parts(raw),
            (text.to_string(), pronouns.to_string()),
            "input: {raw:?}"
        );
    }

    #[test]
    fn plain_names_pass_through() {
        expect("Jane Doe", "Jane Doe", "");
        expect("Dominick Osinski-Konopelski", "Dominick Osinski-Konopelski", "");
        expect("Constance Angelica Morar", "Constance Angelica Morar", "");
        expect("mpollich", "mpollich", "");
    }

    #[test]
    fn unparenthesized_input_is_trimmed() {
        for raw in ["  spaced out  ", "\tTab\n", "a/b", "5/11 notes"] {
            expect(raw, raw.trim(), "");
        }
    }

    #[test]
    fn empty_input_yields_empty_parts() {
        assert_eq!(normalize_annotated(""), Annotated::default());
        assert_eq!(normalize_annotated("   "), Annotated::default());
    }

    #[test]
    fn extracts_pronoun_annotations() {
        expect("Jane Doe (she/her)", "Jane Doe", "she/her");
        expect("tschamberger (he/him)", "tschamberger", "he/him");
        expect("tschamberger (they/them)", "tschamberger", "they/them");
        expect("tschamberger (he/they)", "tschamberger", "he/they");
        expect("Dallas Konopelski (He/Him)", "Dallas Konopelski", "He/Him");
        expect("Pat Lee ( ze/zir )", "Pat Lee", "ze/zir");
    }

    #[test]
    fn drops_other_annotations() {
        expect("Jane Doe (OOO til 5/11)", "Jane Doe", "");
        expect("Jane Doe (contractor)", "Jane Doe", "");
        expect("Jane Doe (a/b/c)", "Jane Doe", "");
        expect("Jane Doe (/her)", "Jane Doe", "");
    }

    #[test]
    fn only_first_parenthesis_counts() {
        expect("Jane (OOO) Doe (she/her)", "Jane", "");
        expect("Jane Doe (she/her", "Jane Doe", "she/her");
        expect("(she/her) Jane", "", "she/her");
    }

    #[test]
    fn word_content_detection() {
        assert!(has_word_content("she/her"));
        assert!(has_word_content("42"));
        assert!(!has_word_content(" / - "));
        assert!(!has_word_content(""));
    }
}
