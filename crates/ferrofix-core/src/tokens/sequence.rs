//! Search for a sequence of meaningful tokens

use std::collections::BTreeMap;

use crate::error::TokensError;
use crate::token::{CaseSensitivity, Token, TokenPattern};

use super::Tokens;

impl Tokens {
    /// Find the first run of meaningful tokens matching `pattern`.
    ///
    /// Whitespace and comments between matched tokens are skipped. The
    /// search covers `start..=end`, `end` defaulting to the last token.
    /// Returns the matched tokens keyed by index, or `None`.
    pub fn find_sequence(
        &self,
        pattern: &[TokenPattern<'_>],
        start: usize,
        end: Option<usize>,
        case: impl Into<CaseSensitivity>,
    ) -> Result<Option<BTreeMap<usize, Token>>, TokensError> {
        let Some((first, rest)) = pattern.split_first() else {
            return Err(TokensError::InvalidPattern("Invalid sequence.".to_string()));
        };
        if let Some(slot) = pattern.iter().position(TokenPattern::is_meaningless) {
            return Err(TokensError::InvalidPattern(format!(
                "Non-meaningful token at position: {slot}."
            )));
        }

        if self.is_empty() {
            return Ok(None);
        }
        let end = end.map_or(self.len() - 1, |end| end.min(self.len() - 1));
        if start + pattern.len() - 1 > end {
            return Ok(None);
        }

        let case = case.into();
        let first_case = case.for_slot(0);
        let mut candidate = if self[start].equals(first, first_case) {
            Some(start)
        } else {
            self.get_next_token_of_kind(start, &[*first], first_case)
        };

        'search: while let Some(key) = candidate.filter(|&key| key <= end) {
            candidate = self.get_next_token_of_kind(key, &[*first], first_case);

            let mut found = BTreeMap::from([(key, self[key].clone())]);
            let mut current = key;
            for (offset, slot) in rest.iter().enumerate() {
                let Some(next) = self.get_next_meaningful_token(current).filter(|&next| next <= end) else {
                    return Ok(None);
                };
                if !self[next].equals(slot, case.for_slot(offset + 1)) {
                    continue 'search;
                }
                found.insert(next, self[next].clone());
                current = next;
            }
            return Ok(Some(found));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::token::TokenKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use TokenPattern::{Content, Kind, KindContent};

    fn open_tag_and_x() -> Option<Vec<(usize, Token)>> {
        Some(vec![
            (0, Token::new(TokenKind::OpenTag, "<?php ")),
            (1, Token::new(TokenKind::Variable, "$x")),
        ])
    }

    fn per_slot(entries: &[(usize, bool)]) -> CaseSensitivity {
        CaseSensitivity::PerSlot(entries.iter().copied().collect::<HashMap<_, _>>())
    }

    #[rstest]
    #[case("<?php $x = 1;", None, vec![Content(";")], 7, None, true.into())]
    #[case("<?php $x = 2;", None, vec![Kind(TokenKind::OpenTag), KindContent(TokenKind::Variable, "$y")], 0, None, true.into())]
    #[case("<?php $x = 3;", open_tag_and_x(), vec![Kind(TokenKind::OpenTag), KindContent(TokenKind::Variable, "$x")], 0, None, true.into())]
    #[case(
        "<?php $x = 4;",
        Some(vec![(3, Token::simple("=")), (5, Token::new(TokenKind::LNumber, "4")), (6, Token::simple(";"))]),
        vec![Content("="), KindContent(TokenKind::LNumber, "4"), Content(";")],
        0,
        None,
        true.into()
    )]
    #[case("<?php $x = 6;", None, vec![Kind(TokenKind::OpenTag), KindContent(TokenKind::Variable, "$x")], 1, None, true.into())]
    #[case(
        "<?php $x = 7;",
        Some(vec![(3, Token::simple("=")), (5, Token::new(TokenKind::LNumber, "7")), (6, Token::simple(";"))]),
        vec![Content("="), KindContent(TokenKind::LNumber, "7"), Content(";")],
        3,
        Some(6),
        true.into()
    )]
    #[case("<?php $x = 8;", None, vec![Content("="), KindContent(TokenKind::LNumber, "8"), Content(";")], 4, Some(6), true.into())]
    #[case("<?php $x = 9;", None, vec![Content("="), KindContent(TokenKind::LNumber, "9"), Content(";")], 3, Some(5), true.into())]
    #[case("<?php $x = 10;", open_tag_and_x(), vec![Kind(TokenKind::OpenTag), KindContent(TokenKind::Variable, "$x")], 0, Some(1), true.into())]
    #[case("<?php $x = 11;", None, vec![Kind(TokenKind::OpenTag), KindContent(TokenKind::Variable, "$X")], 0, Some(1), true.into())]
    #[case("<?php $x = 12;", None, vec![Kind(TokenKind::OpenTag), KindContent(TokenKind::Variable, "$X")], 0, Some(1), per_slot(&[(0, false), (1, true)]))]
    #[case("<?php $x = 13;", open_tag_and_x(), vec![Kind(TokenKind::OpenTag), KindContent(TokenKind::Variable, "$X")], 0, Some(1), false.into())]
    #[case("<?php $x = 14;", open_tag_and_x(), vec![Kind(TokenKind::OpenTag), KindContent(TokenKind::Variable, "$X")], 0, Some(1), per_slot(&[(1, false)]))]
    #[case("<?php $x = 15;", None, vec![Kind(TokenKind::OpenTag), KindContent(TokenKind::Variable, "$X")], 0, Some(1), per_slot(&[(2, false)]))]
    #[case("<?php $x = 16;", None, vec![KindContent(TokenKind::Variable, "$X"), Content("=")], 0, Some(10), true.into())]
    fn test_find_sequence(
        #[case] source: &str,
        #[case] expected: Option<Vec<(usize, Token)>>,
        #[case] pattern: Vec<TokenPattern<'static>>,
        #[case] start: usize,
        #[case] end: Option<usize>,
        #[case] case: CaseSensitivity,
    ) {
        let tokens = Tokens::from_code(source);
        let found = tokens.find_sequence(&pattern, start, end, case).unwrap();
        assert_eq!(found, expected.map(BTreeMap::from_iter));
    }

    #[test]
    fn test_find_sequence_skips_partial_matches() {
        let tokens = Tokens::from_code("<?php foo(); foo($a); foo($b);");
        let found = tokens
            .find_sequence(
                &[KindContent(TokenKind::String, "foo"), Content("("), KindContent(TokenKind::Variable, "$b")],
                0,
                None,
                true,
            )
            .unwrap()
            .expect("sequence");
        assert_eq!(found.keys().copied().collect::<Vec<_>>(), vec![12, 13, 14]);
    }

    #[test]
    fn test_find_sequence_across_comments() {
        let tokens = Tokens::from_code("<?php $a /* x */ = // y\n 1;");
        let found = tokens
            .find_sequence(&[Kind(TokenKind::Variable), Content("="), Kind(TokenKind::LNumber)], 0, None, true)
            .unwrap();
        assert!(found.is_some());
    }

    #[rstest]
    #[case("Invalid sequence.", vec![])]
    #[case("Non-meaningful token at position: 0.", vec![KindContent(TokenKind::Whitespace, "   ")])]
    #[case("Non-meaningful token at position: 1.", vec![Content("{"), KindContent(TokenKind::Comment, "// Foo"), Content("}")])]
    #[case("Non-meaningful token at position: 2.", vec![Content("{"), Content("!"), Content(""), Content("}")])]
    fn test_find_sequence_rejects_invalid_pattern(#[case] message: &str, #[case] pattern: Vec<TokenPattern<'static>>) {
        let tokens = Tokens::from_code("<?php $x = 1;");
        let error = tokens.find_sequence(&pattern, 0, None, true).unwrap_err();
        assert_eq!(error, TokensError::InvalidPattern(message.to_string()));
        assert_eq!(error.to_string(), message);
    }
}
