//! Greedy repacking of two free-text address lines into the three
//! fixed-width slots of the routing file.

use crate::fold::fold;

/// Width of one routing-file address slot.
pub const SLOT_WIDTH: usize = 32;

/// Splits two address lines across three slots of at most [`SLOT_WIDTH`]
/// characters each.
///
/// When both folded lines already fit a slot they pass through untouched
/// and the third slot stays empty. Otherwise the lines are joined, split on
/// whitespace, and the folded tokens are packed greedily left to right;
/// tokens that do not fit the third slot are dropped. This is a word-wrap
/// with a fixed three-line capacity, not a word-wrap with overflow.
pub fn repack(line1: &str, line2: &str) -> (String, String, String) {
    let folded1 = fold(line1);
    let folded2 = fold(line2);
    if folded1.len() <= SLOT_WIDTH && folded2.len() <= SLOT_WIDTH {
        return (folded1, folded2, String::new());
    }

    let joined = format!("{line1} {line2}");
    let mut slots = [String::new(), String::new(), String::new()];
    let mut current = 0;
    for token in joined.split_whitespace() {
        let token = fold(token);
        if token.is_empty() {
            continue;
        }
        loop {
            let slot = &mut slots[current];
            if slot.is_empty() {
                slot.push_str(&token);
                slot.truncate(SLOT_WIDTH);
                break;
            }
            if slot.len() + 1 + token.len() <= SLOT_WIDTH {
                slot.push(' ');
                slot.push_str(&token);
                break;
            }
            if current + 1 == slots.len() {
                // Capacity exhausted: remaining tokens are dropped.
                return finish(slots);
            }
            current += 1;
        }
    }
    finish(slots)
}

fn finish(slots: [String; 3]) -> (String, String, String) {
    let [a, b, c] = slots;
    (a, b, c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_lines_pass_through() {
        let (a, b, c) = repack("rue dupre 63", "Bruxelles 1090");
        assert_eq!(a, "RUE DUPRE 63");
        assert_eq!(b, "BRUXELLES 1090");
        assert_eq!(c, "");
    }

    #[test]
    fn folding_may_shrink_a_line_into_its_slot() {
        // 33 raw chars, but the degree sign folds away.
        let line = "°abcdefghijklmnopqrstuvwxyzabcdef";
        let (a, b, c) = repack(line, "x");
        assert_eq!(a, "ABCDEFGHIJKLMNOPQRSTUVWXYZABCDEF");
        assert_eq!(b, "X");
        assert_eq!(c, "");
    }

    #[test]
    fn long_lines_are_word_wrapped_over_three_slots() {
        let (a, b, c) = repack(
            "Residence les Glycines Batiment C Escalier 4",
            "12 avenue du General de Gaulle",
        );
        assert_eq!(a, "RESIDENCE LES GLYCINES BATIMENT");
        assert_eq!(b, "C ESCALIER 4 12 AVENUE DU");
        assert_eq!(c, "GENERAL DE GAULLE");
    }

    #[test]
    fn slots_never_exceed_width() {
        let long = "b".repeat(39);
        let (a, b, c) = repack(&format!("{long} {long}"), &long);
        for slot in [&a, &b, &c] {
            assert!(slot.len() <= SLOT_WIDTH);
        }
    }

    #[test]
    fn overflow_tokens_are_dropped() {
        let token = "a".repeat(30);
        let line = format!("{token} {token} {token}");
        let (a, b, c) = repack(&line, &format!("{token} extra"));
        assert_eq!(a, token.to_uppercase());
        assert_eq!(b, token.to_uppercase());
        // Third slot holds the third token; the rest is gone.
        assert_eq!(c, token.to_uppercase());
    }
}
