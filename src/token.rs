//! Token alphabet and the two Huffman tables it switches between.

use log::trace;

use crate::{bits::BitChannel, error::Error};

/// A symbol of the token channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A run follows, copied from the predictor at this rank.
    ///
    /// The rank is relative: after a run shorter than the maximum the
    /// predictor at rank 0 cannot match, so ranks are shifted down by one.
    Transition(u8),
    /// One pixel follows as per-channel differences.
    Literal,
    /// The decoder flips to the other table.
    SwitchTable,
}

impl Token {
    fn symbol(self) -> usize {
        match self {
            Self::Transition(rank) => usize::from(rank),
            Self::Literal => 5,
            Self::SwitchTable => 6,
        }
    }
}

/// Codes as `(value << 4) | bits`. Table 0 suits text and graphics, table 1
/// images, where literals are common.
const TABLES: [[u16; 7]; 2] = [
    [0x01, 0x63, 0x1C5, 0x1D5, 0x1E5, 0x22, 0x3E6],
    [0x22, 0x63, 0x1C5, 0x1D5, 0x1E5, 0x01, 0x3E6],
];

/// Statistic magnitude above which a table switch is considered.
const SWITCH_THRESHOLD: i32 = 8;

/// Picks the active table from recent token statistics.
///
/// `stat` counts rank-equals-continuation runs up and literals down; it is
/// only inspected, and then cleared, when a run crosses a row boundary.
#[derive(Debug, Default)]
pub struct TokenModel {
    table: usize,
    stat: i32,
}

impl TokenModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> usize {
        self.table
    }

    pub fn stat(&self) -> i32 {
        self.stat
    }

    pub fn put(&self, ch: &mut BitChannel, token: Token) -> Result<(), Error> {
        let code = TABLES[self.table][token.symbol()];
        ch.put(u32::from(code >> 4), u32::from(code & 15))
    }

    /// Row boundary: switch tables when the statistic clearly favours the
    /// other one, then clear it.
    pub fn end_of_row(&mut self, ch: &mut BitChannel) -> Result<(), Error> {
        let wanted = usize::from(self.stat < 0);
        if self.stat.abs() > SWITCH_THRESHOLD && wanted != self.table {
            self.put(ch, Token::SwitchTable)?;
            self.table ^= 1;
            trace!("token table -> {} (stat {})", self.table, self.stat);
        }
        self.stat = 0;
        Ok(())
    }

    pub fn record_run(&mut self, rank_matches_continuation: bool) {
        self.stat += i32::from(rank_matches_continuation);
    }

    pub fn record_literal(&mut self) {
        self.stat -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(model: &TokenModel, token: Token) -> (u8, u32) {
        let mut ch = BitChannel::new();
        model.put(&mut ch, token).unwrap();
        (ch.as_bytes()[0], ch.bit_len() as u32)
    }

    #[test]
    fn table_zero_codes() {
        let model = TokenModel::new();
        assert_eq!(written(&model, Token::Transition(0)), (0b0000_0000, 1));
        assert_eq!(written(&model, Token::Transition(1)), (0b1100_0000, 3));
        assert_eq!(written(&model, Token::Transition(4)), (0b1111_0000, 5));
        assert_eq!(written(&model, Token::Literal), (0b1000_0000, 2));
        assert_eq!(written(&model, Token::SwitchTable), (0b1111_1000, 6));
    }

    #[test]
    fn literal_heavy_rows_switch_to_image_table() {
        let mut model = TokenModel::new();
        for _ in 0..9 {
            model.record_literal();
        }
        let mut ch = BitChannel::new();
        model.end_of_row(&mut ch).unwrap();
        assert_eq!(model.table(), 1);
        assert_eq!(model.stat(), 0);
        // The switch symbol is written with the table that was active.
        assert_eq!(ch.as_bytes(), &[0b1111_1000]);
        assert_eq!(written(&model, Token::Literal), (0b0000_0000, 1));
    }

    #[test]
    fn weak_statistic_only_resets() {
        let mut model = TokenModel::new();
        for _ in 0..8 {
            model.record_literal();
        }
        let mut ch = BitChannel::new();
        model.end_of_row(&mut ch).unwrap();
        assert_eq!(model.table(), 0);
        assert_eq!(model.stat(), 0);
        assert!(ch.is_empty());
    }

    #[test]
    fn agreeing_sign_keeps_table() {
        let mut model = TokenModel::new();
        for _ in 0..20 {
            model.record_run(true);
        }
        model.record_run(false);
        assert_eq!(model.stat(), 20);
        let mut ch = BitChannel::new();
        model.end_of_row(&mut ch).unwrap();
        assert_eq!(model.table(), 0);
        assert!(ch.is_empty());
    }
}
