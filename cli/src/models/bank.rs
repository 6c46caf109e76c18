use serde::{Deserialize, Serialize};

/// Operator's ledger: money on hand, held codes and running profit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bank {
    pub total_money: f64,
    pub symbol_count: usize,
    pub symbol_codes: Vec<String>,
    pub invested_money: f64,
    pub profit: f64,
}

impl Bank {
    pub fn new(total_money: f64) -> Self {
        Self {
            total_money,
            ..Default::default()
        }
    }

    /// Store the ranked shortlist in the ledger
    pub fn cluster(&mut self, ranked_codes: Vec<String>) {
        self.symbol_count = ranked_codes.len();
        self.symbol_codes = ranked_codes;
    }

    /// Money not yet committed to any position
    pub fn available_money(&self) -> f64 {
        (self.total_money - self.invested_money).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_updates_codes_and_count() {
        let mut bank = Bank::new(2000.0);
        bank.cluster(vec!["600519".to_string(), "000002".to_string()]);

        assert_eq!(bank.symbol_count, 2);
        assert_eq!(bank.symbol_codes[0], "600519");
        assert_eq!(bank.available_money(), 2000.0);
    }
}
